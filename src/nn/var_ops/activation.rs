/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 激活函数扩展 trait
 */

use crate::nn::{GraphError, Var};

/// 激活函数扩展 trait
///
/// # 使用示例
/// ```ignore
/// use seq2seq_gan::nn::VarActivationOps;
///
/// let h = x.leaky_relu(0.01)?;
/// let out = h.tanh()?;
/// ```
pub trait VarActivationOps {
    /// Sigmoid 激活：1 / (1 + exp(-x))
    fn sigmoid(&self) -> Result<Var, GraphError>;

    /// Tanh 激活
    fn tanh(&self) -> Result<Var, GraphError>;

    /// `LeakyReLU` 激活：x if x > 0 else alpha * x
    fn leaky_relu(&self, alpha: f32) -> Result<Var, GraphError>;
}

impl VarActivationOps for Var {
    fn sigmoid(&self) -> Result<Var, GraphError> {
        let id = self.graph().borrow_mut().new_sigmoid_node(self.node_id(), None)?;
        Ok(self.derive(id))
    }

    fn tanh(&self) -> Result<Var, GraphError> {
        let id = self.graph().borrow_mut().new_tanh_node(self.node_id(), None)?;
        Ok(self.derive(id))
    }

    fn leaky_relu(&self, alpha: f32) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_leaky_relu_node(self.node_id(), alpha, None)?;
        Ok(self.derive(id))
    }
}
