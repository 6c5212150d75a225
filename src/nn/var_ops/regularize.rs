use crate::nn::{GraphError, Var};

/// 正则化扩展 trait
pub trait VarRegularizeOps {
    /// Inverted dropout：训练模式下以`keep_prob`保留并放大，评估模式下恒等
    fn dropout(&self, keep_prob: f32) -> Result<Var, GraphError>;
}

impl VarRegularizeOps for Var {
    fn dropout(&self, keep_prob: f32) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_dropout_node(self.node_id(), keep_prob, None)?;
        Ok(self.derive(id))
    }
}
