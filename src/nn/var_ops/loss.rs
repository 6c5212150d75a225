/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 损失函数扩展 trait
 */

use crate::nn::{GraphError, Var};

/// 损失函数扩展 trait
///
/// # 使用示例
/// ```ignore
/// use seq2seq_gan::nn::VarLossOps;
///
/// let loss = logits.cross_entropy(&one_hot_labels)?;
/// let loss = logits.sequence_cross_entropy(&one_hot_labels, &mask)?;
/// let loss = d_logits.sigmoid_cross_entropy(&ones)?;
/// ```
pub trait VarLossOps {
    /// Softmax 交叉熵（对最后一维做 softmax），对所有行求平均
    fn cross_entropy(&self, target: &Var) -> Result<Var, GraphError>;

    /// 带掩码的序列交叉熵：logits [b, t, v]，target 同形 one-hot，mask [b, t]；
    /// 结果为按掩码加权的平均值，填充位置不计入
    fn sequence_cross_entropy(&self, target: &Var, mask: &Var) -> Result<Var, GraphError>;

    /// Sigmoid 交叉熵（logits 与同形标签），对所有元素求平均
    fn sigmoid_cross_entropy(&self, target: &Var) -> Result<Var, GraphError>;
}

impl VarLossOps for Var {
    fn cross_entropy(&self, target: &Var) -> Result<Var, GraphError> {
        self.check_same_graph(target, "交叉熵")?;
        let id = self.graph().borrow_mut().new_softmax_cross_entropy_node(
            self.node_id(),
            target.node_id(),
            None,
            None,
        )?;
        Ok(self.derive(id))
    }

    fn sequence_cross_entropy(&self, target: &Var, mask: &Var) -> Result<Var, GraphError> {
        self.check_same_graph(target, "交叉熵")?;
        self.check_same_graph(mask, "交叉熵")?;
        let id = self.graph().borrow_mut().new_softmax_cross_entropy_node(
            self.node_id(),
            target.node_id(),
            Some(mask.node_id()),
            None,
        )?;
        Ok(self.derive(id))
    }

    fn sigmoid_cross_entropy(&self, target: &Var) -> Result<Var, GraphError> {
        self.check_same_graph(target, "交叉熵")?;
        let id = self.graph().borrow_mut().new_sigmoid_cross_entropy_node(
            self.node_id(),
            target.node_id(),
            None,
        )?;
        Ok(self.derive(id))
    }
}
