/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 形状变换扩展 trait
 */

use crate::nn::{GraphError, Var};

/// 形状变换扩展 trait
pub trait VarShapeOps {
    /// 取第`axis`维上第`index`个切片（该维被移除），如 [b, t, e] 的 `select(1, t)` 得到 [b, e]
    fn select(&self, axis: usize, index: usize) -> Result<Var, GraphError>;

    /// 以自身为嵌入表 [vocab, dim]，按`ids`查表，输出`batch_shape + [dim]`
    fn gather_rows(&self, ids: &[usize], batch_shape: &[usize]) -> Result<Var, GraphError>;

    /// 将若干同形 Var 沿新的第`axis`维堆叠，是 `select` 的逆操作
    fn stack(vars: &[Var], axis: usize) -> Result<Var, GraphError>;
}

impl VarShapeOps for Var {
    fn select(&self, axis: usize, index: usize) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_select_node(self.node_id(), axis, index, None)?;
        Ok(self.derive(id))
    }

    fn gather_rows(&self, ids: &[usize], batch_shape: &[usize]) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_gather_node(self.node_id(), ids, batch_shape, None)?;
        Ok(self.derive(id))
    }

    fn stack(vars: &[Var], axis: usize) -> Result<Var, GraphError> {
        let first = vars
            .first()
            .ok_or_else(|| GraphError::InvalidOperation("stack需要至少1个Var".to_string()))?;
        for var in &vars[1..] {
            first.check_same_graph(var, "堆叠")?;
        }
        let ids = vars.iter().map(Var::node_id).collect::<Vec<_>>();
        let id = first.graph().borrow_mut().new_stack_node(&ids, axis, None)?;
        Ok(first.derive(id))
    }
}
