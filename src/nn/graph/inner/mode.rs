/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner train/eval 模式、detach 机制
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;

impl GraphInner {
    /// 切换到训练模式（Dropout生效）
    pub fn set_train_mode(&mut self) {
        self.set_mode(false);
    }

    /// 切换到评估模式（Dropout变为恒等）
    pub fn set_eval_mode(&mut self) {
        self.set_mode(true);
    }

    fn set_mode(&mut self, is_eval: bool) {
        self.is_eval_mode = is_eval;
        for node in self.nodes.values_mut() {
            node.set_training(!is_eval);
        }
    }

    pub const fn is_train_mode(&self) -> bool {
        !self.is_eval_mode
    }

    // ========== detach 机制 ==========

    /// 将节点标记为 detached：反向传播到此为止
    pub fn detach_node(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        self.get_node_mut(node_id)?.set_detached(true);
        Ok(())
    }

    /// 取消节点的 detach 状态
    pub fn attach_node(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        self.get_node_mut(node_id)?.set_detached(false);
        Ok(())
    }

    pub fn is_node_detached(&self, node_id: NodeId) -> Result<bool, GraphError> {
        Ok(self.get_node(node_id)?.is_detached())
    }

    /// no_grad 上下文：闭包内处于评估模式，结束后恢复原模式
    pub fn no_grad_scope<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        let was_train = self.is_train_mode();
        self.set_eval_mode();
        let result = f(self);
        if was_train {
            self.set_train_mode();
        }
        result
    }
}
