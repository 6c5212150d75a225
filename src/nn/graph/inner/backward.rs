/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner VJP 反向传播
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::tensor::Tensor;

impl GraphInner {
    // ========== VJP 反向传播核心 ==========

    /// 反向传播：要求损失为已前向计算过的标量，返回损失值。
    /// 参数节点的梯度会累加，直到被`clear_grad`/优化器的`zero_grad`清零
    pub fn backward(&mut self, loss_id: NodeId) -> Result<f32, GraphError> {
        if !self.is_train_mode() {
            tracing::warn!(graph = %self.name, "在评估模式下调用backward，这通常是误用");
        }

        let loss_node = self.get_node(loss_id)?;
        let loss_value = loss_node.value().ok_or_else(|| {
            GraphError::ComputationError(format!("损失{loss_node}没有值，请先执行 forward"))
        })?;
        if loss_value.size() != 1 {
            return Err(GraphError::InvalidOperation(format!(
                "反向传播要求损失为标量，但得到形状{:?}",
                loss_value.shape()
            )));
        }
        let loss_scalar = loss_value.get_data_number().ok_or_else(|| {
            GraphError::ComputationError("无法从损失节点获取标量值".to_string())
        })?;
        let loss_shape = loss_value.shape().to_vec();

        self.reset_intermediate_grad();
        self.get_node_mut(loss_id)?
            .set_grad(Some(Tensor::ones(&loss_shape)));

        // 逆拓扑序：每个节点在其所有子节点之后处理，保证上游梯度已累加完整
        let order = self.topological_order(loss_id)?;
        for &node_id in order.iter().rev() {
            self.propagate_grad_to_parents(node_id)?;
        }

        self.last_backward_pass_id += 1;
        Ok(loss_scalar)
    }

    /// 将梯度从当前节点传播到其父节点（输入节点与被detach的节点不接收梯度）
    fn propagate_grad_to_parents(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let parent_ids = self.get_node_parents(node_id)?;
        if parent_ids.is_empty() {
            return Ok(());
        }

        let parent_grads: Vec<(NodeId, Tensor)> = {
            let node = self.get_node(node_id)?;
            if node.is_detached() {
                return Ok(());
            }
            let Some(upstream_grad) = node.grad() else {
                return Ok(());
            };
            let parents = self.get_nodes(&parent_ids)?;

            let mut grads = Vec::with_capacity(parents.len());
            for (index, parent) in parents.iter().enumerate() {
                if parent.is_leaf() && !parent.is_parameter() {
                    continue;
                }
                if parent.is_detached() {
                    continue;
                }
                let grad = node.calc_grad_to_parent(index, &parents, upstream_grad)?;
                grads.push((parent.id(), grad));
            }
            grads
        };

        for (parent_id, grad) in parent_grads {
            self.get_node_mut(parent_id)?.accumulate_grad(grad);
        }
        Ok(())
    }

    /// 清除所有节点的梯度
    pub fn clear_grad(&mut self) {
        for node in self.nodes.values_mut() {
            node.set_grad(None);
        }
    }

    /// 清除单个节点的梯度
    pub fn clear_node_grad(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        self.get_node_mut(node_id)?.set_grad(None);
        Ok(())
    }

    /// 重置中间节点（非参数）的梯度，参数梯度保留以支持累加
    fn reset_intermediate_grad(&mut self) {
        for node in self.nodes.values_mut() {
            if !node.is_parameter() {
                node.set_grad(None);
            }
        }
    }
}
