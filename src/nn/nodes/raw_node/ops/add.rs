use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, parent_value};
use crate::tensor::{Tensor, broadcast_shapes};

/// 加法节点：任意多个父节点逐元素相加，支持 NumPy 风格广播
///
/// forward: y = x_1 + x_2 + ... + x_n
/// backward: dL/dx_i = sum_to_shape(upstream, shape(x_i))
pub(in crate::nn) struct Add {
    value: Option<Tensor>,
    shape: Vec<usize>,
}

impl Add {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        // 1. 父节点数量验证
        if parents.len() < 2 {
            return Err(GraphError::InvalidOperation(format!(
                "Add节点至少需要2个父节点，实际为{}个",
                parents.len()
            )));
        }

        // 2. 广播形状推导
        let mut shape = parents[0].value_expected_shape().to_vec();
        for parent in &parents[1..] {
            let parent_shape = parent.value_expected_shape();
            shape = broadcast_shapes(&shape, parent_shape).ok_or_else(|| {
                GraphError::ShapeMismatch {
                    expected: shape.clone(),
                    got: parent_shape.to_vec(),
                    message: format!("Add节点的父节点{parent}无法与其他父节点广播"),
                }
            })?;
        }

        Ok(Self { value: None, shape })
    }
}

impl TraitNode for Add {
    fn type_name(&self) -> &'static str {
        "add"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let mut sum = parent_value(parents, 0)?.clone();
        for index in 1..parents.len() {
            sum = sum + parent_value(parents, index)?;
        }
        self.value = Some(sum);
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        target_index: usize,
        parents: &[&NodeHandle],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Ok(upstream_grad.sum_to_shape(parents[target_index].value_expected_shape()))
    }
}
