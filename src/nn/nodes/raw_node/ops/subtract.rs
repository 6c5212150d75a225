use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, parent_value};
use crate::tensor::{Tensor, broadcast_shapes};

/// 减法节点：y = a - b，支持广播
pub(in crate::nn) struct Subtract {
    value: Option<Tensor>,
    shape: Vec<usize>,
}

impl Subtract {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        check_parents_count(parents, 2, "Subtract")?;
        let (a, b) = (
            parents[0].value_expected_shape(),
            parents[1].value_expected_shape(),
        );
        let shape = broadcast_shapes(a, b).ok_or_else(|| GraphError::ShapeMismatch {
            expected: a.to_vec(),
            got: b.to_vec(),
            message: "Subtract节点的两个父节点无法广播".to_string(),
        })?;
        Ok(Self { value: None, shape })
    }
}

impl TraitNode for Subtract {
    fn type_name(&self) -> &'static str {
        "subtract"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        self.value = Some(parent_value(parents, 0)? - parent_value(parents, 1)?);
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
        let target_shape = parents[target_index].value_expected_shape();
        Ok(if target_index == 0 {
            upstream_grad.sum_to_shape(target_shape)
        } else {
            (upstream_grad * -1.0).sum_to_shape(target_shape)
        })
    }
}
