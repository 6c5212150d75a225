use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, parent_value};
use crate::tensor::Tensor;

/// Stack 节点：将若干同形父节点沿新的第`axis`维堆叠，是 Select 的逆操作
pub(in crate::nn) struct Stack {
    value: Option<Tensor>,
    shape: Vec<usize>,
    axis: usize,
}

impl Stack {
    pub(in crate::nn) fn new(parents: &[&NodeHandle], axis: usize) -> Result<Self, GraphError> {
        let first = parents
            .first()
            .ok_or_else(|| GraphError::InvalidOperation("Stack节点至少需要1个父节点".to_string()))?
            .value_expected_shape();
        if let Some(other) = parents
            .iter()
            .find(|p| p.value_expected_shape() != first)
        {
            return Err(GraphError::ShapeMismatch {
                expected: first.to_vec(),
                got: other.value_expected_shape().to_vec(),
                message: format!("Stack节点的父节点{other}形状与其他父节点不一致"),
            });
        }
        if axis > first.len() {
            return Err(GraphError::DimensionMismatch {
                expected: first.len(),
                got: axis,
                message: "Stack的新轴位置超出范围".to_string(),
            });
        }
        let mut shape = first.to_vec();
        shape.insert(axis, parents.len());
        Ok(Self {
            value: None,
            shape,
            axis,
        })
    }
}

impl TraitNode for Stack {
    fn type_name(&self) -> &'static str {
        "stack"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let values = (0..parents.len())
            .map(|i| parent_value(parents, i))
            .collect::<Result<Vec<_>, _>>()?;
        self.value = Some(Tensor::stack(&values, self.axis));
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        target_index: usize,
        _parents: &[&NodeHandle],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Ok(upstream_grad.select(self.axis, target_index))
    }
}
