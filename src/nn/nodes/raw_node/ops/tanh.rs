use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, own_value, parent_value};
use crate::tensor::Tensor;

/// Tanh 激活函数节点
///
/// backward: d(tanh)/dx = 1 - tanh²(x)
pub(in crate::nn) struct Tanh {
    value: Option<Tensor>,
    shape: Vec<usize>,
}

impl Tanh {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        check_parents_count(parents, 1, "Tanh")?;
        Ok(Self {
            value: None,
            shape: parents[0].value_expected_shape().to_vec(),
        })
    }
}

impl TraitNode for Tanh {
    fn type_name(&self) -> &'static str {
        "tanh"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        self.value = Some(parent_value(parents, 0)?.tanh());
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        _target_index: usize,
        _parents: &[&NodeHandle],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let value = own_value(&self.value, self.type_name())?;
        Ok(upstream_grad * &value.map(|y| 1.0 - y * y))
    }
}
