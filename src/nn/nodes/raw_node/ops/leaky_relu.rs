use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, parent_value};
use crate::tensor::Tensor;

/// LeakyReLU 激活函数节点：x if x > 0 else alpha * x
pub(in crate::nn) struct LeakyReLU {
    value: Option<Tensor>,
    shape: Vec<usize>,
    alpha: f32,
}

impl LeakyReLU {
    pub(in crate::nn) fn new(parents: &[&NodeHandle], alpha: f32) -> Result<Self, GraphError> {
        check_parents_count(parents, 1, "LeakyReLU")?;
        if !(0.0..1.0).contains(&alpha) {
            return Err(GraphError::InvalidOperation(format!(
                "LeakyReLU的alpha须在[0, 1)内，实际为{alpha}"
            )));
        }
        Ok(Self {
            value: None,
            shape: parents[0].value_expected_shape().to_vec(),
            alpha,
        })
    }
}

impl TraitNode for LeakyReLU {
    fn type_name(&self) -> &'static str {
        "leaky_relu"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let alpha = self.alpha;
        self.value = Some(parent_value(parents, 0)?.map(|x| if x > 0.0 { x } else { alpha * x }));
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        _target_index: usize,
        parents: &[&NodeHandle],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let alpha = self.alpha;
        let slope = parent_value(parents, 0)?.map(|x| if x > 0.0 { 1.0 } else { alpha });
        Ok(upstream_grad * &slope)
    }
}
