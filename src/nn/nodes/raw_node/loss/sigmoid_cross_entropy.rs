/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : Sigmoid 交叉熵损失节点（二分类，logits 直接输入，对所有元素求平均）
 *
 * 数值稳定形式：l = max(x, 0) - x * z + ln(1 + e^(-|x|))
 * backward: dL/dx = (sigmoid(x) - z) / N
 */

use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, parent_value};
use crate::tensor::Tensor;

pub(in crate::nn) struct SigmoidCrossEntropy {
    value: Option<Tensor>,
    shape: Vec<usize>,
}

impl SigmoidCrossEntropy {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        check_parents_count(parents, 2, "SigmoidCrossEntropy")?;
        let (logits, labels) = (
            parents[0].value_expected_shape(),
            parents[1].value_expected_shape(),
        );
        if logits != labels {
            return Err(GraphError::ShapeMismatch {
                expected: logits.to_vec(),
                got: labels.to_vec(),
                message: "SigmoidCrossEntropy的labels须与logits同形".to_string(),
            });
        }
        Ok(Self {
            value: None,
            shape: vec![1, 1],
        })
    }
}

impl TraitNode for SigmoidCrossEntropy {
    fn type_name(&self) -> &'static str {
        "sigmoid_cross_entropy"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let logits = parent_value(parents, 0)?;
        let labels = parent_value(parents, 1)?;
        let stable = logits.map(|x| x.max(0.0) + (-x.abs()).exp().ln_1p());
        let losses = &stable - &(logits * labels);
        self.value = Some(losses.mean());
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
        if target_index != 0 {
            return Ok(Tensor::zeros(target_shape));
        }
        let logits = parent_value(parents, 0)?;
        let labels = parent_value(parents, 1)?;
        let count = logits.size().max(1) as f32;
        let scale = upstream_grad.get_data_number().unwrap_or(1.0) / count;
        Ok(&(&logits.sigmoid() - labels) * scale)
    }
}
