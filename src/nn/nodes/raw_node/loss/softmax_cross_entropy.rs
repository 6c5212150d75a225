/*
 * @Author       : 老董
 * @Date         : 2024-02-24 14:19:16
 * @Description  : Softmax 交叉熵损失节点（可带逐行权重，用于序列掩码）
 *
 * 父节点：
 * - logits: [..., num_classes]
 * - labels: 与 logits 同形（one-hot 或概率分布）
 * - weights（可选）：logits 去掉最后一维后的形状，如序列损失中的 [batch, time] 掩码
 *
 * forward: loss = Σ_r w_r * (-Σ_c y_rc * log softmax(x)_rc) / Σ_r w_r
 *          未给权重时 w_r 全为1，即对所有行求平均
 * backward: dL/dx = (softmax(x) - y) * w / Σ w
 */

use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, parent_value};
use crate::tensor::Tensor;

pub(in crate::nn) struct SoftmaxCrossEntropy {
    value: Option<Tensor>,
    shape: Vec<usize>,
    /// 前向时缓存的 softmax 概率，反向时复用
    probs: Option<Tensor>,
    /// 前向时缓存的权重（已在最后补1维便于广播）及其总和
    weights: Option<Tensor>,
    weight_sum: f32,
}

impl SoftmaxCrossEntropy {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        if !(2..=3).contains(&parents.len()) {
            return Err(GraphError::InvalidOperation(format!(
                "SoftmaxCrossEntropy节点需要2或3个父节点（logits, labels[, weights]），实际为{}个",
                parents.len()
            )));
        }
        let logits_shape = parents[0].value_expected_shape();
        if logits_shape.len() < 2 {
            return Err(GraphError::DimensionMismatch {
                expected: 2,
                got: logits_shape.len(),
                message: "SoftmaxCrossEntropy的logits至少为2阶".to_string(),
            });
        }
        let labels_shape = parents[1].value_expected_shape();
        if labels_shape != logits_shape {
            return Err(GraphError::ShapeMismatch {
                expected: logits_shape.to_vec(),
                got: labels_shape.to_vec(),
                message: "SoftmaxCrossEntropy的labels须与logits同形".to_string(),
            });
        }
        if let Some(weights) = parents.get(2) {
            let row_shape = &logits_shape[..logits_shape.len() - 1];
            if weights.value_expected_shape() != row_shape {
                return Err(GraphError::ShapeMismatch {
                    expected: row_shape.to_vec(),
                    got: weights.value_expected_shape().to_vec(),
                    message: "SoftmaxCrossEntropy的weights须为logits去掉最后一维的形状"
                        .to_string(),
                });
            }
        }
        Ok(Self {
            value: None,
            shape: vec![1, 1],
            probs: None,
            weights: None,
            weight_sum: 0.0,
        })
    }
}

impl TraitNode for SoftmaxCrossEntropy {
    fn type_name(&self) -> &'static str {
        "softmax_cross_entropy"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let logits = parent_value(parents, 0)?;
        let labels = parent_value(parents, 1)?;
        let last_axis = logits.dimension() - 1;

        let probs = logits.softmax_last_axis();
        let log_probs = probs.map(|p| p.max(f32::MIN_POSITIVE).ln());
        // 每行的交叉熵，形状为 logits 去掉最后一维
        let row_losses = (labels * &log_probs).sum_axis(last_axis) * -1.0;

        let weights = match parents.get(2) {
            Some(_) => parent_value(parents, 2)?.clone(),
            None => Tensor::ones(row_losses.shape()),
        };
        let weight_sum = weights.sum().get_data_number().unwrap_or(0.0);
        let weighted_sum = (&row_losses * &weights)
            .sum()
            .get_data_number()
            .unwrap_or(0.0);
        // 权重全为0（如整批都是填充）时损失与梯度均为0
        let loss = if weight_sum > 0.0 {
            weighted_sum / weight_sum
        } else {
            0.0
        };

        self.value = Some(Tensor::new(&[loss], &[1, 1]));
        self.probs = Some(probs);
        self.weights = Some(weights.unsqueeze(last_axis));
        self.weight_sum = weight_sum;
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
        // labels与weights视为常量
        if target_index != 0 || self.weight_sum <= 0.0 {
            return Ok(Tensor::zeros(target_shape));
        }
        let (probs, weights) = match (&self.probs, &self.weights) {
            (Some(probs), Some(weights)) => (probs, weights),
            _ => {
                return Err(GraphError::ComputationError(
                    "SoftmaxCrossEntropy节点尚未前向计算，无法求梯度".to_string(),
                ));
            }
        };
        let labels = parent_value(parents, 1)?;
        let scale = upstream_grad.get_data_number().unwrap_or(1.0) / self.weight_sum;
        Ok(&(probs - labels) * weights * scale)
    }
}
