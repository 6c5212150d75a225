/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : Dropout 节点（inverted dropout）
 *
 * 训练模式：以 keep_prob 的概率保留每个元素并除以 keep_prob，其余置0；
 * 评估模式：恒等映射。掩码在每次前向计算时重新采样，并留给反向传播使用。
 */

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, parent_value};
use crate::tensor::Tensor;

pub(in crate::nn) struct Dropout {
    value: Option<Tensor>,
    shape: Vec<usize>,
    keep_prob: f32,
    rng: StdRng,
    /// 最近一次前向计算所用的掩码（已含 1/keep_prob 缩放）；None 表示恒等
    mask: Option<Tensor>,
    is_training: bool,
}

impl Dropout {
    pub(in crate::nn) fn new(
        parents: &[&NodeHandle],
        keep_prob: f32,
        seed: u64,
        is_training: bool,
    ) -> Result<Self, GraphError> {
        check_parents_count(parents, 1, "Dropout")?;
        if !(keep_prob > 0.0 && keep_prob <= 1.0) {
            return Err(GraphError::InvalidOperation(format!(
                "Dropout的keep_prob须在(0, 1]内，实际为{keep_prob}"
            )));
        }
        Ok(Self {
            value: None,
            shape: parents[0].value_expected_shape().to_vec(),
            keep_prob,
            rng: StdRng::seed_from_u64(seed),
            mask: None,
            is_training,
        })
    }
}

impl TraitNode for Dropout {
    fn type_name(&self) -> &'static str {
        "dropout"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let input = parent_value(parents, 0)?;
        if self.is_training && self.keep_prob < 1.0 {
            let keep_prob = self.keep_prob;
            let mask = Tensor::uniform_with_rng(0.0, 1.0, &self.shape, &mut self.rng)
                .map(|u| if u < keep_prob { 1.0 / keep_prob } else { 0.0 });
            self.value = Some(input * &mask);
            self.mask = Some(mask);
        } else {
            self.value = Some(input.clone());
            self.mask = None;
        }
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
        Ok(match &self.mask {
            Some(mask) => upstream_grad * mask,
            None => upstream_grad.clone(),
        })
    }

    fn set_training(&mut self, training: bool) {
        self.is_training = training;
    }
}
