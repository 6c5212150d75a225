/*
 * @Author       : 老董
 * @Date         : 2026-02-13
 * @Description  : 按样本（行）掩码混合新旧状态，用于跳过填充位置和保持已结束的序列
 */

use crate::nn::{Graph, GraphError, LstmState, Var};
use crate::tensor::Tensor;

/// 单个时间步的行掩码：`keep_new` 为 [batch, 1]，有效行为1；`keep_prev = 1 - keep_new`
pub(super) struct RowMask {
    keep_new: Var,
    keep_prev: Var,
}

impl RowMask {
    /// 由“哪些行仍有效”构建；所有行都有效时返回 None（无需混合）
    pub(super) fn from_active(graph: &Graph, active: &[bool]) -> Result<Option<Self>, GraphError> {
        if active.iter().all(|&a| a) {
            return Ok(None);
        }
        let data = active
            .iter()
            .map(|&a| if a { 1.0 } else { 0.0 })
            .collect::<Vec<_>>();
        let mask = Tensor::new(&data, &[active.len(), 1]);
        Ok(Some(Self {
            keep_prev: graph.constant(&(1.0 - &mask))?,
            keep_new: graph.constant(&mask)?,
        }))
    }

    /// 第`t`步时`t < lengths[b]`的行有效
    pub(super) fn from_lengths(
        graph: &Graph,
        lengths: &[usize],
        t: usize,
    ) -> Result<Option<Self>, GraphError> {
        let active = lengths.iter().map(|&len| t < len).collect::<Vec<_>>();
        Self::from_active(graph, &active)
    }

    /// 有效行取`new`，其余行保持`prev`
    pub(super) fn blend(&self, new: &Var, prev: &Var) -> Result<Var, GraphError> {
        self.keep_new
            .try_mul(new)?
            .try_add(&self.keep_prev.try_mul(prev)?)
    }

    /// 有效行取`new`，其余行置0
    pub(super) fn zero_inactive(&self, new: &Var) -> Result<Var, GraphError> {
        self.keep_new.try_mul(new)
    }

    pub(super) fn blend_states(
        &self,
        new: &[LstmState],
        prev: &[LstmState],
    ) -> Result<Vec<LstmState>, GraphError> {
        new.iter()
            .zip(prev)
            .map(|(n, p)| {
                Ok(LstmState {
                    h: self.blend(&n.h, &p.h)?,
                    c: self.blend(&n.c, &p.c)?,
                })
            })
            .collect()
    }
}
