/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : 批次张量：右侧补齐的 id 矩阵、真实长度、teacher forcing 解码输入与序列掩码
 */

use ndarray::{Array2, s};

use super::{Seq2SeqError, Vocab};
use crate::tensor::Tensor;

/// 一批 token id 序列：右侧用 pad id 补齐成矩形，并记录每条的真实长度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBatch {
    /// [batch, max_len]
    pub ids: Array2<usize>,
    pub lengths: Vec<usize>,
}

impl TokenBatch {
    pub fn from_sequences(sequences: &[Vec<usize>], pad_id: usize) -> Result<Self, Seq2SeqError> {
        if sequences.is_empty() {
            return Err(Seq2SeqError::InvalidArgument(
                "批次中至少需要1条序列".to_string(),
            ));
        }
        let lengths = sequences.iter().map(Vec::len).collect::<Vec<_>>();
        let max_len = lengths.iter().copied().max().unwrap_or(0);
        let mut ids = Array2::from_elem((sequences.len(), max_len), pad_id);
        for (row, seq) in sequences.iter().enumerate() {
            for (col, &id) in seq.iter().enumerate() {
                ids[[row, col]] = id;
            }
        }
        Ok(Self { ids, lengths })
    }

    pub fn batch_size(&self) -> usize {
        self.ids.nrows()
    }

    /// 补齐后的宽度
    pub fn max_len(&self) -> usize {
        self.ids.ncols()
    }

    /// 真实长度中的最大值
    pub fn max_true_length(&self) -> usize {
        self.lengths.iter().copied().max().unwrap_or(0)
    }

    /// 第`t`个时间步上各样本的id
    pub fn column(&self, t: usize) -> Vec<usize> {
        self.ids.column(t).to_vec()
    }
}

/// 一次构建所需的全部输入
#[derive(Debug, Clone)]
pub struct ModelInputs {
    pub source: TokenBatch,
    pub target: TokenBatch,
    /// 目标真实长度的最大值（对 target 长度做 reduce max）
    pub max_target_length: usize,
}

impl ModelInputs {
    pub fn batch_size(&self) -> usize {
        self.source.batch_size()
    }
}

/// 组装模型输入，源/目标批大小不一致时报错
pub fn model_inputs(source: TokenBatch, target: TokenBatch) -> Result<ModelInputs, Seq2SeqError> {
    if source.batch_size() != target.batch_size() {
        return Err(Seq2SeqError::BatchMismatch {
            expected: source.batch_size(),
            got: target.batch_size(),
            what: "源批次与目标批次的大小".to_string(),
        });
    }
    let max_target_length = target.max_true_length();
    Ok(ModelInputs {
        source,
        target,
        max_target_length,
    })
}

/// 生成 teacher forcing 的解码器输入：去掉每条目标序列的最后一个 token，并在开头补`<GO>`
///
/// 输出与输入同形：`out[:, 0] = <GO>`，`out[:, 1..] = target[:, ..len-1]`
pub fn process_decoder_input(
    target_ids: &Array2<usize>,
    vocab: &Vocab,
    batch_size: usize,
) -> Result<Array2<usize>, Seq2SeqError> {
    if target_ids.nrows() != batch_size {
        return Err(Seq2SeqError::BatchMismatch {
            expected: batch_size,
            got: target_ids.nrows(),
            what: "目标批次的大小".to_string(),
        });
    }
    let go = vocab.go_id()?;
    let width = target_ids.ncols();
    let mut decoder_input = Array2::from_elem((batch_size, width), go);
    if width > 1 {
        decoder_input
            .slice_mut(s![.., 1..])
            .assign(&target_ids.slice(s![.., ..width - 1]));
    }
    Ok(decoder_input)
}

/// 序列掩码 [batch, max_len]：位置 t < lengths[b] 时为1，否则为0
pub fn sequence_mask(lengths: &[usize], max_len: usize) -> Tensor {
    let data = lengths
        .iter()
        .flat_map(|&len| (0..max_len).map(move |t| if t < len { 1.0 } else { 0.0 }))
        .collect::<Vec<_>>();
    Tensor::new(&data, &[lengths.len(), max_len])
}

