/*
 * @Author       : 老董
 * @Date         : 2026-02-13
 * @Description  : 解码器：同一套参数（嵌入、多层 LSTM、投影层）提供两种解码方式
 *
 * - `decode_with_teacher_forcing`：每步输入真实的上一个 token（训练用）
 * - `decode_greedily`：每步输入模型自己上一步得分最高的 token（推理用）
 */

use ndarray::Array2;

use super::mask::RowMask;
use super::{Seq2SeqConfig, Seq2SeqError};
use crate::nn::{
    Embedding, Graph, GraphError, Init, Linear, LstmState, Module, StackedLstm, Var, VarShapeOps,
};

/// teacher forcing 解码输出
#[derive(Debug, Clone)]
pub struct TrainingDecoderOutput {
    /// [batch, T, vocab]，T 为本批目标真实长度的最大值；填充位置为0
    pub logits: Var,
    pub lengths: Vec<usize>,
}

impl TrainingDecoderOutput {
    /// 每个位置得分最高的 id [batch, T]（需先对`logits`做过前向传播）
    pub fn sample_ids(&self) -> Result<Array2<usize>, Seq2SeqError> {
        let value = self.logits.value()?.ok_or_else(|| {
            GraphError::ComputationError("teacher forcing 的logits尚未前向计算".to_string())
        })?;
        let shape = value.shape();
        let (batch, steps) = (shape[0], shape[1]);
        Array2::from_shape_vec((batch, steps), value.argmax_last_axis())
            .map_err(|e| Seq2SeqError::InvalidArgument(e.to_string()))
    }

    /// 同`sample_ids`，但每个样本真实长度之后的位置填为`pad_id`，与补齐后的目标逐位置可比
    pub fn sample_ids_padded(&self, pad_id: usize) -> Result<Array2<usize>, Seq2SeqError> {
        let mut ids = self.sample_ids()?;
        for (mut row, &len) in ids.rows_mut().into_iter().zip(&self.lengths) {
            row.iter_mut().skip(len).for_each(|id| *id = pad_id);
        }
        Ok(ids)
    }
}

/// 贪心解码输出
#[derive(Debug, Clone)]
pub struct InferenceDecoderOutput {
    /// [batch, T', vocab]，T' ≤ max_len；已结束样本的后续位置保持结束时的值
    pub logits: Var,
    /// [batch, T']，已结束样本的后续位置重复其最后一个 id（即`<EOS>`）
    pub sample_ids: Array2<usize>,
    /// 各样本实际生成的长度（含`<EOS>`）
    pub lengths: Vec<usize>,
}

pub struct Decoder {
    embedding: Embedding,
    cells: StackedLstm,
    projection: Linear,
    vocab_size: usize,
}

impl Decoder {
    /// 嵌入表在 [0, 1) 上均匀初始化，LSTM 权重在 [-init_range, init_range] 上均匀初始化，
    /// 投影层权重取截断正态分布 (0, 0.1)
    pub fn new(
        graph: &Graph,
        target_vocab_size: usize,
        config: &Seq2SeqConfig,
    ) -> Result<Self, GraphError> {
        let embedding = Embedding::new(
            graph,
            target_vocab_size,
            config.decoding_embedding_size,
            Init::Uniform { min: 0.0, max: 1.0 },
            "decoder_embedding",
        )?;
        let cells = StackedLstm::new(
            graph,
            config.decoding_embedding_size,
            config.rnn_size,
            config.num_layers,
            Init::Uniform {
                min: -config.init_range,
                max: config.init_range,
            },
            "decoder_lstm",
        )?;
        let projection = Linear::with_init(
            graph,
            config.rnn_size,
            target_vocab_size,
            true,
            Init::TruncatedNormal {
                mean: 0.0,
                std: 0.1,
            },
            "decoder_projection",
        )?;
        Ok(Self {
            embedding,
            cells,
            projection,
            vocab_size: target_vocab_size,
        })
    }

    /// 初始状态须每层一个，且每层的 h/c 行数等于批大小（否则会被广播成错误的批次）
    fn check_initial_state(
        &self,
        initial_state: &[LstmState],
        batch_size: usize,
    ) -> Result<(), Seq2SeqError> {
        if initial_state.len() != self.cells.num_layers() {
            return Err(Seq2SeqError::BatchMismatch {
                expected: self.cells.num_layers(),
                got: initial_state.len(),
                what: "编码器终态的层数".to_string(),
            });
        }
        for (layer, state) in initial_state.iter().enumerate() {
            for (part, var) in [("h", &state.h), ("c", &state.c)] {
                let rows = var.shape()?[0];
                if rows != batch_size {
                    return Err(Seq2SeqError::BatchMismatch {
                        expected: batch_size,
                        got: rows,
                        what: format!("第{layer}层初始状态{part}的批大小"),
                    });
                }
            }
        }
        Ok(())
    }

    /// teacher forcing 解码
    ///
    /// # 参数
    /// - `initial_state`: 编码器终态（每层一个）
    /// - `decoder_input`: [batch, ≥T]，由 `process_decoder_input` 得到
    /// - `lengths`: 各样本的目标真实长度，T = max(lengths)
    /// - `keep_prob`: dropout 保留概率
    pub fn decode_with_teacher_forcing(
        &self,
        graph: &Graph,
        initial_state: &[LstmState],
        decoder_input: &Array2<usize>,
        lengths: &[usize],
        keep_prob: f32,
    ) -> Result<TrainingDecoderOutput, Seq2SeqError> {
        self.check_initial_state(initial_state, decoder_input.nrows())?;
        if lengths.len() != decoder_input.nrows() {
            return Err(Seq2SeqError::BatchMismatch {
                expected: decoder_input.nrows(),
                got: lengths.len(),
                what: "目标长度的个数".to_string(),
            });
        }
        let steps = lengths.iter().copied().max().unwrap_or(0);
        if steps == 0 || steps > decoder_input.ncols() {
            return Err(Seq2SeqError::InvalidArgument(format!(
                "目标最大长度{steps}须在[1, {}]内",
                decoder_input.ncols()
            )));
        }

        let mut states = initial_state.to_vec();
        let mut step_logits = Vec::with_capacity(steps);
        for t in 0..steps {
            let ids = decoder_input.column(t).to_vec();
            let x_t = self.embedding.forward_step(&ids)?;
            let (output, next_states) = self.cells.step(&x_t, &states, keep_prob)?;
            let logits = self.projection.forward(&output)?;
            match RowMask::from_lengths(graph, lengths, t)? {
                None => {
                    step_logits.push(logits);
                    states = next_states;
                }
                Some(mask) => {
                    step_logits.push(mask.zero_inactive(&logits)?);
                    states = mask.blend_states(&next_states, &states)?;
                }
            }
        }

        tracing::debug!(
            batch_size = lengths.len(),
            steps,
            "teacher forcing 解码器已展开"
        );
        Ok(TrainingDecoderOutput {
            logits: Var::stack(&step_logits, 1)?,
            lengths: lengths.to_vec(),
        })
    }

    /// 贪心解码：第0步输入`<GO>`，之后每步输入上一步得分最高的 id。
    /// 每个样本输出`<EOS>`后即结束并保持不变；全部结束或达到`max_len`时停止。
    /// 不使用 dropout
    pub fn decode_greedily(
        &self,
        graph: &Graph,
        initial_state: &[LstmState],
        go_id: usize,
        eos_id: usize,
        batch_size: usize,
        max_len: usize,
    ) -> Result<InferenceDecoderOutput, Seq2SeqError> {
        self.check_initial_state(initial_state, batch_size)?;
        if max_len == 0 {
            return Err(Seq2SeqError::InvalidArgument(
                "贪心解码的最大长度须大于0".to_string(),
            ));
        }

        let mut states = initial_state.to_vec();
        let mut input_ids = vec![go_id; batch_size];
        let mut finished = vec![false; batch_size];
        let mut lengths = vec![0; batch_size];
        let mut step_logits: Vec<Var> = Vec::with_capacity(max_len);
        let mut step_ids: Vec<Vec<usize>> = Vec::with_capacity(max_len);

        for t in 0..max_len {
            let x_t = self.embedding.forward_step(&input_ids)?;
            let (output, next_states) = self.cells.step(&x_t, &states, 1.0)?;
            let logits = self.projection.forward(&output)?;
            if t == 0 {
                logits.forward()?;
            } else {
                logits.forward_continue()?;
            }
            let value = logits.value()?.ok_or_else(|| {
                GraphError::ComputationError("贪心解码的logits未能前向计算".to_string())
            })?;
            let mut next_ids = value.argmax_last_axis();

            let active = finished.iter().map(|&f| !f).collect::<Vec<_>>();
            let prev_logits = step_logits.last().cloned();
            match (RowMask::from_active(graph, &active)?, prev_logits) {
                (Some(mask), Some(prev_logits)) => {
                    step_logits.push(mask.blend(&logits, &prev_logits)?);
                    states = mask.blend_states(&next_states, &states)?;
                }
                _ => {
                    step_logits.push(logits);
                    states = next_states;
                }
            }

            for (row, id) in next_ids.iter_mut().enumerate() {
                if finished[row] {
                    *id = input_ids[row];
                } else {
                    lengths[row] = t + 1;
                    finished[row] = *id == eos_id;
                }
            }
            step_ids.push(next_ids.clone());
            input_ids = next_ids;

            if finished.iter().all(|&f| f) {
                if t + 1 < max_len {
                    tracing::debug!(steps = t + 1, max_len, "贪心解码提前结束");
                }
                break;
            }
        }

        let steps = step_ids.len();
        let sample_ids = Array2::from_shape_fn((batch_size, steps), |(b, t)| step_ids[t][b]);
        Ok(InferenceDecoderOutput {
            logits: Var::stack(&step_logits, 1)?,
            sample_ids,
            lengths,
        })
    }

    pub const fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    pub const fn embedding(&self) -> &Embedding {
        &self.embedding
    }

    pub const fn projection(&self) -> &Linear {
        &self.projection
    }
}

impl Module for Decoder {
    fn parameters(&self) -> Vec<Var> {
        [
            self.embedding.parameters(),
            self.cells.parameters(),
            self.projection.parameters(),
        ]
        .concat()
    }
}
