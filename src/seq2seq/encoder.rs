/*
 * @Author       : 老董
 * @Date         : 2026-02-13
 * @Description  : 编码器：嵌入 + 多层 LSTM，把变长源序列压缩为每层一个终态
 */

use super::mask::RowMask;
use super::{Seq2SeqConfig, Seq2SeqError, TokenBatch};
use crate::nn::{Embedding, Graph, GraphError, Init, LstmState, Module, StackedLstm, Var, VarShapeOps};

/// 编码器输出
#[derive(Debug, Clone)]
pub struct EncoderOutput {
    /// 每个时间步顶层的隐藏状态 [batch, src_len, rnn_size]，填充位置为0
    pub outputs: Var,
    /// 每层的终态（只处理到各样本的真实长度），作为解码器的初始状态
    pub state: Vec<LstmState>,
}

pub struct Encoder {
    embedding: Embedding,
    cells: StackedLstm,
}

impl Encoder {
    /// 嵌入表在 [-1, 1] 上均匀初始化，LSTM 权重在 [-init_range, init_range] 上均匀初始化
    pub fn new(
        graph: &Graph,
        source_vocab_size: usize,
        config: &Seq2SeqConfig,
    ) -> Result<Self, GraphError> {
        let embedding = Embedding::new(
            graph,
            source_vocab_size,
            config.encoding_embedding_size,
            Init::Uniform {
                min: -1.0,
                max: 1.0,
            },
            "encoder_embedding",
        )?;
        let cells = StackedLstm::new(
            graph,
            config.encoding_embedding_size,
            config.rnn_size,
            config.num_layers,
            Init::Uniform {
                min: -config.init_range,
                max: config.init_range,
            },
            "encoder_lstm",
        )?;
        Ok(Self { embedding, cells })
    }

    /// 逐时间步展开编码器。超过样本真实长度的位置不更新状态，输出置0
    pub fn forward(
        &self,
        graph: &Graph,
        source: &TokenBatch,
        keep_prob: f32,
    ) -> Result<EncoderOutput, Seq2SeqError> {
        let src_len = source.max_len();
        if src_len == 0 {
            return Err(Seq2SeqError::InvalidArgument(
                "源序列批次的宽度为0".to_string(),
            ));
        }
        let embedded = self.embedding.forward(&source.ids)?;
        let mut states = self.cells.zero_state(graph, source.batch_size())?;
        let mut outputs = Vec::with_capacity(src_len);

        for t in 0..src_len {
            let x_t = embedded.select(1, t)?;
            let (output, next_states) = self.cells.step(&x_t, &states, keep_prob)?;
            match RowMask::from_lengths(graph, &source.lengths, t)? {
                None => {
                    outputs.push(output);
                    states = next_states;
                }
                Some(mask) => {
                    outputs.push(mask.zero_inactive(&output)?);
                    states = mask.blend_states(&next_states, &states)?;
                }
            }
        }

        tracing::debug!(
            batch_size = source.batch_size(),
            src_len,
            layers = self.cells.num_layers(),
            "编码器已展开"
        );
        Ok(EncoderOutput {
            outputs: Var::stack(&outputs, 1)?,
            state: states,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.cells.hidden_size()
    }

    pub fn num_layers(&self) -> usize {
        self.cells.num_layers()
    }
}

impl Module for Encoder {
    fn parameters(&self) -> Vec<Var> {
        [self.embedding.parameters(), self.cells.parameters()].concat()
    }
}
