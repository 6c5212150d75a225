/*
 * @Author       : 老董
 * @Date         : 2026-02-13
 * @Description  : seq2seq 组合：编码一次，两种方式解码，共享同一个编码器终态与解码器参数
 */

use super::{
    Decoder, Encoder, EncoderOutput, InferenceDecoderOutput, ModelInputs, Seq2SeqConfig,
    Seq2SeqError, TokenBatch, TrainingDecoderOutput, Vocab, process_decoder_input, sequence_mask,
};
use crate::nn::{Graph, Module, Var, VarLossOps};
use crate::tensor::Tensor;

/// seq2seq 模型：持有编码器和解码器（两者的参数互不相交）
pub struct Seq2Seq {
    graph: Graph,
    encoder: Encoder,
    decoder: Decoder,
    target_vocab: Vocab,
    go_id: usize,
    eos_id: usize,
}

impl Seq2Seq {
    /// 在`graph`上创建全部参数。目标词表必须含`<GO>`与`<EOS>`
    pub fn new(
        graph: &Graph,
        config: &Seq2SeqConfig,
        source_vocab: &Vocab,
        target_vocab: &Vocab,
    ) -> Result<Self, Seq2SeqError> {
        config.validate()?;
        let go_id = target_vocab.go_id()?;
        let eos_id = target_vocab.eos_id()?;
        let encoder = Encoder::new(graph, source_vocab.size(), config)?;
        let decoder = Decoder::new(graph, target_vocab.size(), config)?;
        tracing::info!(
            source_vocab = source_vocab.size(),
            target_vocab = target_vocab.size(),
            rnn_size = config.rnn_size,
            num_layers = config.num_layers,
            encoder_params = encoder.num_params(),
            decoder_params = decoder.num_params(),
            "seq2seq模型已创建"
        );
        Ok(Self {
            graph: graph.clone(),
            encoder,
            decoder,
            target_vocab: target_vocab.clone(),
            go_id,
            eos_id,
        })
    }

    pub fn encode(&self, source: &TokenBatch, keep_prob: f32) -> Result<EncoderOutput, Seq2SeqError> {
        self.encoder.forward(&self.graph, source, keep_prob)
    }

    /// 只构建 teacher forcing 路径（训练循环使用）
    pub fn build_training(
        &self,
        inputs: &ModelInputs,
        keep_prob: f32,
    ) -> Result<TrainingDecoderOutput, Seq2SeqError> {
        let encoded = self.encode(&inputs.source, keep_prob)?;
        self.decode_training(&encoded, inputs, keep_prob)
    }

    fn decode_training(
        &self,
        encoded: &EncoderOutput,
        inputs: &ModelInputs,
        keep_prob: f32,
    ) -> Result<TrainingDecoderOutput, Seq2SeqError> {
        let decoder_input =
            process_decoder_input(&inputs.target.ids, &self.target_vocab, inputs.batch_size())?;
        self.decoder.decode_with_teacher_forcing(
            &self.graph,
            &encoded.state,
            &decoder_input,
            &inputs.target.lengths,
            keep_prob,
        )
    }

    /// 编码一次，再用同一个终态构建两种解码输出。贪心解码的长度上限为本批目标的最大真实长度
    pub fn build(
        &self,
        inputs: &ModelInputs,
        keep_prob: f32,
    ) -> Result<(TrainingDecoderOutput, InferenceDecoderOutput), Seq2SeqError> {
        let encoded = self.encode(&inputs.source, keep_prob)?;
        let training = self.decode_training(&encoded, inputs, keep_prob)?;
        let inference = self.decoder.decode_greedily(
            &self.graph,
            &encoded.state,
            self.go_id,
            self.eos_id,
            inputs.batch_size(),
            inputs.max_target_length,
        )?;
        Ok((training, inference))
    }

    /// 只编码并贪心解码（无目标序列时使用）
    pub fn infer(
        &self,
        source: &TokenBatch,
        max_len: usize,
    ) -> Result<InferenceDecoderOutput, Seq2SeqError> {
        let encoded = self.encode(source, 1.0)?;
        self.decoder.decode_greedily(
            &self.graph,
            &encoded.state,
            self.go_id,
            self.eos_id,
            source.batch_size(),
            max_len,
        )
    }

    pub fn encoder_parameters(&self) -> Vec<Var> {
        self.encoder.parameters()
    }

    pub fn decoder_parameters(&self) -> Vec<Var> {
        self.decoder.parameters()
    }

    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    pub const fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub const fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub const fn target_vocab(&self) -> &Vocab {
        &self.target_vocab
    }
}

impl Module for Seq2Seq {
    fn parameters(&self) -> Vec<Var> {
        [self.encoder_parameters(), self.decoder_parameters()].concat()
    }
}

/// 按真实长度掩码的平均交叉熵：填充位置不计入损失
pub fn sequence_loss(
    training: &TrainingDecoderOutput,
    targets: &TokenBatch,
) -> Result<Var, Seq2SeqError> {
    let shape = training.logits.shape()?;
    let (batch, steps, vocab) = (shape[0], shape[1], shape[2]);
    if targets.batch_size() != batch {
        return Err(Seq2SeqError::BatchMismatch {
            expected: batch,
            got: targets.batch_size(),
            what: "目标批次的大小".to_string(),
        });
    }
    if targets.max_len() < steps {
        return Err(Seq2SeqError::BatchMismatch {
            expected: steps,
            got: targets.max_len(),
            what: "目标批次的宽度".to_string(),
        });
    }
    if let Some(b) = (0..batch).find(|&b| {
        (0..targets.lengths[b].min(steps)).any(|t| targets.ids[[b, t]] >= vocab)
    }) {
        return Err(Seq2SeqError::InvalidArgument(format!(
            "第{b}条目标序列含有超出词表大小{vocab}的id"
        )));
    }
    // 填充位置不参与损失，其 id 统一记为0
    let ids = (0..batch)
        .flat_map(|b| (0..steps).map(move |t| (b, t)))
        .map(|(b, t)| {
            if t < targets.lengths[b] {
                targets.ids[[b, t]]
            } else {
                0
            }
        })
        .collect::<Vec<_>>();
    let mask = sequence_mask(&targets.lengths, steps);

    let graph = training.logits.get_graph();
    let labels = graph.constant(&Tensor::one_hot(&ids, &[batch, steps], vocab))?;
    let mask = graph.constant(&mask)?;
    Ok(training.logits.sequence_cross_entropy(&labels, &mask)?)
}
