/*
 * @Author       : 老董
 * @Date         : 2026-02-14
 * @Description  : 训练循环：Adam + 梯度裁剪，每步结束后回收本步创建的临时节点
 */

use super::metrics::sequence_accuracy;
use super::{
    Seq2Seq, Seq2SeqConfig, Seq2SeqError, TokenBatch, Vocab, model_inputs, sentence_to_seq,
    sequence_loss,
};
use crate::nn::{Adam, Graph, Module, Optimizer};

/// 单步训练的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainStepReport {
    pub loss: f32,
    /// teacher forcing 输出与目标的逐位置准确率
    pub accuracy: f32,
}

/// seq2seq 训练器：拥有计算图、模型与优化器
pub struct Seq2SeqTrainer {
    graph: Graph,
    model: Seq2Seq,
    optimizer: Adam,
    config: Seq2SeqConfig,
    source_vocab: Vocab,
    target_vocab: Vocab,
    source_pad: usize,
    target_pad: usize,
    steps: usize,
}

impl Seq2SeqTrainer {
    /// 新建一张以`config.seed`为种子的计算图并在其上创建模型。两个词表都必须含`<PAD>`
    pub fn new(
        config: Seq2SeqConfig,
        source_vocab: Vocab,
        target_vocab: Vocab,
    ) -> Result<Self, Seq2SeqError> {
        let graph = Graph::with_name_and_seed("seq2seq", config.seed);
        let model = Seq2Seq::new(&graph, &config, &source_vocab, &target_vocab)?;
        let optimizer = Adam::new(&graph, &model.parameters(), config.learning_rate)
            .with_grad_clip(config.grad_clip);
        Ok(Self {
            source_pad: source_vocab.pad_id()?,
            target_pad: target_vocab.pad_id()?,
            graph,
            model,
            optimizer,
            config,
            source_vocab,
            target_vocab,
            steps: 0,
        })
    }

    /// 用一个批次训练一步，返回损失与准确率
    pub fn train_step(
        &mut self,
        source: &[Vec<usize>],
        target: &[Vec<usize>],
    ) -> Result<TrainStepReport, Seq2SeqError> {
        let mark = self.graph.mark();
        let result = self.train_step_inner(source, target);
        let discarded = self.graph.discard_since(mark);
        tracing::trace!(discarded, "回收训练步节点");
        result
    }

    fn train_step_inner(
        &mut self,
        source: &[Vec<usize>],
        target: &[Vec<usize>],
    ) -> Result<TrainStepReport, Seq2SeqError> {
        let inputs = model_inputs(
            TokenBatch::from_sequences(source, self.source_pad)?,
            TokenBatch::from_sequences(target, self.target_pad)?,
        )?;
        self.graph.train();
        let training = self
            .model
            .build_training(&inputs, self.config.keep_probability)?;
        let loss = sequence_loss(&training, &inputs.target)?;
        let loss = self.optimizer.minimize(&loss)?;

        let predicted = training.sample_ids_padded(self.target_pad)?;
        let accuracy = sequence_accuracy(&inputs.target.ids, &predicted, self.target_pad);
        self.steps += 1;
        if self.steps % self.config.display_step == 0 {
            tracing::info!(step = self.steps, loss, accuracy, "训练步");
        } else {
            tracing::debug!(step = self.steps, loss, accuracy, "训练步");
        }
        Ok(TrainStepReport { loss, accuracy })
    }

    /// 按`batch_size`切分并训练一轮，返回各批次损失的平均值
    pub fn train_epoch(
        &mut self,
        source: &[Vec<usize>],
        target: &[Vec<usize>],
    ) -> Result<f32, Seq2SeqError> {
        if source.len() != target.len() {
            return Err(Seq2SeqError::BatchMismatch {
                expected: source.len(),
                got: target.len(),
                what: "源句子数与目标句子数".to_string(),
            });
        }
        let batch_size = self.config.batch_size;
        let mut total = 0.0;
        let mut batches = 0;
        for (src, tgt) in source.chunks(batch_size).zip(target.chunks(batch_size)) {
            total += self.train_step(src, tgt)?.loss;
            batches += 1;
        }
        if batches == 0 {
            return Err(Seq2SeqError::InvalidArgument("训练数据为空".to_string()));
        }
        Ok(total / batches as f32)
    }

    /// 按配置的轮数训练，返回每轮的平均损失
    pub fn fit(
        &mut self,
        source: &[Vec<usize>],
        target: &[Vec<usize>],
    ) -> Result<Vec<f32>, Seq2SeqError> {
        (0..self.config.epochs)
            .map(|epoch| {
                let loss = self.train_epoch(source, target)?;
                tracing::info!(epoch, loss, "一轮训练结束");
                Ok(loss)
            })
            .collect()
    }

    /// 翻译一句话：小写分词查表后贪心解码，返回到`<EOS>`为止的目标词
    pub fn translate(&self, sentence: &str) -> Result<Vec<String>, Seq2SeqError> {
        let ids = sentence_to_seq(sentence, &self.source_vocab)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mark = self.graph.mark();
        let result = self.graph.no_grad_scope(|_| -> Result<Vec<String>, Seq2SeqError> {
            let source = TokenBatch::from_sequences(&[ids], self.source_pad)?;
            let output = self.model.infer(&source, self.config.max_decode_length)?;
            let row = output.sample_ids.row(0).to_vec();
            Ok(self.target_vocab.ids_to_words(&row))
        });
        self.graph.discard_since(mark);
        result
    }

    pub const fn model(&self) -> &Seq2Seq {
        &self.model
    }

    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    pub const fn config(&self) -> &Seq2SeqConfig {
        &self.config
    }

    pub const fn steps(&self) -> usize {
        self.steps
    }
}
