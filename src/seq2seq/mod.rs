/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : 序列到序列（seq2seq）翻译模型
 *
 * 数据流：Vocab → Encoder → process_decoder_input → {teacher forcing 解码, 贪心解码} → logits
 * 两种解码方式由同一个 `Decoder` 对象提供，共享同一套参数。
 */

mod batch;
mod config;
mod decoder;
mod encoder;
mod error;
mod mask;
pub mod metrics;
mod model;
mod train;
mod vocab;

#[cfg(test)]
mod tests;

pub use batch::{ModelInputs, TokenBatch, model_inputs, process_decoder_input, sequence_mask};
pub use config::Seq2SeqConfig;
pub use decoder::{Decoder, InferenceDecoderOutput, TrainingDecoderOutput};
pub use encoder::{Encoder, EncoderOutput};
pub use error::{Seq2SeqError, VocabError};
pub use model::{Seq2Seq, sequence_loss};
pub use train::{Seq2SeqTrainer, TrainStepReport};
pub use vocab::{EOS, GO, PAD, UNK, Vocab, sentence_to_seq, text_to_ids};
