/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : seq2seq 超参数
 */

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{
    self, ConfigError, ensure_keep_prob, ensure_positive_rate, ensure_positive_size,
};

/// seq2seq 超参数（JSON 中缺省的字段取默认值）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Seq2SeqConfig {
    /// 训练轮数
    pub epochs: usize,
    pub batch_size: usize,
    /// LSTM 隐藏层宽度
    pub rnn_size: usize,
    /// LSTM 层数
    pub num_layers: usize,
    pub encoding_embedding_size: usize,
    pub decoding_embedding_size: usize,
    pub learning_rate: f32,
    /// 训练时 dropout 的保留概率
    pub keep_probability: f32,
    /// 逐元素梯度裁剪阈值
    pub grad_clip: f32,
    /// LSTM 权重在 [-init_range, init_range] 上均匀初始化
    pub init_range: f32,
    /// `translate` 时贪心解码的最大长度
    pub max_decode_length: usize,
    /// 每隔多少个批次打一次日志
    pub display_step: usize,
    pub seed: u64,
}

impl Default for Seq2SeqConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            batch_size: 128,
            rnn_size: 256,
            num_layers: 2,
            encoding_embedding_size: 200,
            decoding_embedding_size: 200,
            learning_rate: 0.001,
            keep_probability: 0.5,
            grad_clip: 1.0,
            init_range: 0.1,
            max_decode_length: 25,
            display_step: 10,
            seed: 7,
        }
    }
}

impl Seq2SeqConfig {
    /// 用于单元测试和示例的小配置
    pub fn tiny() -> Self {
        Self {
            epochs: 1,
            batch_size: 4,
            rnn_size: 16,
            num_layers: 1,
            encoding_embedding_size: 8,
            decoding_embedding_size: 8,
            learning_rate: 0.01,
            keep_probability: 1.0,
            max_decode_length: 8,
            display_step: 1,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        config::from_json_str(json, Self::validate)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        config::from_json_file(path, Self::validate)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        config::to_json_string(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive_size("epochs", self.epochs)?;
        ensure_positive_size("batch_size", self.batch_size)?;
        ensure_positive_size("rnn_size", self.rnn_size)?;
        ensure_positive_size("num_layers", self.num_layers)?;
        ensure_positive_size("encoding_embedding_size", self.encoding_embedding_size)?;
        ensure_positive_size("decoding_embedding_size", self.decoding_embedding_size)?;
        ensure_positive_size("max_decode_length", self.max_decode_length)?;
        ensure_positive_size("display_step", self.display_step)?;
        ensure_positive_rate("learning_rate", self.learning_rate)?;
        ensure_positive_rate("grad_clip", self.grad_clip)?;
        ensure_positive_rate("init_range", self.init_range)?;
        ensure_keep_prob("keep_probability", self.keep_probability)
    }
}
