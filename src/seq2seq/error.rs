/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : seq2seq 的错误类型
 */

use thiserror::Error;

use crate::config::ConfigError;
use crate::nn::GraphError;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VocabError {
    /// 必需的标记（如`<GO>`、`<EOS>`、`<UNK>`）不在词表中
    #[error("词表中缺少必需的键{0}")]
    UnknownKey(String),

    #[error("词表中id {id}同时对应了`{first}`和`{second}`")]
    DuplicateId {
        id: usize,
        first: String,
        second: String,
    },
}

#[derive(Error, Debug)]
pub enum Seq2SeqError {
    #[error(transparent)]
    Vocab(#[from] VocabError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 源/目标批次等构建期形状不一致
    #[error("{what}不一致：预期{expected}，实际为{got}")]
    BatchMismatch {
        expected: usize,
        got: usize,
        what: String,
    },

    #[error("参数无效: {0}")]
    InvalidArgument(String),
}
