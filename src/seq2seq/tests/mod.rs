mod batch;
mod config;
mod decoder;
mod metrics;

use crate::nn::Graph;
use crate::seq2seq::{Seq2Seq, Seq2SeqConfig, Vocab};

/// 测试共用：小词表、小配置、同一种子的模型
fn toy_vocab() -> Vocab {
    Vocab::build_from_text("hello world new jersey is sometimes quiet")
}

fn toy_model(seed: u64) -> (Graph, Seq2Seq, Vocab) {
    let vocab = toy_vocab();
    let graph = Graph::new_with_seed(seed);
    let model = Seq2Seq::new(&graph, &Seq2SeqConfig::tiny(), &vocab, &vocab).unwrap();
    (graph, model, vocab)
}
