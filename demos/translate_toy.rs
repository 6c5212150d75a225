/*
 * 玩具英法翻译示例
 *
 * 在几句平行语料上训练 seq2seq 模型，然后贪心解码翻译一句话。
 *
 * # 运行
 * ```bash
 * cargo run --example translate_toy
 * # 指定超参数文件（缺省字段取默认值），并打开调试日志
 * RUST_LOG=debug cargo run --example translate_toy -- demos/seq2seq.json
 * ```
 */

use seq2seq_gan::seq2seq::{Seq2SeqConfig, Seq2SeqTrainer, Vocab, text_to_ids};
use std::error::Error;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SOURCE_TEXT: &str = "new jersey is sometimes quiet during autumn
california is usually quiet during march
the united states is never cold in june
paris is relaxing during december
he dislikes grapefruit
she likes the yellow lemon
your least liked fruit is the grape
we like the old car";

const TARGET_TEXT: &str = "new jersey est parfois calme pendant l' automne
california est généralement calme en mars
les états-unis est jamais froid en juin
paris est relaxant en décembre
il déteste le pamplemousse
elle aime le citron jaune
votre fruit est le moins aimé le raisin
nous aimons la vieille voiture";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== 玩具翻译示例 ===\n");

    // 1. 配置
    let config = match std::env::args().nth(1) {
        Some(path) => Seq2SeqConfig::from_json_file(path)?,
        None => Seq2SeqConfig {
            epochs: 150,
            display_step: 40,
            ..Seq2SeqConfig::tiny()
        },
    };
    println!("[1/3] 超参数：\n{}", config.to_json_string()?);

    // 2. 词表与训练
    let source_vocab = Vocab::build_from_text(SOURCE_TEXT);
    let target_vocab = Vocab::build_from_text(TARGET_TEXT);
    let (source, target) = text_to_ids(SOURCE_TEXT, TARGET_TEXT, &source_vocab, &target_vocab)?;
    println!(
        "\n[2/3] 训练：{} 句，源词表 {}，目标词表 {}",
        source.len(),
        source_vocab.len(),
        target_vocab.len()
    );

    let start = Instant::now();
    let mut trainer = Seq2SeqTrainer::new(config, source_vocab, target_vocab)?;
    let losses = trainer.fit(&source, &target)?;
    if let (Some(first), Some(last)) = (losses.first(), losses.last()) {
        println!(
            "  ✓ 损失 {first:.4} -> {last:.4}（{} 步，{:.1}s）",
            trainer.steps(),
            start.elapsed().as_secs_f32()
        );
    }

    // 3. 翻译
    println!("\n[3/3] 翻译：");
    for sentence in [
        "he dislikes grapefruit",
        "paris is relaxing during december",
        "the purple elephant is quiet",
    ] {
        let words = trainer.translate(sentence)?;
        println!("  {sentence}\n    -> {}", words.join(" "));
    }
    Ok(())
}
