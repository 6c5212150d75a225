/*
 * @Author       : 老董
 * @Date         : 2026-02-16
 * @Description  : seq2seq 端到端测试：在一个小型平行语料上训练，验证损失下降、图规模稳定、可以翻译
 */

use seq2seq_gan::seq2seq::{
    EOS, PAD, Seq2SeqConfig, Seq2SeqError, Seq2SeqTrainer, Vocab, text_to_ids,
};
use std::time::Instant;

const SOURCE_TEXT: &str = "new jersey is quiet in winter
paris is never cold in june
the lemon is yellow
he likes grapes
she dislikes the old car
california is sometimes rainy";

const TARGET_TEXT: &str = "new jersey est calme en hiver
paris est jamais froid en juin
le citron est jaune
il aime les raisins
elle déteste la vieille voiture
californie est parfois pluvieux";

#[test]
fn test_seq2seq_toy_translation() -> Result<(), Seq2SeqError> {
    let start_time = Instant::now();

    // ========== 1. 词表与数据 ==========
    let source_vocab = Vocab::build_from_text(SOURCE_TEXT);
    let target_vocab = Vocab::build_from_text(TARGET_TEXT);
    let (source, target) = text_to_ids(SOURCE_TEXT, TARGET_TEXT, &source_vocab, &target_vocab)?;
    assert_eq!(source.len(), 6);
    let eos = target_vocab.eos_id()?;
    assert!(target.iter().all(|t| t.last() == Some(&eos)));
    println!(
        "源词表 {} 个词，目标词表 {} 个词",
        source_vocab.len(),
        target_vocab.len()
    );

    // ========== 2. 训练 ==========
    let config = Seq2SeqConfig {
        epochs: 120,
        display_step: 50,
        ..Seq2SeqConfig::tiny()
    };
    let mut trainer = Seq2SeqTrainer::new(config, source_vocab, target_vocab.clone())?;
    let nodes_before = trainer.graph().nodes_count();

    let losses = trainer.fit(&source, &target)?;
    let first = losses[0];
    let last = *losses.last().unwrap_or(&f32::MAX);
    println!("首轮损失 {first:.4}，末轮损失 {last:.4}");
    assert!(losses.iter().all(|l| l.is_finite()));
    assert!(last < first * 0.5, "损失没有明显下降：{first} -> {last}");

    // 每步的临时节点都被回收，图中只剩参数
    assert_eq!(trainer.graph().nodes_count(), nodes_before);
    assert_eq!(trainer.steps(), 120 * 2);

    // ========== 3. 翻译 ==========
    let words = trainer.translate("the lemon is yellow")?;
    println!("the lemon is yellow -> {}", words.join(" "));
    assert!(words.len() <= trainer.config().max_decode_length);
    for word in &words {
        assert!(![PAD, EOS].contains(&word.as_str()));
        assert!(target_vocab.id(word).is_some());
    }
    // 词表外的词同样可以翻译
    trainer.translate("the purple elephant")?;
    assert_eq!(trainer.graph().nodes_count(), nodes_before);

    println!("耗时 {:.2}s", start_time.elapsed().as_secs_f32());
    Ok(())
}
