/*
 * @Author       : 老董
 * @Description  : 批次组装、teacher forcing 输入与序列掩码测试
 */

use ndarray::{Array2, array};

use crate::assert_err;
use crate::seq2seq::{
    Seq2SeqError, TokenBatch, Vocab, model_inputs, process_decoder_input, sequence_mask,
};
use crate::tensor::Tensor;

#[test]
fn test_token_batch_padding() {
    let batch = TokenBatch::from_sequences(&[vec![5, 6, 7], vec![8], vec![]], 0).unwrap();
    assert_eq!(batch.ids, array![[5, 6, 7], [8, 0, 0], [0, 0, 0]]);
    assert_eq!(batch.lengths, vec![3, 1, 0]);
    assert_eq!(batch.batch_size(), 3);
    assert_eq!(batch.max_len(), 3);
    assert_eq!(batch.max_true_length(), 3);
    assert_eq!(batch.column(1), vec![6, 0, 0]);

    assert_err!(
        TokenBatch::from_sequences(&[], 0),
        Seq2SeqError::InvalidArgument(_)
    );
}

#[test]
fn test_process_decoder_input_scenario() {
    let vocab = Vocab::from_pairs([
        ("<GO>", 0),
        ("<EOS>", 1),
        ("<UNK>", 2),
        ("hello", 3),
        ("world", 4),
    ])
    .unwrap();
    let out = process_decoder_input(&array![[3, 4, 1]], &vocab, 1).unwrap();
    assert_eq!(out, array![[0, 3, 4]]);
}

#[test]
fn test_process_decoder_input_is_length_preserving() {
    let vocab = Vocab::build_from_text("a b c d");
    let go = vocab.go_id().unwrap();
    let target = array![[4, 5, 6, 1], [7, 1, 0, 0]];
    let out = process_decoder_input(&target, &vocab, 2).unwrap();

    assert_eq!(out.dim(), target.dim());
    for row in 0..2 {
        assert_eq!(out[[row, 0]], go);
        for col in 1..4 {
            assert_eq!(out[[row, col]], target[[row, col - 1]]);
        }
    }

    // 宽度为1时只剩<GO>
    let single = process_decoder_input(&array![[1], [1]], &vocab, 2).unwrap();
    assert_eq!(single, array![[go], [go]]);
}

#[test]
fn test_process_decoder_input_errors() {
    let vocab = Vocab::build_from_text("a b");
    assert_err!(
        process_decoder_input(&array![[4, 1]], &vocab, 2),
        Seq2SeqError::BatchMismatch { expected: 2, got: 1, .. }
    );

    let no_go = Vocab::from_pairs([("<EOS>", 0), ("a", 1)]).unwrap();
    let target: Array2<usize> = array![[1, 0]];
    assert_err!(
        process_decoder_input(&target, &no_go, 1),
        Seq2SeqError::Vocab(crate::seq2seq::VocabError::UnknownKey(_))
    );
}

#[test]
fn test_model_inputs() {
    let source = TokenBatch::from_sequences(&[vec![4, 5], vec![6]], 0).unwrap();
    let target = TokenBatch::from_sequences(&[vec![4, 1], vec![6, 7, 1]], 0).unwrap();
    let inputs = model_inputs(source.clone(), target).unwrap();
    assert_eq!(inputs.max_target_length, 3);
    assert_eq!(inputs.batch_size(), 2);

    let short_target = TokenBatch::from_sequences(&[vec![4, 1]], 0).unwrap();
    assert_err!(
        model_inputs(source, short_target),
        Seq2SeqError::BatchMismatch { expected: 2, got: 1, .. }
    );
}

#[test]
fn test_sequence_mask() {
    let mask = sequence_mask(&[3, 1, 0], 3);
    let expected = Tensor::new(&[1., 1., 1., 1., 0., 0., 0., 0., 0.], &[3, 3]);
    assert_eq!(mask, expected);
}
