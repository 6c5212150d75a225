/*
 * @Author       : 老董
 * @Description  : 解码器测试
 *
 * 1. teacher forcing：时间维等于目标最大真实长度，填充位置输出为0
 * 2. 贪心解码：长度不超过上限，结束的样本保持不变，全部结束时提前停止
 * 3. 初始状态的批大小与解码批次不一致时报错，而不是被广播
 */

use ndarray::array;

use super::toy_model;
use crate::assert_err;
use crate::nn::{Graph, LstmState};
use crate::seq2seq::{Seq2Seq, Seq2SeqError, TokenBatch, Vocab, model_inputs};
use crate::tensor::Tensor;

const RNN_SIZE: usize = 16;

// ==================== teacher forcing ====================

#[test]
fn test_teacher_forcing_time_dim_and_padding() {
    let (_graph, model, vocab) = toy_model(11);
    let source = TokenBatch::from_sequences(&[vec![4, 5], vec![6, 7, 8]], 0).unwrap();
    let target = TokenBatch::from_sequences(&[vec![4, 5, 1], vec![6, 1]], 0).unwrap();
    let inputs = model_inputs(source, target).unwrap();

    let training = model.build_training(&inputs, 1.0).unwrap();
    assert_eq!(training.logits.shape().unwrap(), vec![2, 3, vocab.size()]);
    assert_eq!(training.lengths, vec![3, 2]);

    training.logits.forward().unwrap();
    let logits = training.logits.value().unwrap().unwrap();
    assert!((0..vocab.size()).all(|k| logits[[1, 2, k]] == 0.0));
    assert!((0..vocab.size()).any(|k| logits[[0, 2, k]] != 0.0));

    let sample_ids = training.sample_ids().unwrap();
    assert_eq!(sample_ids.dim(), (2, 3));
    assert_eq!(sample_ids[[1, 2]], 0);

    // 填充位置按给定的`<PAD>` id 补齐，真实位置不变
    let padded = training.sample_ids_padded(9).unwrap();
    assert_eq!(padded[[1, 2]], 9);
    assert_eq!(padded.row(0), sample_ids.row(0));
    assert_eq!(padded[[1, 0]], sample_ids[[1, 0]]);
    assert_eq!(padded[[1, 1]], sample_ids[[1, 1]]);
}

#[test]
fn test_teacher_forcing_full_length_batch_has_no_padding() {
    let (_graph, model, vocab) = toy_model(12);
    let source = TokenBatch::from_sequences(&[vec![4], vec![6, 7]], 0).unwrap();
    let target = TokenBatch::from_sequences(&[vec![4, 1], vec![5, 1]], 0).unwrap();
    let inputs = model_inputs(source, target).unwrap();

    let training = model.build_training(&inputs, 1.0).unwrap();
    training.logits.forward().unwrap();
    let logits = training.logits.value().unwrap().unwrap();
    for b in 0..2 {
        for t in 0..2 {
            assert!((0..vocab.size()).any(|k| logits[[b, t, k]] != 0.0));
        }
    }
}

#[test]
fn test_teacher_forcing_argument_errors() {
    let (graph, model, _) = toy_model(13);
    let state = vec![LstmState::zeros(&graph, 2, RNN_SIZE).unwrap()];
    let decoder_input = array![[3, 4], [3, 5]];

    assert_err!(
        model
            .decoder()
            .decode_with_teacher_forcing(&graph, &state, &decoder_input, &[2], 1.0),
        Seq2SeqError::BatchMismatch { expected: 2, got: 1, .. }
    );
    assert_err!(
        model
            .decoder()
            .decode_with_teacher_forcing(&graph, &state, &decoder_input, &[3, 1], 1.0),
        Seq2SeqError::InvalidArgument(_)
    );
    assert_err!(
        model
            .decoder()
            .decode_with_teacher_forcing(&graph, &[], &decoder_input, &[2, 2], 1.0),
        Seq2SeqError::BatchMismatch { expected: 1, got: 0, .. }
    );
}

// ==================== 贪心解码 ====================

/// 投影层只看隐藏状态的和：和为正时`<EOS>`得分最高，为负时`favored`得分最高
fn steer_projection(model: &Seq2Seq, vocab: &Vocab, favored: usize) {
    let eos = vocab.eos_id().unwrap();
    let size = vocab.size();
    let data = (0..RNN_SIZE)
        .flat_map(|_| {
            (0..size).map(move |k| {
                if k == eos {
                    1.0
                } else if k == favored {
                    -1.0
                } else {
                    0.0
                }
            })
        })
        .collect::<Vec<_>>();
    model
        .decoder()
        .projection()
        .weights()
        .set_value(&Tensor::new(&data, &[RNN_SIZE, size]))
        .unwrap();
}

/// 隐藏状态为0、细胞状态按行取给定符号的初始状态
fn signed_state(graph: &Graph, signs: &[f32]) -> Vec<LstmState> {
    let data = signs
        .iter()
        .flat_map(|&s| std::iter::repeat_n(20.0 * s, RNN_SIZE))
        .collect::<Vec<_>>();
    vec![LstmState {
        h: graph.zeros(&[signs.len(), RNN_SIZE]).unwrap(),
        c: graph
            .constant(&Tensor::new(&data, &[signs.len(), RNN_SIZE]))
            .unwrap(),
    }]
}

#[test]
fn test_greedy_holds_finished_rows_constant() {
    let (graph, model, vocab) = toy_model(21);
    let (go, eos) = (vocab.go_id().unwrap(), vocab.eos_id().unwrap());
    let hello = vocab.id("hello").unwrap();
    steer_projection(&model, &vocab, hello);
    let state = signed_state(&graph, &[1.0, -1.0]);

    let output = model
        .decoder()
        .decode_greedily(&graph, &state, go, eos, 2, 4)
        .unwrap();

    assert_eq!(output.sample_ids, array![[eos, eos, eos, eos], [hello, hello, hello, hello]]);
    assert_eq!(output.lengths, vec![1, 4]);
    assert_eq!(output.logits.shape().unwrap(), vec![2, 4, vocab.size()]);

    output.logits.forward().unwrap();
    let logits = output.logits.value().unwrap().unwrap();
    for t in 1..4 {
        for k in 0..vocab.size() {
            assert_eq!(logits[[0, t, k]], logits[[0, 0, k]]);
        }
    }
}

#[test]
fn test_greedy_stops_when_all_rows_finished() {
    let (graph, model, vocab) = toy_model(22);
    let (go, eos) = (vocab.go_id().unwrap(), vocab.eos_id().unwrap());
    steer_projection(&model, &vocab, vocab.id("world").unwrap());
    let state = signed_state(&graph, &[1.0, 1.0, 1.0]);

    let output = model
        .decoder()
        .decode_greedily(&graph, &state, go, eos, 3, 6)
        .unwrap();
    assert_eq!(output.sample_ids, array![[eos], [eos], [eos]]);
    assert_eq!(output.lengths, vec![1, 1, 1]);
    assert_eq!(output.logits.shape().unwrap(), vec![3, 1, vocab.size()]);
}

#[test]
fn test_greedy_never_exceeds_max_len() {
    let (graph, model, vocab) = toy_model(23);
    let (go, eos) = (vocab.go_id().unwrap(), vocab.eos_id().unwrap());
    steer_projection(&model, &vocab, vocab.id("quiet").unwrap());
    let state = signed_state(&graph, &[-1.0]);

    let output = model
        .decoder()
        .decode_greedily(&graph, &state, go, eos, 1, 3)
        .unwrap();
    assert_eq!(output.sample_ids.ncols(), 3);
    assert_eq!(output.lengths, vec![3]);

    assert_err!(
        model.decoder().decode_greedily(&graph, &state, go, eos, 1, 0),
        Seq2SeqError::InvalidArgument(_)
    );
}

#[test]
fn test_initial_state_batch_must_match() {
    let (graph, model, vocab) = toy_model(24);
    let (go, eos) = (vocab.go_id().unwrap(), vocab.eos_id().unwrap());
    let single = vec![LstmState::zeros(&graph, 1, RNN_SIZE).unwrap()];

    assert_err!(
        model.decoder().decode_greedily(&graph, &single, go, eos, 3, 4),
        Seq2SeqError::BatchMismatch { expected: 3, got: 1, .. }
    );
    assert_err!(
        model
            .decoder()
            .decode_with_teacher_forcing(&graph, &single, &array![[3, 4], [3, 5]], &[2, 2], 1.0),
        Seq2SeqError::BatchMismatch { expected: 2, got: 1, .. }
    );

    // 只有 c 的批大小不对也要报错
    let mixed = vec![LstmState {
        h: graph.zeros(&[2, RNN_SIZE]).unwrap(),
        c: graph.zeros(&[1, RNN_SIZE]).unwrap(),
    }];
    assert_err!(
        model.decoder().decode_greedily(&graph, &mixed, go, eos, 2, 4),
        Seq2SeqError::BatchMismatch { expected: 2, got: 1, .. }
    );
}
