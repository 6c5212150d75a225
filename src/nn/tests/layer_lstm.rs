/*
 * @Author       : 老董
 * @Description  : LstmCell / StackedLstm 测试
 */

use approx::assert_abs_diff_eq;

use crate::assert_err;
use crate::nn::{Graph, GraphError, Init, LstmCell, LstmState, Module, StackedLstm};
use crate::tensor::Tensor;

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[test]
fn test_lstm_cell_forget_bias_with_zero_weights() {
    let graph = Graph::new();
    let cell = LstmCell::new(&graph, 3, 2, Init::Zeros, "cell").unwrap();
    assert_eq!(cell.num_params(), 4 * (3 * 2 + 2 * 2 + 2));

    let x = graph.input(&Tensor::ones(&[1, 3])).unwrap();
    let state = LstmState {
        h: graph.zeros(&[1, 2]).unwrap(),
        c: graph.input(&Tensor::full(2.0, &[1, 2])).unwrap(),
    };
    let next = cell.step(&x, &state).unwrap();
    next.h.forward().unwrap();

    // 权重为0：i=o=σ(0)，f=σ(1)，g=tanh(0)=0
    let c = sigmoid(1.0) * 2.0;
    let h = 0.5 * c.tanh();
    for v in next.c.value().unwrap().unwrap().to_vec() {
        assert_abs_diff_eq!(v, c, epsilon = 1e-6);
    }
    for v in next.h.value().unwrap().unwrap().to_vec() {
        assert_abs_diff_eq!(v, h, epsilon = 1e-6);
    }
}

#[test]
fn test_stacked_lstm_shapes_and_names() {
    let graph = Graph::new_with_seed(2);
    let init = Init::Uniform { min: -0.1, max: 0.1 };
    let lstm = StackedLstm::new(&graph, 5, 4, 2, init, "enc").unwrap();
    assert_eq!(lstm.num_layers(), 2);
    assert_eq!(lstm.hidden_size(), 4);
    // 第一层输入为5维，第二层输入为上一层的4维
    assert_eq!(lstm.cells()[0].input_size(), 5);
    assert_eq!(lstm.cells()[1].input_size(), 4);
    assert_eq!(
        lstm.num_params(),
        4 * (5 * 4 + 4 * 4 + 4) + 4 * (4 * 4 + 4 * 4 + 4)
    );
    assert!(graph.inner().get_node_name(lstm.parameters()[0].node_id()).unwrap().starts_with("enc_l0"));

    let states = lstm.zero_state(&graph, 3).unwrap();
    assert_eq!(states.len(), 2);
    let x = graph.input(&Tensor::ones(&[3, 5])).unwrap();
    let (out, next) = lstm.step(&x, &states, 1.0).unwrap();
    assert_eq!(out.shape().unwrap(), vec![3, 4]);
    assert_eq!(next.len(), 2);
    out.forward().unwrap();

    // 输出即最上层的 h
    next[1].h.forward().unwrap();
    assert_eq!(
        out.value().unwrap().unwrap().to_vec(),
        next[1].h.value().unwrap().unwrap().to_vec()
    );
}

#[test]
fn test_stacked_lstm_requires_layers() {
    let graph = Graph::new();
    assert_err!(
        StackedLstm::new(&graph, 2, 2, 0, Init::Zeros, "empty").map(|_| ()),
        GraphError::InvalidOperation(_)
    );
}

#[test]
fn test_stacked_lstm_dropout_only_when_keep_prob_below_one() {
    let graph = Graph::new_with_seed(3);
    let lstm = StackedLstm::new(&graph, 2, 2, 1, Init::Zeros, "l").unwrap();
    let states = lstm.zero_state(&graph, 1).unwrap();
    let x = graph.ones(&[1, 2]).unwrap();

    let before = graph.nodes_count();
    lstm.step(&x, &states, 1.0).unwrap();
    let plain = graph.nodes_count() - before;

    let before = graph.nodes_count();
    lstm.step(&x, &states, 0.5).unwrap();
    let with_dropout = graph.nodes_count() - before;
    assert_eq!(with_dropout, plain + 2);
}
