/*
 * @Author       : 老董
 * @Description  : SGD / Adam 优化器测试
 */

use approx::assert_abs_diff_eq;

use crate::nn::{Adam, Graph, Init, Optimizer, SGD, Var};

/// loss = Σ (w * w)，dL/dw = 2w
fn square_loss(graph: &Graph, w: &Var) -> Var {
    let sq = w.try_mul(w).unwrap();
    let ones = graph.ones(&[w.shape().unwrap()[1], 1]).unwrap();
    crate::nn::VarMatrixOps::matmul(&sq, &ones).unwrap()
}

#[test]
fn test_sgd_step() {
    let graph = Graph::new();
    let w = graph.parameter(&[1, 2], Init::Constant(1.0), "w").unwrap();
    let mut sgd = SGD::new(&graph, &[w.clone()], 0.1);

    let loss = sgd.minimize(&square_loss(&graph, &w)).unwrap();
    assert_abs_diff_eq!(loss, 2.0, epsilon = 1e-6);
    for v in w.value().unwrap().unwrap().to_vec() {
        assert_abs_diff_eq!(v, 0.8, epsilon = 1e-6);
    }
}

#[test]
fn test_sgd_grad_clip() {
    let graph = Graph::new();
    let w = graph.parameter(&[1, 1], Init::Constant(10.0), "w").unwrap();
    let mut sgd = SGD::new(&graph, &[w.clone()], 0.1).with_grad_clip(1.0);
    sgd.minimize(&square_loss(&graph, &w)).unwrap();
    // 梯度20被截到1
    assert_abs_diff_eq!(w.value().unwrap().unwrap().to_vec()[0], 9.9, epsilon = 1e-5);
}

#[test]
fn test_adam_first_step_moves_by_learning_rate() {
    let graph = Graph::new();
    let w = graph.parameter(&[1, 2], Init::Zeros, "w").unwrap();
    w.set_value(&crate::tensor::Tensor::new(&[3.0, -0.5], &[1, 2]))
        .unwrap();
    let mut adam = Adam::new(&graph, &[w.clone()], 0.01);
    adam.minimize(&square_loss(&graph, &w)).unwrap();

    // 偏差修正后第一步的步长约为 lr * sign(g)
    let values = w.value().unwrap().unwrap().to_vec();
    assert_abs_diff_eq!(values[0], 2.99, epsilon = 1e-5);
    assert_abs_diff_eq!(values[1], -0.49, epsilon = 1e-5);
}

#[test]
fn test_adam_converges_and_reset() {
    let graph = Graph::new();
    let w = graph.parameter(&[1, 3], Init::Constant(1.0), "w").unwrap();
    let loss = square_loss(&graph, &w);
    let mut adam = Adam::new(&graph, &[w.clone()], 0.1);
    let first = adam.minimize(&loss).unwrap();
    let mut last = first;
    for _ in 0..100 {
        last = adam.minimize(&loss).unwrap();
    }
    assert!(last < first * 0.05);

    adam.set_learning_rate(0.5);
    assert_abs_diff_eq!(adam.learning_rate(), 0.5);
    adam.reset();
    adam.minimize(&loss).unwrap();
}

#[test]
fn test_optimizer_only_updates_bound_params() {
    let graph = Graph::new();
    let a = graph.parameter(&[1, 1], Init::Constant(1.0), "a").unwrap();
    let b = graph.parameter(&[1, 1], Init::Constant(2.0), "b").unwrap();
    let loss = a.try_mul(&b).unwrap();
    let mut sgd = SGD::new(&graph, &[a.clone()], 0.5);
    sgd.minimize(&loss).unwrap();

    assert_abs_diff_eq!(a.value().unwrap().unwrap().to_vec()[0], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(b.value().unwrap().unwrap().to_vec()[0], 2.0, epsilon = 1e-6);
    // 未绑定参数的梯度不会被该优化器清零
    assert!(b.grad().unwrap().is_some());
    sgd.zero_grad().unwrap();
    assert!(a.grad().unwrap().is_none());
    assert!(b.grad().unwrap().is_some());
}
