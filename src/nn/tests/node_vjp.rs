/*
 * @Author       : 老董
 * @Description  : 各节点 VJP 的数值梯度校验
 */

use approx::assert_abs_diff_eq;

use super::{check_numeric_grad, scalar_loss};
use crate::nn::{
    Graph, Init, Var, VarActivationOps, VarLossOps, VarMatrixOps, VarShapeOps,
};
use crate::tensor::Tensor;

fn normal_param(graph: &Graph, shape: &[usize], name: &str) -> Var {
    graph
        .parameter(shape, Init::Normal { mean: 0.0, std: 1.0 }, name)
        .unwrap()
}

#[test]
fn test_add_broadcast_grad() {
    let graph = Graph::new_with_seed(1);
    let a = normal_param(&graph, &[2, 3], "a");
    let b = normal_param(&graph, &[1, 3], "b");
    let loss = scalar_loss(&graph, &a.try_add(&b).unwrap(), 11);
    check_numeric_grad(&graph, &loss, &[&a, &b]);
}

#[test]
fn test_subtract_grad() {
    let graph = Graph::new_with_seed(2);
    let a = normal_param(&graph, &[2, 3], "a");
    let b = normal_param(&graph, &[1, 3], "b");
    let loss = scalar_loss(&graph, &a.try_sub(&b).unwrap(), 12);
    check_numeric_grad(&graph, &loss, &[&a, &b]);
}

#[test]
fn test_multiply_broadcast_grad() {
    let graph = Graph::new_with_seed(3);
    let a = normal_param(&graph, &[2, 3], "a");
    let b = normal_param(&graph, &[1, 3], "b");
    let loss = scalar_loss(&graph, &a.try_mul(&b).unwrap(), 13);
    check_numeric_grad(&graph, &loss, &[&a, &b]);
}

#[test]
fn test_matmul_grad() {
    let graph = Graph::new_with_seed(4);
    let a = normal_param(&graph, &[2, 3], "a");
    let b = normal_param(&graph, &[3, 4], "b");
    let loss = scalar_loss(&graph, &a.matmul(&b).unwrap(), 14);
    check_numeric_grad(&graph, &loss, &[&a, &b]);
}

#[test]
fn test_sigmoid_and_tanh_grad() {
    let graph = Graph::new_with_seed(5);
    let x = normal_param(&graph, &[2, 3], "x");
    let sig_loss = scalar_loss(&graph, &x.sigmoid().unwrap(), 15);
    check_numeric_grad(&graph, &sig_loss, &[&x]);

    let tanh_loss = scalar_loss(&graph, &x.tanh().unwrap(), 16);
    check_numeric_grad(&graph, &tanh_loss, &[&x]);
}

#[test]
fn test_leaky_relu_grad() {
    let graph = Graph::new();
    let x = graph.parameter(&[2, 2], Init::Zeros, "x").unwrap();
    // 远离0点，避免差分跨过拐点
    x.set_value(&Tensor::new(&[0.5, -0.7, 1.2, -0.3], &[2, 2]))
        .unwrap();
    let y = x.leaky_relu(0.2).unwrap();
    y.forward().unwrap();
    let expected = [0.5, -0.14, 1.2, -0.06];
    for (got, want) in y.value().unwrap().unwrap().to_vec().iter().zip(expected) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-6);
    }

    let loss = scalar_loss(&graph, &y, 17);
    check_numeric_grad(&graph, &loss, &[&x]);
}

#[test]
fn test_select_grad_only_reaches_selected_slice() {
    let graph = Graph::new_with_seed(6);
    let x = normal_param(&graph, &[2, 3, 4], "x");
    let y = x.select(1, 1).unwrap();
    assert_eq!(y.shape().unwrap(), vec![2, 4]);

    let loss = scalar_loss(&graph, &y, 18);
    check_numeric_grad(&graph, &loss, &[&x]);

    let grad = x.grad().unwrap().unwrap();
    for t in [0, 2] {
        assert!(grad.select(1, t).to_vec().iter().all(|g| *g == 0.0));
    }
}

#[test]
fn test_stack_grad() {
    let graph = Graph::new_with_seed(7);
    let a = normal_param(&graph, &[2, 3], "a");
    let b = normal_param(&graph, &[2, 3], "b");
    let stacked = Var::stack(&[a.clone(), b.clone()], 1).unwrap();
    assert_eq!(stacked.shape().unwrap(), vec![2, 2, 3]);

    stacked.forward().unwrap();
    let value = stacked.value().unwrap().unwrap();
    assert_eq!(value.select(1, 1).to_vec(), b.value().unwrap().unwrap().to_vec());

    let loss = scalar_loss(&graph, &stacked, 19);
    check_numeric_grad(&graph, &loss, &[&a, &b]);
}

#[test]
fn test_gather_rows_accumulates_repeated_ids() {
    let graph = Graph::new_with_seed(8);
    let table = normal_param(&graph, &[5, 3], "table");
    let rows = table.gather_rows(&[0, 2, 2, 4], &[2, 2]).unwrap();
    assert_eq!(rows.shape().unwrap(), vec![2, 2, 3]);

    rows.forward().unwrap();
    let table_value = table.value().unwrap().unwrap();
    let rows_value = rows.value().unwrap().unwrap();
    assert_eq!(
        rows_value.select(0, 1).select(0, 0).to_vec(),
        table_value.select(0, 2).to_vec()
    );
    assert_eq!(
        rows_value.select(0, 1).select(0, 1).to_vec(),
        table_value.select(0, 4).to_vec()
    );

    let loss = scalar_loss(&graph, &rows, 20);
    check_numeric_grad(&graph, &loss, &[&table]);

    // 未被查到的行没有梯度
    let grad = table.grad().unwrap().unwrap();
    assert!(grad.select(0, 1).to_vec().iter().all(|g| *g == 0.0));
    assert!(grad.select(0, 3).to_vec().iter().all(|g| *g == 0.0));
}

#[test]
fn test_sequence_cross_entropy_masked_rows_get_no_grad() {
    let graph = Graph::new_with_seed(9);
    let logits = normal_param(&graph, &[2, 3, 4], "logits");
    let labels = graph
        .constant(&Tensor::one_hot(&[0, 1, 2, 3, 3, 0], &[2, 3], 4))
        .unwrap();
    let mask = graph
        .constant(&Tensor::new(&[1.0, 1.0, 0.0, 1.0, 0.0, 0.0], &[2, 3]))
        .unwrap();
    let loss = logits.sequence_cross_entropy(&labels, &mask).unwrap();
    check_numeric_grad(&graph, &loss, &[&logits]);

    let grad = logits.grad().unwrap().unwrap();
    assert!(grad.select(0, 0).select(0, 2).to_vec().iter().all(|g| *g == 0.0));
    assert!(grad.select(0, 1).select(0, 2).to_vec().iter().all(|g| *g == 0.0));
}

#[test]
fn test_cross_entropy_uniform_logits_value() {
    let graph = Graph::new();
    let logits = graph.parameter(&[3, 5], Init::Zeros, "logits").unwrap();
    let labels = graph
        .constant(&Tensor::one_hot(&[0, 4, 2], &[3], 5))
        .unwrap();
    let loss = logits.cross_entropy(&labels).unwrap();
    loss.forward().unwrap();
    assert_abs_diff_eq!(loss.item().unwrap(), 5.0_f32.ln(), epsilon = 1e-5);
}

#[test]
fn test_sigmoid_cross_entropy_grad() {
    let graph = Graph::new_with_seed(10);
    let logits = normal_param(&graph, &[3, 2], "logits");
    let loss = scalar_loss(&graph, &logits, 21);
    check_numeric_grad(&graph, &loss, &[&logits]);
}
