/*
 * @Author       : 老董
 * @Description  : Dropout 节点测试
 */

use approx::assert_abs_diff_eq;

use crate::assert_err;
use crate::nn::{Graph, GraphError, VarRegularizeOps};
use crate::tensor::Tensor;

#[test]
fn test_dropout_train_mode_scales_kept_elements() {
    let graph = Graph::new_with_seed(11);
    let x = graph.ones(&[1, 2000]).unwrap();
    let y = x.dropout(0.8).unwrap();
    y.forward().unwrap();

    let values = y.value().unwrap().unwrap().to_vec();
    let kept = values.iter().filter(|v| **v != 0.0).count();
    assert!(values.iter().all(|v| *v == 0.0 || (*v - 1.25).abs() < 1e-6));
    // 保留比例接近 keep_prob，期望值保持为1
    assert_abs_diff_eq!(kept as f32 / 2000.0, 0.8, epsilon = 0.05);
    let mean = values.iter().sum::<f32>() / 2000.0;
    assert_abs_diff_eq!(mean, 1.0, epsilon = 0.07);
}

#[test]
fn test_dropout_eval_mode_is_identity() {
    let graph = Graph::new_with_seed(12);
    let data = Tensor::uniform_seeded(-1.0, 1.0, &[4, 5], 3);
    let x = graph.input(&data).unwrap();
    let y = x.dropout(0.3).unwrap();

    graph.eval();
    y.forward().unwrap();
    assert_eq!(y.value().unwrap().unwrap().to_vec(), data.to_vec());

    // 切回训练模式后，已创建的节点同样生效
    graph.train();
    y.forward().unwrap();
    assert_ne!(y.value().unwrap().unwrap().to_vec(), data.to_vec());
}

#[test]
fn test_dropout_keep_prob_one_is_identity() {
    let graph = Graph::new_with_seed(13);
    let data = Tensor::uniform_seeded(-1.0, 1.0, &[3, 3], 4);
    let y = graph.input(&data).unwrap().dropout(1.0).unwrap();
    y.forward().unwrap();
    assert_eq!(y.value().unwrap().unwrap().to_vec(), data.to_vec());
}

#[test]
fn test_dropout_rejects_invalid_keep_prob() {
    let graph = Graph::new();
    let x = graph.ones(&[2, 2]).unwrap();
    assert_err!(x.dropout(0.0), GraphError::InvalidOperation(_));
    assert_err!(x.dropout(1.5), GraphError::InvalidOperation(_));
}

#[test]
fn test_dropout_grad_uses_forward_mask() {
    let graph = Graph::new_with_seed(14);
    let w = graph.parameter(&[1, 50], crate::nn::Init::Ones, "w").unwrap();
    let dropped = w.dropout(0.5).unwrap();
    let labels = graph.zeros(&[1, 50]).unwrap();
    let loss = crate::nn::VarLossOps::sigmoid_cross_entropy(&dropped, &labels).unwrap();
    loss.backward().unwrap();

    let mask = dropped.value().unwrap().unwrap().to_vec();
    let grad = w.grad().unwrap().unwrap().to_vec();
    for (m, g) in mask.iter().zip(grad) {
        assert_eq!(*m == 0.0, g == 0.0);
    }
}
