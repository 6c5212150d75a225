use approx::assert_abs_diff_eq;

use crate::assert_panic;
use crate::tensor::Tensor;

#[test]
fn test_sum_and_mean() {
    let tensor = Tensor::new(&[1., 2., 3., 4.], &[2, 2]);
    assert_eq!(tensor.sum(), Tensor::new(&[10.], &[1, 1]));
    assert_eq!(tensor.mean(), Tensor::new(&[2.5], &[1, 1]));
    assert_eq!(tensor.sum_axis(0), Tensor::new(&[4., 6.], &[2]));
}

#[test]
fn test_activations() {
    let tensor = Tensor::new(&[0., 1000., -1000.], &[3]);
    let sigmoid = tensor.sigmoid().to_vec();
    assert_abs_diff_eq!(sigmoid[0], 0.5);
    assert_abs_diff_eq!(sigmoid[1], 1.0);
    assert_abs_diff_eq!(sigmoid[2], 0.0);
    let tanh = tensor.tanh().to_vec();
    assert_abs_diff_eq!(tanh[0], 0.0);
    assert_abs_diff_eq!(tanh[1], 1.0);
}

#[test]
fn test_softmax_last_axis() {
    let tensor = Tensor::new(&[1., 2., 3., 1000., 1000., 1000.], &[2, 3]);
    let softmax = tensor.softmax_last_axis();
    let expected = [0.090_030_57, 0.244_728_48, 0.665_240_94];
    for (j, &e) in expected.iter().enumerate() {
        assert_abs_diff_eq!(softmax[[0, j]], e, epsilon = 1e-6);
        assert_abs_diff_eq!(softmax[[1, j]], 1. / 3., epsilon = 1e-6);
    }
}

#[test]
fn test_argmax_last_axis() {
    let tensor = Tensor::new(
        &[0.1, 0.7, 0.2, 0.9, 0.0, 0.1, 0.5, 0.5, 0.0, -1., -2., -0.5],
        &[2, 2, 3],
    );
    // 相同最大值取首个
    assert_eq!(tensor.argmax_last_axis(), vec![1, 0, 0, 2]);
}

#[test]
fn test_one_hot() {
    let tensor = Tensor::one_hot(&[2, 0], &[2], 3);
    assert_eq!(tensor, Tensor::new(&[0., 0., 1., 1., 0., 0.], &[2, 3]));
    assert_panic!(Tensor::one_hot(&[3], &[1], 3));
}

#[test]
fn test_clip() {
    let tensor = Tensor::new(&[-3., 0.5, 2.], &[3]);
    assert_eq!(tensor.clip(-1., 1.), Tensor::new(&[-1., 0.5, 1.], &[3]));
}
