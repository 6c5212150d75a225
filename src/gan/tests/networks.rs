/*
 * @Author       : 老董
 * @Description  : 生成器与判别器测试
 */

use approx::assert_abs_diff_eq;

use crate::gan::{Discriminator, Generator, sample_noise};
use crate::nn::{Graph, Module};

#[test]
fn test_generator_output_shape_and_range() {
    let graph = Graph::new_with_seed(1);
    let generator = Generator::new(&graph, 3, 5, 8, 0.01).unwrap();
    assert_eq!(generator.parameters().len(), 4);
    assert_eq!(generator.num_params(), 3 * 8 + 8 + 8 * 5 + 5);

    let z = graph.input(&sample_noise(7, 3, 11)).unwrap();
    let out = generator.forward(&z).unwrap();
    assert_eq!(out.shape().unwrap(), vec![7, 5]);

    out.forward().unwrap();
    let value = out.value().unwrap().unwrap();
    assert!(value.to_vec().iter().all(|v| v.abs() < 1.0));
}

#[test]
fn test_discriminator_probs_are_sigmoid_of_logits() {
    let graph = Graph::new_with_seed(2);
    let discriminator = Discriminator::new(&graph, 4, 8, 0.01).unwrap();
    let x = graph.input(&sample_noise(5, 4, 3)).unwrap();
    let out = discriminator.forward(&x).unwrap();
    assert_eq!(out.logits.shape().unwrap(), vec![5, 1]);

    out.probs.forward().unwrap();
    let logits = out.logits.value().unwrap().unwrap();
    let probs = out.probs.value().unwrap().unwrap();
    for i in 0..5 {
        let expected = 1.0 / (1.0 + (-logits[[i, 0]]).exp());
        assert_abs_diff_eq!(probs[[i, 0]], expected, epsilon = 1e-6);
    }
}

/// 同一个判别器对象作用于两路输入时不会新建参数
#[test]
fn test_discriminator_reuse_shares_parameters() {
    let graph = Graph::new_with_seed(3);
    let discriminator = Discriminator::new(&graph, 4, 8, 0.01).unwrap();
    let trainable_before = graph.inner().get_trainable_nodes();

    let real = graph.input(&sample_noise(2, 4, 1)).unwrap();
    let fake = graph.input(&sample_noise(2, 4, 2)).unwrap();
    discriminator.forward(&real).unwrap();
    discriminator.forward(&fake).unwrap();

    assert_eq!(graph.inner().get_trainable_nodes(), trainable_before);
}

#[test]
fn test_sample_noise_is_bounded_and_reproducible() {
    let a = sample_noise(10, 4, 9);
    let b = sample_noise(10, 4, 9);
    assert_eq!(a, b);
    assert_eq!(a.shape(), &[10, 4]);
    assert!(a.to_vec().iter().all(|v| (-1.0..=1.0).contains(v)));
}
