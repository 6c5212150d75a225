use crate::assert_panic;
use crate::tensor::Tensor;

#[test]
fn test_mat_mul() {
    let a = Tensor::new(&[1.0, 2.0, 3.0], &[1, 3]);
    let b = Tensor::new(&[4.0, 5.0, 6.0], &[3, 1]);
    assert_eq!(a.mat_mul(&b), Tensor::new(&[32.0], &[1, 1]));
    assert_eq!(
        b.mat_mul(&a),
        Tensor::new(&[4.0, 8.0, 12.0, 5.0, 10.0, 15.0, 6.0, 12.0, 18.0], &[3, 3])
    );

    let m = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let v = Tensor::new(&[5.0, 6.0], &[2, 1]);
    assert_eq!(m.mat_mul(&v), Tensor::new(&[17.0, 39.0], &[2, 1]));
}

#[test]
fn test_mat_mul_shape_mismatch() {
    let a = Tensor::new(&[1.0, 2.0, 3.0], &[1, 3]);
    assert_panic!(a.mat_mul(&a));
    let c = Tensor::new(&[1.0, 2.0, 3.0], &[3]);
    assert_panic!(c.mat_mul(&a));
}
