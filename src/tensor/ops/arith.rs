/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @Description  : 张量的四则运算，实现两个张量“逐元素”（或张量与纯数）的加减乘除，并返回一个新的张量。
 *                 1. 其中一个操作数为纯数而另一个为张量：则返回的张量形状与该张量相同。
 *                 2. 两个操作数均为张量：支持 NumPy 风格的广播（broadcasting）。
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::{Tensor, broadcast_shapes};
use std::ops::{Add, Div, Mul, Sub};

/// 为`Tensor`（及其引用）与`Tensor`、`f32`之间生成某个二元运算符的全部组合实现
macro_rules! impl_elementwise_op {
    ($trait:ident, $method:ident, $op:tt, $operator:expr) => {
        /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓f32 与（不）带引用的张量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
        impl $trait<Tensor> for f32 {
            type Output = Tensor;

            fn $method(self, tensor: Tensor) -> Tensor {
                Tensor {
                    data: self $op &tensor.data,
                }
            }
        }
        impl<'a> $trait<&'a Tensor> for f32 {
            type Output = Tensor;

            fn $method(self, tensor: &'a Tensor) -> Tensor {
                Tensor {
                    data: self $op &tensor.data,
                }
            }
        }
        impl $trait<f32> for Tensor {
            type Output = Tensor;

            fn $method(self, scalar: f32) -> Tensor {
                Tensor {
                    data: &self.data $op scalar,
                }
            }
        }
        impl $trait<f32> for &Tensor {
            type Output = Tensor;

            fn $method(self, scalar: f32) -> Tensor {
                Tensor {
                    data: &self.data $op scalar,
                }
            }
        }
        /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑f32 与（不）带引用的张量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

        /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓（不）带引用的张量之间↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
        impl $trait for Tensor {
            type Output = Tensor;

            fn $method(self, other: Tensor) -> Tensor {
                elementwise(&self, &other, $operator, |a, b| a $op b)
            }
        }
        impl<'a> $trait<&'a Tensor> for Tensor {
            type Output = Tensor;

            fn $method(self, other: &'a Tensor) -> Tensor {
                elementwise(&self, other, $operator, |a, b| a $op b)
            }
        }
        impl $trait<Tensor> for &Tensor {
            type Output = Tensor;

            fn $method(self, other: Tensor) -> Tensor {
                elementwise(self, &other, $operator, |a, b| a $op b)
            }
        }
        impl<'b> $trait<&'b Tensor> for &Tensor {
            type Output = Tensor;

            fn $method(self, other: &'b Tensor) -> Tensor {
                elementwise(self, other, $operator, |a, b| a $op b)
            }
        }
        /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑（不）带引用的张量之间↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    };
}

impl_elementwise_op!(Add, add, +, Operator::Add);
impl_elementwise_op!(Sub, sub, -, Operator::Sub);
impl_elementwise_op!(Mul, mul, *, Operator::Mul);
impl_elementwise_op!(Div, div, /, Operator::Div);

/// 两个张量逐元素运算，支持 NumPy 风格广播（broadcasting）
///
/// # 广播规则
/// - 从右向左对齐维度
/// - 每个维度必须相等，或其中一个为 1
/// - 维度数不同时，较短的形状前面补 1
///
/// # Panics
/// 如果形状不兼容（无法广播）
fn elementwise(
    tensor_1: &Tensor,
    tensor_2: &Tensor,
    operator: Operator,
    f: impl Fn(f32, f32) -> f32,
) -> Tensor {
    assert!(
        tensor_1.can_broadcast_with(tensor_2),
        "{}",
        TensorError::OperatorError {
            operator,
            tensor1_shape: tensor_1.shape().to_vec(),
            tensor2_shape: tensor_2.shape().to_vec(),
        }
    );

    if tensor_1.is_same_shape(tensor_2) {
        let mut data = tensor_1.data.clone();
        data.zip_mut_with(&tensor_2.data, |a, &b| *a = f(*a, b));
        return Tensor { data };
    }

    let out_shape = broadcast_shapes(tensor_1.shape(), tensor_2.shape()).unwrap_or_default();
    let lhs = tensor_1
        .data
        .broadcast(ndarray::IxDyn(&out_shape))
        .map(|v| v.to_owned());
    let rhs = tensor_2.data.broadcast(ndarray::IxDyn(&out_shape));
    match (lhs, rhs) {
        (Some(mut data), Some(rhs)) => {
            data.zip_mut_with(&rhs, |a, &b| *a = f(*a, b));
            Tensor { data }
        }
        _ => unreachable!("形状已通过广播兼容性检查"),
    }
}
