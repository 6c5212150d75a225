/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 扩展 trait 模块
 *
 * 按功能领域组织 Var 的扩展方法，用户按需 import：
 * - `activation`: 激活函数（sigmoid, tanh, leaky_relu）
 * - `loss`: 损失函数（cross_entropy, sequence_cross_entropy, sigmoid_cross_entropy）
 * - `matrix`: 矩阵运算（matmul）
 * - `shape`: 形状变换（select, stack, gather_rows）
 * - `regularize`: 正则化（dropout）
 */

mod activation;
mod loss;
mod matrix;
mod regularize;
mod shape;

pub use activation::VarActivationOps;
pub use loss::VarLossOps;
pub use matrix::VarMatrixOps;
pub use regularize::VarRegularizeOps;
pub use shape::VarShapeOps;
