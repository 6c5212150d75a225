/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @Description  : 张量层面的错误类型
 */

use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 张量二元运算
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },

    #[error("张量列表为空")]
    EmptyList,
    #[error("张量形状不一致")]
    InconsitentShape,
    #[error("数据长度{data_len}与形状{shape:?}不匹配")]
    DataShapeMismatch { data_len: usize, shape: Vec<usize> },
    #[error("轴{axis}超出张量维度{dimension}")]
    AxisOutOfRange { axis: usize, dimension: usize },
    #[error("索引{index}超出轴{axis}的大小{size}")]
    IndexOutOfRange {
        index: usize,
        axis: usize,
        size: usize,
    },
    #[error("id {id} 超出深度 {depth}")]
    IdOutOfRange { id: usize, depth: usize },
    #[error("输入的张量维度必须为{expected}，实际为{got}")]
    DimensionMustBe { expected: usize, got: usize },
    #[error("形状{from:?}无法通过求和归约到{to:?}")]
    CannotReduceTo { from: Vec<usize>, to: Vec<usize> },
}
