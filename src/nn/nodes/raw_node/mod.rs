mod input;
mod loss;
mod ops;
mod parameter;

pub(in crate::nn) use input::Input;
pub(in crate::nn) use loss::*;
pub(in crate::nn) use ops::*;
pub(in crate::nn) use parameter::Parameter;

use enum_dispatch::enum_dispatch;

use super::NodeHandle;
use crate::nn::GraphError;
use crate::tensor::Tensor;

#[enum_dispatch]
pub(in crate::nn) enum NodeType {
    Input(Input),
    Parameter(Parameter),
    Add(Add),
    Subtract(Subtract),
    Multiply(Multiply),
    MatMul(MatMul),
    Sigmoid(Sigmoid),
    Tanh(Tanh),
    LeakyReLU(LeakyReLU),
    Select(Select),
    Stack(Stack),
    Gather(Gather),
    Dropout(Dropout),
    SoftmaxCrossEntropy(SoftmaxCrossEntropy),
    SigmoidCrossEntropy(SigmoidCrossEntropy),
}

#[enum_dispatch(NodeType)]
pub(in crate::nn) trait TraitNode {
    /// 节点类型名，用于自动命名与错误信息
    fn type_name(&self) -> &'static str;

    /// 节点值的形状在创建时即已确定
    fn value_expected_shape(&self) -> &[usize];

    // 根据父节点的值计算本节点的值（由Graph保证调用时所有父节点的值均已算好）
    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError>;

    fn value(&self) -> Option<&Tensor>;

    fn set_value(&mut self, _value: Option<&Tensor>) -> Result<(), GraphError> {
        Err(GraphError::InvalidOperation(format!(
            "{}节点的值不应该被手动设置",
            self.type_name()
        )))
    }

    /// VJP：给定本节点的上游梯度，计算传给第`target_index`个父节点的梯度（与该父节点的值同形）
    fn calc_grad_to_parent(
        &self,
        target_index: usize,
        parents: &[&NodeHandle],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError>;

    /// 训练/评估模式切换，只有行为随模式变化的节点（如Dropout）需要关心
    fn set_training(&mut self, _training: bool) {}
}

// ========== 节点实现共用的小工具 ==========

pub(super) fn check_parents_count(
    parents: &[&NodeHandle],
    expected: usize,
    type_name: &str,
) -> Result<(), GraphError> {
    if parents.len() != expected {
        return Err(GraphError::InvalidOperation(format!(
            "{type_name}节点需要{expected}个父节点，实际为{}个",
            parents.len()
        )));
    }
    Ok(())
}

pub(super) fn parent_value<'a>(
    parents: &[&'a NodeHandle],
    index: usize,
) -> Result<&'a Tensor, GraphError> {
    let parent = parents.get(index).ok_or_else(|| {
        GraphError::ComputationError(format!("父节点下标{index}越界"))
    })?;
    parent.value().ok_or_else(|| {
        GraphError::ComputationError(format!(
            "{parent}没有值。不该触及本错误，否则说明crate代码有问题"
        ))
    })
}

pub(super) fn own_value<'a>(
    value: &'a Option<Tensor>,
    type_name: &str,
) -> Result<&'a Tensor, GraphError> {
    value.as_ref().ok_or_else(|| {
        GraphError::ComputationError(format!("{type_name}节点没有值，无法计算梯度"))
    })
}
