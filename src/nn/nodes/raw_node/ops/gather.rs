use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, parent_value};
use crate::tensor::Tensor;

/// Gather 节点（嵌入查表）：按一组固定的id从父节点 [vocab, dim] 中取行
///
/// 输出形状为`batch_shape + [dim]`。查表等价于 one_hot(ids) @ table，
/// 因此 backward: dL/dtable = one_hot(ids)ᵀ @ upstream（同一id出现多次时梯度累加）
pub(in crate::nn) struct Gather {
    value: Option<Tensor>,
    shape: Vec<usize>,
    /// [ids数量, vocab]
    one_hot: Tensor,
}

impl Gather {
    pub(in crate::nn) fn new(
        parents: &[&NodeHandle],
        ids: &[usize],
        batch_shape: &[usize],
    ) -> Result<Self, GraphError> {
        check_parents_count(parents, 1, "Gather")?;
        let table_shape = parents[0].value_expected_shape();
        if table_shape.len() != 2 {
            return Err(GraphError::DimensionMismatch {
                expected: 2,
                got: table_shape.len(),
                message: "Gather的父节点必须是 [vocab, dim] 的嵌入表".to_string(),
            });
        }
        let (vocab_size, dim) = (table_shape[0], table_shape[1]);
        if ids.len() != batch_shape.iter().product::<usize>() {
            return Err(GraphError::ShapeMismatch {
                expected: batch_shape.to_vec(),
                got: vec![ids.len()],
                message: "Gather的id数量与给定形状不一致".to_string(),
            });
        }
        if let Some(&bad) = ids.iter().find(|&&id| id >= vocab_size) {
            return Err(GraphError::InvalidOperation(format!(
                "Gather的id {bad}超出嵌入表大小{vocab_size}"
            )));
        }

        let mut shape = batch_shape.to_vec();
        shape.push(dim);
        Ok(Self {
            value: None,
            shape,
            one_hot: Tensor::one_hot(ids, &[ids.len()], vocab_size),
        })
    }
}

impl TraitNode for Gather {
    fn type_name(&self) -> &'static str {
        "gather"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let rows = self.one_hot.mat_mul(parent_value(parents, 0)?);
        self.value = Some(rows.reshape(&self.shape));
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        _target_index: usize,
        _parents: &[&NodeHandle],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let rows = self.one_hot.shape()[0];
        let dim = self.shape[self.shape.len() - 1];
        let upstream_rows = upstream_grad.reshape(&[rows, dim]);
        Ok(self.one_hot.transpose().mat_mul(&upstream_rows))
    }
}
