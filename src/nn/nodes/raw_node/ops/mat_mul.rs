use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, parent_value};
use crate::tensor::Tensor;

/// 矩阵乘法节点：[m, k] @ [k, n] -> [m, n]
///
/// backward: dL/dA = upstream @ Bᵀ，dL/dB = Aᵀ @ upstream
pub(in crate::nn) struct MatMul {
    value: Option<Tensor>,
    shape: Vec<usize>,
}

impl MatMul {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        check_parents_count(parents, 2, "MatMul")?;
        let (a, b) = (
            parents[0].value_expected_shape(),
            parents[1].value_expected_shape(),
        );
        for shape in [a, b] {
            if shape.len() != 2 {
                return Err(GraphError::DimensionMismatch {
                    expected: 2,
                    got: shape.len(),
                    message: "MatMul节点的父节点必须是2阶张量".to_string(),
                });
            }
        }
        if a[1] != b[0] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![a[1], b[1]],
                got: b.to_vec(),
                message: format!("MatMul节点：前一个父节点的列数{}必须等于后一个的行数", a[1]),
            });
        }
        Ok(Self {
            value: None,
            shape: vec![a[0], b[1]],
        })
    }
}

impl TraitNode for MatMul {
    fn type_name(&self) -> &'static str {
        "mat_mul"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        self.value = Some(parent_value(parents, 0)?.mat_mul(parent_value(parents, 1)?));
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        target_index: usize,
        parents: &[&NodeHandle],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if target_index == 0 {
            let b = parent_value(parents, 1)?;
            Ok(upstream_grad.mat_mul(&b.transpose()))
        } else {
            let a = parent_value(parents, 0)?;
            Ok(a.transpose().mat_mul(upstream_grad))
        }
    }
}
