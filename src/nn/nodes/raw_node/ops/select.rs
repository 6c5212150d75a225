use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, parent_value};
use crate::tensor::Tensor;

/// Select 节点：取父节点第`axis`维上第`index`个切片（该维被移除）
///
/// 循环层展开时用它从 [batch, seq_len, feature] 中取出第t步的 [batch, feature]
pub(in crate::nn) struct Select {
    value: Option<Tensor>,
    shape: Vec<usize>,
    axis: usize,
    index: usize,
}

impl Select {
    pub(in crate::nn) fn new(
        parents: &[&NodeHandle],
        axis: usize,
        index: usize,
    ) -> Result<Self, GraphError> {
        check_parents_count(parents, 1, "Select")?;
        let parent_shape = parents[0].value_expected_shape();
        if axis >= parent_shape.len() {
            return Err(GraphError::DimensionMismatch {
                expected: axis + 1,
                got: parent_shape.len(),
                message: format!("Select的轴{axis}超出父节点维度"),
            });
        }
        if index >= parent_shape[axis] {
            return Err(GraphError::InvalidOperation(format!(
                "Select的索引{index}超出第{axis}维的大小{}",
                parent_shape[axis]
            )));
        }
        let mut shape = parent_shape.to_vec();
        shape.remove(axis);
        Ok(Self {
            value: None,
            shape,
            axis,
            index,
        })
    }
}

impl TraitNode for Select {
    fn type_name(&self) -> &'static str {
        "select"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        self.value = Some(parent_value(parents, 0)?.select(self.axis, self.index));
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        _target_index: usize,
        parents: &[&NodeHandle],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        // 只有被选中的切片收到梯度，其余位置为0
        Ok(Tensor::zeros(parents[0].value_expected_shape()).scatter_at(
            self.axis,
            self.index,
            upstream_grad,
        ))
    }
}
