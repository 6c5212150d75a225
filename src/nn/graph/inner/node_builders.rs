/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 节点构建方法（new_*_node）
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{
    Add, Dropout, Gather, Input, LeakyReLU, MatMul, Multiply, NodeType, Parameter, Select,
    Sigmoid, SigmoidCrossEntropy, SoftmaxCrossEntropy, Stack, Subtract, Tanh,
};

impl GraphInner {
    /// 添加节点到列表。未显式命名的节点自动命名为`{类型}_{id}`
    fn add_node_to_list(
        &mut self,
        raw_node: impl Into<NodeType>,
        name: Option<&str>,
        parents: &[NodeId],
    ) -> Result<NodeId, GraphError> {
        if let Some(name) = name {
            self.check_duplicate_node_name(name)?;
        }
        let mut node_handle = NodeHandle::new(raw_node);
        let node_id = self.generate_valid_node_id();
        let node_name = match name {
            Some(name) => {
                self.explicit_names.insert(name.to_string());
                name.to_string()
            }
            None => format!("{}_{}", node_handle.type_name(), node_id.0),
        };

        node_handle.bind_id_and_name(node_id, &node_name);
        node_handle.set_training(self.is_train_mode());
        self.backward_edges.insert(node_id, parents.to_vec());
        self.nodes.insert(node_id, node_handle);
        Ok(node_id)
    }

    /// 创建输入节点（值需随后通过 set_node_value 设置）
    pub fn new_input_node(
        &mut self,
        shape: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_node_to_list(Input::new(shape), name, &[])
    }

    /// 创建参数节点（值需随后初始化）
    pub fn new_parameter_node(
        &mut self,
        shape: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_node_to_list(Parameter::new(shape), name, &[])
    }

    pub fn new_add_node(
        &mut self,
        parents: &[NodeId],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Add::new(&self.get_nodes(parents)?)?;
        self.add_node_to_list(node, name, parents)
    }

    pub fn new_subtract_node(
        &mut self,
        left: NodeId,
        right: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Subtract::new(&self.get_nodes(&[left, right])?)?;
        self.add_node_to_list(node, name, &[left, right])
    }

    pub fn new_multiply_node(
        &mut self,
        left: NodeId,
        right: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Multiply::new(&self.get_nodes(&[left, right])?)?;
        self.add_node_to_list(node, name, &[left, right])
    }

    pub fn new_mat_mul_node(
        &mut self,
        left: NodeId,
        right: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = MatMul::new(&self.get_nodes(&[left, right])?)?;
        self.add_node_to_list(node, name, &[left, right])
    }

    pub fn new_sigmoid_node(
        &mut self,
        parent: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Sigmoid::new(&self.get_nodes(&[parent])?)?;
        self.add_node_to_list(node, name, &[parent])
    }

    pub fn new_tanh_node(
        &mut self,
        parent: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Tanh::new(&self.get_nodes(&[parent])?)?;
        self.add_node_to_list(node, name, &[parent])
    }

    pub fn new_leaky_relu_node(
        &mut self,
        parent: NodeId,
        alpha: f32,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = LeakyReLU::new(&self.get_nodes(&[parent])?, alpha)?;
        self.add_node_to_list(node, name, &[parent])
    }

    pub fn new_select_node(
        &mut self,
        parent: NodeId,
        axis: usize,
        index: usize,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Select::new(&self.get_nodes(&[parent])?, axis, index)?;
        self.add_node_to_list(node, name, &[parent])
    }

    pub fn new_stack_node(
        &mut self,
        parents: &[NodeId],
        axis: usize,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Stack::new(&self.get_nodes(parents)?, axis)?;
        self.add_node_to_list(node, name, parents)
    }

    /// 嵌入查表节点：`ids`按`batch_shape`排布，输出`batch_shape + [dim]`
    pub fn new_gather_node(
        &mut self,
        table: NodeId,
        ids: &[usize],
        batch_shape: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Gather::new(&self.get_nodes(&[table])?, ids, batch_shape)?;
        self.add_node_to_list(node, name, &[table])
    }

    /// Dropout节点：种子从图的RNG派生，初始模式跟随图的当前模式
    pub fn new_dropout_node(
        &mut self,
        parent: NodeId,
        keep_prob: f32,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let seed = self.next_seed();
        let node = Dropout::new(
            &self.get_nodes(&[parent])?,
            keep_prob,
            seed,
            self.is_train_mode(),
        )?;
        self.add_node_to_list(node, name, &[parent])
    }

    /// Softmax交叉熵损失节点；给出`weights`时按其对每行加权平均（序列掩码）
    pub fn new_softmax_cross_entropy_node(
        &mut self,
        logits: NodeId,
        labels: NodeId,
        weights: Option<NodeId>,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let mut parents = vec![logits, labels];
        parents.extend(weights);
        let node = SoftmaxCrossEntropy::new(&self.get_nodes(&parents)?)?;
        self.add_node_to_list(node, name, &parents)
    }

    pub fn new_sigmoid_cross_entropy_node(
        &mut self,
        logits: NodeId,
        labels: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = SigmoidCrossEntropy::new(&self.get_nodes(&[logits, labels])?)?;
        self.add_node_to_list(node, name, &[logits, labels])
    }
}
