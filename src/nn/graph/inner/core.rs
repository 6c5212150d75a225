/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 核心操作 + 前向传播 + 节点回收
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::nodes::NodeHandle;
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};

impl GraphInner {
    // ========== 创建 ==========

    /// 创建一个随机种子来自系统熵的计算图
    pub fn new() -> Self {
        Self::with_rng("default_graph", StdRng::from_entropy())
    }

    /// 创建一个带固定种子的计算图（确保可重复性）
    pub fn new_with_seed(seed: u64) -> Self {
        Self::with_rng("default_graph", StdRng::seed_from_u64(seed))
    }

    /// 创建一个带名称和固定种子的计算图
    pub fn with_name_and_seed(name: &str, seed: u64) -> Self {
        Self::with_rng(name, StdRng::seed_from_u64(seed))
    }

    fn with_rng(name: &str, rng: StdRng) -> Self {
        Self {
            name: name.to_string(),
            nodes: HashMap::new(),
            backward_edges: HashMap::new(),
            explicit_names: HashSet::new(),
            last_forward_pass_id: 0,
            last_backward_pass_id: 0,
            next_id: 0,
            is_eval_mode: false,
            rng,
        }
    }

    // ========== 基础访问器 ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub const fn last_forward_pass_id(&self) -> u64 {
        self.last_forward_pass_id
    }

    pub const fn last_backward_pass_id(&self) -> u64 {
        self.last_backward_pass_id
    }

    /// 设置/重置图的随机种子
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// 从图的随机数生成器派生一个子种子（供Dropout等自带RNG的节点使用）
    pub(in crate::nn) fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }

    pub(in crate::nn) const fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_node_mut(&mut self, id: NodeId) -> Result<&mut NodeHandle, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_nodes(&self, ids: &[NodeId]) -> Result<Vec<&NodeHandle>, GraphError> {
        ids.iter().map(|&id| self.get_node(id)).collect()
    }

    pub fn get_node_parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let _ = self.get_node(id)?;
        Ok(self.backward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    pub fn get_node_value_expected_shape(&self, id: NodeId) -> Result<&[usize], GraphError> {
        Ok(self.get_node(id)?.value_expected_shape())
    }

    pub fn get_node_value(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.value())
    }

    pub fn set_node_value(&mut self, id: NodeId, value: Option<&Tensor>) -> Result<(), GraphError> {
        self.get_node_mut(id)?.set_value(value)
    }

    pub fn get_node_grad(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        let node = self.get_node(id)?;
        if !node.is_leaf() || node.is_parameter() {
            return Ok(node.grad());
        }
        Err(GraphError::InvalidOperation(format!(
            "输入{node}不应该有梯度"
        )))
    }

    /// 获取所有可训练的参数节点（按创建顺序）
    pub fn get_trainable_nodes(&self) -> Vec<NodeId> {
        let mut ids = self
            .nodes
            .iter()
            .filter(|(_, node)| node.is_parameter())
            .map(|(&id, _)| id)
            .collect::<Vec<_>>();
        ids.sort();
        ids
    }

    // ========== ID/名称生成 ==========

    pub(in crate::nn::graph) const fn generate_valid_node_id(&mut self) -> NodeId {
        // 先递增再返回，所以第一个节点 ID 是 1
        self.next_id += 1;
        NodeId(self.next_id)
    }

    pub(in crate::nn::graph) fn check_duplicate_node_name(&self, name: &str) -> Result<(), GraphError> {
        if self.explicit_names.contains(name) {
            return Err(GraphError::DuplicateNodeName(format!(
                "节点{}在图{}中重复",
                name,
                self.name()
            )));
        }
        Ok(())
    }

    // ========== 前向传播 ==========

    /// 开启一次新的前向传播：目标节点的所有祖先（含自身）都会重新计算一次
    pub fn forward(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        self.last_forward_pass_id += 1;
        self.forward_in_current_pass(node_id)
    }

    /// 在当前前向传播批次内继续计算：已在本批次算过的节点保留其值（包括Dropout掩码），
    /// 只计算新出现的节点。用于逐步展开的贪心解码
    pub fn forward_continue(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        if self.last_forward_pass_id == 0 {
            self.last_forward_pass_id = 1;
        }
        self.forward_in_current_pass(node_id)
    }

    fn forward_in_current_pass(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let pass_id = self.last_forward_pass_id;
        for id in self.topological_order(node_id)? {
            let node = self.get_node(id)?;
            if node.is_leaf() {
                if node.value().is_none() {
                    return Err(GraphError::InvalidOperation(format!(
                        "{node}是输入/参数节点，但尚未设置值"
                    )));
                }
                continue;
            }
            if node.last_forward_pass_id() == pass_id {
                continue;
            }
            self.compute_node(id, pass_id)?;
        }
        Ok(())
    }

    /// 计算单个节点：暂时把它从表中取出，以便同时借用其父节点
    fn compute_node(&mut self, id: NodeId, pass_id: u64) -> Result<(), GraphError> {
        let parent_ids = self.get_node_parents(id)?;
        let mut node = self.nodes.remove(&id).ok_or(GraphError::NodeNotFound(id))?;
        let result = self
            .get_nodes(&parent_ids)
            .and_then(|parents| node.calc_value_by_parents(&parents));
        node.set_last_forward_pass_id(pass_id);
        self.nodes.insert(id, node);
        result
    }

    /// 目标节点及其全部祖先的拓扑序（父节点在前），迭代实现以支持很深的展开图
    pub(in crate::nn::graph) fn topological_order(
        &self,
        target: NodeId,
    ) -> Result<Vec<NodeId>, GraphError> {
        let _ = self.get_node(target)?;
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        // (节点, 是否已展开其父节点)
        let mut stack = vec![(target, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if !visited.insert(id) {
                continue;
            }
            stack.push((id, true));
            if let Some(parents) = self.backward_edges.get(&id) {
                for &parent in parents.iter().rev() {
                    if !visited.contains(&parent) {
                        stack.push((parent, false));
                    }
                }
            }
        }
        Ok(order)
    }

    // ========== 节点回收 ==========

    /// 记录当前节点id的高水位，配合`discard_since`回收之后创建的临时节点
    pub const fn mark(&self) -> NodeId {
        NodeId(self.next_id)
    }

    /// 删除`mark`之后创建的所有非参数节点。
    /// 每个训练步都会展开出一张新的子图，训练循环借此保持图的规模不随步数增长
    pub fn discard_since(&mut self, mark: NodeId) -> usize {
        let discarded = self
            .nodes
            .iter()
            .filter(|(id, node)| **id > mark && !node.is_parameter())
            .map(|(&id, _)| id)
            .collect::<Vec<_>>();
        for id in &discarded {
            if let Some(node) = self.nodes.remove(id) {
                self.explicit_names.remove(node.name());
            }
            self.backward_edges.remove(id);
        }
        discarded.len()
    }
}

impl Default for GraphInner {
    fn default() -> Self {
        Self::new()
    }
}
