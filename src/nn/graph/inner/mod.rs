/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 计算图的底层实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 基础操作 + forward + 节点回收
 * - backward.rs: VJP 反向传播
 * - mode.rs: train/eval/detach
 * - node_builders.rs: new_*_node
 */

mod backward;
mod core;
mod mode;
mod node_builders;

use crate::nn::NodeId;
use crate::nn::nodes::NodeHandle;
use rand::rngs::StdRng;
use std::collections::{HashMap, HashSet};

/// 图的完整定义（核心实现）
///
/// 用户通常通过 `Graph` 句柄使用此结构；节点之间只记录“子 -> 父”的反向边，
/// 前向与反向传播都从目标节点出发沿父节点做拓扑排序。
pub struct GraphInner {
    pub(in crate::nn::graph) name: String,
    pub(in crate::nn::graph) nodes: HashMap<NodeId, NodeHandle>,
    /// 反向边：child_id -> parent_ids（顺序即父节点顺序）
    pub(in crate::nn::graph) backward_edges: HashMap<NodeId, Vec<NodeId>>,
    /// 用户显式命名过的节点名（用于查重）
    pub(in crate::nn::graph) explicit_names: HashSet<String>,
    /// 最后一次前向传播的 id
    pub(in crate::nn::graph) last_forward_pass_id: u64,
    /// 最后一次反向传播的 id
    pub(in crate::nn::graph) last_backward_pass_id: u64,
    pub(in crate::nn::graph) next_id: u64,
    pub(in crate::nn::graph) is_eval_mode: bool,
    /// 图级别的随机数生成器（参数初始化、Dropout种子均由此派生）
    pub(in crate::nn::graph) rng: StdRng,
}
