/*
 * @Author       : 老董
 * @Date         : 2026-01-08
 * @Description  : Smart Var - 智能变量句柄，支持算子重载和链式调用
 */

use super::graph::GraphInner;
use super::{GraphError, NodeId};
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::ops::{Add, Mul, Sub};
use std::rc::Rc;

// ==================== Init 枚举 ====================

/// 参数初始化策略（随机数均来自 Graph 的 RNG）
#[derive(Debug, Clone)]
pub enum Init {
    /// 常数初始化
    Constant(f32),
    /// 全零
    Zeros,
    /// 全一
    Ones,
    /// 闭区间[min, max]上的均匀分布
    Uniform { min: f32, max: f32 },
    /// 正态分布
    Normal { mean: f32, std: f32 },
    /// 截断正态分布（超出2倍标准差的样本重采）
    TruncatedNormal { mean: f32, std: f32 },
    /// Kaiming/He 初始化（适用于 `ReLU` 类激活）
    Kaiming,
    /// Xavier/Glorot 均匀初始化（适用于 Sigmoid/Tanh）
    Xavier,
}

impl Init {
    /// 生成初始化后的 Tensor（使用指定的 RNG）
    pub fn generate_with_rng(&self, shape: &[usize], rng: &mut StdRng) -> Tensor {
        match self {
            Self::Constant(v) => Tensor::full(*v, shape),
            Self::Zeros => Tensor::zeros(shape),
            Self::Ones => Tensor::ones(shape),
            Self::Uniform { min, max } => Tensor::uniform_with_rng(*min, *max, shape, rng),
            Self::Normal { mean, std } => Tensor::normal_with_rng(*mean, *std, shape, rng),
            Self::TruncatedNormal { mean, std } => {
                Tensor::truncated_normal_with_rng(*mean, *std, shape, rng)
            }
            Self::Kaiming => {
                let fan_in = shape.first().copied().unwrap_or(1).max(1);
                let std = (2.0 / fan_in as f32).sqrt();
                Tensor::normal_with_rng(0.0, std, shape, rng)
            }
            Self::Xavier => {
                let fan_in = shape.first().copied().unwrap_or(1);
                let fan_out = shape.get(1).copied().unwrap_or(1);
                let limit = (6.0 / (fan_in + fan_out).max(1) as f32).sqrt();
                Tensor::uniform_with_rng(-limit, limit, shape, rng)
            }
        }
    }
}

// ==================== Var 结构 ====================

/// 智能变量句柄 - 携带图引用，支持算子重载和链式调用
///
/// # 设计原则
/// - 持有 `Rc<RefCell<GraphInner>>` 引用，实现算子重载
/// - Clone 语义（非 Copy），但开销极低（Rc clone）
///
/// # 使用示例
/// ```ignore
/// let graph = Graph::new();
/// let x = graph.input(&images)?;
/// let h = x.matmul(&w)?.tanh()?;
/// let z = &h + &b;
/// let loss = z.sigmoid_cross_entropy(&labels)?;
/// loss.backward()?;
/// ```
#[derive(Clone)]
pub struct Var {
    id: NodeId,
    graph: Rc<RefCell<GraphInner>>,
}

impl std::fmt::Debug for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Var").field("id", &self.id).finish()
    }
}

impl Var {
    pub(crate) const fn new(id: NodeId, graph: Rc<RefCell<GraphInner>>) -> Self {
        Self { id, graph }
    }

    pub const fn node_id(&self) -> NodeId {
        self.id
    }

    pub(crate) const fn graph(&self) -> &Rc<RefCell<GraphInner>> {
        &self.graph
    }

    /// 检查两个 Var 是否来自同一个 Graph
    pub fn same_graph(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.graph, &other.graph)
    }

    /// 获取 Var 所属的 Graph handle
    pub fn get_graph(&self) -> super::graph::Graph {
        super::graph::Graph::from_rc(Rc::clone(&self.graph))
    }

    /// 节点值的形状（创建时即已确定）
    pub fn shape(&self) -> Result<Vec<usize>, GraphError> {
        Ok(self
            .graph
            .borrow()
            .get_node_value_expected_shape(self.id)?
            .to_vec())
    }

    pub(crate) fn check_same_graph(&self, other: &Self, op: &str) -> Result<(), GraphError> {
        if self.same_graph(other) {
            Ok(())
        } else {
            Err(GraphError::InvalidOperation(format!(
                "不能对来自不同 Graph 的 Var 进行{op}"
            )))
        }
    }

    /// 用新节点id包装成同图的 Var
    pub(crate) fn derive(&self, id: NodeId) -> Self {
        Self::new(id, Rc::clone(&self.graph))
    }

    // ==================== 梯度流控制 ====================

    /// 截断梯度流
    pub fn detach(&self) -> Result<Self, GraphError> {
        self.graph.borrow_mut().detach_node(self.id)?;
        Ok(self.clone())
    }

    /// 恢复梯度流
    pub fn attach(&self) -> Result<Self, GraphError> {
        self.graph.borrow_mut().attach_node(self.id)?;
        Ok(self.clone())
    }

    // ==================== 执行 ====================

    /// 前向传播（开启新批次）
    pub fn forward(&self) -> Result<(), GraphError> {
        self.graph.borrow_mut().forward(self.id)
    }

    /// 在当前批次内继续前向传播，只计算尚未计算的节点
    pub fn forward_continue(&self) -> Result<(), GraphError> {
        self.graph.borrow_mut().forward_continue(self.id)
    }

    /// 反向传播（ensure-forward 语义）：先 forward 再 backward，返回 loss 的标量值
    pub fn backward(&self) -> Result<f32, GraphError> {
        let mut g = self.graph.borrow_mut();
        g.forward(self.id)?;
        g.backward(self.id)
    }

    // ==================== 值访问和设置 ====================

    /// 获取节点的值（克隆的 Tensor）
    pub fn value(&self) -> Result<Option<Tensor>, GraphError> {
        Ok(self.graph.borrow().get_node_value(self.id)?.cloned())
    }

    /// 设置节点的值（仅输入/参数节点）
    pub fn set_value(&self, value: &Tensor) -> Result<(), GraphError> {
        self.graph.borrow_mut().set_node_value(self.id, Some(value))
    }

    /// 获取标量值
    pub fn item(&self) -> Result<f32, GraphError> {
        let value = self.value()?.ok_or_else(|| {
            GraphError::ComputationError(format!("节点{:?}没有值，请先执行 forward", self.id))
        })?;
        value
            .get_data_number()
            .ok_or_else(|| GraphError::InvalidOperation("Tensor 不是标量".to_string()))
    }

    /// 获取节点的梯度
    pub fn grad(&self) -> Result<Option<Tensor>, GraphError> {
        Ok(self.graph.borrow().get_node_grad(self.id)?.cloned())
    }

    // ==================== 安全版本（返回 Result）====================

    /// 安全的加法（支持广播）
    pub fn try_add(&self, other: &Self) -> Result<Self, GraphError> {
        self.check_same_graph(other, "加法")?;
        let id = self
            .graph
            .borrow_mut()
            .new_add_node(&[self.id, other.id], None)?;
        Ok(self.derive(id))
    }

    /// 安全的减法（支持广播）
    pub fn try_sub(&self, other: &Self) -> Result<Self, GraphError> {
        self.check_same_graph(other, "减法")?;
        let id = self
            .graph
            .borrow_mut()
            .new_subtract_node(self.id, other.id, None)?;
        Ok(self.derive(id))
    }

    /// 安全的逐元素乘法（支持广播）
    pub fn try_mul(&self, other: &Self) -> Result<Self, GraphError> {
        self.check_same_graph(other, "乘法")?;
        let id = self
            .graph
            .borrow_mut()
            .new_multiply_node(self.id, other.id, None)?;
        Ok(self.derive(id))
    }

    /// 多个 Var 一次相加（只创建一个 Add 节点）
    pub fn sum_all(vars: &[&Self]) -> Result<Self, GraphError> {
        let first = vars
            .first()
            .ok_or_else(|| GraphError::InvalidOperation("sum_all需要至少1个Var".to_string()))?;
        if vars.len() == 1 {
            return Ok((*first).clone());
        }
        for var in &vars[1..] {
            first.check_same_graph(var, "加法")?;
        }
        let ids = vars.iter().map(|v| v.id).collect::<Vec<_>>();
        let id = first.graph.borrow_mut().new_add_node(&ids, None)?;
        Ok(first.derive(id))
    }
}

// ==================== 算子重载 ====================

macro_rules! impl_var_op {
    ($trait:ident, $method:ident, $try_method:ident, $desc:literal) => {
        impl $trait for &Var {
            type Output = Var;

            fn $method(self, other: &Var) -> Var {
                self.$try_method(other).expect(concat!("Var ", $desc, "失败"))
            }
        }

        impl $trait for Var {
            type Output = Var;

            fn $method(self, other: Var) -> Var {
                (&self).$method(&other)
            }
        }

        impl $trait<Var> for &Var {
            type Output = Var;

            fn $method(self, other: Var) -> Var {
                self.$method(&other)
            }
        }

        impl $trait<&Var> for Var {
            type Output = Var;

            fn $method(self, other: &Var) -> Var {
                (&self).$method(other)
            }
        }
    };
}

impl_var_op!(Add, add, try_add, "加法");
impl_var_op!(Sub, sub, try_sub, "减法");
impl_var_op!(Mul, mul, try_mul, "乘法");
