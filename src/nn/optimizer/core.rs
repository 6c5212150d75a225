/*
 * @Author       : 老董
 * @Date         : 2026-01-17
 * @Description  : Optimizer API - PyTorch 风格
 *
 * - Optimizer 持有 Rc<RefCell<GraphInner>> 引用，并绑定一份显式的参数列表
 * - zero_grad()/step() 只作用于这份列表中的参数
 * - minimize(&loss) 一步完成 zero_grad + backward + step
 */

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::nn::graph::GraphInner;
use crate::nn::{Graph, GraphError, NodeId, Var};
use crate::tensor::Tensor;

/// Optimizer trait（PyTorch 风格）
///
/// # 设计要点
/// - Optimizer 绑定特定参数（通过 Var），由组件的 `parameters()` 提供
/// - `backward()` 计算所有参数的梯度（由 Var 调用）
/// - `step()` 只更新 Optimizer 绑定的参数
///
/// # 使用示例
/// ```ignore
/// let mut d_opt = Adam::new(&graph, &discriminator.parameters(), 0.002);
/// let mut g_opt = Adam::new(&graph, &generator.parameters(), 0.002);
///
/// d_opt.zero_grad()?;
/// d_loss.backward()?;
/// d_opt.step()?;
///
/// // 或者一步完成
/// let g_loss_val = g_opt.minimize(&g_loss)?;
/// ```
pub trait Optimizer {
    /// 清零所有绑定参数的梯度
    fn zero_grad(&mut self) -> Result<(), GraphError>;

    /// 更新参数（只更新 Optimizer 绑定的参数）
    fn step(&mut self) -> Result<(), GraphError>;

    /// 一步完成：zero_grad + forward + backward + step，返回 loss 的标量值
    fn minimize(&mut self, loss: &Var) -> Result<f32, GraphError> {
        self.zero_grad()?;
        let loss_val = loss.backward()?;
        self.step()?;
        Ok(loss_val)
    }

    /// 获取学习率
    fn learning_rate(&self) -> f32;

    /// 设置学习率
    fn set_learning_rate(&mut self, lr: f32);

    /// 重置累积状态（如 Adam 的动量）
    fn reset(&mut self);
}

/// 优化器共享的参数绑定（内部实现，不对外暴露）
struct ParamBinding {
    graph: Rc<RefCell<GraphInner>>,
    params: Vec<NodeId>,
    /// 逐元素梯度裁剪阈值：梯度被截到 [-clip, clip]
    grad_clip: Option<f32>,
}

impl ParamBinding {
    fn new(graph: &Graph, params: &[Var]) -> Self {
        Self {
            graph: graph.inner_rc(),
            params: params.iter().map(Var::node_id).collect(),
            grad_clip: None,
        }
    }

    fn zero_grad(&self) -> Result<(), GraphError> {
        let mut g = self.graph.borrow_mut();
        for &node_id in &self.params {
            g.clear_node_grad(node_id)?;
        }
        Ok(())
    }

    /// 对每个有梯度的参数调用`update(id, 当前值, 梯度)`，并写回新值
    fn apply(
        &self,
        mut update: impl FnMut(NodeId, &Tensor, &Tensor) -> Tensor,
    ) -> Result<usize, GraphError> {
        let mut g = self.graph.borrow_mut();
        let mut updated = 0;
        for &node_id in &self.params {
            let Some(grad) = g.get_node_grad(node_id)? else {
                continue;
            };
            let grad = match self.grad_clip {
                Some(clip) => grad.clip(-clip, clip),
                None => grad.clone(),
            };
            let current = g.get_node_value(node_id)?.ok_or_else(|| {
                GraphError::ComputationError(format!("参数节点 {node_id:?} 没有值"))
            })?;
            let new_value = update(node_id, current, &grad);
            g.set_node_value(node_id, Some(&new_value))?;
            updated += 1;
        }
        Ok(updated)
    }
}

/// SGD 优化器（PyTorch 风格）
///
/// 随机梯度下降：θ = θ - α * ∇θ
pub struct SGD {
    binding: ParamBinding,
    lr: f32,
}

impl SGD {
    /// 创建新的 SGD 优化器
    ///
    /// # 参数
    /// - `graph`: 图句柄
    /// - `params`: 要优化的参数 Var 列表
    /// - `lr`: 学习率
    pub fn new(graph: &Graph, params: &[Var], lr: f32) -> Self {
        Self {
            binding: ParamBinding::new(graph, params),
            lr,
        }
    }

    /// 启用逐元素梯度裁剪
    #[must_use]
    pub fn with_grad_clip(mut self, clip: f32) -> Self {
        self.binding.grad_clip = Some(clip.abs());
        self
    }
}

impl Optimizer for SGD {
    fn zero_grad(&mut self) -> Result<(), GraphError> {
        self.binding.zero_grad()
    }

    fn step(&mut self) -> Result<(), GraphError> {
        let lr = self.lr;
        let updated = self
            .binding
            .apply(|_, current, grad| current - lr * grad)?;
        tracing::debug!(updated, lr, "SGD step");
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.lr = lr;
    }

    fn reset(&mut self) {
        // SGD 无状态
    }
}

/// Adam 优化器（PyTorch 风格）
///
/// Adam: Adaptive Moment Estimation
/// - m = β1 * m + (1 - β1) * g
/// - v = β2 * v + (1 - β2) * g²
/// - θ = θ - α * m_hat / (√v_hat + ε)
pub struct Adam {
    binding: ParamBinding,
    lr: f32,
    /// β1 (一阶矩衰减)
    beta1: f32,
    /// β2 (二阶矩衰减)
    beta2: f32,
    /// 数值稳定项
    epsilon: f32,
    /// 一阶矩估计
    m: HashMap<NodeId, Tensor>,
    /// 二阶矩估计
    v: HashMap<NodeId, Tensor>,
    /// 时间步
    t: i32,
}

impl Adam {
    /// 创建新的 Adam 优化器（β1=0.9, β2=0.999, ε=1e-8）
    pub fn new(graph: &Graph, params: &[Var], lr: f32) -> Self {
        Self::with_config(graph, params, lr, 0.9, 0.999, 1e-8)
    }

    /// 创建带完整配置的 Adam 优化器
    pub fn with_config(
        graph: &Graph,
        params: &[Var],
        lr: f32,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
    ) -> Self {
        Self {
            binding: ParamBinding::new(graph, params),
            lr,
            beta1,
            beta2,
            epsilon,
            m: HashMap::new(),
            v: HashMap::new(),
            t: 0,
        }
    }

    /// 启用逐元素梯度裁剪
    #[must_use]
    pub fn with_grad_clip(mut self, clip: f32) -> Self {
        self.binding.grad_clip = Some(clip.abs());
        self
    }
}

impl Optimizer for Adam {
    fn zero_grad(&mut self) -> Result<(), GraphError> {
        self.binding.zero_grad()
    }

    fn step(&mut self) -> Result<(), GraphError> {
        self.t += 1;
        let (lr, beta1, beta2, epsilon) = (self.lr, self.beta1, self.beta2, self.epsilon);
        let bias1 = 1.0 - beta1.powi(self.t);
        let bias2 = 1.0 - beta2.powi(self.t);
        let (m_map, v_map) = (&mut self.m, &mut self.v);

        let updated = self.binding.apply(|node_id, current, grad| {
            let m = m_map
                .entry(node_id)
                .or_insert_with(|| Tensor::zeros(grad.shape()));
            *m = &*m * beta1 + grad * (1.0 - beta1);

            let v = v_map
                .entry(node_id)
                .or_insert_with(|| Tensor::zeros(grad.shape()));
            *v = &*v * beta2 + &(grad * grad) * (1.0 - beta2);

            // 偏差修正
            let m_hat = &*m / bias1;
            let v_hat = &*v / bias2;
            let denom = v_hat.map(f32::sqrt) + epsilon;
            current - &(&m_hat / &denom) * lr
        })?;
        tracing::debug!(updated, lr, t = self.t, "Adam step");
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.lr = lr;
    }

    fn reset(&mut self) {
        self.m.clear();
        self.v.clear();
        self.t = 0;
    }
}
