/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Module trait 定义
 */

use super::Var;

/// 模块 trait
///
/// # 设计原则
/// - `forward()` **不是** trait 方法（签名各异）
/// - `new()` **不是** trait 方法（参数各异）
/// - `parameters()` 返回 `Vec<Var>`（签名一致，放入 trait）
/// - 每个组件自己持有参数，优化器直接拿这份参数集合，而不是按名字事后筛选
///
/// # 使用示例
///
/// ```ignore
/// struct Mlp {
///     fc1: Linear,
///     fc2: Linear,
/// }
///
/// impl Module for Mlp {
///     fn parameters(&self) -> Vec<Var> {
///         [self.fc1.parameters(), self.fc2.parameters()].concat()
///     }
/// }
/// ```
pub trait Module {
    /// 获取所有可训练参数
    fn parameters(&self) -> Vec<Var>;

    /// 获取参数标量总数
    fn num_params(&self) -> usize {
        self.parameters()
            .iter()
            .filter_map(|p| p.shape().ok())
            .map(|shape| shape.iter().product::<usize>())
            .sum()
    }
}
