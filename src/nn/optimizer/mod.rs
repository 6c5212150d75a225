/*
 * @Author       : 老董
 * @Date         : 2025-07-24 16:00:00
 * @LastEditors  : 老董
 * @LastEditTime : 2026-02-12
 * @Description  : 优化器模块，实现 PyTorch 风格的梯度优化算法
 */

mod core;

pub use core::{Adam, Optimizer, SGD};
