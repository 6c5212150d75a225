/*
 * @Author       : 老董
 * @Date         : 2026-02-15
 * @Description  : 生成器：dense → leaky ReLU → dense → tanh
 */

use crate::nn::{Graph, GraphError, Linear, Module, Var, VarActivationOps};

pub struct Generator {
    hidden: Linear,
    output: Linear,
    alpha: f32,
}

impl Generator {
    /// # 参数
    /// - `z_size`: 噪声维度
    /// - `out_dim`: 生成样本的维度
    /// - `n_units`: 隐藏层宽度
    /// - `alpha`: leaky ReLU 的负半轴斜率
    pub fn new(
        graph: &Graph,
        z_size: usize,
        out_dim: usize,
        n_units: usize,
        alpha: f32,
    ) -> Result<Self, GraphError> {
        Ok(Self {
            hidden: Linear::new(graph, z_size, n_units, true, "generator_hidden")?,
            output: Linear::new(graph, n_units, out_dim, true, "generator_output")?,
            alpha,
        })
    }

    /// z [batch, z_size] -> 样本 [batch, out_dim]，取值在 (-1, 1)
    pub fn forward(&self, z: &Var) -> Result<Var, GraphError> {
        let h = self.hidden.forward(z)?.leaky_relu(self.alpha)?;
        self.output.forward(&h)?.tanh()
    }
}

impl Module for Generator {
    fn parameters(&self) -> Vec<Var> {
        [self.hidden.parameters(), self.output.parameters()].concat()
    }
}
