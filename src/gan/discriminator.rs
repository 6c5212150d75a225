/*
 * @Author       : 老董
 * @Date         : 2026-02-15
 * @Description  : 判别器：dense → leaky ReLU → dense(1)，同一对象同时用于真实与生成样本
 */

use crate::nn::{Graph, GraphError, Linear, Module, Var, VarActivationOps};

#[derive(Debug, Clone)]
pub struct DiscriminatorOutput {
    /// [batch, 1]
    pub logits: Var,
    /// sigmoid(logits)，为“真实”的概率
    pub probs: Var,
}

pub struct Discriminator {
    hidden: Linear,
    output: Linear,
    alpha: f32,
}

impl Discriminator {
    pub fn new(
        graph: &Graph,
        input_size: usize,
        n_units: usize,
        alpha: f32,
    ) -> Result<Self, GraphError> {
        Ok(Self {
            hidden: Linear::new(graph, input_size, n_units, true, "discriminator_hidden")?,
            output: Linear::new(graph, n_units, 1, true, "discriminator_output")?,
            alpha,
        })
    }

    pub fn forward(&self, x: &Var) -> Result<DiscriminatorOutput, GraphError> {
        let h = self.hidden.forward(x)?.leaky_relu(self.alpha)?;
        let logits = self.output.forward(&h)?;
        let probs = logits.sigmoid()?;
        Ok(DiscriminatorOutput { logits, probs })
    }
}

impl Module for Discriminator {
    fn parameters(&self) -> Vec<Var> {
        [self.hidden.parameters(), self.output.parameters()].concat()
    }
}
