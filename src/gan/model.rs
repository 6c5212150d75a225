/*
 * @Author       : 老董
 * @Date         : 2026-02-15
 * @Description  : GAN 组合与训练：先更新判别器，再更新生成器
 */

use super::{Discriminator, DiscriminatorOutput, GanConfig, GanError, GanLosses, Generator};
use crate::nn::{Adam, Graph, GraphError, Module, Optimizer, Var};
use crate::tensor::Tensor;

/// 真实样本与噪声的占位输入
#[derive(Debug, Clone)]
pub struct GanInputs {
    /// [batch, real_dim]
    pub real: Var,
    /// [batch, z_dim]
    pub z: Var,
}

pub fn model_inputs(
    graph: &Graph,
    real_dim: usize,
    z_dim: usize,
    batch_size: usize,
) -> Result<GanInputs, GraphError> {
    Ok(GanInputs {
        real: graph.input_shape(&[batch_size, real_dim], Some("input_real"))?,
        z: graph.input_shape(&[batch_size, z_dim], Some("input_z"))?,
    })
}

/// [-1, 1] 上的均匀噪声 [batch, z_size]
pub fn sample_noise(batch_size: usize, z_size: usize, seed: u64) -> Tensor {
    Tensor::uniform_seeded(-1.0, 1.0, &[batch_size, z_size], seed)
}

/// 单步训练的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GanStepReport {
    pub d_loss: f32,
    pub g_loss: f32,
}

/// GAN：拥有计算图、两个网络、损失和两个优化器。
/// 计算图在创建时按固定批大小一次性构建，每步训练只替换输入值
pub struct Gan {
    graph: Graph,
    config: GanConfig,
    inputs: GanInputs,
    generator: Generator,
    discriminator: Discriminator,
    g_model: Var,
    d_real: DiscriminatorOutput,
    d_fake: DiscriminatorOutput,
    losses: GanLosses,
    d_optimizer: Adam,
    g_optimizer: Adam,
    steps: usize,
}

impl Gan {
    pub fn new(config: GanConfig) -> Result<Self, GanError> {
        config.validate()?;
        let graph = Graph::with_name_and_seed("gan", config.seed);
        let inputs = model_inputs(&graph, config.input_size, config.z_size, config.batch_size)?;

        let generator = Generator::new(
            &graph,
            config.z_size,
            config.input_size,
            config.g_hidden_size,
            config.alpha,
        )?;
        let discriminator =
            Discriminator::new(&graph, config.input_size, config.d_hidden_size, config.alpha)?;

        let g_model = generator.forward(&inputs.z)?;
        let d_real = discriminator.forward(&inputs.real)?;
        let d_fake = discriminator.forward(&g_model)?;
        let losses = GanLosses::new(&d_real.logits, &d_fake.logits, config.smooth)?;

        let d_optimizer = Adam::with_config(
            &graph,
            &discriminator.parameters(),
            config.learning_rate,
            config.beta1,
            0.999,
            1e-8,
        );
        let g_optimizer = Adam::with_config(
            &graph,
            &generator.parameters(),
            config.learning_rate,
            config.beta1,
            0.999,
            1e-8,
        );
        tracing::info!(
            g_params = generator.num_params(),
            d_params = discriminator.num_params(),
            batch_size = config.batch_size,
            "GAN已创建"
        );

        Ok(Self {
            graph,
            config,
            inputs,
            generator,
            discriminator,
            g_model,
            d_real,
            d_fake,
            losses,
            d_optimizer,
            g_optimizer,
            steps: 0,
        })
    }

    /// 训练一步：`real_batch` 取值应在 [-1, 1]（与生成器的 tanh 输出一致）
    pub fn train_step(
        &mut self,
        real_batch: &Tensor,
        noise: &Tensor,
    ) -> Result<GanStepReport, GraphError> {
        self.inputs.real.set_value(real_batch)?;
        self.inputs.z.set_value(noise)?;
        self.graph.train();

        let d_loss = self.d_optimizer.minimize(&self.losses.d_loss)?;
        let g_loss = self.g_optimizer.minimize(&self.losses.g_loss)?;

        self.steps += 1;
        tracing::debug!(step = self.steps, d_loss, g_loss, "GAN训练步");
        Ok(GanStepReport { d_loss, g_loss })
    }

    /// 用生成器生成样本（任意批大小），不改变已构建的训练图
    pub fn sample(&self, noise: &Tensor) -> Result<Tensor, GraphError> {
        let mark = self.graph.mark();
        let result = self.graph.no_grad_scope(|graph| -> Result<Tensor, GraphError> {
            let z = graph.input(noise)?;
            let samples = self.generator.forward(&z)?;
            samples.forward()?;
            samples.value()?.ok_or_else(|| {
                GraphError::ComputationError("生成器输出未能前向计算".to_string())
            })
        });
        self.graph.discard_since(mark);
        result
    }

    pub fn generator_parameters(&self) -> Vec<Var> {
        self.generator.parameters()
    }

    pub fn discriminator_parameters(&self) -> Vec<Var> {
        self.discriminator.parameters()
    }

    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    pub const fn config(&self) -> &GanConfig {
        &self.config
    }

    pub const fn losses(&self) -> &GanLosses {
        &self.losses
    }

    /// 生成器在训练图中的输出
    pub const fn generated(&self) -> &Var {
        &self.g_model
    }

    pub const fn d_real(&self) -> &DiscriminatorOutput {
        &self.d_real
    }

    pub const fn d_fake(&self) -> &DiscriminatorOutput {
        &self.d_fake
    }

    pub const fn steps(&self) -> usize {
        self.steps
    }
}
