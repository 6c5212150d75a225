/*
 * @Author       : 老董
 * @Date         : 2026-02-15
 * @Description  : 生成对抗网络（GAN）：两层全连接的生成器与判别器
 *
 * 数据流：GanInputs → Generator → Discriminator（真/假两路共享权重）→ GanLosses → 两个互不相交的优化器
 */

mod config;
mod discriminator;
mod error;
mod generator;
mod loss;
mod model;

#[cfg(test)]
mod tests;

pub use config::GanConfig;
pub use discriminator::{Discriminator, DiscriminatorOutput};
pub use error::GanError;
pub use generator::Generator;
pub use loss::GanLosses;
pub use model::{Gan, GanInputs, GanStepReport, model_inputs, sample_noise};
