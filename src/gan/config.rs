/*
 * @Author       : 老董
 * @Date         : 2026-02-15
 * @Description  : GAN 超参数
 */

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{self, ConfigError, ensure_positive_rate, ensure_positive_size};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GanConfig {
    /// 真实样本维度（MNIST 为 28*28）
    pub input_size: usize,
    /// 噪声维度
    pub z_size: usize,
    pub g_hidden_size: usize,
    pub d_hidden_size: usize,
    /// leaky ReLU 的负半轴斜率
    pub alpha: f32,
    /// 标签平滑：真实样本的标签取 1 - smooth
    pub smooth: f32,
    pub learning_rate: f32,
    /// Adam 的 β1
    pub beta1: f32,
    pub batch_size: usize,
    pub epochs: usize,
    pub seed: u64,
}

impl Default for GanConfig {
    fn default() -> Self {
        Self {
            input_size: 784,
            z_size: 100,
            g_hidden_size: 128,
            d_hidden_size: 128,
            alpha: 0.01,
            smooth: 0.1,
            learning_rate: 0.002,
            beta1: 0.5,
            batch_size: 100,
            epochs: 100,
            seed: 42,
        }
    }
}

impl GanConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        config::from_json_str(json, Self::validate)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        config::from_json_file(path, Self::validate)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        config::to_json_string(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive_size("input_size", self.input_size)?;
        ensure_positive_size("z_size", self.z_size)?;
        ensure_positive_size("g_hidden_size", self.g_hidden_size)?;
        ensure_positive_size("d_hidden_size", self.d_hidden_size)?;
        ensure_positive_size("batch_size", self.batch_size)?;
        ensure_positive_size("epochs", self.epochs)?;
        ensure_positive_rate("learning_rate", self.learning_rate)?;
        if !(0.0..1.0).contains(&self.smooth) {
            return Err(ConfigError::Invalid(format!(
                "smooth须在[0, 1)内，实际为{}",
                self.smooth
            )));
        }
        if !(0.0..1.0).contains(&self.beta1) {
            return Err(ConfigError::Invalid(format!(
                "beta1须在[0, 1)内，实际为{}",
                self.beta1
            )));
        }
        if !(self.alpha >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "alpha不能为负，实际为{}",
                self.alpha
            )));
        }
        Ok(())
    }
}
