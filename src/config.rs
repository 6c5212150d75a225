/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : 超参数配置的公共部分：错误类型与 JSON 读写
 */

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("读取配置文件失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("解析配置JSON失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("配置无效: {0}")]
    Invalid(String),
}

/// 从 JSON 字符串解析配置（缺省字段取 `Default`），并立即校验
pub fn from_json_str<T>(json: &str, validate: impl Fn(&T) -> Result<(), ConfigError>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let config: T = serde_json::from_str(json)?;
    validate(&config)?;
    Ok(config)
}

/// 从 JSON 文件解析配置
pub fn from_json_file<T>(
    path: impl AsRef<Path>,
    validate: impl Fn(&T) -> Result<(), ConfigError>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let json = std::fs::read_to_string(path)?;
    from_json_str(&json, validate)
}

pub fn to_json_string<T: Serialize>(config: &T) -> Result<String, ConfigError> {
    Ok(serde_json::to_string_pretty(config)?)
}

// ========== 校验辅助 ==========

pub(crate) fn ensure_positive_size(name: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid(format!("{name}必须大于0")));
    }
    Ok(())
}

pub(crate) fn ensure_keep_prob(name: &str, value: f32) -> Result<(), ConfigError> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(ConfigError::Invalid(format!(
            "{name}须在(0, 1]内，实际为{value}"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_positive_rate(name: &str, value: f32) -> Result<(), ConfigError> {
    if !(value > 0.0) {
        return Err(ConfigError::Invalid(format!("{name}必须为正数，实际为{value}")));
    }
    Ok(())
}
