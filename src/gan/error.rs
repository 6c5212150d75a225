/*
 * @Author       : 老董
 * @Date         : 2026-02-15
 * @Description  : GAN 的错误类型
 */

use thiserror::Error;

use crate::config::ConfigError;
use crate::nn::GraphError;

#[derive(Error, Debug)]
pub enum GanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
