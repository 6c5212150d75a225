mod config;
mod networks;

use crate::gan::GanConfig;

/// 测试共用的小配置：4维样本、3维噪声
fn tiny_config() -> GanConfig {
    GanConfig {
        input_size: 4,
        z_size: 3,
        g_hidden_size: 8,
        d_hidden_size: 8,
        batch_size: 6,
        epochs: 1,
        seed: 5,
        ..GanConfig::default()
    }
}
