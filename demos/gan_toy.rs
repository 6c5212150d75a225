/*
 * 二维玩具 GAN 示例
 *
 * 真实数据是单位圆上的8个小高斯团，生成器把 [-1, 1] 上的均匀噪声映射到平面上。
 * 结构与 MNIST GAN 相同（两层全连接 + LeakyReLU，生成器输出 tanh），只是输入维度为2。
 *
 * # 运行
 * ```bash
 * cargo run --example gan_toy
 * RUST_LOG=debug cargo run --example gan_toy -- demos/gan.json
 * ```
 */

use seq2seq_gan::gan::{Gan, GanConfig, sample_noise};
use seq2seq_gan::tensor::Tensor;
use std::error::Error;
use std::f32::consts::PI;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MODES: usize = 8;
const STEPS_PER_EPOCH: usize = 50;

/// 从8个小高斯团中各取若干点，坐标缩放到 0.8 以内
fn ring_batch(batch_size: usize, seed: u64) -> Tensor {
    let jitter = Tensor::normal_seeded(0.0, 0.03, &[batch_size, 2], seed).to_vec();
    let mut data = Vec::with_capacity(batch_size * 2);
    for row in 0..batch_size {
        let angle = 2.0 * PI * (row % MODES) as f32 / MODES as f32;
        data.push(0.8 * angle.cos() + jitter[row * 2]);
        data.push(0.8 * angle.sin() + jitter[row * 2 + 1]);
    }
    Tensor::new(&data, &[batch_size, 2])
}

/// 生成点到圆环的平均距离
fn mean_ring_error(samples: &Tensor) -> f32 {
    let values = samples.to_vec();
    let rows = values.len() / 2;
    values
        .chunks(2)
        .map(|p| ((p[0] * p[0] + p[1] * p[1]).sqrt() - 0.8).abs())
        .sum::<f32>()
        / rows as f32
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== 二维玩具 GAN 示例 ===\n");

    let config = match std::env::args().nth(1) {
        Some(path) => GanConfig::from_json_file(path)?,
        None => GanConfig {
            input_size: 2,
            z_size: 8,
            g_hidden_size: 64,
            d_hidden_size: 64,
            batch_size: 64,
            epochs: 40,
            ..GanConfig::default()
        },
    };
    println!("超参数：\n{}\n", config.to_json_string()?);

    let mut gan = Gan::new(config.clone())?;
    let probe = sample_noise(512, config.z_size, 12345);
    println!("训练前到圆环的平均距离：{:.4}", mean_ring_error(&gan.sample(&probe)?));

    let start = Instant::now();
    let mut step: u64 = 0;
    for epoch in 0..config.epochs {
        let mut d_sum = 0.0;
        let mut g_sum = 0.0;
        for _ in 0..STEPS_PER_EPOCH {
            let real = ring_batch(config.batch_size, step);
            let noise = sample_noise(config.batch_size, config.z_size, config.seed + step);
            let report = gan.train_step(&real, &noise)?;
            d_sum += report.d_loss;
            g_sum += report.g_loss;
            step += 1;
        }
        if epoch % 5 == 0 || epoch + 1 == config.epochs {
            println!(
                "Epoch {:>3}/{}: d_loss={:.4}, g_loss={:.4}, 到圆环距离={:.4}",
                epoch + 1,
                config.epochs,
                d_sum / STEPS_PER_EPOCH as f32,
                g_sum / STEPS_PER_EPOCH as f32,
                mean_ring_error(&gan.sample(&probe)?)
            );
        }
    }
    println!("\n✓ 训练完成（{:.1}s）", start.elapsed().as_secs_f32());
    Ok(())
}
