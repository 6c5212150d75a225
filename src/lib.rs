//! # seq2seq_gan
//!
//! 用纯rust实现的两个小型神经网络训练练习：
//! - 基于 LSTM 编码器/解码器的序列到序列（seq2seq）翻译模型，训练时使用 teacher forcing，推理时贪心解码；
//! - 生成手写数字图像的 GAN（生成器与判别器各一个两层全连接网络）。
//!
//! 两者都建立在本crate自带的一个小型“先定义后运行”自动微分引擎之上（`tensor` + `nn`）。
//! 计算图是显式传递的 [`nn::Graph`] 句柄，没有任何全局图。
//!

pub mod config;
pub mod errors;
pub mod gan;
pub mod nn;
pub mod seq2seq;
pub mod tensor;
pub mod utils;
