/*
 * @Author       : 老董
 * @Date         : 2025-12-30
 * @Description  : 神经网络层：全连接、嵌入、LSTM
 */

mod embedding;
mod linear;
mod lstm;

pub use embedding::Embedding;
pub use linear::Linear;
pub use lstm::{LstmCell, LstmState, StackedLstm};
