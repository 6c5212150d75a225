/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : Embedding (嵌入) 层：把整数 token id 映射为稠密向量
 */

use ndarray::Array2;

use crate::nn::{Graph, GraphError, Init, Module, Var, VarShapeOps};

/// Embedding 层
///
/// # 输入/输出形状
/// - `forward`：ids [batch, seq_len] -> [batch, seq_len, dim]
/// - `forward_step`：ids [batch] -> [batch, dim]
pub struct Embedding {
    /// 嵌入表 [vocab_size, dim]
    table: Var,
    vocab_size: usize,
    dim: usize,
}

impl Embedding {
    pub fn new(
        graph: &Graph,
        vocab_size: usize,
        dim: usize,
        init: Init,
        name: &str,
    ) -> Result<Self, GraphError> {
        let table = graph.parameter(&[vocab_size, dim], init, &format!("{name}_table"))?;
        Ok(Self {
            table,
            vocab_size,
            dim,
        })
    }

    /// 查整段序列
    pub fn forward(&self, ids: &Array2<usize>) -> Result<Var, GraphError> {
        let flat = ids.iter().copied().collect::<Vec<_>>();
        self.table.gather_rows(&flat, &[ids.nrows(), ids.ncols()])
    }

    /// 查单个时间步（每个样本一个id）
    pub fn forward_step(&self, ids: &[usize]) -> Result<Var, GraphError> {
        self.table.gather_rows(ids, &[ids.len()])
    }

    pub const fn table(&self) -> &Var {
        &self.table
    }

    pub const fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    pub const fn dim(&self) -> usize {
        self.dim
    }
}

impl Module for Embedding {
    fn parameters(&self) -> Vec<Var> {
        vec![self.table.clone()]
    }
}
