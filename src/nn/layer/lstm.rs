/*
 * @Author       : 老董
 * @Date         : 2025-12-30
 * @Description  : LSTM 层：单步 LstmCell 与多层堆叠的 StackedLstm
 *
 * 公式:
 *   i_t = σ(x_t @ W_ii + h_{t-1} @ W_hi + b_i)   # 输入门
 *   f_t = σ(x_t @ W_if + h_{t-1} @ W_hf + b_f)   # 遗忘门
 *   g_t = tanh(x_t @ W_ig + h_{t-1} @ W_hg + b_g) # 候选细胞
 *   o_t = σ(x_t @ W_io + h_{t-1} @ W_ho + b_o)   # 输出门
 *   c_t = f_t ⊙ c_{t-1} + i_t ⊙ g_t              # 细胞状态
 *   h_t = o_t ⊙ tanh(c_t)                        # 隐藏状态
 *
 * 形状:
 * - input: [batch, input_size]
 * - hidden / cell: [batch, hidden_size]
 *
 * 权重布局（按门分离）:
 * - W_ii, W_if, W_ig, W_io: 各 [input_size, hidden_size]
 * - W_hi, W_hf, W_hg, W_ho: 各 [hidden_size, hidden_size]
 * - b_i, b_f, b_g, b_o: 各 [1, hidden_size]
 */

use crate::nn::{
    Graph, GraphError, Init, Module, Var, VarActivationOps, VarMatrixOps, VarRegularizeOps,
};

/// LSTM 的携带状态 `(h, c)`
#[derive(Debug, Clone)]
pub struct LstmState {
    /// 隐藏状态 [batch, hidden_size]
    pub h: Var,
    /// 细胞状态 [batch, hidden_size]
    pub c: Var,
}

impl LstmState {
    /// 全零初始状态
    pub fn zeros(graph: &Graph, batch_size: usize, hidden_size: usize) -> Result<Self, GraphError> {
        Ok(Self {
            h: graph.zeros(&[batch_size, hidden_size])?,
            c: graph.zeros(&[batch_size, hidden_size])?,
        })
    }
}

/// 单个门的参数：输入投影、循环投影和偏置
struct Gate {
    w_x: Var,
    w_h: Var,
    b: Var,
}

impl Gate {
    fn new(
        graph: &Graph,
        input_size: usize,
        hidden_size: usize,
        init: &Init,
        bias_init: Init,
        name: &str,
        gate: char,
    ) -> Result<Self, GraphError> {
        Ok(Self {
            w_x: graph.parameter(
                &[input_size, hidden_size],
                init.clone(),
                &format!("{name}_W_i{gate}"),
            )?,
            w_h: graph.parameter(
                &[hidden_size, hidden_size],
                init.clone(),
                &format!("{name}_W_h{gate}"),
            )?,
            b: graph.parameter(&[1, hidden_size], bias_init, &format!("{name}_b_{gate}"))?,
        })
    }

    /// x @ W_x + h @ W_h + b
    fn pre_activation(&self, x: &Var, h: &Var) -> Result<Var, GraphError> {
        let xw = x.matmul(&self.w_x)?;
        let hw = h.matmul(&self.w_h)?;
        Var::sum_all(&[&xw, &hw, &self.b])
    }

    fn parameters(&self) -> [Var; 3] {
        [self.w_x.clone(), self.w_h.clone(), self.b.clone()]
    }
}

/// 单层 LSTM 单元，每次调用 `step` 展开一个时间步
pub struct LstmCell {
    input_gate: Gate,
    forget_gate: Gate,
    cell_gate: Gate,
    output_gate: Gate,
    input_size: usize,
    hidden_size: usize,
}

impl LstmCell {
    /// 创建 LSTM 单元。所有权重用`init`初始化；遗忘门偏置初始化为1（有助于训练初期记住信息），其余偏置为0
    pub fn new(
        graph: &Graph,
        input_size: usize,
        hidden_size: usize,
        init: Init,
        name: &str,
    ) -> Result<Self, GraphError> {
        Ok(Self {
            input_gate: Gate::new(graph, input_size, hidden_size, &init, Init::Zeros, name, 'i')?,
            forget_gate: Gate::new(graph, input_size, hidden_size, &init, Init::Ones, name, 'f')?,
            cell_gate: Gate::new(graph, input_size, hidden_size, &init, Init::Zeros, name, 'g')?,
            output_gate: Gate::new(graph, input_size, hidden_size, &init, Init::Zeros, name, 'o')?,
            input_size,
            hidden_size,
        })
    }

    /// 展开一个时间步，返回新的 `(h, c)`
    pub fn step(&self, x: &Var, state: &LstmState) -> Result<LstmState, GraphError> {
        let i = self.input_gate.pre_activation(x, &state.h)?.sigmoid()?;
        let f = self.forget_gate.pre_activation(x, &state.h)?.sigmoid()?;
        let g = self.cell_gate.pre_activation(x, &state.h)?.tanh()?;
        let o = self.output_gate.pre_activation(x, &state.h)?.sigmoid()?;

        let c = f.try_mul(&state.c)?.try_add(&i.try_mul(&g)?)?;
        let h = o.try_mul(&c.tanh()?)?;
        Ok(LstmState { h, c })
    }

    pub const fn input_size(&self) -> usize {
        self.input_size
    }

    pub const fn hidden_size(&self) -> usize {
        self.hidden_size
    }
}

impl Module for LstmCell {
    fn parameters(&self) -> Vec<Var> {
        [
            &self.input_gate,
            &self.forget_gate,
            &self.cell_gate,
            &self.output_gate,
        ]
        .into_iter()
        .flat_map(Gate::parameters)
        .collect()
    }
}

/// 多层 LSTM：第 l 层的输出作为第 l+1 层的输入，
/// 每层的输入和输出都包一层 dropout，保留概率在每次 `step` 时给定
pub struct StackedLstm {
    cells: Vec<LstmCell>,
}

impl StackedLstm {
    pub fn new(
        graph: &Graph,
        input_size: usize,
        hidden_size: usize,
        num_layers: usize,
        init: Init,
        name: &str,
    ) -> Result<Self, GraphError> {
        if num_layers == 0 {
            return Err(GraphError::InvalidOperation(
                "StackedLstm至少需要1层".to_string(),
            ));
        }
        let cells = (0..num_layers)
            .map(|layer| {
                let layer_input = if layer == 0 { input_size } else { hidden_size };
                LstmCell::new(
                    graph,
                    layer_input,
                    hidden_size,
                    init.clone(),
                    &format!("{name}_l{layer}"),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { cells })
    }

    /// 各层的全零初始状态
    pub fn zero_state(&self, graph: &Graph, batch_size: usize) -> Result<Vec<LstmState>, GraphError> {
        self.cells
            .iter()
            .map(|cell| LstmState::zeros(graph, batch_size, cell.hidden_size()))
            .collect()
    }

    /// 展开一个时间步
    ///
    /// # 参数
    /// - `input`: [batch, input_size]
    /// - `states`: 每层一个上一步状态
    /// - `keep_prob`: dropout 保留概率，为1时不创建 dropout 节点（如贪心解码）
    ///
    /// # 返回
    /// 最顶层的输出 [batch, hidden_size] 与每层的新状态
    pub fn step(
        &self,
        input: &Var,
        states: &[LstmState],
        keep_prob: f32,
    ) -> Result<(Var, Vec<LstmState>), GraphError> {
        if states.len() != self.cells.len() {
            return Err(GraphError::InvalidOperation(format!(
                "StackedLstm有{}层，但传入了{}个状态",
                self.cells.len(),
                states.len()
            )));
        }
        let use_dropout = keep_prob < 1.0;

        let mut layer_input = input.clone();
        let mut new_states = Vec::with_capacity(self.cells.len());
        for (cell, state) in self.cells.iter().zip(states) {
            let x = if use_dropout {
                layer_input.dropout(keep_prob)?
            } else {
                layer_input
            };
            let next = cell.step(&x, state)?;
            layer_input = if use_dropout {
                next.h.dropout(keep_prob)?
            } else {
                next.h.clone()
            };
            new_states.push(next);
        }
        Ok((layer_input, new_states))
    }

    pub fn cells(&self) -> &[LstmCell] {
        &self.cells
    }

    pub fn num_layers(&self) -> usize {
        self.cells.len()
    }

    pub fn hidden_size(&self) -> usize {
        self.cells.last().map_or(0, LstmCell::hidden_size)
    }
}

impl Module for StackedLstm {
    fn parameters(&self) -> Vec<Var> {
        self.cells.iter().flat_map(Module::parameters).collect()
    }
}
