mod layer_embedding;
mod layer_lstm;
mod node_dropout;
mod node_vjp;
mod optimizer;

use approx::assert_abs_diff_eq;

use crate::nn::{Graph, Var, VarLossOps};
use crate::tensor::Tensor;

const EPS: f32 = 1e-2;
const TOL: f32 = 2e-3;

/// 把任意形状的输出接到 sigmoid 交叉熵上，得到一个光滑的标量损失
fn scalar_loss(graph: &Graph, output: &Var, seed: u64) -> Var {
    let shape = output.shape().unwrap();
    let labels = graph
        .input(&Tensor::uniform_seeded(0.0, 1.0, &shape, seed))
        .unwrap();
    output.sigmoid_cross_entropy(&labels).unwrap()
}

/// 用中心差分校验`params`上的解析梯度
fn check_numeric_grad(graph: &Graph, loss: &Var, params: &[&Var]) {
    graph.zero_grad();
    loss.backward().unwrap();
    for param in params {
        let analytic = param.grad().unwrap().unwrap().to_vec();
        let base = param.value().unwrap().unwrap();
        let mut data = base.to_vec();
        for i in 0..data.len() {
            let orig = data[i];
            data[i] = orig + EPS;
            param.set_value(&Tensor::new(&data, base.shape())).unwrap();
            loss.forward().unwrap();
            let plus = loss.item().unwrap();

            data[i] = orig - EPS;
            param.set_value(&Tensor::new(&data, base.shape())).unwrap();
            loss.forward().unwrap();
            let minus = loss.item().unwrap();

            data[i] = orig;
            let numeric = (plus - minus) / (2.0 * EPS);
            assert_abs_diff_eq!(analytic[i], numeric, epsilon = TOL);
        }
        param.set_value(&base).unwrap();
    }
}
