/*
 * @Author       : 老董
 * @Description  : Embedding 层测试
 */

use ndarray::array;

use crate::nn::{Embedding, Graph, Init, Module, VarShapeOps};
use crate::tensor::Tensor;

#[test]
fn test_embedding_lookup() {
    let graph = Graph::new_with_seed(1);
    let emb = Embedding::new(&graph, 6, 4, Init::Uniform { min: -1.0, max: 1.0 }, "emb").unwrap();
    assert_eq!(emb.num_params(), 24);

    let ids = array![[1, 5, 0], [3, 3, 2]];
    let out = emb.forward(&ids).unwrap();
    assert_eq!(out.shape().unwrap(), vec![2, 3, 4]);
    out.forward().unwrap();

    let table = emb.table().value().unwrap().unwrap();
    let value = out.value().unwrap().unwrap();
    assert_eq!(value.select(0, 0).select(0, 1).to_vec(), table.select(0, 5).to_vec());
    assert_eq!(value.select(0, 1).select(0, 0).to_vec(), table.select(0, 3).to_vec());

    let step = emb.forward_step(&[2, 4]).unwrap();
    assert_eq!(step.shape().unwrap(), vec![2, 4]);
    step.forward().unwrap();
    let step_value = step.value().unwrap().unwrap();
    assert_eq!(step_value.select(0, 1).to_vec(), table.select(0, 4).to_vec());
}

#[test]
fn test_gather_rows_through_embedding_table() {
    let graph = Graph::new();
    let emb = Embedding::new(&graph, 3, 2, Init::Zeros, "emb").unwrap();
    emb.table()
        .set_value(&Tensor::new(&[0.0, 0.0, 1.0, 1.0, 2.0, 2.0], &[3, 2]))
        .unwrap();
    let rows = emb.table().gather_rows(&[2, 1], &[2]).unwrap();
    rows.forward().unwrap();
    assert_eq!(rows.value().unwrap().unwrap().to_vec(), vec![2.0, 2.0, 1.0, 1.0]);
}
