/*
 * @Author       : 老董
 * @Date         : 2023-10-21 03:22:26
 * @Description  : 张量的规约、激活与其他逐元素运算
 */

use crate::errors::TensorError;
use crate::tensor::Tensor;
use ndarray::Axis;

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl From<f32> for Tensor {
    /// 实现 From<f32> trait 用于将`f32`类型转换为形状为`[1,1]`的张量
    fn from(scalar: f32) -> Tensor {
        Tensor::new(&[scalar], &[1, 1])
    }
}

impl Tensor {
    /// 对张量中的所有元素求和并返回一个形状为[1, 1]的标量。
    pub fn sum(&self) -> Tensor {
        Tensor::from(self.data.sum())
    }

    /// 对张量中的所有元素求均值并返回一个形状为[1, 1]的标量；空张量返回0。
    pub fn mean(&self) -> Tensor {
        Tensor::from(self.data.mean().unwrap_or(0.0))
    }

    /// 沿某一轴求和，该轴被移除
    pub fn sum_axis(&self, axis: usize) -> Tensor {
        self.check_axis(axis);
        Tensor {
            data: self.data.sum_axis(Axis(axis)),
        }
    }

    /// 逐元素施加任意函数
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Tensor {
        Tensor {
            data: self.data.mapv(f),
        }
    }

    pub fn sigmoid(&self) -> Tensor {
        self.map(|x| 1.0 / (1.0 + (-x).exp()))
    }

    pub fn tanh(&self) -> Tensor {
        self.map(f32::tanh)
    }

    /// 把所有元素限制在[min, max]内
    pub fn clip(&self, min: f32, max: f32) -> Tensor {
        assert!(min <= max, "clip的下界{min}不能大于上界{max}");
        self.map(|x| x.clamp(min, max))
    }

    /// 对最后一维做数值稳定的softmax
    pub fn softmax_last_axis(&self) -> Tensor {
        let last = self.last_axis();
        let mut data = self.data.clone();
        for mut lane in data.lanes_mut(Axis(last)) {
            let max = lane.fold(f32::NEG_INFINITY, |m, &x| m.max(x));
            lane.mapv_inplace(|x| (x - max).exp());
            let sum = lane.sum();
            lane.mapv_inplace(|x| x / sum);
        }
        Tensor { data }
    }

    /// 对最后一维取最大值下标，按行优先顺序展平返回（相同最大值取首个）
    pub fn argmax_last_axis(&self) -> Vec<usize> {
        let last = self.last_axis();
        self.data
            .lanes(Axis(last))
            .into_iter()
            .map(|lane| {
                lane.iter()
                    .enumerate()
                    .fold((0, f32::NEG_INFINITY), |(best_i, best), (i, &x)| {
                        if x > best { (i, x) } else { (best_i, best) }
                    })
                    .0
            })
            .collect()
    }

    /// 由一组id生成独热（one-hot）张量，结果形状为`shape + [depth]`
    pub fn one_hot(ids: &[usize], shape: &[usize], depth: usize) -> Tensor {
        assert_eq!(
            ids.len(),
            shape.iter().product::<usize>(),
            "{}",
            TensorError::DataShapeMismatch {
                data_len: ids.len(),
                shape: shape.to_vec(),
            }
        );
        let mut data = vec![0.0; ids.len() * depth];
        for (row, &id) in ids.iter().enumerate() {
            assert!(id < depth, "{}", TensorError::IdOutOfRange { id, depth });
            data[row * depth + id] = 1.0;
        }
        let mut out_shape = shape.to_vec();
        out_shape.push(depth);
        Tensor::new(&data, &out_shape)
    }

    fn last_axis(&self) -> usize {
        assert!(
            self.dimension() > 0,
            "{}",
            TensorError::DimensionMustBe {
                expected: 1,
                got: 0,
            }
        );
        self.dimension() - 1
    }

    pub(in crate::tensor) fn check_axis(&self, axis: usize) {
        assert!(
            axis < self.dimension(),
            "{}",
            TensorError::AxisOutOfRange {
                axis,
                dimension: self.dimension(),
            }
        );
    }
}
