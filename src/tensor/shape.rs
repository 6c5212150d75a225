/*
 * @Author       : 老董
 * @Date         : 2023-10-21 03:22:26
 * @Description  : 张量的形状变换：改形、转置、按轴取片/写片、堆叠，以及广播梯度的归约
 */

use super::Tensor;
use crate::errors::TensorError;
use ndarray::{Axis, IxDyn};

impl Tensor {
    /// 改变张量形状（元素总数必须不变）
    pub fn reshape(&self, shape: &[usize]) -> Self {
        let total: usize = shape.iter().product();
        assert!(
            total == self.size(),
            "{}",
            TensorError::DataShapeMismatch {
                data_len: self.size(),
                shape: shape.to_vec(),
            }
        );
        Self::new(&self.to_vec(), shape)
    }

    /// 2阶张量的转置
    pub fn transpose(&self) -> Self {
        assert!(
            self.dimension() == 2,
            "{}",
            TensorError::DimensionMustBe {
                expected: 2,
                got: self.dimension(),
            }
        );
        Self {
            data: self.data.t().as_standard_layout().into_owned(),
        }
    }

    /// 在第`axis`维插入一个长度为1的新维
    pub fn unsqueeze(&self, axis: usize) -> Self {
        assert!(
            axis <= self.dimension(),
            "{}",
            TensorError::AxisOutOfRange {
                axis,
                dimension: self.dimension(),
            }
        );
        Self {
            data: self.data.clone().insert_axis(Axis(axis)),
        }
    }

    /// 取第`axis`维上第`index`个切片，结果去掉该维。
    /// 如：形状[b, t, e]的张量`select(1, i)`得到[b, e]
    pub fn select(&self, axis: usize, index: usize) -> Self {
        self.check_axis(axis);
        let size = self.shape()[axis];
        assert!(
            index < size,
            "{}",
            TensorError::IndexOutOfRange { index, axis, size }
        );
        Self {
            data: self.data.index_axis(Axis(axis), index).to_owned(),
        }
    }

    /// `select`的逆：返回一个与自身同形的张量，其第`axis`维的第`index`片被`src`覆盖
    pub fn scatter_at(&self, axis: usize, index: usize, src: &Tensor) -> Self {
        self.check_axis(axis);
        let size = self.shape()[axis];
        assert!(
            index < size,
            "{}",
            TensorError::IndexOutOfRange { index, axis, size }
        );
        let mut data = self.data.clone();
        let mut slot = data.index_axis_mut(Axis(axis), index);
        assert!(
            slot.shape() == src.shape(),
            "{}",
            TensorError::InconsitentShape
        );
        slot.assign(&src.data);
        Self { data }
    }

    /// 将若干同形张量沿新的第`axis`维堆叠。
    /// 如：t个[b, e]的张量`stack(.., 1)`得到[b, t, e]
    pub fn stack(tensors: &[&Tensor], axis: usize) -> Self {
        assert!(!tensors.is_empty(), "{}", TensorError::EmptyList);
        let first_shape = tensors[0].shape();
        assert!(
            tensors.iter().all(|t| t.shape() == first_shape),
            "{}",
            TensorError::InconsitentShape
        );
        assert!(
            axis <= first_shape.len(),
            "{}",
            TensorError::AxisOutOfRange {
                axis,
                dimension: first_shape.len(),
            }
        );
        let views = tensors.iter().map(|t| t.data.view()).collect::<Vec<_>>();
        match ndarray::stack(Axis(axis), &views) {
            Ok(data) => Self {
                data: data.as_standard_layout().into_owned(),
            },
            Err(e) => panic!("{}: {e}", TensorError::InconsitentShape),
        }
    }

    /// 把一个由广播得到的张量求和归约回`target`形状，用于广播运算的反向传播。
    /// `target`必须可以广播到自身形状，否则panic。
    pub fn sum_to_shape(&self, target: &[usize]) -> Self {
        if self.shape() == target {
            return self.clone();
        }
        let cannot_reduce = || TensorError::CannotReduceTo {
            from: self.shape().to_vec(),
            to: target.to_vec(),
        };
        assert!(target.len() <= self.dimension(), "{}", cannot_reduce());

        // 先把多出来的前导维全部求和掉
        let mut data = self.data.clone();
        for _ in 0..(self.dimension() - target.len()) {
            data = data.sum_axis(Axis(0));
        }
        // 再把目标中长度为1、而当前不为1的维求和（保留该维）
        for (axis, &len) in target.iter().enumerate() {
            let current = data.shape()[axis];
            if len == current {
                continue;
            }
            assert!(len == 1, "{}", cannot_reduce());
            data = data.sum_axis(Axis(axis)).insert_axis(Axis(axis));
        }
        Self {
            data: data.into_shape(IxDyn(target)).unwrap_or_else(|_| panic!("{}", cannot_reduce())),
        }
    }
}
