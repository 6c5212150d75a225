/*
 * @Author       : 老董
 * @Date         : 2026-02-15
 * @Description  : GAN 的损失：判别器对真/假样本的二分类交叉熵，生成器希望假样本被判为真
 */

use crate::nn::{GraphError, Var, VarLossOps};
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct GanLosses {
    /// BCE(logits_real, 1 - smooth)
    pub d_loss_real: Var,
    /// BCE(logits_fake, 0)
    pub d_loss_fake: Var,
    /// d_loss_real + d_loss_fake
    pub d_loss: Var,
    /// BCE(logits_fake, 1)
    pub g_loss: Var,
}

impl GanLosses {
    /// `real_logits`/`fake_logits` 均为 [batch, 1]；`smooth` 为真实样本的标签平滑量
    pub fn new(real_logits: &Var, fake_logits: &Var, smooth: f32) -> Result<Self, GraphError> {
        let graph = real_logits.get_graph();
        let real_shape = real_logits.shape()?;
        let fake_shape = fake_logits.shape()?;

        let real_labels = graph.constant(&Tensor::full(1.0 - smooth, &real_shape))?;
        let fake_labels = graph.zeros(&fake_shape)?;
        let fooled_labels = graph.ones(&fake_shape)?;

        let d_loss_real = real_logits.sigmoid_cross_entropy(&real_labels)?;
        let d_loss_fake = fake_logits.sigmoid_cross_entropy(&fake_labels)?;
        let d_loss = d_loss_real.try_add(&d_loss_fake)?;
        let g_loss = fake_logits.sigmoid_cross_entropy(&fooled_labels)?;
        Ok(Self {
            d_loss_real,
            d_loss_fake,
            d_loss,
            g_loss,
        })
    }
}
