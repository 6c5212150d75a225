mod sigmoid_cross_entropy;
mod softmax_cross_entropy;

pub(in crate::nn) use sigmoid_cross_entropy::SigmoidCrossEntropy;
pub(in crate::nn) use softmax_cross_entropy::SoftmaxCrossEntropy;
