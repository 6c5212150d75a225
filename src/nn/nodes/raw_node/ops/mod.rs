mod add;
mod dropout;
mod gather;
mod leaky_relu;
mod mat_mul;
mod multiply;
mod select;
mod sigmoid;
mod stack;
mod subtract;
mod tanh;

pub(in crate::nn) use add::Add;
pub(in crate::nn) use dropout::Dropout;
pub(in crate::nn) use gather::Gather;
pub(in crate::nn) use leaky_relu::LeakyReLU;
pub(in crate::nn) use mat_mul::MatMul;
pub(in crate::nn) use multiply::Multiply;
pub(in crate::nn) use select::Select;
pub(in crate::nn) use sigmoid::Sigmoid;
pub(in crate::nn) use stack::Stack;
pub(in crate::nn) use subtract::Subtract;
pub(in crate::nn) use tanh::Tanh;
