use super::{Add, ConvBn, Fc};

/// The graph construction primitives an architecture is built with.
pub trait GraphBuilder {
    type Tensor;
    type Error;

    /// Applies a convolution followed by a batch normalization and an optional activation.
    fn conv_bn(&mut self, input: &Self::Tensor, layer: &ConvBn)
    -> Result<Self::Tensor, Self::Error>;

    /// Adds two tensors of the same shape elementwise and applies an optional activation.
    fn add(
        &mut self,
        x: &Self::Tensor,
        y: &Self::Tensor,
        layer: &Add,
    ) -> Result<Self::Tensor, Self::Error>;

    /// Flattens the input and applies a fully connected layer.
    fn fc(&mut self, input: &Self::Tensor, layer: &Fc) -> Result<Self::Tensor, Self::Error>;
}
