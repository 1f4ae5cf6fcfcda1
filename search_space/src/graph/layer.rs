use serde::{Deserialize, Serialize};

use crate::init::ParamInit;

/// Activation functions available to the graph primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Act {
    Relu,
}

impl Act {
    pub fn f(&self, x: f32) -> f32 {
        match self {
            Act::Relu => x.max(0.),
        }
    }
}

/// A convolution + batch normalization + optional activation.
///
/// The convolution has no bias and is padded with `(filter_size - 1) / 2` on every side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvBn {
    pub name: String,
    pub filter_size: usize,
    pub num_filters: usize,
    pub stride: usize,
    pub act: Option<Act>,
}

impl ConvBn {
    pub fn new(
        name: impl Into<String>,
        filter_size: usize,
        num_filters: usize,
        stride: usize,
        act: Option<Act>,
    ) -> Self {
        Self {
            name: name.into(),
            filter_size,
            num_filters,
            stride,
            act,
        }
    }

    pub fn padding(&self) -> usize {
        (self.filter_size - 1) / 2
    }

    /// Returns the output length of a spatial dimension of length `size`.
    pub fn out_size(&self, size: usize) -> usize {
        (size + 2 * self.padding() - self.filter_size) / self.stride + 1
    }
}

/// An elementwise addition with an optional activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Add {
    pub name: String,
    pub act: Option<Act>,
}

impl Add {
    pub fn new(name: impl Into<String>, act: Option<Act>) -> Self {
        Self {
            name: name.into(),
            act,
        }
    }
}

/// A fully connected layer without activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fc {
    pub name: String,
    pub size: usize,
    pub weight_init: ParamInit,
    pub bias_init: ParamInit,
}

/// A single call to one of the `GraphBuilder` primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LayerSpec {
    ConvBn(ConvBn),
    Add(Add),
    Fc(Fc),
}

impl LayerSpec {
    pub fn name(&self) -> &str {
        match self {
            LayerSpec::ConvBn(l) => &l.name,
            LayerSpec::Add(l) => &l.name,
            LayerSpec::Fc(l) => &l.name,
        }
    }
}
