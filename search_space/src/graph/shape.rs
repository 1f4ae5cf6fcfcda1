use log::trace;
use serde::{Deserialize, Serialize};

use super::{Add, ConvBn, Fc, GraphBuilder, GraphErr};

/// The shape of a single sample, channels first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl Shape {
    pub fn new(channels: usize, height: usize, width: usize) -> Self {
        Self {
            channels,
            height,
            width,
        }
    }

    /// Creates the shape of a square image.
    pub fn image(channels: usize, size: usize) -> Self {
        Self::new(channels, size, size)
    }

    pub fn numel(&self) -> usize {
        self.channels * self.height * self.width
    }

    fn dims(&self) -> Vec<usize> {
        vec![self.channels, self.height, self.width]
    }
}

/// Totals gathered by a `ShapeTracer`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceSummary {
    /// Trainable parameters: convolution and fully connected weights, biases and the
    /// normalization scale and shift.
    pub params: usize,
    /// Multiply-accumulate operations for a single sample.
    pub macs: usize,
    /// Amount of primitive calls traced.
    pub layers: usize,
}

/// A `GraphBuilder` that propagates shapes, checks residual additions and accounts for the
/// size and cost of the network without allocating any tensor.
#[derive(Debug, Default)]
pub struct ShapeTracer {
    summary: TraceSummary,
}

impl ShapeTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> TraceSummary {
        self.summary
    }
}

impl GraphBuilder for ShapeTracer {
    type Tensor = Shape;
    type Error = GraphErr;

    fn conv_bn(&mut self, input: &Shape, layer: &ConvBn) -> Result<Shape, GraphErr> {
        if input.numel() == 0 {
            return Err(GraphErr::EmptyInput {
                name: layer.name.clone(),
            });
        }

        let out = Shape::new(
            layer.num_filters,
            layer.out_size(input.height),
            layer.out_size(input.width),
        );

        let k2 = layer.filter_size * layer.filter_size;
        self.summary.params += k2 * input.channels * layer.num_filters + 2 * layer.num_filters;
        self.summary.macs += k2 * input.channels * out.numel();
        self.summary.layers += 1;

        trace!("{}: {input:?} -> {out:?}", layer.name);
        Ok(out)
    }

    fn add(&mut self, x: &Shape, y: &Shape, layer: &Add) -> Result<Shape, GraphErr> {
        if x != y {
            return Err(GraphErr::ShapeMismatch {
                name: layer.name.clone(),
                lhs: x.dims(),
                rhs: y.dims(),
            });
        }

        self.summary.layers += 1;
        Ok(*x)
    }

    fn fc(&mut self, input: &Shape, layer: &Fc) -> Result<Shape, GraphErr> {
        let features = input.numel();
        if features == 0 {
            return Err(GraphErr::EmptyInput {
                name: layer.name.clone(),
            });
        }

        self.summary.params += (features + 1) * layer.size;
        self.summary.macs += features * layer.size;
        self.summary.layers += 1;

        Ok(Shape::new(layer.size, 1, 1))
    }
}
