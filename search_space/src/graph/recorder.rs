use std::convert::Infallible;

use super::{Add, ConvBn, Fc, GraphBuilder, LayerSpec};

/// Identifies a tensor produced while recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A recorded primitive call together with the tensors it consumed and produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub layer: LayerSpec,
    pub inputs: Vec<NodeId>,
    pub output: NodeId,
}

/// A `GraphBuilder` that performs no computation and only records the calls made to it.
#[derive(Debug, Default)]
pub struct Recorder {
    nodes: Vec<Node>,
    next_id: usize,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh input tensor.
    pub fn input(&mut self) -> NodeId {
        self.fresh()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the recorded layers in call order.
    pub fn layers(&self) -> Vec<LayerSpec> {
        self.nodes.iter().map(|node| node.layer.clone()).collect()
    }

    /// Returns the amount of primitive calls recorded so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn record(&mut self, layer: LayerSpec, inputs: Vec<NodeId>) -> NodeId {
        let output = self.fresh();
        self.nodes.push(Node {
            layer,
            inputs,
            output,
        });
        output
    }
}

impl GraphBuilder for Recorder {
    type Tensor = NodeId;
    type Error = Infallible;

    fn conv_bn(&mut self, input: &NodeId, layer: &ConvBn) -> Result<NodeId, Infallible> {
        Ok(self.record(LayerSpec::ConvBn(layer.clone()), vec![*input]))
    }

    fn add(&mut self, x: &NodeId, y: &NodeId, layer: &Add) -> Result<NodeId, Infallible> {
        Ok(self.record(LayerSpec::Add(layer.clone()), vec![*x, *y]))
    }

    fn fc(&mut self, input: &NodeId, layer: &Fc) -> Result<NodeId, Infallible> {
        Ok(self.record(LayerSpec::Fc(layer.clone()), vec![*input]))
    }
}
