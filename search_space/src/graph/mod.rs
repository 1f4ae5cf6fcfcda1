//! The seam between decoded architectures and whatever framework turns them into a network.
//!
//! A `GraphBuilder` exposes the three primitives a ResNet needs, each implementation
//! decides what a tensor is.

mod builder;
mod error;
mod exec;
mod layer;
mod recorder;
mod shape;

pub use builder::GraphBuilder;
pub use error::GraphErr;
pub use exec::Executor;
pub use layer::{Act, Add, ConvBn, Fc, LayerSpec};
pub use recorder::{Node, NodeId, Recorder};
pub use shape::{Shape, ShapeTracer, TraceSummary};
