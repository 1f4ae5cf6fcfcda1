mod resnet;

use serde::{Deserialize, Serialize};

use crate::graph::{GraphBuilder, LayerSpec};

pub use resnet::{BlockPlan, EXPANSION, HeadPlan, ResNetPlan, StagePlan};

/// A decoded architecture, one variant per search space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Architecture {
    ResNet(ResNetPlan),
}

impl Architecture {
    /// Builds the network on top of `input`.
    ///
    /// # Arguments
    /// * `builder` - The graph primitives to build with.
    /// * `input` - The input tensor.
    ///
    /// # Returns
    /// The output tensor or the first error raised by the builder.
    pub fn build<B: GraphBuilder>(
        &self,
        builder: &mut B,
        input: B::Tensor,
    ) -> Result<B::Tensor, B::Error> {
        match self {
            Architecture::ResNet(plan) => plan.build(builder, input),
        }
    }

    /// Returns the primitive calls `build` performs, in order.
    pub fn layers(&self) -> Vec<LayerSpec> {
        match self {
            Architecture::ResNet(plan) => plan.layers(),
        }
    }

    pub fn as_resnet(&self) -> Option<&ResNetPlan> {
        match self {
            Architecture::ResNet(plan) => Some(plan),
        }
    }
}
