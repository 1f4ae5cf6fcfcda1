use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::SearchSpaceErr,
    graph::{Act, Add, ConvBn, Fc, GraphBuilder, LayerSpec},
    init::ParamInit,
};

/// Output channels of a bottleneck block relative to its width.
pub const EXPANSION: usize = 4;

const STEM_NAME: &str = "resnet_conv0";
const STEM_FILTER_SIZE: usize = 5;
const STEM_STRIDE: usize = 2;
const FC_NAME: &str = "resnet_fc";
const FC_STD_DEV: f32 = 0.01;

/// The width and depth resolved for a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePlan {
    pub width: usize,
    pub depth: usize,
}

/// The classification head appended after the last stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadPlan {
    pub class_dim: usize,
}

impl HeadPlan {
    pub fn layer(&self) -> Fc {
        Fc {
            name: FC_NAME.to_string(),
            size: self.class_dim,
            weight_init: ParamInit::Normal {
                mean: 0.,
                std_dev: FC_STD_DEV,
            },
            bias_init: ParamInit::Const { value: 0. },
        }
    }
}

/// A single bottleneck block: 1x1 reduce, 3x3 transform and 1x1 expand, plus a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPlan {
    /// Zero based stage index.
    pub stage: usize,
    /// Zero based repeat index within the stage.
    pub repeat: usize,
    pub in_channels: usize,
    pub width: usize,
    pub stride: usize,
}

impl BlockPlan {
    pub fn out_channels(&self) -> usize {
        self.width * EXPANSION
    }

    /// Whether the shortcut needs a 1x1 projection instead of the identity.
    pub fn has_projection(&self) -> bool {
        self.in_channels != self.out_channels() || self.stride != 1
    }

    pub fn name(&self) -> String {
        format!("resnet_depth{}_block{}", self.repeat, self.stage)
    }

    fn convs(&self) -> [ConvBn; 3] {
        let name = self.name();
        [
            ConvBn::new(
                format!("{name}_bottleneck_conv0"),
                1,
                self.width,
                1,
                Some(Act::Relu),
            ),
            ConvBn::new(
                format!("{name}_bottleneck_conv1"),
                3,
                self.width,
                self.stride,
                Some(Act::Relu),
            ),
            ConvBn::new(
                format!("{name}_bottleneck_conv2"),
                1,
                self.out_channels(),
                1,
                None,
            ),
        ]
    }

    fn shortcut(&self) -> Option<ConvBn> {
        self.has_projection().then(|| {
            ConvBn::new(
                format!("{}_shortcut_conv", self.name()),
                1,
                self.out_channels(),
                self.stride,
                None,
            )
        })
    }

    fn add(&self) -> Add {
        Add::new(format!("{}_bottleneck_add", self.name()), Some(Act::Relu))
    }

    /// Returns the primitive calls of this block in build order.
    pub fn layers(&self) -> Vec<LayerSpec> {
        let mut layers: Vec<_> = self.convs().into_iter().map(LayerSpec::ConvBn).collect();
        layers.extend(self.shortcut().map(LayerSpec::ConvBn));
        layers.push(LayerSpec::Add(self.add()));
        layers
    }

    pub fn build<B: GraphBuilder>(
        &self,
        builder: &mut B,
        input: B::Tensor,
    ) -> Result<B::Tensor, B::Error> {
        let [conv0, conv1, conv2] = self.convs();
        let y = builder.conv_bn(&input, &conv0)?;
        let y = builder.conv_bn(&y, &conv1)?;
        let y = builder.conv_bn(&y, &conv2)?;

        let short = match self.shortcut() {
            Some(conv) => builder.conv_bn(&input, &conv)?,
            None => input,
        };

        builder.add(&short, &y, &self.add())
    }
}

/// A fully resolved ResNet: the stem, one (width, depth) pair per stage and an optional
/// classification head.
///
/// There is always at least one stage, deserialization rejects plans without stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawResNetPlan")]
pub struct ResNetPlan {
    stages: Vec<StagePlan>,
    head: Option<HeadPlan>,
}

#[derive(Deserialize)]
struct RawResNetPlan {
    stages: Vec<StagePlan>,
    head: Option<HeadPlan>,
}

impl TryFrom<RawResNetPlan> for ResNetPlan {
    type Error = SearchSpaceErr;

    fn try_from(raw: RawResNetPlan) -> Result<Self, Self::Error> {
        if raw.stages.is_empty() {
            return Err(SearchSpaceErr::EmptyPlan);
        }

        Ok(Self::new(raw.stages, raw.head))
    }
}

impl ResNetPlan {
    /// Creates a new `ResNetPlan`, `stages` must not be empty.
    pub(crate) fn new(stages: Vec<StagePlan>, head: Option<HeadPlan>) -> Self {
        Self { stages, head }
    }

    pub fn stages(&self) -> &[StagePlan] {
        &self.stages
    }

    pub fn head(&self) -> Option<&HeadPlan> {
        self.head.as_ref()
    }

    /// The 5x5 stride 2 convolution every network starts with.
    pub fn stem(&self) -> ConvBn {
        ConvBn::new(
            STEM_NAME,
            STEM_FILTER_SIZE,
            self.stages[0].width,
            STEM_STRIDE,
            Some(Act::Relu),
        )
    }

    /// Unrolls the stages into their bottleneck blocks.
    ///
    /// Only the first block of every stage but the first one downsamples, the stem already
    /// halved the input before stage one.
    pub fn blocks(&self) -> Vec<BlockPlan> {
        let mut in_channels = self.stages[0].width;
        let mut blocks = Vec::with_capacity(self.num_blocks());

        for (stage, plan) in self.stages.iter().enumerate() {
            for repeat in 0..plan.depth {
                let block = BlockPlan {
                    stage,
                    repeat,
                    in_channels,
                    width: plan.width,
                    stride: if repeat == 0 && stage != 0 { 2 } else { 1 },
                };

                in_channels = block.out_channels();
                blocks.push(block);
            }
        }

        blocks
    }

    pub fn num_blocks(&self) -> usize {
        self.stages.iter().map(|stage| stage.depth).sum()
    }

    /// Returns the primitive calls `build` performs, in order.
    pub fn layers(&self) -> Vec<LayerSpec> {
        let mut layers = vec![LayerSpec::ConvBn(self.stem())];
        for block in self.blocks() {
            layers.extend(block.layers());
        }

        if let Some(head) = &self.head {
            layers.push(LayerSpec::Fc(head.layer()));
        }

        layers
    }

    pub fn build<B: GraphBuilder>(
        &self,
        builder: &mut B,
        input: B::Tensor,
    ) -> Result<B::Tensor, B::Error> {
        debug!(
            "building resnet with {} stages and {} blocks",
            self.stages.len(),
            self.num_blocks()
        );

        let mut x = builder.conv_bn(&input, &self.stem())?;
        for block in self.blocks() {
            x = block.build(builder, x)?;
        }

        if let Some(head) = &self.head {
            x = builder.fc(&x, &head.layer())?;
        }

        Ok(x)
    }
}
