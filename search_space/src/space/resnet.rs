use log::debug;

use super::{SearchSpace, validate_tokens};
use crate::{
    config::SpaceConfig,
    error::{Result, SearchSpaceErr},
    plan::{Architecture, HeadPlan, ResNetPlan, StagePlan},
    tables::{MAX_STAGES, RESNET_STAGES, StageTable},
};

/// A search space over the width and depth of every stage of a bottleneck ResNet.
///
/// Token `2i` selects the channel width of stage `i` and token `2i + 1` its amount of
/// bottleneck blocks.
#[derive(Debug, Clone)]
pub struct ResNetSpace {
    stages: &'static [StageTable],
    head: Option<HeadPlan>,
}

impl ResNetSpace {
    pub const NAME: &'static str = "ResNetSpace";

    /// Creates a new `ResNetSpace`.
    ///
    /// # Arguments
    /// * `config` - The space configuration, `block_num` selects the amount of stages.
    ///
    /// # Returns
    /// A configuration error if `block_num` is not in `1..=4`, a `block_mask` is given or
    /// `class_dim` is zero.
    pub fn new(config: &SpaceConfig) -> Result<Self> {
        if config.block_mask.is_some() {
            return Err(SearchSpaceErr::BlockMaskUnsupported { space: Self::NAME });
        }

        if config.block_num == 0 || config.block_num > MAX_STAGES {
            return Err(SearchSpaceErr::BlockNumOutOfRange {
                got: config.block_num,
                max: MAX_STAGES,
            });
        }

        if config.class_dim == 0 {
            return Err(SearchSpaceErr::InvalidClassDim);
        }

        let head = (!config.extract_feature && config.output_size == Some(1)).then_some(
            HeadPlan {
                class_dim: config.class_dim,
            },
        );

        Ok(Self {
            stages: &RESNET_STAGES[..config.block_num],
            head,
        })
    }

    /// Returns the amount of active stages.
    pub fn block_num(&self) -> usize {
        self.stages.len()
    }

    pub fn head(&self) -> Option<&HeadPlan> {
        self.head.as_ref()
    }

    fn resolve(&self, tokens: &[usize]) -> ResNetPlan {
        let stages = self
            .stages
            .iter()
            .zip(tokens.chunks_exact(2))
            .map(|(table, pair)| StagePlan {
                width: table.widths[pair[0]],
                depth: table.depths[pair[1]],
            })
            .collect();

        ResNetPlan::new(stages, self.head)
    }
}

impl SearchSpace for ResNetSpace {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init_tokens(&self) -> Vec<usize> {
        vec![0; 2 * self.block_num()]
    }

    fn range_table(&self) -> Vec<usize> {
        self.stages
            .iter()
            .flat_map(|table| {
                let (widths, depths) = table.bounds();
                [widths, depths]
            })
            .collect()
    }

    fn token_to_arch(&self, tokens: Option<&[usize]>) -> Result<Architecture> {
        let init;
        let tokens = match tokens {
            Some(tokens) => tokens,
            None => {
                init = self.init_tokens();
                init.as_slice()
            }
        };

        validate_tokens(tokens, &self.range_table())?;

        let plan = self.resolve(tokens);
        debug!("decoded tokens {tokens:?} into stages {:?}", plan.stages());
        Ok(Architecture::ResNet(plan))
    }
}
