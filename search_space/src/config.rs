use serde::{Deserialize, Serialize};

const DEFAULT_CLASS_DIM: usize = 1000;

fn default_class_dim() -> usize {
    DEFAULT_CLASS_DIM
}

/// Construction parameters shared by every search space.
///
/// `input_size` and `output_size` are the spatial sizes of the network input and of the
/// expected output, an `output_size` of 1 means the network ends in a classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceConfig {
    #[serde(default)]
    pub input_size: Option<usize>,
    #[serde(default)]
    pub output_size: Option<usize>,
    pub block_num: usize,
    #[serde(default)]
    pub block_mask: Option<Vec<usize>>,
    #[serde(default)]
    pub extract_feature: bool,
    #[serde(default = "default_class_dim")]
    pub class_dim: usize,
}

impl SpaceConfig {
    /// Creates a new `SpaceConfig` with no mask, a classifier head enabled and the default
    /// amount of classes.
    ///
    /// # Arguments
    /// * `input_size` - The spatial size of the input.
    /// * `output_size` - The spatial size of the output.
    /// * `block_num` - The amount of active stages.
    pub fn new(input_size: Option<usize>, output_size: Option<usize>, block_num: usize) -> Self {
        Self {
            input_size,
            output_size,
            block_num,
            block_mask: None,
            extract_feature: false,
            class_dim: DEFAULT_CLASS_DIM,
        }
    }

    pub fn with_class_dim(mut self, class_dim: usize) -> Self {
        self.class_dim = class_dim;
        self
    }

    pub fn with_extract_feature(mut self, extract_feature: bool) -> Self {
        self.extract_feature = extract_feature;
        self
    }

    pub fn with_block_mask(mut self, block_mask: Vec<usize>) -> Self {
        self.block_mask = Some(block_mask);
        self
    }
}

/// A named search space selection, resolved through a `Registry`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceSpec {
    pub name: String,
    #[serde(flatten)]
    pub config: SpaceConfig,
}
