pub mod config;
pub mod error;
pub mod graph;
pub mod init;
pub mod plan;
pub mod registry;
pub mod space;
pub mod tables;

pub use config::{SpaceConfig, SpaceSpec};
pub use error::{ErrKind, Result, SearchSpaceErr};
pub use plan::{Architecture, BlockPlan, HeadPlan, ResNetPlan, StagePlan};
pub use registry::Registry;
pub use space::{ResNetSpace, SearchSpace, sample_tokens, validate_tokens};
