use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire search space module.
pub type Result<T> = std::result::Result<T, SearchSpaceErr>;

/// Coarse classification of a `SearchSpaceErr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrKind {
    /// The search space was constructed with an unsupported configuration.
    Configuration,
    /// A token vector does not fit the space's range table.
    TokenRange,
    /// A registry lookup or registration failed.
    Registry,
}

/// The search space module's error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchSpaceErr {
    BlockNumOutOfRange {
        got: usize,
        max: usize,
    },
    BlockMaskUnsupported {
        space: &'static str,
    },
    InvalidClassDim,
    EmptyPlan,
    TokenLengthMismatch {
        got: usize,
        expected: usize,
    },
    TokenOutOfRange {
        position: usize,
        token: usize,
        bound: usize,
    },
    UnknownSpace(String),
    DuplicateSpace(String),
}

impl SearchSpaceErr {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrKind {
        match self {
            SearchSpaceErr::BlockNumOutOfRange { .. }
            | SearchSpaceErr::BlockMaskUnsupported { .. }
            | SearchSpaceErr::InvalidClassDim
            | SearchSpaceErr::EmptyPlan => ErrKind::Configuration,
            SearchSpaceErr::TokenLengthMismatch { .. } | SearchSpaceErr::TokenOutOfRange { .. } => {
                ErrKind::TokenRange
            }
            SearchSpaceErr::UnknownSpace(_) | SearchSpaceErr::DuplicateSpace(_) => {
                ErrKind::Registry
            }
        }
    }
}

impl Display for SearchSpaceErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchSpaceErr::BlockNumOutOfRange { got, max } => {
                write!(f, "block number must be between 1 and {max}, got {got}")
            }
            SearchSpaceErr::BlockMaskUnsupported { space } => write!(
                f,
                "{space} searches the original stage layout, block_mask must not be set"
            ),
            SearchSpaceErr::InvalidClassDim => write!(f, "class_dim must be greater than 0"),
            SearchSpaceErr::EmptyPlan => write!(f, "a resnet plan needs at least one stage"),
            SearchSpaceErr::TokenLengthMismatch { got, expected } => {
                write!(f, "token vector has length {got}, expected {expected}")
            }
            SearchSpaceErr::TokenOutOfRange {
                position,
                token,
                bound,
            } => write!(
                f,
                "token {token} at position {position} is out of range, must be less than {bound}"
            ),
            SearchSpaceErr::UnknownSpace(name) => write!(f, "unknown search space: {name}"),
            SearchSpaceErr::DuplicateSpace(name) => {
                write!(f, "search space {name} is already registered")
            }
        }
    }
}

impl Error for SearchSpaceErr {}
