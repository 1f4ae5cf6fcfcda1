use std::{
    error::Error,
    fmt::{self, Display},
};

use ndarray::ShapeError;

use crate::init::InitErr;

/// Errors raised by the in-tree `GraphBuilder` implementations.
#[derive(Debug)]
pub enum GraphErr {
    ShapeMismatch {
        name: String,
        lhs: Vec<usize>,
        rhs: Vec<usize>,
    },
    EmptyInput {
        name: String,
    },
    Shape(ShapeError),
    Init {
        name: String,
        source: InitErr,
    },
}

impl Display for GraphErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphErr::ShapeMismatch { name, lhs, rhs } => {
                write!(f, "shape mismatch in {name}: {lhs:?} and {rhs:?}")
            }
            GraphErr::EmptyInput { name } => write!(f, "{name} received an empty input"),
            GraphErr::Shape(e) => write!(f, "invalid tensor shape: {e}"),
            GraphErr::Init { name, source } => {
                write!(f, "failed to initialize the parameters of {name}: {source}")
            }
        }
    }
}

impl Error for GraphErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GraphErr::Shape(e) => Some(e),
            GraphErr::Init { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ShapeError> for GraphErr {
    fn from(value: ShapeError) -> Self {
        Self::Shape(value)
    }
}
