use std::{
    error::Error,
    fmt::{self, Display},
};

use rand_distr::NormalError;

/// Error returned by `ParamInit::sample` whenever the initializer describes an invalid
/// distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitErr(String);

impl InitErr {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<NormalError> for InitErr {
    fn from(value: NormalError) -> Self {
        Self(value.to_string())
    }
}

impl Display for InitErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for InitErr {}
