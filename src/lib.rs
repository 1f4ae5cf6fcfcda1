pub mod cli;
pub mod report;

pub use cli::{Args, Command};
pub use report::Report;
