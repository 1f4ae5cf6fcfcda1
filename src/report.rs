use search_space::{
    Architecture,
    graph::{Shape, TraceSummary},
};
use serde::Serialize;

/// The token layout of a search space.
#[derive(Debug, Serialize)]
pub struct RangeReport {
    pub space: String,
    pub init_tokens: Vec<usize>,
    pub range_table: Vec<usize>,
}

/// Shapes and totals of a traced architecture.
#[derive(Debug, Serialize)]
pub struct TraceReport {
    pub input: Shape,
    pub output: Shape,
    pub summary: TraceSummary,
}

/// A decoded token vector.
#[derive(Debug, Serialize)]
pub struct DecodeReport {
    pub space: String,
    pub tokens: Vec<usize>,
    pub architecture: Architecture,
    pub blocks: usize,
    pub layers: usize,
    pub trace: TraceReport,
}

/// Everything the command line tool can print.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report {
    Range(RangeReport),
    Decode(DecodeReport),
}
