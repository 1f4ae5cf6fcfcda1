//! Candidate tables of the ResNet search space.
//!
//! Each stage picks one channel width and one repeat depth from its own table,
//! tokens index into these tables.

/// The maximum amount of stages a ResNet space can search over.
pub const MAX_STAGES: usize = 4;

/// The candidates for a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTable {
    pub widths: &'static [usize],
    pub depths: &'static [usize],
}

impl StageTable {
    /// Returns the (width, depth) table lengths, the exclusive token bounds of this stage.
    pub fn bounds(&self) -> (usize, usize) {
        (self.widths.len(), self.depths.len())
    }
}

pub const RESNET_STAGES: [StageTable; MAX_STAGES] = [
    StageTable {
        widths: &[48, 64, 96, 128, 160, 192, 224],
        depths: &[2, 3, 4, 5, 6],
    },
    StageTable {
        widths: &[64, 96, 128, 160, 192, 256, 320],
        depths: &[2, 3, 4, 5, 6, 7],
    },
    StageTable {
        widths: &[128, 160, 192, 256, 320, 384],
        depths: &[2, 3, 4, 5, 6, 7, 8, 10, 12, 14, 16, 20, 24],
    },
    StageTable {
        widths: &[192, 256, 384, 512, 640],
        depths: &[2, 3, 4, 5, 6, 7],
    },
];
