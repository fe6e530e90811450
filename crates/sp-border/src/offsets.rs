use serde::{Deserialize, Serialize};
use sp_core::{Error, Result};

/// Position of the source image inside the destination, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub top: i32,
    pub left: i32,
}

impl Offset {
    pub const ZERO: Offset = Offset { top: 0, left: 0 };

    pub const fn new(top: i32, left: i32) -> Self {
        Self { top, left }
    }
}

/// Per-sample offsets, either one value broadcast to the whole batch or one
/// value per sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Offsets {
    Uniform(Offset),
    PerSample(Vec<Offset>),
}

impl Offsets {
    /// Non-negative `(top, left)` pairs for `samples` samples.
    pub(crate) fn resolve(&self, samples: usize) -> Result<Vec<(usize, usize)>> {
        let per_sample = match self {
            Offsets::Uniform(offset) => vec![*offset; samples],
            Offsets::PerSample(offsets) => {
                if offsets.len() != samples {
                    return Err(Error::InvalidArgument(format!(
                        "expected {samples} offsets, got {}",
                        offsets.len()
                    )));
                }
                offsets.clone()
            }
        };

        per_sample
            .into_iter()
            .enumerate()
            .map(|(sample, Offset { top, left })| {
                if top < 0 || left < 0 {
                    return Err(Error::InvalidOffset { sample, top, left });
                }
                Ok((top as usize, left as usize))
            })
            .collect()
    }
}

impl Default for Offsets {
    fn default() -> Self {
        Offsets::Uniform(Offset::ZERO)
    }
}

impl From<Offset> for Offsets {
    fn from(offset: Offset) -> Self {
        Offsets::Uniform(offset)
    }
}

impl From<Vec<Offset>> for Offsets {
    fn from(offsets: Vec<Offset>) -> Self {
        Offsets::PerSample(offsets)
    }
}
