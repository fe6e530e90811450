use serde::{Deserialize, Serialize};
use sp_core::{BorderType, DataType, Error, Result};

/// Number of fill values carried by a [`BorderSpec`].
pub const FILL_CHANNELS: usize = 4;

/// Border policy plus the per-channel fill used by [`BorderType::Constant`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderSpec {
    pub border: BorderType,
    #[serde(default)]
    pub fill: [f32; FILL_CHANNELS],
}

impl BorderSpec {
    pub fn new(border: BorderType) -> Self {
        Self {
            border,
            fill: [0.0; FILL_CHANNELS],
        }
    }

    pub fn constant(fill: [f32; FILL_CHANNELS]) -> Self {
        Self {
            border: BorderType::Constant,
            fill,
        }
    }

    pub fn with_fill(mut self, fill: [f32; FILL_CHANNELS]) -> Self {
        self.fill = fill;
        self
    }
}

impl Default for BorderSpec {
    fn default() -> Self {
        Self::new(BorderType::Constant)
    }
}

/// Element types the border kernels accept.
pub fn is_supported(dtype: DataType) -> bool {
    matches!(
        dtype,
        DataType::U8 | DataType::S8 | DataType::U16 | DataType::S16 | DataType::S32 | DataType::F32
    )
}

/// Encodes `fill` as one pixel of `channels` values of `dtype`, in native
/// byte order. Channels without a fill value get zero.
///
/// Float-to-integer conversion truncates toward zero and saturates at the
/// bounds of the target type.
pub fn encode_fill(fill: &[f32; FILL_CHANNELS], dtype: DataType, channels: usize) -> Result<Vec<u8>> {
    if !is_supported(dtype) {
        return Err(Error::UnsupportedDataType(dtype));
    }

    let mut out = Vec::with_capacity(channels * dtype.size_bytes());
    for k in 0..channels {
        let v = fill.get(k).copied().unwrap_or(0.0);
        match dtype {
            DataType::U8 => out.extend_from_slice(&(v as u8).to_ne_bytes()),
            DataType::S8 => out.extend_from_slice(&(v as i8).to_ne_bytes()),
            DataType::U16 => out.extend_from_slice(&(v as u16).to_ne_bytes()),
            DataType::S16 => out.extend_from_slice(&(v as i16).to_ne_bytes()),
            DataType::S32 => out.extend_from_slice(&(v as i32).to_ne_bytes()),
            DataType::F32 => out.extend_from_slice(&v.to_ne_bytes()),
            other => return Err(Error::UnsupportedDataType(other)),
        }
    }
    Ok(out)
}
