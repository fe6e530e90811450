//! Minimal image format catalog.
//!
//! Only the properties the addressing model needs are represented: channel
//! element type, channel count, plane arrangement, memory layout and chroma
//! subsampling.

use crate::dtype::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemLayout {
    PitchLinear,
    BlockLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Planes {
    /// All channels interleaved in a single plane.
    Packed,
    /// One plane per channel.
    Planar,
    /// Luma plane followed by an interleaved chroma plane.
    SemiPlanar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsampling {
    None,
    Yuv422,
    Yuv420,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageFormat {
    dtype: DataType,
    channels: u8,
    planes: Planes,
    mem_layout: MemLayout,
    subsampling: Subsampling,
}

impl ImageFormat {
    pub const U8: ImageFormat = ImageFormat::packed(DataType::U8, 1);
    pub const S8: ImageFormat = ImageFormat::packed(DataType::S8, 1);
    pub const U16: ImageFormat = ImageFormat::packed(DataType::U16, 1);
    pub const S16: ImageFormat = ImageFormat::packed(DataType::S16, 1);
    pub const S32: ImageFormat = ImageFormat::packed(DataType::S32, 1);
    pub const F16: ImageFormat = ImageFormat::packed(DataType::F16, 1);
    pub const F32: ImageFormat = ImageFormat::packed(DataType::F32, 1);
    pub const F32X2: ImageFormat = ImageFormat::packed(DataType::F32, 2);

    pub const RGB8: ImageFormat = ImageFormat::packed(DataType::U8, 3);
    pub const RGBA8: ImageFormat = ImageFormat::packed(DataType::U8, 4);
    pub const RGB8P: ImageFormat = ImageFormat::planar(DataType::U8, 3);
    pub const RGBA8P: ImageFormat = ImageFormat::planar(DataType::U8, 4);
    pub const RGBF32: ImageFormat = ImageFormat::packed(DataType::F32, 3);
    pub const RGBAF32: ImageFormat = ImageFormat::packed(DataType::F32, 4);
    pub const RGBF32P: ImageFormat = ImageFormat::planar(DataType::F32, 3);

    pub const RGBA8_BL: ImageFormat = ImageFormat {
        mem_layout: MemLayout::BlockLinear,
        ..ImageFormat::RGBA8
    };
    pub const UYVY: ImageFormat = ImageFormat {
        subsampling: Subsampling::Yuv422,
        ..ImageFormat::packed(DataType::U8, 3)
    };
    pub const NV12: ImageFormat = ImageFormat {
        planes: Planes::SemiPlanar,
        subsampling: Subsampling::Yuv420,
        ..ImageFormat::packed(DataType::U8, 3)
    };
    pub const NV24: ImageFormat = ImageFormat {
        planes: Planes::SemiPlanar,
        ..ImageFormat::packed(DataType::U8, 3)
    };

    pub const fn packed(dtype: DataType, channels: u8) -> Self {
        Self {
            dtype,
            channels,
            planes: Planes::Packed,
            mem_layout: MemLayout::PitchLinear,
            subsampling: Subsampling::None,
        }
    }

    pub const fn planar(dtype: DataType, channels: u8) -> Self {
        Self {
            dtype,
            channels,
            planes: Planes::Planar,
            mem_layout: MemLayout::PitchLinear,
            subsampling: Subsampling::None,
        }
    }

    pub fn data_type(&self) -> DataType {
        self.dtype
    }

    pub fn num_channels(&self) -> usize {
        self.channels as usize
    }

    pub fn plane_kind(&self) -> Planes {
        self.planes
    }

    pub fn num_planes(&self) -> usize {
        match self.planes {
            Planes::Packed => 1,
            Planes::Planar => self.num_channels(),
            Planes::SemiPlanar => 2,
        }
    }

    pub fn is_planar(&self) -> bool {
        self.num_planes() > 1
    }

    pub fn mem_layout(&self) -> MemLayout {
        self.mem_layout
    }

    pub fn subsampling(&self) -> Subsampling {
        self.subsampling
    }

    /// Bytes of one pixel inside a single plane.
    pub fn plane_pixel_bytes(&self) -> usize {
        match self.planes {
            Planes::Packed => self.num_channels() * self.dtype.size_bytes(),
            Planes::Planar | Planes::SemiPlanar => self.dtype.size_bytes(),
        }
    }
}
