use crate::dtype::DataType;
use crate::error::{Error, Result};
use crate::format::{ImageFormat, MemLayout, Planes, Subsampling};
use crate::layout::{AxisKind, Layout, MAX_RANK};
use crate::shape::Shape;
use crate::strided::TensorDesc;

pub const DEFAULT_BASE_ALIGN: usize = 256;
pub const DEFAULT_ROW_ALIGN: usize = 32;

/// Memory needed to hold a tensor, and how it is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TensorRequirements {
    pub desc: TensorDesc,
    pub byte_size: usize,
    pub base_align: usize,
}

fn resolve_align(align: usize, default: usize) -> Result<usize> {
    match align {
        0 => Ok(default),
        a if a.is_power_of_two() => Ok(a),
        a => Err(Error::InvalidAlignment(a)),
    }
}

/// Requirements for an arbitrary `shape`.
///
/// Strides are packed except for the axis enclosing `W`, whose stride is
/// rounded up to `row_align` bytes. Alignments of zero select the defaults.
pub fn calc_requirements(
    shape: Shape,
    dtype: DataType,
    base_align: usize,
    row_align: usize,
) -> Result<TensorRequirements> {
    let base_align = resolve_align(base_align, DEFAULT_BASE_ALIGN)?;
    let row_align = resolve_align(row_align, DEFAULT_ROW_ALIGN)?;

    let layout = shape.layout();
    let rank = shape.rank();
    let extents = shape.extents();

    let mut strides = [0usize; MAX_RANK];
    strides[rank - 1] = dtype.size_bytes();
    for i in (0..rank - 1).rev() {
        let mut stride = strides[i + 1]
            .checked_mul(extents[i + 1])
            .ok_or(Error::OutOfBounds)?;
        if layout.axis(i + 1) == Some(AxisKind::Width) {
            stride = stride
                .checked_next_multiple_of(row_align)
                .ok_or(Error::OutOfBounds)?;
        }
        strides[i] = stride;
    }

    let byte_size = strides[0]
        .checked_mul(extents[0])
        .ok_or(Error::OutOfBounds)?;
    let desc = TensorDesc::new(shape, dtype, &strides[..rank])?;

    log::trace!("requirements for {layout} {extents:?}: strides {:?}", desc.strides());

    Ok(TensorRequirements {
        desc,
        byte_size,
        base_align,
    })
}

/// Requirements for a batch of `samples` images of `width` x `height` pixels.
///
/// Interleaved multi-channel formats map to `NHWC`; planar and
/// single-channel formats map to `NCHW`.
pub fn calc_requirements_for_images(
    samples: usize,
    width: usize,
    height: usize,
    format: ImageFormat,
    base_align: usize,
    row_align: usize,
) -> Result<TensorRequirements> {
    if samples == 0 {
        return Err(Error::InvalidArgument("number of images must be positive".into()));
    }
    if width == 0 || height == 0 {
        return Err(Error::InvalidArgument(format!(
            "invalid image size {width}x{height}"
        )));
    }
    if format.mem_layout() == MemLayout::BlockLinear {
        return Err(Error::NotImplemented("block-linear memory layout"));
    }
    if format.subsampling() != Subsampling::None {
        return Err(Error::NotImplemented("chroma-subsampled formats"));
    }
    if format.plane_kind() == Planes::SemiPlanar {
        return Err(Error::NotImplemented("semi-planar formats"));
    }

    let channels = format.num_channels();
    let shape = if format.is_planar() || channels == 1 {
        Shape::new(&[samples, channels, height, width], Layout::NCHW)?
    } else {
        Shape::new(&[samples, height, width, channels], Layout::NHWC)?
    };

    calc_requirements(shape, format.data_type(), base_align, row_align)
}
