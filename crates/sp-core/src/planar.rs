use crate::error::{Error, Result};
use crate::layout::AxisKind;
use crate::strided::TensorDesc;

/// Image-semantic projection of a [`TensorDesc`].
///
/// Accepts layouts made of `H`, `W` and optionally `N` and `C` (in any order
/// that the layout itself allows). Channel-first layouts expose one plane per
/// channel; channel-last layouts expose a single interleaved plane with a
/// plane stride of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanarAccess {
    num_samples: usize,
    num_rows: usize,
    num_cols: usize,
    num_channels: usize,
    channel_first: bool,
    sample_stride: usize,
    plane_stride: usize,
    row_stride: usize,
    col_stride: usize,
    channel_stride: usize,
}

impl PlanarAccess {
    pub fn new(desc: &TensorDesc) -> Result<Self> {
        let layout = desc.layout();
        let shape = desc.shape();

        if layout.contains(AxisKind::Depth) || layout.contains(AxisKind::Frame) {
            return Err(Error::InvalidLayout("image access needs a 2D layout"));
        }
        let h = layout
            .find(AxisKind::Height)
            .ok_or(Error::MissingAxis(AxisKind::Height))?;
        let w = layout
            .find(AxisKind::Width)
            .ok_or(Error::MissingAxis(AxisKind::Width))?;

        let (num_samples, sample_stride) = match layout.find(AxisKind::Sample) {
            Some(n) => (shape.extents()[n], desc.stride(n)),
            None => (1, desc.footprint()),
        };

        let channel_first = layout.is_channel_first();
        let (num_channels, channel_stride) = match layout.find(AxisKind::Channel) {
            Some(c) => (shape.extents()[c], desc.stride(c)),
            None => (1, desc.dtype().size_bytes()),
        };

        Ok(Self {
            num_samples,
            num_rows: shape.extents()[h],
            num_cols: shape.extents()[w],
            num_channels,
            channel_first,
            sample_stride,
            plane_stride: if channel_first { channel_stride } else { 0 },
            row_stride: desc.stride(h),
            col_stride: desc.stride(w),
            channel_stride: if channel_first { 0 } else { channel_stride },
        })
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn num_planes(&self) -> usize {
        if self.channel_first {
            self.num_channels
        } else {
            1
        }
    }

    /// Channels stored next to each other inside one plane.
    pub fn channels_per_plane(&self) -> usize {
        if self.channel_first {
            1
        } else {
            self.num_channels
        }
    }

    pub fn is_channel_first(&self) -> bool {
        self.channel_first
    }

    pub fn sample_stride(&self) -> usize {
        self.sample_stride
    }

    pub fn plane_stride(&self) -> usize {
        self.plane_stride
    }

    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    pub fn col_stride(&self) -> usize {
        self.col_stride
    }

    /// Step between interleaved channels; zero for channel-first layouts.
    pub fn channel_stride(&self) -> usize {
        self.channel_stride
    }

    pub fn sample_offset(&self, sample: usize) -> usize {
        sample * self.sample_stride
    }

    pub fn plane_offset(&self, plane: usize) -> usize {
        plane * self.plane_stride
    }

    /// Byte offset of one channel value.
    pub fn offset(&self, sample: usize, row: usize, col: usize, channel: usize) -> usize {
        let (plane, inner) = if self.channel_first {
            (channel, 0)
        } else {
            (0, channel)
        };
        self.sample_offset(sample)
            + self.plane_offset(plane)
            + row * self.row_stride
            + col * self.col_stride
            + inner * self.channel_stride
    }

    /// Bytes covered by one row of one plane.
    pub fn row_bytes(&self, elem_size: usize) -> usize {
        (self.num_cols - 1) * self.col_stride
            + (self.channels_per_plane() - 1) * self.channel_stride
            + elem_size
    }
}

#[cfg(test)]
mod tests {
    use super::PlanarAccess;
    use crate::dtype::DataType;
    use crate::error::Error;
    use crate::layout::{AxisKind, Layout};
    use crate::shape::Shape;
    use crate::strided::TensorDesc;

    #[test]
    fn interleaved_nhwc() {
        let shape = Shape::new(&[14, 18, 64, 3], Layout::NHWC).expect("valid shape");
        let desc =
            TensorDesc::new(shape, DataType::U8, &[18 * 192, 192, 3, 1]).expect("valid desc");
        let access = PlanarAccess::new(&desc).expect("image layout");

        assert_eq!(access.num_samples(), 14);
        assert_eq!(access.num_rows(), 18);
        assert_eq!(access.num_cols(), 64);
        assert_eq!(access.num_channels(), 3);
        assert_eq!(access.num_planes(), 1);
        assert_eq!(access.sample_stride(), desc.stride(0));
        assert_eq!(access.plane_stride(), 0);
        assert_eq!(access.row_stride(), 192);
        assert_eq!(access.col_stride(), 3);
        assert_eq!(access.offset(1, 2, 3, 2), 18 * 192 + 2 * 192 + 9 + 2);
        assert_eq!(access.row_bytes(1), 192);
    }

    #[test]
    fn planar_nchw() {
        let shape = Shape::new(&[53, 4, 16, 32], Layout::NCHW).expect("valid shape");
        let desc = TensorDesc::packed(shape, DataType::U8).expect("valid desc");
        let access = PlanarAccess::new(&desc).expect("image layout");

        assert!(access.is_channel_first());
        assert_eq!(access.num_planes(), 4);
        assert_eq!(access.plane_stride(), desc.stride(1));
        assert_eq!(access.sample_stride(), desc.stride(0));
        assert_eq!(access.offset(2, 1, 1, 3), 2 * desc.stride(0) + 3 * 16 * 32 + 32 + 1);
        assert_eq!(access.row_bytes(1), 32);
    }

    #[test]
    fn planes_do_not_overlap() {
        let shape = Shape::new(&[2, 3, 5, 7], Layout::NCHW).expect("valid shape");
        let desc = TensorDesc::new(shape, DataType::U8, &[3 * 5 * 8, 5 * 8, 8, 1])
            .expect("padded rows are canonical");
        let access = PlanarAccess::new(&desc).expect("image layout");

        let mut buf = vec![0u8; desc.footprint()];
        for s in 0..access.num_samples() {
            for p in 0..access.num_planes() {
                for r in 0..access.num_rows() {
                    for c in 0..access.num_cols() {
                        buf[access.offset(s, r, c, p)] = (s * 3 + p * 7) as u8;
                    }
                }
            }
        }
        for s in 0..access.num_samples() {
            for p in 0..access.num_planes() {
                for r in 0..access.num_rows() {
                    for c in 0..access.num_cols() {
                        assert_eq!(buf[access.offset(s, r, c, p)], (s * 3 + p * 7) as u8);
                    }
                }
            }
        }
    }

    #[test]
    fn single_image_without_sample_axis() {
        let shape = Shape::new(&[10, 5], Layout::HW).expect("valid shape");
        let desc = TensorDesc::packed(shape, DataType::U16).expect("valid desc");
        let access = PlanarAccess::new(&desc).expect("image layout");
        assert_eq!(access.num_samples(), 1);
        assert_eq!(access.num_channels(), 1);
        assert_eq!(access.col_stride(), 2);
        assert_eq!(access.row_stride(), 10);
    }

    #[test]
    fn rejects_non_image_layouts() {
        let shape = Shape::new(&[4, 3], Layout::NC).expect("valid shape");
        let desc = TensorDesc::packed(shape, DataType::U8).expect("valid desc");
        assert_eq!(
            PlanarAccess::new(&desc),
            Err(Error::MissingAxis(AxisKind::Height))
        );

        let shape = Shape::new(&[3, 2, 6, 61, 23], Layout::CFDHW).expect("valid shape");
        let desc = TensorDesc::packed(shape, DataType::U8).expect("valid desc");
        assert!(PlanarAccess::new(&desc).is_err());
    }
}
