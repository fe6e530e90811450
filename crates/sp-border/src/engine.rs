use core::ops::Range;

use sp_core::{BorderType, Error, Result, map_index};

use crate::batch::{BatchLayout, ImageBatch, ImageBatchMut, RowJob, SampleGeometry};
use crate::fill::{BorderSpec, FILL_CHANNELS, encode_fill, is_supported};
use crate::offsets::Offsets;
use crate::stream::Stream;

/// Copies each source image into a larger destination at a per-sample
/// offset and extrapolates the surrounding border.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CopyMakeBorder {
    spec: BorderSpec,
}

/// Source sample as seen by the row kernel.
struct SourcePlane<'s> {
    data: &'s [u8],
    geom: SampleGeometry,
}

/// Per-call constants shared by every row.
struct RowKernel<'k> {
    border: BorderType,
    elem: usize,
    channels: usize,
    fill: &'k [u8],
}

impl CopyMakeBorder {
    pub fn new(spec: BorderSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &BorderSpec {
        &self.spec
    }

    /// Validates the whole request, then fills every destination row on
    /// `stream`. On error nothing in `dst` has been written.
    pub fn run(
        &self,
        stream: &Stream,
        src: &ImageBatch<'_>,
        dst: &mut ImageBatchMut<'_>,
        offsets: &Offsets,
    ) -> Result<()> {
        if src.is_tensor() && !dst.is_tensor() {
            return Err(Error::InvalidArgument(
                "a tensor source needs a tensor destination".into(),
            ));
        }

        let src_layout = src.layout()?;
        let dst_layout = dst.layout()?;
        let offsets = self.validate(&src_layout, &dst_layout, offsets)?;

        let channels = src_layout.samples[0].channels;
        if channels > FILL_CHANNELS && self.spec.border == BorderType::Constant {
            log::warn!(
                "{channels} channels but only {FILL_CHANNELS} fill values, extra channels are zero"
            );
        }
        let fill = encode_fill(&self.spec.fill, src_layout.dtype, channels)?;

        let sources: Vec<SourcePlane<'_>> = src_layout
            .samples
            .iter()
            .enumerate()
            .map(|(b, geom)| SourcePlane {
                data: src.sample_data(b, geom),
                geom: *geom,
            })
            .collect();

        for (b, (s, d)) in src_layout.samples.iter().zip(&dst_layout.samples).enumerate() {
            log::trace!(
                "sample #{b}: {}x{} -> {}x{} at {:?}",
                s.width,
                s.height,
                d.width,
                d.height,
                offsets[b]
            );
        }

        let mut jobs = dst.rows(&dst_layout)?;
        log::debug!(
            "copy_make_border: {} samples, {} rows, {} {}, border {} on {} threads",
            sources.len(),
            jobs.len(),
            channels,
            src_layout.dtype,
            self.spec.border,
            stream.num_threads()
        );

        let kernel = RowKernel {
            border: self.spec.border,
            elem: src_layout.dtype.size_bytes(),
            channels,
            fill: &fill,
        };
        let dst_samples = &dst_layout.samples;
        stream.for_each_mut(&mut jobs, |job| {
            kernel.process(
                job,
                &sources[job.sample],
                &dst_samples[job.sample],
                offsets[job.sample],
            );
        });

        Ok(())
    }

    /// Every precondition that does not depend on the destination contents.
    fn validate(
        &self,
        src: &BatchLayout,
        dst: &BatchLayout,
        offsets: &Offsets,
    ) -> Result<Vec<(usize, usize)>> {
        if src.samples.len() != dst.samples.len() {
            return Err(Error::InvalidArgument(format!(
                "source has {} samples, destination has {}",
                src.samples.len(),
                dst.samples.len()
            )));
        }
        if src.dtype != dst.dtype {
            return Err(Error::FormatMismatch);
        }
        if !is_supported(src.dtype) {
            return Err(Error::UnsupportedDataType(src.dtype));
        }

        let channels = src.samples[0].channels;
        for geom in src.samples.iter().chain(&dst.samples) {
            if geom.channels != channels {
                return Err(Error::FormatMismatch);
            }
            if geom.planes != 1 {
                return Err(Error::InvalidArgument(
                    "planar images are not supported".into(),
                ));
            }
        }

        let offsets = offsets.resolve(src.samples.len())?;
        for (sample, ((s, d), &(top, left))) in
            src.samples.iter().zip(&dst.samples).zip(&offsets).enumerate()
        {
            if d.width < s.width.saturating_add(left) || d.height < s.height.saturating_add(top) {
                return Err(Error::DestinationTooSmall { sample });
            }
        }

        Ok(offsets)
    }
}

impl RowKernel<'_> {
    fn process(
        &self,
        job: &mut RowJob<'_>,
        src: &SourcePlane<'_>,
        dst: &SampleGeometry,
        (top, left): (usize, usize),
    ) {
        let sy = job.row as isize - top as isize;
        let Some(y) = map_index(sy, src.geom.height, self.border) else {
            for x in 0..dst.width {
                self.write_fill(job.data, dst, x);
            }
            return;
        };

        let src_row = &src.data[y * src.geom.row_stride..];
        let interior = self.copy_interior(job.data, dst, src_row, &src.geom, left);

        for x in (0..dst.width).filter(|x| !interior.contains(x)) {
            let sx = x as isize - left as isize;
            match map_index(sx, src.geom.width, self.border) {
                Some(xs) => self.copy_pixel(job.data, dst, x, src_row, &src.geom, xs),
                None => self.write_fill(job.data, dst, x),
            }
        }
    }

    /// Copies the in-range span with one slice copy when both rows are packed.
    /// Returns the destination columns it covered.
    fn copy_interior(
        &self,
        row: &mut [u8],
        dst: &SampleGeometry,
        src_row: &[u8],
        src: &SampleGeometry,
        left: usize,
    ) -> Range<usize> {
        if !dst.is_packed(self.elem) || !src.is_packed(self.elem) {
            return 0..0;
        }
        let px = self.channels * self.elem;
        let len = src.width * px;
        row[left * px..left * px + len].copy_from_slice(&src_row[..len]);
        left..left + src.width
    }

    fn copy_pixel(
        &self,
        row: &mut [u8],
        dst: &SampleGeometry,
        x: usize,
        src_row: &[u8],
        src: &SampleGeometry,
        xs: usize,
    ) {
        let elem = self.elem;
        for k in 0..self.channels {
            let d = x * dst.col_stride + k * dst.channel_stride;
            let s = xs * src.col_stride + k * src.channel_stride;
            row[d..d + elem].copy_from_slice(&src_row[s..s + elem]);
        }
    }

    fn write_fill(&self, row: &mut [u8], dst: &SampleGeometry, x: usize) {
        let elem = self.elem;
        for k in 0..self.channels {
            let d = x * dst.col_stride + k * dst.channel_stride;
            row[d..d + elem].copy_from_slice(&self.fill[k * elem..(k + 1) * elem]);
        }
    }
}

/// One-shot form of [`CopyMakeBorder::run`].
pub fn copy_make_border(
    stream: &Stream,
    src: &ImageBatch<'_>,
    dst: &mut ImageBatchMut<'_>,
    offsets: &Offsets,
    border: BorderType,
    fill: [f32; FILL_CHANNELS],
) -> Result<()> {
    CopyMakeBorder::new(BorderSpec { border, fill }).run(stream, src, dst, offsets)
}

#[cfg(test)]
mod tests {
    use super::{CopyMakeBorder, copy_make_border};
    use crate::batch::{ImageBatch, ImageBatchMut};
    use crate::fill::BorderSpec;
    use crate::offsets::{Offset, Offsets};
    use crate::stream::Stream;
    use sp_core::{
        BorderType, DataType, Error, ErrorKind, ImageFormat, ImageView, ImageViewMut, Layout,
        Shape, StridedView, StridedViewMut,
    };

    fn pad_u8(
        src: &[u8],
        (w, h): (usize, usize),
        (dw, dh): (usize, usize),
        offset: Offset,
        border: BorderType,
    ) -> Vec<u8> {
        let view = ImageView::from_slice(w, h, ImageFormat::U8, w, src).expect("src");
        let mut out = vec![0u8; dw * dh];
        let dst = ImageViewMut::from_slice_mut(dw, dh, ImageFormat::U8, dw, &mut out).expect("dst");
        copy_make_border(
            &Stream::inline(),
            &ImageBatch::from(vec![view]),
            &mut ImageBatchMut::from(vec![dst]),
            &Offsets::from(offset),
            border,
            [9.0, 0.0, 0.0, 0.0],
        )
        .expect("valid request");
        out
    }

    #[test]
    fn one_row_every_border() {
        let src = [1u8, 2, 3];
        let cases = [
            (BorderType::Constant, [9, 9, 1, 2, 3, 9, 9]),
            (BorderType::Replicate, [1, 1, 1, 2, 3, 3, 3]),
            (BorderType::Reflect, [2, 1, 1, 2, 3, 3, 2]),
            (BorderType::Wrap, [2, 3, 1, 2, 3, 1, 2]),
            (BorderType::Reflect101, [3, 2, 1, 2, 3, 2, 1]),
        ];
        for (border, expected) in cases {
            let out = pad_u8(&src, (3, 1), (7, 1), Offset::new(0, 2), border);
            assert_eq!(out, expected, "{border}");
        }
    }

    #[test]
    fn rows_outside_use_vertical_mapping() {
        let src = [1u8, 2, 3, 4];
        let out = pad_u8(&src, (2, 2), (2, 4), Offset::new(1, 0), BorderType::Replicate);
        assert_eq!(out, [1, 2, 1, 2, 3, 4, 3, 4]);

        let out = pad_u8(&src, (2, 2), (2, 4), Offset::new(1, 0), BorderType::Constant);
        assert_eq!(out, [9, 9, 1, 2, 3, 4, 9, 9]);
    }

    #[test]
    fn interleaved_tensor_with_padded_rows() {
        // 2x2 RGB source, rows padded to 8 bytes
        let src = [1u8, 2, 3, 4, 5, 6, 0, 0, 7, 8, 9, 10, 11, 12, 0, 0];
        let src_shape = Shape::new(&[1, 2, 2, 3], Layout::NHWC).expect("shape");
        let src_view =
            StridedView::from_parts(src_shape, DataType::U8, &[16, 8, 3, 1], &src).expect("src");

        let mut out = vec![0u8; 3 * 3 * 3];
        let dst_shape = Shape::new(&[1, 3, 3, 3], Layout::NHWC).expect("shape");
        let dst_view = StridedViewMut::from_parts(dst_shape, DataType::U8, &[27, 9, 3, 1], &mut out)
            .expect("dst");

        CopyMakeBorder::new(BorderSpec::constant([100.0, 101.0, 102.0, 0.0]))
            .run(
                &Stream::global(),
                &ImageBatch::from(src_view),
                &mut ImageBatchMut::from(dst_view),
                &Offsets::from(Offset::new(1, 1)),
            )
            .expect("valid request");

        let fill = [100u8, 101, 102];
        assert_eq!(&out[0..3], &fill);
        assert_eq!(&out[6..9], &fill);
        assert_eq!(&out[9..12], &fill);
        assert_eq!(&out[12..18], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(&out[21..27], &[7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn failed_requests_leave_destination_untouched() {
        let src = vec![1u8; 4 * 4];
        let view = ImageView::from_slice(4, 4, ImageFormat::U8, 4, &src).expect("src");

        let mut out = vec![77u8; 5 * 5];
        let requests = [
            (Offset::new(2, 0), BorderType::Wrap),
            (Offset::new(0, -1), BorderType::Replicate),
        ];
        for (offset, border) in requests {
            let dst =
                ImageViewMut::from_slice_mut(5, 5, ImageFormat::U8, 5, &mut out).expect("dst");
            let err = copy_make_border(
                &Stream::inline(),
                &ImageBatch::from(vec![view]),
                &mut ImageBatchMut::from(vec![dst]),
                &Offsets::from(offset),
                border,
                [0.0; 4],
            )
            .expect_err("must be rejected");
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            assert!(out.iter().all(|&v| v == 77));
        }
    }

    #[test]
    fn tensor_to_var_shape_is_rejected() {
        let src = vec![0u8; 4];
        let shape = Shape::new(&[1, 2, 2], Layout::NHW).expect("shape");
        let view = StridedView::from_parts(shape, DataType::U8, &[4, 2, 1], &src).expect("src");

        let mut out = vec![0u8; 4];
        let dst = ImageViewMut::from_slice_mut(2, 2, ImageFormat::U8, 2, &mut out).expect("dst");
        let err = copy_make_border(
            &Stream::inline(),
            &ImageBatch::from(view),
            &mut ImageBatchMut::from(vec![dst]),
            &Offsets::default(),
            BorderType::Replicate,
            [0.0; 4],
        )
        .expect_err("tensor -> var-shape");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn unsupported_element_type() {
        let src = vec![0u8; 8];
        let view = ImageView::from_slice(2, 2, ImageFormat::F16, 4, &src).expect("src");
        let mut out = vec![0u8; 8];
        let dst = ImageViewMut::from_slice_mut(2, 2, ImageFormat::F16, 4, &mut out).expect("dst");
        let err = copy_make_border(
            &Stream::inline(),
            &ImageBatch::from(vec![view]),
            &mut ImageBatchMut::from(vec![dst]),
            &Offsets::default(),
            BorderType::Constant,
            [0.0; 4],
        )
        .expect_err("f16");
        assert_eq!(err, Error::UnsupportedDataType(DataType::F16));
    }
}
