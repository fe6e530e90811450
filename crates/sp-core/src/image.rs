use crate::error::{Error, Result};
use crate::format::{ImageFormat, MemLayout, Planes, Subsampling};
use crate::layout::Layout;
use crate::planar::PlanarAccess;
use crate::requirements::calc_requirements_for_images;
use crate::shape::Shape;
use crate::strided::{StridedView, StridedViewMut, TensorDesc};

/// Single-sample descriptor for a `width` x `height` image whose rows start
/// `row_stride` bytes apart. Interleaved formats use `HWC`, planar formats
/// `CHW` with planes stacked back to back.
fn image_desc(
    width: usize,
    height: usize,
    format: ImageFormat,
    row_stride: usize,
) -> Result<TensorDesc> {
    if format.mem_layout() == MemLayout::BlockLinear {
        return Err(Error::NotImplemented("block-linear memory layout"));
    }
    if format.subsampling() != Subsampling::None || format.plane_kind() == Planes::SemiPlanar {
        return Err(Error::NotImplemented("subsampled or semi-planar images"));
    }

    let dtype = format.data_type();
    let elem = dtype.size_bytes();
    let channels = format.num_channels();

    if format.is_planar() {
        let plane_stride = row_stride.checked_mul(height).ok_or(Error::OutOfBounds)?;
        let shape = Shape::new(&[channels, height, width], Layout::CHW)?;
        TensorDesc::new(shape, dtype, &[plane_stride, row_stride, elem])
    } else {
        let shape = Shape::new(&[height, width, channels], Layout::HWC)?;
        TensorDesc::new(shape, dtype, &[row_stride, channels * elem, elem])
    }
}

/// Owned image in one of the catalog formats.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    format: ImageFormat,
    desc: TensorDesc,
    data: Vec<u8>,
}

impl Image {
    /// Zero-filled image with rows aligned to `row_align` bytes (0 selects the
    /// default alignment).
    pub fn new(width: usize, height: usize, format: ImageFormat, row_align: usize) -> Result<Self> {
        let reqs = calc_requirements_for_images(1, width, height, format, 0, row_align)?;
        let row_stride = PlanarAccess::new(&reqs.desc)?.row_stride();
        let desc = image_desc(width, height, format, row_stride)?;

        Ok(Self {
            format,
            desc,
            data: vec![0; reqs.byte_size],
        })
    }

    pub fn from_vec(
        width: usize,
        height: usize,
        format: ImageFormat,
        row_stride: usize,
        data: Vec<u8>,
    ) -> Result<Self> {
        let desc = image_desc(width, height, format, row_stride)?;
        let expected = desc.footprint();
        if data.len() < expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self { format, desc, data })
    }

    pub fn width(&self) -> usize {
        self.as_view().width()
    }

    pub fn height(&self) -> usize {
        self.as_view().height()
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn row_stride(&self) -> usize {
        self.as_view().row_stride()
    }

    pub fn desc(&self) -> &TensorDesc {
        &self.desc
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn as_view(&self) -> ImageView<'_> {
        ImageView {
            format: self.format,
            view: StridedView::from_trusted(self.desc, &self.data),
        }
    }

    pub fn as_view_mut(&mut self) -> ImageViewMut<'_> {
        ImageViewMut {
            format: self.format,
            view: StridedViewMut::from_trusted(self.desc, &mut self.data),
        }
    }
}

/// Borrowed image: a single-sample [`StridedView`] plus its format.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    format: ImageFormat,
    view: StridedView<'a>,
}

impl<'a> ImageView<'a> {
    pub fn from_slice(
        width: usize,
        height: usize,
        format: ImageFormat,
        row_stride: usize,
        data: &'a [u8],
    ) -> Result<Self> {
        let desc = image_desc(width, height, format, row_stride)?;
        Ok(Self {
            format,
            view: StridedView::new(desc, data)?,
        })
    }

    pub fn width(&self) -> usize {
        let layout = self.view.desc().layout();
        self.view.shape().extents()[if layout == Layout::CHW { 2 } else { 1 }]
    }

    pub fn height(&self) -> usize {
        let layout = self.view.desc().layout();
        self.view.shape().extents()[if layout == Layout::CHW { 1 } else { 0 }]
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn row_stride(&self) -> usize {
        let layout = self.view.desc().layout();
        self.view.desc().stride(if layout == Layout::CHW { 1 } else { 0 })
    }

    pub fn desc(&self) -> &TensorDesc {
        self.view.desc()
    }

    pub fn view(&self) -> StridedView<'a> {
        self.view
    }

    /// Row `y` of the first plane, trimmed to the pixel bytes.
    pub fn row(&self, y: usize) -> &'a [u8] {
        assert!(y < self.height(), "row index out of bounds");
        let start = y * self.row_stride();
        let len = self.width() * self.format.plane_pixel_bytes();
        &self.view.data()[start..start + len]
    }

    /// Bytes of pixel `(x, y)` in the first plane.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&'a [u8]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let px = self.format.plane_pixel_bytes();
        let start = y * self.row_stride() + x * px;
        self.view.data().get(start..start + px)
    }

    /// The same memory seen as a one-sample tensor: `NCHW` for planar and
    /// single-channel formats, `NHWC` otherwise.
    pub fn as_tensor(&self) -> Result<StridedView<'a>> {
        let (width, height) = (self.width(), self.height());
        let channels = self.format.num_channels();
        let dtype = self.format.data_type();
        let elem = dtype.size_bytes();
        let row = self.row_stride();
        let sample = self.view.desc().footprint();

        let (shape, strides) = if self.format.is_planar() || channels == 1 {
            (
                Shape::new(&[1, channels, height, width], Layout::NCHW)?,
                [sample, row * height, row, elem],
            )
        } else {
            (
                Shape::new(&[1, height, width, channels], Layout::NHWC)?,
                [sample, row, channels * elem, elem],
            )
        };
        StridedView::from_parts(shape, dtype, &strides, self.view.data())
    }
}

/// Mutable counterpart of [`ImageView`].
#[derive(Debug)]
pub struct ImageViewMut<'a> {
    format: ImageFormat,
    view: StridedViewMut<'a>,
}

impl<'a> ImageViewMut<'a> {
    pub fn from_slice_mut(
        width: usize,
        height: usize,
        format: ImageFormat,
        row_stride: usize,
        data: &'a mut [u8],
    ) -> Result<Self> {
        let desc = image_desc(width, height, format, row_stride)?;
        Ok(Self {
            format,
            view: StridedViewMut::new(desc, data)?,
        })
    }

    pub fn as_view(&self) -> ImageView<'_> {
        ImageView {
            format: self.format,
            view: self.view.as_view(),
        }
    }

    pub fn width(&self) -> usize {
        self.as_view().width()
    }

    pub fn height(&self) -> usize {
        self.as_view().height()
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn row_stride(&self) -> usize {
        self.as_view().row_stride()
    }

    pub fn desc(&self) -> &TensorDesc {
        self.view.desc()
    }

    /// Whole backing buffer, including row padding.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.view.data_mut()
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        assert!(y < self.height(), "row index out of bounds");
        let start = y * self.row_stride();
        let len = self.width() * self.format.plane_pixel_bytes();
        &mut self.view.data_mut()[start..start + len]
    }

    pub fn pixel_mut(&mut self, x: usize, y: usize) -> Option<&mut [u8]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let px = self.format.plane_pixel_bytes();
        let start = y * self.row_stride() + x * px;
        self.view.data_mut().get_mut(start..start + px)
    }

    pub fn into_parts(self) -> (ImageFormat, StridedViewMut<'a>) {
        (self.format, self.view)
    }
}
