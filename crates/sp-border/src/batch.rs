use sp_core::{
    AxisKind, DataType, Error, ImageView, ImageViewMut, PlanarAccess, Result, StridedView,
    StridedViewMut, TensorDesc,
};

/// Addressing of one sample inside its backing buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SampleGeometry {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub planes: usize,
    pub offset: usize,
    pub row_stride: usize,
    pub col_stride: usize,
    pub channel_stride: usize,
}

impl SampleGeometry {
    fn new(access: &PlanarAccess, sample: usize) -> Self {
        Self {
            width: access.num_cols(),
            height: access.num_rows(),
            channels: access.num_channels(),
            planes: access.num_planes(),
            offset: access.sample_offset(sample),
            row_stride: access.row_stride(),
            col_stride: access.col_stride(),
            channel_stride: access.channel_stride(),
        }
    }

    /// Bytes from the first to one past the last value of a row.
    pub fn row_bytes(&self, elem: usize) -> usize {
        (self.width - 1) * self.col_stride + (self.channels - 1) * self.channel_stride + elem
    }

    /// Channels of a pixel sit back to back, and so do pixels of a row.
    pub fn is_packed(&self, elem: usize) -> bool {
        (self.channels == 1 || self.channel_stride == elem)
            && (self.width == 1 || self.col_stride == self.channels * elem)
    }
}

/// Element type and per-sample geometry of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BatchLayout {
    pub dtype: DataType,
    pub samples: Vec<SampleGeometry>,
}

impl BatchLayout {
    fn from_tensor(desc: &TensorDesc) -> Result<Self> {
        if let Some(axis) = desc.layout().find(AxisKind::Sample)
            && axis != 0
        {
            return Err(Error::InvalidArgument(format!(
                "sample axis of a tensor batch must lead, found it at #{axis} in {}",
                desc.layout()
            )));
        }
        let access = PlanarAccess::new(desc)?;
        Ok(Self {
            dtype: desc.dtype(),
            samples: (0..access.num_samples())
                .map(|b| SampleGeometry::new(&access, b))
                .collect(),
        })
    }

    fn from_images<'d>(descs: impl Iterator<Item = &'d TensorDesc>) -> Result<Self> {
        let mut dtype = None;
        let mut samples = Vec::new();
        for desc in descs {
            match dtype {
                None => dtype = Some(desc.dtype()),
                Some(first) if first != desc.dtype() => return Err(Error::FormatMismatch),
                Some(_) => {}
            }
            let access = PlanarAccess::new(desc)?;
            samples.push(SampleGeometry::new(&access, 0));
        }

        let dtype = dtype.ok_or_else(|| Error::InvalidArgument("empty image batch".into()))?;
        Ok(Self { dtype, samples })
    }
}

/// Read-only batch of images: one uniform tensor or a list of images of
/// possibly different sizes.
#[derive(Debug, Clone)]
pub enum ImageBatch<'a> {
    Tensor(StridedView<'a>),
    VarShape(Vec<ImageView<'a>>),
}

impl<'a> ImageBatch<'a> {
    pub fn num_samples(&self) -> usize {
        match self {
            ImageBatch::Tensor(view) => view.shape().extent(AxisKind::Sample).unwrap_or(1),
            ImageBatch::VarShape(images) => images.len(),
        }
    }

    pub fn is_tensor(&self) -> bool {
        matches!(self, ImageBatch::Tensor(_))
    }

    pub(crate) fn layout(&self) -> Result<BatchLayout> {
        match self {
            ImageBatch::Tensor(view) => BatchLayout::from_tensor(view.desc()),
            ImageBatch::VarShape(images) => {
                BatchLayout::from_images(images.iter().map(|i| i.desc()))
            }
        }
    }

    /// Backing bytes of `sample`, starting at its first element.
    pub(crate) fn sample_data(&self, sample: usize, geom: &SampleGeometry) -> &'a [u8] {
        match self {
            ImageBatch::Tensor(view) => &view.data()[geom.offset..],
            ImageBatch::VarShape(images) => &images[sample].view().data()[geom.offset..],
        }
    }
}

impl<'a> From<StridedView<'a>> for ImageBatch<'a> {
    fn from(view: StridedView<'a>) -> Self {
        ImageBatch::Tensor(view)
    }
}

impl<'a> From<Vec<ImageView<'a>>> for ImageBatch<'a> {
    fn from(images: Vec<ImageView<'a>>) -> Self {
        ImageBatch::VarShape(images)
    }
}

/// Mutable counterpart of [`ImageBatch`].
#[derive(Debug)]
pub enum ImageBatchMut<'a> {
    Tensor(StridedViewMut<'a>),
    VarShape(Vec<ImageViewMut<'a>>),
}

/// One destination row handed to a worker.
#[derive(Debug)]
pub(crate) struct RowJob<'d> {
    pub sample: usize,
    pub row: usize,
    pub data: &'d mut [u8],
}

impl<'a> ImageBatchMut<'a> {
    pub fn num_samples(&self) -> usize {
        match self {
            ImageBatchMut::Tensor(view) => view.shape().extent(AxisKind::Sample).unwrap_or(1),
            ImageBatchMut::VarShape(images) => images.len(),
        }
    }

    pub fn is_tensor(&self) -> bool {
        matches!(self, ImageBatchMut::Tensor(_))
    }

    pub(crate) fn layout(&self) -> Result<BatchLayout> {
        match self {
            ImageBatchMut::Tensor(view) => BatchLayout::from_tensor(view.desc()),
            ImageBatchMut::VarShape(images) => {
                BatchLayout::from_images(images.iter().map(|i| i.desc()))
            }
        }
    }

    /// Splits the destination into one disjoint slice per row.
    pub(crate) fn rows(&mut self, layout: &BatchLayout) -> Result<Vec<RowJob<'_>>> {
        let elem = layout.dtype.size_bytes();

        match self {
            ImageBatchMut::Tensor(view) => {
                let all = layout
                    .samples
                    .iter()
                    .enumerate()
                    .flat_map(|(b, geom)| {
                        row_spans(*geom, elem)
                            .enumerate()
                            .map(move |(y, s)| (b, y, s))
                    });
                split_rows(view.data_mut(), all)
            }
            ImageBatchMut::VarShape(images) => {
                let mut jobs = Vec::new();
                for ((b, image), geom) in images.iter_mut().enumerate().zip(&layout.samples) {
                    let rows = row_spans(*geom, elem).enumerate().map(|(y, s)| (b, y, s));
                    jobs.extend(split_rows(image.data_mut(), rows)?);
                }
                Ok(jobs)
            }
        }
    }
}

impl<'a> From<StridedViewMut<'a>> for ImageBatchMut<'a> {
    fn from(view: StridedViewMut<'a>) -> Self {
        ImageBatchMut::Tensor(view)
    }
}

impl<'a> From<Vec<ImageViewMut<'a>>> for ImageBatchMut<'a> {
    fn from(images: Vec<ImageViewMut<'a>>) -> Self {
        ImageBatchMut::VarShape(images)
    }
}

fn row_spans(geom: SampleGeometry, elem: usize) -> impl Iterator<Item = (usize, usize)> {
    let len = geom.row_bytes(elem);
    (0..geom.height).map(move |y| (geom.offset + y * geom.row_stride, len))
}

/// Carves `(start, len)` spans, given in increasing address order, out of
/// `data`.
fn split_rows<'d>(
    mut data: &'d mut [u8],
    spans: impl Iterator<Item = (usize, usize, (usize, usize))>,
) -> Result<Vec<RowJob<'d>>> {
    let mut consumed = 0;
    let mut jobs = Vec::new();

    for (sample, row, (start, len)) in spans {
        if start < consumed {
            return Err(Error::InvalidArgument(format!(
                "row {row} of sample #{sample} overlaps the previous row"
            )));
        }
        let skip = start - consumed;
        if skip + len > data.len() {
            return Err(Error::OutOfBounds);
        }

        let (_, rest) = core::mem::take(&mut data).split_at_mut(skip);
        let (row_data, rest) = rest.split_at_mut(len);
        data = rest;
        consumed = start + len;
        jobs.push(RowJob {
            sample,
            row,
            data: row_data,
        });
    }

    Ok(jobs)
}
