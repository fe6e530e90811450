use crate::dtype::DataType;
use crate::error::{Error, Result};
use crate::layout::{Layout, MAX_RANK};
use crate::shape::Shape;

/// Validated shape, element type and byte strides of a strided tensor.
///
/// Strides are canonical: an outer axis never steps less than the byte
/// footprint of the next non-unit axis nested inside it, and the innermost
/// non-unit axis steps by a positive multiple of the element size. Axes of
/// extent 1 are never dereferenced, so their strides are not constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TensorDesc {
    shape: Shape,
    dtype: DataType,
    strides: [usize; MAX_RANK],
}

impl TensorDesc {
    pub fn new(shape: Shape, dtype: DataType, strides: &[usize]) -> Result<Self> {
        validate_strides(&shape, dtype, strides)?;
        let mut out = [0; MAX_RANK];
        out[..strides.len()].copy_from_slice(strides);
        Ok(Self {
            shape,
            dtype,
            strides: out,
        })
    }

    /// Packed row-major strides for `shape`.
    pub fn packed(shape: Shape, dtype: DataType) -> Result<Self> {
        let rank = shape.rank();
        let mut strides = [0usize; MAX_RANK];
        strides[rank - 1] = dtype.size_bytes();
        for i in (0..rank - 1).rev() {
            strides[i] = strides[i + 1]
                .checked_mul(shape.extents()[i + 1])
                .ok_or(Error::OutOfBounds)?;
        }
        Self::new(shape, dtype, &strides[..rank])
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn layout(&self) -> Layout {
        self.shape.layout()
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides[..self.rank()]
    }

    pub fn stride(&self, axis: usize) -> usize {
        self.strides()[axis]
    }

    /// Number of bytes spanned from the first to one past the last element.
    pub fn footprint(&self) -> usize {
        // Overflow was ruled out by `validate_strides`.
        self.shape
            .extents()
            .iter()
            .zip(self.strides())
            .map(|(&e, &s)| (e - 1) * s)
            .sum::<usize>()
            + self.dtype.size_bytes()
    }

    pub fn byte_offset(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.rank() {
            return Err(Error::InvalidRank {
                rank: index.len(),
                expected: self.rank(),
            });
        }

        let mut offset = 0;
        let axes = self.shape.extents().iter().zip(self.strides());
        for (&i, (&extent, &stride)) in index.iter().zip(axes) {
            if i >= extent {
                return Err(Error::OutOfBounds);
            }
            offset += i * stride;
        }
        Ok(offset)
    }

    /// Same memory described under another axis order. The permuted strides
    /// must themselves be canonical for `dst`.
    pub fn permute(&self, dst: Layout) -> Result<TensorDesc> {
        let shape = self.shape.permute(dst)?;
        let strides = self.layout().permute(self.strides(), &dst)?;
        Self::new(shape, self.dtype, &strides[..dst.rank()])
    }

    /// Whether elements are laid out back to back with no gaps.
    pub fn is_packed(&self) -> bool {
        self.footprint() == self.shape.num_elements() * self.dtype.size_bytes()
    }

    /// Same packed bytes addressed under new extents and layout. The element
    /// count must not change.
    pub fn reshape(&self, extents: &[usize], layout: Layout) -> Result<TensorDesc> {
        let shape = Shape::new(extents, layout)?;
        if !self.is_packed() {
            return Err(Error::InvalidArgument("reshape needs packed strides".into()));
        }
        if shape.num_elements() != self.shape.num_elements() {
            return Err(Error::SizeMismatch {
                expected: self.shape.num_elements(),
                actual: shape.num_elements(),
            });
        }
        Self::packed(shape, self.dtype)
    }
}

/// Checks that `strides` describe a canonical, non-aliasing mapping for
/// `shape` with elements of type `dtype`.
pub fn validate_strides(shape: &Shape, dtype: DataType, strides: &[usize]) -> Result<()> {
    if strides.len() != shape.rank() {
        return Err(Error::InvalidRank {
            rank: strides.len(),
            expected: shape.rank(),
        });
    }

    let elem = dtype.size_bytes();
    let mut nested_footprint: Option<usize> = None;

    for axis in (0..shape.rank()).rev() {
        let extent = shape.extents()[axis];
        if extent == 1 {
            continue;
        }

        let stride = strides[axis];
        match nested_footprint {
            None => {
                if stride < elem || !stride.is_multiple_of(elem) {
                    return Err(Error::InvalidStride {
                        axis,
                        stride,
                        min: elem,
                    });
                }
            }
            Some(min) => {
                if stride < min {
                    return Err(Error::InvalidStride { axis, stride, min });
                }
            }
        }

        let footprint = stride.checked_mul(extent).ok_or(Error::InvalidStride {
            axis,
            stride,
            min: usize::MAX,
        })?;
        nested_footprint = Some(footprint);
    }

    Ok(())
}

/// Read-only strided view over caller-owned bytes.
#[derive(Debug, Clone, Copy)]
pub struct StridedView<'a> {
    desc: TensorDesc,
    data: &'a [u8],
}

impl<'a> StridedView<'a> {
    pub fn new(desc: TensorDesc, data: &'a [u8]) -> Result<Self> {
        let expected = desc.footprint();
        if data.len() < expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { desc, data })
    }

    /// Caller guarantees `data` covers `desc.footprint()` bytes.
    pub(crate) fn from_trusted(desc: TensorDesc, data: &'a [u8]) -> Self {
        debug_assert!(data.len() >= desc.footprint());
        Self { desc, data }
    }

    /// Validates `strides` and wraps `data` in one step.
    pub fn from_parts(
        shape: Shape,
        dtype: DataType,
        strides: &[usize],
        data: &'a [u8],
    ) -> Result<Self> {
        Self::new(TensorDesc::new(shape, dtype, strides)?, data)
    }

    pub fn desc(&self) -> &TensorDesc {
        &self.desc
    }

    pub fn shape(&self) -> &Shape {
        self.desc.shape()
    }

    pub fn dtype(&self) -> DataType {
        self.desc.dtype()
    }

    pub fn strides(&self) -> &[usize] {
        self.desc.strides()
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// New view over the same bytes, see [`TensorDesc::reshape`].
    pub fn reshape(&self, extents: &[usize], layout: Layout) -> Result<StridedView<'a>> {
        let desc = self.desc.reshape(extents, layout)?;
        Ok(Self::from_trusted(desc, self.data))
    }

    /// Bytes of the element at `index`.
    pub fn get(&self, index: &[usize]) -> Option<&'a [u8]> {
        let offset = self.desc.byte_offset(index).ok()?;
        self.data.get(offset..offset + self.desc.dtype().size_bytes())
    }
}

/// Mutable strided view over caller-owned bytes.
#[derive(Debug)]
pub struct StridedViewMut<'a> {
    desc: TensorDesc,
    data: &'a mut [u8],
}

impl<'a> StridedViewMut<'a> {
    pub fn new(desc: TensorDesc, data: &'a mut [u8]) -> Result<Self> {
        let expected = desc.footprint();
        if data.len() < expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { desc, data })
    }

    pub(crate) fn from_trusted(desc: TensorDesc, data: &'a mut [u8]) -> Self {
        debug_assert!(data.len() >= desc.footprint());
        Self { desc, data }
    }

    pub fn from_parts(
        shape: Shape,
        dtype: DataType,
        strides: &[usize],
        data: &'a mut [u8],
    ) -> Result<Self> {
        Self::new(TensorDesc::new(shape, dtype, strides)?, data)
    }

    pub fn desc(&self) -> &TensorDesc {
        &self.desc
    }

    pub fn shape(&self) -> &Shape {
        self.desc.shape()
    }

    pub fn dtype(&self) -> DataType {
        self.desc.dtype()
    }

    pub fn strides(&self) -> &[usize] {
        self.desc.strides()
    }

    pub fn data(&self) -> &[u8] {
        &*self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }

    pub fn into_data(self) -> &'a mut [u8] {
        self.data
    }

    pub fn reshape(self, extents: &[usize], layout: Layout) -> Result<StridedViewMut<'a>> {
        let desc = self.desc.reshape(extents, layout)?;
        Ok(Self::from_trusted(desc, self.data))
    }

    pub fn as_view(&self) -> StridedView<'_> {
        StridedView {
            desc: self.desc,
            data: &*self.data,
        }
    }

    pub fn get(&self, index: &[usize]) -> Option<&[u8]> {
        let offset = self.desc.byte_offset(index).ok()?;
        self.data.get(offset..offset + self.desc.dtype().size_bytes())
    }

    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut [u8]> {
        let offset = self.desc.byte_offset(index).ok()?;
        let elem = self.desc.dtype().size_bytes();
        self.data.get_mut(offset..offset + elem)
    }
}
