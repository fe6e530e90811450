use crate::dtype::DataType;
use crate::error::Result;
use crate::format::ImageFormat;
use crate::layout::Layout;
use crate::requirements::{TensorRequirements, calc_requirements, calc_requirements_for_images};
use crate::shape::Shape;
use crate::strided::{StridedView, StridedViewMut, TensorDesc};

/// Owned, zero-initialized tensor storage.
///
/// The base alignment from the requirements is recorded but host memory is
/// allocated with the natural alignment of `u8`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    desc: TensorDesc,
    base_align: usize,
    data: Vec<u8>,
}

impl Tensor {
    pub fn new(reqs: TensorRequirements) -> Self {
        Self {
            desc: reqs.desc,
            base_align: reqs.base_align,
            data: vec![0; reqs.byte_size],
        }
    }

    pub fn zeros(shape: Shape, dtype: DataType) -> Result<Self> {
        Ok(Self::new(calc_requirements(shape, dtype, 0, 0)?))
    }

    pub fn for_images(
        samples: usize,
        width: usize,
        height: usize,
        format: ImageFormat,
    ) -> Result<Self> {
        Ok(Self::new(calc_requirements_for_images(
            samples, width, height, format, 0, 0,
        )?))
    }

    pub fn desc(&self) -> &TensorDesc {
        &self.desc
    }

    pub fn shape(&self) -> &Shape {
        self.desc.shape()
    }

    pub fn layout(&self) -> Layout {
        self.desc.layout()
    }

    pub fn dtype(&self) -> DataType {
        self.desc.dtype()
    }

    pub fn base_align(&self) -> usize {
        self.base_align
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn as_view(&self) -> StridedView<'_> {
        StridedView::from_trusted(self.desc, &self.data)
    }

    pub fn as_view_mut(&mut self) -> StridedViewMut<'_> {
        StridedViewMut::from_trusted(self.desc, &mut self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::Tensor;
    use crate::dtype::DataType;
    use crate::format::ImageFormat;
    use crate::layout::Layout;
    use crate::planar::PlanarAccess;
    use crate::shape::Shape;

    #[test]
    fn image_tensor_shape_and_access() {
        let tensor = Tensor::for_images(3, 163, 117, ImageFormat::RGBA8).expect("supported");
        assert_eq!(tensor.layout(), Layout::NHWC);
        assert_eq!(tensor.shape().extents(), &[3, 117, 163, 4]);
        assert_eq!(tensor.dtype(), DataType::U8);
        assert!(tensor.data().len() >= tensor.desc().footprint());

        let access = PlanarAccess::new(tensor.desc()).expect("image layout");
        assert_eq!(access.sample_stride(), tensor.desc().stride(0));
        assert_eq!(access.num_samples(), 3);
        assert_eq!(access.row_stride() % 32, 0);
    }

    #[test]
    fn views_share_storage() {
        let shape = Shape::new(&[2, 3], Layout::HW).expect("valid shape");
        let mut tensor = Tensor::zeros(shape, DataType::U8).expect("valid");
        tensor
            .as_view_mut()
            .get_mut(&[1, 2])
            .expect("in bounds")
            .copy_from_slice(&[7]);
        assert_eq!(tensor.as_view().get(&[1, 2]), Some(&[7u8][..]));
        assert_eq!(tensor.desc().strides(), &[32, 1]);
    }
}
