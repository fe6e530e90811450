//! Strided tensor addressing for image batches.
//!
//! ## Layouts and Shapes
//! A [`Layout`] is an ordered list of axis kinds (`N`, `C`, `D`, `F`, `H`,
//! `W`) such as `NHWC` or `CHW`. A [`Shape`] pairs a layout with one positive
//! extent per axis and can be permuted to another layout by matching axis
//! kinds.
//!
//! ## Strides
//! Strides are in bytes. A [`TensorDesc`] only accepts strides that never
//! alias: walking outward from the innermost non-unit axis, every stride must
//! cover the full span of the axes nested inside it. Axes of extent 1 are
//! ignored by this check.
//!
//! ## Image Access
//! [`PlanarAccess`] projects any 2D image layout onto samples, planes, rows,
//! columns and channels, so kernels can address `NHWC`, `NCHW`, `HWC` and
//! `CHW` buffers the same way.
//!
//! ## Border Types
//! [`map_index`] resolves out-of-range coordinates with constant, replicate,
//! reflect, wrap and reflect-101 semantics.

mod border;
mod dtype;
mod error;
mod format;
mod image;
mod layout;
mod planar;
mod requirements;
mod shape;
mod strided;
mod tensor;

pub use border::{BorderType, map_index};
pub use dtype::DataType;
pub use error::{Error, ErrorKind, Result};
pub use format::{ImageFormat, MemLayout, Planes, Subsampling};
pub use image::{Image, ImageView, ImageViewMut};
pub use layout::{AxisKind, Layout, MAX_RANK};
pub use planar::PlanarAccess;
pub use requirements::{
    DEFAULT_BASE_ALIGN, DEFAULT_ROW_ALIGN, TensorRequirements, calc_requirements,
    calc_requirements_for_images,
};
pub use shape::Shape;
pub use strided::{StridedView, StridedViewMut, TensorDesc, validate_strides};
pub use tensor::Tensor;
