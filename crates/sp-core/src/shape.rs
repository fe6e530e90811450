use crate::error::{Error, Result};
use crate::layout::{AxisKind, Layout, MAX_RANK};

/// Axis extents paired with their [`Layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    layout: Layout,
    extents: [usize; MAX_RANK],
}

impl Shape {
    pub fn new(extents: &[usize], layout: Layout) -> Result<Self> {
        if extents.len() != layout.rank() {
            return Err(Error::InvalidRank {
                rank: extents.len(),
                expected: layout.rank(),
            });
        }
        if let Some(axis) = extents.iter().position(|&e| e == 0) {
            return Err(Error::InvalidExtent { axis, extent: 0 });
        }

        let mut out = [0; MAX_RANK];
        out[..extents.len()].copy_from_slice(extents);
        Ok(Self {
            layout,
            extents: out,
        })
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    pub fn extents(&self) -> &[usize] {
        &self.extents[..self.rank()]
    }

    pub fn extent(&self, kind: AxisKind) -> Option<usize> {
        self.layout.find(kind).map(|i| self.extents[i])
    }

    pub fn num_elements(&self) -> usize {
        self.extents().iter().product()
    }

    /// Same extents, re-expressed under `dst` axis order.
    pub fn permute(&self, dst: Layout) -> Result<Shape> {
        let extents = self.layout.permute(self.extents(), &dst)?;
        Ok(Self {
            layout: dst,
            extents,
        })
    }
}
