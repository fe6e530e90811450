use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};

/// Maximum number of axes a layout may carry. Every axis kind appears at most
/// once, so this is also the number of distinct kinds.
pub const MAX_RANK: usize = 6;

/// Semantic meaning of one tensor axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisKind {
    Sample,
    Channel,
    Depth,
    Frame,
    Height,
    Width,
}

impl AxisKind {
    pub const fn label(self) -> char {
        match self {
            Self::Sample => 'N',
            Self::Channel => 'C',
            Self::Depth => 'D',
            Self::Frame => 'F',
            Self::Height => 'H',
            Self::Width => 'W',
        }
    }

    pub const fn from_label(c: char) -> Option<Self> {
        match c {
            'N' => Some(Self::Sample),
            'C' => Some(Self::Channel),
            'D' => Some(Self::Depth),
            'F' => Some(Self::Frame),
            'H' => Some(Self::Height),
            'W' => Some(Self::Width),
            _ => None,
        }
    }
}

/// Ordered axis labels, outermost first. Pure metadata.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout {
    axes: [AxisKind; MAX_RANK],
    rank: u8,
}

impl Layout {
    pub const NHWC: Layout = Layout::from_static(&[
        AxisKind::Sample,
        AxisKind::Height,
        AxisKind::Width,
        AxisKind::Channel,
    ]);
    pub const NCHW: Layout = Layout::from_static(&[
        AxisKind::Sample,
        AxisKind::Channel,
        AxisKind::Height,
        AxisKind::Width,
    ]);
    pub const HWC: Layout =
        Layout::from_static(&[AxisKind::Height, AxisKind::Width, AxisKind::Channel]);
    pub const CHW: Layout =
        Layout::from_static(&[AxisKind::Channel, AxisKind::Height, AxisKind::Width]);
    pub const NHW: Layout =
        Layout::from_static(&[AxisKind::Sample, AxisKind::Height, AxisKind::Width]);
    pub const HW: Layout = Layout::from_static(&[AxisKind::Height, AxisKind::Width]);
    pub const NC: Layout = Layout::from_static(&[AxisKind::Sample, AxisKind::Channel]);
    pub const C: Layout = Layout::from_static(&[AxisKind::Channel]);
    pub const W: Layout = Layout::from_static(&[AxisKind::Width]);
    pub const CFDHW: Layout = Layout::from_static(&[
        AxisKind::Channel,
        AxisKind::Frame,
        AxisKind::Depth,
        AxisKind::Height,
        AxisKind::Width,
    ]);
    pub const FDHWC: Layout = Layout::from_static(&[
        AxisKind::Frame,
        AxisKind::Depth,
        AxisKind::Height,
        AxisKind::Width,
        AxisKind::Channel,
    ]);

    /// Builds a layout from trusted constant axes. Callers must uphold the
    /// layout invariants; see [`Layout::new`] for the checked version.
    const fn from_static(axes: &[AxisKind]) -> Layout {
        let mut out = [AxisKind::Sample; MAX_RANK];
        let mut i = 0;
        while i < axes.len() {
            out[i] = axes[i];
            i += 1;
        }
        Layout {
            axes: out,
            rank: axes.len() as u8,
        }
    }

    pub fn new(axes: &[AxisKind]) -> Result<Self> {
        if axes.is_empty() || axes.len() > MAX_RANK {
            return Err(Error::InvalidRank {
                rank: axes.len(),
                expected: MAX_RANK,
            });
        }

        for (i, a) in axes.iter().enumerate() {
            if axes[..i].contains(a) {
                return Err(Error::InvalidLayout("duplicate axis"));
            }
        }

        let h = axes.iter().position(|&a| a == AxisKind::Height);
        let w = axes.iter().position(|&a| a == AxisKind::Width);
        if let (Some(h), Some(w)) = (h, w)
            && w != h + 1
        {
            return Err(Error::InvalidLayout("height must directly precede width"));
        }

        Ok(Self::from_static(axes))
    }

    pub fn rank(&self) -> usize {
        self.rank as usize
    }

    pub fn axes(&self) -> &[AxisKind] {
        &self.axes[..self.rank()]
    }

    pub fn axis(&self, i: usize) -> Option<AxisKind> {
        self.axes().get(i).copied()
    }

    pub fn find(&self, kind: AxisKind) -> Option<usize> {
        self.axes().iter().position(|&a| a == kind)
    }

    pub fn contains(&self, kind: AxisKind) -> bool {
        self.find(kind).is_some()
    }

    /// Channel axis present and placed before the height axis (planar data).
    pub fn is_channel_first(&self) -> bool {
        match (self.find(AxisKind::Channel), self.find(AxisKind::Height)) {
            (Some(c), Some(h)) => c < h,
            _ => false,
        }
    }

    /// Re-expresses per-axis `values` given in `self` order under `dst` order.
    ///
    /// Axes are matched by kind. Axes of `self` missing from `dst` are dropped
    /// without any check; an axis of `dst` missing from `self` is an error.
    pub fn permute<T: Copy + Default>(
        &self,
        values: &[T],
        dst: &Layout,
    ) -> Result<[T; MAX_RANK]> {
        if values.len() != self.rank() {
            return Err(Error::InvalidRank {
                rank: values.len(),
                expected: self.rank(),
            });
        }

        let mut out = [T::default(); MAX_RANK];
        for (slot, &kind) in out.iter_mut().zip(dst.axes()) {
            let src = self.find(kind).ok_or(Error::MissingAxis(kind))?;
            *slot = values[src];
        }
        Ok(out)
    }
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut axes = [AxisKind::Sample; MAX_RANK];
        let mut rank = 0;
        for c in s.chars() {
            let kind = AxisKind::from_label(c).ok_or(Error::InvalidLayout("unknown axis label"))?;
            if rank == MAX_RANK {
                return Err(Error::InvalidRank {
                    rank: s.chars().count(),
                    expected: MAX_RANK,
                });
            }
            axes[rank] = kind;
            rank += 1;
        }
        Self::new(&axes[..rank])
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for a in self.axes() {
            write!(f, "{}", a.label())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layout(\"{self}\")")
    }
}
