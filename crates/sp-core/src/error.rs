use core::fmt;

use crate::dtype::DataType;
use crate::layout::AxisKind;

pub type Result<T> = core::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotImplemented,
    Queue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    InvalidLayout(&'static str),
    InvalidRank { rank: usize, expected: usize },
    InvalidExtent { axis: usize, extent: usize },
    InvalidStride { axis: usize, stride: usize, min: usize },
    SizeMismatch { expected: usize, actual: usize },
    MissingAxis(AxisKind),
    InvalidAlignment(usize),
    UnsupportedDataType(DataType),
    FormatMismatch,
    InvalidOffset { sample: usize, top: i32, left: i32 },
    DestinationTooSmall { sample: usize },
    InvalidBorderType(u32),
    InvalidArgument(String),
    NotImplemented(&'static str),
    Queue(String),
    OutOfBounds,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotImplemented(_) => ErrorKind::NotImplemented,
            Self::Queue(_) => ErrorKind::Queue,
            _ => ErrorKind::InvalidArgument,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLayout(reason) => write!(f, "invalid layout: {reason}"),
            Self::InvalidRank { rank, expected } => {
                write!(f, "invalid rank: got {rank}, expected {expected}")
            }
            Self::InvalidExtent { axis, extent } => {
                write!(f, "invalid extent {extent} for axis #{axis}")
            }
            Self::InvalidStride { axis, stride, min } => {
                write!(f, "invalid stride {stride} for axis #{axis}, need at least {min}")
            }
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::MissingAxis(axis) => write!(f, "missing axis '{}'", axis.label()),
            Self::InvalidAlignment(align) => {
                write!(f, "alignment {align} is not a power of two")
            }
            Self::UnsupportedDataType(dtype) => write!(f, "unsupported data type {dtype}"),
            Self::FormatMismatch => write!(f, "source and destination formats differ"),
            Self::InvalidOffset { sample, top, left } => {
                write!(f, "invalid offset (top={top}, left={left}) for sample #{sample}")
            }
            Self::DestinationTooSmall { sample } => {
                write!(f, "destination too small for sample #{sample}")
            }
            Self::InvalidBorderType(code) => write!(f, "invalid border type {code}"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::NotImplemented(what) => write!(f, "not implemented: {what}"),
            Self::Queue(msg) => write!(f, "queue error: {msg}"),
            Self::OutOfBounds => write!(f, "out of bounds"),
        }
    }
}

impl std::error::Error for Error {}
