//! Batched copy-make-border over strided image views.
//!
//! Each source sample is copied into its destination at a `(top, left)`
//! offset and the remaining destination pixels are extrapolated with one of
//! the [`BorderType`](sp_core::BorderType) policies. Sources and destinations
//! are either a single strided tensor or a list of independently sized
//! images:
//!
//! | source      | destination |
//! |-------------|-------------|
//! | tensor      | tensor      |
//! | var-shape   | var-shape   |
//! | var-shape   | tensor      |
//!
//! All arguments are validated before the first destination byte is written.

mod batch;
mod engine;
mod fill;
mod offsets;
mod stream;

pub use batch::{ImageBatch, ImageBatchMut};
pub use engine::{CopyMakeBorder, copy_make_border};
pub use fill::{BorderSpec, FILL_CHANNELS, encode_fill, is_supported};
pub use offsets::{Offset, Offsets};
pub use stream::Stream;
