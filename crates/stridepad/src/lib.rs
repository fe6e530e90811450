//! Umbrella crate for the `stridepad` workspace.
//!
//! Re-exports the strided addressing model from `sp-core` and the
//! copy-make-border engine from `sp-border`.

pub use sp_border::*;
pub use sp_core::*;
