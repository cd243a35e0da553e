//! Construction-time error types.
//!
//! Per-pixel and per-primitive rejection is silent by design (see the crate
//! root docs); the only fallible operation in the public API is building a
//! [`crate::vram::VramSurface`] from a buffer of the wrong size.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterizerError {
    #[error("VRAM buffer has {actual} halfwords, expected {expected}")]
    WrongVramLength { actual: usize, expected: usize },
}
