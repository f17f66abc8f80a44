//! Media normalization pipeline.
//!
//! Pure transforms over uploaded binaries: images are compressed and resized
//! best-effort (fail-open, the caller keeps the original bytes on failure),
//! documents are size-validated hard (fail-closed). No shared state.

use thiserror::Error;

pub mod document;
pub mod image;
pub mod policy;

#[cfg(test)]
mod document_test;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("file size ({actual_mb:.2} MB) exceeds maximum allowed size of {max_mb} MB")]
    SizeExceeded { actual_mb: f64, max_mb: f64 },
}
