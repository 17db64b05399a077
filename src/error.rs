use std::{io::Error as IoError, result::Result as StdResult};

use thiserror::Error;

/// Errors at the edges of the toolkit: loading resources and submitting frames.
///
/// Geometry, layout, propagation and painting never fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Font parsing failed.
    #[error("font loading failed: {0}")]
    FontLoad(&'static str),
    /// Image decoding failed.
    #[error("image loading failed: {0}")]
    Image(#[from] image::ImageError),
    /// I/O error while reading a resource.
    #[error("I/O failed: {0}")]
    Io(#[from] IoError),
    /// A window's recording thread panicked.
    #[error("frame recording panicked")]
    RecordingPanicked,
    /// A drawing context failed to submit a frame.
    #[error("backend: {0}")]
    Backend(String),
}

/// Result type for fallible toolkit operations.
pub type Result<T> = StdResult<T, Error>;
