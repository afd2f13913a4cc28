//! Common error types.

use thiserror::Error;

/// Error raised by decoder and renderer backends.
///
/// Sessions never surface these to their caller; they are absorbed into the
/// empty state and only show up in logs.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Decoding error: {0}")]
    Decode(String),

    #[error("Image dimensions too large: {width}x{height} (max: {max_width}x{max_height})")]
    DimensionsTooLarge {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error("Memory limit exceeded: required {required} bytes, limit is {limit} bytes")]
    MemoryLimitExceeded { required: usize, limit: usize },

    #[error("Pixel buffer has {actual} bytes, expected {expected}")]
    InvalidBuffer { expected: usize, actual: usize },

    #[error("No frames in stream")]
    NoFrames,

    #[error("Render error: {0}")]
    Render(String),
}

pub type MediaResult<T> = Result<T, MediaError>;

impl MediaError {
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Whether the error comes from the input data rather than the host.
    pub fn is_data_error(&self) -> bool {
        !matches!(self, MediaError::Io(_) | MediaError::Render(_))
    }
}
