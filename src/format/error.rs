//! Error types for label format operations.

use thiserror::Error;

/// Errors that can occur while encoding or parsing label text.
#[derive(Error, Debug, PartialEq)]
pub enum FormatError {
    /// Image dimensions required but not available
    #[error("Image dimensions required to normalize boxes but not available for image '{image}'")]
    MissingDimensions {
        /// The image missing dimensions
        image: String,
    },

    /// Image dimensions of zero cannot be normalized against
    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions {
        /// Width that was given
        width: u32,
        /// Height that was given
        height: u32,
    },

    /// A label line could not be parsed
    #[error("Invalid label line '{line}': {message}")]
    InvalidLine {
        /// The offending line
        line: String,
        /// Description of the problem
        message: String,
    },
}

impl FormatError {
    /// Create a missing dimensions error.
    pub fn missing_dimensions(image: impl Into<String>) -> Self {
        Self::MissingDimensions {
            image: image.into(),
        }
    }

    /// Create an invalid line error.
    pub fn invalid_line(line: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidLine {
            line: line.into(),
            message: message.into(),
        }
    }
}
