//! Error types for QR generation and palette extraction

use thiserror::Error;

use crate::qrcode::DataTooLong;

/// Result type alias for qrstyle operations
pub type Result<T> = std::result::Result<T, Error>;

/// The three user-facing failure classes, plus the host's own file handling.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// Bad user input: empty text, out-of-range style values, bad colors.
    Validation,
    /// The logo could not be decoded or holds no pixels.
    Image,
    /// The text does not fit in a QR code at high error correction.
    Encoding,
    /// A style file could not be parsed.
    Config,
    /// Reading or writing files failed.
    Io,
}

/// Errors that can occur while generating a code or extracting a palette
#[derive(Error, Debug)]
pub enum Error {
    /// Nothing to encode
    #[error("Please enter some text for the QR Code.")]
    EmptyText,

    /// A style parameter is outside its accepted range
    #[error("Invalid {field}: {reason}")]
    InvalidStyle { field: &'static str, reason: String },

    /// Not a hex color
    #[error("Invalid color {0:?}: expected #rrggbb")]
    InvalidColor(String),

    /// Palette size of zero
    #[error("Palette size must be at least 1")]
    EmptyPalette,

    /// Undecodable image data
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Image with zero width or height
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Text over capacity
    #[error("Text is too long for a QR code with high error correction ({0})")]
    Encoding(#[from] DataTooLong),

    /// Malformed style file
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyText
            | Error::InvalidStyle { .. }
            | Error::InvalidColor(_)
            | Error::EmptyPalette => ErrorKind::Validation,
            Error::Image(_) | Error::EmptyImage { .. } => ErrorKind::Image,
            Error::Encoding(_) => ErrorKind::Encoding,
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn invalid_style(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidStyle { field, reason: reason.into() }
    }
}
