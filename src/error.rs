use alloc::string::String;
use enough::StopReason;

/// Errors from PNM decoding and encoding.
///
/// Decoding and encoding fail atomically: no partial raster or byte buffer is
/// ever handed back alongside one of these.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PnmError {
    #[error("unknown format magic `{token}`")]
    UnknownFormat { token: String },

    #[error("missing header field {field}")]
    MissingHeaderField { field: &'static str },

    #[error("invalid value `{value}` for header field {field}")]
    InvalidHeaderValue { field: &'static str, value: String },

    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEof { offset: usize },

    #[error("truncated sample data: need {expected_bytes} bytes, got {available_bytes}")]
    TruncatedSampleData {
        expected_bytes: usize,
        available_bytes: usize,
    },

    #[error("sample count mismatch: expected {expected}, found {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },

    #[error("invalid sample token `{token}` at byte {offset}")]
    InvalidSampleToken { offset: usize, token: String },

    #[error("sample {index} has value {value}, above maxval {maxval}")]
    SampleOutOfRange { index: usize, value: u32, maxval: u32 },

    #[error("header does not match raster: {0}")]
    HeaderRasterMismatch(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),

    #[error("i/o error: {0}")]
    Io(#[from] IoError),
}

/// Error type of the byte source/sink adapters. Uninhabited without `std`.
#[cfg(feature = "std")]
pub type IoError = std::io::Error;
/// Error type of the byte source/sink adapters. Uninhabited without `std`.
#[cfg(not(feature = "std"))]
pub type IoError = core::convert::Infallible;

/// Coarse classification of a [`PnmError`], for callers that branch on the
/// failure category rather than its details.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownFormat,
    MissingHeaderField,
    InvalidHeaderValue,
    UnexpectedEof,
    TruncatedSampleData,
    SampleCountMismatch,
    InvalidSampleToken,
    SampleOutOfRange,
    HeaderRasterMismatch,
    /// Dimension overflow or a [`crate::Limits`] violation.
    ResourceLimit,
    Cancelled,
    Io,
}

impl PnmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownFormat { .. } => ErrorKind::UnknownFormat,
            Self::MissingHeaderField { .. } => ErrorKind::MissingHeaderField,
            Self::InvalidHeaderValue { .. } => ErrorKind::InvalidHeaderValue,
            Self::UnexpectedEof { .. } => ErrorKind::UnexpectedEof,
            Self::TruncatedSampleData { .. } => ErrorKind::TruncatedSampleData,
            Self::SampleCountMismatch { .. } => ErrorKind::SampleCountMismatch,
            Self::InvalidSampleToken { .. } => ErrorKind::InvalidSampleToken,
            Self::SampleOutOfRange { .. } => ErrorKind::SampleOutOfRange,
            Self::HeaderRasterMismatch(_) => ErrorKind::HeaderRasterMismatch,
            Self::DimensionsTooLarge { .. } | Self::LimitExceeded(_) => ErrorKind::ResourceLimit,
            Self::Cancelled(_) => ErrorKind::Cancelled,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<StopReason> for PnmError {
    fn from(r: StopReason) -> Self {
        PnmError::Cancelled(r)
    }
}
