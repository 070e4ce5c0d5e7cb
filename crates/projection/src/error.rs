//! Error types for coordinate system construction.

use thiserror::Error;

/// Errors raised while building a world coordinate system.
///
/// Mapping individual pixels never fails; points that cannot be mapped come
/// back as non-finite coordinates instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    /// The CTYPE projection code is not implemented.
    #[error("unsupported projection code '{0}'")]
    UnsupportedProjection(String),

    /// No longitude or no latitude axis was found in the header.
    #[error("missing celestial {0} axis")]
    MissingCelestialAxis(&'static str),

    /// Two axes claim the same role.
    #[error("duplicate {0} axis")]
    DuplicateAxis(String),

    /// The celestial pair uses different projection codes.
    #[error("celestial axes disagree on projection: {0} vs {1}")]
    MismatchedProjection(String, String),

    /// A header keyword has an unusable value.
    #[error("invalid header value for {keyword}: {message}")]
    InvalidHeader {
        keyword: &'static str,
        message: String,
    },
}

impl ProjectionError {
    /// Create an InvalidHeader error.
    pub fn invalid_header(keyword: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            keyword,
            message: message.into(),
        }
    }
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
