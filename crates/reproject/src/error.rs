//! Error types for reprojection.

use projection::ProjectionError;
use thiserror::Error;

/// Errors that can occur while reprojecting a grid.
///
/// Individual pixels that fail to map are never errors; they come back as
/// NaN in the output and 0 in the footprint.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReprojectError {
    /// Both systems have the same number of axes but the axis types differ.
    #[error("non-equivalent coordinate systems: input axes {input}, output axes {output}")]
    IncompatibleCoordinateSystems { input: String, output: String },

    /// More non-celestial axes than the engine can handle.
    #[error("unsupported dimensionality: {0}")]
    UnsupportedDimensionality(String),

    /// Input and output disagree on the extent of their non-celestial axes.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The requested output shape cannot hold a celestial grid.
    #[error("invalid output shape {0:?}")]
    InvalidShape(Vec<usize>),

    /// Unknown interpolation order.
    #[error("invalid interpolation order {0} (expected 0, 1 or 3)")]
    InvalidOrder(u8),

    /// The interpolator rejected its inputs.
    #[error("interpolation error: {0}")]
    Interpolation(String),

    /// A coordinate system lacks an axis the chosen path needs.
    #[error("invalid coordinate system: {0}")]
    InvalidCoordinateSystem(String),

    /// Building a coordinate system failed.
    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// HEALPix parameters are out of range.
    #[error("HEALPix error: {0}")]
    Healpix(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    InvalidConfig(String),
}

impl ReprojectError {
    /// Create an UnsupportedDimensionality error.
    pub fn unsupported_dimensionality(msg: impl Into<String>) -> Self {
        Self::UnsupportedDimensionality(msg.into())
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Create an Interpolation error.
    pub fn interpolation(msg: impl Into<String>) -> Self {
        Self::Interpolation(msg.into())
    }

    /// Create an InvalidCoordinateSystem error.
    pub fn invalid_coordinate_system(msg: impl Into<String>) -> Self {
        Self::InvalidCoordinateSystem(msg.into())
    }

    /// Create a Healpix error.
    pub fn healpix(msg: impl Into<String>) -> Self {
        Self::Healpix(msg.into())
    }
}

impl From<ndarray::ShapeError> for ReprojectError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::ShapeMismatch(err.to_string())
    }
}

/// Result type for reprojection operations.
pub type Result<T> = std::result::Result<T, ReprojectError>;
