//! Common types for reprojection.

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ReprojectError;

/// Interpolation order used when sampling the input grid.
///
/// Serialized as the integer order (0, 1 or 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum InterpolationOrder {
    /// Value of the nearest pixel centre.
    NearestNeighbor,
    /// Linear along every axis.
    #[default]
    Bilinear,
    /// Catmull-Rom cubic convolution along every axis.
    Bicubic,
}

impl InterpolationOrder {
    /// Numeric order of the kernel.
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::NearestNeighbor => 0,
            Self::Bilinear => 1,
            Self::Bicubic => 3,
        }
    }

    /// Number of taps per axis.
    pub fn support(&self) -> usize {
        match self {
            Self::NearestNeighbor => 1,
            Self::Bilinear => 2,
            Self::Bicubic => 4,
        }
    }
}

impl TryFrom<u8> for InterpolationOrder {
    type Error = ReprojectError;

    fn try_from(order: u8) -> Result<Self, Self::Error> {
        match order {
            0 => Ok(Self::NearestNeighbor),
            1 => Ok(Self::Bilinear),
            3 => Ok(Self::Bicubic),
            other => Err(ReprojectError::InvalidOrder(other)),
        }
    }
}

impl From<InterpolationOrder> for u8 {
    fn from(order: InterpolationOrder) -> Self {
        order.as_u8()
    }
}

impl FromStr for InterpolationOrder {
    type Err = ReprojectError;

    /// Parse from a name or an integer order (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nearest" | "nearest-neighbor" | "nearest_neighbor" => Ok(Self::NearestNeighbor),
            "linear" | "bilinear" => Ok(Self::Bilinear),
            "cubic" | "bicubic" => Ok(Self::Bicubic),
            other => {
                let order: u8 = other.parse().map_err(|_| {
                    ReprojectError::InvalidConfig(format!("unknown interpolation order '{}'", s))
                })?;
                Self::try_from(order)
            }
        }
    }
}

impl std::fmt::Display for InterpolationOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NearestNeighbor => write!(f, "nearest-neighbor"),
            Self::Bilinear => write!(f, "bilinear"),
            Self::Bicubic => write!(f, "bicubic"),
        }
    }
}

/// Resampled values together with their validity mask.
#[derive(Debug, Clone, PartialEq)]
pub struct ReprojectOutput {
    /// Resampled grid, exactly the requested output shape
    pub array: ArrayD<f64>,
    /// 1.0 where `array` is finite, 0.0 elsewhere
    pub footprint: ArrayD<f64>,
}

impl ReprojectOutput {
    /// Wrap a resampled array, deriving its footprint.
    pub fn from_array(array: ArrayD<f64>) -> Self {
        let footprint = array.mapv(|v| if v.is_finite() { 1.0 } else { 0.0 });
        Self { array, footprint }
    }

    /// Output shape.
    pub fn shape(&self) -> &[usize] {
        self.array.shape()
    }

    /// Fraction of output pixels with valid data (0.0 - 1.0).
    pub fn coverage(&self) -> f64 {
        let n = self.footprint.len();
        if n == 0 {
            0.0
        } else {
            self.footprint.sum() / n as f64
        }
    }
}
