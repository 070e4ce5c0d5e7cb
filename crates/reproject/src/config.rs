//! Numeric policy for the reprojection engine.

use serde::{Deserialize, Serialize};

use crate::error::{ReprojectError, Result};
use crate::types::InterpolationOrder;

/// Configuration for the reprojection engine.
///
/// Captures the numeric conventions that would otherwise be implicit: how to
/// interpolate, what to write where no input data exists, and whether to
/// neutralise non-finite input samples before whole-volume sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReprojectConfig {
    /// Interpolation order for both reprojection paths.
    pub order: InterpolationOrder,

    /// Value written where an output pixel has no input coverage.
    pub fill_value: f64,

    /// Replace non-finite input samples with zero before whole-volume sampling.
    pub zero_non_finite_volume: bool,
}

impl Default for ReprojectConfig {
    fn default() -> Self {
        Self {
            order: InterpolationOrder::Bilinear,
            fill_value: f64::NAN,
            zero_non_finite_volume: true,
        }
    }
}

impl ReprojectConfig {
    /// Configuration with the default policy and the given order.
    pub fn with_order(order: InterpolationOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Unparseable values are ignored and leave the default in place.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("REPROJECT_ORDER") {
            if let Ok(order) = val.parse() {
                config.order = order;
            }
        }

        if let Ok(val) = std::env::var("REPROJECT_FILL_VALUE") {
            if let Ok(fill) = val.trim().to_lowercase().parse::<f64>() {
                config.fill_value = fill;
            }
        }

        if let Ok(val) = std::env::var("REPROJECT_ZERO_NON_FINITE") {
            config.zero_non_finite_volume = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.fill_value.is_infinite() {
            return Err(ReprojectError::InvalidConfig(
                "fill_value must be finite or NaN".to_string(),
            ));
        }

        Ok(())
    }
}
