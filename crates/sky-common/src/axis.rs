//! World-axis type tags.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::frame::ctype_prefix;

/// Semantic type of a world axis.
///
/// Two coordinate systems are only considered equivalent when their axes carry
/// the same tags in the same order. The projection code and the celestial frame
/// are deliberately not part of the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    /// Celestial longitude (RA, GLON, ELON)
    Longitude,
    /// Celestial latitude (DEC, GLAT, ELAT)
    Latitude,
    /// Spectral axis (frequency, wavelength, velocity, ...)
    Spectral,
    /// Stokes polarisation parameter
    Stokes,
    /// Time axis
    Time,
    /// Anything else: a plain linear axis
    Linear,
}

const SPECTRAL_CODES: &[&str] = &[
    "FREQ", "ENER", "WAVN", "VRAD", "WAVE", "VOPT", "ZOPT", "AWAV", "VELO", "BETA", "FELO",
    "VELOCITY",
];

const TIME_CODES: &[&str] = &["TIME", "UTC", "TAI", "TT", "TDB", "MJD"];

impl AxisType {
    /// Classify a FITS `CTYPEi` value.
    pub fn from_ctype(ctype: &str) -> Self {
        let prefix = ctype_prefix(ctype);

        match prefix.as_str() {
            "RA" | "GLON" | "ELON" => AxisType::Longitude,
            "DEC" | "GLAT" | "ELAT" => AxisType::Latitude,
            "STOKES" => AxisType::Stokes,
            p if SPECTRAL_CODES.contains(&p) => AxisType::Spectral,
            p if TIME_CODES.contains(&p) => AxisType::Time,
            _ => AxisType::Linear,
        }
    }

    /// Check if this axis is one of the celestial pair.
    pub fn is_celestial(&self) -> bool {
        matches!(self, AxisType::Longitude | AxisType::Latitude)
    }
}

impl fmt::Display for AxisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AxisType::Longitude => "longitude",
            AxisType::Latitude => "latitude",
            AxisType::Spectral => "spectral",
            AxisType::Stokes => "stokes",
            AxisType::Time => "time",
            AxisType::Linear => "linear",
        };
        write!(f, "{}", name)
    }
}
