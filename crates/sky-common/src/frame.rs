//! Celestial reference frame types and utilities.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FrameParseError;

/// Celestial reference frames a coordinate system can express world
/// coordinates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CelestialFrame {
    /// International Celestial Reference System (RA/Dec)
    Icrs,
    /// FK5 equatorial system at equinox J2000
    Fk5,
    /// IAU 1958 Galactic system (l/b)
    Galactic,
    /// Mean ecliptic and equinox of J2000
    Ecliptic,
}

impl CelestialFrame {
    /// Parse a frame name.
    ///
    /// Accepts formats like:
    /// - "icrs"
    /// - "FK5" / "J2000"
    /// - "galactic" / "gal"
    /// - "ecliptic" / "ecl"
    pub fn from_name(s: &str) -> Result<Self, FrameParseError> {
        match s.trim().to_lowercase().as_str() {
            "icrs" => Ok(CelestialFrame::Icrs),
            "fk5" | "j2000" => Ok(CelestialFrame::Fk5),
            "galactic" | "gal" => Ok(CelestialFrame::Galactic),
            "ecliptic" | "ecl" => Ok(CelestialFrame::Ecliptic),
            _ => Err(FrameParseError::UnknownFrame(s.to_string())),
        }
    }

    /// Derive the frame from a FITS `CTYPEi` value and optional `RADESYS`.
    ///
    /// Equatorial axes (`RA--`, `DEC-`) default to ICRS when `RADESYS` is absent.
    /// Returns `None` for axes that are not celestial.
    pub fn from_ctype(ctype: &str, radesys: Option<&str>) -> Option<Self> {
        let prefix = ctype_prefix(ctype);

        match prefix.as_str() {
            "RA" | "DEC" => match radesys {
                Some(sys) => Self::from_name(sys).ok(),
                None => Some(CelestialFrame::Icrs),
            },
            "GLON" | "GLAT" => Some(CelestialFrame::Galactic),
            "ELON" | "ELAT" => Some(CelestialFrame::Ecliptic),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CelestialFrame::Icrs => "icrs",
            CelestialFrame::Fk5 => "fk5",
            CelestialFrame::Galactic => "galactic",
            CelestialFrame::Ecliptic => "ecliptic",
        }
    }

    /// Check if this is an equatorial (RA/Dec) frame.
    pub fn is_equatorial(&self) -> bool {
        matches!(self, CelestialFrame::Icrs | CelestialFrame::Fk5)
    }
}

impl fmt::Display for CelestialFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CelestialFrame {
    type Err = FrameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Uppercased coordinate-type part of a CTYPE (everything before the first '-').
pub(crate) fn ctype_prefix(ctype: &str) -> String {
    ctype
        .trim()
        .split('-')
        .next()
        .unwrap_or_default()
        .to_uppercase()
}
