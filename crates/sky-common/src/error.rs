//! Error types shared across the sky-reproject crates.

use thiserror::Error;

/// Failure to interpret a celestial frame name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameParseError {
    #[error("Unknown celestial frame: {0}")]
    UnknownFrame(String),
}
