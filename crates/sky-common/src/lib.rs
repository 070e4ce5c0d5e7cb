//! Common types shared by the sky-reproject crates.

pub mod axis;
pub mod error;
pub mod frame;

pub use axis::AxisType;
pub use error::FrameParseError;
pub use frame::CelestialFrame;
