//! World coordinate systems for celestial grids.
//!
//! Provides the [`CoordinateSystem`] capability consumed by the reprojection
//! engine, a FITS-style [`Wcs`] implementation with TAN, SIN and CAR
//! projections, and [`FrameConverter`] for moving between celestial frames.
//! The projection math is implemented from scratch; `nalgebra` carries the
//! small linear-algebra pieces (PC matrices, frame rotations).

pub mod coordinate_system;
pub mod cylindrical;
pub mod error;
pub mod frames;
pub mod rotation;
pub mod wcs;
pub mod zenithal;

pub use coordinate_system::{wcs_to_array_axis, CelestialAxes, CoordinateSystem};
pub use cylindrical::PlateCarree;
pub use error::{ProjectionError, Result};
pub use frames::{FrameConverter, RotationFrameConverter};
pub use rotation::SphericalRotation;
pub use wcs::{AxisHeader, CelestialProjection, Wcs, WcsHeader};
pub use zenithal::Zenithal;

pub use sky_common::{AxisType, CelestialFrame};
