//! Resampling of celestial grids between world coordinate systems.
//!
//! Given an input grid with its coordinate system and a target coordinate
//! system with an output shape, [`Reprojector`] computes where every output
//! pixel falls in the input and interpolates there. The result carries a
//! footprint marking which output pixels received finite data.
//!
//! # Example
//! ```
//! use ndarray::Array2;
//! use projection::{AxisHeader, Wcs, WcsHeader};
//! use reproject::{reproject_interp, InterpolationOrder};
//!
//! let wcs = Wcs::from_header(&WcsHeader::new(vec![
//!     AxisHeader::new("GLON-CAR", 1.0, 1.0, 0.0),
//!     AxisHeader::new("GLAT-CAR", 1.0, 1.0, 0.0),
//! ]))
//! .unwrap();
//!
//! let data = Array2::from_shape_fn((4, 4), |(y, x)| (y * 4 + x) as f64);
//! let out = reproject_interp(&data, &wcs, &wcs, &[4, 4], InterpolationOrder::Bilinear).unwrap();
//!
//! assert_eq!(out.array, data.into_dyn());
//! assert!(out.footprint.iter().all(|&f| f == 1.0));
//! ```

pub mod array_utils;
pub mod config;
pub mod engine;
pub mod error;
pub mod healpix;
pub mod interpolation;
pub mod types;

pub use array_utils::{celestial_permutation, iterate_over_celestial_slices, CelestialSlices};
pub use config::ReprojectConfig;
pub use engine::{reproject_interp, Reprojector};
pub use error::{ReprojectError, Result};
pub use healpix::{healpix_to_image, image_to_healpix, HealpixInterpolation};
pub use interpolation::{EdgeCorrectedInterpolator, GridInterpolator, KernelInterpolator};
pub use types::{InterpolationOrder, ReprojectOutput};
