//! Sampling grids at fractional pixel coordinates.
//!
//! [`GridInterpolator`] is the seam the engine samples through.
//! [`KernelInterpolator`] is the general N-D implementation and
//! [`EdgeCorrectedInterpolator`] adds half-pixel edge handling on top of any
//! interpolator for 2-D grids.

pub mod edge;
pub mod kernel;

pub use edge::{pad_edge_1, EdgeCorrectedInterpolator};
pub use kernel::KernelInterpolator;

use ndarray::{ArrayView2, ArrayViewD};

use crate::error::Result;
use crate::types::InterpolationOrder;

/// Samples a grid at fractional pixel coordinates.
///
/// `coords` has one row per grid axis and one column per sample point. Points
/// outside the grid, or with non-finite coordinates, receive `fill_value`.
pub trait GridInterpolator {
    fn sample(
        &self,
        grid: ArrayViewD<'_, f64>,
        coords: ArrayView2<'_, f64>,
        order: InterpolationOrder,
        fill_value: f64,
    ) -> Result<Vec<f64>>;
}

impl<T: GridInterpolator + ?Sized> GridInterpolator for &T {
    fn sample(
        &self,
        grid: ArrayViewD<'_, f64>,
        coords: ArrayView2<'_, f64>,
        order: InterpolationOrder,
        fill_value: f64,
    ) -> Result<Vec<f64>> {
        (**self).sample(grid, coords, order, fill_value)
    }
}
