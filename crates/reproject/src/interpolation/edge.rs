//! Half-pixel-correct sampling at 2-D grid edges.
//!
//! A pixel covers `[i - 0.5, i + 0.5]`, so real data extends half a pixel
//! beyond the first and last pixel centres. Plain interpolators only know the
//! centres `[0, n - 1]`. Padding the grid by one replicated pixel on every side
//! lets the outer half-pixel be sampled; anything beyond it is reset to the
//! fill value.

use ndarray::{s, Array2, ArrayView2, ArrayViewD, Ix2};

use super::{GridInterpolator, KernelInterpolator};
use crate::error::{ReprojectError, Result};
use crate::types::InterpolationOrder;

/// Pad a 2-D grid by one pixel on every side, replicating edge values.
///
/// Corners take the value of the nearest corner pixel.
pub fn pad_edge_1(grid: ArrayView2<'_, f64>) -> Array2<f64> {
    let (ny, nx) = grid.dim();
    let mut padded = Array2::zeros((ny + 2, nx + 2));
    if ny == 0 || nx == 0 {
        return padded;
    }

    padded.slice_mut(s![1..=ny, 1..=nx]).assign(&grid);

    // Rows first, then full columns so the corners are covered
    padded.slice_mut(s![0, 1..=nx]).assign(&grid.row(0));
    padded.slice_mut(s![ny + 1, 1..=nx]).assign(&grid.row(ny - 1));

    let left = padded.column(1).to_owned();
    padded.column_mut(0).assign(&left);
    let right = padded.column(nx).to_owned();
    padded.column_mut(nx + 1).assign(&right);

    padded
}

/// Wraps a [`GridInterpolator`] with half-pixel edge handling for 2-D grids.
///
/// Grids of rank three or more are passed straight through without any edge
/// model.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeCorrectedInterpolator<I = KernelInterpolator> {
    inner: I,
}

impl<I: GridInterpolator> EdgeCorrectedInterpolator<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<I: GridInterpolator> GridInterpolator for EdgeCorrectedInterpolator<I> {
    fn sample(
        &self,
        grid: ArrayViewD<'_, f64>,
        coords: ArrayView2<'_, f64>,
        order: InterpolationOrder,
        fill_value: f64,
    ) -> Result<Vec<f64>> {
        if grid.ndim() != 2 {
            return self.inner.sample(grid, coords, order, fill_value);
        }
        if coords.nrows() != 2 {
            return Err(ReprojectError::interpolation(format!(
                "got {} coordinate arrays for a 2-D grid",
                coords.nrows()
            )));
        }
        if grid.is_empty() {
            return Ok(vec![fill_value; coords.ncols()]);
        }

        let grid = grid.into_dimensionality::<Ix2>()?;
        let (ny, nx) = grid.dim();
        let padded = pad_edge_1(grid);
        let shifted = &coords + 1.0;

        let mut values = self
            .inner
            .sample(padded.view().into_dyn(), shifted.view(), order, fill_value)?;

        let limits = [ny as f64 - 0.5, nx as f64 - 0.5];
        for (p, value) in values.iter_mut().enumerate() {
            let beyond = (0..2).any(|axis| {
                let c = coords[[axis, p]];
                c < -0.5 || c > limits[axis]
            });
            if beyond {
                *value = fill_value;
            }
        }

        Ok(values)
    }
}
