//! Test data generators for synthetic sky grids.
//!
//! These generators create predictable, verifiable patterns that can be
//! used across the test suite.

use ndarray::{Array, Array1, Array2, Array3};

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that data lands where it should by checking
/// that `grid[[row, col]] == col * 1000 + row`.
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(5, 10);
/// assert_eq!(grid.dim(), (5, 10));
/// assert_eq!(grid[[0, 0]], 0.0);
/// assert_eq!(grid[[0, 1]], 1000.0);
/// assert_eq!(grid[[1, 0]], 1.0);
/// ```
pub fn create_test_grid(ny: usize, nx: usize) -> Array2<f64> {
    Array::from_shape_fn((ny, nx), |(row, col)| (col * 1000 + row) as f64)
}

/// Creates a grid of distinct values increasing in row-major order,
/// starting at 1.
pub fn create_increasing_grid(ny: usize, nx: usize) -> Array2<f64> {
    Array::from_shape_fn((ny, nx), |(row, col)| (row * nx + col + 1) as f64)
}

/// Creates a grid with the same value everywhere.
pub fn create_constant_grid(ny: usize, nx: usize, value: f64) -> Array2<f64> {
    Array2::from_elem((ny, nx), value)
}

/// Creates a smooth, slowly varying grid.
///
/// Values follow a low-frequency sinusoid, so interpolation errors stay
/// small and round trips through resampling are close to lossless.
pub fn create_smooth_grid(ny: usize, nx: usize) -> Array2<f64> {
    Array::from_shape_fn((ny, nx), |(row, col)| {
        let u = col as f64 / nx.max(1) as f64;
        let v = row as f64 / ny.max(1) as f64;
        10.0 + (std::f64::consts::PI * u).sin() * (std::f64::consts::PI * v).cos()
    })
}

/// Creates a cube whose value encodes its position:
/// `plane * 1_000_000 + col * 1000 + row`.
pub fn create_test_cube(nz: usize, ny: usize, nx: usize) -> Array3<f64> {
    Array::from_shape_fn((nz, ny, nx), |(plane, row, col)| {
        (plane * 1_000_000 + col * 1000 + row) as f64
    })
}

/// Creates a cube whose spectrum is the same straight line at every pixel:
/// `intercept + slope * channel`.
pub fn create_linear_spectrum_cube(
    nz: usize,
    ny: usize,
    nx: usize,
    slope: f64,
    intercept: f64,
) -> Array3<f64> {
    Array::from_shape_fn((nz, ny, nx), |(channel, _, _)| {
        intercept + slope * channel as f64
    })
}

/// Creates a grid with NaN values at the given (row, col) positions.
pub fn create_grid_with_nans(ny: usize, nx: usize, nan_positions: &[(usize, usize)]) -> Array2<f64> {
    let mut grid = create_increasing_grid(ny, nx);
    for &(row, col) in nan_positions {
        if row < ny && col < nx {
            grid[[row, col]] = f64::NAN;
        }
    }
    grid
}

/// Creates a HEALPix map of `12 * nside^2` identical values.
pub fn create_constant_healpix_map(nside: usize, value: f64) -> Array1<f64> {
    Array1::from_elem(12 * nside * nside, value)
}
