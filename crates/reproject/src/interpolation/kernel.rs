//! Separable convolution kernels over N-D grids.

use ndarray::{ArrayView2, ArrayViewD};

use super::GridInterpolator;
use crate::error::{ReprojectError, Result};
use crate::types::InterpolationOrder;

/// Samples grids of any rank with nearest, linear or cubic kernels.
///
/// Sample positions are pixel centres: coordinate 0 is the centre of the
/// first pixel and `n - 1` the centre of the last. Any coordinate outside
/// `[0, n - 1]` on any axis, or non-finite, yields the fill value.
#[derive(Debug, Clone, Copy, Default)]
pub struct KernelInterpolator;

impl GridInterpolator for KernelInterpolator {
    fn sample(
        &self,
        grid: ArrayViewD<'_, f64>,
        coords: ArrayView2<'_, f64>,
        order: InterpolationOrder,
        fill_value: f64,
    ) -> Result<Vec<f64>> {
        let ndim = grid.ndim();
        if coords.nrows() != ndim {
            return Err(ReprojectError::interpolation(format!(
                "got {} coordinate arrays for a grid of rank {}",
                coords.nrows(),
                ndim
            )));
        }

        let shape = grid.shape().to_vec();
        let npoints = coords.ncols();
        let mut values = Vec::with_capacity(npoints);

        let mut taps: Vec<Vec<(usize, f64)>> = vec![Vec::with_capacity(order.support()); ndim];
        let mut index = vec![0usize; ndim];

        for p in 0..npoints {
            let mut inside = true;
            for (axis, axis_taps) in taps.iter_mut().enumerate() {
                let c = coords[[axis, p]];
                let n = shape[axis];
                if !c.is_finite() || n == 0 || c < 0.0 || c > (n - 1) as f64 {
                    inside = false;
                    break;
                }
                kernel_taps(c, n, order, axis_taps);
            }

            if inside {
                values.push(combine(&grid, &taps, &mut index, 0));
            } else {
                values.push(fill_value);
            }
        }

        Ok(values)
    }
}

/// Fill `taps` with (index, weight) pairs for coordinate `c` on an axis of
/// length `n`. `c` must lie in `[0, n - 1]`.
fn kernel_taps(c: f64, n: usize, order: InterpolationOrder, taps: &mut Vec<(usize, f64)>) {
    taps.clear();
    let last = n - 1;

    match order {
        InterpolationOrder::NearestNeighbor => {
            taps.push(((c.round() as usize).min(last), 1.0));
        }
        InterpolationOrder::Bilinear => {
            let i0 = c.floor() as usize;
            if i0 >= last {
                taps.push((last, 1.0));
            } else {
                let t = c - i0 as f64;
                taps.push((i0, 1.0 - t));
                taps.push((i0 + 1, t));
            }
        }
        InterpolationOrder::Bicubic => {
            let i0 = c.floor() as usize;
            let t = c - i0 as f64;
            let weights = catmull_rom_weights(t);
            for (k, w) in weights.into_iter().enumerate() {
                let i = (i0 as isize + k as isize - 1).clamp(0, last as isize) as usize;
                taps.push((i, w));
            }
        }
    }
}

/// Catmull-Rom weights for the taps at offsets -1, 0, 1, 2.
fn catmull_rom_weights(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        -0.5 * t3 + t2 - 0.5 * t,
        1.5 * t3 - 2.5 * t2 + 1.0,
        -1.5 * t3 + 2.0 * t2 + 0.5 * t,
        0.5 * t3 - 0.5 * t2,
    ]
}

/// Weighted sum over the taps of axes `axis..`, innermost axis first.
///
/// Zero-weight taps are skipped so non-finite samples only reach outputs
/// that actually depend on them.
fn combine(
    grid: &ArrayViewD<'_, f64>,
    taps: &[Vec<(usize, f64)>],
    index: &mut Vec<usize>,
    axis: usize,
) -> f64 {
    if axis == taps.len() {
        return grid[index.as_slice()];
    }

    let mut sum = 0.0;
    for &(i, w) in &taps[axis] {
        if w == 0.0 {
            continue;
        }
        index[axis] = i;
        sum += w * combine(grid, taps, index, axis + 1);
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr2, Array, Array2};

    fn sample_points(
        grid: &Array2<f64>,
        points: &[(f64, f64)],
        order: InterpolationOrder,
    ) -> Vec<f64> {
        let coords = Array2::from_shape_fn((2, points.len()), |(axis, p)| {
            if axis == 0 {
                points[p].0
            } else {
                points[p].1
            }
        });
        KernelInterpolator
            .sample(grid.view().into_dyn(), coords.view(), order, f64::NAN)
            .unwrap()
    }

    #[test]
    fn test_nearest() {
        let grid = arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let values = sample_points(
            &grid,
            &[(0.0, 0.0), (1.0, 1.0), (0.4, 0.4), (0.6, 0.6), (1.5, 0.0)],
            InterpolationOrder::NearestNeighbor,
        );
        assert_eq!(values, vec![1.0, 5.0, 1.0, 5.0, 7.0]);
    }

    #[test]
    fn test_bilinear() {
        let grid = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let values = sample_points(
            &grid,
            &[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0), (0.5, 0.5), (0.25, 1.0)],
            InterpolationOrder::Bilinear,
        );
        assert_eq!(values[..4], [1.0, 2.0, 3.0, 4.0]);
        assert!((values[4] - 2.5).abs() < 1e-12);
        assert!((values[5] - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_bicubic_reproduces_nodes_and_lines() {
        let grid = Array::from_shape_fn((5, 5), |(y, x)| 2.0 * y as f64 + x as f64);
        let values = sample_points(
            &grid,
            &[(2.0, 3.0), (1.5, 2.5), (2.25, 1.75)],
            InterpolationOrder::Bicubic,
        );
        assert_eq!(values[0], 7.0);
        assert!((values[1] - 5.5).abs() < 1e-12);
        assert!((values[2] - 6.25).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_bounds_and_non_finite() {
        let grid = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let values = sample_points(
            &grid,
            &[(-0.01, 0.0), (0.0, 1.01), (f64::NAN, 0.0), (0.0, f64::INFINITY)],
            InterpolationOrder::Bilinear,
        );
        assert!(values.iter().all(|v| v.is_nan()));

        let coords = arr2(&[[-1.0], [0.0]]);
        let filled = KernelInterpolator
            .sample(
                grid.view().into_dyn(),
                coords.view(),
                InterpolationOrder::NearestNeighbor,
                -99.0,
            )
            .unwrap();
        assert_eq!(filled, vec![-99.0]);
    }

    #[test]
    fn test_nan_propagates_only_with_weight() {
        let grid = arr2(&[[1.0, f64::NAN], [3.0, 4.0]]);
        let values = sample_points(
            &grid,
            &[(0.0, 0.0), (1.0, 0.5), (0.5, 0.5)],
            InterpolationOrder::Bilinear,
        );
        assert_eq!(values[0], 1.0);
        assert_eq!(values[1], 3.5);
        assert!(values[2].is_nan());
    }

    #[test]
    fn test_three_dimensional() {
        let grid = Array::from_shape_fn((3, 4, 5), |(z, y, x)| {
            100.0 * z as f64 + 10.0 * y as f64 + x as f64
        })
        .into_dyn();
        let coords = arr2(&[[0.5, 2.0], [1.5, 3.0], [2.5, 4.5]]);

        let values = KernelInterpolator
            .sample(grid.view(), coords.view(), InterpolationOrder::Bilinear, f64::NAN)
            .unwrap();
        assert!((values[0] - 67.5).abs() < 1e-12);
        assert!(values[1].is_nan());
    }

    #[test]
    fn test_coordinate_rank_mismatch() {
        let grid = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let coords = arr2(&[[0.0, 1.0]]);
        let result = KernelInterpolator.sample(
            grid.view().into_dyn(),
            coords.view(),
            InterpolationOrder::Bilinear,
            f64::NAN,
        );
        assert!(matches!(result, Err(ReprojectError::Interpolation(_))));
    }
}
