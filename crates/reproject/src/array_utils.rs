//! Zero-copy iteration over the celestial slices of N-D arrays.
//!
//! An array with a celestial pair and any number of other axes is viewed as a
//! stack of 2-D (latitude, longitude) planes. The input and output arrays are
//! walked in lockstep so that each output plane can be filled from the
//! matching input plane. Output planes are mutable views into the caller's
//! buffer, so writes land in place.

use ndarray::{ArrayViewD, ArrayViewMutD, Axis};
use projection::CelestialAxes;

use crate::error::{ReprojectError, Result};

/// Axis permutation that moves the celestial pair to the end of an array of
/// rank `ndim`, as (latitude, longitude), keeping other axes in order.
pub fn celestial_permutation(ndim: usize, axes: CelestialAxes) -> Result<Vec<usize>> {
    let (lng, lat) = match (axes.lng_array_axis(ndim), axes.lat_array_axis(ndim)) {
        (Some(lng), Some(lat)) if lng != lat => (lng, lat),
        _ => {
            return Err(ReprojectError::shape_mismatch(format!(
                "celestial axes (lng={}, lat={}) do not fit an array of rank {}",
                axes.lng, axes.lat, ndim
            )))
        }
    };

    let mut perm: Vec<usize> = (0..ndim).filter(|&i| i != lng && i != lat).collect();
    perm.push(lat);
    perm.push(lng);
    Ok(perm)
}

/// View `array` with its celestial pair trailing, as (latitude, longitude).
pub fn move_celestial_to_end<A>(
    array: ArrayViewD<'_, A>,
    axes: CelestialAxes,
) -> Result<ArrayViewD<'_, A>> {
    let perm = celestial_permutation(array.ndim(), axes)?;
    Ok(array.permuted_axes(perm))
}

/// Lazily yields paired (input, output) celestial planes.
///
/// Both sides are walked in row-major order over their leading axes, so plane
/// `i` of the input matches plane `i` of the output even when the leading
/// axes are shaped differently, as long as their total counts agree.
pub struct CelestialSlices<'a, A, B> {
    input: ArrayViewD<'a, A>,
    leading: Vec<usize>,
    pending: Vec<ArrayViewMutD<'a, B>>,
    next_index: usize,
    count: usize,
}

/// Pair up the celestial planes of `input` and `output`.
///
/// `axes` locates the celestial pair in both arrays, counted from the last
/// axis. Fails with [`ReprojectError::ShapeMismatch`] when the pair does not
/// fit either array or when the number of planes differs.
pub fn iterate_over_celestial_slices<'a, A, B>(
    input: ArrayViewD<'a, A>,
    output: ArrayViewMutD<'a, B>,
    axes: CelestialAxes,
) -> Result<CelestialSlices<'a, A, B>> {
    let input = move_celestial_to_end(input, axes)?;
    let out_perm = celestial_permutation(output.ndim(), axes)?;
    let output = output.permuted_axes(out_perm);

    let leading: Vec<usize> = input.shape()[..input.ndim() - 2].to_vec();
    let count: usize = leading.iter().product();
    let out_count: usize = output.shape()[..output.ndim() - 2].iter().product();

    if count != out_count {
        return Err(ReprojectError::shape_mismatch(format!(
            "input has {} celestial slices {:?}, output has {} {:?}",
            count,
            leading,
            out_count,
            &output.shape()[..output.ndim() - 2]
        )));
    }

    Ok(CelestialSlices {
        input,
        leading,
        pending: vec![output],
        next_index: 0,
        count,
    })
}

impl<'a, A, B> CelestialSlices<'a, A, B> {
    /// Input plane at flat position `index` over the leading axes.
    fn input_plane(&self, index: usize) -> ArrayViewD<'a, A> {
        let mut remaining = index;
        let mut strides = vec![0; self.leading.len()];
        let mut step = 1;
        for (i, &extent) in self.leading.iter().enumerate().rev() {
            strides[i] = step;
            step *= extent;
        }

        let mut view = self.input.clone();
        for stride in strides {
            let idx = remaining / stride;
            remaining %= stride;
            view = view.index_axis_move(Axis(0), idx);
        }
        view
    }

    /// Next output plane, depth-first over the leading axes.
    fn next_output_plane(&mut self) -> Option<ArrayViewMutD<'a, B>> {
        while let Some(view) = self.pending.pop() {
            if view.ndim() == 2 {
                return Some(view);
            }
            if view.len_of(Axis(0)) == 0 {
                continue;
            }

            let (head, tail) = view.split_at(Axis(0), 1);
            if tail.len_of(Axis(0)) > 0 {
                self.pending.push(tail);
            }
            self.pending.push(head.index_axis_move(Axis(0), 0));
        }
        None
    }
}

impl<'a, A, B> Iterator for CelestialSlices<'a, A, B> {
    type Item = (ArrayViewD<'a, A>, ArrayViewMutD<'a, B>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.count {
            return None;
        }
        let output = self.next_output_plane()?;
        let input = self.input_plane(self.next_index);
        self.next_index += 1;
        Some((input, output))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next_index;
        (remaining, Some(remaining))
    }
}

impl<'a, A, B> ExactSizeIterator for CelestialSlices<'a, A, B> {}
