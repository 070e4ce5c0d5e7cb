//! Pixel-coordinate lookup: where each output pixel falls in the input grid.
//!
//! Output pixel indices go through the output system's pixel-to-world
//! mapping, a frame conversion into the input system's frame, and the input
//! system's world-to-pixel mapping. Pixels that cannot be mapped come out as
//! NaN coordinates, which the interpolators turn into the fill value.

use ndarray::Array2;
use projection::{CoordinateSystem, FrameConverter};

use crate::error::{ReprojectError, Result};

/// Input pixel coordinates for every pixel of a celestial output plane.
///
/// The plane has shape `(n_lat, n_lng)`, latitude along rows. The result has
/// two rows (input latitude pixel, input longitude pixel) and one column per
/// output pixel in row-major order.
pub fn celestial_pixel_map<F: FrameConverter + ?Sized>(
    cs_in: &dyn CoordinateSystem,
    cs_out: &dyn CoordinateSystem,
    frames: &F,
    plane: (usize, usize),
) -> Array2<f64> {
    let (n_lat, n_lng) = plane;
    let n = n_lat * n_lng;

    let mut lon = Vec::with_capacity(n);
    let mut lat = Vec::with_capacity(n);
    for row in 0..n_lat {
        for col in 0..n_lng {
            let (l, b) = cs_out.celestial_pixel_to_world(col as f64, row as f64);
            lon.push(l);
            lat.push(b);
        }
    }

    let (lon, lat) = frames.convert_all(&lon, &lat, cs_out.frame(), cs_in.frame());

    let mut coords = Array2::from_elem((2, n), f64::NAN);
    for (p, (&l, &b)) in lon.iter().zip(&lat).enumerate() {
        let (x, y) = cs_in.celestial_world_to_pixel(l, b);
        coords[[0, p]] = y;
        coords[[1, p]] = x;
    }
    coords
}

/// Input pixel coordinates for every pixel of a 3-D output volume.
///
/// Both systems must have exactly three axes: the celestial pair plus one
/// spectral axis. The celestial pair goes through the frame conversion; the
/// spectral axis is mapped on its own through its linear sub-mapping. The
/// result has one row per input array axis and one column per output pixel
/// in row-major order.
pub fn volume_pixel_map<F: FrameConverter + ?Sized>(
    cs_in: &dyn CoordinateSystem,
    cs_out: &dyn CoordinateSystem,
    frames: &F,
    shape_out: &[usize],
) -> Result<Array2<f64>> {
    if shape_out.len() != 3 || cs_in.naxis() != 3 || cs_out.naxis() != 3 {
        return Err(ReprojectError::unsupported_dimensionality(format!(
            "whole-volume resampling needs three axes on both sides, got output shape {:?}, \
             input naxis {}, output naxis {}",
            shape_out,
            cs_in.naxis(),
            cs_out.naxis()
        )));
    }

    let spec_in = cs_in.spectral_axis().ok_or_else(|| {
        ReprojectError::invalid_coordinate_system("input coordinate system has no spectral axis")
    })?;
    let spec_out = cs_out.spectral_axis().ok_or_else(|| {
        ReprojectError::invalid_coordinate_system("output coordinate system has no spectral axis")
    })?;
    let axes_in = cs_in.celestial_axes();
    let axes_out = cs_out.celestial_axes();

    // Spectral pixel in the input for each output channel
    let n_spec = shape_out[2 - spec_out];
    let spectral: Vec<f64> = (0..n_spec)
        .map(|k| {
            let world = cs_out.independent_pixel_to_world(spec_out, k as f64);
            cs_in.independent_world_to_pixel(spec_in, world)
        })
        .collect();

    let n: usize = shape_out.iter().product();
    let mut lon = Vec::with_capacity(n);
    let mut lat = Vec::with_capacity(n);
    let mut channels = Vec::with_capacity(n);

    let mut pixel = [0.0f64; 3];
    for a0 in 0..shape_out[0] {
        for a1 in 0..shape_out[1] {
            for a2 in 0..shape_out[2] {
                // WCS axis w is array axis 2 - w
                pixel[2] = a0 as f64;
                pixel[1] = a1 as f64;
                pixel[0] = a2 as f64;

                let (l, b) = cs_out.celestial_pixel_to_world(pixel[axes_out.lng], pixel[axes_out.lat]);
                lon.push(l);
                lat.push(b);
                channels.push(spectral[pixel[spec_out] as usize]);
            }
        }
    }

    let (lon, lat) = frames.convert_all(&lon, &lat, cs_out.frame(), cs_in.frame());

    let mut coords = Array2::from_elem((3, n), f64::NAN);
    for p in 0..n {
        let (x, y) = cs_in.celestial_world_to_pixel(lon[p], lat[p]);
        let mut input = [0.0f64; 3];
        input[axes_in.lng] = x;
        input[axes_in.lat] = y;
        input[spec_in] = channels[p];

        for (wcs_axis, &value) in input.iter().enumerate() {
            coords[[2 - wcs_axis, p]] = value;
        }
    }

    Ok(coords)
}
