//! Conversion between HEALPix maps and projected images.
//!
//! HEALPix maps are flat arrays of `12 * nside^2` values in either RING or
//! NESTED pixel order. Indexing and angular interpolation come from
//! `cdshealpix`, which works in NESTED order with angles in radians.

use cdshealpix::nested::{self, Layer};
use ndarray::{Array2, ArrayD, ArrayView1, ArrayView2, IxDyn};
use projection::{CoordinateSystem, FrameConverter, RotationFrameConverter};
use serde::{Deserialize, Serialize};
use sky_common::CelestialFrame;
use std::f64::consts::FRAC_PI_2;
use tracing::debug;

use crate::error::{ReprojectError, Result};
use crate::interpolation::{EdgeCorrectedInterpolator, GridInterpolator, KernelInterpolator};
use crate::types::{InterpolationOrder, ReprojectOutput};

/// How HEALPix values are sampled at an arbitrary position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealpixInterpolation {
    /// Value of the HEALPix pixel containing the position
    Nearest,
    /// Bilinear interpolation over the four surrounding pixel centres
    #[default]
    Bilinear,
}

/// Nested layer for `nside`, which must be a power of two.
fn layer(nside: u32) -> Result<&'static Layer> {
    if nside == 0 || !cdshealpix::is_nside(nside) {
        return Err(ReprojectError::healpix(format!(
            "nside {} is not a power of two in [1, 2^29]",
            nside
        )));
    }
    Ok(nested::get(cdshealpix::depth(nside)))
}

/// Number of pixels in a HEALPix map of the given nside.
pub fn nside_to_npix(nside: u32) -> Result<usize> {
    Ok(layer(nside)?.n_hash() as usize)
}

/// Recover nside from the length of a HEALPix map.
pub fn npix_to_nside(npix: usize) -> Result<u32> {
    let nside = ((npix / 12) as f64).sqrt().round() as u32;
    if nside == 0 || 12 * (nside as usize) * (nside as usize) != npix {
        return Err(ReprojectError::healpix(format!(
            "{} is not a valid HEALPix map length",
            npix
        )));
    }
    layer(nside)?;
    Ok(nside)
}

/// Convert a NESTED hash to the index used by the map.
fn map_index(layer: &Layer, hash: u64, nest: bool) -> usize {
    if nest {
        hash as usize
    } else {
        layer.to_ring(hash) as usize
    }
}

/// Resample a HEALPix map onto a projected image.
///
/// Every output pixel centre is mapped to the world through `cs_out`,
/// converted from `cs_out`'s frame into `frame_in` and looked up in the map.
/// Pixels without a world position are NaN with footprint 0.
///
/// # Arguments
/// * `healpix_data` - Map values, RING or NESTED order depending on `nest`
/// * `frame_in` - Celestial frame of the map
/// * `cs_out` - Coordinate system of the output image (two axes)
/// * `shape_out` - Output image shape
/// * `interp` - Nearest pixel or bilinear sampling
/// * `nest` - Whether the map is in NESTED order
pub fn healpix_to_image(
    healpix_data: ArrayView1<'_, f64>,
    frame_in: CelestialFrame,
    cs_out: &dyn CoordinateSystem,
    shape_out: (usize, usize),
    interp: HealpixInterpolation,
    nest: bool,
) -> Result<ReprojectOutput> {
    let nside = npix_to_nside(healpix_data.len())?;
    let layer = layer(nside)?;
    let axes = celestial_image_axes(cs_out)?;

    debug!(nside, ?interp, nest, shape = ?shape_out, "Sampling HEALPix map onto image");

    let frames = RotationFrameConverter::new();
    let (ny, nx) = shape_out;
    let mut lon = Vec::with_capacity(ny * nx);
    let mut lat = Vec::with_capacity(ny * nx);
    for row in 0..ny {
        for col in 0..nx {
            let (x, y) = axes.pixel_xy(row, col);
            let (l, b) = cs_out.celestial_pixel_to_world(x, y);
            lon.push(l);
            lat.push(b);
        }
    }
    let (lon, lat) = frames.convert_all(&lon, &lat, cs_out.frame(), frame_in);

    let values: Vec<f64> = lon
        .iter()
        .zip(&lat)
        .map(|(&l, &b)| {
            if !l.is_finite() || !b.is_finite() {
                return f64::NAN;
            }
            let (l, b) = (l.to_radians(), b.to_radians().clamp(-FRAC_PI_2, FRAC_PI_2));
            match interp {
                HealpixInterpolation::Nearest => {
                    healpix_data[map_index(layer, layer.hash(l, b), nest)]
                }
                HealpixInterpolation::Bilinear => layer
                    .bilinear_interpolation(l, b)
                    .iter()
                    .filter(|(_, w)| *w != 0.0)
                    .map(|&(hash, w)| w * healpix_data[map_index(layer, hash, nest)])
                    .sum(),
            }
        })
        .collect();

    let array = ArrayD::from_shape_vec(IxDyn(&[ny, nx]), values)?;
    Ok(ReprojectOutput::from_array(array))
}

/// Sample a projected image at every HEALPix pixel centre.
///
/// Pixel centres are converted from `frame_out` into `cs_in`'s frame and
/// sampled with half-pixel edge handling. Centres outside the image are NaN.
///
/// # Arguments
/// * `data` - 2-D input image
/// * `cs_in` - Coordinate system of the image (two axes)
/// * `frame_out` - Celestial frame of the map to produce
/// * `nside` - Resolution of the map, a power of two
/// * `order` - Interpolation order used on the image
/// * `nest` - Produce the map in NESTED rather than RING order
pub fn image_to_healpix(
    data: ArrayView2<'_, f64>,
    cs_in: &dyn CoordinateSystem,
    frame_out: CelestialFrame,
    nside: u32,
    order: InterpolationOrder,
    nest: bool,
) -> Result<Vec<f64>> {
    let layer = layer(nside)?;
    let axes = celestial_image_axes(cs_in)?;
    let npix = layer.n_hash() as usize;

    debug!(nside, npix, %order, nest, "Sampling image at HEALPix centres");

    let mut lon = Vec::with_capacity(npix);
    let mut lat = Vec::with_capacity(npix);
    for index in 0..npix as u64 {
        let hash = if nest { index } else { layer.from_ring(index) };
        let (l, b) = layer.center(hash);
        lon.push(l.to_degrees());
        lat.push(b.to_degrees());
    }

    let frames = RotationFrameConverter::new();
    let (lon, lat) = frames.convert_all(&lon, &lat, frame_out, cs_in.frame());

    let mut coords = Array2::from_elem((2, npix), f64::NAN);
    for (p, (&l, &b)) in lon.iter().zip(&lat).enumerate() {
        let (x, y) = cs_in.celestial_world_to_pixel(l, b);
        let (row, col) = axes.array_rc(x, y);
        coords[[0, p]] = row;
        coords[[1, p]] = col;
    }

    EdgeCorrectedInterpolator::new(KernelInterpolator).sample(
        data.into_dyn(),
        coords.view(),
        order,
        f64::NAN,
    )
}

/// Placement of the celestial pair in a 2-D image.
#[derive(Debug, Clone, Copy)]
struct ImageAxes {
    /// Longitude runs along array columns
    lng_is_column: bool,
}

impl ImageAxes {
    /// Celestial (x, y) pixel of array element (row, col).
    fn pixel_xy(&self, row: usize, col: usize) -> (f64, f64) {
        if self.lng_is_column {
            (col as f64, row as f64)
        } else {
            (row as f64, col as f64)
        }
    }

    /// Array (row, col) of celestial pixel (x, y).
    fn array_rc(&self, x: f64, y: f64) -> (f64, f64) {
        if self.lng_is_column {
            (y, x)
        } else {
            (x, y)
        }
    }
}

fn celestial_image_axes(cs: &dyn CoordinateSystem) -> Result<ImageAxes> {
    if cs.naxis() != 2 {
        return Err(ReprojectError::invalid_coordinate_system(format!(
            "HEALPix conversion needs a 2-axis celestial system, got {} axes",
            cs.naxis()
        )));
    }
    Ok(ImageAxes {
        lng_is_column: cs.celestial_axes().lng == 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nside_validation() {
        assert_eq!(nside_to_npix(1).unwrap(), 12);
        assert_eq!(nside_to_npix(4).unwrap(), 192);
        assert!(matches!(nside_to_npix(0), Err(ReprojectError::Healpix(_))));
        assert!(matches!(nside_to_npix(3), Err(ReprojectError::Healpix(_))));
    }

    #[test]
    fn test_npix_to_nside() {
        assert_eq!(npix_to_nside(12).unwrap(), 1);
        assert_eq!(npix_to_nside(768).unwrap(), 8);
        assert!(npix_to_nside(0).is_err());
        assert!(npix_to_nside(100).is_err());
        // 12 * 3^2 is a square map length but not a power-of-two nside
        assert!(npix_to_nside(108).is_err());
    }

    #[test]
    fn test_ring_nested_indices_agree() {
        let layer = layer(4).unwrap();
        let mut seen = vec![false; 192];
        for hash in 0..192u64 {
            let ring = map_index(layer, hash, false);
            assert!(!seen[ring]);
            seen[ring] = true;
            assert_eq!(layer.from_ring(ring as u64), hash);
        }
    }
}
