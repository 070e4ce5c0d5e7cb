//! The capability a reprojection needs from a world coordinate system.

use sky_common::{AxisType, CelestialFrame};

/// Indices of the celestial axis pair, in WCS axis order.
///
/// WCS axes are numbered in the opposite order to array axes: WCS axis 0 is
/// the last (fastest varying) array axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CelestialAxes {
    /// WCS index of the longitude axis
    pub lng: usize,
    /// WCS index of the latitude axis
    pub lat: usize,
}

impl CelestialAxes {
    pub fn new(lng: usize, lat: usize) -> Self {
        Self { lng, lat }
    }

    /// Array axis holding longitude for an array of rank `ndim`.
    ///
    /// Returns `None` if the WCS index does not fit in the array.
    pub fn lng_array_axis(&self, ndim: usize) -> Option<usize> {
        wcs_to_array_axis(self.lng, ndim)
    }

    /// Array axis holding latitude for an array of rank `ndim`.
    pub fn lat_array_axis(&self, ndim: usize) -> Option<usize> {
        wcs_to_array_axis(self.lat, ndim)
    }
}

/// Convert a WCS axis index to the matching array axis.
pub fn wcs_to_array_axis(wcs_axis: usize, ndim: usize) -> Option<usize> {
    (wcs_axis < ndim).then(|| ndim - 1 - wcs_axis)
}

/// A world coordinate system whose axes split into one celestial pair plus
/// independent (one-dimensional) axes.
///
/// Pixel coordinates are 0-based: the centre of the first pixel is 0. All
/// angles are in degrees. Mapping never fails loudly: a pixel or world point
/// that has no counterpart (projection singularity, beyond a horizon) maps to
/// non-finite values.
pub trait CoordinateSystem {
    /// Total number of world axes.
    fn naxis(&self) -> usize;

    /// Axis-type tag of each axis, in WCS order.
    fn axis_types(&self) -> Vec<AxisType>;

    /// Where the celestial pair lives.
    fn celestial_axes(&self) -> CelestialAxes;

    /// Reference frame of the celestial world coordinates.
    fn frame(&self) -> CelestialFrame;

    /// Map a pixel position on the celestial pair to (lon, lat).
    fn celestial_pixel_to_world(&self, x: f64, y: f64) -> (f64, f64);

    /// Map (lon, lat) to a pixel position on the celestial pair.
    fn celestial_world_to_pixel(&self, lon: f64, lat: f64) -> (f64, f64);

    /// Map a pixel coordinate along an independent axis to its world value.
    ///
    /// Returns NaN for celestial or unknown axes.
    fn independent_pixel_to_world(&self, axis: usize, pixel: f64) -> f64;

    /// Map a world value along an independent axis to its pixel coordinate.
    fn independent_world_to_pixel(&self, axis: usize, world: f64) -> f64;

    /// WCS index of the spectral axis, if any.
    fn spectral_axis(&self) -> Option<usize> {
        self.axis_types()
            .iter()
            .position(|t| *t == AxisType::Spectral)
    }

    /// Map a full pixel position (WCS order) to world coordinates.
    ///
    /// Missing trailing pixel values are treated as undefined.
    fn pixel_to_world(&self, pixel: &[f64]) -> Vec<f64> {
        let naxis = self.naxis();
        let axes = self.celestial_axes();
        let at = |i: usize| pixel.get(i).copied().unwrap_or(f64::NAN);

        let mut world: Vec<f64> = (0..naxis)
            .map(|i| self.independent_pixel_to_world(i, at(i)))
            .collect();

        let (lon, lat) = self.celestial_pixel_to_world(at(axes.lng), at(axes.lat));
        world[axes.lng] = lon;
        world[axes.lat] = lat;
        world
    }

    /// Map full world coordinates (WCS order) to a pixel position.
    fn world_to_pixel(&self, world: &[f64]) -> Vec<f64> {
        let naxis = self.naxis();
        let axes = self.celestial_axes();
        let at = |i: usize| world.get(i).copied().unwrap_or(f64::NAN);

        let mut pixel: Vec<f64> = (0..naxis)
            .map(|i| self.independent_world_to_pixel(i, at(i)))
            .collect();

        let (x, y) = self.celestial_world_to_pixel(at(axes.lng), at(axes.lat));
        pixel[axes.lng] = x;
        pixel[axes.lat] = y;
        pixel
    }
}
