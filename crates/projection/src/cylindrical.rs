//! Plate carrée (CAR) cylindrical projection.
//!
//! The simplest cylindrical projection: native longitude and latitude map
//! directly onto plane coordinates. The fiducial point is (phi0, theta0) = (0, 0),
//! which puts the reference point on the native equator.

/// Plate carrée projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlateCarree;

impl PlateCarree {
    /// Project native spherical coordinates (degrees) onto the plane.
    pub fn native_to_plane(&self, phi: f64, theta: f64) -> (f64, f64) {
        (normalize_phi(phi), theta)
    }

    /// Deproject plane coordinates back to native spherical coordinates.
    ///
    /// Latitudes beyond the poles are undefined and come back as NaN.
    pub fn plane_to_native(&self, x: f64, y: f64) -> (f64, f64) {
        if y.abs() > 90.0 {
            return (f64::NAN, f64::NAN);
        }
        (x, y)
    }
}

/// Wrap a native longitude into (-180, 180].
pub(crate) fn normalize_phi(phi: f64) -> f64 {
    let mut p = phi % 360.0;
    if p > 180.0 {
        p -= 360.0;
    } else if p <= -180.0 {
        p += 360.0;
    }
    p
}
