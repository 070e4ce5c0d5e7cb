//! Spherical rotation between native and celestial coordinates.
//!
//! Every celestial projection first produces native spherical coordinates
//! (phi, theta); a rotation defined by the celestial coordinates of the native
//! pole (alpha_p, delta_p) and the native longitude of the celestial pole
//! (phi_p, i.e. LONPOLE) carries them to celestial (alpha, delta).
//!
//! Reference: Calabretta & Greisen (2002), A&A 395, 1077, section 2.

use crate::cylindrical::normalize_phi;
use crate::error::{ProjectionError, Result};

const POLE_TOLERANCE: f64 = 1e-10;

/// Rotation from native spherical to celestial coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalRotation {
    /// Celestial longitude of the native pole (degrees)
    pub alpha_p: f64,
    /// Celestial latitude of the native pole (degrees)
    pub delta_p: f64,
    /// Native longitude of the celestial pole (degrees)
    pub phi_p: f64,
}

impl SphericalRotation {
    /// Build the rotation for a projection whose fiducial point (phi0, theta0)
    /// sits at celestial (alpha0, delta0).
    ///
    /// # Arguments
    /// * `alpha0`, `delta0` - Celestial coordinates of the reference point (CRVAL)
    /// * `phi0`, `theta0` - Native coordinates of the fiducial point
    /// * `lonpole` - LONPOLE, or `None` for the default
    /// * `latpole` - LATPOLE, or `None` for the default of 90
    pub fn new(
        alpha0: f64,
        delta0: f64,
        phi0: f64,
        theta0: f64,
        lonpole: Option<f64>,
        latpole: Option<f64>,
    ) -> Result<Self> {
        let phi_p = lonpole.unwrap_or(if delta0 >= theta0 { 0.0 } else { 180.0 });
        let latpole = latpole.unwrap_or(90.0);

        if (theta0 - 90.0).abs() < POLE_TOLERANCE {
            // Zenithal: native pole is the reference point
            return Ok(Self {
                alpha_p: alpha0,
                delta_p: snap_pole(delta0),
                phi_p,
            });
        }

        let dphi = (phi_p - phi0).to_radians();
        let (sin_theta0, cos_theta0) = theta0.to_radians().sin_cos();
        let sin_delta0 = delta0.to_radians().sin();

        let denom = (1.0 - cos_theta0 * cos_theta0 * dphi.sin() * dphi.sin()).sqrt();
        let ratio = sin_delta0 / denom;
        if !ratio.is_finite() || ratio.abs() > 1.0 + POLE_TOLERANCE {
            return Err(ProjectionError::invalid_header(
                "LONPOLE",
                format!("no valid native pole for CRVAL2 = {}", delta0),
            ));
        }

        let a = sin_theta0.atan2(cos_theta0 * dphi.cos()).to_degrees();
        let b = ratio.clamp(-1.0, 1.0).acos().to_degrees();

        let valid = |d: f64| d >= -90.0 - POLE_TOLERANCE && d <= 90.0 + POLE_TOLERANCE;
        let delta_p = match (valid(a + b), valid(a - b)) {
            (true, true) => {
                if (a + b - latpole).abs() <= (a - b - latpole).abs() {
                    a + b
                } else {
                    a - b
                }
            }
            (true, false) => a + b,
            (false, true) => a - b,
            (false, false) => {
                return Err(ProjectionError::invalid_header(
                    "LATPOLE",
                    format!("native pole latitude out of range for CRVAL2 = {}", delta0),
                ))
            }
        }
        .clamp(-90.0, 90.0);
        let delta_p = snap_pole(delta_p);

        let alpha_p = if (delta0.abs() - 90.0).abs() < POLE_TOLERANCE {
            alpha0
        } else if (delta_p - 90.0).abs() < POLE_TOLERANCE {
            alpha0 + phi_p - phi0 - 180.0
        } else if (delta_p + 90.0).abs() < POLE_TOLERANCE {
            alpha0 - phi_p + phi0
        } else {
            let (sin_dp, cos_dp) = delta_p.to_radians().sin_cos();
            let cos_d0 = delta0.to_radians().cos();
            let s = dphi.sin() * cos_theta0 / cos_d0;
            let c = (sin_theta0 - sin_dp * sin_delta0) / (cos_dp * cos_d0);
            alpha0 - s.atan2(c).to_degrees()
        };

        Ok(Self {
            alpha_p,
            delta_p,
            phi_p,
        })
    }

    /// Rotate native (phi, theta) to celestial (alpha, delta), all in degrees.
    ///
    /// Longitudes are returned in [0, 360).
    pub fn native_to_celestial(&self, phi: f64, theta: f64) -> (f64, f64) {
        // Poles coincide: a plain shift in longitude
        if self.delta_p == 90.0 {
            return (normalize_lon(self.alpha_p + phi - self.phi_p - 180.0), theta);
        }
        if self.delta_p == -90.0 {
            return (normalize_lon(self.alpha_p - phi + self.phi_p), -theta);
        }

        let (sin_t, cos_t) = theta.to_radians().sin_cos();
        let (sin_dp, cos_dp) = self.delta_p.to_radians().sin_cos();
        let (sin_dphi, cos_dphi) = (phi - self.phi_p).to_radians().sin_cos();

        let y = -cos_t * sin_dphi;
        let x = sin_t * cos_dp - cos_t * sin_dp * cos_dphi;
        let alpha = self.alpha_p + y.atan2(x).to_degrees();

        // atan2 keeps full precision near the poles where asin does not
        let z = sin_t * sin_dp + cos_t * cos_dp * cos_dphi;
        let delta = z.atan2(x.hypot(y)).to_degrees();

        (normalize_lon(alpha), delta)
    }

    /// Rotate celestial (alpha, delta) to native (phi, theta), all in degrees.
    ///
    /// Native longitudes are returned in (-180, 180].
    pub fn celestial_to_native(&self, alpha: f64, delta: f64) -> (f64, f64) {
        if self.delta_p == 90.0 {
            return (normalize_phi(self.phi_p + alpha - self.alpha_p + 180.0), delta);
        }
        if self.delta_p == -90.0 {
            return (normalize_phi(self.phi_p + self.alpha_p - alpha), -delta);
        }

        let (sin_d, cos_d) = delta.to_radians().sin_cos();
        let (sin_dp, cos_dp) = self.delta_p.to_radians().sin_cos();
        let (sin_da, cos_da) = (alpha - self.alpha_p).to_radians().sin_cos();

        let y = -cos_d * sin_da;
        let x = sin_d * cos_dp - cos_d * sin_dp * cos_da;
        let phi = self.phi_p + y.atan2(x).to_degrees();

        let z = sin_d * sin_dp + cos_d * cos_dp * cos_da;
        let theta = z.atan2(x.hypot(y)).to_degrees();

        (normalize_phi(phi), theta)
    }
}

/// Pin native pole latitudes within tolerance of a pole to exactly +-90.
fn snap_pole(delta_p: f64) -> f64 {
    if (delta_p - 90.0).abs() < POLE_TOLERANCE {
        90.0
    } else if (delta_p + 90.0).abs() < POLE_TOLERANCE {
        -90.0
    } else {
        delta_p
    }
}

/// Wrap a celestial longitude into [0, 360).
pub fn normalize_lon(lon: f64) -> f64 {
    let l = lon.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if l >= 360.0 {
        0.0
    } else {
        l
    }
}
