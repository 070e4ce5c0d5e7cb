//! Zenithal (azimuthal) projections.
//!
//! Zenithal projections map the sphere onto a plane tangent at the reference
//! point. The native pole sits at the reference point, so the fiducial point is
//! (phi0, theta0) = (0, 90) and the projection plane coordinates depend only on
//! the native colatitude through R(theta):
//!
//! - x = R(theta) sin(phi)
//! - y = -R(theta) cos(phi)
//!
//! Two members of the family are implemented:
//! - TAN (gnomonic): R = (180/pi) cot(theta), defined for theta > 0
//! - SIN (orthographic, no obliquity terms): R = (180/pi) cos(theta), defined
//!   for theta >= 0
//!
//! All angles are in degrees, plane coordinates in "projected degrees".
//!
//! Reference: Calabretta & Greisen (2002), A&A 395, 1077, section 5.1.

use std::f64::consts::PI;

const R2D: f64 = 180.0 / PI;

/// Which zenithal projection to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zenithal {
    /// Gnomonic projection
    Tan,
    /// Orthographic projection
    Sin,
}

impl Zenithal {
    /// Project native spherical coordinates onto the plane.
    ///
    /// Returns NaN for points outside the projection's domain (behind the
    /// horizon).
    pub fn native_to_plane(&self, phi: f64, theta: f64) -> (f64, f64) {
        let r = match self {
            Zenithal::Tan => {
                if theta <= 0.0 {
                    return (f64::NAN, f64::NAN);
                }
                // cot(theta) as tan of the colatitude, exact near the pole
                R2D * (90.0 - theta).to_radians().tan()
            }
            Zenithal::Sin => {
                if theta < 0.0 {
                    return (f64::NAN, f64::NAN);
                }
                R2D * (90.0 - theta).to_radians().sin()
            }
        };

        let (sin_phi, cos_phi) = phi.to_radians().sin_cos();
        (r * sin_phi, -r * cos_phi)
    }

    /// Deproject plane coordinates back to native spherical coordinates.
    ///
    /// Returns (phi, theta) in degrees, NaN where the plane point has no
    /// counterpart on the sphere.
    pub fn plane_to_native(&self, x: f64, y: f64) -> (f64, f64) {
        let r = x.hypot(y);

        // At the reference point phi is undefined; pick 0 like wcslib
        let phi = if r == 0.0 {
            0.0
        } else {
            x.atan2(-y).to_degrees()
        };

        let theta = match self {
            Zenithal::Tan => R2D.atan2(r).to_degrees(),
            Zenithal::Sin => {
                let w = r / R2D;
                if w > 1.0 {
                    return (f64::NAN, f64::NAN);
                }
                ((1.0 - w) * (1.0 + w)).sqrt().atan2(w).to_degrees()
            }
        };

        (phi, theta)
    }
}
