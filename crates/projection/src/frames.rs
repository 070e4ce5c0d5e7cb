//! Conversion of (lon, lat) between celestial reference frames.
//!
//! All supported frames are related by fixed rotations, so every conversion
//! goes through ICRS: `v_to = M_to * M_from^T * v_from`, where `M_f` rotates
//! ICRS unit vectors into frame `f`.

use nalgebra::{Matrix3, Vector3};
use sky_common::CelestialFrame;

use crate::rotation::normalize_lon;

const ARCSEC: f64 = 1.0 / 3600.0;

/// ICRS to Galactic rotation (Hipparcos, ESA 1997 vol. 1 section 1.5.3).
const ICRS_TO_GALACTIC: [[f64; 3]; 3] = [
    [-0.054875560416215368, -0.873437090234885049, -0.483835015548713227],
    [0.494109427875583674, -0.444829629960011178, 0.746982244497218891],
    [-0.867666149019004701, -0.198076373431201528, 0.455983776175066922],
];

/// Frame bias offsets of the J2000 mean equator and equinox (IERS 2003), arcsec.
const BIAS_XI0: f64 = -0.0166170;
const BIAS_ETA0: f64 = -0.0068192;
const BIAS_DA0: f64 = -0.0146;

/// Mean obliquity of the ecliptic at J2000, degrees.
const OBLIQUITY_J2000: f64 = 23.0 + 26.0 / 60.0 + 21.41136 / 3600.0;

/// Maps celestial coordinates between named reference frames.
///
/// Angles are in degrees. Non-finite input yields non-finite output.
pub trait FrameConverter {
    fn convert(
        &self,
        lon: f64,
        lat: f64,
        from: CelestialFrame,
        to: CelestialFrame,
    ) -> (f64, f64);

    /// Convert paired coordinate slices element by element.
    fn convert_all(
        &self,
        lon: &[f64],
        lat: &[f64],
        from: CelestialFrame,
        to: CelestialFrame,
    ) -> (Vec<f64>, Vec<f64>) {
        if from == to {
            return (lon.to_vec(), lat.to_vec());
        }
        lon.iter()
            .zip(lat)
            .map(|(&l, &b)| self.convert(l, b, from, to))
            .unzip()
    }
}

/// Frame converter built from fixed rotation matrices.
#[derive(Debug, Clone)]
pub struct RotationFrameConverter {
    icrs_to_fk5: Matrix3<f64>,
    icrs_to_galactic: Matrix3<f64>,
    icrs_to_ecliptic: Matrix3<f64>,
}

impl Default for RotationFrameConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationFrameConverter {
    pub fn new() -> Self {
        let g = ICRS_TO_GALACTIC;
        let icrs_to_galactic = Matrix3::new(
            g[0][0], g[0][1], g[0][2], g[1][0], g[1][1], g[1][2], g[2][0], g[2][1], g[2][2],
        );

        let bias = rot_x(-BIAS_ETA0 * ARCSEC) * rot_y(BIAS_XI0 * ARCSEC) * rot_z(BIAS_DA0 * ARCSEC);
        let icrs_to_ecliptic = rot_x(OBLIQUITY_J2000) * bias;

        Self {
            icrs_to_fk5: bias,
            icrs_to_galactic,
            icrs_to_ecliptic,
        }
    }

    /// Rotation carrying ICRS unit vectors into `frame`.
    pub fn from_icrs(&self, frame: CelestialFrame) -> Matrix3<f64> {
        match frame {
            CelestialFrame::Icrs => Matrix3::identity(),
            CelestialFrame::Fk5 => self.icrs_to_fk5,
            CelestialFrame::Galactic => self.icrs_to_galactic,
            CelestialFrame::Ecliptic => self.icrs_to_ecliptic,
        }
    }
}

impl FrameConverter for RotationFrameConverter {
    fn convert(
        &self,
        lon: f64,
        lat: f64,
        from: CelestialFrame,
        to: CelestialFrame,
    ) -> (f64, f64) {
        if !lon.is_finite() || !lat.is_finite() {
            return (f64::NAN, f64::NAN);
        }
        if from == to {
            return (lon, lat);
        }

        let v = to_unit_vector(lon, lat);
        let icrs = self.from_icrs(from).transpose() * v;
        from_unit_vector(self.from_icrs(to) * icrs)
    }
}

/// Passive rotation about the x axis by `deg` degrees.
fn rot_x(deg: f64) -> Matrix3<f64> {
    let (s, c) = deg.to_radians().sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

fn rot_y(deg: f64) -> Matrix3<f64> {
    let (s, c) = deg.to_radians().sin_cos();
    Matrix3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c)
}

fn rot_z(deg: f64) -> Matrix3<f64> {
    let (s, c) = deg.to_radians().sin_cos();
    Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
}

fn to_unit_vector(lon: f64, lat: f64) -> Vector3<f64> {
    let (sin_l, cos_l) = lon.to_radians().sin_cos();
    let (sin_b, cos_b) = lat.to_radians().sin_cos();
    Vector3::new(cos_b * cos_l, cos_b * sin_l, sin_b)
}

fn from_unit_vector(v: Vector3<f64>) -> (f64, f64) {
    let lon = v.y.atan2(v.x).to_degrees();
    let lat = v.z.atan2(v.x.hypot(v.y)).to_degrees();
    (normalize_lon(lon), lat)
}
