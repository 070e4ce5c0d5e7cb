//! FITS-style world coordinate system.
//!
//! A [`Wcs`] is described by a [`WcsHeader`] that mirrors the FITS WCS keywords
//! (`CTYPEi`, `CRPIXi`, `CDELTi`, `CRVALi`, `RADESYS`, `LONPOLE`, `LATPOLE`
//! and the PC matrix of the celestial pair). Axes are listed in WCS order, so
//! the first header axis is the last array axis.
//!
//! Exactly one longitude and one latitude axis are required; they carry one of
//! the supported celestial projections (TAN, SIN, CAR). Every other axis is
//! linear: `world = CRVAL + CDELT * (pixel + 1 - CRPIX)`.

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};
use sky_common::{AxisType, CelestialFrame};
use tracing::debug;

use crate::coordinate_system::{CelestialAxes, CoordinateSystem};
use crate::cylindrical::PlateCarree;
use crate::error::{ProjectionError, Result};
use crate::rotation::SphericalRotation;
use crate::zenithal::Zenithal;

/// Keywords describing a single world axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisHeader {
    /// Axis type, e.g. "RA---TAN", "GLAT-CAR" or "FREQ"
    pub ctype: String,
    /// Reference pixel (1-based, FITS convention)
    pub crpix: f64,
    /// Increment per pixel at the reference point
    pub cdelt: f64,
    /// World coordinate at the reference pixel
    pub crval: f64,
}

impl AxisHeader {
    pub fn new(ctype: impl Into<String>, crpix: f64, cdelt: f64, crval: f64) -> Self {
        Self {
            ctype: ctype.into(),
            crpix,
            cdelt,
            crval,
        }
    }
}

/// Keywords describing a whole coordinate system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WcsHeader {
    /// Axes in WCS order
    pub axes: Vec<AxisHeader>,
    /// Equatorial reference system (ICRS, FK5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radesys: Option<String>,
    /// Native longitude of the celestial pole (degrees)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lonpole: Option<f64>,
    /// Celestial latitude of the native pole (degrees)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latpole: Option<f64>,
    /// PC matrix of the celestial pair, ordered (longitude, latitude)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pc: Option<[[f64; 2]; 2]>,
}

impl WcsHeader {
    pub fn new(axes: Vec<AxisHeader>) -> Self {
        Self {
            axes,
            radesys: None,
            lonpole: None,
            latpole: None,
            pc: None,
        }
    }

    pub fn with_radesys(mut self, radesys: impl Into<String>) -> Self {
        self.radesys = Some(radesys.into());
        self
    }

    pub fn with_pc(mut self, pc: [[f64; 2]; 2]) -> Self {
        self.pc = Some(pc);
        self
    }
}

/// Celestial projections understood by [`Wcs`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CelestialProjection {
    Zenithal(Zenithal),
    Cylindrical(PlateCarree),
}

impl CelestialProjection {
    /// Look up a projection by its three-letter FITS code.
    pub fn from_code(code: &str) -> Result<Self> {
        match code.to_uppercase().as_str() {
            "TAN" => Ok(Self::Zenithal(Zenithal::Tan)),
            "SIN" => Ok(Self::Zenithal(Zenithal::Sin)),
            "CAR" => Ok(Self::Cylindrical(PlateCarree)),
            _ => Err(ProjectionError::UnsupportedProjection(code.to_string())),
        }
    }

    /// Native coordinates (phi0, theta0) of the fiducial point.
    pub fn fiducial(&self) -> (f64, f64) {
        match self {
            Self::Zenithal(_) => (0.0, 90.0),
            Self::Cylindrical(_) => (0.0, 0.0),
        }
    }

    fn native_to_plane(&self, phi: f64, theta: f64) -> (f64, f64) {
        match self {
            Self::Zenithal(p) => p.native_to_plane(phi, theta),
            Self::Cylindrical(p) => p.native_to_plane(phi, theta),
        }
    }

    fn plane_to_native(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Self::Zenithal(p) => p.plane_to_native(x, y),
            Self::Cylindrical(p) => p.plane_to_native(x, y),
        }
    }
}

/// Projection code of a celestial CTYPE: "RA---TAN" -> "TAN".
fn projection_code(ctype: &str) -> &str {
    ctype.get(5..).map(|s| s.trim_matches('-').trim()).unwrap_or("")
}

/// World coordinate system with one celestial pair and independent linear axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "WcsHeader", into = "WcsHeader")]
pub struct Wcs {
    header: WcsHeader,
    axis_types: Vec<AxisType>,
    axes: CelestialAxes,
    frame: CelestialFrame,
    projection: CelestialProjection,
    rotation: SphericalRotation,
    pc: Matrix2<f64>,
    pc_inv: Matrix2<f64>,
}

impl Wcs {
    /// Build a coordinate system from header keywords.
    pub fn from_header(header: &WcsHeader) -> Result<Self> {
        if header.axes.len() < 2 {
            return Err(ProjectionError::invalid_header(
                "NAXIS",
                format!("need at least 2 axes, got {}", header.axes.len()),
            ));
        }

        let axis_types: Vec<AxisType> = header
            .axes
            .iter()
            .map(|a| AxisType::from_ctype(&a.ctype))
            .collect();

        let lng = unique_axis(&axis_types, AxisType::Longitude, "longitude")?;
        let lat = unique_axis(&axis_types, AxisType::Latitude, "latitude")?;
        if axis_types
            .iter()
            .filter(|t| **t == AxisType::Spectral)
            .count()
            > 1
        {
            return Err(ProjectionError::DuplicateAxis("spectral".to_string()));
        }

        for axis in &header.axes {
            if axis.cdelt == 0.0 || !axis.cdelt.is_finite() {
                return Err(ProjectionError::invalid_header(
                    "CDELT",
                    format!("axis {} has increment {}", axis.ctype, axis.cdelt),
                ));
            }
            if !axis.crpix.is_finite() || !axis.crval.is_finite() {
                return Err(ProjectionError::invalid_header(
                    "CRPIX/CRVAL",
                    format!("axis {} has non-finite reference values", axis.ctype),
                ));
            }
        }

        let lng_header = &header.axes[lng];
        let lat_header = &header.axes[lat];

        let lng_code = projection_code(&lng_header.ctype);
        let lat_code = projection_code(&lat_header.ctype);
        if !lng_code.eq_ignore_ascii_case(lat_code) {
            return Err(ProjectionError::MismatchedProjection(
                lng_code.to_string(),
                lat_code.to_string(),
            ));
        }
        let projection = CelestialProjection::from_code(lng_code)?;

        let radesys = header.radesys.as_deref();
        let frame = CelestialFrame::from_ctype(&lng_header.ctype, radesys).ok_or_else(|| {
            ProjectionError::invalid_header(
                "RADESYS",
                format!("unknown reference system {:?}", header.radesys),
            )
        })?;
        if CelestialFrame::from_ctype(&lat_header.ctype, radesys) != Some(frame) {
            return Err(ProjectionError::invalid_header(
                "CTYPE",
                format!(
                    "{} and {} belong to different frames",
                    lng_header.ctype, lat_header.ctype
                ),
            ));
        }

        let pc = match header.pc {
            Some(m) => Matrix2::new(m[0][0], m[0][1], m[1][0], m[1][1]),
            None => Matrix2::identity(),
        };
        let pc_inv = pc
            .try_inverse()
            .ok_or_else(|| ProjectionError::invalid_header("PC", "matrix is singular"))?;

        let (phi0, theta0) = projection.fiducial();
        let rotation = SphericalRotation::new(
            lng_header.crval,
            lat_header.crval,
            phi0,
            theta0,
            header.lonpole,
            header.latpole,
        )?;

        debug!(
            naxis = header.axes.len(),
            projection = lng_code,
            frame = %frame,
            lng_axis = lng,
            lat_axis = lat,
            "Built world coordinate system"
        );

        Ok(Self {
            header: header.clone(),
            axis_types,
            axes: CelestialAxes::new(lng, lat),
            frame,
            projection,
            rotation,
            pc,
            pc_inv,
        })
    }

    /// Header keywords this system was built from.
    pub fn header(&self) -> &WcsHeader {
        &self.header
    }

    /// Celestial projection in use.
    pub fn projection(&self) -> CelestialProjection {
        self.projection
    }

    /// The two-axis celestial sub-system (other axes dropped, order kept).
    pub fn celestial(&self) -> Wcs {
        let (first, second) = if self.axes.lng < self.axes.lat {
            (self.axes.lng, self.axes.lat)
        } else {
            (self.axes.lat, self.axes.lng)
        };

        let mut header = self.header.clone();
        header.axes = vec![
            self.header.axes[first].clone(),
            self.header.axes[second].clone(),
        ];

        let axes = if self.axes.lng < self.axes.lat {
            CelestialAxes::new(0, 1)
        } else {
            CelestialAxes::new(1, 0)
        };

        Wcs {
            header,
            axis_types: vec![self.axis_types[first], self.axis_types[second]],
            axes,
            ..self.clone()
        }
    }

    fn linear_axis(&self, axis: usize) -> Option<&AxisHeader> {
        if axis == self.axes.lng || axis == self.axes.lat {
            return None;
        }
        self.header.axes.get(axis)
    }
}

impl TryFrom<WcsHeader> for Wcs {
    type Error = ProjectionError;

    fn try_from(header: WcsHeader) -> Result<Self> {
        Wcs::from_header(&header)
    }
}

impl From<Wcs> for WcsHeader {
    fn from(wcs: Wcs) -> Self {
        wcs.header
    }
}

fn unique_axis(types: &[AxisType], wanted: AxisType, name: &'static str) -> Result<usize> {
    let mut found = types
        .iter()
        .enumerate()
        .filter(|(_, t)| **t == wanted)
        .map(|(i, _)| i);

    let first = found
        .next()
        .ok_or(ProjectionError::MissingCelestialAxis(name))?;
    if found.next().is_some() {
        return Err(ProjectionError::DuplicateAxis(name.to_string()));
    }
    Ok(first)
}

impl CoordinateSystem for Wcs {
    fn naxis(&self) -> usize {
        self.header.axes.len()
    }

    fn axis_types(&self) -> Vec<AxisType> {
        self.axis_types.clone()
    }

    fn celestial_axes(&self) -> CelestialAxes {
        self.axes
    }

    fn frame(&self) -> CelestialFrame {
        self.frame
    }

    fn celestial_pixel_to_world(&self, x: f64, y: f64) -> (f64, f64) {
        if !x.is_finite() || !y.is_finite() {
            return (f64::NAN, f64::NAN);
        }

        let lng = &self.header.axes[self.axes.lng];
        let lat = &self.header.axes[self.axes.lat];

        // Offsets from the reference pixel (CRPIX is 1-based)
        let u = Vector2::new(x + 1.0 - lng.crpix, y + 1.0 - lat.crpix);
        let v = self.pc * u;

        let (phi, theta) = self
            .projection
            .plane_to_native(lng.cdelt * v.x, lat.cdelt * v.y);
        if !phi.is_finite() || !theta.is_finite() {
            return (f64::NAN, f64::NAN);
        }

        self.rotation.native_to_celestial(phi, theta)
    }

    fn celestial_world_to_pixel(&self, lon: f64, lat_deg: f64) -> (f64, f64) {
        if !lon.is_finite() || !lat_deg.is_finite() || lat_deg.abs() > 90.0 {
            return (f64::NAN, f64::NAN);
        }

        let lng = &self.header.axes[self.axes.lng];
        let lat = &self.header.axes[self.axes.lat];

        let (phi, theta) = self.rotation.celestial_to_native(lon, lat_deg);
        let (px, py) = self.projection.native_to_plane(phi, theta);
        if !px.is_finite() || !py.is_finite() {
            return (f64::NAN, f64::NAN);
        }

        let v = Vector2::new(px / lng.cdelt, py / lat.cdelt);
        let u = self.pc_inv * v;

        (u.x + lng.crpix - 1.0, u.y + lat.crpix - 1.0)
    }

    fn independent_pixel_to_world(&self, axis: usize, pixel: f64) -> f64 {
        match self.linear_axis(axis) {
            Some(a) => a.crval + a.cdelt * (pixel + 1.0 - a.crpix),
            None => f64::NAN,
        }
    }

    fn independent_world_to_pixel(&self, axis: usize, world: f64) -> f64 {
        match self.linear_axis(axis) {
            Some(a) => (world - a.crval) / a.cdelt + a.crpix - 1.0,
            None => f64::NAN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tan_header() -> WcsHeader {
        WcsHeader::new(vec![
            AxisHeader::new("RA---TAN", 50.5, -0.01, 150.0),
            AxisHeader::new("DEC--TAN", 50.5, 0.01, 2.0),
        ])
    }

    fn cube_header() -> WcsHeader {
        WcsHeader::new(vec![
            AxisHeader::new("GLON-CAR", 1.0, 1.0, 0.0),
            AxisHeader::new("GLAT-CAR", 1.0, 1.0, 0.0),
            AxisHeader::new("VELO-LSR", 1.0, 500.0, -2000.0),
        ])
    }

    #[test]
    fn test_reference_pixel_maps_to_crval() {
        let wcs = Wcs::from_header(&tan_header()).unwrap();
        let (lon, lat) = wcs.celestial_pixel_to_world(49.5, 49.5);
        assert!((lon - 150.0).abs() < 1e-9, "lon = {}", lon);
        assert!((lat - 2.0).abs() < 1e-9, "lat = {}", lat);
    }

    #[test]
    fn test_roundtrip_all_projections() {
        for code in ["TAN", "SIN", "CAR"] {
            let header = WcsHeader::new(vec![
                AxisHeader::new(format!("RA---{}", code), 10.5, -0.05, 83.6),
                AxisHeader::new(format!("DEC--{}", code), 10.5, 0.05, 22.0),
            ]);
            let wcs = Wcs::from_header(&header).unwrap();

            for &(x, y) in &[(0.0, 0.0), (3.25, 17.5), (19.0, 19.0), (-2.0, 7.0)] {
                let (lon, lat) = wcs.celestial_pixel_to_world(x, y);
                let (x2, y2) = wcs.celestial_world_to_pixel(lon, lat);
                assert!((x - x2).abs() < 1e-9, "{}: x {} -> {}", code, x, x2);
                assert!((y - y2).abs() < 1e-9, "{}: y {} -> {}", code, y, y2);
            }
        }
    }

    #[test]
    fn test_fine_pixel_tan_roundtrip() {
        let header = WcsHeader::new(vec![
            AxisHeader::new("RA---TAN", 50.0, -1e-4, 83.6),
            AxisHeader::new("DEC--TAN", 50.0, 1e-4, 22.0),
        ]);
        let wcs = Wcs::from_header(&header).unwrap();

        for &(x, y) in &[(49.0, 49.0), (50.0, 49.0), (48.5, 47.0), (60.0, 40.0)] {
            let (lon, lat) = wcs.celestial_pixel_to_world(x, y);
            let (x2, y2) = wcs.celestial_world_to_pixel(lon, lat);
            assert!((x - x2).abs() < 1e-9, "x {} -> {}", x, x2);
            assert!((y - y2).abs() < 1e-9, "y {} -> {}", y, y2);
        }
    }

    #[test]
    fn test_pc_rotation_roundtrip() {
        let angle = 30.0_f64.to_radians();
        let header = tan_header().with_pc([
            [angle.cos(), -angle.sin()],
            [angle.sin(), angle.cos()],
        ]);
        let wcs = Wcs::from_header(&header).unwrap();

        let (lon, lat) = wcs.celestial_pixel_to_world(12.0, 80.0);
        let (x, y) = wcs.celestial_world_to_pixel(lon, lat);
        assert!((x - 12.0).abs() < 1e-9);
        assert!((y - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_sin_beyond_horizon_is_nan() {
        let header = WcsHeader::new(vec![
            AxisHeader::new("RA---SIN", 1.0, 1.0, 0.0),
            AxisHeader::new("DEC--SIN", 1.0, 1.0, 0.0),
        ]);
        let wcs = Wcs::from_header(&header).unwrap();

        let (lon, lat) = wcs.celestial_pixel_to_world(80.0, 0.0);
        assert!(lon.is_nan() && lat.is_nan());

        // Far side of the sphere has no pixel
        let (x, y) = wcs.celestial_world_to_pixel(180.0, 0.0);
        assert!(x.is_nan() && y.is_nan());
    }

    #[test]
    fn test_car_identity_grid() {
        let header = WcsHeader::new(vec![
            AxisHeader::new("GLON-CAR", 1.0, 1.0, 0.0),
            AxisHeader::new("GLAT-CAR", 1.0, 1.0, 0.0),
        ]);
        let wcs = Wcs::from_header(&header).unwrap();
        assert_eq!(wcs.frame(), CelestialFrame::Galactic);

        let (lon, lat) = wcs.celestial_pixel_to_world(3.0, 2.0);
        assert!((lon - 3.0).abs() < 1e-9);
        assert!((lat - 2.0).abs() < 1e-9);

        let (x, y) = wcs.celestial_world_to_pixel(359.0, -1.0);
        assert!((x - -1.0).abs() < 1e-9, "x = {}", x);
        assert!((y - -1.0).abs() < 1e-9, "y = {}", y);
    }

    #[test]
    fn test_spectral_cube() {
        let wcs = Wcs::from_header(&cube_header()).unwrap();
        assert_eq!(wcs.naxis(), 3);
        assert_eq!(wcs.spectral_axis(), Some(2));
        assert_eq!(
            wcs.axis_types(),
            vec![AxisType::Longitude, AxisType::Latitude, AxisType::Spectral]
        );

        assert_eq!(wcs.independent_pixel_to_world(2, 0.0), -2000.0);
        assert_eq!(wcs.independent_pixel_to_world(2, 4.0), 0.0);
        assert_eq!(wcs.independent_world_to_pixel(2, 500.0), 5.0);
        assert!(wcs.independent_pixel_to_world(0, 1.0).is_nan());

        let world = wcs.pixel_to_world(&[1.0, 2.0, 3.0]);
        assert!((world[0] - 1.0).abs() < 1e-9);
        assert!((world[1] - 2.0).abs() < 1e-9);
        assert_eq!(world[2], -500.0);

        let pixel = wcs.world_to_pixel(&world);
        assert!((pixel[0] - 1.0).abs() < 1e-9);
        assert!((pixel[1] - 2.0).abs() < 1e-9);
        assert!((pixel[2] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_celestial_subsystem() {
        let header = WcsHeader::new(vec![
            AxisHeader::new("FREQ", 1.0, 1e6, 1.4e9),
            AxisHeader::new("DEC--TAN", 10.0, 0.1, -30.0),
            AxisHeader::new("RA---TAN", 10.0, -0.1, 10.0),
        ]);
        let wcs = Wcs::from_header(&header).unwrap();
        assert_eq!(wcs.celestial_axes(), CelestialAxes::new(2, 1));

        let sub = wcs.celestial();
        assert_eq!(sub.naxis(), 2);
        assert_eq!(sub.celestial_axes(), CelestialAxes::new(1, 0));
        assert_eq!(sub.spectral_axis(), None);
        assert_eq!(
            sub.celestial_pixel_to_world(4.0, 6.0),
            wcs.celestial_pixel_to_world(4.0, 6.0)
        );
    }

    #[test]
    fn test_invalid_headers() {
        let missing = WcsHeader::new(vec![
            AxisHeader::new("RA---TAN", 1.0, 1.0, 0.0),
            AxisHeader::new("FREQ", 1.0, 1.0, 0.0),
        ]);
        assert_eq!(
            Wcs::from_header(&missing).unwrap_err(),
            ProjectionError::MissingCelestialAxis("latitude")
        );

        let unsupported = WcsHeader::new(vec![
            AxisHeader::new("RA---AIT", 1.0, 1.0, 0.0),
            AxisHeader::new("DEC--AIT", 1.0, 1.0, 0.0),
        ]);
        assert!(matches!(
            Wcs::from_header(&unsupported),
            Err(ProjectionError::UnsupportedProjection(_))
        ));

        let mixed = WcsHeader::new(vec![
            AxisHeader::new("RA---TAN", 1.0, 1.0, 0.0),
            AxisHeader::new("DEC--CAR", 1.0, 1.0, 0.0),
        ]);
        assert!(matches!(
            Wcs::from_header(&mixed),
            Err(ProjectionError::MismatchedProjection(_, _))
        ));

        let zero_step = WcsHeader::new(vec![
            AxisHeader::new("RA---TAN", 1.0, 0.0, 0.0),
            AxisHeader::new("DEC--TAN", 1.0, 1.0, 0.0),
        ]);
        assert!(matches!(
            Wcs::from_header(&zero_step),
            Err(ProjectionError::InvalidHeader { keyword: "CDELT", .. })
        ));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let yaml = r#"
axes:
  - { ctype: "RA---TAN", crpix: 50.5, cdelt: -0.01, crval: 150.0 }
  - { ctype: "DEC--TAN", crpix: 50.5, cdelt: 0.01, crval: 2.0 }
radesys: FK5
"#;
        let wcs: Wcs = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(wcs.frame(), CelestialFrame::Fk5);

        let text = serde_yaml::to_string(&wcs).unwrap();
        let back: Wcs = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back.header(), wcs.header());

        let bad = "axes:\n  - { ctype: \"RA---TAN\", crpix: 1.0, cdelt: 1.0, crval: 0.0 }\n";
        assert!(serde_yaml::from_str::<Wcs>(bad).is_err());
    }
}
