//! Common coordinate-system fixtures.
//!
//! Ready-made headers and coordinate systems for the scenarios the test
//! suites keep coming back to. Builders panic on invalid headers, which is
//! what a test wants.

use projection::{AxisHeader, Wcs, WcsHeader};
use sky_common::CelestialFrame;

/// Well-known sky positions, in degrees.
pub mod positions {
    /// Galactic centre (l, b) = (0, 0) in ICRS
    pub const GALACTIC_CENTRE_ICRS: (f64, f64) = (266.404_996, -28.936_172);

    /// North galactic pole in ICRS
    pub const NORTH_GALACTIC_POLE_ICRS: (f64, f64) = (192.859_481, 27.128_251);

    /// Crab nebula in ICRS
    pub const CRAB_ICRS: (f64, f64) = (83.633_08, 22.014_5);
}

/// FITS axis type pair for a frame and projection code, e.g. ("GLON-CAR", "GLAT-CAR").
pub fn ctype_pair(frame: CelestialFrame, projection: &str) -> (String, String) {
    let (lng, lat) = match frame {
        CelestialFrame::Icrs | CelestialFrame::Fk5 => ("RA", "DEC"),
        CelestialFrame::Galactic => ("GLON", "GLAT"),
        CelestialFrame::Ecliptic => ("ELON", "ELAT"),
    };
    (
        format!("{:-<5}{}", lng, projection),
        format!("{:-<5}{}", lat, projection),
    )
}

/// Header of a two-axis celestial system.
///
/// `crpix` is 1-based, as in FITS. Arguments are (longitude, latitude) pairs.
pub fn celestial_header(
    frame: CelestialFrame,
    projection: &str,
    crpix: (f64, f64),
    cdelt: (f64, f64),
    crval: (f64, f64),
) -> WcsHeader {
    let (lng, lat) = ctype_pair(frame, projection);
    let header = WcsHeader::new(vec![
        AxisHeader::new(lng, crpix.0, cdelt.0, crval.0),
        AxisHeader::new(lat, crpix.1, cdelt.1, crval.1),
    ]);
    match frame {
        CelestialFrame::Fk5 => header.with_radesys("FK5"),
        _ => header,
    }
}

/// Build a coordinate system, panicking on an invalid header.
pub fn build_wcs(header: &WcsHeader) -> Wcs {
    match Wcs::from_header(header) {
        Ok(wcs) => wcs,
        Err(e) => panic!("invalid test header {:?}: {}", header, e),
    }
}

/// Identity pixel grid: CAR with one degree per pixel, pixel (0, 0) at the
/// world origin. World coordinates equal pixel coordinates near the origin.
pub fn pixel_grid_wcs() -> Wcs {
    build_wcs(&celestial_header(
        CelestialFrame::Icrs,
        "CAR",
        (1.0, 1.0),
        (1.0, 1.0),
        (0.0, 0.0),
    ))
}

/// Gnomonic image of `n x n` pixels centred on `centre`.
pub fn tan_wcs(frame: CelestialFrame, centre: (f64, f64), pixel_deg: f64, n: usize) -> Wcs {
    let crpix = (n as f64 + 1.0) / 2.0;
    build_wcs(&celestial_header(
        frame,
        "TAN",
        (crpix, crpix),
        (-pixel_deg, pixel_deg),
        centre,
    ))
}

/// Plate carrée image covering the whole sky with `nx x ny` pixels.
///
/// Pixel centres run from longitude 180 (left) to -180 and latitude -90 to 90,
/// offset by half a pixel so no centre sits on a pole.
pub fn allsky_car_wcs(frame: CelestialFrame, ny: usize, nx: usize) -> Wcs {
    let dx = 360.0 / nx as f64;
    let dy = 180.0 / ny as f64;
    build_wcs(&celestial_header(
        frame,
        "CAR",
        ((nx as f64 + 1.0) / 2.0, (ny as f64 + 1.0) / 2.0),
        (-dx, dy),
        (0.0, 0.0),
    ))
}

/// Three-axis cube: identity CAR pixel grid plus a frequency axis.
pub fn spectral_cube_wcs(crpix_spec: f64, cdelt_spec: f64, crval_spec: f64) -> Wcs {
    let mut header = celestial_header(
        CelestialFrame::Icrs,
        "CAR",
        (1.0, 1.0),
        (1.0, 1.0),
        (0.0, 0.0),
    );
    header
        .axes
        .push(AxisHeader::new("FREQ", crpix_spec, cdelt_spec, crval_spec));
    build_wcs(&header)
}

/// Four-axis system: identity CAR pixel grid plus frequency and Stokes axes.
pub fn stokes_cube_wcs() -> Wcs {
    let mut header = celestial_header(
        CelestialFrame::Icrs,
        "CAR",
        (1.0, 1.0),
        (1.0, 1.0),
        (0.0, 0.0),
    );
    header.axes.push(AxisHeader::new("FREQ", 1.0, 1.0e6, 1.4e9));
    header.axes.push(AxisHeader::new("STOKES", 1.0, 1.0, 1.0));
    build_wcs(&header)
}
