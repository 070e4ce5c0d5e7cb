//! End-to-end tests for grid reprojection.

use ndarray::{Array, Array2, Array4, Axis};
use projection::{AxisHeader, CoordinateSystem, Wcs, WcsHeader};
use reproject::{reproject_interp, InterpolationOrder, ReprojectConfig, ReprojectError, Reprojector};
use sky_common::CelestialFrame;
use test_utils::{
    assert_approx_eq, assert_arrays_approx_eq, build_wcs, celestial_header,
    create_grid_with_nans, create_increasing_grid, create_linear_spectrum_cube,
    create_smooth_grid, create_test_cube, create_test_grid, pixel_grid_wcs, positions,
    spectral_cube_wcs, stokes_cube_wcs, tan_wcs,
};

fn shifted_grid_wcs(crpix_lng: f64, crpix_lat: f64) -> Wcs {
    build_wcs(&celestial_header(
        CelestialFrame::Icrs,
        "CAR",
        (crpix_lng, crpix_lat),
        (1.0, 1.0),
        (0.0, 0.0),
    ))
}

// ============================================================================
// Identity and edge handling
// ============================================================================

#[test]
fn test_identity_nearest_neighbour() {
    let wcs = pixel_grid_wcs();
    let data = create_increasing_grid(6, 5);

    let out = reproject_interp(&data, &wcs, &wcs, &[6, 5], InterpolationOrder::NearestNeighbor)
        .unwrap();

    assert_eq!(out.array, data.into_dyn());
    assert!(out.footprint.iter().all(|&f| f == 1.0));
}

#[test]
fn test_identity_all_orders() {
    let wcs = pixel_grid_wcs();
    let data = create_smooth_grid(8, 8);

    for order in [
        InterpolationOrder::NearestNeighbor,
        InterpolationOrder::Bilinear,
        InterpolationOrder::Bicubic,
    ] {
        let out = reproject_interp(&data, &wcs, &wcs, &[8, 8], order).unwrap();
        assert_arrays_approx_eq!(out.array, data.clone().into_dyn(), 1e-9);
    }
}

#[test]
fn test_whole_pixel_shift_moves_data() {
    let data = create_test_grid(4, 6);
    // Output column c sits at input column c + 1
    let wcs_out = shifted_grid_wcs(0.0, 1.0);

    let out = reproject_interp(
        &data,
        &pixel_grid_wcs(),
        &wcs_out,
        &[4, 6],
        InterpolationOrder::NearestNeighbor,
    )
    .unwrap();

    for row in 0..4 {
        for col in 0..5 {
            assert_eq!(out.array[[row, col]], ((col + 1) * 1000 + row) as f64);
        }
        assert!(out.array[[row, 5]].is_nan());
        assert_eq!(out.footprint[[row, 5]], 0.0);
    }
}

#[test]
fn test_nan_input_stays_local() {
    let data = create_grid_with_nans(5, 5, &[(1, 1), (3, 4)]);
    let wcs = pixel_grid_wcs();

    let out = reproject_interp(&data, &wcs, &wcs, &[5, 5], InterpolationOrder::Bilinear).unwrap();

    assert_arrays_approx_eq!(out.array, data.clone().into_dyn(), 1e-9);
    assert_eq!(out.footprint[[1, 1]], 0.0);
    assert_eq!(out.footprint[[3, 4]], 0.0);
    assert_eq!(out.footprint.iter().filter(|&&f| f == 1.0).count(), 23);
}

#[test]
fn test_half_pixel_edge_is_covered() {
    let data = create_increasing_grid(4, 4);
    // Output column c sits at input column c - 0.5
    let wcs_out = shifted_grid_wcs(1.5, 1.0);

    let out = reproject_interp(
        &data,
        &pixel_grid_wcs(),
        &wcs_out,
        &[4, 4],
        InterpolationOrder::Bilinear,
    )
    .unwrap();

    for row in 0..4 {
        let first = (row * 4 + 1) as f64;
        assert_approx_eq!(out.array[[row, 0]], first, 1e-9);
        assert_approx_eq!(out.array[[row, 1]], first + 0.5, 1e-9);
    }
    assert!(out.footprint.iter().all(|&f| f == 1.0));
}

#[test]
fn test_beyond_half_pixel_is_filled() {
    let data = create_increasing_grid(4, 4);
    // Output column 0 sits at input column -0.6
    let wcs_out = shifted_grid_wcs(1.6, 1.0);

    let out = reproject_interp(
        &data,
        &pixel_grid_wcs(),
        &wcs_out,
        &[4, 4],
        InterpolationOrder::Bilinear,
    )
    .unwrap();

    for row in 0..4 {
        assert!(out.array[[row, 0]].is_nan());
        assert_eq!(out.footprint[[row, 0]], 0.0);
        assert!(out.array[[row, 1]].is_finite());
    }
}

#[test]
fn test_far_outside_is_filled() {
    let data = create_increasing_grid(4, 4);
    // Output row 0 sits at input row -1.2, column 2
    let wcs_out = shifted_grid_wcs(1.0, 2.2);

    let out = reproject_interp(
        &data,
        &pixel_grid_wcs(),
        &wcs_out,
        &[4, 4],
        InterpolationOrder::Bicubic,
    )
    .unwrap();

    assert!(out.array[[0, 2]].is_nan());
    assert_eq!(out.footprint[[0, 2]], 0.0);
}

// ============================================================================
// Frames, projections and round trips
// ============================================================================

#[test]
fn test_footprint_marks_finite_output() {
    let data = create_smooth_grid(32, 32);
    let wcs_in = tan_wcs(CelestialFrame::Icrs, positions::CRAB_ICRS, 0.1, 32);
    // Offset output: only part of it overlaps the input
    let wcs_out = tan_wcs(
        CelestialFrame::Icrs,
        (positions::CRAB_ICRS.0 + 2.0, positions::CRAB_ICRS.1),
        0.1,
        32,
    );

    let out = reproject_interp(&data, &wcs_in, &wcs_out, &[32, 32], InterpolationOrder::Bilinear)
        .unwrap();

    for (value, footprint) in out.array.iter().zip(out.footprint.iter()) {
        let expected = if value.is_finite() { 1.0 } else { 0.0 };
        assert_eq!(*footprint, expected);
    }
    assert!(out.coverage() > 0.0 && out.coverage() < 1.0);
}

#[test]
fn test_icrs_galactic_round_trip() {
    let n = 32;
    let data = create_smooth_grid(n, n);
    let wcs_icrs = tan_wcs(CelestialFrame::Icrs, positions::GALACTIC_CENTRE_ICRS, 0.1, n);
    let wcs_gal = tan_wcs(CelestialFrame::Galactic, (0.0, 0.0), 0.1, n);

    let there =
        reproject_interp(&data, &wcs_icrs, &wcs_gal, &[n, n], InterpolationOrder::Bilinear)
            .unwrap();
    // Both grids are centred on the same sky position
    assert!(there.array[[n / 2, n / 2]].is_finite());

    let back = reproject_interp(
        &there.array,
        &wcs_gal,
        &wcs_icrs,
        &[n, n],
        InterpolationOrder::Bilinear,
    )
    .unwrap();

    let centre = (n as f64 - 1.0) / 2.0;
    let mut checked = 0;
    for ((row, col), &value) in back.array.indexed_iter().map(|(i, v)| ((i[0], i[1]), v)) {
        let r = ((row as f64 - centre).powi(2) + (col as f64 - centre).powi(2)).sqrt();
        if r < 10.0 {
            assert_approx_eq!(value, data[[row, col]], 0.01);
            checked += 1;
        }
    }
    assert!(checked > 250);
}

#[test]
fn test_car_tan_round_trip() {
    let n = 24;
    let data = create_smooth_grid(n, n);
    let wcs_car = build_wcs(&celestial_header(
        CelestialFrame::Galactic,
        "CAR",
        (12.5, 12.5),
        (-0.2, 0.2),
        (30.0, 0.0),
    ));
    let wcs_tan = tan_wcs(CelestialFrame::Galactic, (30.0, 0.0), 0.2, n);

    let there =
        reproject_interp(&data, &wcs_car, &wcs_tan, &[n, n], InterpolationOrder::Bicubic).unwrap();
    let back =
        reproject_interp(&there.array, &wcs_tan, &wcs_car, &[n, n], InterpolationOrder::Bicubic)
            .unwrap();

    for row in 4..n - 4 {
        for col in 4..n - 4 {
            assert_approx_eq!(back.array[[row, col]], data[[row, col]], 0.01);
        }
    }
}

#[test]
fn test_sin_horizon_leaves_gaps() {
    let data = Array2::<f64>::ones((16, 16));
    let wcs_in = build_wcs(&celestial_header(
        CelestialFrame::Icrs,
        "CAR",
        (8.5, 8.5),
        (-22.5, 11.25),
        (0.0, 0.0),
    ));
    // Corners of this image lie beyond the SIN horizon
    let wcs_out = build_wcs(&celestial_header(
        CelestialFrame::Icrs,
        "SIN",
        (8.5, 8.5),
        (-8.0, 8.0),
        (0.0, 0.0),
    ));

    let out = reproject_interp(&data, &wcs_in, &wcs_out, &[16, 16], InterpolationOrder::Bilinear)
        .unwrap();

    assert!(out.array[[0, 0]].is_nan());
    assert_eq!(out.footprint[[0, 0]], 0.0);
    assert_approx_eq!(out.array[[8, 8]], 1.0, 1e-12);
}

// ============================================================================
// Non-celestial axes
// ============================================================================

#[test]
fn test_slices_match_independent_reprojection() {
    let wcs_in = stokes_cube_wcs();
    let mut header_out = celestial_header(
        CelestialFrame::Icrs,
        "TAN",
        (3.0, 3.0),
        (-0.8, 0.8),
        (2.0, 2.0),
    );
    header_out.axes.push(AxisHeader::new("FREQ", 1.0, 1.0e6, 1.4e9));
    header_out.axes.push(AxisHeader::new("STOKES", 1.0, 1.0, 1.0));
    let wcs_out = build_wcs(&header_out);

    let cube: Array4<f64> =
        Array::from_shape_fn((3, 1, 5, 5), |(k, _, y, x)| (k * 100 + y * 5 + x) as f64);

    let out = reproject_interp(
        &cube,
        &wcs_in,
        &wcs_out,
        &[3, 1, 5, 5],
        InterpolationOrder::Bilinear,
    )
    .unwrap();
    assert_eq!(out.shape(), &[3, 1, 5, 5]);

    for k in 0..3 {
        let slice = cube.view().index_axis_move(Axis(0), k).index_axis_move(Axis(0), 0);
        let single = reproject_interp(
            &slice,
            &wcs_in.celestial(),
            &wcs_out.celestial(),
            &[5, 5],
            InterpolationOrder::Bilinear,
        )
        .unwrap();

        let from_cube = out
            .array
            .view()
            .index_axis_move(Axis(0), k)
            .index_axis_move(Axis(0), 0);
        assert_arrays_approx_eq!(from_cube, single.array, 1e-12);
    }
}

#[test]
fn test_cube_planes_shift_together() {
    let cube = create_test_cube(3, 4, 5);
    let wcs_in = spectral_cube_wcs(1.0, 1.0, 0.0);
    let mut header_out = celestial_header(
        CelestialFrame::Icrs,
        "CAR",
        (0.0, 1.0),
        (1.0, 1.0),
        (0.0, 0.0),
    );
    header_out.axes.push(AxisHeader::new("FREQ", 1.0, 1.0, 0.0));
    let wcs_out = build_wcs(&header_out);

    let out = reproject_interp(
        &cube,
        &wcs_in,
        &wcs_out,
        &[3, 4, 5],
        InterpolationOrder::NearestNeighbor,
    )
    .unwrap();

    for plane in 0..3 {
        for row in 0..4 {
            for col in 0..4 {
                assert_eq!(out.array[[plane, row, col]], cube[[plane, row, col + 1]]);
            }
            assert!(out.array[[plane, row, 4]].is_nan());
        }
    }
}

#[test]
fn test_celestial_axes_not_trailing() {
    let header = |crpix_ra: f64| {
        WcsHeader::new(vec![
            AxisHeader::new("FREQ", 1.0, 1.0, 0.0),
            AxisHeader::new("RA---CAR", crpix_ra, 1.0, 0.0),
            AxisHeader::new("DEC--CAR", 1.0, 1.0, 0.0),
        ])
    };
    let wcs_in = build_wcs(&header(1.0));
    // Output RA pixel r sits at input RA pixel r - 1
    let wcs_out = build_wcs(&header(2.0));

    // Array axes: (dec, ra, freq)
    let data = Array::from_shape_fn((4, 5, 3), |(d, r, f)| (d * 100 + r * 10 + f) as f64);

    let out = reproject_interp(
        &data,
        &wcs_in,
        &wcs_out,
        &[4, 5, 3],
        InterpolationOrder::NearestNeighbor,
    )
    .unwrap();

    for d in 0..4 {
        for f in 0..3 {
            assert!(out.array[[d, 0, f]].is_nan());
            for r in 1..5 {
                assert_eq!(out.array[[d, r, f]], data[[d, r - 1, f]]);
            }
        }
    }
}

#[test]
fn test_spectral_resampling_of_linear_spectra() {
    let data = create_linear_spectrum_cube(5, 4, 4, 2.0, 1.0);
    let wcs_in = spectral_cube_wcs(1.0, 1.0, 0.0);
    // Twice the spectral sampling over the same range
    let wcs_out = spectral_cube_wcs(1.0, 0.5, 0.0);

    let out = reproject_interp(&data, &wcs_in, &wcs_out, &[9, 4, 4], InterpolationOrder::Bilinear)
        .unwrap();
    assert_eq!(out.shape(), &[9, 4, 4]);

    for k in 1..8 {
        let expected = 1.0 + 2.0 * 0.5 * k as f64;
        for row in 1..3 {
            for col in 1..3 {
                assert_approx_eq!(out.array[[k, row, col]], expected, 1e-9);
            }
        }
    }
}

#[test]
fn test_spectral_resampling_zeroes_non_finite_input() {
    let mut data = create_linear_spectrum_cube(5, 4, 4, 1.0, 0.0);
    data[[2, 1, 1]] = f64::NAN;
    let wcs_in = spectral_cube_wcs(1.0, 1.0, 0.0);
    let wcs_out = spectral_cube_wcs(1.0, 0.5, 0.0);

    let out = reproject_interp(&data, &wcs_in, &wcs_out, &[9, 4, 4], InterpolationOrder::Bilinear)
        .unwrap();
    // Channel 4 of the output is input channel 2
    assert_approx_eq!(out.array[[4, 1, 1]], 0.0, 1e-9);
    assert_approx_eq!(out.array[[3, 1, 1]], 0.5, 1e-9);

    let keep_nan = ReprojectConfig {
        zero_non_finite_volume: false,
        ..Default::default()
    };
    let out = Reprojector::new(keep_nan)
        .unwrap()
        .reproject(&data, &wcs_in, &wcs_out, &[9, 4, 4])
        .unwrap();
    assert!(out.array[[4, 1, 1]].is_nan());
    assert_eq!(out.footprint[[4, 1, 1]], 0.0);
}

#[test]
fn test_spectral_resampling_needs_spectral_axes() {
    let data = Array::<f64, _>::zeros((3, 4, 4));
    let mut header = celestial_header(
        CelestialFrame::Icrs,
        "CAR",
        (1.0, 1.0),
        (1.0, 1.0),
        (0.0, 0.0),
    );
    header.axes.push(AxisHeader::new("TIME", 1.0, 1.0, 0.0));
    let wcs = build_wcs(&header);

    let result = reproject_interp(&data, &wcs, &wcs, &[6, 4, 4], InterpolationOrder::Bilinear);
    assert!(matches!(
        result,
        Err(ReprojectError::InvalidCoordinateSystem(_))
    ));
}

// ============================================================================
// Rejected requests
// ============================================================================

#[test]
fn test_rank_five_rejected() {
    let data = Array::<f64, _>::zeros(ndarray::IxDyn(&[1, 1, 1, 4, 4]));
    let wcs = stokes_cube_wcs();

    let result = reproject_interp(
        &data,
        &wcs,
        &wcs,
        &[1, 1, 1, 4, 4],
        InterpolationOrder::Bilinear,
    );
    assert!(matches!(
        result,
        Err(ReprojectError::UnsupportedDimensionality(_))
    ));
}

#[test]
fn test_four_dimensional_volume_resampling_rejected() {
    let wcs = stokes_cube_wcs();
    let cube = Array4::<f64>::zeros((3, 1, 4, 4));

    // Leading axis changes length, which needs whole-volume resampling
    let result = reproject_interp(
        &cube,
        &wcs,
        &wcs,
        &[2, 1, 4, 4],
        InterpolationOrder::Bilinear,
    );
    assert!(matches!(
        result,
        Err(ReprojectError::UnsupportedDimensionality(_))
    ));
}

#[test]
fn test_mismatched_non_celestial_extent() {
    let wcs = stokes_cube_wcs();
    let cube = Array4::<f64>::zeros((2, 2, 4, 4));

    // Leading axis kept, second one changed
    let result = reproject_interp(
        &cube,
        &wcs,
        &wcs,
        &[2, 3, 4, 4],
        InterpolationOrder::Bilinear,
    );
    assert!(matches!(result, Err(ReprojectError::ShapeMismatch(_))));
}

#[test]
fn test_different_frames_same_axis_types() {
    // Frames differ but axis kinds agree, so this is a valid request
    let wcs_in = tan_wcs(CelestialFrame::Icrs, positions::GALACTIC_CENTRE_ICRS, 0.5, 8);
    let wcs_out = tan_wcs(CelestialFrame::Galactic, (0.0, 0.0), 0.5, 8);
    assert_eq!(wcs_in.axis_types(), wcs_out.axis_types());

    let data = Array2::<f64>::ones((8, 8));
    let out = reproject_interp(&data, &wcs_in, &wcs_out, &[8, 8], InterpolationOrder::Bilinear)
        .unwrap();
    assert_approx_eq!(out.array[[4, 4]], 1.0, 1e-12);
}
