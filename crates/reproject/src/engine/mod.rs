//! The reprojection engine.
//!
//! [`Reprojector`] resamples an N-D grid from one coordinate system onto
//! another. Two strategies are used:
//!
//! - **Slice-wise**: when the non-celestial axes keep their extent, each 2-D
//!   celestial plane is resampled on its own with edge-corrected sampling.
//!   The celestial pixel map is computed for the first plane and reused.
//! - **Whole-volume**: when the leading (spectral) axis changes extent, the
//!   whole 3-D cube is sampled in one pass. This path has no half-pixel edge
//!   correction.

pub mod pixels;

pub use pixels::{celestial_pixel_map, volume_pixel_map};

use ndarray::{Array2, ArrayBase, ArrayD, Data, Dimension, IxDyn};
use num_traits::ToPrimitive;
use projection::{CoordinateSystem, FrameConverter, RotationFrameConverter};
use tracing::{debug, trace};

use crate::array_utils::iterate_over_celestial_slices;
use crate::config::ReprojectConfig;
use crate::error::{ReprojectError, Result};
use crate::interpolation::{EdgeCorrectedInterpolator, GridInterpolator, KernelInterpolator};
use crate::types::{InterpolationOrder, ReprojectOutput};

/// Highest output rank the engine accepts: the celestial pair plus two others.
pub const MAX_OUTPUT_RANK: usize = 4;

/// Resamples grids between coordinate systems.
///
/// The engine holds no per-call state; one instance can serve any number of
/// reprojections.
#[derive(Debug, Clone)]
pub struct Reprojector<F = RotationFrameConverter, I = KernelInterpolator> {
    config: ReprojectConfig,
    frames: F,
    interpolator: I,
}

impl Reprojector {
    /// Engine with the built-in frame converter and kernel interpolator.
    pub fn new(config: ReprojectConfig) -> Result<Self> {
        Self::with_components(config, RotationFrameConverter::new(), KernelInterpolator)
    }
}

impl Default for Reprojector {
    fn default() -> Self {
        Self {
            config: ReprojectConfig::default(),
            frames: RotationFrameConverter::new(),
            interpolator: KernelInterpolator,
        }
    }
}

impl<F: FrameConverter, I: GridInterpolator> Reprojector<F, I> {
    /// Engine with custom collaborators.
    pub fn with_components(config: ReprojectConfig, frames: F, interpolator: I) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            frames,
            interpolator,
        })
    }

    pub fn config(&self) -> &ReprojectConfig {
        &self.config
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn interpolator(&self) -> &I {
        &self.interpolator
    }

    /// Reproject `array` from `cs_in` onto a grid of `shape_out` described by
    /// `cs_out`.
    ///
    /// Returns the resampled array and its footprint. Output pixels without
    /// input coverage hold the configured fill value. Fails before any
    /// sampling when the request is structurally invalid: output rank below
    /// two or above four, differing axis types on systems with the same
    /// number of axes, or mismatched non-celestial extents.
    pub fn reproject<S, D>(
        &self,
        array: &ArrayBase<S, D>,
        cs_in: &dyn CoordinateSystem,
        cs_out: &dyn CoordinateSystem,
        shape_out: &[usize],
    ) -> Result<ReprojectOutput>
    where
        S: Data,
        S::Elem: ToPrimitive,
        D: Dimension,
    {
        if shape_out.len() < 2 {
            return Err(ReprojectError::InvalidShape(shape_out.to_vec()));
        }
        if shape_out.len() > MAX_OUTPUT_RANK {
            return Err(ReprojectError::unsupported_dimensionality(format!(
                "output shape {:?} has {} non-celestial axes, at most {} are supported",
                shape_out,
                shape_out.len() - 2,
                MAX_OUTPUT_RANK - 2
            )));
        }
        if array.ndim() < 2 {
            return Err(ReprojectError::shape_mismatch(format!(
                "input array of shape {:?} has no celestial plane",
                array.shape()
            )));
        }

        check_compatible(cs_in, cs_out)?;

        let input: ArrayD<f64> = array
            .map(|v| v.to_f64().unwrap_or(f64::NAN))
            .into_dyn();

        if shape_out.len() >= 3 && shape_out[0] != input.shape()[0] {
            debug!(
                input_shape = ?input.shape(),
                output_shape = ?shape_out,
                "Leading axis changes extent, resampling whole volume"
            );
            self.reproject_volume(input, cs_in, cs_out, shape_out)
        } else {
            debug!(
                input_shape = ?input.shape(),
                output_shape = ?shape_out,
                "Resampling celestial slices"
            );
            self.reproject_slices(&input, cs_in, cs_out, shape_out)
        }
    }

    fn reproject_slices(
        &self,
        input: &ArrayD<f64>,
        cs_in: &dyn CoordinateSystem,
        cs_out: &dyn CoordinateSystem,
        shape_out: &[usize],
    ) -> Result<ReprojectOutput> {
        let mut output = ArrayD::<f64>::zeros(IxDyn(shape_out));
        let sampler = EdgeCorrectedInterpolator::new(&self.interpolator);
        let axes = cs_in.celestial_axes();

        {
            let slices = iterate_over_celestial_slices(input.view(), output.view_mut(), axes)?;
            let mut cached: Option<Array2<f64>> = None;

            for (index, (plane_in, mut plane_out)) in slices.enumerate() {
                let plane = (plane_out.shape()[0], plane_out.shape()[1]);

                let coords = cached.get_or_insert_with(|| {
                    debug!(
                        plane = ?plane,
                        "Computing celestial pixel map, reused for every slice"
                    );
                    celestial_pixel_map(cs_in, cs_out, &self.frames, plane)
                });

                trace!(slice = index, "Sampling celestial slice");
                let values = sampler.sample(
                    plane_in,
                    coords.view(),
                    self.config.order,
                    self.config.fill_value,
                )?;

                for (out, value) in plane_out.iter_mut().zip(values) {
                    *out = value;
                }
            }
        }

        Ok(ReprojectOutput::from_array(output))
    }

    fn reproject_volume(
        &self,
        mut input: ArrayD<f64>,
        cs_in: &dyn CoordinateSystem,
        cs_out: &dyn CoordinateSystem,
        shape_out: &[usize],
    ) -> Result<ReprojectOutput> {
        if shape_out.len() != 3 || input.ndim() != 3 {
            return Err(ReprojectError::unsupported_dimensionality(format!(
                "resampling a non-celestial axis needs 3-D input and output, got {:?} -> {:?}",
                input.shape(),
                shape_out
            )));
        }

        let coords = volume_pixel_map(cs_in, cs_out, &self.frames, shape_out)?;

        if self.config.zero_non_finite_volume {
            input.mapv_inplace(|v| if v.is_finite() { v } else { 0.0 });
        }

        let values = self.interpolator.sample(
            input.view(),
            coords.view(),
            self.config.order,
            self.config.fill_value,
        )?;
        let output = ArrayD::from_shape_vec(IxDyn(shape_out), values)?;

        Ok(ReprojectOutput::from_array(output))
    }
}

/// Reject systems with the same number of axes but different axis types.
///
/// Systems with different axis counts are not compared.
fn check_compatible(cs_in: &dyn CoordinateSystem, cs_out: &dyn CoordinateSystem) -> Result<()> {
    let types_in = cs_in.axis_types();
    let types_out = cs_out.axis_types();

    if cs_in.naxis() != cs_out.naxis() {
        debug!(
            input_naxis = cs_in.naxis(),
            output_naxis = cs_out.naxis(),
            "Axis counts differ, skipping axis-type check"
        );
        return Ok(());
    }

    if types_in != types_out {
        return Err(ReprojectError::IncompatibleCoordinateSystems {
            input: format_types(&types_in),
            output: format_types(&types_out),
        });
    }

    Ok(())
}

fn format_types(types: &[projection::AxisType]) -> String {
    let names: Vec<String> = types.iter().map(|t| t.to_string()).collect();
    format!("[{}]", names.join(", "))
}

/// Reproject with the default engine and the given interpolation order.
///
/// Shorthand for [`Reprojector::reproject`] with a NaN fill value and the
/// built-in collaborators.
pub fn reproject_interp<S, D>(
    array: &ArrayBase<S, D>,
    cs_in: &dyn CoordinateSystem,
    cs_out: &dyn CoordinateSystem,
    shape_out: &[usize],
    order: InterpolationOrder,
) -> Result<ReprojectOutput>
where
    S: Data,
    S::Elem: ToPrimitive,
    D: Dimension,
{
    Reprojector::new(ReprojectConfig::with_order(order))?.reproject(array, cs_in, cs_out, shape_out)
}
