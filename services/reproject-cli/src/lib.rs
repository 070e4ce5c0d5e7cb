//! Command-line front end for the reprojection engine.
//!
//! Runs one job file: read the input grid, run the task, write the result.

pub mod io;
pub mod job;

use anyhow::{Context, Result};
use ndarray::Ix2;
use reproject::{healpix_to_image, image_to_healpix, ReprojectConfig, Reprojector};
use tracing::info;

use io::{read_grid, write_grid, GridFile};
use job::{Job, Task};

/// What a finished job produced.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
    pub shape: Vec<usize>,
    /// Fraction of output values that are finite
    pub coverage: f64,
}

/// Run a loaded job with the given numeric policy.
pub fn run_job(job: &Job, config: ReprojectConfig) -> Result<JobSummary> {
    let input = read_grid(&job.input)?;
    info!(
        task = job.task.name(),
        input = ?job.input,
        shape = ?input.shape(),
        order = %config.order,
        "Running job"
    );

    let grid = match &job.task {
        Task::Reproject {
            wcs_in,
            wcs_out,
            shape_out,
        } => {
            let engine = Reprojector::new(config)?;
            let output = engine.reproject(&input, wcs_in, wcs_out, shape_out)?;
            GridFile::from_output(&output)
        }
        Task::HealpixToImage {
            frame_in,
            wcs_out,
            shape_out,
            interpolation,
            nest,
        } => {
            anyhow::ensure!(
                input.ndim() == 1,
                "HEALPix input must be one-dimensional, got shape {:?}",
                input.shape()
            );
            let map = input.into_dimensionality::<ndarray::Ix1>()?;
            let output = healpix_to_image(
                map.view(),
                *frame_in,
                wcs_out,
                (shape_out[0], shape_out[1]),
                *interpolation,
                *nest,
            )?;
            GridFile::from_output(&output)
        }
        Task::ImageToHealpix {
            wcs_in,
            frame_out,
            nside,
            nest,
        } => {
            let image = input
                .into_dimensionality::<Ix2>()
                .context("HEALPix conversion needs a 2-D input image")?;
            let map = image_to_healpix(
                image.view(),
                wcs_in,
                *frame_out,
                *nside,
                config.order,
                *nest,
            )?;
            GridFile::from_map(&map)
        }
    };

    write_grid(&job.output, &grid)?;

    let finite = grid.data.iter().filter(|v| v.is_some()).count();
    let summary = JobSummary {
        shape: grid.shape.clone(),
        coverage: if grid.data.is_empty() {
            0.0
        } else {
            finite as f64 / grid.data.len() as f64
        },
    };
    info!(
        output = ?job.output,
        shape = ?summary.shape,
        coverage = summary.coverage,
        "Job finished"
    );

    Ok(summary)
}
