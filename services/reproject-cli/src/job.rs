//! Job files for the reprojection CLI.
//!
//! A job is a YAML document naming an input grid, an output path and the
//! task to run on it:
//!
//! ```yaml
//! input: ${DATA_DIR:-data}/m31.json
//! output: m31_galactic.json
//! task:
//!   kind: reproject
//!   wcs_in:
//!     axes:
//!       - { ctype: RA---TAN, crpix: 32.5, cdelt: -0.01, crval: 10.68 }
//!       - { ctype: DEC--TAN, crpix: 32.5, cdelt: 0.01, crval: 41.27 }
//!   wcs_out:
//!     axes:
//!       - { ctype: GLON-CAR, crpix: 32.5, cdelt: -0.01, crval: 121.17 }
//!       - { ctype: GLAT-CAR, crpix: 32.5, cdelt: 0.01, crval: -21.57 }
//!   shape_out: [64, 64]
//! config:
//!   order: 3
//! ```
//!
//! Supports environment variable substitution using ${VAR} and
//! ${VAR:-default} syntax. Relative paths are resolved against the
//! directory of the job file.

use anyhow::{Context, Result};
use projection::Wcs;
use reproject::{HealpixInterpolation, ReprojectConfig};
use serde::{Deserialize, Serialize};
use sky_common::CelestialFrame;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Job description
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Input grid (JSON)
    pub input: PathBuf,

    /// Where to write the result (JSON)
    pub output: PathBuf,

    pub task: Task,

    /// Numeric policy; falls back to the environment when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ReprojectConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Task {
    /// Resample a grid between two coordinate systems
    Reproject {
        wcs_in: Wcs,
        wcs_out: Wcs,
        shape_out: Vec<usize>,
    },

    /// Sample a HEALPix map onto an image
    HealpixToImage {
        frame_in: CelestialFrame,
        wcs_out: Wcs,
        shape_out: [usize; 2],
        #[serde(default)]
        interpolation: HealpixInterpolation,
        #[serde(default)]
        nest: bool,
    },

    /// Sample an image at HEALPix pixel centres
    ImageToHealpix {
        wcs_in: Wcs,
        frame_out: CelestialFrame,
        nside: u32,
        #[serde(default)]
        nest: bool,
    },
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Task::Reproject { .. } => "reproject",
            Task::HealpixToImage { .. } => "healpix_to_image",
            Task::ImageToHealpix { .. } => "image_to_healpix",
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a job file, expanding environment variables and resolving paths.
pub fn load_job<P: AsRef<Path>>(path: P) -> Result<Job> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file {:?}", path))?;

    let expanded = expand_env_vars(&content)?;

    let mut job: Job = serde_yaml::from_str(&expanded)
        .with_context(|| format!("Failed to parse job file {:?}", path))?;

    validate_job(&job)?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    job.input = resolve(base, &job.input);
    job.output = resolve(base, &job.output);

    Ok(job)
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Expand ${VAR} and ${VAR:-default} references.
pub fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_expr = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }
            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}

// ============================================================================
// Validation
// ============================================================================

fn validate_job(job: &Job) -> Result<()> {
    anyhow::ensure!(
        !job.input.as_os_str().is_empty(),
        "Job input path cannot be empty"
    );
    anyhow::ensure!(
        !job.output.as_os_str().is_empty(),
        "Job output path cannot be empty"
    );

    match &job.task {
        Task::Reproject { shape_out, .. } => {
            anyhow::ensure!(
                shape_out.iter().all(|&n| n > 0),
                "Output shape {:?} has an empty axis",
                shape_out
            );
        }
        Task::HealpixToImage { shape_out, .. } => {
            anyhow::ensure!(
                shape_out.iter().all(|&n| n > 0),
                "Output shape {:?} has an empty axis",
                shape_out
            );
        }
        Task::ImageToHealpix { nside, .. } => {
            anyhow::ensure!(
                nside.is_power_of_two(),
                "nside must be a power of two, got {}",
                nside
            );
        }
    }

    if let Some(config) = &job.config {
        config
            .validate()
            .context("Invalid reprojection config in job file")?;
    }

    Ok(())
}
