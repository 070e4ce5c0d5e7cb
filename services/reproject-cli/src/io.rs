//! JSON grid files.
//!
//! Grids are stored as a shape plus row-major values. JSON has no NaN, so
//! missing values are written as `null` and read back as NaN.

use anyhow::{Context, Result};
use ndarray::{ArrayD, IxDyn};
use reproject::ReprojectOutput;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridFile {
    pub shape: Vec<usize>,
    pub data: Vec<Option<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footprint: Option<Vec<f64>>,
}

impl GridFile {
    pub fn from_array(array: &ArrayD<f64>) -> Self {
        Self {
            shape: array.shape().to_vec(),
            data: array.iter().map(|&v| v.is_finite().then_some(v)).collect(),
            footprint: None,
        }
    }

    pub fn from_output(output: &ReprojectOutput) -> Self {
        Self {
            footprint: Some(output.footprint.iter().copied().collect()),
            ..Self::from_array(&output.array)
        }
    }

    pub fn from_map(map: &[f64]) -> Self {
        Self {
            shape: vec![map.len()],
            data: map.iter().map(|&v| v.is_finite().then_some(v)).collect(),
            footprint: None,
        }
    }

    pub fn to_array(&self) -> Result<ArrayD<f64>> {
        let values: Vec<f64> = self.data.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        ArrayD::from_shape_vec(IxDyn(&self.shape), values).with_context(|| {
            format!(
                "Grid shape {:?} does not match {} values",
                self.shape,
                self.data.len()
            )
        })
    }
}

pub fn read_grid<P: AsRef<Path>>(path: P) -> Result<ArrayD<f64>> {
    let path = path.as_ref();
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read grid from {:?}", path))?;
    let grid: GridFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse grid from {:?}", path))?;
    grid.to_array()
}

pub fn write_grid<P: AsRef<Path>>(path: P, grid: &GridFile) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
    }
    let json = serde_json::to_string(grid)?;
    fs::write(path, json).with_context(|| format!("Failed to write grid to {:?}", path))
}
