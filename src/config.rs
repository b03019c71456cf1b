use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::from_reader;
use thiserror::Error;

use crate::control::error::ModelError;
use crate::control::model::{matrix_from_slice, LinearStateSpaceModel, MatrixLayout};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scenario file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Scenario does not fit the model: {0}")]
    Model(#[from] ModelError),
}

/// Flat matrix buffer plus the order its elements are stored in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatrixConfig {
    pub data: Vec<f64>,
    #[serde(default)]
    pub layout: MatrixLayout,
}

impl MatrixConfig {
    pub fn new(data: Vec<f64>, layout: MatrixLayout) -> Self {
        MatrixConfig { data, layout }
    }
}

/// Initial values and matrices of a simulation run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default = "default_steps")]
    pub steps: usize,
    pub state: Vec<f64>,
    pub input: Vec<f64>,
    pub mat_a: MatrixConfig,
    pub mat_b: MatrixConfig,
    pub mat_c: MatrixConfig,
    pub mat_d: MatrixConfig,
    /// Where to draw the trajectory, if anywhere.
    #[serde(default)]
    pub plot: Option<PathBuf>,
}

fn default_steps() -> usize {
    10
}

impl Default for ScenarioConfig {
    /// Two states, one input, one output. A is given row-major while the
    /// other matrices use the column-major default.
    fn default() -> Self {
        ScenarioConfig {
            steps: default_steps(),
            state: vec![1.0, 2.0],
            input: vec![0.6],
            mat_a: MatrixConfig::new(vec![0.0, 2.0, -1.0, -3.0], MatrixLayout::RowMajor),
            mat_b: MatrixConfig::new(vec![5.0, 0.0], MatrixLayout::ColumnMajor),
            mat_c: MatrixConfig::new(vec![1.0, 0.0], MatrixLayout::ColumnMajor),
            mat_d: MatrixConfig::new(vec![0.0], MatrixLayout::ColumnMajor),
            plot: None,
        }
    }
}

impl ScenarioConfig {
    /// Builds a model with the scenario's matrices, state and input.
    pub fn build_model<const N: usize, const P: usize, const Q: usize>(
        &self,
    ) -> Result<LinearStateSpaceModel<f64, N, P, Q>, ConfigError> {
        let mut model = LinearStateSpaceModel::new(
            matrix_from_slice("A", &self.mat_a.data, self.mat_a.layout)?,
            matrix_from_slice("B", &self.mat_b.data, self.mat_b.layout)?,
            matrix_from_slice("C", &self.mat_c.data, self.mat_c.layout)?,
            matrix_from_slice("D", &self.mat_d.data, self.mat_d.layout)?,
        );
        model.set_state_from_slice(&self.state)?;
        model.set_input_from_slice(&self.input)?;

        Ok(model)
    }
}

pub fn load_scenario(path: &Path) -> Result<ScenarioConfig, ConfigError> {
    let file = File::open(path)?;
    let scenario: ScenarioConfig = from_reader(file)?;
    Ok(scenario)
}
