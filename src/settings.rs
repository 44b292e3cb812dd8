//! This module handles a TOML settings file.

use crate::errors::*;
use crate::integrators::Stepper;
use crate::params::Diffusivities;
use crate::Float;
use error_chain::bail;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::prelude::*;

const DEFAULT_STEPPER: Stepper = Stepper::RK4;
const DEFAULT_TURBULENT_STEPPER: Stepper = Stepper::FilteredRK4;

/// Structure that holds settings, which are defined externally in a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub parameters: Diffusivities,
}

/// Holds simulation specific settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSettings {
    /// Number of grid points along every axis.
    pub grid_size: Vec<usize>,
    /// Length of the periodic box along every axis.
    pub box_size: Vec<Float>,
    pub timestep: Float,
    #[serde(default = "default_stepper")]
    pub stepper: Stepper,
}

/// Default stepper
fn default_stepper() -> Stepper {
    DEFAULT_STEPPER
}

impl Settings {
    pub fn new(
        grid_size: &[usize],
        box_size: &[Float],
        timestep: Float,
        parameters: Diffusivities,
    ) -> Settings {
        Settings {
            simulation: SimulationSettings {
                grid_size: grid_size.to_vec(),
                box_size: box_size.to_vec(),
                timestep,
                stepper: DEFAULT_STEPPER,
            },
            parameters,
        }
    }

    pub fn with_stepper(mut self, stepper: Stepper) -> Settings {
        self.simulation.stepper = stepper;
        self
    }
}

/// Settings of a tracer that is advected by an external flow solver. Grid and
/// timestep are taken from the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurbulentSettings {
    #[serde(default)]
    pub parameters: Diffusivities,
    #[serde(default = "default_turbulent_stepper")]
    pub stepper: Stepper,
    /// Time the flow is advanced before the tracer is released.
    #[serde(default)]
    pub tracer_release_time: Float,
}

/// Default stepper for turbulent coupling
fn default_turbulent_stepper() -> Stepper {
    DEFAULT_TURBULENT_STEPPER
}

impl TurbulentSettings {
    pub fn new(parameters: Diffusivities, tracer_release_time: Float) -> TurbulentSettings {
        TurbulentSettings {
            parameters,
            stepper: DEFAULT_TURBULENT_STEPPER,
            tracer_release_time,
        }
    }
}

/// Reads the content of a file `filename` into an string and return it.
fn read_from_file(filename: &str) -> Result<String> {
    let mut f = File::open(filename).chain_err(|| "Unable to open file.")?;
    let mut content = String::new();

    f.read_to_string(&mut content)
        .chain_err(|| "Unable to read file.")?;

    Ok(content)
}

/// Reads content of a file `param_file`, that should point to a valid TOML
/// file, and parses it.
/// Then returns the deserialized data in form of a Settings struct.
pub fn read_parameter_file(param_file: &str) -> Result<Settings> {
    let toml_string = read_from_file(param_file).chain_err(|| "Unable to read parameter file.")?;

    let settings: Settings =
        toml::from_str(&toml_string).chain_err(|| "Unable to parse parameter file.")?;

    check_settings(&settings)?;

    Ok(settings)
}

pub(crate) fn check_settings(s: &Settings) -> Result<()> {
    let dt = s.simulation.timestep;

    if !(dt.is_finite() && dt > 0.) {
        bail!(ErrorKind::Validation(format!(
            "timestep must be finite and positive, got {}",
            dt
        )));
    }

    Ok(())
}
