//! Frozen physical parameters of a tracer problem together with the resolved
//! representation of the advecting velocity.

// Move unit test into own file
#[cfg(test)]
#[path = "./params_test.rs"]
mod params_test;

use crate::errors::*;
use crate::flow::turbulent::FlowHandle;
use crate::flow::{sample_velocity, FlowDescriptor, VelocityField, VelocitySource};
use crate::mesh::transform::SpectralTransform;
use crate::mesh::{Field, Grid};
use crate::Float;
use error_chain::bail;
use log::{debug, warn};
use ndarray::{Array, IxDyn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Diffusivities along the axes and the isotropic hyperdiffusivity
/// `kappa_h (-\nabla^2)^{n_kappa_h}`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Diffusivities {
    /// Diffusivity along the first axis.
    #[serde(default)]
    pub kappa: Float,
    /// Diffusivity along the second axis.
    #[serde(default)]
    pub eta: Float,
    /// Diffusivity along the third axis.
    #[serde(default)]
    pub iota: Float,
    #[serde(default)]
    pub kappa_h: Float,
    #[serde(default)]
    pub n_kappa_h: u32,
}

impl Default for Diffusivities {
    fn default() -> Self {
        Diffusivities {
            kappa: 0.,
            eta: 0.,
            iota: 0.,
            kappa_h: 0.,
            n_kappa_h: 0,
        }
    }
}

impl Diffusivities {
    /// Same diffusivity along every axis, no hyperdiffusion.
    pub fn isotropic(kappa: Float) -> Diffusivities {
        Diffusivities {
            kappa,
            eta: kappa,
            iota: kappa,
            ..Default::default()
        }
    }

    pub fn with_hyperdiffusion(self, kappa_h: Float, n_kappa_h: u32) -> Diffusivities {
        Diffusivities {
            kappa_h,
            n_kappa_h,
            ..self
        }
    }

    /// Diffusivity along `axis`.
    pub fn along(&self, axis: usize) -> Float {
        match axis {
            0 => self.kappa,
            1 => self.eta,
            _ => self.iota,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let all = [self.kappa, self.eta, self.iota, self.kappa_h];
        if all.iter().any(|d| !(d.is_finite() && *d >= 0.)) {
            bail!(ErrorKind::Validation(format!(
                "diffusivities must be finite and non-negative, got {:?}",
                self
            )));
        }

        if (self.kappa_h == 0.) != (self.n_kappa_h == 0) {
            warn!(
                "Hyperdiffusivity {} with order {} degenerates.",
                self.kappa_h, self.n_kappa_h
            );
        }

        Ok(())
    }
}

/// The advecting flow as seen by the right-hand side.
#[derive(Clone)]
pub enum FlowKind<'f> {
    /// Analytic velocity, evaluated afresh at every right-hand side call.
    TimeVarying(Vec<Arc<dyn VelocityField>>),
    /// Velocity sampled once at the physical grid points.
    Steady(Vec<Field>),
    /// Velocity of an external flow solver.
    Turbulent {
        flow: FlowHandle<'f>,
        nlayers: usize,
    },
}

impl<'f> FlowKind<'f> {
    pub fn name(&self) -> &'static str {
        match *self {
            FlowKind::TimeVarying(_) => "time varying",
            FlowKind::Steady(_) => "steady",
            FlowKind::Turbulent { .. } => "turbulent",
        }
    }
}

#[derive(Clone)]
pub struct ParameterSet<'f> {
    ndims: usize,
    diffusivities: Diffusivities,
    flow: FlowKind<'f>,
}

impl<'f> fmt::Debug for ParameterSet<'f> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ParameterSet")
            .field("ndims", &self.ndims)
            .field("diffusivities", &self.diffusivities)
            .field("flow", &self.flow.name())
            .finish()
    }
}

/// Samples `f` at every physical grid point at `t = 0`.
fn sample(grid: &Grid, f: &dyn VelocityField) -> Field {
    let mut u = Array::zeros(IxDyn(grid.grid_size()));
    sample_velocity(grid, f, 0., &mut u);
    u
}

impl ParameterSet<'static> {
    /// Resolves `flow` on `grid`. Steady analytic flows are sampled here and
    /// their functions dropped.
    pub fn from_descriptor(
        flow: FlowDescriptor,
        grid: &Grid,
        diffusivities: Diffusivities,
    ) -> Result<ParameterSet<'static>> {
        diffusivities.validate()?;

        if flow.ndims() != grid.ndims() {
            bail!(ErrorKind::Validation(format!(
                "flow has {} velocity components but the grid has {} axes",
                flow.ndims(),
                grid.ndims()
            )));
        }

        let steady = flow.is_steady();
        let flow = match flow.into_source() {
            VelocitySource::Sampled(velocities) => {
                for (axis, u) in velocities.iter().enumerate() {
                    if u.shape() != grid.grid_size() {
                        bail!(ErrorKind::ShapeMismatch(
                            format!("velocity component {}", axis),
                            grid.physical_shape(),
                            u.shape().to_vec(),
                        ));
                    }
                }
                FlowKind::Steady(velocities)
            }
            VelocitySource::Analytic(functions) => {
                if steady {
                    debug!("Sampling steady velocity on a {:?} grid.", grid.grid_size());
                    FlowKind::Steady(functions.iter().map(|f| sample(grid, f.as_ref())).collect())
                } else {
                    FlowKind::TimeVarying(functions)
                }
            }
        };

        Ok(ParameterSet {
            ndims: grid.ndims(),
            diffusivities,
            flow,
        })
    }
}

impl<'f> ParameterSet<'f> {
    /// Parameters of a tracer advected by an external flow solver. The
    /// release time is the one `flow` was released with, see
    /// `FlowHandle::release`.
    pub fn turbulent(
        flow: FlowHandle<'f>,
        diffusivities: Diffusivities,
    ) -> Result<ParameterSet<'f>> {
        diffusivities.validate()?;

        let (ndims, nlayers) = {
            let solver = flow.read();
            (solver.grid().ndims(), solver.nlayers())
        };

        if nlayers == 0 {
            bail!(ErrorKind::Validation(
                "external flow reports zero layers".to_owned()
            ));
        }

        Ok(ParameterSet {
            ndims,
            diffusivities,
            flow: FlowKind::Turbulent { flow, nlayers },
        })
    }

    pub fn ndims(&self) -> usize {
        self.ndims
    }

    pub fn diffusivities(&self) -> &Diffusivities {
        &self.diffusivities
    }

    pub fn flow(&self) -> &FlowKind<'f> {
        &self.flow
    }

    /// Number of layers of the state. One unless coupled to a multi-layer
    /// flow.
    pub fn nlayers(&self) -> usize {
        match self.flow {
            FlowKind::Turbulent { nlayers, .. } => nlayers,
            _ => 1,
        }
    }

    /// Runs `f` with the transform provider of this problem: the grid's own
    /// plan, or the external solver's transform when coupled to one.
    pub fn with_transform<R, F>(&self, grid: &Grid, f: F) -> R
    where
        F: FnOnce(&dyn SpectralTransform) -> R,
    {
        match self.flow {
            FlowKind::Turbulent { ref flow, .. } => {
                let solver = flow.read();
                f(solver.transform())
            }
            _ => f(grid.transform()),
        }
    }
}

/// The release time has to be a finite, non-negative number.
pub fn check_release_time(tracer_release_time: Float) -> Result<()> {
    if !(tracer_release_time.is_finite() && tracer_release_time >= 0.) {
        bail!(ErrorKind::Validation(format!(
            "tracer release time must be finite and non-negative, got {}",
            tracer_release_time
        )));
    }
    Ok(())
}
