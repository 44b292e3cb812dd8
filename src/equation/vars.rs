use crate::mesh::{layered_shape, Field, Grid, SpectralField};
use crate::params::{FlowKind, ParameterSet};
use ndarray::{Array, IxDyn};

/// Buffers for the concentration and its first derivatives in physical and
/// transform space.
///
/// The transform space buffers are scratch space of the right-hand side. An
/// inverse transform destroys its source, so after `gradient_h[i]` has been
/// moved into `gradient[i]` it must not be read again until it is recomputed.
#[derive(Debug, Clone)]
pub struct StateVariables {
    /// Concentration
    pub c: Field,
    /// `d c / d x_i` for every axis `i`
    pub gradient: Vec<Field>,
    pub ch: SpectralField,
    pub gradient_h: Vec<SpectralField>,
    /// Velocity at the current stage time. Only allocated for time varying
    /// flows, which are evaluated afresh for every right-hand side.
    pub velocity: Vec<Field>,
}

impl StateVariables {
    /// Returns zeroed buffers for a state with `ndims` derivatives and
    /// `nvelocity` velocity components. The shapes already include a possible
    /// layer axis.
    pub fn new(
        physical: &[usize],
        spectral: &[usize],
        ndims: usize,
        nvelocity: usize,
    ) -> StateVariables {
        StateVariables {
            c: Array::zeros(IxDyn(physical)),
            gradient: (0..ndims).map(|_| Array::zeros(IxDyn(physical))).collect(),
            ch: Array::zeros(IxDyn(spectral)),
            gradient_h: (0..ndims).map(|_| Array::zeros(IxDyn(spectral))).collect(),
            velocity: (0..nvelocity)
                .map(|_| Array::zeros(IxDyn(physical)))
                .collect(),
        }
    }
}

impl<'f> ParameterSet<'f> {
    /// Shape of physical space buffers, with a trailing layer axis when there
    /// is more than one layer.
    pub fn physical_shape(&self, grid: &Grid) -> Vec<usize> {
        layered_shape(&grid.physical_shape(), self.nlayers())
    }

    /// Shape of transform space buffers and of the solution.
    pub fn spectral_shape(&self, grid: &Grid) -> Vec<usize> {
        layered_shape(&grid.spectral_shape(), self.nlayers())
    }

    pub fn allocate_state(&self, grid: &Grid) -> StateVariables {
        let nvelocity = match *self.flow() {
            FlowKind::TimeVarying(ref u) => u.len(),
            _ => 0,
        };

        StateVariables::new(
            &self.physical_shape(grid),
            &self.spectral_shape(grid),
            self.ndims(),
            nvelocity,
        )
    }
}
