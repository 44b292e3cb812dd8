//! Right-hand side of the tracer equation, split into the frozen linear
//! operator and the advective term.

pub mod linear;
pub mod nonlinear;
pub mod vars;

use self::linear::LinearOperator;
use self::vars::StateVariables;
use crate::integrators::RightHandSide;
use crate::mesh::{Grid, SpectralField};
use crate::params::ParameterSet;
use crate::Float;
use ndarray::ArrayViewD;

/// Everything needed to evaluate the right-hand side of one tracer problem.
#[derive(Debug, Clone)]
pub struct TracerEquation<'f> {
    pub grid: Grid,
    pub params: ParameterSet<'f>,
    pub vars: StateVariables,
    pub linear: LinearOperator,
}

impl<'f> TracerEquation<'f> {
    pub fn new(grid: Grid, params: ParameterSet<'f>) -> TracerEquation<'f> {
        let vars = params.allocate_state(&grid);
        let linear = params.build_linear_operator(&grid);

        TracerEquation {
            grid,
            params,
            vars,
            linear,
        }
    }
}

impl<'f> RightHandSide for TracerEquation<'f> {
    fn linear(&self) -> ArrayViewD<Float> {
        self.linear.view()
    }

    fn nonlinear(&mut self, out: &mut SpectralField, sol: &SpectralField, t: Float) {
        self.params
            .evaluate_nonlinear_term(out, sol, t, &mut self.vars, &self.grid);
    }
}
