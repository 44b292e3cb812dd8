//! Assembles grid, parameters, state buffers, linear operator and integrator
//! into one runnable tracer problem.

// Move unit test into own file
#[cfg(test)]
#[path = "./problem_test.rs"]
mod problem_test;

use crate::equation::linear::LinearOperator;
use crate::equation::vars::StateVariables;
use crate::equation::TracerEquation;
use crate::errors::*;
use crate::flow::turbulent::{FlowHandle, FlowSolver};
use crate::flow::FlowDescriptor;
use crate::integrators::{Clock, Integrator, Stepper};
use crate::mesh::{layered_shape, with_trailing_axes, Field, Grid, SpectralField};
use crate::params::{check_release_time, ParameterSet};
use crate::settings::{check_settings, Settings, TurbulentSettings};
use error_chain::bail;
use log::info;
use ndarray::IxDyn;
use std::cell::RefCell;

/// A tracer equation together with its integrator.
#[derive(Debug, Clone)]
pub struct Problem<'f> {
    pub(crate) equation: TracerEquation<'f>,
    pub(crate) integrator: Integrator,
}

impl<'f> Problem<'f> {
    /// Wires `params` on `grid` with a fresh integrator. The solution starts
    /// out zero.
    pub fn new(grid: Grid, params: ParameterSet<'f>, clock: Clock, stepper: Stepper) -> Problem<'f> {
        info!(
            "Assembling {}d tracer problem with {} flow, {} layer(s) on a {:?} grid using {}.",
            params.ndims(),
            params.flow().name(),
            params.nlayers(),
            grid.grid_size(),
            stepper
        );

        let shape = params.spectral_shape(&grid);
        let integrator = Integrator::new(&shape, clock, stepper, &grid);
        let equation = TracerEquation::new(grid, params);

        Problem {
            equation,
            integrator,
        }
    }

    /// Advances the spectral solution by `nsteps` timesteps. The physical
    /// buffers are not updated, see `refresh_physical`.
    pub fn step_forward(&mut self, nsteps: usize) {
        self.integrator.step_forward(&mut self.equation, nsteps);
    }

    pub fn clock(&self) -> &Clock {
        &self.integrator.clock
    }

    pub fn stepper(&self) -> Stepper {
        self.integrator.stepper()
    }

    /// Spectral concentration.
    pub fn solution(&self) -> &SpectralField {
        &self.integrator.sol
    }

    /// Physical concentration as of the last `refresh_physical`.
    pub fn concentration(&self) -> &Field {
        &self.equation.vars.c
    }

    pub fn grid(&self) -> &Grid {
        &self.equation.grid
    }

    pub fn params(&self) -> &ParameterSet<'f> {
        &self.equation.params
    }

    pub fn vars(&self) -> &StateVariables {
        &self.equation.vars
    }

    pub fn linear_operator(&self) -> &LinearOperator {
        &self.equation.linear
    }
}

/// Builds a tracer problem on a fresh grid described by `settings`, advected
/// by `flow`. The clock starts at zero.
pub fn make_problem(flow: FlowDescriptor, settings: &Settings) -> Result<Problem<'static>> {
    check_settings(settings)?;

    let sim = &settings.simulation;

    if flow.ndims() != sim.grid_size.len() {
        bail!(ErrorKind::Validation(format!(
            "flow has {} velocity components but {} grid axes were requested",
            flow.ndims(),
            sim.grid_size.len()
        )));
    }

    let grid = Grid::new(&sim.grid_size, &sim.box_size)?;
    let params = ParameterSet::from_descriptor(flow, &grid, settings.parameters)?;

    Ok(Problem::new(
        grid,
        params,
        Clock::new(0., sim.timestep),
        sim.stepper,
    ))
}

/// Checks everything the right-hand side later assumes about the external
/// solver.
fn check_flow_solver(solver: &dyn FlowSolver) -> Result<()> {
    let nlayers = solver.nlayers();
    if nlayers == 0 {
        bail!(ErrorKind::Validation(
            "external flow reports zero layers".to_owned()
        ));
    }

    let dt = solver.timestep();
    if !(dt.is_finite() && dt > 0.) {
        bail!(ErrorKind::Validation(format!(
            "external flow has an invalid timestep {}",
            dt
        )));
    }

    let grid = solver.grid();
    let expected = layered_shape(&grid.physical_shape(), nlayers);

    for axis in 0..grid.ndims() {
        let u = solver.velocity(axis);
        if u.shape() != &expected[..] {
            bail!(ErrorKind::ShapeMismatch(
                format!("external velocity component {}", axis),
                expected,
                u.shape().to_vec(),
            ));
        }
    }

    if let Some(background) = solver.background_flow() {
        let b = with_trailing_axes(background.view(), expected.len());
        if b.broadcast(IxDyn(&expected)).is_none() {
            bail!(ErrorKind::ShapeMismatch(
                "background flow".to_owned(),
                expected,
                background.shape().to_vec(),
            ));
        }
    }

    Ok(())
}

/// Builds a tracer problem advected by the external solver `flow`.
///
/// The solver is first advanced by `settings.tracer_release_time`, exactly,
/// and the tracer clock starts where the solver ends up. Grid and timestep are
/// taken from the solver. Nothing is advanced if any check fails.
///
/// # Panics
/// If `flow` is borrowed elsewhere while the problem is assembled.
pub fn make_turbulent_problem<'f, F>(
    flow: &'f RefCell<F>,
    settings: &TurbulentSettings,
) -> Result<Problem<'f>>
where
    F: FlowSolver + 'f,
{
    check_release_time(settings.tracer_release_time)?;
    settings.parameters.validate()?;

    let grid = {
        let solver = flow.borrow();
        check_flow_solver(&*solver)?;
        solver.grid().clone()
    };

    let solver: &'f RefCell<dyn FlowSolver + 'f> = flow;
    let handle = FlowHandle::release(solver, settings.tracer_release_time)?;
    let params = ParameterSet::turbulent(handle, settings.parameters)?;

    let clock = {
        let solver = handle.read();
        Clock::new(solver.clock(), solver.timestep())
    };

    Ok(Problem::new(grid, params, clock, settings.stepper))
}
