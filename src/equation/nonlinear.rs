//! Advective term of the tracer equation.
//!
//! For every evaluation of the right-hand side the spectral concentration is
//! differentiated along every axis, the derivatives are moved to physical
//! space, multiplied with the velocity and summed up, and the result is moved
//! back to transform space. Nothing is dealiased or filtered here.

// Move unit test into own file
#[cfg(test)]
#[path = "./nonlinear_test.rs"]
mod nonlinear_test;

use super::vars::StateVariables;
use crate::flow::turbulent::FlowSolver;
use crate::flow::{sample_velocity, VelocityField};
use crate::mesh::transform::SpectralTransform;
use crate::mesh::{with_trailing_axes, Field, Grid, SpectralField};
use crate::params::{FlowKind, ParameterSet};
use crate::Float;
use ndarray::Zip;
use num_complex::Complex;
use std::sync::Arc;

/// Writes `i k_axis sol` into `gradient_h[axis]` for every axis.
fn spectral_gradient(grid: &Grid, sol: &SpectralField, vars: &mut StateVariables) {
    for (axis, dh) in vars.gradient_h.iter_mut().enumerate() {
        let k = with_trailing_axes(grid.k_mesh(axis), sol.ndim());
        Zip::from(dh)
            .and(sol)
            .and_broadcast(&k)
            .par_for_each(|d, &s, &k| *d = Complex::new(0., k) * s);
    }
}

/// Moves every derivative to physical space.
///
/// CAUTION: Destroys `vars.gradient_h`.
fn gradient_to_physical(transform: &dyn SpectralTransform, vars: &mut StateVariables) {
    for (d, dh) in vars.gradient.iter_mut().zip(vars.gradient_h.iter_mut()) {
        transform.inverse(d, dh);
    }
}

/// Overwrites `gradient[0]` with `-sum_i u_i d c / d x_i` for a velocity
/// sampled on the grid.
fn combine(velocity: &[Field], gradient: &mut [Field]) {
    let (flux, rest) = gradient.split_at_mut(1);
    let flux = &mut flux[0];

    Zip::from(&mut *flux)
        .and(&velocity[0])
        .par_for_each(|f, &u| *f *= -u);

    for (g, u) in rest.iter().zip(velocity[1..].iter()) {
        Zip::from(&mut *flux)
            .and(g)
            .and(u)
            .par_for_each(|f, &g, &u| *f -= u * g);
    }
}

/// Samples the velocity at the stage time `t` into `vars.velocity` and
/// overwrites `gradient[0]` with `-sum_i u_i(x, t) d c / d x_i`.
fn advect_time_varying(
    grid: &Grid,
    velocity: &[Arc<dyn VelocityField>],
    t: Float,
    vars: &mut StateVariables,
) {
    for (out, u) in vars.velocity.iter_mut().zip(velocity.iter()) {
        sample_velocity(grid, u.as_ref(), t, out);
    }
    combine(&vars.velocity, &mut vars.gradient);
}

/// Overwrites `gradient[0]` with `-sum_i u_i d c / d x_i` using the current
/// velocity of an external solver. Its background flow is added to the first
/// velocity component.
fn advect_turbulent(solver: &dyn FlowSolver, vars: &mut StateVariables) {
    let (flux, rest) = vars.gradient.split_at_mut(1);
    let flux = &mut flux[0];

    match solver.background_flow() {
        Some(background) => {
            let background = with_trailing_axes(background.view(), flux.ndim());
            Zip::from(&mut *flux)
                .and(solver.velocity(0))
                .and_broadcast(&background)
                .par_for_each(|f, &u, &ub| *f *= -(u + ub));
        }
        None => {
            Zip::from(&mut *flux)
                .and(solver.velocity(0))
                .par_for_each(|f, &u| *f *= -u);
        }
    }

    for (axis, g) in rest.iter().enumerate() {
        Zip::from(&mut *flux)
            .and(g)
            .and(solver.velocity(axis + 1))
            .par_for_each(|f, &g, &u| *f -= u * g);
    }
}

/// The full advective step, with the velocity supplied by `advect`.
fn advective_term<A>(
    out: &mut SpectralField,
    sol: &SpectralField,
    grid: &Grid,
    transform: &dyn SpectralTransform,
    vars: &mut StateVariables,
    advect: A,
) where
    A: FnOnce(&mut StateVariables),
{
    spectral_gradient(grid, sol, vars);
    gradient_to_physical(transform, vars);
    advect(vars);
    transform.forward(out, &vars.gradient[0]);
}

impl<'f> ParameterSet<'f> {
    /// Writes the transform of `-u . grad c` for the spectral concentration
    /// `sol` at time `t` into `out`.
    ///
    /// The buffers in `vars` are used as scratch space. Shapes are assumed to
    /// be consistent; they are checked when the problem is built.
    ///
    /// # Panics
    /// If the shapes of the external solver's velocity changed since the
    /// problem was built, or the solver is mutably borrowed elsewhere.
    pub fn evaluate_nonlinear_term(
        &self,
        out: &mut SpectralField,
        sol: &SpectralField,
        t: Float,
        vars: &mut StateVariables,
        grid: &Grid,
    ) {
        match *self.flow() {
            FlowKind::TimeVarying(ref velocity) => {
                advective_term(out, sol, grid, grid.transform(), vars, |vars| {
                    advect_time_varying(grid, velocity, t, vars)
                })
            }
            FlowKind::Steady(ref velocity) => {
                advective_term(out, sol, grid, grid.transform(), vars, |vars| {
                    combine(velocity, &mut vars.gradient)
                })
            }
            FlowKind::Turbulent { ref flow, .. } => {
                let solver = flow.read();
                let solver: &dyn FlowSolver = &*solver;
                advective_term(out, sol, grid, solver.transform(), vars, |vars| {
                    advect_turbulent(solver, vars)
                })
            }
        }
    }
}
