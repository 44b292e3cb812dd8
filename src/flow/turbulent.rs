//! Coupling to a flow that is simulated by somebody else, e.g. a multi-layer
//! quasi-geostrophic solver.
//!
//! The solver is owned by the caller. The tracer only holds a `FlowHandle`,
//! which advances the solver exactly once, up to the tracer release time, and
//! afterwards reads from it without mutating.

// Move unit test into own file
#[cfg(test)]
#[path = "./turbulent_test.rs"]
mod turbulent_test;

use crate::errors::*;
use crate::mesh::transform::SpectralTransform;
use crate::mesh::{Field, Grid};
use crate::params::check_release_time;
use crate::Float;
use error_chain::bail;
use log::info;
use std::cell::{Ref, RefCell};
use std::fmt;

/// What the tracer needs to know about an external flow solver.
pub trait FlowSolver {
    /// Grid the solver lives on. The tracer uses the same grid.
    fn grid(&self) -> &Grid;

    fn nlayers(&self) -> usize;

    /// Current simulation time of the solver.
    fn clock(&self) -> Float;

    fn timestep(&self) -> Float;

    /// Advances the solver by exactly `dt`.
    fn step_forward(&mut self, dt: Float);

    /// Current velocity along `axis` in physical space. For more than one
    /// layer the array has a trailing layer axis.
    fn velocity(&self, axis: usize) -> &Field;

    /// Background flow added to the velocity along the first axis. It has to
    /// broadcast against `velocity(0)`.
    fn background_flow(&self) -> Option<&Field> {
        None
    }

    /// The solver's own transform. All transforms of a coupled tracer go
    /// through it.
    fn transform(&self) -> &dyn SpectralTransform;
}

/// Non-owning handle to an external flow solver.
#[derive(Clone, Copy)]
pub struct FlowHandle<'f> {
    solver: &'f RefCell<dyn FlowSolver + 'f>,
    release_time: Float,
}

impl<'f> fmt::Debug for FlowHandle<'f> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FlowHandle")
            .field("release_time", &self.release_time)
            .finish()
    }
}

impl<'f> FlowHandle<'f> {
    /// Advances `solver` by `release_time` and returns a read-only handle to
    /// it. This is the only place the tracer ever mutates the solver.
    ///
    /// The solver takes whole timesteps as long as they do not overshoot and
    /// one shorter step to land on the target, so its clock ends up at exactly
    /// `t0 + release_time`. Fails without stepping for a negative or infinite
    /// release time, and stops with an error if a step leaves the solver's
    /// clock unchanged.
    ///
    /// # Panics
    /// If the solver is borrowed elsewhere.
    pub fn release(
        solver: &'f RefCell<dyn FlowSolver + 'f>,
        release_time: Float,
    ) -> Result<FlowHandle<'f>> {
        check_release_time(release_time)?;

        if release_time > 0. {
            let mut s = solver.borrow_mut();
            let t0 = s.clock();
            let target = t0 + release_time;
            let dt = s.timestep();

            if !(dt.is_finite() && dt > 0.) {
                bail!(ErrorKind::Validation(format!(
                    "external flow timestep must be finite and positive, got {}",
                    dt
                )));
            }

            info!(
                "Advancing external flow from t = {} to tracer release at t = {}.",
                t0, target
            );

            let mut steps = 0;
            while s.clock() + dt < target {
                let before = s.clock();
                s.step_forward(dt);
                steps += 1;

                if !(s.clock() > before) {
                    bail!(ErrorKind::Validation(format!(
                        "external flow did not advance from t = {} with dt = {} \
                         after {} steps",
                        before, dt, steps
                    )));
                }
            }

            let rest = target - s.clock();
            if rest > 0. {
                s.step_forward(rest);
                steps += 1;
            }

            info!("External flow reached t = {} after {} steps.", s.clock(), steps);
        }

        Ok(FlowHandle {
            solver,
            release_time,
        })
    }

    /// Time the solver was advanced by before the tracer was released.
    pub fn release_time(&self) -> Float {
        self.release_time
    }

    /// Read access to the solver.
    ///
    /// # Panics
    /// If the caller holds a mutable borrow of the solver at the same time.
    pub fn read(&self) -> Ref<'f, dyn FlowSolver + 'f> {
        let solver: &'f RefCell<dyn FlowSolver + 'f> = self.solver;
        solver.borrow()
    }
}
