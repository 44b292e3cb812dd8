//! Explicit time steppers for equations of the form
//!
//! ```latex
//!     \partial_t \hat c = L \hat c + N(\hat c, t)
//! ```
//!
//! with a diagonal linear operator `L`.


pub mod filter;

use self::filter::spectral_filter;
use crate::errors::*;
use crate::mesh::{with_trailing_axes, Grid, SpectralField};
use crate::Float;
use ndarray::{Array, ArrayD, ArrayViewD, IxDyn, Zip};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Simulation time and timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    pub t: Float,
    pub dt: Float,
    /// count timesteps
    pub step: usize,
}

impl Clock {
    pub fn new(t: Float, dt: Float) -> Clock {
        Clock { t, dt, step: 0 }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Stepper {
    ForwardEuler,
    RK4,
    FilteredForwardEuler,
    FilteredRK4,
}

impl Stepper {
    pub fn name(&self) -> &'static str {
        match *self {
            Stepper::ForwardEuler => "ForwardEuler",
            Stepper::RK4 => "RK4",
            Stepper::FilteredForwardEuler => "FilteredForwardEuler",
            Stepper::FilteredRK4 => "FilteredRK4",
        }
    }

    pub fn is_filtered(&self) -> bool {
        match *self {
            Stepper::FilteredForwardEuler | Stepper::FilteredRK4 => true,
            Stepper::ForwardEuler | Stepper::RK4 => false,
        }
    }
}

impl fmt::Display for Stepper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Stepper {
    type Err = Error;

    fn from_str(s: &str) -> Result<Stepper> {
        match s {
            "ForwardEuler" => Ok(Stepper::ForwardEuler),
            "RK4" => Ok(Stepper::RK4),
            "FilteredForwardEuler" => Ok(Stepper::FilteredForwardEuler),
            "FilteredRK4" => Ok(Stepper::FilteredRK4),
            _ => Err(ErrorKind::Validation(format!("unknown stepper '{}'", s)).into()),
        }
    }
}

/// An equation that can be stepped forward.
pub trait RightHandSide {
    /// Diagonal linear operator, one entry per mode of the solution.
    fn linear(&self) -> ArrayViewD<Float>;

    /// Writes the nonlinear term for the state `sol` at time `t` into `out`.
    fn nonlinear(&mut self, out: &mut SpectralField, sol: &SpectralField, t: Float);
}

/// Writes `L sol + N(sol, t)` into `out`.
pub fn rhs<E: RightHandSide>(eq: &mut E, out: &mut SpectralField, sol: &SpectralField, t: Float) {
    eq.nonlinear(out, sol, t);
    Zip::from(out)
        .and(sol)
        .and(&eq.linear())
        .par_for_each(|n, &s, &l| *n += s * l);
}

#[derive(Debug, Clone)]
struct Rk4Scratch {
    sol1: SpectralField,
    k1: SpectralField,
    k2: SpectralField,
    k3: SpectralField,
    k4: SpectralField,
}

#[derive(Debug, Clone)]
enum Scratch {
    ForwardEuler(SpectralField),
    RK4(Box<Rk4Scratch>),
}

/// Holds the solution, the clock and the buffers of the stepper.
#[derive(Debug, Clone)]
pub struct Integrator {
    pub sol: SpectralField,
    pub clock: Clock,
    stepper: Stepper,
    scratch: Scratch,
    filter: Option<ArrayD<Float>>,
}

impl Integrator {
    /// Returns an integrator for a solution of `shape` on `grid`. The shape may
    /// have more axes than the grid, e.g. for layers; the filter is repeated
    /// along them.
    pub fn new(shape: &[usize], clock: Clock, stepper: Stepper, grid: &Grid) -> Integrator {
        let zeros = || Array::zeros(IxDyn(shape));

        let scratch = match stepper {
            Stepper::ForwardEuler | Stepper::FilteredForwardEuler => Scratch::ForwardEuler(zeros()),
            Stepper::RK4 | Stepper::FilteredRK4 => Scratch::RK4(Box::new(Rk4Scratch {
                sol1: zeros(),
                k1: zeros(),
                k2: zeros(),
                k3: zeros(),
                k4: zeros(),
            })),
        };

        let filter = if stepper.is_filtered() {
            let f = spectral_filter(grid);
            let mut layered: ArrayD<Float> = Array::zeros(IxDyn(shape));
            layered.assign(&with_trailing_axes(f.view(), shape.len()));
            Some(layered)
        } else {
            None
        };

        Integrator {
            sol: zeros(),
            clock,
            stepper,
            scratch,
            filter,
        }
    }

    pub fn stepper(&self) -> Stepper {
        self.stepper
    }

    pub fn filter(&self) -> Option<&ArrayD<Float>> {
        self.filter.as_ref()
    }

    /// Advances the solution by `nsteps` timesteps.
    pub fn step_forward<E: RightHandSide>(&mut self, eq: &mut E, nsteps: usize) {
        for _ in 0..nsteps {
            self.step(eq);
        }
    }

    fn step<E: RightHandSide>(&mut self, eq: &mut E) {
        let t = self.clock.t;
        let dt = self.clock.dt;

        match self.scratch {
            Scratch::ForwardEuler(ref mut n) => {
                rhs(eq, n, &self.sol, t);
                Zip::from(&mut self.sol)
                    .and(&*n)
                    .par_for_each(|s, &n| *s += n * dt);
            }
            Scratch::RK4(ref mut s) => rk4_step(eq, &mut self.sol, t, dt, s),
        }

        if let Some(ref filter) = self.filter {
            Zip::from(&mut self.sol)
                .and(filter)
                .par_for_each(|s, &f| *s *= f);
        }

        self.clock.t += dt;
        self.clock.step += 1;
    }
}

fn rk4_step<E: RightHandSide>(
    eq: &mut E,
    sol: &mut SpectralField,
    t: Float,
    dt: Float,
    s: &mut Rk4Scratch,
) {
    let half = dt / 2.;

    rhs(eq, &mut s.k1, sol, t);
    Zip::from(&mut s.sol1)
        .and(&*sol)
        .and(&s.k1)
        .par_for_each(|s1, &s, &k| *s1 = s + k * half);

    rhs(eq, &mut s.k2, &s.sol1, t + half);
    Zip::from(&mut s.sol1)
        .and(&*sol)
        .and(&s.k2)
        .par_for_each(|s1, &s, &k| *s1 = s + k * half);

    rhs(eq, &mut s.k3, &s.sol1, t + half);
    Zip::from(&mut s.sol1)
        .and(&*sol)
        .and(&s.k3)
        .par_for_each(|s1, &s, &k| *s1 = s + k * dt);

    rhs(eq, &mut s.k4, &s.sol1, t + dt);

    let sixth = dt / 6.;
    Zip::from(sol)
        .and(&s.k1)
        .and(&s.k2)
        .and(&s.k3)
        .and(&s.k4)
        .par_for_each(|s, &k1, &k2, &k3, &k4| *s += (k1 + (k2 + k3) * 2. + k4) * sixth);
}
