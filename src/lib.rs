//! This crate evaluates the right-hand side of the passive tracer
//! advection-diffusion equation
//!
//! ```latex
//!     \partial_t c + u \cdot \nabla c = \kappa \partial_x^2 c + \eta \partial_y^2 c
//!         + \iota \partial_z^2 c - \kappa_h (-\nabla^2)^{n_h} c
//! ```
//!
//! on a periodic box in one, two or three dimensions with a Fourier
//! pseudospectral method. The diffusive part is a frozen diagonal operator in
//! Fourier space (`equation::linear`), the advective part is evaluated every
//! time the integrator asks for it (`equation::nonlinear`).
//!
//! The advecting flow is either an analytic time dependent field, a steady
//! field sampled once on the grid, or the velocity of an externally owned
//! multi-layer flow solver (`flow::turbulent`).

#![recursion_limit = "1024"]

#[cfg(test)]
#[macro_use]
extern crate quickcheck;

pub mod consts;
pub mod equation;
pub mod flow;
pub mod integrators;
pub mod mesh;
pub mod params;
pub mod problem;
pub mod settings;
pub mod sync;
#[cfg(test)]
mod test_helper;

pub use crate::flow::turbulent::FlowSolver;
pub use crate::flow::{FlowDescriptor, VelocityField, ZeroVelocity};
pub use crate::integrators::Stepper;
pub use crate::params::{Diffusivities, ParameterSet};
pub use crate::problem::{make_problem, make_turbulent_problem, Problem};
pub use crate::settings::{read_parameter_file, Settings, TurbulentSettings};
pub use crate::sync::{refresh_physical, set_concentration};

#[cfg(feature = "single")]
pub type Float = f32;
#[cfg(not(feature = "single"))]
pub type Float = f64;

pub mod errors {
    use error_chain::error_chain;

    // Create the Error, ErrorKind, ResultExt, and Result types
    error_chain! {
        foreign_links {
            Io(::std::io::Error);
            Toml(::toml::de::Error);
        }

        errors {
            Validation(msg: String) {
                description("invalid problem configuration")
                display("invalid problem configuration: {}", msg)
            }
            ShapeMismatch(what: String, expected: Vec<usize>, found: Vec<usize>) {
                description("array shape mismatch")
                display("shape of {} is {:?}, expected {:?}", what, found, expected)
            }
        }
    }
}
