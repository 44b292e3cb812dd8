//! Moves the concentration between its spectral and physical representation.

// Move unit test into own file
#[cfg(test)]
#[path = "./sync_test.rs"]
mod sync_test;

use crate::equation::TracerEquation;
use crate::errors::*;
use crate::mesh::{with_trailing_axes, Field};
use crate::problem::Problem;
use error_chain::bail;

/// Copies the spectral solution into the physical concentration buffer.
///
/// Coupled problems transform with the external solver's transform.
pub fn refresh_physical(problem: &mut Problem) {
    let Problem {
        ref mut equation,
        ref integrator,
    } = *problem;
    let TracerEquation {
        ref grid,
        ref params,
        ref mut vars,
        ..
    } = *equation;

    // the inverse transform destroys its source, so work on a copy
    vars.ch.assign(&integrator.sol);
    params.with_transform(grid, |transform| transform.inverse(&mut vars.c, &mut vars.ch));
}

/// Sets the concentration to `field` and refreshes the physical buffer.
///
/// `field` lives on the spatial grid. With more than one layer every layer
/// gets the same concentration. Afterwards the physical buffer holds the
/// transform round trip of `field`, which equals `field` up to rounding only
/// if it is resolved by the grid.
pub fn set_concentration(problem: &mut Problem, field: &Field) -> Result<()> {
    let expected = problem.grid().physical_shape();
    if field.shape() != &expected[..] {
        bail!(ErrorKind::ShapeMismatch(
            "initial concentration".to_owned(),
            expected,
            field.shape().to_vec(),
        ));
    }

    {
        let Problem {
            ref mut equation,
            ref mut integrator,
        } = *problem;
        let TracerEquation {
            ref grid,
            ref params,
            ref mut vars,
            ..
        } = *equation;

        let ndim = vars.c.ndim();
        vars.c.assign(&with_trailing_axes(field.view(), ndim));
        params.with_transform(grid, |transform| {
            transform.forward(&mut integrator.sol, &vars.c)
        });
    }

    refresh_physical(problem);

    Ok(())
}
