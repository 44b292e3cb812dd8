// Move unit test into own file
#[cfg(test)]
#[path = "./linear_test.rs"]
mod linear_test;

use crate::mesh::{with_trailing_axes, Grid};
use crate::params::ParameterSet;
use crate::Float;
use log::debug;
use ndarray::{Array, ArrayD, IxDyn, Zip};

/// Diagonal linear operator in transform space, one real decay rate per mode.
pub type LinearOperator = ArrayD<Float>;

impl<'f> ParameterSet<'f> {
    /// Builds the dissipation operator
    ///
    /// ```latex
    ///     L(k) = - \kappa k_x^2 - \eta k_y^2 - \iota k_z^2 - \kappa_h |k|^{2 n_h}
    /// ```
    ///
    /// where only the axes of the grid contribute. The operator does not depend
    /// on the flow. For a layered state the same operator is repeated for every
    /// layer.
    pub fn build_linear_operator(&self, grid: &Grid) -> LinearOperator {
        let d = self.diffusivities();
        let mut l: ArrayD<Float> = Array::zeros(IxDyn(&grid.spectral_shape()));

        for axis in 0..grid.ndims() {
            let coeff = d.along(axis);
            Zip::from(&mut l)
                .and(&grid.k_mesh(axis))
                .for_each(|l, &k| *l -= coeff * k * k);
        }

        let ksq = grid.k_squared();
        let n = d.n_kappa_h as i32;
        Zip::from(&mut l)
            .and(&ksq)
            .for_each(|l, &ksq| *l -= d.kappa_h * ksq.powi(n));

        debug!(
            "Built linear operator for {} layer(s) with {:?}.",
            self.nlayers(),
            d
        );

        let shape = self.spectral_shape(grid);
        if shape.len() == l.ndim() {
            return l;
        }

        let mut stacked: LinearOperator = Array::zeros(IxDyn(&shape));
        stacked.assign(&with_trailing_axes(l.view(), shape.len()));
        stacked
    }
}
