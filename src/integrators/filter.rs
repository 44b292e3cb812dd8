use crate::consts::{FILTER_TOLERANCE, PI};
use crate::mesh::Grid;
use crate::Float;
use ndarray::{Array, ArrayD, IxDyn, Zip};

const FILTER_ORDER: i32 = 4;
const INNER_K: Float = 0.65;
const OUTER_K: Float = 1.;

/// Returns an exponential high-wavenumber filter on the spectral grid.
///
/// With the wavenumber normalized to the Nyquist wavenumber of every axis,
/// `K = sqrt(sum_i (k_i dx_i / pi)^2)`, the filter is one for `K <= 0.65` and
/// decays like `exp(-a (K - 0.65)^4)` above, reaching `1e-15` at `K = 1`.
pub fn spectral_filter(grid: &Grid) -> ArrayD<Float> {
    let decay = -FILTER_TOLERANCE.ln() / (OUTER_K - INNER_K).powi(FILTER_ORDER);

    let mut ksq: ArrayD<Float> = Array::zeros(IxDyn(&grid.spectral_shape()));
    for axis in 0..grid.ndims() {
        let scale = grid.grid_width().get(axis) / PI;
        Zip::from(&mut ksq)
            .and(&grid.k_mesh(axis))
            .for_each(|s, &k| *s += (k * scale).powi(2));
    }

    ksq.mapv(|ksq| {
        let k = ksq.sqrt();
        if k > INNER_K {
            (-decay * (k - INNER_K).powi(FILTER_ORDER)).exp()
        } else {
            1.
        }
    })
}
