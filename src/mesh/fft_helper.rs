// Move unit test into own file
#[cfg(test)]
#[path = "./fft_helper_test.rs"]
mod fft_helper_test;

use crate::consts::TWOPI;
use crate::Float;
use ndarray::{s, Array, Array1, ArrayD, Axis, IxDyn};

/// Returns a sampling of k values along one grid axis in FFTW standard form.
///
/// For a grid size of `n`, the 0th-mode is at index `0`. For even n the index
/// `n/2` represents both the largest positive and negative frequency. For odd
/// `n` index `(n-1)/2` is the largest positive frequency and `(n+1)/2` the
/// largest negative frequency. For the values at index `i`, `-i = n-k` holds
/// true.
///
/// Example:
///     n = 10 => k = [0, 1, 2, 3, 4, (5, -5), -4, -3, -2, -1]
///     n = 11 => k = [0, 1, 2, 3, 4, 5, -5, -4, -3, -2, -1]
///
pub fn fft_wavenumbers(grid_size: usize, box_size: Float) -> Array1<Float> {
    let a = (grid_size / 2) as i64;
    let b = if grid_size % 2 == 0 {
        grid_size / 2
    } else {
        grid_size / 2 + 1
    } as i64;
    let step = TWOPI / box_size;

    let values: Array1<Float> = (-a..b).map(|i| (i as Float) * step).collect();

    let mut k: Array1<Float> = Array::zeros(grid_size);

    k.slice_mut(s![..b as usize]).assign(&values.slice(s![a as usize..]));
    k.slice_mut(s![b as usize..]).assign(&values.slice(s![..a as usize]));

    k
}

/// Returns the non-negative k values kept by a real-to-complex transform along
/// an axis with `grid_size` points, i.e. `[0, 1, ..., n/2]`.
pub fn rfft_wavenumbers(grid_size: usize, box_size: Float) -> Array1<Float> {
    let step = TWOPI / box_size;
    (0..grid_size / 2 + 1).map(|i| (i as Float) * step).collect()
}

/// Returns one meshgrid per axis. The `i`-th mesh varies along the `i`-th
/// axis only:
///     `res[c][i, j, m] -> k_c[i, j, m]`
pub fn mesh(k: &[Array1<Float>]) -> Vec<ArrayD<Float>> {
    let shape: Vec<usize> = k.iter().map(|v| v.len()).collect();

    k.iter()
        .enumerate()
        .map(|(axis, values)| {
            let mut res: ArrayD<Float> = Array::zeros(IxDyn(&shape));
            for (v, mut sub) in values.iter().zip(res.axis_iter_mut(Axis(axis))) {
                sub.fill(*v);
            }
            res
        })
        .collect()
}
