//! Real-to-complex Fourier transforms over the spatial axes of a field.
//!
//! The spectral layout matches the common `rfft` convention: the first axis
//! keeps only the non-negative wavenumbers `0..=n/2`, every other axis is
//! stored in full FFT ordering. Any axes beyond the spatial ones (e.g. layers
//! of a multi-layer flow) are treated as a batch and transformed
//! independently.

// Move unit test into own file
#[cfg(test)]
#[path = "./transform_test.rs"]
mod transform_test;

use super::{Field, SpectralField};
use crate::Float;
use ndarray::parallel::prelude::*;
use ndarray::{Axis, Zip};
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// Capability to move a field between physical and transform space.
pub trait SpectralTransform {
    /// Unnormalized forward transform of the real field `input` into
    /// `output`.
    fn forward(&self, output: &mut SpectralField, input: &Field);

    /// Normalized inverse transform of `input` into the real field `output`.
    ///
    /// CAUTION: `input` is used as scratch space and holds garbage afterwards.
    /// Reading it again before it is recomputed is a contract violation.
    fn inverse(&self, output: &mut Field, input: &mut SpectralField);
}

/// Holds one forward and one inverse one dimensional FFT per spatial axis.
#[derive(Clone)]
pub struct FftPlan {
    grid_size: Vec<usize>,
    forward: Vec<Arc<dyn Fft<Float>>>,
    inverse: Vec<Arc<dyn Fft<Float>>>,
}

impl fmt::Debug for FftPlan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FftPlan")
            .field("grid_size", &self.grid_size)
            .finish()
    }
}

impl FftPlan {
    pub fn new(grid_size: &[usize]) -> FftPlan {
        let mut planner = FftPlanner::new();

        FftPlan {
            grid_size: grid_size.to_vec(),
            forward: grid_size
                .iter()
                .map(|n| planner.plan_fft_forward(*n))
                .collect(),
            inverse: grid_size
                .iter()
                .map(|n| planner.plan_fft_inverse(*n))
                .collect(),
        }
    }

    pub fn ndims(&self) -> usize {
        self.grid_size.len()
    }
}

/// Lane buffer and FFT scratch, allocated once per rayon job and reused for
/// every lane it handles.
struct LaneBuffers {
    data: Vec<Complex<Float>>,
    scratch: Vec<Complex<Float>>,
}

impl LaneBuffers {
    fn new(n: usize, fft: &dyn Fft<Float>) -> LaneBuffers {
        LaneBuffers {
            data: vec![Complex::new(0., 0.); n],
            scratch: vec![Complex::new(0., 0.); fft.get_inplace_scratch_len()],
        }
    }

    fn process(&mut self, fft: &dyn Fft<Float>) {
        fft.process_with_scratch(&mut self.data, &mut self.scratch);
    }
}

/// Runs `fft` of length `n` along every lane of `data` in direction `axis`.
fn process_lanes(data: &mut SpectralField, axis: Axis, n: usize, fft: &dyn Fft<Float>) {
    Zip::from(data.lanes_mut(axis))
        .into_par_iter()
        .for_each_init(
            || LaneBuffers::new(n, fft),
            |buf, (mut lane,)| {
                buf.data
                    .iter_mut()
                    .zip(lane.iter())
                    .for_each(|(b, l)| *b = *l);
                buf.process(fft);
                lane.iter_mut()
                    .zip(buf.data.iter())
                    .for_each(|(l, b)| *l = *b);
            },
        );
}

impl SpectralTransform for FftPlan {
    fn forward(&self, output: &mut SpectralField, input: &Field) {
        let n = self.grid_size[0];
        let fft = self.forward[0].as_ref();

        // real to complex along the first axis, keeping the non-negative half
        Zip::from(output.lanes_mut(Axis(0)))
            .and(input.lanes(Axis(0)))
            .into_par_iter()
            .for_each_init(
                || LaneBuffers::new(n, fft),
                |buf, (mut out, inp)| {
                    buf.data
                        .iter_mut()
                        .zip(inp.iter())
                        .for_each(|(b, v)| *b = Complex::new(*v, 0.));
                    buf.process(fft);
                    out.iter_mut()
                        .zip(buf.data.iter())
                        .for_each(|(o, b)| *o = *b);
                },
            );

        for axis in 1..self.ndims() {
            process_lanes(
                output,
                Axis(axis),
                self.grid_size[axis],
                self.forward[axis].as_ref(),
            );
        }
    }

    fn inverse(&self, output: &mut Field, input: &mut SpectralField) {
        for axis in (1..self.ndims()).rev() {
            process_lanes(
                input,
                Axis(axis),
                self.grid_size[axis],
                self.inverse[axis].as_ref(),
            );
        }

        let n = self.grid_size[0];
        let norm = self.grid_size.iter().product::<usize>() as Float;
        let fft = self.inverse[0].as_ref();

        // What is left along the first axis is the half spectrum of a real
        // signal. Restore the negative half from hermitian symmetry.
        Zip::from(output.lanes_mut(Axis(0)))
            .and(input.lanes(Axis(0)))
            .into_par_iter()
            .for_each_init(
                || LaneBuffers::new(n, fft),
                |buf, (mut out, inp)| {
                    let half = inp.len();
                    buf.data
                        .iter_mut()
                        .zip(inp.iter())
                        .for_each(|(b, v)| *b = *v);
                    for j in half..n {
                        buf.data[j] = inp[n - j].conj();
                    }
                    buf.process(fft);
                    out.iter_mut()
                        .zip(buf.data.iter())
                        .for_each(|(o, b)| *o = b.re / norm);
                },
            );
    }
}
