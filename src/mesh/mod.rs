//! Periodic grid with physical coordinates, wavenumbers and a transform plan.


pub mod fft_helper;
pub mod grid_width;
pub mod transform;

use self::fft_helper::{fft_wavenumbers, mesh, rfft_wavenumbers};
use self::grid_width::GridWidth;
use self::transform::FftPlan;
use crate::errors::*;
use crate::Float;
use error_chain::bail;
use ndarray::{Array, Array1, ArrayD, ArrayView1, ArrayViewD, Axis, IxDyn};
use num_complex::Complex;

/// Real valued field in physical space.
pub type Field = ArrayD<Float>;
/// Complex amplitudes in transform space.
pub type SpectralField = ArrayD<Complex<Float>>;

#[derive(Debug, Clone)]
pub struct Grid {
    grid_size: Vec<usize>,
    box_size: Vec<Float>,
    grid_width: GridWidth,
    /// Coordinates of the grid points along every axis.
    x: Vec<Array1<Float>>,
    /// Coordinate of every axis at every physical grid point.
    x_mesh: Vec<ArrayD<Float>>,
    /// Wavenumbers along every axis. The first axis only holds the
    /// non-negative half.
    k: Vec<Array1<Float>>,
    k_mesh: Vec<ArrayD<Float>>,
    plan: FftPlan,
}

impl Grid {
    /// Returns a grid with `grid_size[i]` points on a periodic interval of
    /// length `box_size[i]` along axis `i`. One, two and three axes are
    /// supported.
    pub fn new(grid_size: &[usize], box_size: &[Float]) -> Result<Grid> {
        let ndims = grid_size.len();

        if ndims == 0 || ndims > 3 {
            bail!(ErrorKind::Validation(format!(
                "a grid needs one to three axes, got {}",
                ndims
            )));
        }

        if box_size.len() != ndims {
            bail!(ErrorKind::Validation(format!(
                "got {} grid sizes but {} box sizes",
                ndims,
                box_size.len()
            )));
        }

        if grid_size.iter().any(|n| *n == 0) {
            bail!(ErrorKind::Validation(format!(
                "grid size {:?} contains an empty axis",
                grid_size
            )));
        }

        if box_size.iter().any(|l| !(l.is_finite() && *l > 0.)) {
            bail!(ErrorKind::Validation(format!(
                "box size {:?} must be finite and positive",
                box_size
            )));
        }

        let grid_width = GridWidth::new(grid_size, box_size);

        let x: Vec<Array1<Float>> = grid_size
            .iter()
            .zip(box_size.iter())
            .enumerate()
            .map(|(axis, (n, l))| {
                let dx = grid_width.get(axis);
                Array::from_shape_fn(*n, |i| -l / 2. + i as Float * dx)
            })
            .collect();

        let k: Vec<Array1<Float>> = grid_size
            .iter()
            .zip(box_size.iter())
            .enumerate()
            .map(|(axis, (n, l))| {
                if axis == 0 {
                    rfft_wavenumbers(*n, *l)
                } else {
                    fft_wavenumbers(*n, *l)
                }
            })
            .collect();

        Ok(Grid {
            grid_size: grid_size.to_vec(),
            box_size: box_size.to_vec(),
            grid_width,
            x_mesh: mesh(&x),
            x,
            k_mesh: mesh(&k),
            k,
            plan: FftPlan::new(grid_size),
        })
    }

    pub fn ndims(&self) -> usize {
        self.grid_size.len()
    }

    pub fn grid_size(&self) -> &[usize] {
        &self.grid_size
    }

    pub fn box_size(&self) -> &[Float] {
        &self.box_size
    }

    pub fn grid_width(&self) -> &GridWidth {
        &self.grid_width
    }

    /// Shape of a real field on this grid.
    pub fn physical_shape(&self) -> Vec<usize> {
        self.grid_size.clone()
    }

    /// Shape of the transform of a real field on this grid.
    pub fn spectral_shape(&self) -> Vec<usize> {
        let mut shape = self.grid_size.clone();
        shape[0] = shape[0] / 2 + 1;
        shape
    }

    pub fn coordinates(&self, axis: usize) -> ArrayView1<Float> {
        self.x[axis].view()
    }

    /// Returns the coordinates of the grid point at `index`. Entries beyond
    /// the number of axes are zero.
    pub fn position(&self, index: &[usize]) -> [Float; 3] {
        let mut p = [0.; 3];
        for (axis, (x, i)) in self.x.iter().zip(index.iter()).enumerate() {
            p[axis] = x[*i];
        }
        p
    }

    /// Returns the coordinate along `axis` at every physical grid point.
    pub fn x_mesh(&self, axis: usize) -> ArrayViewD<Float> {
        self.x_mesh[axis].view()
    }

    pub fn wavenumbers(&self, axis: usize) -> ArrayView1<Float> {
        self.k[axis].view()
    }

    /// Returns the wavenumber of `axis` at every point of the spectral grid.
    pub fn k_mesh(&self, axis: usize) -> ArrayViewD<Float> {
        self.k_mesh[axis].view()
    }

    /// Returns the squared norm of the wave vector on the spectral grid.
    pub fn k_squared(&self) -> ArrayD<Float> {
        let mut ksq: ArrayD<Float> = Array::zeros(IxDyn(&self.spectral_shape()));
        for k in &self.k_mesh {
            ksq.zip_mut_with(k, |s, k| *s += k * k);
        }
        ksq
    }

    pub fn transform(&self) -> &FftPlan {
        &self.plan
    }
}

/// Appends the layer axis to a spatial shape. A single layer does not get an
/// axis of its own.
pub fn layered_shape(shape: &[usize], nlayers: usize) -> Vec<usize> {
    let mut shape = shape.to_vec();
    if nlayers > 1 {
        shape.push(nlayers);
    }
    shape
}

/// Adds trailing unit axes to `a` until it has `ndim` axes, so it can be
/// broadcast against a layered field.
pub fn with_trailing_axes<'a>(mut a: ArrayViewD<'a, Float>, ndim: usize) -> ArrayViewD<'a, Float> {
    while a.ndim() < ndim {
        let n = a.ndim();
        a = a.insert_axis(Axis(n));
    }
    a
}
