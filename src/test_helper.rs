use crate::flow::turbulent::FlowSolver;
use crate::mesh::transform::{FftPlan, SpectralTransform};
use crate::mesh::{layered_shape, Field, Grid, SpectralField};
use crate::Float;
use ndarray::{Array, IxDyn};
use std::cell::Cell;

pub fn equal_floats(a: Float, b: Float) -> bool {
    if a == 0. && b == 0. {
        return true;
    }

    let diff = (a - b).abs();

    if a == 0. || b == 0. {
        return diff < Float::EPSILON;
    }

    diff / (a.abs() + b.abs()).min(Float::MAX) < Float::EPSILON
}

/// Compares with an absolute tolerance for small numbers and a relative one
/// otherwise.
pub fn approx_eq(a: Float, b: Float, tol: Float) -> bool {
    (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.)
}

/// Largest pointwise difference of two arrays of the same shape.
pub fn max_abs_diff(a: &Field, b: &Field) -> Float {
    assert_eq!(a.shape(), b.shape());
    a.iter()
        .zip(b.iter())
        .fold(0., |m, (a, b)| m.max((a - b).abs()))
}

/// An `FftPlan` that counts how often it is used.
#[derive(Debug)]
pub struct CountingTransform {
    plan: FftPlan,
    pub forward_calls: Cell<usize>,
    pub inverse_calls: Cell<usize>,
}

impl CountingTransform {
    pub fn new(grid: &Grid) -> CountingTransform {
        CountingTransform {
            plan: FftPlan::new(grid.grid_size()),
            forward_calls: Cell::new(0),
            inverse_calls: Cell::new(0),
        }
    }
}

impl SpectralTransform for CountingTransform {
    fn forward(&self, output: &mut SpectralField, input: &Field) {
        self.forward_calls.set(self.forward_calls.get() + 1);
        self.plan.forward(output, input);
    }

    fn inverse(&self, output: &mut Field, input: &mut SpectralField) {
        self.inverse_calls.set(self.inverse_calls.get() + 1);
        self.plan.inverse(output, input);
    }
}

/// Stand-in for an external multi-layer flow solver with prescribed
/// velocities that do not change when it is stepped.
#[derive(Debug)]
pub struct MockFlow {
    pub grid: Grid,
    pub nlayers: usize,
    pub t: Float,
    pub dt: Float,
    pub velocity: Vec<Field>,
    pub background: Option<Field>,
    pub transform: CountingTransform,
    /// Every step size the solver was asked to take.
    pub steps: Vec<Float>,
}

impl MockFlow {
    /// A flow at rest on `grid`.
    pub fn new(grid: Grid, nlayers: usize, t: Float, dt: Float) -> MockFlow {
        let shape = layered_shape(&grid.physical_shape(), nlayers);
        let velocity = (0..grid.ndims())
            .map(|_| Array::zeros(IxDyn(&shape)))
            .collect();

        MockFlow {
            transform: CountingTransform::new(&grid),
            grid,
            nlayers,
            t,
            dt,
            velocity,
            background: None,
            steps: Vec::new(),
        }
    }

    /// Same flow with a constant velocity `u` along every axis.
    pub fn uniform(mut self, u: &[Float]) -> MockFlow {
        for (v, u) in self.velocity.iter_mut().zip(u.iter()) {
            v.fill(*u);
        }
        self
    }
}

impl FlowSolver for MockFlow {
    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn nlayers(&self) -> usize {
        self.nlayers
    }

    fn clock(&self) -> Float {
        self.t
    }

    fn timestep(&self) -> Float {
        self.dt
    }

    fn step_forward(&mut self, dt: Float) {
        self.t += dt;
        self.steps.push(dt);
    }

    fn velocity(&self, axis: usize) -> &Field {
        &self.velocity[axis]
    }

    fn background_flow(&self) -> Option<&Field> {
        self.background.as_ref()
    }

    fn transform(&self) -> &dyn SpectralTransform {
        &self.transform
    }
}
