//! Description of the velocity field that advects the tracer.


pub mod turbulent;

use crate::errors::*;
use crate::mesh::{Field, Grid};
use crate::Float;
use error_chain::bail;
use ndarray::Zip;
use std::fmt;
use std::sync::Arc;

/// One component of an advecting velocity, evaluated at the coordinates `x`
/// (one entry per axis) and time `t`.
pub trait VelocityField: Send + Sync {
    fn velocity(&self, x: &[Float], t: Float) -> Float;
}

impl<F> VelocityField for F
where
    F: Fn(&[Float], Float) -> Float + Send + Sync,
{
    fn velocity(&self, x: &[Float], t: Float) -> Float {
        self(x, t)
    }
}

/// A velocity component that vanishes everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroVelocity;

impl VelocityField for ZeroVelocity {
    fn velocity(&self, _x: &[Float], _t: Float) -> Float {
        0.
    }
}

/// Evaluates `u` at time `t` on every physical grid point of `grid`.
///
/// # Panics
/// If `out` does not have the physical shape of `grid`.
pub fn sample_velocity(grid: &Grid, u: &dyn VelocityField, t: Float, out: &mut Field) {
    match grid.ndims() {
        1 => Zip::from(out)
            .and(&grid.x_mesh(0))
            .par_for_each(|o, &x| *o = u.velocity(&[x], t)),
        2 => Zip::from(out)
            .and(&grid.x_mesh(0))
            .and(&grid.x_mesh(1))
            .par_for_each(|o, &x, &y| *o = u.velocity(&[x, y], t)),
        _ => Zip::from(out)
            .and(&grid.x_mesh(0))
            .and(&grid.x_mesh(1))
            .and(&grid.x_mesh(2))
            .par_for_each(|o, &x, &y, &z| *o = u.velocity(&[x, y, z], t)),
    }
}

/// Where the velocity comes from.
#[derive(Clone)]
pub enum VelocitySource {
    /// One analytic function per axis.
    Analytic(Vec<Arc<dyn VelocityField>>),
    /// One array per axis, already sampled at the physical grid points.
    Sampled(Vec<Field>),
}

/// Immutable description of an advecting flow. The number of components
/// determines the dimensionality of the problem.
#[derive(Clone)]
pub struct FlowDescriptor {
    source: VelocitySource,
    steady: bool,
}

impl fmt::Debug for FlowDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.source {
            VelocitySource::Analytic(_) => "analytic",
            VelocitySource::Sampled(_) => "sampled",
        };
        f.debug_struct("FlowDescriptor")
            .field("source", &kind)
            .field("ndims", &self.ndims())
            .field("steady", &self.steady)
            .finish()
    }
}

fn check_components(n: usize) -> Result<()> {
    if n == 0 || n > 3 {
        bail!(ErrorKind::Validation(format!(
            "a flow needs one to three velocity components, got {}",
            n
        )));
    }
    Ok(())
}

impl FlowDescriptor {
    /// Returns a flow with one velocity component per axis. A `steady` flow is
    /// sampled once on the grid, otherwise it is evaluated at every call of the
    /// right-hand side.
    pub fn new(components: Vec<Arc<dyn VelocityField>>, steady: bool) -> Result<FlowDescriptor> {
        check_components(components.len())?;

        Ok(FlowDescriptor {
            source: VelocitySource::Analytic(components),
            steady,
        })
    }

    /// Returns a flow at rest in `ndims` dimensions.
    pub fn still(ndims: usize) -> Result<FlowDescriptor> {
        let components = (0..ndims)
            .map(|_| Arc::new(ZeroVelocity) as Arc<dyn VelocityField>)
            .collect();
        FlowDescriptor::new(components, true)
    }

    /// Returns a steady flow from velocities that are already sampled at the
    /// grid points. Their shape is checked once the grid is known.
    pub fn sampled(velocities: Vec<Field>) -> Result<FlowDescriptor> {
        check_components(velocities.len())?;

        Ok(FlowDescriptor {
            source: VelocitySource::Sampled(velocities),
            steady: true,
        })
    }

    pub fn one_d<U>(u: U, steady: bool) -> FlowDescriptor
    where
        U: Fn(&[Float], Float) -> Float + Send + Sync + 'static,
    {
        FlowDescriptor {
            source: VelocitySource::Analytic(vec![Arc::new(u) as Arc<dyn VelocityField>]),
            steady,
        }
    }

    pub fn two_d<U, V>(u: U, v: V, steady: bool) -> FlowDescriptor
    where
        U: Fn(&[Float], Float) -> Float + Send + Sync + 'static,
        V: Fn(&[Float], Float) -> Float + Send + Sync + 'static,
    {
        FlowDescriptor {
            source: VelocitySource::Analytic(vec![
                Arc::new(u) as Arc<dyn VelocityField>,
                Arc::new(v),
            ]),
            steady,
        }
    }

    pub fn three_d<U, V, W>(u: U, v: V, w: W, steady: bool) -> FlowDescriptor
    where
        U: Fn(&[Float], Float) -> Float + Send + Sync + 'static,
        V: Fn(&[Float], Float) -> Float + Send + Sync + 'static,
        W: Fn(&[Float], Float) -> Float + Send + Sync + 'static,
    {
        FlowDescriptor {
            source: VelocitySource::Analytic(vec![
                Arc::new(u) as Arc<dyn VelocityField>,
                Arc::new(v),
                Arc::new(w),
            ]),
            steady,
        }
    }

    pub fn ndims(&self) -> usize {
        match self.source {
            VelocitySource::Analytic(ref f) => f.len(),
            VelocitySource::Sampled(ref a) => a.len(),
        }
    }

    pub fn is_steady(&self) -> bool {
        self.steady
    }

    pub fn source(&self) -> &VelocitySource {
        &self.source
    }

    pub(crate) fn into_source(self) -> VelocitySource {
        self.source
    }
}
