#[cfg(feature = "single")]
pub use std::f32::consts::PI;
#[cfg(not(feature = "single"))]
pub use std::f64::consts::PI;

use crate::Float;

pub const TWOPI: Float = 2. * PI;

/// Relative amplitude the spectral filter leaves at the outermost wavenumber.
pub const FILTER_TOLERANCE: Float = 1e-15;
