//! Data structure that holds the grid width's.

use crate::Float;

#[derive(Debug, Clone, PartialEq)]
pub struct GridWidth {
    widths: Vec<Float>,
}

impl GridWidth {
    /// Calculates width of a grid cell given the number of cells and box size,
    /// for every axis.
    pub fn new(grid_size: &[usize], box_size: &[Float]) -> GridWidth {
        GridWidth {
            widths: grid_size
                .iter()
                .zip(box_size.iter())
                .map(|(n, l)| l / *n as Float)
                .collect(),
        }
    }

    pub fn get(&self, axis: usize) -> Float {
        self.widths[axis]
    }

    pub fn as_slice(&self) -> &[Float] {
        &self.widths
    }
}
