use super::*;
use crate::consts::TWOPI;
use crate::mesh::Grid;
use crate::test_helper::{approx_eq, max_abs_diff};
use ndarray::{Array, Dimension, IxDyn};

fn spectral_zeros(grid: &Grid) -> SpectralField {
    Array::zeros(IxDyn(&grid.spectral_shape()))
}

#[test]
fn test_forward_single_mode() {
    let grid = Grid::new(&[8, 6], &[TWOPI, TWOPI]).unwrap();
    let c = Array::from_shape_fn(IxDyn(&[8, 6]), |idx| {
        let x = grid.position(idx.slice());
        (2. * x[0] + x[1]).cos()
    });

    let mut ch = spectral_zeros(&grid);
    grid.transform().forward(&mut ch, &c);

    // cos(2x + y) lives at (2, 1) and its conjugate (-2, -1), of which only
    // (2, 1) is stored. The grid starts at -pi, which flips the sign.
    let n = 48. / 2.;
    for (idx, v) in ch.indexed_iter() {
        let expected = if idx.slice() == &[2, 1][..] { -n } else { 0. };
        assert!(
            approx_eq(v.re, expected, 1e-12) && approx_eq(v.im, 0., 1e-12),
            "{:?}: {}",
            idx,
            v
        );
    }
}

#[test]
fn test_round_trip_3d() {
    let grid = Grid::new(&[6, 5, 4], &[1., 2., 3.]).unwrap();
    let c = Array::from_shape_fn(IxDyn(&[6, 5, 4]), |idx| {
        let (i, j, k) = (idx[0] as Float, idx[1] as Float, idx[2] as Float);
        i * i - 3. * j + 0.5 * k * i
    });

    let mut ch = spectral_zeros(&grid);
    let mut back: Field = Array::zeros(IxDyn(&[6, 5, 4]));
    grid.transform().forward(&mut ch, &c);
    grid.transform().inverse(&mut back, &mut ch);

    assert!(max_abs_diff(&c, &back) < 1e-10);
}

#[test]
fn test_layers_are_transformed_independently() {
    let grid = Grid::new(&[8], &[TWOPI]).unwrap();
    let mut c: Field = Array::zeros(IxDyn(&[8, 2]));
    for i in 0..8 {
        c[[i, 0]] = 1.;
        c[[i, 1]] = if i % 2 == 0 { 1. } else { -1. };
    }

    let mut ch: SpectralField = Array::zeros(IxDyn(&[5, 2]));
    grid.transform().forward(&mut ch, &c);

    assert!(approx_eq(ch[[0, 0]].re, 8., 1e-12));
    assert!(approx_eq(ch[[4, 0]].norm(), 0., 1e-12));
    assert!(approx_eq(ch[[0, 1]].norm(), 0., 1e-12));
    assert!(approx_eq(ch[[4, 1]].re, 8., 1e-12));

    let mut back: Field = Array::zeros(IxDyn(&[8, 2]));
    grid.transform().inverse(&mut back, &mut ch);
    assert!(max_abs_diff(&c, &back) < 1e-12);
}

quickcheck! {
    fn prop_round_trip(nx: u8, ny: u8, data: Vec<i16>) -> bool {
        let nx = nx as usize % 9 + 1;
        let ny = ny as usize % 9 + 1;
        if data.is_empty() {
            return true;
        }

        let grid = Grid::new(&[nx, ny], &[1., 1.]).unwrap();
        let c = Array::from_shape_fn(IxDyn(&[nx, ny]), |idx| {
            data[(idx[0] * ny + idx[1]) % data.len()] as Float
        });

        let mut ch = spectral_zeros(&grid);
        let mut back: Field = Array::zeros(IxDyn(&[nx, ny]));
        grid.transform().forward(&mut ch, &c);
        grid.transform().inverse(&mut back, &mut ch);

        max_abs_diff(&c, &back) < 1e-6
    }
}

#[test]
fn test_many_lanes_match_single_transforms() {
    // enough lanes that every rayon job handles several of them with the same
    // buffers
    let grid = Grid::new(&[8], &[TWOPI]).unwrap();
    let nlanes = 257;
    let c = Array::from_shape_fn(IxDyn(&[8, nlanes]), |idx| {
        let (i, l) = (idx[0] as Float, idx[1] as Float);
        ((l + 1.) * i).sin() + (l % 3.) * i
    });

    let mut ch: SpectralField = Array::zeros(IxDyn(&[5, nlanes]));
    grid.transform().forward(&mut ch, &c);

    for l in 0..nlanes {
        let lane = c.index_axis(ndarray::Axis(1), l).to_owned();
        let mut single = spectral_zeros(&grid);
        grid.transform().forward(&mut single, &lane);

        for k in 0..5 {
            assert!((ch[[k, l]] - single[[k]]).norm() < 1e-12, "lane {} mode {}", l, k);
        }
    }

    let mut back: Field = Array::zeros(IxDyn(&[8, nlanes]));
    grid.transform().inverse(&mut back, &mut ch);
    assert!(max_abs_diff(&c, &back) < 1e-10);
}
