use super::*;
use crate::consts::TWOPI;
use crate::test_helper::equal_floats;

#[test]
fn test_fft_wavenumbers_even() {
    let k = fft_wavenumbers(10, TWOPI);
    let expected = [0., 1., 2., 3., 4., -5., -4., -3., -2., -1.];

    for (a, b) in k.iter().zip(expected.iter()) {
        assert!(equal_floats(*a, *b), "{} != {}", a, b);
    }
}

#[test]
fn test_fft_wavenumbers_odd() {
    let k = fft_wavenumbers(11, TWOPI);
    let expected = [0., 1., 2., 3., 4., 5., -5., -4., -3., -2., -1.];

    assert_eq!(k.len(), 11);
    for (a, b) in k.iter().zip(expected.iter()) {
        assert!(equal_floats(*a, *b), "{} != {}", a, b);
    }
}

#[test]
fn test_wavenumbers_scale_with_box() {
    let k = fft_wavenumbers(4, 0.5 * TWOPI);
    assert!(equal_floats(k[1], 2.));
    assert!(equal_floats(k[2], -4.));

    let kr = rfft_wavenumbers(8, 2. * TWOPI);
    assert_eq!(kr.len(), 5);
    assert!(equal_floats(kr[4], 2.));
}

#[test]
fn test_rfft_wavenumbers_odd() {
    let kr = rfft_wavenumbers(7, TWOPI);
    assert_eq!(kr.len(), 4);
    assert!(equal_floats(kr[3], 3.));
}

#[test]
fn test_mesh_varies_along_own_axis() {
    let kx = rfft_wavenumbers(6, TWOPI);
    let ky = fft_wavenumbers(4, TWOPI);
    let m = mesh(&[kx, ky]);

    assert_eq!(m.len(), 2);
    assert_eq!(m[0].shape(), &[4, 4]);
    assert_eq!(m[1].shape(), &[4, 4]);

    for i in 0..4 {
        for j in 0..4 {
            assert!(equal_floats(m[0][[i, j]], i as Float));
        }
    }
    assert!(equal_floats(m[1][[3, 1]], 1.));
    assert!(equal_floats(m[1][[0, 3]], -1.));
    assert!(equal_floats(m[1][[2, 2]], -2.));
}
