use super::*;
use crate::consts::TWOPI;
use crate::flow::turbulent::FlowSolver;
use crate::mesh::SpectralField;
use crate::test_helper::{equal_floats, MockFlow};
use std::cell::RefCell;

fn grid_2d() -> Grid {
    Grid::new(&[8, 4], &[TWOPI, TWOPI]).unwrap()
}

#[test]
fn test_isotropic_diffusivities() {
    let d = Diffusivities::isotropic(0.3);
    assert_eq!(d.along(0), 0.3);
    assert_eq!(d.along(1), 0.3);
    assert_eq!(d.along(2), 0.3);
    assert_eq!(d.kappa_h, 0.);
    assert_eq!(d.n_kappa_h, 0);

    let d = d.with_hyperdiffusion(1e-3, 2);
    assert_eq!(d.kappa_h, 1e-3);
    assert_eq!(d.n_kappa_h, 2);
    assert_eq!(d.kappa, 0.3);
}

#[test]
fn test_invalid_diffusivities() {
    let grid = grid_2d();

    for d in &[
        Diffusivities::isotropic(-1.),
        Diffusivities::isotropic(Float::NAN),
        Diffusivities::default().with_hyperdiffusion(-1e-3, 2),
    ] {
        let flow = FlowDescriptor::still(2).unwrap();
        match ParameterSet::from_descriptor(flow, &grid, *d) {
            Err(Error(ErrorKind::Validation(_), _)) => {}
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}

#[test]
fn test_dimension_mismatch_is_rejected() {
    let grid = Grid::new(&[4, 4, 4], &[1., 1., 1.]).unwrap();
    let flow = FlowDescriptor::two_d(|_: &[Float], _: Float| 1., |_: &[Float], _: Float| 1., true);

    match ParameterSet::from_descriptor(flow, &grid, Diffusivities::default()) {
        Err(Error(ErrorKind::Validation(_), _)) => {}
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_sampled_shape_mismatch() {
    let grid = grid_2d();
    let u: Field = Array::zeros(IxDyn(&[8, 5]));
    let flow = FlowDescriptor::sampled(vec![u.clone(), u]).unwrap();

    match ParameterSet::from_descriptor(flow, &grid, Diffusivities::default()) {
        Err(Error(ErrorKind::ShapeMismatch(_, expected, found), _)) => {
            assert_eq!(expected, vec![8, 4]);
            assert_eq!(found, vec![8, 5]);
        }
        other => panic!("expected shape mismatch, got {:?}", other),
    }
}

#[test]
fn test_steady_flow_is_sampled_at_start() {
    let grid = grid_2d();
    let flow = FlowDescriptor::two_d(
        |x: &[Float], t: Float| x[0] + 10. * t,
        |x: &[Float], _: Float| x[0] * x[1],
        true,
    );

    let p = ParameterSet::from_descriptor(flow, &grid, Diffusivities::default()).unwrap();
    assert_eq!(p.ndims(), 2);
    assert_eq!(p.nlayers(), 1);

    match *p.flow() {
        FlowKind::Steady(ref u) => {
            assert_eq!(u.len(), 2);
            assert_eq!(u[0].shape(), &[8, 4]);
            for i in 0..8 {
                for j in 0..4 {
                    let x = grid.position(&[i, j]);
                    assert!(equal_floats(u[0][[i, j]], x[0]));
                    assert!(equal_floats(u[1][[i, j]], x[0] * x[1]));
                }
            }
        }
        _ => panic!("expected a steady flow, got {}", p.flow().name()),
    }
}

#[test]
fn test_time_varying_flow_keeps_functions() {
    let grid = grid_2d();
    let flow = FlowDescriptor::two_d(|_: &[Float], t: Float| t, |_: &[Float], _: Float| 0., false);

    let p = ParameterSet::from_descriptor(flow, &grid, Diffusivities::default()).unwrap();
    match *p.flow() {
        FlowKind::TimeVarying(ref u) => assert_eq!(u[0].velocity(&[0., 0.], 2.5), 2.5),
        _ => panic!("expected a time varying flow, got {}", p.flow().name()),
    }
}

#[test]
fn test_release_time() {
    assert!(check_release_time(0.).is_ok());
    assert!(check_release_time(3.).is_ok());
    assert!(check_release_time(-1e-9).is_err());
    assert!(check_release_time(Float::NAN).is_err());
    assert!(check_release_time(Float::INFINITY).is_err());
}

#[test]
fn test_turbulent_parameters() {
    let flow = RefCell::new(MockFlow::new(grid_2d(), 3, 0., 0.1));
    let handle = FlowHandle::release(&flow, 0.).unwrap();

    let p = ParameterSet::turbulent(handle, Diffusivities::isotropic(1.)).unwrap();
    assert_eq!(p.ndims(), 2);
    assert_eq!(p.nlayers(), 3);
    assert_eq!(p.flow().name(), "turbulent");

    assert!(ParameterSet::turbulent(handle, Diffusivities::isotropic(-1.)).is_err());
}

#[test]
fn test_zero_layers_are_rejected() {
    let flow = RefCell::new(MockFlow::new(grid_2d(), 0, 0., 0.1));
    let handle = FlowHandle::release(&flow, 0.).unwrap();

    match ParameterSet::turbulent(handle, Diffusivities::default()) {
        Err(Error(ErrorKind::Validation(_), _)) => {}
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_transform_of_external_solver_is_used() {
    let grid = grid_2d();
    let flow = RefCell::new(MockFlow::new(grid.clone(), 1, 0., 0.1));
    let handle = FlowHandle::release(&flow, 0.).unwrap();
    let p = ParameterSet::turbulent(handle, Diffusivities::default()).unwrap();

    let c: Field = Array::zeros(IxDyn(&[8, 4]));
    let mut ch: SpectralField = Array::zeros(IxDyn(&grid.spectral_shape()));
    p.with_transform(&grid, |t| t.forward(&mut ch, &c));

    let solver = flow.borrow();
    assert_eq!(solver.transform.forward_calls.get(), 1);
    assert_eq!(solver.clock(), 0.);
}
