use super::*;

#[test]
fn gaussian_particle_number() {
    let prop = propagator_1d(0.01);
    assert!((prop.particle_number(0).unwrap() - 1.0).abs() < 1e-8);
}

#[test]
fn position_expectation_tracks_packet_center() {
    let center = 1.5;
    let mut fields = Array2::zeros((1, N));
    fields.row_mut(0).assign(&gauss_1d(center, 1.0));
    let prop =
        Propagator::from_parts(header_1d(0.01), fields, [0.5], Array2::zeros((1, 1))).unwrap();
    assert!((prop.expval_position(0).unwrap()[0] - center).abs() < 1e-8);
}

#[test]
fn momentum_expectation_restores_the_state() {
    let mut prop = propagator_1d(0.01);
    prop.set_momentum([0.5], 0).unwrap();
    let before = prop.state(0).unwrap().to_owned();

    let _ = prop.expval_momentum(0).unwrap();

    assert!(max_abs_diff(&prop.state(0).unwrap(), &before.view()) < 1e-12);
}

#[test]
fn observables_reject_bad_component() {
    let mut prop = propagator_1d(0.01);
    assert!(prop.particle_number(1).is_err());
    assert!(prop.expval_position(1).is_err());
    assert!(prop.expval_momentum(1).is_err());
}
