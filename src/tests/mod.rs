mod header;
mod observables;
mod params;
mod snapshot;

pub use crate::config::{C, F, PI};
pub use crate::header::Header;
pub use crate::propagator::Propagator;
pub use crate::sequence::{Freq, SequenceItem};
pub use ndarray::prelude::*;

pub const N: usize = 64;
pub const X0: F = -8.0;
pub const DX: F = 0.25;

pub fn header_1d(dt: F) -> Header {
    Header::new(&[N], &[X0], &[DX], dt)
}

/// Normalized gaussian packet centered at `center`, unit discrete norm up to
/// the tails cut off by the box.
pub fn gauss_1d(center: F, sigma: F) -> Array1<C> {
    let norm = 1.0 / (PI * sigma * sigma).powf(0.25);
    Array1::from_iter((0..N).map(|j| {
        let x = X0 + DX * j as F - center;
        C::new(norm * (-x * x / (2.0 * sigma * sigma)).exp(), 0.0)
    }))
}

/// Single-state free-particle propagator (`alpha = 1/2`, no coupling).
pub fn propagator_1d(dt: F) -> Propagator<1> {
    let mut fields = Array2::zeros((1, N));
    fields.row_mut(0).assign(&gauss_1d(0.0, 1.0));
    Propagator::from_parts(header_1d(dt), fields, [0.5], Array2::zeros((1, 1))).unwrap()
}

/// Two-state propagator with a symmetric coupling matrix, second state empty.
pub fn propagator_1d_two(dt: F, g: F) -> Propagator<1> {
    let mut fields = Array2::zeros((2, N));
    fields.row_mut(0).assign(&gauss_1d(0.0, 1.0));
    let gs = Array2::from_shape_vec((2, 2), vec![g, g, g, g]).unwrap();
    Propagator::from_parts(header_1d(dt), fields, [0.5], gs).unwrap()
}

pub fn stage(name: &str, duration: F, dt: F, nk: usize) -> SequenceItem {
    SequenceItem {
        name: name.into(),
        content: String::new(),
        comp: 0,
        duration: vec![duration],
        dt,
        nk,
        output_freq: Freq::None,
        compute_pn_freq: Freq::None,
        custom_freq: Freq::None,
    }
}

pub fn max_abs_diff(a: &ArrayView1<C>, b: &ArrayView1<C>) -> F {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, F::max)
}
