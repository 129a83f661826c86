use crate::config::{C, F};
use ndarray::prelude::*;
use ndrustfft::{ndfft_par, ndifft_par, FftHandler};

/// In-place forward/inverse Fourier transform over all axes of one internal
/// state held as a flat C-order buffer.
///
/// The forward transform is unnormalized and the inverse divides by the
/// point count, so `ifft(fft(psi)) == psi` within floating tolerance and no
/// renormalization happens anywhere else in the engine.
pub struct FftMaker<const D: usize> {
    handlers: [FftHandler<F>; D],
    shape: [usize; D],
    scratch: ArrayD<C>,
}

impl<const D: usize> FftMaker<D> {
    pub fn new(n: &[usize; D]) -> Self {
        let handlers = std::array::from_fn(|i| FftHandler::new(n[i]));
        let scratch = ArrayD::zeros(IxDyn(n));
        Self {
            handlers,
            shape: *n,
            scratch,
        }
    }

    /// Forward transform, applied axis by axis.
    pub fn fft(&mut self, psi: ArrayViewMut1<C>) {
        let mut a = psi
            .into_shape(IxDyn(&self.shape))
            .expect("state buffer must be contiguous with grid shape");
        for (axis, handler) in self.handlers.iter_mut().enumerate() {
            ndfft_par(&a, &mut self.scratch, handler, axis);
            a.assign(&self.scratch);
        }
    }

    /// Inverse transform, applied axis by axis.
    pub fn ifft(&mut self, psi: ArrayViewMut1<C>) {
        let mut a = psi
            .into_shape(IxDyn(&self.shape))
            .expect("state buffer must be contiguous with grid shape");
        for (axis, handler) in self.handlers.iter_mut().enumerate() {
            ndifft_par(&a, &mut self.scratch, handler, axis);
            a.assign(&self.scratch);
        }
    }
}
