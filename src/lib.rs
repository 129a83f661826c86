/// Split-step Fourier propagation for coupled wavefunctions with one to
/// three spatial dimensions and any number of internal states.
///
/// Each outer iteration applies the symmetric splitting
/// \\[ e^{-i H \Delta t} \approx e^{-i K \Delta t / 2}
///     \left( e^{-i V \Delta t} e^{-i K \Delta t} \right)^{N_k - 1}
///     e^{-i V \Delta t} e^{-i K \Delta t / 2} \\]
/// with the kinetic factors evaluated exactly in momentum space.
pub mod config;
pub mod error;
pub mod fft;
pub mod grid;
pub mod header;
pub mod macros;
pub mod observables;
pub mod params;
pub mod propagator;
pub mod scheduler;
pub mod sequence;
pub mod snapshot;

#[cfg(test)]
mod tests;
