use crate::config::{C, F};
use crate::error::Result;
use crate::grid::Grid;
use crate::propagator::Propagator;
use rayon::prelude::*;

/// Observable reductions over one internal state.
///
/// All three run as two-phase parallel reductions: each worker accumulates
/// into its own partial sum, and the partials are combined only after every
/// one of them is complete. Summation order across workers is unspecified;
/// only the combined value is part of the contract.
impl<const D: usize> Propagator<D> {
    /// Particle number of one internal state: the squared-magnitude
    /// integral scaled by the position-space cell volume.
    pub fn particle_number(&self, comp: usize) -> Result<F> {
        self.check_comp(comp)?;
        let psi = self.fields.row(comp);
        let psi = psi.as_slice().expect("state rows are contiguous");
        let sum: F = psi.par_iter().map(|p| p.norm_sqr()).sum();
        Ok(self.grid.ar * sum)
    }

    /// Expectation value of position, one entry per axis.
    pub fn expval_position(&self, comp: usize) -> Result<[F; D]> {
        self.check_comp(comp)?;
        let psi = self.fields.row(comp);
        let psi = psi.as_slice().expect("state rows are contiguous");
        let acc = accumulate_density_weighted(psi, &self.grid, Grid::point);
        Ok(acc.map(|v| self.grid.ar * v))
    }

    /// Expectation value of momentum, one entry per axis. The state is
    /// taken to momentum space for the accumulation and transformed back
    /// before returning, so its position-space representation is unchanged
    /// up to floating tolerance.
    pub fn expval_momentum(&mut self, comp: usize) -> Result<[F; D]> {
        self.check_comp(comp)?;
        let ar_k = self.grid.ar_k;
        let Self {
            fields, fft, grid, ..
        } = self;
        let mut psi = fields.row_mut(comp);

        fft.fft(psi.view_mut());
        let acc = {
            let psi = psi.as_slice().expect("state rows are contiguous");
            accumulate_density_weighted(psi, grid, Grid::momentum)
        };
        fft.ifft(psi.view_mut());

        Ok(acc.map(|v| ar_k * v))
    }
}

/// Sum `coordinate(l)[i] * |psi[l]|^2` per axis: per-worker `[F; D]`
/// partials first, one combine pass after all partials are written.
fn accumulate_density_weighted<const D: usize>(
    psi: &[C],
    grid: &Grid<D>,
    coordinate: fn(&Grid<D>, usize) -> [F; D],
) -> [F; D] {
    psi.par_iter()
        .enumerate()
        .fold(
            || [0.0; D],
            |mut acc, (l, p)| {
                let x = coordinate(grid, l);
                let density = p.norm_sqr();
                for i in 0..D {
                    acc[i] += x[i] * density;
                }
                acc
            },
        )
        .reduce(
            || [0.0; D],
            |mut a, b| {
                for i in 0..D {
                    a[i] += b[i];
                }
                a
            },
        )
}
