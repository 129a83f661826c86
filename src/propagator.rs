use crate::config::{C, F};
use crate::error::{Result, RgpeError};
use crate::fft::FftMaker;
use crate::grid::Grid;
use crate::header::Header;
use crate::params::Params;
use crate::sequence::SequenceItem;
use crate::snapshot;
use itertools::multizip;
use ndarray::prelude::*;
use rayon::prelude::*;

/// Cadence-driven hook invoked from the stage loop.
pub type StepFct<const D: usize> = fn(&mut Propagator<D>, &SequenceItem);

/// Per-stage override consulted before built-in dispatch; returning true
/// consumes the stage.
pub type SequenceFct<const D: usize> = fn(&mut Propagator<D>, &SequenceItem) -> bool;

/// Split-step propagator for `D`-dimensional coupled wavefunctions.
///
/// Owns one contiguous complex buffer per internal state (rows of `fields`)
/// plus the precomputed kinetic operator tables. Every step operator mutates
/// the fields in place; parallel workers only ever touch disjoint point
/// indices, so the point loops run lock-free.
pub struct Propagator<const D: usize> {
    pub(crate) header: Header,
    pub(crate) grid: Grid<D>,
    alpha: [F; D],
    gs: Array2<F>,
    /// one row per internal state, `n_total` points each
    pub(crate) fields: Array2<C>,
    /// exp(-i*dt/2*K) per point
    pub(crate) half_step: Array1<C>,
    /// exp(-i*dt*K) per point
    pub(crate) full_step: Array1<C>,
    potential: Option<Array2<F>>,
    pub(crate) fft: FftMaker<D>,
    nonlinear: bool,
    pub(crate) custom_fct: Option<StepFct<D>>,
    pub(crate) custom_sequence: Option<SequenceFct<D>>,
}

impl<const D: usize> Propagator<D> {
    /// Load the initial condition named by `params` and build the engine.
    /// The first file's header fixes the geometry; every further component
    /// must match its point count.
    pub fn new(params: &Params) -> Result<Self> {
        let first_file = params
            .files
            .first()
            .ok_or_else(|| RgpeError::Config("at least one initial-condition file required".into()))?;
        let (mut header, first) = snapshot::load_state(first_file)?;
        header.dt = params.dt;
        let n_total = header.n_total();

        let mut fields = Array2::zeros((params.n_states(), n_total));
        fields.row_mut(0).assign(&first);
        for (i, path) in params.files.iter().enumerate().skip(1) {
            let (h, psi) = snapshot::load_state(path)?;
            if h.n_total() != n_total {
                return Err(RgpeError::Config(format!(
                    "{}: point count differs from first component",
                    path.display()
                )));
            }
            fields.row_mut(i).assign(&psi);
        }

        let mut prop =
            Self::from_parts(header, fields, params.alpha_array::<D>()?, params.gs_matrix()?)?;
        prop.nonlinear = params.nonlinear;
        Ok(prop)
    }

    /// Build the engine from already-loaded parts. `fields` holds one row
    /// per internal state; its column count must equal the header's point
    /// count. The operator tables are computed here from `header.dt`.
    pub fn from_parts(
        header: Header,
        fields: Array2<C>,
        alpha: [F; D],
        gs: Array2<F>,
    ) -> Result<Self> {
        let grid = Grid::<D>::from_header(&header)?;
        let n_states = fields.nrows();
        if n_states == 0 {
            return Err(RgpeError::Config("at least one internal state required".into()));
        }
        if fields.ncols() != grid.n_total {
            return Err(RgpeError::Config(format!(
                "field length {} does not match grid point count {}",
                fields.ncols(),
                grid.n_total
            )));
        }
        if gs.dim() != (n_states, n_states) {
            return Err(RgpeError::Config(format!(
                "gs matrix is {:?}, expected ({n_states}, {n_states})",
                gs.dim()
            )));
        }
        let fft = FftMaker::new(&grid.n);
        let mut prop = Self {
            half_step: Array1::zeros(grid.n_total),
            full_step: Array1::zeros(grid.n_total),
            header,
            grid,
            alpha,
            gs,
            fields,
            potential: None,
            fft,
            nonlinear: false,
            custom_fct: None,
            custom_sequence: None,
        };
        prop.build_operator_table();
        Ok(prop)
    }

    pub fn n_states(&self) -> usize {
        self.fields.nrows()
    }

    pub fn n_points(&self) -> usize {
        self.grid.n_total
    }

    pub fn t(&self) -> F {
        self.header.t
    }

    pub fn dt(&self) -> F {
        self.header.dt
    }

    pub fn grid(&self) -> &Grid<D> {
        &self.grid
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn state(&self, comp: usize) -> Result<ArrayView1<C>> {
        self.check_comp(comp)?;
        Ok(self.fields.row(comp))
    }

    pub fn state_mut(&mut self, comp: usize) -> Result<ArrayViewMut1<C>> {
        self.check_comp(comp)?;
        Ok(self.fields.row_mut(comp))
    }

    /// Enable or disable the density-dependent phase in [`Self::nl_step`].
    /// Disabled by default: the static potential is then the only
    /// contribution.
    pub fn set_nonlinear(&mut self, enabled: bool) {
        self.nonlinear = enabled;
    }

    pub fn set_custom_fct(&mut self, fct: StepFct<D>) {
        self.custom_fct = Some(fct);
    }

    pub fn set_custom_sequence(&mut self, fct: SequenceFct<D>) {
        self.custom_sequence = Some(fct);
    }

    /// Change the time step. Both operator tables encode dt, so they are
    /// rebuilt here; propagating with a stale table silently degrades the
    /// second-order splitting without any visible error.
    pub fn set_dt(&mut self, dt: F) {
        self.header.dt = dt;
        self.build_operator_table();
    }

    pub(crate) fn check_comp(&self, comp: usize) -> Result<()> {
        let n_states = self.fields.nrows();
        if comp >= n_states {
            Err(RgpeError::CompOutOfRange { comp, n_states })
        } else {
            Ok(())
        }
    }

    /// Precompute the exact kinetic propagator per point:
    /// `phi = -dt * (k . diag(alpha) . k)`, half table `exp(i*phi/2)`, full
    /// table `exp(i*phi)`.
    pub fn build_operator_table(&mut self) {
        let dt = -self.header.dt;
        let grid = &self.grid;
        let alpha = self.alpha;
        multizip((self.half_step.iter_mut(), self.full_step.iter_mut()))
            .enumerate()
            .par_bridge()
            .for_each(|(l, (half, full))| {
                let k = grid.momentum(l);
                let mut phi = 0.0;
                for i in 0..D {
                    phi += alpha[i] * k[i] * k[i];
                }
                phi *= dt;
                *half = C::new((0.5 * phi).cos(), (0.5 * phi).sin());
                *full = C::new(phi.cos(), phi.sin());
            });
    }

    fn apply_kinetic(&mut self, half: bool) {
        {
            let Self {
                fields,
                fft,
                half_step,
                full_step,
                ..
            } = self;
            let table = if half { &*half_step } else { &*full_step };

            for mut psi in fields.axis_iter_mut(Axis(0)) {
                fft.fft(psi.view_mut());
            }
            for mut psi in fields.axis_iter_mut(Axis(0)) {
                psi.iter_mut()
                    .zip(table.iter())
                    .par_bridge()
                    .for_each(|(p, u)| {
                        *p *= *u;
                    });
            }
            for mut psi in fields.axis_iter_mut(Axis(0)) {
                fft.ifft(psi.view_mut());
            }
        }
        self.header.t += if half {
            0.5 * self.header.dt
        } else {
            self.header.dt
        };
    }

    /// Exact kinetic propagation over one full time step; advances t by dt.
    pub fn ft_step_full(&mut self) {
        self.apply_kinetic(false);
    }

    /// Exact kinetic propagation over half a time step; advances t by dt/2.
    pub fn ft_step_half(&mut self) {
        self.apply_kinetic(true);
    }

    /// Nonlinear/potential step: the position-space diagonal piece of the
    /// splitting. No transform, no time advance. With the nonlinear term
    /// disabled (the default) only the static potential contributes.
    pub fn nl_step(&mut self) {
        let dt = -self.header.dt;
        let n_states = self.fields.nrows();
        let potential = self.potential.as_ref();
        let gs = &self.gs;
        let nonlinear = self.nonlinear;

        self.fields
            .axis_iter_mut(Axis(1))
            .enumerate()
            .par_bridge()
            .for_each(|(l, mut point)| {
                for i in 0..n_states {
                    let mut phi = match potential {
                        Some(v) => v[[i, l]],
                        None => 0.0,
                    };
                    if nonlinear {
                        let density = point[i].norm_sqr();
                        // zero or negative density contributes no phase
                        if density > 0.0 {
                            for j in 0..n_states {
                                phi += gs[[i, j]] * point[j].norm_sqr();
                            }
                        }
                    }
                    phi *= dt;
                    // the rotation has unit magnitude, so densities read for
                    // later states at this point are unaffected
                    point[i] *= C::new(phi.cos(), phi.sin());
                }
            });
    }

    /// Imprint a constant momentum onto one internal state by multiplying
    /// with `exp(i * p . x)` in position space. One-shot, outside the time
    /// loop.
    pub fn set_momentum(&mut self, p: [F; D], comp: usize) -> Result<()> {
        self.check_comp(comp)?;
        let grid = &self.grid;
        let mut psi = self.fields.row_mut(comp);
        psi.iter_mut()
            .enumerate()
            .par_bridge()
            .for_each(|(l, value)| {
                let x = grid.point(l);
                let mut phase = 0.0;
                for i in 0..D {
                    phase += p[i] * x[i];
                }
                *value *= C::new(phase.cos(), phase.sin());
            });
        Ok(())
    }

    /// Allocate zero-valued external potentials for every internal state.
    /// Until this runs the potential is absent and contributes no phase.
    pub fn init_potential(&mut self) {
        let shape = (self.fields.nrows(), self.grid.n_total);
        self.potential = Some(Array2::zeros(shape));
    }

    /// Point-wise setter for the static external potential.
    pub fn set_potential(&mut self, comp: usize, index: usize, value: F) -> Result<()> {
        self.check_comp(comp)?;
        let n_total = self.grid.n_total;
        let potential = self
            .potential
            .as_mut()
            .ok_or(RgpeError::PotentialNotInitialized)?;
        if index >= n_total {
            return Err(RgpeError::Config(format!(
                "potential index {index} out of range ({n_total} points)"
            )));
        }
        potential[[comp, index]] = value;
        Ok(())
    }
}
