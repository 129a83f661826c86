use crate::config::F;
use crate::error::{Result, RgpeError};
use crate::sequence::SequenceItem;
use ndarray::Array2;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Run definition, read from a TOML file.
///
/// One initial-condition file per internal state; the first file's header
/// fixes the grid geometry for the whole run.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// initial-condition snapshots, one per internal state
    pub files: Vec<PathBuf>,
    /// per-axis kinetic scaling coefficients
    pub alpha: Vec<F>,
    /// global time step, in force until a stage overrides it
    pub dt: F,
    /// row-major `no_int_states x no_int_states` coupling matrix; empty
    /// means all zeros
    #[serde(default)]
    pub gs: Vec<F>,
    /// enable the density-dependent phase in the potential step
    #[serde(default)]
    pub nonlinear: bool,
    #[serde(default)]
    pub sequence: Vec<SequenceItem>,
}

impl Params {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RgpeError::Io {
            path: path.into(),
            source,
        })?;
        let params: Params =
            toml::from_str(&raw).map_err(|e| RgpeError::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn n_states(&self) -> usize {
        self.files.len()
    }

    pub fn alpha_array<const D: usize>(&self) -> Result<[F; D]> {
        if self.alpha.len() != D {
            return Err(RgpeError::Config(format!(
                "alpha has {} entries, grid is {D}-dimensional",
                self.alpha.len()
            )));
        }
        let mut alpha = [0.0; D];
        alpha.copy_from_slice(&self.alpha);
        Ok(alpha)
    }

    /// Coupling matrix as an owned `no_int_states x no_int_states` array.
    pub fn gs_matrix(&self) -> Result<Array2<F>> {
        let n = self.n_states();
        if self.gs.is_empty() {
            return Ok(Array2::zeros((n, n)));
        }
        Array2::from_shape_vec((n, n), self.gs.clone()).map_err(|_| {
            RgpeError::Config(format!(
                "gs has {} entries, expected {} for {n} internal states",
                self.gs.len(),
                n * n
            ))
        })
    }

    fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err(RgpeError::Config("at least one initial-condition file required".into()));
        }
        if self.alpha.is_empty() || self.alpha.len() > 3 {
            return Err(RgpeError::Config("alpha must have 1 to 3 entries".into()));
        }
        if !(self.dt.is_finite() && self.dt != 0.0) {
            return Err(RgpeError::Config("dt must be finite and non-zero".into()));
        }
        let n = self.n_states();
        if !self.gs.is_empty() && self.gs.len() != n * n {
            return Err(RgpeError::Config(format!(
                "gs has {} entries, expected {}",
                self.gs.len(),
                n * n
            )));
        }
        for (i, seq) in self.sequence.iter().enumerate() {
            if seq.name == "set_momentum" {
                continue;
            }
            if seq.nk == 0 {
                return Err(RgpeError::Config(format!("sequence {i}: Nk must be at least 1")));
            }
            if !(seq.dt.is_finite() && seq.dt > 0.0) {
                return Err(RgpeError::Config(format!("sequence {i}: dt must be positive")));
            }
            if seq.duration.is_empty() {
                return Err(RgpeError::Config(format!("sequence {i}: duration missing")));
            }
        }
        Ok(())
    }
}
