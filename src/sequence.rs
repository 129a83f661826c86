use crate::config::F;
use crate::error::{Result, RgpeError};
use serde::Deserialize;

/// How often an output action fires within a stage.
///
/// `Packed` appends every outer iteration's frame to one growing file per
/// (stage, component) pair and only applies to snapshot output; the particle
/// number and custom-hook cadences use `None`/`Each`/`Last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Freq {
    #[default]
    None,
    Each,
    Last,
    Packed,
}

/// The closed set of step operators a stage can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOp {
    HalfKinetic,
    FullKinetic,
    Potential,
    NoOp,
}

impl StepOp {
    /// Stage names kept compatible with existing run definitions:
    /// `freeprop` is the nonlinear/potential step, `freeprop_lin` skips the
    /// position-space phase entirely.
    pub fn resolve(name: &str) -> Option<Self> {
        match name {
            "half_step" => Some(Self::HalfKinetic),
            "full_step" => Some(Self::FullKinetic),
            "freeprop" => Some(Self::Potential),
            "freeprop_lin" => Some(Self::NoOp),
            _ => None,
        }
    }
}

/// One configured stage of the run.
///
/// `set_momentum` stages are recognized by name in the scheduler and execute
/// once, outside the time loop; `content` then holds the comma-separated
/// momentum components and `comp` the target internal state.
#[derive(Debug, Clone, Deserialize)]
pub struct SequenceItem {
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub comp: usize,
    /// target duration per component; the stage runs until the slowest one
    /// is done
    #[serde(default)]
    pub duration: Vec<F>,
    #[serde(default)]
    pub dt: F,
    /// inner sub-steps per outer iteration
    #[serde(default = "default_nk")]
    pub nk: usize,
    #[serde(default)]
    pub output_freq: Freq,
    #[serde(default)]
    pub compute_pn_freq: Freq,
    #[serde(default)]
    pub custom_freq: Freq,
}

fn default_nk() -> usize {
    1
}

impl SequenceItem {
    pub fn max_duration(&self) -> F {
        self.duration.iter().cloned().fold(0.0, F::max)
    }

    /// Parse the comma-separated numeric content list.
    pub fn content_values(&self) -> Result<Vec<F>> {
        self.content
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<F>().map_err(|_| {
                    RgpeError::Config(format!("bad numeric literal {s:?} in sequence content"))
                })
            })
            .collect()
    }
}
