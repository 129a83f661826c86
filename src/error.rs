use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RgpeError>;

#[derive(Debug, Error)]
pub enum RgpeError {
    /// Malformed run definition. Fatal: the run terminates without retry.
    #[error("invalid run definition: {0}")]
    Config(String),

    /// A stage named an operator that is not in the step table.
    #[error("invalid sequence name {0:?}")]
    UnknownStep(String),

    #[error("could not open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {reason}")]
    HeaderFormat { path: PathBuf, reason: String },

    #[error("header is {found}-dimensional, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("component index {comp} out of bounds (no_int_states = {n_states})")]
    CompOutOfRange { comp: usize, n_states: usize },

    #[error("potential not initialized; call init_potential first")]
    PotentialNotInitialized,

    #[error("npy export failed: {0}")]
    Npy(#[from] ndarray_npy::WriteNpyError),
}
