use super::*;
use crate::params::Params;
use crate::sequence::Freq;
use std::io::Write;

fn load_str(raw: &str) -> crate::error::Result<Params> {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(raw.as_bytes()).unwrap();
    Params::load(file.path())
}

const GOOD: &str = r#"
files = ["phi_1.bin", "phi_2.bin"]
alpha = [0.5]
dt = 0.01
gs = [1.0, 0.5, 0.5, 2.0]
nonlinear = true

[[sequence]]
name = "set_momentum"
content = "0.5"
comp = 1

[[sequence]]
name = "freeprop"
duration = [10.0, 5.0]
dt = 0.001
nk = 10
output_freq = "packed"
compute_pn_freq = "last"
"#;

#[test]
fn toml_run_definition_parses() {
    let params = load_str(GOOD).unwrap();
    assert_eq!(params.n_states(), 2);
    assert_eq!(params.alpha_array::<1>().unwrap(), [0.5]);
    assert!(params.nonlinear);

    let gs = params.gs_matrix().unwrap();
    assert_eq!(gs[[0, 1]], 0.5);
    assert_eq!(gs[[1, 1]], 2.0);

    assert_eq!(params.sequence.len(), 2);
    let kick = &params.sequence[0];
    assert_eq!(kick.comp, 1);
    assert_eq!(kick.content_values().unwrap(), vec![0.5]);

    let prop = &params.sequence[1];
    assert_eq!(prop.max_duration(), 10.0);
    assert_eq!(prop.nk, 10);
    assert_eq!(prop.output_freq, Freq::Packed);
    assert_eq!(prop.compute_pn_freq, Freq::Last);
    assert_eq!(prop.custom_freq, Freq::None);
}

#[test]
fn alpha_dimension_mismatch_is_an_error() {
    let params = load_str(GOOD).unwrap();
    assert!(params.alpha_array::<2>().is_err());
}

#[test]
fn validation_rejects_broken_definitions() {
    assert!(load_str("files = []\nalpha = [0.5]\ndt = 0.01\n").is_err());
    assert!(load_str("files = [\"a.bin\"]\nalpha = []\ndt = 0.01\n").is_err());
    assert!(load_str("files = [\"a.bin\"]\nalpha = [0.5]\ndt = 0.0\n").is_err());
    // gs must be square in the number of states
    assert!(load_str("files = [\"a.bin\"]\nalpha = [0.5]\ndt = 0.01\ngs = [1.0, 2.0]\n").is_err());

    let bad_stage = r#"
files = ["a.bin"]
alpha = [0.5]
dt = 0.01

[[sequence]]
name = "freeprop"
duration = [1.0]
dt = 0.001
nk = 0
"#;
    assert!(load_str(bad_stage).is_err());
}
