use rgpe::error::Result;
use rgpe::params::Params;
use rgpe::propagator::Propagator;
use rgpe::{measure_time, print_and_log};
use rgpe::snapshot;
use std::process::ExitCode;

fn run_dim<const D: usize>(params: &Params) -> Result<()> {
    let mut prop = Propagator::<D>::new(params)?;
    prop.run_sequence(&params.sequence)?;
    print_and_log!("final t = {}", prop.t());
    Ok(())
}

fn run() -> Result<()> {
    let params_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "params.toml".into());
    let params = Params::load(&params_file)?;

    // the first initial-condition file fixes the dimensionality
    let header = snapshot::load_header(&params.files[0])?;
    match header.n_dims {
        1 => run_dim::<1>(&params),
        2 => run_dim::<2>(&params),
        _ => run_dim::<3>(&params),
    }
}

fn main() -> ExitCode {
    measure_time!("total run time", {
        if let Err(e) = run() {
            eprintln!("Critical Error: {e}");
            return ExitCode::FAILURE;
        }
    });
    ExitCode::SUCCESS
}
