//! Stage loop: interprets the configured sequence in order and drives the
//! symmetric (second-order) splitting
//! `half, (V, full) x (Nk-1), V, half` for each outer iteration.

use crate::config::F;
use crate::error::{Result, RgpeError};
use crate::print_and_log;
use crate::propagator::Propagator;
use crate::sequence::{Freq, SequenceItem, StepOp};

fn packed_filename(seq_counter: usize, comp: usize) -> String {
    format!("Seq_{}_{}.bin", seq_counter, comp + 1)
}

impl<const D: usize> Propagator<D> {
    fn apply(&mut self, op: StepOp) {
        match op {
            StepOp::HalfKinetic => self.ft_step_half(),
            StepOp::FullKinetic => self.ft_step_full(),
            StepOp::Potential => self.nl_step(),
            StepOp::NoOp => {}
        }
    }

    /// `set_momentum` pseudo-stage: runs once, never enters the time loop.
    fn momentum_kick_stage(&mut self, seq: &SequenceItem) -> Result<()> {
        let values = seq.content_values()?;
        if values.len() < D {
            return Err(RgpeError::Config(format!(
                "set_momentum needs {D} momentum components, got {}",
                values.len()
            )));
        }
        let mut p = [0.0; D];
        p.copy_from_slice(&values[..D]);
        self.set_momentum(p, seq.comp)?;
        print_and_log!("FYI: momentum set for component {}", seq.comp);
        Ok(())
    }

    fn save_snapshots(&self) -> Result<()> {
        for k in 0..self.n_states() {
            let filename = format!("{:.3}_{}.bin", self.t(), k + 1);
            self.save_phi(&filename, k)?;
        }
        Ok(())
    }

    fn append_packed(&self, seq_counter: usize) -> Result<()> {
        for k in 0..self.n_states() {
            self.append_phi(packed_filename(seq_counter, k), k)?;
        }
        Ok(())
    }

    fn report_particle_numbers(&self) -> Result<()> {
        for c in 0..self.n_states() {
            print_and_log!("N[{}] = {}", c, self.particle_number(c)?);
        }
        Ok(())
    }

    /// Run every configured stage in order. Momentum-kick and custom stages
    /// do not advance the packed-output stage counter.
    pub fn run_sequence(&mut self, sequence: &[SequenceItem]) -> Result<()> {
        print_and_log!("FYI: Found {} sequences.", sequence.len());

        let mut seq_counter = 1usize;
        for seq in sequence {
            if let Some(custom) = self.custom_sequence {
                if custom(self, seq) {
                    continue;
                }
            }

            if seq.name == "set_momentum" {
                print_and_log!("FYI: started new sequence {}", seq.name);
                self.momentum_kick_stage(seq)?;
                continue;
            }

            let op = StepOp::resolve(&seq.name)
                .ok_or_else(|| RgpeError::UnknownStep(seq.name.clone()))?;

            let max_duration = seq.max_duration();
            let nk = seq.nk.max(1);
            let sub_n = (max_duration / seq.dt) as usize;
            let na = sub_n / nk;

            print_and_log!("FYI: started new sequence {}", seq.name);
            print_and_log!("FYI: sequence no : {seq_counter}");
            print_and_log!("FYI: duration    : {max_duration}");
            print_and_log!("FYI: dt          : {}", seq.dt);
            print_and_log!("FYI: Na          : {na}");
            print_and_log!("FYI: Nk          : {nk}");
            print_and_log!("FYI: Na*Nk*dt    : {}", (na * nk) as F * seq.dt);
            if (na * nk) as F * seq.dt != max_duration {
                // informational only: the stage runs the largest whole
                // number of outer iterations that fits
                print_and_log!("FYI: duration is not an integer number of steps");
            }

            if self.dt() != seq.dt {
                self.set_dt(seq.dt);
            }

            // each stage's packed files hold only that stage's frames
            for k in 0..self.n_states() {
                let _ = std::fs::remove_file(packed_filename(seq_counter, k));
            }

            for _ in 0..na {
                self.ft_step_half();
                for _ in 1..nk {
                    self.apply(op);
                    self.ft_step_full();
                }
                self.apply(op);
                self.ft_step_half();

                print_and_log!("t = {}", self.t());

                match seq.output_freq {
                    Freq::Each => self.save_snapshots()?,
                    Freq::Packed => self.append_packed(seq_counter)?,
                    _ => {}
                }
                if seq.compute_pn_freq == Freq::Each {
                    self.report_particle_numbers()?;
                }
                if seq.custom_freq == Freq::Each {
                    if let Some(fct) = self.custom_fct {
                        fct(self, seq);
                    }
                }
            }

            if seq.output_freq == Freq::Last {
                self.save_snapshots()?;
            }
            if seq.compute_pn_freq == Freq::Last {
                self.report_particle_numbers()?;
            }
            if seq.custom_freq == Freq::Last {
                if let Some(fct) = self.custom_fct {
                    fct(self, seq);
                }
            }

            seq_counter += 1;
        }
        Ok(())
    }
}
