//! Binary snapshot I/O: one fixed-size header followed by the raw payload,
//! no padding, no compression. The append variant grows a packed file out
//! of back-to-back (header, payload) frames; frame boundaries are
//! recoverable only from the fixed per-frame byte size.

use crate::config::{C, F};
use crate::error::{Result, RgpeError};
use crate::header::{Header, COMPLEX_LEN, HEADER_LEN, REAL_LEN};
use crate::propagator::Propagator;
use ndarray::prelude::*;
use ndarray_npy::WriteNpyExt;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Read one header + complex payload record, e.g. an initial condition or
/// a file produced by [`Propagator::save_phi`].
pub fn load_state(path: impl AsRef<Path>) -> Result<(Header, Array1<C>)> {
    let path = path.as_ref();
    let io_err = |source| RgpeError::Io {
        path: path.into(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let mut reader = BufReader::new(file);

    let mut buf = vec![0u8; HEADER_LEN];
    reader.read_exact(&mut buf).map_err(io_err)?;
    let header = Header::decode(&buf).map_err(|reason| RgpeError::HeaderFormat {
        path: path.into(),
        reason,
    })?;
    if header.b_complex != 1 {
        return Err(RgpeError::HeaderFormat {
            path: path.into(),
            reason: "file does not contain complex data".into(),
        });
    }

    let mut payload = vec![0u8; header.n_total() * COMPLEX_LEN];
    reader.read_exact(&mut payload).map_err(io_err)?;
    let psi: Array1<C> = payload
        .chunks_exact(COMPLEX_LEN)
        .map(|chunk| {
            let re = F::from_le_bytes(chunk[0..8].try_into().expect("8-byte slice"));
            let im = F::from_le_bytes(chunk[8..16].try_into().expect("8-byte slice"));
            C::new(re, im)
        })
        .collect();
    Ok((header, psi))
}

/// Read only the metadata record of a snapshot file.
pub fn load_header(path: impl AsRef<Path>) -> Result<Header> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| RgpeError::Io {
        path: path.into(),
        source,
    })?;
    let mut buf = vec![0u8; HEADER_LEN];
    BufReader::new(file)
        .read_exact(&mut buf)
        .map_err(|source| RgpeError::Io {
            path: path.into(),
            source,
        })?;
    Header::decode(&buf).map_err(|reason| RgpeError::HeaderFormat {
        path: path.into(),
        reason,
    })
}

fn write_complex_record<W: Write>(w: &mut W, header: &Header, psi: &[C]) -> std::io::Result<()> {
    w.write_all(&header.encode())?;
    for value in psi {
        w.write_all(&value.re.to_le_bytes())?;
        w.write_all(&value.im.to_le_bytes())?;
    }
    w.flush()
}

impl<const D: usize> Propagator<D> {
    fn state_slice(&self, comp: usize) -> Result<&[C]> {
        self.check_comp(comp)?;
        Ok(self
            .fields
            .row(comp)
            .to_slice()
            .expect("state rows are contiguous"))
    }

    /// Write one internal state to `path`, replacing any existing content.
    pub fn save_phi(&self, path: impl AsRef<Path>, comp: usize) -> Result<()> {
        let psi = self.state_slice(comp)?;
        let path = path.as_ref();
        let io_err = |source| RgpeError::Io {
            path: path.into(),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
        write_complex_record(&mut writer, &self.header, psi).map_err(io_err)
    }

    /// Append one (header, payload) frame to a packed sequence file,
    /// creating it on first use.
    pub fn append_phi(&self, path: impl AsRef<Path>, comp: usize) -> Result<()> {
        let psi = self.state_slice(comp)?;
        let path = path.as_ref();
        let io_err = |source| RgpeError::Io {
            path: path.into(),
            source,
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        write_complex_record(&mut writer, &self.header, psi).map_err(io_err)
    }

    /// Write a real-valued per-point array with the engine's geometry, for
    /// example a potential. The header is this engine's with `b_complex`
    /// cleared.
    pub fn save_real(&self, path: impl AsRef<Path>, data: &[F]) -> Result<()> {
        if data.len() != self.grid.n_total {
            return Err(RgpeError::Config(format!(
                "data has {} entries, grid has {} points",
                data.len(),
                self.grid.n_total
            )));
        }
        let path = path.as_ref();
        let io_err = |source| RgpeError::Io {
            path: path.into(),
            source,
        };

        let mut header = self.header.clone();
        header.b_complex = 0;
        header.n_datatyp = REAL_LEN as i64;
        header.n_payload = (data.len() * REAL_LEN) as i64;

        let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
        writer.write_all(&header.encode()).map_err(io_err)?;
        for value in data {
            writer.write_all(&value.to_le_bytes()).map_err(io_err)?;
        }
        writer.flush().map_err(io_err)
    }

    /// Export one internal state as `.npy` for quick external inspection.
    pub fn save_npy(&self, path: impl AsRef<Path>, comp: usize) -> Result<()> {
        self.check_comp(comp)?;
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| RgpeError::Io {
            path: path.into(),
            source,
        })?;
        self.fields.row(comp).write_npy(BufWriter::new(file))?;
        Ok(())
    }
}
