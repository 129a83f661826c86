use super::*;
use crate::header::{COMPLEX_LEN, HEADER_LEN, REAL_LEN};
use crate::snapshot::{load_header, load_state};
use ndarray_npy::ReadNpyExt;
use std::fs::File;

#[test]
fn save_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phi.bin");

    let mut prop = propagator_1d(0.01);
    prop.set_momentum([0.7], 0).unwrap();
    prop.save_phi(&path, 0).unwrap();

    let (header, psi) = load_state(&path).unwrap();
    assert_eq!(&header, prop.header());
    // binary payload survives bit-exactly
    assert_eq!(psi.view(), prop.state(0).unwrap());
}

#[test]
fn append_grows_by_whole_frames() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("packed.bin");

    let prop = propagator_1d(0.01);
    prop.append_phi(&path, 0).unwrap();
    prop.append_phi(&path, 0).unwrap();

    let frame = (HEADER_LEN + N * COMPLEX_LEN) as u64;
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 2 * frame);

    // the first frame reads back as a regular snapshot
    let (header, psi) = load_state(&path).unwrap();
    assert_eq!(header.n_total(), N);
    assert_eq!(psi.len(), N);
}

#[test]
fn real_export_flips_header_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("potential.bin");

    let prop = propagator_1d(0.01);
    let data: Vec<F> = (0..N).map(|l| l as F).collect();
    prop.save_real(&path, &data).unwrap();

    assert_eq!(
        std::fs::metadata(&path).unwrap().len(),
        (HEADER_LEN + N * REAL_LEN) as u64
    );
    let header = load_header(&path).unwrap();
    assert_eq!(header.b_complex, 0);
    assert_eq!(header.n_datatyp, REAL_LEN as i64);

    // complex loader must refuse the real payload
    assert!(load_state(&path).is_err());

    assert!(prop.save_real(&path, &data[..N - 1]).is_err());
}

#[test]
fn npy_export_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phi.npy");

    let prop = propagator_1d(0.01);
    prop.save_npy(&path, 0).unwrap();

    let psi = Array1::<C>::read_npy(File::open(&path).unwrap()).unwrap();
    assert_eq!(psi.view(), prop.state(0).unwrap());
}

#[test]
fn missing_file_reports_path() {
    let err = load_state("no_such_file.bin").unwrap_err();
    assert!(err.to_string().contains("no_such_file.bin"));
}
