use super::*;
use crate::header::{Header, COMPLEX_LEN, HEADER_LEN};

#[test]
fn encode_decode_roundtrip() {
    let mut header = Header::new(&[8, 4, 2], &[-1.0, -2.0, -3.0], &[0.25, 0.5, 1.0], 0.01);
    header.t = 1.5;
    let buf = header.encode();
    assert_eq!(buf.len(), HEADER_LEN);
    let decoded = Header::decode(&buf).unwrap();
    assert_eq!(decoded, header);
    assert_eq!(decoded.n_total(), 64);
    assert_eq!(decoded.n_payload, 64 * COMPLEX_LEN as i64);
}

#[test]
fn unused_axes_are_degenerate() {
    let header = header_1d(0.01);
    assert_eq!(header.n_dims, 1);
    assert_eq!((header.n_dim_y, header.n_dim_z), (1, 1));
    assert_eq!((header.y_min, header.y_max), (0.0, 0.0));
    assert_eq!(header.dky, 0.0);
    assert!((header.dkx - 2.0 * PI / (N as F * DX)).abs() < 1e-14);
    assert!((header.x_max - (X0 + DX * N as F)).abs() < 1e-14);
}

#[test]
fn decode_rejects_foreign_records() {
    let header = header_1d(0.01);

    let mut buf = header.encode();
    buf[0..8].copy_from_slice(&7i64.to_le_bytes());
    assert!(Header::decode(&buf).unwrap_err().contains("nself"));

    let mut buf = header.encode();
    buf[24..32].copy_from_slice(&4i64.to_le_bytes());
    assert!(Header::decode(&buf).is_err());

    let mut buf = header.encode();
    buf[32..40].copy_from_slice(&0i64.to_le_bytes());
    assert!(Header::decode(&buf).is_err());

    assert!(Header::decode(&header.encode()[..100]).is_err());
}
