use crate::config::{F, PI};

/// Total size of the on-disk metadata record in bytes, padding included.
/// Files written by other tools are recognized by this value in the first
/// field, so it is part of the format, not a tunable.
pub const HEADER_LEN: usize = 1380;

/// Bytes per complex payload element: two little-endian f64, real then
/// imaginary.
pub const COMPLEX_LEN: usize = 16;

/// Bytes per real payload element.
pub const REAL_LEN: usize = 8;

/// Fixed-size metadata record written in front of every snapshot payload.
///
/// The layout is little-endian: seven i64, two i32, fourteen f64, then zero
/// padding up to [`HEADER_LEN`]. The engine mutates only `t` and `dt`; all
/// other fields are fixed at construction and copied verbatim through
/// save/load cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// size of this record in bytes, always [`HEADER_LEN`]
    pub nself: i64,
    /// bytes per payload element
    pub n_datatyp: i64,
    /// total payload size in bytes
    pub n_payload: i64,
    pub n_dims: i64,
    pub n_dim_x: i64,
    pub n_dim_y: i64,
    pub n_dim_z: i64,
    pub b_atom: i32,
    /// 1 for complex payload, 0 for real
    pub b_complex: i32,
    /// accumulated simulated time
    pub t: F,
    pub x_min: F,
    pub x_max: F,
    pub y_min: F,
    pub y_max: F,
    pub z_min: F,
    pub z_max: F,
    pub dx: F,
    pub dy: F,
    pub dz: F,
    pub dkx: F,
    pub dky: F,
    pub dkz: F,
    /// time-step magnitude of the run that produced the file
    pub dt: F,
}

impl Header {
    /// Build a header for a complex-valued field on a regular grid.
    /// Unused axes get one point and zero extent.
    pub fn new(n: &[usize], x0: &[F], dx: &[F], dt: F) -> Self {
        assert!(!n.is_empty() && n.len() <= 3, "1 to 3 dimensions supported");
        assert_eq!(n.len(), x0.len(), "Dimension Error");
        assert_eq!(n.len(), dx.len(), "Dimension Error");

        let dim = |i: usize| if i < n.len() { n[i] as i64 } else { 1 };
        let lo = |i: usize| if i < x0.len() { x0[i] } else { 0.0 };
        let hi = |i: usize| if i < n.len() { x0[i] + dx[i] * n[i] as F } else { 0.0 };
        let step = |i: usize| if i < dx.len() { dx[i] } else { 0.0 };
        let kstep = |i: usize| {
            if i < n.len() {
                2.0 * PI / (n[i] as F * dx[i])
            } else {
                0.0
            }
        };
        let n_total: i64 = (0..n.len()).map(|i| n[i] as i64).product();

        Self {
            nself: HEADER_LEN as i64,
            n_datatyp: COMPLEX_LEN as i64,
            n_payload: n_total * COMPLEX_LEN as i64,
            n_dims: n.len() as i64,
            n_dim_x: dim(0),
            n_dim_y: dim(1),
            n_dim_z: dim(2),
            b_atom: 1,
            b_complex: 1,
            t: 0.0,
            x_min: lo(0),
            x_max: hi(0),
            y_min: lo(1),
            y_max: hi(1),
            z_min: lo(2),
            z_max: hi(2),
            dx: step(0),
            dy: step(1),
            dz: step(2),
            dkx: kstep(0),
            dky: kstep(1),
            dkz: kstep(2),
            dt,
        }
    }

    /// Total number of grid points described by the record.
    pub fn n_total(&self) -> usize {
        let dims = [self.n_dim_x, self.n_dim_y, self.n_dim_z];
        dims.iter()
            .take(self.n_dims as usize)
            .map(|&d| d as usize)
            .product()
    }

    /// Serialize into exactly [`HEADER_LEN`] bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_LEN];
        let mut off = 0usize;
        let mut put_i64 = |buf: &mut Vec<u8>, v: i64| {
            buf[off..off + 8].copy_from_slice(&v.to_le_bytes());
            off += 8;
        };
        put_i64(&mut buf, self.nself);
        put_i64(&mut buf, self.n_datatyp);
        put_i64(&mut buf, self.n_payload);
        put_i64(&mut buf, self.n_dims);
        put_i64(&mut buf, self.n_dim_x);
        put_i64(&mut buf, self.n_dim_y);
        put_i64(&mut buf, self.n_dim_z);
        buf[56..60].copy_from_slice(&self.b_atom.to_le_bytes());
        buf[60..64].copy_from_slice(&self.b_complex.to_le_bytes());
        let doubles = [
            self.t, self.x_min, self.x_max, self.y_min, self.y_max, self.z_min, self.z_max,
            self.dx, self.dy, self.dz, self.dkx, self.dky, self.dkz, self.dt,
        ];
        let mut off = 64usize;
        for v in doubles {
            buf[off..off + 8].copy_from_slice(&v.to_le_bytes());
            off += 8;
        }
        buf
    }

    /// Deserialize from a [`HEADER_LEN`]-byte block. The returned reason
    /// string describes the first format violation found.
    pub fn decode(buf: &[u8]) -> std::result::Result<Self, String> {
        if buf.len() < HEADER_LEN {
            return Err(format!("truncated header ({} of {HEADER_LEN} bytes)", buf.len()));
        }
        let i64_at = |off: usize| i64::from_le_bytes(buf[off..off + 8].try_into().unwrap());
        let i32_at = |off: usize| i32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
        let f64_at = |off: usize| F::from_le_bytes(buf[off..off + 8].try_into().unwrap());

        let header = Self {
            nself: i64_at(0),
            n_datatyp: i64_at(8),
            n_payload: i64_at(16),
            n_dims: i64_at(24),
            n_dim_x: i64_at(32),
            n_dim_y: i64_at(40),
            n_dim_z: i64_at(48),
            b_atom: i32_at(56),
            b_complex: i32_at(60),
            t: f64_at(64),
            x_min: f64_at(72),
            x_max: f64_at(80),
            y_min: f64_at(88),
            y_max: f64_at(96),
            z_min: f64_at(104),
            z_max: f64_at(112),
            dx: f64_at(120),
            dy: f64_at(128),
            dz: f64_at(136),
            dkx: f64_at(144),
            dky: f64_at(152),
            dkz: f64_at(160),
            dt: f64_at(168),
        };

        if header.nself != HEADER_LEN as i64 {
            return Err(format!("invalid file format (nself = {})", header.nself));
        }
        if !(1..=3).contains(&header.n_dims) {
            return Err(format!("unsupported dimensionality {}", header.n_dims));
        }
        let dims = [header.n_dim_x, header.n_dim_y, header.n_dim_z];
        if dims.iter().take(header.n_dims as usize).any(|&d| d < 1) {
            return Err("non-positive point count".into());
        }
        Ok(header)
    }
}
