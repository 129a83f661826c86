use crate::config::{F, PI};
use crate::error::{Result, RgpeError};
use crate::header::Header;

/// Grid geometry shared by every internal state: position-space and
/// momentum-space coordinate lookup for a flat C-order point index, plus the
/// cell-volume constants used by the observable reductions.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<const D: usize> {
    pub n: [usize; D],
    pub x0: [F; D],
    pub dx: [F; D],
    pub dk: [F; D],
    pub n_total: usize,
    /// position-space cell volume
    pub ar: F,
    /// momentum-space cell volume, matched to the unnormalized forward
    /// transform convention
    pub ar_k: F,
}

impl<const D: usize> Grid<D> {
    pub fn new(n: [usize; D], x0: [F; D], dx: [F; D]) -> Self {
        let mut dk = [0.0; D];
        for i in 0..D {
            dk[i] = 2.0 * PI / (n[i] as F * dx[i]);
        }
        let n_total: usize = n.iter().product();
        let ar: F = dx.iter().product();
        Self {
            n,
            x0,
            dx,
            dk,
            n_total,
            ar,
            ar_k: ar / n_total as F,
        }
    }

    pub fn from_header(header: &Header) -> Result<Self> {
        if header.n_dims as usize != D {
            return Err(RgpeError::DimensionMismatch {
                expected: D,
                found: header.n_dims as usize,
            });
        }
        let dims = [header.n_dim_x, header.n_dim_y, header.n_dim_z];
        let lows = [header.x_min, header.y_min, header.z_min];
        let steps = [header.dx, header.dy, header.dz];
        let mut n = [0usize; D];
        let mut x0 = [0.0; D];
        let mut dx = [0.0; D];
        for i in 0..D {
            n[i] = dims[i] as usize;
            x0[i] = lows[i];
            dx[i] = steps[i];
        }
        Ok(Self::new(n, x0, dx))
    }

    /// Position-space coordinate of flat index `l`.
    pub fn point(&self, l: usize) -> [F; D] {
        let mut x = [0.0; D];
        let mut rem = l;
        for i in (0..D).rev() {
            let j = rem % self.n[i];
            rem /= self.n[i];
            x[i] = self.x0[i] + self.dx[i] * j as F;
        }
        x
    }

    /// Momentum-space coordinate of flat index `l`, in the frequency
    /// ordering of the unshifted transform: non-negative frequencies first,
    /// then the negative tail.
    pub fn momentum(&self, l: usize) -> [F; D] {
        let mut k = [0.0; D];
        let mut rem = l;
        for i in (0..D).rev() {
            let j = rem % self.n[i];
            rem /= self.n[i];
            let m = (self.n[i] + 1) / 2;
            let freq = if j < m {
                j as isize
            } else {
                j as isize - self.n[i] as isize
            };
            k[i] = self.dk[i] * freq as F;
        }
        k
    }
}
