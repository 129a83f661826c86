use num_complex::Complex;

// Scalar type for the whole crate. The snapshot payload stores two 8-byte
// floats per point, so this stays f64.
pub type F = f64;

// complex type consistent with F
pub type C = Complex<F>;

// constants
pub const PI: F = std::f64::consts::PI;
pub const I: C = Complex::I;
