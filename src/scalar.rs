//! Floating-point precision used by every SO(3) operation.
//!
//! All operations are generic over [`Real`], which is implemented for `f32` and `f64`.
//! Each precision carries its own series switch-over thresholds: below them the closed
//! forms (which contain `0/0` at the origin) are replaced by truncated Taylor series.
//!
//! | Constant                | f64    | f32    |
//! |-------------------------|--------|--------|
//! | `EXP_SERIES_THRESHOLD`  | 1e-4   | 1e-2   |
//! | `LOG_SERIES_THRESHOLD`  | 1e-4   | 1e-2   |
//! | `DEFAULT_TOLERANCE`     | 1e-9   | 1e-5   |
//!
//! The series used below these thresholds are truncated after the fourth-order term, so the
//! truncation error is far below machine precision for both types.

use nalgebra::RealField;

/// Scalar type accepted by the SO(3) operations.
pub trait Real: RealField + Copy {
    /// Rotation angle `θ` below which the exponential map and the Jacobian coefficients
    /// are evaluated by their Taylor series.
    const EXP_SERIES_THRESHOLD: Self;

    /// Norm of the quaternion vector part below which the logarithm is evaluated by
    /// its Taylor series.
    const LOG_SERIES_THRESHOLD: Self;

    /// Tolerance used when validating rotation matrices and unit quaternions.
    const DEFAULT_TOLERANCE: Self;
}

impl Real for f64 {
    const EXP_SERIES_THRESHOLD: f64 = 1.0e-4;
    const LOG_SERIES_THRESHOLD: f64 = 1.0e-4;
    const DEFAULT_TOLERANCE: f64 = 1.0e-9;
}

impl Real for f32 {
    const EXP_SERIES_THRESHOLD: f32 = 1.0e-2;
    const LOG_SERIES_THRESHOLD: f32 = 1.0e-2;
    const DEFAULT_TOLERANCE: f32 = 1.0e-5;
}

/// Convert an `f64` literal into the working precision.
#[inline]
pub fn cast<T: Real>(value: f64) -> T {
    nalgebra::convert(value)
}

/// Widen a working-precision value to `f64` for diagnostics.
#[inline]
pub fn to_f64<T: Real>(value: T) -> f64 {
    nalgebra::try_convert(value).unwrap_or(f64::NAN)
}
