//! Hat/vee operators between R³ and so(3).

use crate::scalar::{Real, cast};
use nalgebra::{Matrix3, Vector3};

/// Skew-symmetric (cross-product) matrix of `w`.
///
/// [w]ₓ = [0 -z y; z 0 -x; -y x 0], so that `skew3(w) * v == w.cross(v)`.
#[rustfmt::skip]
pub fn skew3<T: Real>(w: &Vector3<T>) -> Matrix3<T> {
    let zero = T::zero();
    Matrix3::new(
         zero, -w.z,  w.y,
         w.z,  zero, -w.x,
        -w.y,  w.x,  zero,
    )
}

/// Vee operator, the inverse of [`skew3`].
///
/// Only the antisymmetric part of `m` is read, so a slightly non-skew input is projected
/// onto so(3) first.
pub fn vee3<T: Real>(m: &Matrix3<T>) -> Vector3<T> {
    let half: T = cast(0.5);
    Vector3::new(
        (m[(2, 1)] - m[(1, 2)]) * half,
        (m[(0, 2)] - m[(2, 0)]) * half,
        (m[(1, 0)] - m[(0, 1)]) * half,
    )
}
