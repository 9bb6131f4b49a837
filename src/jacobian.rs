//! Jacobians of the SO(3) exponential map and of the retraction `Log(R · Exp(w))`.
//!
//! # Jacobians of the exponential map
//!
//! J_l(θ) = I + (1 − cos θ)/θ² [θ]ₓ + (θ − sin θ)/θ³ [θ]ₓ²
//! J_l⁻¹(θ) = I − ½ [θ]ₓ + (1/θ² − (1 + cos θ)/(2θ sin θ)) [θ]ₓ²
//! J_r(θ) = J_l(−θ) = J_l(θ)ᵀ
//!
//! Exp(θ + δ) ≈ Exp(J_l δ) ∘ Exp(θ) ≈ Exp(θ) ∘ Exp(J_r δ)
//!
//! The coefficients are evaluated in forms without cancellation at the origin:
//! `(1 − cos θ)/θ² = 2 f(θ)²` with `f(θ) = sin(θ/2)/θ`, and
//! `1/θ² − (1 + cos θ)/(2θ sin θ) = (1 − cos(θ/2)/(2 f(θ)))/θ²`. The last coefficient is
//! regular at `θ = π` and singular only at `θ = 2π`, where `J` itself is not invertible.

use crate::log::RotationLogDerivative;
use crate::quaternion::{
    ExpCoefficients, QuaternionExpDerivative, quaternion_mul_matrix,
    quaternion_to_matrix_derivative,
};
use crate::scalar::{Real, cast};
use crate::skew::skew3;
use nalgebra::{Matrix3, SMatrix, UnitQuaternion, Vector3};

/// Which side a tangent perturbation is composed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JacobianSide {
    /// `Exp(w + δ) ≈ Exp(J δ) ∘ Exp(w)`
    #[default]
    Left,
    /// `Exp(w + δ) ≈ Exp(w) ∘ Exp(J δ)`
    Right,
}

/// Jacobian of the exponential map in the form `I + a [w]ₓ + b [w]ₓ²` (left Jacobian), or its
/// closed-form inverse when `inverse` is set.
pub fn so3_jacobian<T: Real>(w: &Vector3<T>, inverse: bool) -> Matrix3<T> {
    so3_jacobian_side(w, JacobianSide::Left, inverse)
}

/// Left or right Jacobian of the exponential map, or its closed-form inverse.
pub fn so3_jacobian_side<T: Real>(w: &Vector3<T>, side: JacobianSide, inverse: bool) -> Matrix3<T> {
    // J_r(w) = J_l(-w): flipping the sign of [w]ₓ selects the side
    let skew = match side {
        JacobianSide::Left => skew3(w),
        JacobianSide::Right => -skew3(w),
    };
    let skew_squared = skew * skew;
    let theta_squared = w.norm_squared();
    let threshold = T::EXP_SERIES_THRESHOLD;
    let small = theta_squared < threshold * threshold;
    let theta_fourth = theta_squared * theta_squared;

    if inverse {
        let c = if small {
            cast::<T>(1.0 / 12.0) + theta_squared / cast(720.0) + theta_fourth / cast(30_240.0)
        } else {
            let coefficients = ExpCoefficients::new(theta_squared);
            (T::one() - coefficients.cos_half / (coefficients.sin_half_over_theta * cast(2.0)))
                / theta_squared
        };
        Matrix3::identity() - skew * cast::<T>(0.5) + skew_squared * c
    } else {
        let (a, b) = if small {
            (
                cast::<T>(0.5) - theta_squared / cast(24.0) + theta_fourth / cast(720.0),
                cast::<T>(1.0 / 6.0) - theta_squared / cast(120.0) + theta_fourth / cast(5040.0),
            )
        } else {
            let f = ExpCoefficients::new(theta_squared).sin_half_over_theta;
            let theta = theta_squared.sqrt();
            (
                f * f * cast(2.0),
                (theta - theta.sin()) / (theta_squared * theta),
            )
        };
        Matrix3::identity() + skew * a + skew_squared * b
    }
}

/// Derivative of the rotation matrix `R = Exp(w)` with respect to `w`.
///
/// `R` is vectorized column-major, so rows `3j..3j + 3` hold `∂R[:, j]/∂w`. At `w = 0`
/// block `j` equals `−[e_j]ₓ`, the negated so(3) generators.
pub fn so3_exp_matrix_derivative<T: Real>(w: &Vector3<T>) -> SMatrix<T, 9, 3> {
    let QuaternionExpDerivative { q, q_d_w } = QuaternionExpDerivative::new(w);
    let partials = quaternion_to_matrix_derivative(q.quaternion());
    let r_d_q = SMatrix::<T, 9, 4>::from_fn(|row, k| partials[k][(row % 3, row / 3)]);
    r_d_q * q_d_w
}

/// Derivative of the retraction `Log(R · Exp(w))` with respect to `w`, at any `w`.
///
/// Chain rule through the quaternion product:
/// ∂Log/∂q (R · Exp(w)) · M(R) · ∂Exp/∂w (w), with `M(R)` the left-multiplication matrix of `R`.
pub fn so3_retract_derivative<T: Real>(r: &UnitQuaternion<T>, w: &Vector3<T>) -> Matrix3<T> {
    let QuaternionExpDerivative { q, q_d_w } = QuaternionExpDerivative::new(w);
    let composed = r.quaternion() * q.quaternion();
    let log = RotationLogDerivative::new(&composed);
    log.w_d_q * quaternion_mul_matrix(r.quaternion()) * q_d_w
}
