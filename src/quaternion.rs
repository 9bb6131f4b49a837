//! Quaternion side of SO(3): exponential map, its derivative, and the linear forms of the
//! quaternion product and of the quaternion → rotation matrix conversion.
//!
//! Quaternions follow nalgebra's Hamilton convention. Whenever a quaternion is flattened into
//! a 4-vector, or a Jacobian has one row/column per quaternion component, the order is
//! `(w, x, y, z)`.
//!
//! # Exponential map for unit quaternions (S³)
//!
//! q = Exp(θu) = cos(θ/2) + u sin(θ/2),  θ = ‖w‖, u = w / θ
//!
//! Written as `q = (cos(θ/2), f(θ)·w)` with `f(θ) = sin(θ/2)/θ`, the map is smooth at the
//! origin once `f` is replaced by its even series `1/2 − θ²/48 + θ⁴/3840` for small `θ`.

use crate::scalar::{Real, cast};
use nalgebra::{Matrix3, Matrix4, Matrix4x3, Quaternion, UnitQuaternion, Vector3, Vector4};

/// Scalar coefficients of the exponential map at a given angle.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ExpCoefficients<T> {
    /// cos(θ/2)
    pub cos_half: T,
    /// f(θ) = sin(θ/2) / θ
    pub sin_half_over_theta: T,
    /// f'(θ) / θ = (θ/2·cos(θ/2) − sin(θ/2)) / θ³
    pub derivative_over_theta: T,
}

impl<T: Real> ExpCoefficients<T> {
    pub fn new(theta_squared: T) -> Self {
        let half: T = cast(0.5);
        let theta = theta_squared.sqrt();
        let threshold = T::EXP_SERIES_THRESHOLD;

        if theta_squared < threshold * threshold {
            let theta_fourth = theta_squared * theta_squared;
            ExpCoefficients {
                cos_half: (theta * half).cos(),
                sin_half_over_theta: half - theta_squared / cast(48.0)
                    + theta_fourth / cast(3840.0),
                derivative_over_theta: theta_squared / cast(960.0)
                    - cast::<T>(1.0 / 24.0)
                    - theta_fourth / cast(107_520.0),
            }
        } else {
            let half_theta = theta * half;
            let (sin_half, cos_half) = half_theta.sin_cos();
            ExpCoefficients {
                cos_half,
                sin_half_over_theta: sin_half / theta,
                derivative_over_theta: (half_theta * cos_half - sin_half)
                    / (theta_squared * theta),
            }
        }
    }
}

/// Exponential map from so(3) to unit quaternions.
///
/// Returns exactly the identity quaternion for `w = 0`.
pub fn quaternion_exp<T: Real>(w: &Vector3<T>) -> UnitQuaternion<T> {
    let coefficients = ExpCoefficients::new(w.norm_squared());
    let v = w * coefficients.sin_half_over_theta;
    UnitQuaternion::new_unchecked(Quaternion::new(coefficients.cos_half, v.x, v.y, v.z))
}

/// Exponential map together with its analytic 4x3 Jacobian `∂q/∂w`.
///
/// Rows of `q_d_w` are ordered `(w, x, y, z)`:
///
/// ∂q_w/∂w = −½ f(θ) wᵀ
/// ∂q_v/∂w = f(θ) I + (f'(θ)/θ) w wᵀ
///
/// At `w = 0` this is `[0ᵀ; I/2]`.
#[derive(Clone, Debug, PartialEq)]
pub struct QuaternionExpDerivative<T: Real> {
    /// Exp(w)
    pub q: UnitQuaternion<T>,
    /// ∂q/∂w
    pub q_d_w: Matrix4x3<T>,
}

impl<T: Real> QuaternionExpDerivative<T> {
    pub fn new(w: &Vector3<T>) -> Self {
        let coefficients = ExpCoefficients::new(w.norm_squared());
        let f = coefficients.sin_half_over_theta;
        let v = w * f;
        let q = UnitQuaternion::new_unchecked(Quaternion::new(
            coefficients.cos_half,
            v.x,
            v.y,
            v.z,
        ));

        let mut q_d_w = Matrix4x3::zeros();
        q_d_w
            .fixed_view_mut::<1, 3>(0, 0)
            .copy_from(&(w.transpose() * (-f * cast::<T>(0.5))));
        q_d_w.fixed_view_mut::<3, 3>(1, 0).copy_from(
            &(Matrix3::identity() * f
                + w * w.transpose() * coefficients.derivative_over_theta),
        );

        QuaternionExpDerivative { q, q_d_w }
    }
}

/// Flatten a quaternion into a `(w, x, y, z)` 4-vector.
pub fn quaternion_vec<T: Real>(q: &Quaternion<T>) -> Vector4<T> {
    Vector4::new(q.w, q.i, q.j, q.k)
}

/// Left-multiplication by `q` as a 4x4 matrix.
///
/// For any quaternion `p`: `quaternion_mul_matrix(q) * quaternion_vec(p) == quaternion_vec(q * p)`.
/// `q` does not need unit norm.
#[rustfmt::skip]
pub fn quaternion_mul_matrix<T: Real>(q: &Quaternion<T>) -> Matrix4<T> {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);
    Matrix4::new(
        w, -x, -y, -z,
        x,  w, -z,  y,
        y,  z,  w, -x,
        z, -y,  x,  w,
    )
}

/// Partial derivatives `∂R/∂q_k`, `k ∈ (w, x, y, z)`, of the quaternion → rotation matrix map.
///
/// The map is differentiated in its homogeneous form (diagonal `w² ± x² ± y² ± z²`), which
/// agrees with `UnitQuaternion::to_rotation_matrix` on the unit sphere.
#[rustfmt::skip]
pub fn quaternion_to_matrix_derivative<T: Real>(q: &Quaternion<T>) -> [Matrix3<T>; 4] {
    let two: T = cast(2.0);
    let (w, x, y, z) = (q.w * two, q.i * two, q.j * two, q.k * two);
    [
        Matrix3::new(
             w, -z,  y,
             z,  w, -x,
            -y,  x,  w,
        ),
        Matrix3::new(
             x,  y,  z,
             y, -x, -w,
             z,  w, -x,
        ),
        Matrix3::new(
            -y,  x,  w,
             x,  y,  z,
            -w,  z, -y,
        ),
        Matrix3::new(
            -z, -w,  x,
             w, -z,  y,
             x,  y,  z,
        ),
    ]
}
