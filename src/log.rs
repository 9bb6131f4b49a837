//! Logarithmic map from SO(3) back to so(3).
//!
//! # Logarithmic map for unit quaternions (S³)
//!
//! θu = Log(q) = 2·atan2(‖v‖, w) · v / ‖v‖
//!
//! Written as `Log(q) = g(s, c)·v` with `s = ‖v‖`, `c = w` and `g = 2·atan2(s, c)/s`. For
//! small `s` the factor is evaluated by the series `(2/c)(1 − s²/(3c²) + s⁴/(5c⁴))`.
//!
//! # Sign convention
//!
//! The quaternion is used with the sign it was supplied with: `q` and `−q` describe the same
//! rotation, and both logarithms map back to the quaternion they came from under
//! [`quaternion_exp`](crate::quaternion::quaternion_exp). For `w ≥ 0` (everything the
//! exponential map produces from `‖w‖ ≤ π`) the angle is the principal value in `[0, π]`.
//! For `w < 0` the angle lies in `(π, 2π]`, except when `s` is below the series threshold, where
//! the series yields the short vector of the same rotation.
//!
//! At exactly `θ = π` the axis sign is inherited from the input and is not canonicalized.

use crate::scalar::{Real, cast};
use nalgebra::{Matrix3, Matrix3x4, Quaternion, Rotation3, UnitQuaternion, Vector3};

/// Scalar coefficients of the logarithm for a quaternion with vector norm `s` and real part `c`.
#[derive(Clone, Copy, Debug)]
struct LogCoefficients<T> {
    /// g(s, c) = 2·atan2(s, c) / s
    g: T,
    /// (∂g/∂s) / s
    g_d_s_over_s: T,
}

impl<T: Real> LogCoefficients<T> {
    fn new(s_squared: T, c: T) -> Self {
        let two: T = cast(2.0);
        let threshold = T::LOG_SERIES_THRESHOLD;

        if s_squared < threshold * threshold {
            let c_squared = c * c;
            let ratio = s_squared / c_squared;
            LogCoefficients {
                g: two / c * (T::one() - ratio / cast(3.0) + ratio * ratio / cast(5.0)),
                g_d_s_over_s: (s_squared * cast(8.0) / (c_squared * cast(5.0))
                    - cast(4.0 / 3.0))
                    / (c_squared * c),
            }
        } else {
            let s = s_squared.sqrt();
            let g = two * s.atan2(c) / s;
            LogCoefficients {
                g,
                g_d_s_over_s: (two * c / (s_squared + c * c) - g) / s_squared,
            }
        }
    }
}

/// Logarithm of a unit quaternion.
pub fn rotation_log<T: Real>(q: &UnitQuaternion<T>) -> Vector3<T> {
    quaternion_log(q.quaternion())
}

/// Logarithm of a (nominally unit) quaternion without the `Unit` wrapper.
pub fn quaternion_log<T: Real>(q: &Quaternion<T>) -> Vector3<T> {
    let v = q.imag();
    let coefficients = LogCoefficients::new(v.norm_squared(), q.w);
    v * coefficients.g
}

/// Logarithm of a rotation matrix.
///
/// The matrix is converted to a quaternion first; since a matrix carries no quaternion sign, the
/// quaternion is taken in the `w ≥ 0` hemisphere and the result is the principal value with
/// angle in `[0, π]`.
pub fn rotation_log_matrix<T: Real>(r: &Matrix3<T>) -> Vector3<T> {
    let q = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(*r));
    if q.w < T::zero() {
        quaternion_log(&(-q.into_inner()))
    } else {
        rotation_log(&q)
    }
}

/// Logarithm together with its analytic 3x4 Jacobian `∂Log/∂q`.
///
/// Columns of `w_d_q` are ordered `(w, x, y, z)`:
///
/// ∂Log/∂c = −2/(s² + c²) · v
/// ∂Log/∂v = g I + ((∂g/∂s)/s) v vᵀ
///
/// The quaternion components are treated as independent, so the Jacobian can be chained with
/// any derivative of a quaternion-valued map.
#[derive(Clone, Debug, PartialEq)]
pub struct RotationLogDerivative<T: Real> {
    /// Log(q)
    pub w: Vector3<T>,
    /// ∂Log/∂q
    pub w_d_q: Matrix3x4<T>,
}

impl<T: Real> RotationLogDerivative<T> {
    pub fn new(q: &Quaternion<T>) -> Self {
        let v = q.imag();
        let c = q.w;
        let s_squared = v.norm_squared();
        let coefficients = LogCoefficients::new(s_squared, c);

        let mut w_d_q = Matrix3x4::zeros();
        w_d_q
            .fixed_view_mut::<3, 1>(0, 0)
            .copy_from(&(v * (-cast::<T>(2.0) / (s_squared + c * c))));
        w_d_q.fixed_view_mut::<3, 3>(0, 1).copy_from(
            &(Matrix3::identity() * coefficients.g
                + v * v.transpose() * coefficients.g_d_s_over_s),
        );

        RotationLogDerivative {
            w: v * coefficients.g,
            w_d_q,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quaternion::quaternion_exp;
    use std::f64::consts::PI;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn test_rotation_log_inverts_exp() {
        let w = Vector3::new(-0.7_f64, 0.0, 0.4);
        assert!((rotation_log(&quaternion_exp(&w)) - w).norm() < TOLERANCE);

        let w = Vector3::new(1.5_f64, -1.7, 1.2);
        assert!(w.norm() < PI);
        assert!((rotation_log(&quaternion_exp(&w)) - w).norm() < TOLERANCE);
    }

    #[test]
    fn test_rotation_log_of_identity() {
        assert_eq!(rotation_log(&UnitQuaternion::<f64>::identity()), Vector3::zeros());
        assert_eq!(rotation_log_matrix(&Matrix3::<f32>::identity()), Vector3::zeros());
    }

    #[test]
    fn test_rotation_log_small_angles() {
        for &angle in &[1e-9, 1e-6, 0.999e-4, 1.001e-4, 1e-3] {
            let w = Vector3::new(angle, -0.5 * angle, 2.0 * angle);
            let recovered = rotation_log(&quaternion_exp(&w));
            assert!(
                (recovered - w).norm() < 1e-15,
                "round trip failed for angle = {angle}"
            );
        }
    }

    #[test]
    fn test_rotation_log_negated_quaternion_round_trips() {
        let w = Vector3::new(0.3_f64, -0.8, 0.5);
        let q = quaternion_exp(&w);
        let negated = UnitQuaternion::new_unchecked(-q.into_inner());

        let w_negated = rotation_log(&negated);
        // same rotation, opposite axis, complementary angle
        assert!((w_negated.norm() - (2.0 * PI - w.norm())).abs() < TOLERANCE);
        assert!((w_negated.normalize() + w.normalize()).norm() < TOLERANCE);

        let back = quaternion_exp(&w_negated);
        assert!((back.quaternion() - negated.quaternion()).norm() < TOLERANCE);
        let r_back = back.to_rotation_matrix().into_inner();
        let r = q.to_rotation_matrix().into_inner();
        assert!((r_back - r).norm() < 1e-10);
    }

    #[test]
    fn test_rotation_log_matrix_principal_value() {
        let w = Vector3::new(0.01_f32, -0.5, 0.03);
        let r = quaternion_exp(&w).to_rotation_matrix().into_inner();
        assert!((rotation_log_matrix(&r) - w).norm() < 1e-6);

        // a quaternion in the w < 0 hemisphere still gives the short vector through the matrix path
        let w = Vector3::new(-1.0, 2.0, 0.5);
        let negated = UnitQuaternion::new_unchecked(-quaternion_exp(&w).into_inner());
        let r = negated.to_rotation_matrix().into_inner();
        assert!((rotation_log_matrix(&r) - w).norm() < 1e-10);
    }

    #[test]
    fn test_rotation_log_near_pi() {
        let axis = Vector3::new(1.0, 0.0, 0.0);
        let w = axis * (PI - 1e-8);
        let recovered = rotation_log(&quaternion_exp(&w));
        assert!((recovered - w).norm() < 1e-10);
    }

    #[test]
    fn test_rotation_log_derivative_value_matches_log() {
        let q = quaternion_exp(&Vector3::new(0.2, 0.4, -2.2));
        let derivative = RotationLogDerivative::new(q.quaternion());
        assert_eq!(derivative.w, rotation_log(&q));
    }

    #[test]
    fn test_rotation_log_derivative_at_identity() {
        let derivative = RotationLogDerivative::new(&Quaternion::<f64>::identity());
        let mut expected = Matrix3x4::zeros();
        expected
            .fixed_view_mut::<3, 3>(0, 1)
            .copy_from(&(Matrix3::identity() * 2.0));
        assert_eq!(derivative.w_d_q, expected);
    }

    #[test]
    fn test_rotation_log_derivative_directional() {
        for w in [
            Vector3::new(0.3, -0.2, 0.9),
            Vector3::new(2.0, 1.0, -0.5),
            Vector3::new(3e-5, -1e-5, 2e-5),
        ] {
            let q = *quaternion_exp(&w).quaternion();
            let dq = Quaternion::new(0.3, -0.1, 0.6, 0.2);
            let h = 1e-6;
            let numerical =
                (quaternion_log(&(q + dq * h)) - quaternion_log(&(q - dq * h))) / (2.0 * h);

            let derivative = RotationLogDerivative::new(&q);
            let analytical = derivative.w_d_q * crate::quaternion::quaternion_vec(&dq);
            assert!(
                (numerical - analytical).norm() < 1e-8,
                "directional derivative mismatch at w = {w:?}"
            );
        }
    }
}
