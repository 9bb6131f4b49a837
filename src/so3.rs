//! SO(3) - Special Orthogonal Group in 3D
//!
//! [`SO3`] is a rotation stored as a unit quaternion, with the group operations needed to
//! optimize over rotations. Tangent vectors are plain `Vector3<T>` axis-angle vectors.
//!
//! Operations that have Jacobians take optional out-parameters. All Jacobians are taken with
//! respect to right perturbations `R ⊕ δ = R · Exp(δ)` of the group arguments, following the
//! conventions of the manif library.

use crate::error::{So3Error, So3Result};
use crate::jacobian::{JacobianSide, so3_jacobian_side};
use crate::log::quaternion_log;
use crate::quaternion::quaternion_exp;
use crate::scalar::{Real, cast, to_f64};
use crate::skew::skew3;
use nalgebra::{Matrix3, Quaternion, Rotation3, UnitQuaternion, Vector3};
use std::fmt;
use tracing::debug;

/// SO(3) group element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SO3<T: Real> {
    quaternion: UnitQuaternion<T>,
}

impl<T: Real> fmt::Display for SO3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let q = self.quaternion.quaternion();
        write!(
            f,
            "SO3(quaternion: [w: {:.4}, x: {:.4}, y: {:.4}, z: {:.4}])",
            q.w, q.i, q.j, q.k
        )
    }
}

impl<T: Real> Default for SO3<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Real> SO3<T> {
    pub fn identity() -> Self {
        SO3 {
            quaternion: UnitQuaternion::identity(),
        }
    }

    /// Create a new SO(3) element from a unit quaternion.
    pub fn new(quaternion: UnitQuaternion<T>) -> Self {
        SO3 { quaternion }
    }

    /// Create SO(3) from quaternion coefficients in `(w, x, y, z)` order.
    ///
    /// Coefficients off the unit sphere by more than `T::DEFAULT_TOLERANCE` are renormalized.
    ///
    /// # Errors
    /// [`So3Error::DegenerateQuaternion`] if the norm is not finite or too small to normalize.
    pub fn from_quaternion_wxyz(w: T, x: T, y: T, z: T) -> So3Result<Self> {
        let q = Quaternion::new(w, x, y, z);
        let norm = q.norm();
        if !norm.is_finite() || norm < T::DEFAULT_TOLERANCE {
            debug!(norm = to_f64(norm), "rejecting degenerate quaternion");
            return Err(So3Error::DegenerateQuaternion { norm: to_f64(norm) });
        }
        if (norm - T::one()).abs() > T::DEFAULT_TOLERANCE {
            debug!(norm = to_f64(norm), "renormalizing quaternion");
        }
        Ok(SO3 {
            quaternion: UnitQuaternion::new_unchecked(q / norm),
        })
    }

    /// Create SO(3) from a rotation matrix.
    ///
    /// # Errors
    /// [`So3Error::InvalidRotationMatrix`] if `‖RᵀR − I‖ > T::DEFAULT_TOLERANCE` or `det R ≤ 0`.
    pub fn from_matrix(matrix: &Matrix3<T>) -> So3Result<Self> {
        let orthogonality_error = (matrix.transpose() * matrix - Matrix3::identity()).norm();
        let determinant = matrix.determinant();
        let orthogonal =
            orthogonality_error.is_finite() && orthogonality_error <= T::DEFAULT_TOLERANCE;
        if !orthogonal || determinant <= T::zero() {
            debug!(
                orthogonality_error = to_f64(orthogonality_error),
                determinant = to_f64(determinant),
                "rejecting rotation matrix"
            );
            return Err(So3Error::InvalidRotationMatrix {
                orthogonality_error: to_f64(orthogonality_error),
                determinant: to_f64(determinant),
            });
        }
        Ok(SO3 {
            quaternion: UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(
                *matrix,
            )),
        })
    }

    /// Exponential map `Exp(τ)`.
    ///
    /// # Arguments
    /// * `tangent` - Axis-angle vector [θx, θy, θz]
    /// * `jacobian` - Optional right Jacobian `J_r(τ)`
    pub fn exp(tangent: &Vector3<T>, jacobian: Option<&mut Matrix3<T>>) -> Self {
        if let Some(jac) = jacobian {
            *jac = so3_jacobian_side(tangent, JacobianSide::Right, false);
        }
        SO3 {
            quaternion: quaternion_exp(tangent),
        }
    }

    /// Principal logarithm, with angle in `[0, π]`.
    ///
    /// # Arguments
    /// * `jacobian` - Optional Jacobian of the tangent wrt self, `J_r⁻¹(θ)`
    pub fn log(&self, jacobian: Option<&mut Matrix3<T>>) -> Vector3<T> {
        let q = self.quaternion.quaternion();
        let tangent = if q.w < T::zero() {
            quaternion_log(&-*q)
        } else {
            quaternion_log(q)
        };

        if let Some(jac) = jacobian {
            *jac = so3_jacobian_side(&tangent, JacobianSide::Right, true);
        }

        tangent
    }

    /// SO3 composition `R₁ · R₂`.
    ///
    /// # Notes
    /// J_R₁R₂_R₁ = R₂ᵀ
    /// J_R₁R₂_R₂ = I
    pub fn compose(
        &self,
        other: &Self,
        jacobian_self: Option<&mut Matrix3<T>>,
        jacobian_other: Option<&mut Matrix3<T>>,
    ) -> Self {
        if let Some(jac_self) = jacobian_self {
            *jac_self = other.rotation_matrix().transpose();
        }
        if let Some(jac_other) = jacobian_other {
            *jac_other = Matrix3::identity();
        }
        SO3 {
            quaternion: self.quaternion * other.quaternion,
        }
    }

    /// SO3 inverse, `J_R⁻¹_R = −R`.
    pub fn inverse(&self, jacobian: Option<&mut Matrix3<T>>) -> Self {
        if let Some(jac) = jacobian {
            *jac = -self.rotation_matrix();
        }
        SO3 {
            quaternion: self.quaternion.inverse(),
        }
    }

    /// Rotate a vector.
    ///
    /// # Notes
    /// J_Rv_R = −R [v]ₓ
    /// J_Rv_v = R
    pub fn act(
        &self,
        vector: &Vector3<T>,
        jacobian_self: Option<&mut Matrix3<T>>,
        jacobian_vector: Option<&mut Matrix3<T>>,
    ) -> Vector3<T> {
        if let Some(jac_self) = jacobian_self {
            *jac_self = -self.rotation_matrix() * skew3(vector);
        }
        if let Some(jac_vector) = jacobian_vector {
            *jac_vector = self.rotation_matrix();
        }
        self.quaternion * vector
    }

    /// Right plus: R ⊕ τ = R · Exp(τ)
    ///
    /// # Notes
    /// J_R⊕τ_R = Exp(τ)ᵀ
    /// J_R⊕τ_τ = J_r(τ)
    pub fn right_plus(
        &self,
        tangent: &Vector3<T>,
        jacobian_self: Option<&mut Matrix3<T>>,
        jacobian_tangent: Option<&mut Matrix3<T>>,
    ) -> Self {
        let increment = SO3::exp(tangent, jacobian_tangent);
        self.compose(&increment, jacobian_self, None)
    }

    /// Right minus: R₁ ⊖ R₂ = Log(R₂ᵀ · R₁)
    ///
    /// # Notes
    /// J_R₁⊖R₂_R₁ = J_r⁻¹(τ)
    /// J_R₁⊖R₂_R₂ = −J_l⁻¹(τ)
    pub fn right_minus(
        &self,
        other: &Self,
        jacobian_self: Option<&mut Matrix3<T>>,
        jacobian_other: Option<&mut Matrix3<T>>,
    ) -> Vector3<T> {
        let tangent = other.inverse(None).compose(self, None, None).log(jacobian_self);
        if let Some(jac_other) = jacobian_other {
            *jac_other = -so3_jacobian_side(&tangent, JacobianSide::Left, true);
        }
        tangent
    }

    /// Adjoint matrix, which for SO(3) is the rotation matrix itself.
    pub fn adjoint(&self) -> Matrix3<T> {
        self.rotation_matrix()
    }

    pub fn rotation_matrix(&self) -> Matrix3<T> {
        self.quaternion.to_rotation_matrix().into_inner()
    }

    pub fn quaternion(&self) -> &UnitQuaternion<T> {
        &self.quaternion
    }

    /// Random rotation with axis-angle components drawn uniformly from `[-1, 1)`.
    pub fn random() -> Self {
        let component = || cast::<T>(rand::random::<f64>() * 2.0 - 1.0);
        let tangent = Vector3::new(component(), component(), component());
        SO3::exp(&tangent, None)
    }

    pub fn normalize(&mut self) {
        self.quaternion.renormalize();
    }

    /// Check that the stored quaternion has unit norm within `tolerance`.
    pub fn is_valid(&self, tolerance: T) -> bool {
        (self.quaternion.quaternion().norm() - T::one()).abs() < tolerance
    }

    /// Check that two rotations differ by an angle below `tolerance`. `q` and `−q` compare equal.
    pub fn is_approx(&self, other: &Self, tolerance: T) -> bool {
        self.right_minus(other, None, None).norm() < tolerance
    }
}
