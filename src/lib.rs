//! # so3-diff
//!
//! Differentiable SO(3) primitives for nonlinear least squares over 3D rotations.
//!
//! ## Features
//!
//! - **Exponential and logarithmic maps** between axis-angle vectors and unit quaternions, smooth
//!   through the origin thanks to Taylor-series branches
//! - **Analytic Jacobians** of the exponential map, of the logarithm, of the rotation matrix and
//!   of the retraction `Log(R · Exp(w))`
//! - **Generic precision**: every operation works for `f32` and `f64` with precision-scaled
//!   series thresholds
//! - **[`SO3`] group element** with manif-style Jacobian out-parameters
//!
//! ## Conventions
//!
//! - Quaternion 4-vectors and quaternion rows/columns of Jacobians are ordered `(w, x, y, z)`.
//! - 3x3 matrices are vectorized column-major into 9-vectors.
//!
//! ```
//! use nalgebra::{UnitQuaternion, Vector3};
//! use so3_diff::{quaternion_exp, rotation_log, so3_retract_derivative};
//!
//! let w = Vector3::new(0.1, -0.4, 0.25);
//! let q = quaternion_exp(&w);
//! assert!((rotation_log(&q) - w).norm() < 1e-12);
//!
//! let jacobian = so3_retract_derivative(&UnitQuaternion::<f64>::identity(), &Vector3::zeros());
//! assert_eq!(jacobian, nalgebra::Matrix3::identity());
//! ```

pub mod error;
pub mod jacobian;
pub mod log;
pub mod logger;
pub mod quaternion;
pub mod scalar;
pub mod skew;
pub mod so3;

pub use error::{So3Error, So3Result};
pub use jacobian::{
    JacobianSide, so3_exp_matrix_derivative, so3_jacobian, so3_jacobian_side,
    so3_retract_derivative,
};
pub use log::{RotationLogDerivative, quaternion_log, rotation_log, rotation_log_matrix};
pub use logger::{init_logger, init_logger_with_level};
pub use quaternion::{
    QuaternionExpDerivative, quaternion_exp, quaternion_mul_matrix,
    quaternion_to_matrix_derivative, quaternion_vec,
};
pub use scalar::Real;
pub use skew::{skew3, vee3};
pub use so3::SO3;
