//! Error types for the so3-diff library
//!
//! The math kernels are total and never fail. Errors only arise when constructing an
//! [`SO3`](crate::so3::SO3) from raw data that does not describe a rotation.

use thiserror::Error;

/// Result type used by the fallible constructors
pub type So3Result<T> = Result<T, So3Error>;

/// Rejection reasons for raw rotation data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum So3Error {
    /// Matrix is not orthonormal or has the wrong handedness
    #[error(
        "Invalid rotation matrix: orthogonality error {orthogonality_error:e}, determinant {determinant}"
    )]
    InvalidRotationMatrix {
        /// ‖RᵀR − I‖ (Frobenius)
        orthogonality_error: f64,
        determinant: f64,
    },

    /// Quaternion too close to zero (or not finite) to be normalized
    #[error("Degenerate quaternion: norm {norm:e}")]
    DegenerateQuaternion { norm: f64 },
}
