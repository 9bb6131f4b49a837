//! Derivative of the rotation matrix `Exp(w)` with respect to `w`.
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]


use nalgebra::{Matrix3, SMatrix, Vector3};
use so3_diff::{
    JacobianSide, quaternion_exp, skew3, so3_exp_matrix_derivative, so3_jacobian_side,
};
use std::f64::consts::PI;
use test_utils::*;

fn check_exp_matrix_derivative<T: TestScalar>(samples: &[[f64; 3]], step: T, tolerance: T) {
    for &w in samples {
        let w = tangent::<T>(w);
        let analytical = so3_exp_matrix_derivative(&w);
        let numerical = numerical_jacobian(
            |v: &Vector3<T>| vectorize(&quaternion_exp(v).to_rotation_matrix().into_inner()),
            &w,
            step,
        );
        let error = max_abs_diff(&analytical, &numerical);
        assert!(
            error < tolerance,
            "∂Exp/∂w mismatch at w = {w:?}: error {error}"
        );
    }
}

fn near_zero_samples() -> Vec<[f64; 3]> {
    vec![
        [1e-7, 0.5e-6, 3.5e-8],
        [0.0, 0.0, 0.0],
        [-1e-7, 1e-8, 0.5e-6],
    ]
}

/// `∂R/∂w_k` as a 3x3 matrix, read out of the column-major 9x3 Jacobian.
fn partial(derivative: &SMatrix<f64, 9, 3>, k: usize) -> Matrix3<f64> {
    Matrix3::from_fn(|row, col| derivative[(3 * col + row, k)])
}

#[test]
fn test_so3_exp_matrix_derivative_grid_f64() {
    check_exp_matrix_derivative::<f64>(
        &grid3(&angle_range(-PI, PI, 0.2)),
        f64::STEP,
        f64::DERIVATIVE_TOLERANCE,
    );
}

#[test]
fn test_so3_exp_matrix_derivative_grid_f32() {
    check_exp_matrix_derivative::<f32>(
        &grid3(&angle_range(-PI, PI, 0.2)),
        f32::STEP,
        f32::DERIVATIVE_TOLERANCE,
    );
}

#[test]
fn test_so3_exp_matrix_derivative_near_zero() {
    check_exp_matrix_derivative::<f64>(
        &near_zero_samples(),
        f64::NEAR_ZERO_STEP,
        f64::NEAR_ZERO_TOLERANCE,
    );
    check_exp_matrix_derivative::<f32>(
        &near_zero_samples(),
        f32::NEAR_ZERO_STEP,
        f32::NEAR_ZERO_TOLERANCE,
    );
}

#[test]
fn test_so3_exp_matrix_derivative_at_zero_is_generators() {
    let derivative = so3_exp_matrix_derivative(&Vector3::<f64>::zeros());
    for (k, axis) in [Vector3::<f64>::x(), Vector3::y(), Vector3::z()].iter().enumerate() {
        assert!((partial(&derivative, k) - skew3(axis)).norm() < 1e-15);
    }
}

#[test]
fn test_so3_exp_matrix_derivative_matches_right_jacobian() {
    // ∂Exp(w)/∂w_k = Exp(w) [J_r(w) e_k]ₓ
    for w in grid3(&angle_range(-PI, PI, 0.5)) {
        let w = Vector3::from(w);
        let derivative = so3_exp_matrix_derivative(&w);
        let rotation = quaternion_exp(&w).to_rotation_matrix().into_inner();
        let jr = so3_jacobian_side(&w, JacobianSide::Right, false);
        for k in 0..3 {
            let expected = rotation * skew3(&jr.column(k).into_owned());
            assert!(
                (partial(&derivative, k) - expected).norm() < 1e-12,
                "∂R/∂w_{k} mismatch at w = {w:?}"
            );
        }
    }
}
