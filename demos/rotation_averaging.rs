//! Single-rotation averaging with Gauss-Newton
//!
//! Noisy measurements `M_i = R_true · Exp(n_i)` are averaged by minimizing
//! `Σ ‖Log(M_i⁻¹ · R)‖²` over `R`. Each iteration linearizes the residuals with
//! `so3_retract_derivative` and updates the estimate on the manifold with `R ← R · Exp(δ)`.
//!
//! ```bash
//! cargo run --example rotation_averaging -- --measurements 50 --noise 0.2
//! ```

use clap::Parser;
use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use so3_diff::{SO3, init_logger, rotation_log, so3_retract_derivative};
use std::error::Error;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "rotation_averaging")]
#[command(about = "Average noisy rotation measurements with Gauss-Newton on SO(3)")]
struct Args {
    /// Number of noisy measurements of the true rotation
    #[arg(short, long, default_value = "20")]
    measurements: usize,

    /// Scale of the tangent-space noise added to each measurement (radians)
    #[arg(short, long, default_value = "0.1")]
    noise: f64,

    /// Maximum number of Gauss-Newton iterations
    #[arg(long, default_value = "20")]
    max_iterations: usize,

    /// Stop once the update norm drops below this value
    #[arg(long, default_value = "1e-12")]
    step_tolerance: f64,
}

/// Residual `Log(M⁻¹ · R · Exp(δ))` at `δ = 0` and its Jacobian with respect to `δ`.
fn linearize(measurement: &SO3<f64>, estimate: &SO3<f64>) -> (Vector3<f64>, Matrix3<f64>) {
    let difference = measurement.inverse(None).compose(estimate, None, None);
    // keep the residual on the short branch of the logarithm
    let mut q = *difference.quaternion();
    if q.w < 0.0 {
        q = UnitQuaternion::new_unchecked(-q.into_inner());
    }
    let residual = rotation_log(&q);
    let jacobian = so3_retract_derivative(&q, &Vector3::zeros());
    (residual, jacobian)
}

fn cost(measurements: &[SO3<f64>], estimate: &SO3<f64>) -> f64 {
    measurements
        .iter()
        .map(|m| 0.5 * estimate.right_minus(m, None, None).norm_squared())
        .sum()
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logger();
    let args = Args::parse();

    if args.measurements == 0 {
        return Err("at least one measurement is required".into());
    }

    let truth = SO3::<f64>::random();
    let measurements: Vec<SO3<f64>> = (0..args.measurements)
        .map(|_| {
            let noise = SO3::<f64>::random().log(None) * args.noise;
            truth.right_plus(&noise, None, None)
        })
        .collect();

    let mut estimate = measurements[0];
    info!(
        "Averaging {} measurements, noise scale {:.3} rad",
        args.measurements, args.noise
    );
    info!("Initial cost: {:.6e}", cost(&measurements, &estimate));

    for iteration in 0..args.max_iterations {
        let mut hessian = Matrix3::zeros();
        let mut gradient = Vector3::zeros();
        for measurement in &measurements {
            let (residual, jacobian) = linearize(measurement, &estimate);
            hessian += jacobian.transpose() * jacobian;
            gradient += jacobian.transpose() * residual;
        }

        let Some(hessian_inverse) = hessian.try_inverse() else {
            warn!("Normal equations are singular at iteration {iteration}");
            break;
        };
        let step = -(hessian_inverse * gradient);
        estimate = estimate.right_plus(&step, None, None);

        let step_norm = step.norm();
        debug!(iteration, step_norm, "Gauss-Newton step");
        info!(
            "Iteration {:>2}: cost {:.6e}, |step| {:.3e}",
            iteration,
            cost(&measurements, &estimate),
            step_norm
        );
        if step_norm < args.step_tolerance {
            break;
        }
    }

    let error = estimate.right_minus(&truth, None, None).norm();
    info!("Estimate: {estimate}");
    info!("Truth:    {truth}");
    info!("Angular error to the true rotation: {:.4e} rad", error);
    Ok(())
}
