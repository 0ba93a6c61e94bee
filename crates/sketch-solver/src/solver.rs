//! Gauss-Newton iteration with Levenberg-Marquardt damping over the sketch's
//! parameter arena, plus Jacobian-rank analysis for the degrees-of-freedom
//! report.

use tracing::debug;

use crate::constraint::{entity_jacobian_rows, entity_residual_rows};
use crate::sketch::Sketch;
use crate::status::{SolveCode, SolveResult};

/// Tuning for the damped Gauss-Newton loop.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub max_iterations: usize,
    /// Convergence threshold on the sum of squared residuals.
    pub tolerance: f64,
    /// Residual level below which a stalled iteration is still accepted.
    pub stall_tolerance: f64,
    pub lambda_initial: f64,
    pub lambda_factor: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-18,
            stall_tolerance: 1e-12,
            lambda_initial: 1e-3,
            lambda_factor: 10.0,
        }
    }
}

pub(crate) fn solve(sketch: &mut Sketch) -> SolveResult {
    let config = sketch.config.clone();
    let mut params = sketch.params.clone();
    let n = params.len();

    let mut residuals = collect_residuals(sketch, &params);
    let m = residuals.len();

    if n == 0 || m == 0 {
        let total: f64 = residuals.iter().map(|r| r * r).sum();
        return finish(sketch, params, true, 0, total);
    }

    let mut lambda = config.lambda_initial;
    let mut iterations = 0;

    for iteration in 0..config.max_iterations {
        iterations = iteration;
        let total_sq: f64 = residuals.iter().map(|r| r * r).sum();
        if total_sq < config.tolerance {
            return finish(sketch, params, true, iteration, total_sq);
        }

        let jacobian = build_jacobian(sketch, &params, m, n);

        // J^T r and J^T J
        let mut jtr = vec![0.0; n];
        for j in 0..n {
            for i in 0..m {
                jtr[j] += jacobian[i * n + j] * residuals[i];
            }
        }
        let mut jtj = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                let mut sum = 0.0;
                for k in 0..m {
                    sum += jacobian[k * n + i] * jacobian[k * n + j];
                }
                jtj[i * n + j] = sum;
            }
        }

        // Damped step with adaptive lambda
        let mut found_better = false;
        for _ in 0..10 {
            let mut damped = jtj.clone();
            for i in 0..n {
                damped[i * n + i] += lambda;
            }

            if let Some(dx) = solve_linear_system(&damped, &jtr, n) {
                let mut new_params = params.clone();
                for i in 0..n {
                    new_params[i] -= dx[i];
                }

                let new_residuals = collect_residuals(sketch, &new_params);
                let new_sq: f64 = new_residuals.iter().map(|r| r * r).sum();
                if new_sq < total_sq {
                    params = new_params;
                    residuals = new_residuals;
                    lambda = (lambda / config.lambda_factor).max(1e-15);
                    found_better = true;
                    break;
                }
            }
            lambda *= config.lambda_factor;
        }

        if !found_better {
            // Stalled. Accept if the residual is already negligible
            // (finite-difference noise can block the last decades).
            if total_sq < config.stall_tolerance {
                return finish(sketch, params, true, iteration, total_sq);
            }
            // Otherwise fall back to a small gradient step.
            let grad_norm_sq: f64 = jtr.iter().map(|g| g * g).sum();
            if grad_norm_sq > 1e-20 {
                let step = 0.01 / grad_norm_sq.sqrt();
                for i in 0..n {
                    params[i] -= step * jtr[i];
                }
                residuals = collect_residuals(sketch, &params);
            }
            lambda *= config.lambda_factor;
        }
    }

    let final_sq: f64 = residuals.iter().map(|r| r * r).sum();
    let converged = final_sq < config.tolerance || final_sq < config.stall_tolerance;
    finish(sketch, params, converged, iterations, final_sq)
}

fn finish(
    sketch: &mut Sketch,
    params: Vec<f64>,
    converged: bool,
    iterations: usize,
    residual: f64,
) -> SolveResult {
    let n = params.len();
    let mut rows = Vec::new();
    for entity in &sketch.entities {
        entity_residual_rows(entity, &sketch.entities, &params, &mut rows);
    }
    for c in &sketch.constraints {
        c.residual_rows(&sketch.entities, &params, &mut rows);
    }
    let m = rows.len();

    let (rank, dof) = if n == 0 {
        (0, 0)
    } else if m == 0 {
        (0, n as i32)
    } else {
        let jacobian = build_jacobian(sketch, &params, m, n);
        let rank = matrix_rank(&jacobian, m, n);
        (rank, n as i32 - rank as i32)
    };

    // Converged solves keep the new parameters; failed solves keep the last
    // iterate too, but callers must not write them back.
    sketch.params = params;

    let code = if !converged {
        SolveCode::DidntConverge
    } else if rank < m {
        SolveCode::RedundantOkay
    } else {
        SolveCode::Okay
    };
    let result = SolveResult {
        ok: converged,
        dof,
        code,
        iterations,
        residual,
    };
    debug!(
        ok = result.ok,
        dof = result.dof,
        iterations = result.iterations,
        residual = result.residual,
        "solve finished"
    );
    result
}

fn collect_residuals(sketch: &Sketch, params: &[f64]) -> Vec<f64> {
    let mut residuals = Vec::new();
    for entity in &sketch.entities {
        entity_residual_rows(entity, &sketch.entities, params, &mut residuals);
    }
    for c in &sketch.constraints {
        c.residual_rows(&sketch.entities, params, &mut residuals);
    }
    residuals
}

/// Row-major [m x n] Jacobian: entity rows first, then constraints, matching
/// `collect_residuals` ordering.
fn build_jacobian(sketch: &Sketch, params: &[f64], m: usize, n: usize) -> Vec<f64> {
    let mut jac = vec![0.0; m * n];
    let mut row = 0;
    for entity in &sketch.entities {
        row += entity_jacobian_rows(entity, &sketch.entities, params, n, &mut jac, row);
    }
    for c in &sketch.constraints {
        row += c.jacobian_rows(&sketch.entities, params, n, &mut jac, row);
    }
    debug_assert_eq!(row, m);
    jac
}

/// Numerical row rank via Gaussian elimination with partial pivoting.
fn matrix_rank(jac: &[f64], m: usize, n: usize) -> usize {
    let mut a = jac.to_vec();
    let max_abs = a.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if max_abs == 0.0 {
        return 0;
    }
    let tol = max_abs * 1e-9;

    let mut rank = 0;
    let mut pivot_row = 0;
    for col in 0..n {
        if pivot_row >= m {
            break;
        }
        let mut best_row = pivot_row;
        let mut best_val = a[pivot_row * n + col].abs();
        for r in (pivot_row + 1)..m {
            let v = a[r * n + col].abs();
            if v > best_val {
                best_val = v;
                best_row = r;
            }
        }
        if best_val <= tol {
            continue;
        }
        if best_row != pivot_row {
            for j in 0..n {
                a.swap(pivot_row * n + j, best_row * n + j);
            }
        }
        let pivot = a[pivot_row * n + col];
        for r in (pivot_row + 1)..m {
            let factor = a[r * n + col] / pivot;
            if factor != 0.0 {
                for j in col..n {
                    a[r * n + j] -= factor * a[pivot_row * n + j];
                }
            }
        }
        pivot_row += 1;
        rank += 1;
    }
    rank
}

/// Solve the dense system A*x = b by Gaussian elimination with partial
/// pivoting. A is n x n row-major. Returns None if singular.
fn solve_linear_system(a: &[f64], b: &[f64], n: usize) -> Option<Vec<f64>> {
    let mut aug = vec![0.0; n * (n + 1)];
    for i in 0..n {
        for j in 0..n {
            aug[i * (n + 1) + j] = a[i * n + j];
        }
        aug[i * (n + 1) + n] = b[i];
    }

    for col in 0..n {
        let mut max_val = aug[col * (n + 1) + col].abs();
        let mut max_row = col;
        for row in (col + 1)..n {
            let val = aug[row * (n + 1) + col].abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }
        if max_val < 1e-15 {
            return None;
        }
        if max_row != col {
            for j in 0..=n {
                aug.swap(col * (n + 1) + j, max_row * (n + 1) + j);
            }
        }

        let pivot = aug[col * (n + 1) + col];
        for row in (col + 1)..n {
            let factor = aug[row * (n + 1) + col] / pivot;
            for j in col..=n {
                aug[row * (n + 1) + j] -= factor * aug[col * (n + 1) + j];
            }
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = aug[i * (n + 1) + n];
        for j in (i + 1)..n {
            sum -= aug[i * (n + 1) + j] * x[j];
        }
        let diag = aug[i * (n + 1) + i];
        if diag.abs() < 1e-15 {
            return None;
        }
        x[i] = sum / diag;
    }
    Some(x)
}
