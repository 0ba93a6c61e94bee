/// Diagnostic outcome of an iterative solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveCode {
    /// Converged; every constraint row is independent.
    Okay,
    /// Converged, but the constraint Jacobian is row-rank-deficient (some
    /// constraints are redundant at the solution).
    RedundantOkay,
    /// The iteration did not reach the residual tolerance. Typically an
    /// inconsistent (over-constrained) system.
    DidntConverge,
}

/// Result of `Sketch::solve`. Never an error: failure is `ok == false`.
#[derive(Debug, Clone, Copy)]
pub struct SolveResult {
    /// True iff the code is `Okay` or `RedundantOkay`. A non-ok solve must
    /// not be written back.
    pub ok: bool,
    /// Remaining degrees of freedom; 0 means fully constrained.
    pub dof: i32,
    pub code: SolveCode,
    /// Iterations spent in the damped Gauss-Newton loop.
    pub iterations: usize,
    /// Final sum of squared residuals.
    pub residual: f64,
}
