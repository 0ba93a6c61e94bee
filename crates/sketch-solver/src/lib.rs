pub mod constraint;
pub mod entity;
pub mod sketch;
pub mod solver;
pub mod status;

pub use entity::{
    Arc, Circle, Constraint, ConstraintKind, Cubic, CurveRef, EntityHandle, Line, Point,
};
pub use sketch::Sketch;
pub use solver::SolverConfig;
pub use status::{SolveCode, SolveResult};
