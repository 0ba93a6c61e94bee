use board_types::{Vec2Nm, NM_PER_MM};
use sketch_solver::{Point, Sketch};

/// Point-match tolerance for dimension binding, in millimeters (0.1 um).
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Convert host nanometers to sketch millimeters.
pub fn to_mm(nm: i64) -> f64 {
    nm as f64 / NM_PER_MM as f64
}

/// Same, for intermediate values already widened to f64 nanometers.
pub(crate) fn to_mm_f(nm: f64) -> f64 {
    nm / NM_PER_MM as f64
}

/// Read a solved point back into host coordinates.
pub(crate) fn point_v2(sketch: &Sketch, p: Point) -> Vec2Nm {
    let (u, v) = sketch.point_pos(p);
    Vec2Nm::from_mm(u, v)
}

/// Distance between two sketch points, in millimeters.
pub(crate) fn point_dist(sketch: &Sketch, a: Point, b: Point) -> f64 {
    let (ax, ay) = sketch.point_pos(a);
    let (bx, by) = sketch.point_pos(b);
    (bx - ax).hypot(by - ay)
}
