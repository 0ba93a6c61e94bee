//! Residual equations and Jacobian rows for every constraint kind.
//!
//! Each constraint contributes one or more scalar residuals r_i(x) that are
//! zero when the constraint is satisfied. Simple constraints get analytic
//! Jacobian rows; the rest fall back to forward differences over their own
//! residual evaluation.

use crate::entity::{EntityData, EntityHandle};

/// Internal storage for one constraint. Handles are entity-arena indices;
/// values are millimeters (angles in radians).
#[derive(Debug, Clone)]
pub(crate) enum ConstraintData {
    Coincident { a: EntityHandle, b: EntityHandle },
    Distance { a: EntityHandle, b: EntityHandle, value: f64 },
    DistanceProj {
        a: EntityHandle,
        b: EntityHandle,
        axis: EntityHandle,
        value: f64,
    },
    Horizontal { line: EntityHandle },
    Vertical { line: EntityHandle },
    Parallel { a: EntityHandle, b: EntityHandle },
    Perpendicular { a: EntityHandle, b: EntityHandle },
    Equal { a: EntityHandle, b: EntityHandle },
    Tangent { curve: EntityHandle, line: EntityHandle },
    Midpoint { point: EntityHandle, line: EntityHandle },
    Symmetric {
        a: EntityHandle,
        b: EntityHandle,
        axis: EntityHandle,
    },
    SymmetricH { a: EntityHandle, b: EntityHandle },
    SymmetricV { a: EntityHandle, b: EntityHandle },
    Angle {
        a: EntityHandle,
        b: EntityHandle,
        radians: f64,
        inverse: bool,
    },
    Diameter { circle: EntityHandle, value: f64 },
    Ratio { a: EntityHandle, b: EntityHandle, value: f64 },
    LengthDiff { a: EntityHandle, b: EntityHandle, value: f64 },
    OnLine { point: EntityHandle, line: EntityHandle },
    OnCircle { point: EntityHandle, circle: EntityHandle },
    EqualAngle {
        a: EntityHandle,
        b: EntityHandle,
        c: EntityHandle,
        d: EntityHandle,
    },
    EqualRadius { a: EntityHandle, b: EntityHandle },
    /// `dragged`: pins a 2D point to the coordinates it had when the
    /// constraint was created.
    Fixed { point: EntityHandle, x: f64, y: f64 },
    Fixed3 {
        point: EntityHandle,
        x: f64,
        y: f64,
        z: f64,
    },
}

impl ConstraintData {
    /// Append this constraint's residual rows. The row count is constant for
    /// a given constraint regardless of parameter values.
    pub(crate) fn residual_rows(&self, entities: &[EntityData], params: &[f64], out: &mut Vec<f64>) {
        match self {
            ConstraintData::Coincident { a, b } => {
                let (ax, ay) = point_uv(entities, *a, params);
                let (bx, by) = point_uv(entities, *b, params);
                out.push(ax - bx);
                out.push(ay - by);
            }
            ConstraintData::Distance { a, b, value } => {
                let (ax, ay) = point_uv(entities, *a, params);
                let (bx, by) = point_uv(entities, *b, params);
                // Squared form avoids the sqrt derivative singularity at zero.
                let dist_sq = (ax - bx).powi(2) + (ay - by).powi(2);
                out.push(dist_sq - value * value);
            }
            ConstraintData::DistanceProj { a, b, axis, value } => {
                let (ax, ay) = point_uv(entities, *a, params);
                let (bx, by) = point_uv(entities, *b, params);
                let (dx, dy) = line_direction(entities, *axis, params);
                let norm = dx.hypot(dy).max(1e-12);
                out.push(((bx - ax) * dx + (by - ay) * dy) / norm - value);
            }
            ConstraintData::Horizontal { line } => {
                let ((_, sy), (_, ey)) = line_endpoints(entities, *line, params);
                out.push(sy - ey);
            }
            ConstraintData::Vertical { line } => {
                let ((sx, _), (ex, _)) = line_endpoints(entities, *line, params);
                out.push(sx - ex);
            }
            ConstraintData::Parallel { a, b } => {
                let (dx_a, dy_a) = line_direction(entities, *a, params);
                let (dx_b, dy_b) = line_direction(entities, *b, params);
                out.push(dx_a * dy_b - dy_a * dx_b);
            }
            ConstraintData::Perpendicular { a, b } => {
                let (dx_a, dy_a) = line_direction(entities, *a, params);
                let (dx_b, dy_b) = line_direction(entities, *b, params);
                out.push(dx_a * dx_b + dy_a * dy_b);
            }
            ConstraintData::Equal { a, b } => {
                out.push(entity_length(entities, *a, params) - entity_length(entities, *b, params));
            }
            ConstraintData::Tangent { curve, line } => {
                let (cx, cy) = curve_center(entities, *curve, params);
                let r = curve_radius(entities, *curve, params);
                let ((ax, ay), (bx, by)) = line_endpoints(entities, *line, params);
                let dx = bx - ax;
                let dy = by - ay;
                let len_sq = (dx * dx + dy * dy).max(1e-20);
                let cross = (cx - ax) * dy - (cy - ay) * dx;
                // (distance to line)^2 - r^2, sign-free on either side
                out.push(cross * cross / len_sq - r * r);
            }
            ConstraintData::Midpoint { point, line } => {
                let (px, py) = point_uv(entities, *point, params);
                let ((ax, ay), (bx, by)) = line_endpoints(entities, *line, params);
                out.push(px - (ax + bx) / 2.0);
                out.push(py - (ay + by) / 2.0);
            }
            ConstraintData::Symmetric { a, b, axis } => {
                let (ax, ay) = point_uv(entities, *a, params);
                let (bx, by) = point_uv(entities, *b, params);
                let ((lx0, ly0), (lx1, ly1)) = line_endpoints(entities, *axis, params);
                let dx = lx1 - lx0;
                let dy = ly1 - ly0;
                // Midpoint of A-B on the axis, and A->B perpendicular to it.
                let mx = (ax + bx) / 2.0;
                let my = (ay + by) / 2.0;
                out.push((mx - lx0) * dy - (my - ly0) * dx);
                out.push((bx - ax) * dx + (by - ay) * dy);
            }
            ConstraintData::SymmetricH { a, b } => {
                let (ax, ay) = point_uv(entities, *a, params);
                let (bx, by) = point_uv(entities, *b, params);
                out.push(ax + bx);
                out.push(ay - by);
            }
            ConstraintData::SymmetricV { a, b } => {
                let (ax, ay) = point_uv(entities, *a, params);
                let (bx, by) = point_uv(entities, *b, params);
                out.push(ax - bx);
                out.push(ay + by);
            }
            ConstraintData::Angle {
                a,
                b,
                radians,
                inverse,
            } => {
                let (dx_a, dy_a) = line_direction(entities, *a, params);
                let (mut dx_b, mut dy_b) = line_direction(entities, *b, params);
                if *inverse {
                    dx_b = -dx_b;
                    dy_b = -dy_b;
                }
                let cross = dx_a * dy_b - dy_a * dx_b;
                let dot = dx_a * dx_b + dy_a * dy_b;
                let norm = (dx_a.hypot(dy_a) * dx_b.hypot(dy_b)).max(1e-20);
                // sin(theta - value): smooth through 90 degrees
                out.push((cross * radians.cos() - dot * radians.sin()) / norm);
            }
            ConstraintData::Diameter { circle, value } => {
                out.push(2.0 * curve_radius(entities, *circle, params) - value);
            }
            ConstraintData::Ratio { a, b, value } => {
                let len_a = entity_length(entities, *a, params);
                let len_b = entity_length(entities, *b, params);
                out.push(len_a - value * len_b);
            }
            ConstraintData::LengthDiff { a, b, value } => {
                let len_a = entity_length(entities, *a, params);
                let len_b = entity_length(entities, *b, params);
                out.push(len_a - len_b - value);
            }
            ConstraintData::OnLine { point, line } => {
                let (px, py) = point_uv(entities, *point, params);
                let ((ax, ay), (bx, by)) = line_endpoints(entities, *line, params);
                out.push((px - ax) * (by - ay) - (py - ay) * (bx - ax));
            }
            ConstraintData::OnCircle { point, circle } => {
                let (px, py) = point_uv(entities, *point, params);
                let (cx, cy) = curve_center(entities, *circle, params);
                let r = curve_radius(entities, *circle, params);
                out.push((px - cx).powi(2) + (py - cy).powi(2) - r * r);
            }
            ConstraintData::EqualAngle { a, b, c, d } => {
                let (dx_a, dy_a) = line_direction(entities, *a, params);
                let (dx_b, dy_b) = line_direction(entities, *b, params);
                let (dx_c, dy_c) = line_direction(entities, *c, params);
                let (dx_d, dy_d) = line_direction(entities, *d, params);
                let cross_ab = dx_a * dy_b - dy_a * dx_b;
                let dot_ab = dx_a * dx_b + dy_a * dy_b;
                let cross_cd = dx_c * dy_d - dy_c * dx_d;
                let dot_cd = dx_c * dx_d + dy_c * dy_d;
                let norm = (dx_a.hypot(dy_a)
                    * dx_b.hypot(dy_b)
                    * dx_c.hypot(dy_c)
                    * dx_d.hypot(dy_d))
                .max(1e-20);
                // sin(angle(a,b) - angle(c,d))
                out.push((cross_ab * dot_cd - dot_ab * cross_cd) / norm);
            }
            ConstraintData::EqualRadius { a, b } => {
                out.push(curve_radius(entities, *a, params) - curve_radius(entities, *b, params));
            }
            ConstraintData::Fixed { point, x, y } => {
                let (px, py) = point_uv(entities, *point, params);
                out.push(px - x);
                out.push(py - y);
            }
            ConstraintData::Fixed3 { point, x, y, z } => {
                let px = point_px(entities, *point);
                out.push(params[px] - x);
                out.push(params[px + 1] - y);
                out.push(params[px + 2] - z);
            }
        }
    }

    /// Write this constraint's Jacobian rows into `jac` (row-major, n columns)
    /// starting at `start_row`. Returns the number of rows written.
    pub(crate) fn jacobian_rows(
        &self,
        entities: &[EntityData],
        params: &[f64],
        n: usize,
        jac: &mut [f64],
        start_row: usize,
    ) -> usize {
        match self {
            ConstraintData::Coincident { a, b } => {
                let pa = point_px(entities, *a);
                let pb = point_px(entities, *b);
                jac[start_row * n + pa] = 1.0;
                jac[start_row * n + pb] = -1.0;
                jac[(start_row + 1) * n + pa + 1] = 1.0;
                jac[(start_row + 1) * n + pb + 1] = -1.0;
                2
            }
            ConstraintData::Distance { a, b, .. } => {
                let pa = point_px(entities, *a);
                let pb = point_px(entities, *b);
                let dx = params[pa] - params[pb];
                let dy = params[pa + 1] - params[pb + 1];
                jac[start_row * n + pa] = 2.0 * dx;
                jac[start_row * n + pa + 1] = 2.0 * dy;
                jac[start_row * n + pb] = -2.0 * dx;
                jac[start_row * n + pb + 1] = -2.0 * dy;
                1
            }
            ConstraintData::Horizontal { line } => {
                let (ps, pe) = line_params(entities, *line);
                jac[start_row * n + ps + 1] = 1.0;
                jac[start_row * n + pe + 1] = -1.0;
                1
            }
            ConstraintData::Vertical { line } => {
                let (ps, pe) = line_params(entities, *line);
                jac[start_row * n + ps] = 1.0;
                jac[start_row * n + pe] = -1.0;
                1
            }
            ConstraintData::Parallel { a, b } => {
                let (sa, ea) = line_params(entities, *a);
                let (sb, eb) = line_params(entities, *b);
                let dx_a = params[ea] - params[sa];
                let dy_a = params[ea + 1] - params[sa + 1];
                let dx_b = params[eb] - params[sb];
                let dy_b = params[eb + 1] - params[sb + 1];
                let r = start_row;
                jac[r * n + sa] += -dy_b;
                jac[r * n + ea] += dy_b;
                jac[r * n + sa + 1] += dx_b;
                jac[r * n + ea + 1] += -dx_b;
                jac[r * n + sb] += dy_a;
                jac[r * n + eb] += -dy_a;
                jac[r * n + sb + 1] += -dx_a;
                jac[r * n + eb + 1] += dx_a;
                1
            }
            ConstraintData::Perpendicular { a, b } => {
                let (sa, ea) = line_params(entities, *a);
                let (sb, eb) = line_params(entities, *b);
                let dx_a = params[ea] - params[sa];
                let dy_a = params[ea + 1] - params[sa + 1];
                let dx_b = params[eb] - params[sb];
                let dy_b = params[eb + 1] - params[sb + 1];
                let r = start_row;
                jac[r * n + sa] += -dx_b;
                jac[r * n + ea] += dx_b;
                jac[r * n + sa + 1] += -dy_b;
                jac[r * n + ea + 1] += dy_b;
                jac[r * n + sb] += -dx_a;
                jac[r * n + eb] += dx_a;
                jac[r * n + sb + 1] += -dy_a;
                jac[r * n + eb + 1] += dy_a;
                1
            }
            ConstraintData::Midpoint { point, line } => {
                let pp = point_px(entities, *point);
                let (ps, pe) = line_params(entities, *line);
                jac[start_row * n + pp] = 1.0;
                jac[start_row * n + ps] += -0.5;
                jac[start_row * n + pe] += -0.5;
                jac[(start_row + 1) * n + pp + 1] = 1.0;
                jac[(start_row + 1) * n + ps + 1] += -0.5;
                jac[(start_row + 1) * n + pe + 1] += -0.5;
                2
            }
            ConstraintData::Diameter { circle, .. } => {
                if let EntityData::Circle { radius_px, .. } = &entities[*circle as usize] {
                    jac[start_row * n + *radius_px] = 2.0;
                    1
                } else {
                    self.fd_rows(entities, params, n, jac, start_row)
                }
            }
            ConstraintData::Fixed { point, .. } => {
                let px = point_px(entities, *point);
                jac[start_row * n + px] = 1.0;
                jac[(start_row + 1) * n + px + 1] = 1.0;
                2
            }
            ConstraintData::Fixed3 { point, .. } => {
                let px = point_px(entities, *point);
                jac[start_row * n + px] = 1.0;
                jac[(start_row + 1) * n + px + 1] = 1.0;
                jac[(start_row + 2) * n + px + 2] = 1.0;
                3
            }
            // The remaining kinds carry sqrt/trig terms; forward differences
            // over the exact residuals are accurate enough for the LM steps.
            _ => self.fd_rows(entities, params, n, jac, start_row),
        }
    }

    fn fd_rows(
        &self,
        entities: &[EntityData],
        params: &[f64],
        n: usize,
        jac: &mut [f64],
        start_row: usize,
    ) -> usize {
        fd_jacobian_rows(
            |p, out| self.residual_rows(entities, p, out),
            params,
            n,
            jac,
            start_row,
        )
    }
}

/// Residual rows contributed by entities themselves (independent of any
/// user constraint): an arc keeps its two center distances equal.
pub(crate) fn entity_residual_rows(
    entity: &EntityData,
    entities: &[EntityData],
    params: &[f64],
    out: &mut Vec<f64>,
) {
    if let EntityData::Arc { center, start, end } = entity {
        let (cx, cy) = point_uv(entities, *center, params);
        let (sx, sy) = point_uv(entities, *start, params);
        let (ex, ey) = point_uv(entities, *end, params);
        let r_start_sq = (sx - cx).powi(2) + (sy - cy).powi(2);
        let r_end_sq = (ex - cx).powi(2) + (ey - cy).powi(2);
        out.push(r_start_sq - r_end_sq);
    }
}

pub(crate) fn entity_jacobian_rows(
    entity: &EntityData,
    entities: &[EntityData],
    params: &[f64],
    n: usize,
    jac: &mut [f64],
    start_row: usize,
) -> usize {
    fd_jacobian_rows(
        |p, out| entity_residual_rows(entity, entities, p, out),
        params,
        n,
        jac,
        start_row,
    )
}

/// Forward-difference Jacobian rows for one residual source.
fn fd_jacobian_rows<F>(eval: F, params: &[f64], n: usize, jac: &mut [f64], start_row: usize) -> usize
where
    F: Fn(&[f64], &mut Vec<f64>),
{
    let mut base = Vec::new();
    eval(params, &mut base);
    let rows = base.len();
    if rows == 0 {
        return 0;
    }

    let h = 1e-7;
    let mut shifted = params.to_vec();
    let mut plus = Vec::with_capacity(rows);
    for j in 0..n {
        let saved = shifted[j];
        shifted[j] = saved + h;
        plus.clear();
        eval(&shifted, &mut plus);
        shifted[j] = saved;
        for r in 0..rows {
            jac[(start_row + r) * n + j] = (plus[r] - base[r]) / h;
        }
    }
    rows
}

// ── Entity access helpers ───────────────────────────────────────────────────

pub(crate) fn point_px(entities: &[EntityData], handle: EntityHandle) -> usize {
    match &entities[handle as usize] {
        EntityData::Point { px } | EntityData::Point3d { px } => *px,
        other => unreachable!("handle {handle} is not a point: {other:?}"),
    }
}

pub(crate) fn point_uv(entities: &[EntityData], handle: EntityHandle, params: &[f64]) -> (f64, f64) {
    let px = point_px(entities, handle);
    (params[px], params[px + 1])
}

fn line_params(entities: &[EntityData], line: EntityHandle) -> (usize, usize) {
    match &entities[line as usize] {
        EntityData::Line { p1, p2 } => (point_px(entities, *p1), point_px(entities, *p2)),
        other => unreachable!("handle {line} is not a line: {other:?}"),
    }
}

fn line_endpoints(
    entities: &[EntityData],
    line: EntityHandle,
    params: &[f64],
) -> ((f64, f64), (f64, f64)) {
    let (ps, pe) = line_params(entities, line);
    (
        (params[ps], params[ps + 1]),
        (params[pe], params[pe + 1]),
    )
}

fn line_direction(entities: &[EntityData], line: EntityHandle, params: &[f64]) -> (f64, f64) {
    let ((sx, sy), (ex, ey)) = line_endpoints(entities, line, params);
    (ex - sx, ey - sy)
}

/// Length of a line, or radius of a curve (the `equal` convention).
fn entity_length(entities: &[EntityData], handle: EntityHandle, params: &[f64]) -> f64 {
    match &entities[handle as usize] {
        EntityData::Line { .. } => {
            let (dx, dy) = line_direction(entities, handle, params);
            dx.hypot(dy)
        }
        EntityData::Circle { radius_px, .. } => params[*radius_px],
        EntityData::Arc { .. } => curve_radius(entities, handle, params),
        other => unreachable!("handle {handle} has no length: {other:?}"),
    }
}

fn curve_center(entities: &[EntityData], handle: EntityHandle, params: &[f64]) -> (f64, f64) {
    match &entities[handle as usize] {
        EntityData::Circle { center, .. } => point_uv(entities, *center, params),
        EntityData::Arc { center, .. } => point_uv(entities, *center, params),
        other => unreachable!("handle {handle} is not a curve: {other:?}"),
    }
}

fn curve_radius(entities: &[EntityData], handle: EntityHandle, params: &[f64]) -> f64 {
    match &entities[handle as usize] {
        EntityData::Circle { radius_px, .. } => params[*radius_px],
        EntityData::Arc { center, start, .. } => {
            let (cx, cy) = point_uv(entities, *center, params);
            let (sx, sy) = point_uv(entities, *start, params);
            (sx - cx).hypot(sy - cy)
        }
        other => unreachable!("handle {handle} is not a curve: {other:?}"),
    }
}
