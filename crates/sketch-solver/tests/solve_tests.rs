use approx::assert_abs_diff_eq;
use sketch_solver::{Sketch, SolveCode};

// ── Basic entities ──────────────────────────────────────────────────────────

#[test]
fn empty_sketch_solves() {
    let mut sketch = Sketch::new();
    let result = sketch.solve();
    assert!(result.ok);
    assert_eq!(result.dof, 0);
}

#[test]
fn fixed_point_stays_exactly_put() {
    let mut sketch = Sketch::new();
    let p = sketch.fixed_point(3.0, 7.0);
    let result = sketch.solve();
    assert!(result.ok);
    let (u, v) = sketch.point_pos(p);
    assert_abs_diff_eq!(u, 3.0, epsilon = 1e-9);
    assert_abs_diff_eq!(v, 7.0, epsilon = 1e-9);
}

#[test]
fn dragged_after_construction_pins_current_coords() {
    let mut sketch = Sketch::new();
    let p = sketch.point(1.25, -4.5);
    sketch.dragged(p);
    let result = sketch.solve();
    assert!(result.ok);
    assert_eq!(result.dof, 0);
    let (u, v) = sketch.point_pos(p);
    assert_abs_diff_eq!(u, 1.25, epsilon = 1e-12);
    assert_abs_diff_eq!(v, -4.5, epsilon = 1e-12);
}

#[test]
fn solve_underconstrained_reports_dof() {
    let mut sketch = Sketch::new();
    sketch.point(1.0, 2.0);
    let result = sketch.solve();
    assert!(result.ok);
    assert_eq!(result.dof, 2, "one free point has two degrees of freedom");
}

// ── Directional constraints ─────────────────────────────────────────────────

#[test]
fn horizontal_line() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.point(5.0, 3.0);
    let line = sketch.line(p1, p2);
    sketch.horizontal(line);
    let result = sketch.solve();
    assert!(result.ok);
    let (_, v2) = sketch.point_pos(p2);
    assert_abs_diff_eq!(v2, 0.0, epsilon = 1e-9);
}

#[test]
fn vertical_line() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.point(3.0, 5.0);
    let line = sketch.line(p1, p2);
    sketch.vertical(line);
    let result = sketch.solve();
    assert!(result.ok);
    let (u2, _) = sketch.point_pos(p2);
    assert_abs_diff_eq!(u2, 0.0, epsilon = 1e-9);
}

#[test]
fn perpendicular_lines() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.point(5.0, 0.0);
    let p3 = sketch.point(0.0, 5.0);
    let l1 = sketch.line(p1, p2);
    let l2 = sketch.line(p1, p3);
    sketch.perpendicular(l1, l2);
    let result = sketch.solve();
    assert!(result.ok);

    let (x1, y1) = sketch.point_pos(p1);
    let (x2, y2) = sketch.point_pos(p2);
    let (x3, y3) = sketch.point_pos(p3);
    let dot = (x2 - x1) * (x3 - x1) + (y2 - y1) * (y3 - y1);
    assert_abs_diff_eq!(dot, 0.0, epsilon = 1e-6);
}

#[test]
fn parallel_lines() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.point(5.0, 3.0);
    let p3 = sketch.fixed_point(0.0, 2.0);
    let p4 = sketch.point(5.0, 5.0);
    let l1 = sketch.line(p1, p2);
    let l2 = sketch.line(p3, p4);
    sketch.parallel(l1, l2);
    let result = sketch.solve();
    assert!(result.ok);

    let (x1, y1) = sketch.point_pos(p1);
    let (x2, y2) = sketch.point_pos(p2);
    let (x3, y3) = sketch.point_pos(p3);
    let (x4, y4) = sketch.point_pos(p4);
    let cross = (x2 - x1) * (y4 - y3) - (y2 - y1) * (x4 - x3);
    assert_abs_diff_eq!(cross, 0.0, epsilon = 1e-6);
}

// ── Dimensional constraints ─────────────────────────────────────────────────

#[test]
fn distance_constraint() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.point(5.0, 0.0);
    sketch.distance(p1, p2, 10.0);
    let result = sketch.solve();
    assert!(result.ok);

    let (x1, y1) = sketch.point_pos(p1);
    let (x2, y2) = sketch.point_pos(p2);
    assert_abs_diff_eq!((x2 - x1).hypot(y2 - y1), 10.0, epsilon = 1e-9);
}

#[test]
fn distance_proj_onto_horizontal_axis() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.point(10.0, 5.0);
    let a1 = sketch.fixed_point(0.0, 0.0);
    let a2 = sketch.fixed_point(1.0, 0.0);
    let axis = sketch.line(a1, a2);
    sketch.distance_proj(p1, p2, axis, 7.0);
    let result = sketch.solve();
    assert!(result.ok);

    let (x2, _) = sketch.point_pos(p2);
    assert_abs_diff_eq!(x2, 7.0, epsilon = 1e-6);
}

#[test]
fn distance_proj_onto_vertical_axis() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.point(10.0, 5.0);
    let a1 = sketch.fixed_point(0.0, 0.0);
    let a2 = sketch.fixed_point(0.0, 1.0);
    let axis = sketch.line(a1, a2);
    sketch.distance_proj(p1, p2, axis, 3.0);
    let result = sketch.solve();
    assert!(result.ok);

    let (_, y2) = sketch.point_pos(p2);
    assert_abs_diff_eq!(y2, 3.0, epsilon = 1e-6);
}

#[test]
fn equal_length_lines() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.point(5.0, 0.0);
    let p3 = sketch.fixed_point(0.0, 3.0);
    let p4 = sketch.point(0.0, 8.0);
    let l1 = sketch.line(p1, p2);
    let l2 = sketch.line(p3, p4);
    sketch.equal(l1, l2);
    let result = sketch.solve();
    assert!(result.ok);

    let (x1, y1) = sketch.point_pos(p1);
    let (x2, y2) = sketch.point_pos(p2);
    let (x3, y3) = sketch.point_pos(p3);
    let (x4, y4) = sketch.point_pos(p4);
    let len1 = (x2 - x1).hypot(y2 - y1);
    let len2 = (x4 - x3).hypot(y4 - y3);
    assert_abs_diff_eq!(len1, len2, epsilon = 1e-6);
}

#[test]
fn circle_diameter() {
    let mut sketch = Sketch::new();
    let center = sketch.fixed_point(0.0, 0.0);
    let circle = sketch.circle(center, 5.0);
    sketch.diameter(circle, 20.0);
    let result = sketch.solve();
    assert!(result.ok);
    assert_abs_diff_eq!(sketch.radius(circle), 10.0, epsilon = 1e-9);
}

#[test]
fn angle_45_degrees() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.point(10.0, 0.0);
    let p3 = sketch.point(10.0, 10.0);
    let l1 = sketch.line(p1, p2);
    let l2 = sketch.line(p1, p3);
    sketch.horizontal(l1);
    sketch.angle(l1, l2, 45.0, false);
    let result = sketch.solve();
    assert!(result.ok);

    let (x1, y1) = sketch.point_pos(p1);
    let (x2, y2) = sketch.point_pos(p2);
    let (x3, y3) = sketch.point_pos(p3);
    let d1 = (x2 - x1, y2 - y1);
    let d2 = (x3 - x1, y3 - y1);
    let cos_a =
        (d1.0 * d2.0 + d1.1 * d2.1) / (d1.0.hypot(d1.1) * d2.0.hypot(d2.1));
    let angle_deg = cos_a.clamp(-1.0, 1.0).acos().to_degrees();
    assert_abs_diff_eq!(angle_deg, 45.0, epsilon = 0.1);
}

#[test]
fn ratio_of_line_lengths() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.fixed_point(10.0, 0.0);
    let p3 = sketch.fixed_point(0.0, 5.0);
    let p4 = sketch.point(4.0, 5.0);
    let l1 = sketch.line(p1, p2);
    let l2 = sketch.line(p3, p4);
    sketch.horizontal(l2);
    sketch.ratio(l1, l2, 2.0);
    let result = sketch.solve();
    assert!(result.ok);

    let (x3, y3) = sketch.point_pos(p3);
    let (x4, y4) = sketch.point_pos(p4);
    assert_abs_diff_eq!((x4 - x3).hypot(y4 - y3), 5.0, epsilon = 1e-6);
}

#[test]
fn length_difference() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.fixed_point(10.0, 0.0);
    let p3 = sketch.fixed_point(0.0, 5.0);
    let p4 = sketch.point(4.0, 5.0);
    let l1 = sketch.line(p1, p2);
    let l2 = sketch.line(p3, p4);
    sketch.horizontal(l2);
    sketch.length_diff(l1, l2, 3.0);
    let result = sketch.solve();
    assert!(result.ok);

    let (x3, y3) = sketch.point_pos(p3);
    let (x4, y4) = sketch.point_pos(p4);
    assert_abs_diff_eq!((x4 - x3).hypot(y4 - y3), 7.0, epsilon = 1e-6);
}

// ── Positional constraints ──────────────────────────────────────────────────

#[test]
fn coincident_points() {
    let mut sketch = Sketch::new();
    let p1 = sketch.point(1.0, 2.0);
    let p2 = sketch.point(3.0, 4.0);
    sketch.coincident(p1, p2);
    let result = sketch.solve();
    assert!(result.ok);

    let (x1, y1) = sketch.point_pos(p1);
    let (x2, y2) = sketch.point_pos(p2);
    assert_abs_diff_eq!(x1, x2, epsilon = 1e-9);
    assert_abs_diff_eq!(y1, y2, epsilon = 1e-9);
}

#[test]
fn midpoint_of_line() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.fixed_point(10.0, 0.0);
    let line = sketch.line(p1, p2);
    let mid = sketch.point(3.0, 1.0);
    sketch.midpoint(mid, line);
    let result = sketch.solve();
    assert!(result.ok);

    let (mu, mv) = sketch.point_pos(mid);
    assert_abs_diff_eq!(mu, 5.0, epsilon = 1e-9);
    assert_abs_diff_eq!(mv, 0.0, epsilon = 1e-9);
}

#[test]
fn point_on_line() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.fixed_point(10.0, 10.0);
    let line = sketch.line(p1, p2);
    let p3 = sketch.point(3.0, 7.0);
    sketch.on_line(p3, line);
    let result = sketch.solve();
    assert!(result.ok);

    let (u3, v3) = sketch.point_pos(p3);
    assert_abs_diff_eq!(u3, v3, epsilon = 1e-6);
}

#[test]
fn point_on_circle() {
    let mut sketch = Sketch::new();
    let center = sketch.fixed_point(0.0, 0.0);
    let circle = sketch.circle(center, 5.0);
    sketch.diameter(circle, 10.0);
    let p = sketch.point(3.0, 1.0);
    sketch.on_circle(p, circle);
    let result = sketch.solve();
    assert!(result.ok);

    let (px, py) = sketch.point_pos(p);
    assert_abs_diff_eq!(px.hypot(py), 5.0, epsilon = 1e-6);
}

#[test]
fn symmetric_about_line() {
    let mut sketch = Sketch::new();
    let a1 = sketch.fixed_point(5.0, 0.0);
    let a2 = sketch.fixed_point(5.0, 10.0);
    let axis = sketch.line(a1, a2);
    let pa = sketch.fixed_point(2.0, 3.0);
    let pb = sketch.point(6.0, 3.0);
    sketch.symmetric(pa, pb, axis);
    let result = sketch.solve();
    assert!(result.ok);

    let (xb, yb) = sketch.point_pos(pb);
    assert_abs_diff_eq!(xb, 8.0, epsilon = 1e-6);
    assert_abs_diff_eq!(yb, 3.0, epsilon = 1e-6);
}

#[test]
fn symmetric_about_workplane_axes() {
    let mut sketch = Sketch::new();
    let a = sketch.fixed_point(2.0, 3.0);
    let b = sketch.point(0.0, 0.0);
    sketch.symmetric_h(a, b);
    assert!(sketch.solve().ok);
    let (bx, by) = sketch.point_pos(b);
    assert_abs_diff_eq!(bx, -2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(by, 3.0, epsilon = 1e-6);

    let mut sketch = Sketch::new();
    let a = sketch.fixed_point(2.0, 3.0);
    let b = sketch.point(0.0, 0.0);
    sketch.symmetric_v(a, b);
    assert!(sketch.solve().ok);
    let (bx, by) = sketch.point_pos(b);
    assert_abs_diff_eq!(bx, 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(by, -3.0, epsilon = 1e-6);
}

#[test]
fn tangent_line_to_circle() {
    let mut sketch = Sketch::new();
    let center = sketch.fixed_point(0.0, 0.0);
    let circle = sketch.circle(center, 5.0);
    sketch.diameter(circle, 10.0);
    let p1 = sketch.point(-10.0, 5.5);
    let p2 = sketch.point(10.0, 5.5);
    let line = sketch.line(p1, p2);
    sketch.horizontal(line);
    sketch.tangent(circle, line);
    let result = sketch.solve();
    assert!(result.ok);

    let (_, y1) = sketch.point_pos(p1);
    assert_abs_diff_eq!(y1.abs(), 5.0, epsilon = 0.01);
}

#[test]
fn equal_angle_between_line_pairs() {
    let mut sketch = Sketch::new();
    let origin = sketch.fixed_point(0.0, 0.0);
    let px = sketch.fixed_point(10.0, 0.0);
    let p30 = sketch.fixed_point(10.0 * 0.866, 5.0);
    let free = sketch.point(10.0, 2.0);
    let l1 = sketch.line(origin, px);
    let l2 = sketch.line(origin, p30);
    let l3 = sketch.line(origin, px);
    let l4 = sketch.line(origin, free);
    sketch.distance(origin, free, 10.0);
    sketch.equal_angle(l1, l2, l3, l4);
    let result = sketch.solve();
    assert!(result.ok);

    let (fx, fy) = sketch.point_pos(free);
    let angle = fy.atan2(fx).to_degrees();
    assert_abs_diff_eq!(angle, 30.0, epsilon = 0.1);
}

#[test]
fn arc_keeps_center_distances_equal() {
    let mut sketch = Sketch::new();
    let center = sketch.fixed_point(0.0, 0.0);
    let start = sketch.fixed_point(10.0, 0.0);
    let end = sketch.point(0.0, 9.0);
    sketch.arc(center, start, end);
    let result = sketch.solve();
    assert!(result.ok);

    let (ex, ey) = sketch.point_pos(end);
    assert_abs_diff_eq!(ex.hypot(ey), 10.0, epsilon = 1e-6);
}

// ── Solve status ────────────────────────────────────────────────────────────

#[test]
fn fully_constrained_rectangle() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.point(100.0, 0.0);
    let p3 = sketch.point(100.0, 50.0);
    let p4 = sketch.point(0.0, 50.0);
    let bottom = sketch.line(p1, p2);
    let right = sketch.line(p2, p3);
    let top = sketch.line(p3, p4);
    let left = sketch.line(p4, p1);
    sketch.horizontal(bottom);
    sketch.horizontal(top);
    sketch.vertical(right);
    sketch.vertical(left);
    sketch.distance(p1, p2, 100.0);
    sketch.distance(p2, p3, 50.0);

    let result = sketch.solve();
    assert!(result.ok);
    assert_eq!(result.dof, 0, "rectangle should be fully constrained");

    let (x3, y3) = sketch.point_pos(p3);
    assert_abs_diff_eq!(x3, 100.0, epsilon = 1e-6);
    assert_abs_diff_eq!(y3, 50.0, epsilon = 1e-6);
}

#[test]
fn rectangle_without_anchor_has_translation_dof() {
    let mut sketch = Sketch::new();
    let p1 = sketch.point(0.0, 0.0);
    let p2 = sketch.point(80.0, 0.0);
    let p3 = sketch.point(80.0, 40.0);
    let p4 = sketch.point(0.0, 40.0);
    let bottom = sketch.line(p1, p2);
    let right = sketch.line(p2, p3);
    let top = sketch.line(p3, p4);
    let left = sketch.line(p4, p1);
    sketch.horizontal(bottom);
    sketch.horizontal(top);
    sketch.vertical(right);
    sketch.vertical(left);
    sketch.distance(p1, p2, 80.0);
    sketch.distance(p2, p3, 40.0);

    let result = sketch.solve();
    assert!(result.ok);
    assert_eq!(result.dof, 2, "free rectangle can still translate");
}

#[test]
fn redundant_constraints_still_ok() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.point(5.0, 1.0);
    let line = sketch.line(p1, p2);
    sketch.horizontal(line);
    sketch.horizontal(line);
    let result = sketch.solve();
    assert!(result.ok);
    assert_eq!(result.code, SolveCode::RedundantOkay);
}

#[test]
fn inconsistent_system_reports_failure() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.fixed_point(10.0, 0.0);
    // Distance of 5 between points pinned 10 apart
    sketch.distance(p1, p2, 5.0);
    let result = sketch.solve();
    assert!(!result.ok);
    assert_eq!(result.code, SolveCode::DidntConverge);
}

#[test]
fn failed_solve_allows_further_constraints() {
    let mut sketch = Sketch::new();
    let p1 = sketch.fixed_point(0.0, 0.0);
    let p2 = sketch.fixed_point(10.0, 0.0);
    sketch.distance(p1, p2, 5.0);
    assert!(!sketch.solve().ok);

    // Still legal to keep adding geometry afterwards.
    let p3 = sketch.point(1.0, 1.0);
    sketch.dragged(p3);
    let (u, v) = sketch.point_pos(p3);
    assert_abs_diff_eq!(u, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(v, 1.0, epsilon = 1e-12);
}

#[test]
fn move_point_then_drag_re_solves() {
    let mut sketch = Sketch::new();
    let p1 = sketch.point(0.0, 0.0);
    let p2 = sketch.point(10.0, 0.0);
    let line = sketch.line(p1, p2);
    sketch.horizontal(line);
    assert!(sketch.solve().ok);

    sketch.move_point(p2, 12.0, 3.0);
    sketch.dragged(p2);
    let result = sketch.solve();
    assert!(result.ok);
    let (u2, v2) = sketch.point_pos(p2);
    assert_abs_diff_eq!(u2, 12.0, epsilon = 1e-9);
    assert_abs_diff_eq!(v2, 3.0, epsilon = 1e-9);
    // The free endpoint follows to keep the line horizontal.
    let (_, v1) = sketch.point_pos(p1);
    assert_abs_diff_eq!(v1, 3.0, epsilon = 1e-6);
}
