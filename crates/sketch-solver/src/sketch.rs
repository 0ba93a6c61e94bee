//! The sketch facade: a typed, ownership-clear surface over the iterative
//! core. Coordinates are millimeters, angles degrees at the API boundary.

use crate::constraint::{point_px, ConstraintData};
use crate::entity::{
    Arc, Circle, Constraint, ConstraintKind, Cubic, CurveRef, EntityData, EntityHandle, Line, Point,
};
use crate::solver::{self, SolverConfig};
use crate::status::SolveResult;

/// A workspace of 2D variables, entities, and constraints for one solve.
///
/// Construction installs the base group (workplane and orientation normal,
/// fixed); everything appended afterwards belongs to the user group that
/// `solve` operates on. Each sketch owns its parameter arena, so sketches
/// are independent of each other.
pub struct Sketch {
    pub(crate) params: Vec<f64>,
    pub(crate) entities: Vec<EntityData>,
    pub(crate) constraints: Vec<ConstraintData>,
    pub(crate) config: SolverConfig,
}

impl Default for Sketch {
    fn default() -> Self {
        Self::new()
    }
}

impl Sketch {
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Sketch {
            params: Vec::new(),
            // Base group: XY workplane plus its orientation normal.
            entities: vec![EntityData::Workplane, EntityData::Normal],
            constraints: Vec::new(),
            config,
        }
    }

    fn push_entity(&mut self, entity: EntityData) -> EntityHandle {
        let handle = self.entities.len() as EntityHandle;
        self.entities.push(entity);
        handle
    }

    fn push_constraint(&mut self, kind: ConstraintKind, data: ConstraintData) -> Constraint {
        let handle = self.constraints.len() as u32;
        self.constraints.push(data);
        Constraint { handle, kind }
    }

    // ── Entity creation ─────────────────────────────────────────────────────

    /// Add a free 2D point at `(u, v)` millimeters.
    pub fn point(&mut self, u: f64, v: f64) -> Point {
        let px = self.params.len();
        self.params.push(u);
        self.params.push(v);
        let handle = self.push_entity(EntityData::Point { px });
        Point { handle }
    }

    /// Add a 2D point pinned at `(u, v)` via a `dragged` constraint.
    pub fn fixed_point(&mut self, u: f64, v: f64) -> Point {
        let p = self.point(u, v);
        self.dragged(p);
        p
    }

    /// Add a 3D point. Rarely used; kept for orientation bookkeeping.
    pub fn point_3d(&mut self, x: f64, y: f64, z: f64) -> Point {
        let px = self.params.len();
        self.params.push(x);
        self.params.push(y);
        self.params.push(z);
        let handle = self.push_entity(EntityData::Point3d { px });
        Point { handle }
    }

    pub fn fixed_point_3d(&mut self, x: f64, y: f64, z: f64) -> Point {
        let p = self.point_3d(x, y, z);
        self.push_constraint(
            ConstraintKind::Dragged,
            ConstraintData::Fixed3 {
                point: p.handle,
                x,
                y,
                z,
            },
        );
        p
    }

    /// Add a line between two points of this sketch.
    pub fn line(&mut self, p1: Point, p2: Point) -> Line {
        let handle = self.push_entity(EntityData::Line {
            p1: p1.handle,
            p2: p2.handle,
        });
        Line { handle, p1, p2 }
    }

    /// Add a circle; the radius becomes a scalar solver variable.
    pub fn circle(&mut self, center: Point, radius: f64) -> Circle {
        let radius_px = self.params.len();
        self.params.push(radius);
        let handle = self.push_entity(EntityData::Circle {
            center: center.handle,
            radius_px,
        });
        Circle { handle, center }
    }

    /// Add an arc. The solver keeps |center-start| and |center-end| equal.
    pub fn arc(&mut self, center: Point, start: Point, end: Point) -> Arc {
        let handle = self.push_entity(EntityData::Arc {
            center: center.handle,
            start: start.handle,
            end: end.handle,
        });
        Arc {
            handle,
            center,
            start,
            end,
        }
    }

    /// Add a cubic Bezier control polygon. No intrinsic constraints.
    pub fn cubic(&mut self, p1: Point, p2: Point, p3: Point, p4: Point) -> Cubic {
        let handle = self.push_entity(EntityData::Cubic {
            p1: p1.handle,
            p2: p2.handle,
            p3: p3.handle,
            p4: p4.handle,
        });
        Cubic {
            handle,
            p1,
            p2,
            p3,
            p4,
        }
    }

    // ── Readback and perturbation ───────────────────────────────────────────

    /// Current (solved or initial) position of a point, in millimeters.
    pub fn point_pos(&self, p: Point) -> (f64, f64) {
        let px = point_px(&self.entities, p.handle);
        (self.params[px], self.params[px + 1])
    }

    /// Overwrite a point's parameters (e.g. to perturb before `dragged`).
    pub fn move_point(&mut self, p: Point, u: f64, v: f64) {
        let px = point_px(&self.entities, p.handle);
        self.params[px] = u;
        self.params[px + 1] = v;
    }

    /// Current radius value of a circle, in millimeters.
    pub fn radius(&self, c: Circle) -> f64 {
        match &self.entities[c.handle as usize] {
            EntityData::Circle { radius_px, .. } => self.params[*radius_px],
            other => unreachable!("handle {} is not a circle: {other:?}", c.handle),
        }
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    // ── Constraints ─────────────────────────────────────────────────────────

    pub fn coincident(&mut self, a: Point, b: Point) -> Constraint {
        self.push_constraint(
            ConstraintKind::Coincident,
            ConstraintData::Coincident {
                a: a.handle,
                b: b.handle,
            },
        )
    }

    /// Euclidean point-point distance in millimeters.
    pub fn distance(&mut self, a: Point, b: Point, value: f64) -> Constraint {
        self.push_constraint(
            ConstraintKind::Distance,
            ConstraintData::Distance {
                a: a.handle,
                b: b.handle,
                value,
            },
        )
    }

    /// Signed distance between the projections of two points onto an axis.
    pub fn distance_proj(&mut self, a: Point, b: Point, axis: Line, value: f64) -> Constraint {
        self.push_constraint(
            ConstraintKind::DistanceProj,
            ConstraintData::DistanceProj {
                a: a.handle,
                b: b.handle,
                axis: axis.handle,
                value,
            },
        )
    }

    pub fn horizontal(&mut self, line: Line) -> Constraint {
        self.push_constraint(
            ConstraintKind::Horizontal,
            ConstraintData::Horizontal { line: line.handle },
        )
    }

    pub fn vertical(&mut self, line: Line) -> Constraint {
        self.push_constraint(
            ConstraintKind::Vertical,
            ConstraintData::Vertical { line: line.handle },
        )
    }

    pub fn parallel(&mut self, a: Line, b: Line) -> Constraint {
        self.push_constraint(
            ConstraintKind::Parallel,
            ConstraintData::Parallel {
                a: a.handle,
                b: b.handle,
            },
        )
    }

    pub fn perpendicular(&mut self, a: Line, b: Line) -> Constraint {
        self.push_constraint(
            ConstraintKind::Perpendicular,
            ConstraintData::Perpendicular {
                a: a.handle,
                b: b.handle,
            },
        )
    }

    /// Equal line lengths.
    pub fn equal(&mut self, a: Line, b: Line) -> Constraint {
        self.push_constraint(
            ConstraintKind::Equal,
            ConstraintData::Equal {
                a: a.handle,
                b: b.handle,
            },
        )
    }

    pub fn tangent(&mut self, curve: impl Into<CurveRef>, line: Line) -> Constraint {
        self.push_constraint(
            ConstraintKind::Tangent,
            ConstraintData::Tangent {
                curve: curve.into().handle(),
                line: line.handle,
            },
        )
    }

    /// `point` sits at the midpoint of `line`.
    pub fn midpoint(&mut self, point: Point, line: Line) -> Constraint {
        self.push_constraint(
            ConstraintKind::Midpoint,
            ConstraintData::Midpoint {
                point: point.handle,
                line: line.handle,
            },
        )
    }

    /// Two points mirror across an axis line.
    pub fn symmetric(&mut self, a: Point, b: Point, axis: Line) -> Constraint {
        self.push_constraint(
            ConstraintKind::Symmetric,
            ConstraintData::Symmetric {
                a: a.handle,
                b: b.handle,
                axis: axis.handle,
            },
        )
    }

    /// Mirror across the workplane's vertical axis.
    pub fn symmetric_h(&mut self, a: Point, b: Point) -> Constraint {
        self.push_constraint(
            ConstraintKind::SymmetricH,
            ConstraintData::SymmetricH {
                a: a.handle,
                b: b.handle,
            },
        )
    }

    /// Mirror across the workplane's horizontal axis.
    pub fn symmetric_v(&mut self, a: Point, b: Point) -> Constraint {
        self.push_constraint(
            ConstraintKind::SymmetricV,
            ConstraintData::SymmetricV {
                a: a.handle,
                b: b.handle,
            },
        )
    }

    /// Angle between two lines in degrees. `inverse` mirrors the second
    /// line's direction.
    pub fn angle(&mut self, a: Line, b: Line, degrees: f64, inverse: bool) -> Constraint {
        self.push_constraint(
            ConstraintKind::Angle,
            ConstraintData::Angle {
                a: a.handle,
                b: b.handle,
                radians: degrees.to_radians(),
                inverse,
            },
        )
    }

    pub fn diameter(&mut self, circle: Circle, value: f64) -> Constraint {
        self.push_constraint(
            ConstraintKind::Diameter,
            ConstraintData::Diameter {
                circle: circle.handle,
                value,
            },
        )
    }

    /// len(a) / len(b) == value.
    pub fn ratio(&mut self, a: Line, b: Line, value: f64) -> Constraint {
        self.push_constraint(
            ConstraintKind::Ratio,
            ConstraintData::Ratio {
                a: a.handle,
                b: b.handle,
                value,
            },
        )
    }

    /// len(a) - len(b) == value.
    pub fn length_diff(&mut self, a: Line, b: Line, value: f64) -> Constraint {
        self.push_constraint(
            ConstraintKind::LengthDiff,
            ConstraintData::LengthDiff {
                a: a.handle,
                b: b.handle,
                value,
            },
        )
    }

    pub fn on_line(&mut self, point: Point, line: Line) -> Constraint {
        self.push_constraint(
            ConstraintKind::OnLine,
            ConstraintData::OnLine {
                point: point.handle,
                line: line.handle,
            },
        )
    }

    pub fn on_circle(&mut self, point: Point, circle: Circle) -> Constraint {
        self.push_constraint(
            ConstraintKind::OnCircle,
            ConstraintData::OnCircle {
                point: point.handle,
                circle: circle.handle,
            },
        )
    }

    /// angle(a, b) == angle(c, d).
    pub fn equal_angle(&mut self, a: Line, b: Line, c: Line, d: Line) -> Constraint {
        self.push_constraint(
            ConstraintKind::EqualAngle,
            ConstraintData::EqualAngle {
                a: a.handle,
                b: b.handle,
                c: c.handle,
                d: d.handle,
            },
        )
    }

    pub fn equal_radius(
        &mut self,
        a: impl Into<CurveRef>,
        b: impl Into<CurveRef>,
    ) -> Constraint {
        self.push_constraint(
            ConstraintKind::EqualRadius,
            ConstraintData::EqualRadius {
                a: a.into().handle(),
                b: b.into().handle(),
            },
        )
    }

    /// Pin a point's parameters to their current values.
    pub fn dragged(&mut self, point: Point) -> Constraint {
        let (u, v) = self.point_pos(point);
        self.push_constraint(
            ConstraintKind::Dragged,
            ConstraintData::Fixed {
                point: point.handle,
                x: u,
                y: v,
            },
        )
    }

    // ── Solving ─────────────────────────────────────────────────────────────

    /// Run the iterative solve over the user group. Never panics; failure is
    /// reported through `SolveResult::ok`.
    pub fn solve(&mut self) -> SolveResult {
        solver::solve(self)
    }
}
