use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Vec2Nm;

/// A straight graphic line on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub start: Vec2Nm,
    pub end: Vec2Nm,
}

/// A circular arc stored in the host's three-point form (start, mid, end).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub start: Vec2Nm,
    pub mid: Vec2Nm,
    pub end: Vec2Nm,
}

impl Arc {
    /// Circumcenter of start/mid/end, or `None` when the three points are
    /// collinear and no center exists.
    pub fn center(&self) -> Option<Vec2Nm> {
        let (ax, ay) = (self.start.x as f64, self.start.y as f64);
        let (bx, by) = (self.mid.x as f64, self.mid.y as f64);
        let (cx, cy) = (self.end.x as f64, self.end.y as f64);

        let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
        let span = (ax - cx)
            .abs()
            .max((ay - cy).abs())
            .max((ax - bx).abs())
            .max((ay - by).abs());
        if d.abs() <= 1e-9 * (span * span).max(1.0) {
            return None;
        }

        let a_sq = ax * ax + ay * ay;
        let b_sq = bx * bx + by * by;
        let c_sq = cx * cx + cy * cy;
        let ux = (a_sq * (by - cy) + b_sq * (cy - ay) + c_sq * (ay - by)) / d;
        let uy = (a_sq * (cx - bx) + b_sq * (ax - cx) + c_sq * (bx - ax)) / d;
        Some(Vec2Nm::new(ux.round() as i64, uy.round() as i64))
    }
}

/// A full circle stored as center plus a point on the circumference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub center: Vec2Nm,
    pub radius_point: Vec2Nm,
}

impl Circle {
    /// Radius in nanometers.
    pub fn radius_nm(&self) -> f64 {
        (self.radius_point - self.center).hypot_nm()
    }
}

/// An axis-aligned rectangle stored by two opposite corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub top_left: Vec2Nm,
    pub bottom_right: Vec2Nm,
}

/// A cubic Bezier curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bezier {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub start: Vec2Nm,
    pub control1: Vec2Nm,
    pub control2: Vec2Nm,
    pub end: Vec2Nm,
}

/// A filled polygon outline. Present in the host model but not mapped to
/// sketch entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub outline: Vec<Vec2Nm>,
}

/// A graphic drawing primitive on the board.
///
/// Serializes in the variant-tagged wire form used by board fixtures:
/// `{"type": "segment", "proto": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "proto", rename_all = "lowercase")]
pub enum GraphicShape {
    Segment(Segment),
    Arc(Arc),
    Circle(Circle),
    Rectangle(Rectangle),
    Bezier(Bezier),
    Polygon(Polygon),
}

impl GraphicShape {
    pub fn id(&self) -> Uuid {
        match self {
            GraphicShape::Segment(s) => s.id,
            GraphicShape::Arc(a) => a.id,
            GraphicShape::Circle(c) => c.id,
            GraphicShape::Rectangle(r) => r.id,
            GraphicShape::Bezier(b) => b.id,
            GraphicShape::Polygon(p) => p.id,
        }
    }
}
