//! Lowering of graphic drawing primitives into sketch entities, and the
//! inverse writeback onto the source shapes.

use std::f64::consts::TAU;

use board_types::{
    Arc as BoardArc, Bezier, Circle as BoardCircle, GraphicShape, Rectangle, Segment, Vec2Nm,
};
use sketch_solver::{Arc, Circle, Constraint, Cubic, Line, Point, Sketch, SolveResult};

use crate::common::{point_v2, to_mm, to_mm_f};
use crate::errors::{MapError, WritebackError};

/// A board segment lowered to two points and a line.
#[derive(Debug, Clone)]
pub struct MappedSegment {
    pub source: Segment,
    pub start: Point,
    pub end: Point,
    pub line: Line,
    pub constraints: Vec<Constraint>,
}

impl MappedSegment {
    fn create(sketch: &mut Sketch, seg: Segment) -> Self {
        let p1 = sketch.point(to_mm(seg.start.x), to_mm(seg.start.y));
        let p2 = sketch.point(to_mm(seg.end.x), to_mm(seg.end.y));
        let line = sketch.line(p1, p2);
        MappedSegment {
            source: seg,
            start: p1,
            end: p2,
            line,
            constraints: Vec::new(),
        }
    }

    fn write_back(&self, sketch: &Sketch) -> Segment {
        let mut seg = self.source.clone();
        seg.start = point_v2(sketch, self.start);
        seg.end = point_v2(sketch, self.end);
        seg
    }
}

/// A board arc lowered to center/start/end points and an arc entity.
#[derive(Debug, Clone)]
pub struct MappedArc {
    pub source: BoardArc,
    pub center: Point,
    pub start: Point,
    pub end: Point,
    pub arc: Arc,
    pub constraints: Vec<Constraint>,
}

impl MappedArc {
    fn create(sketch: &mut Sketch, arc: BoardArc) -> Result<Self, MapError> {
        let center_v = arc.center().ok_or_else(|| {
            MapError::DegenerateGeometry(format!("arc {}: collinear start/mid/end", arc.id))
        })?;
        let c = sketch.point(to_mm(center_v.x), to_mm(center_v.y));
        let s = sketch.point(to_mm(arc.start.x), to_mm(arc.start.y));
        let e = sketch.point(to_mm(arc.end.x), to_mm(arc.end.y));
        let a = sketch.arc(c, s, e);
        Ok(MappedArc {
            source: arc,
            center: c,
            start: s,
            end: e,
            arc: a,
            constraints: Vec::new(),
        })
    }

    fn write_back(&self, sketch: &Sketch) -> BoardArc {
        let mut arc = self.source.clone();
        arc.start = point_v2(sketch, self.start);
        arc.end = point_v2(sketch, self.end);

        // Rebuild the mid point at half the counter-clockwise sweep so the
        // arc's direction survives the round trip.
        let (cx, cy) = sketch.point_pos(self.center);
        let (sx, sy) = sketch.point_pos(self.start);
        let (ex, ey) = sketch.point_pos(self.end);
        let start_angle = (sy - cy).atan2(sx - cx);
        let end_angle = (ey - cy).atan2(ex - cx);
        let sweep = (end_angle - start_angle).rem_euclid(TAU);
        let mid_angle = start_angle + sweep / 2.0;
        let radius = (sx - cx).hypot(sy - cy);
        arc.mid = Vec2Nm::from_mm(
            cx + radius * mid_angle.cos(),
            cy + radius * mid_angle.sin(),
        );
        arc
    }
}

/// A board circle lowered to a center point and circle with radius variable.
#[derive(Debug, Clone)]
pub struct MappedCircle {
    pub source: BoardCircle,
    pub center: Point,
    pub circle: Circle,
    pub constraints: Vec<Constraint>,
}

impl MappedCircle {
    fn create(sketch: &mut Sketch, circ: BoardCircle) -> Self {
        let c = sketch.point(to_mm(circ.center.x), to_mm(circ.center.y));
        let radius_mm = to_mm_f(circ.radius_nm());
        let circle = sketch.circle(c, radius_mm);
        MappedCircle {
            source: circ,
            center: c,
            circle,
            constraints: Vec::new(),
        }
    }

    fn write_back(&self, sketch: &Sketch) -> BoardCircle {
        let mut circ = self.source.clone();
        circ.center = point_v2(sketch, self.center);
        let (cu, cv) = sketch.point_pos(self.center);
        circ.radius_point = Vec2Nm::from_mm(cu + sketch.radius(self.circle), cv);
        circ
    }
}

/// A board rectangle lowered to four corners and four edges, kept
/// rectangular by three perpendicular constraints (the fourth corner
/// follows).
#[derive(Debug, Clone)]
pub struct MappedRectangle {
    pub source: Rectangle,
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
    pub top: Line,
    pub right: Line,
    pub bottom: Line,
    pub left: Line,
    pub constraints: Vec<Constraint>,
}

impl MappedRectangle {
    fn create(sketch: &mut Sketch, rect: Rectangle) -> Self {
        let tl_x = to_mm(rect.top_left.x);
        let tl_y = to_mm(rect.top_left.y);
        let br_x = to_mm(rect.bottom_right.x);
        let br_y = to_mm(rect.bottom_right.y);
        let tl = sketch.point(tl_x, tl_y);
        let tr = sketch.point(br_x, tl_y);
        let br = sketch.point(br_x, br_y);
        let bl = sketch.point(tl_x, br_y);
        let top = sketch.line(tl, tr);
        let right = sketch.line(tr, br);
        let bottom = sketch.line(br, bl);
        let left = sketch.line(bl, tl);
        let constraints = vec![
            sketch.perpendicular(top, right),
            sketch.perpendicular(right, bottom),
            sketch.perpendicular(bottom, left),
        ];
        MappedRectangle {
            source: rect,
            top_left: tl,
            top_right: tr,
            bottom_right: br,
            bottom_left: bl,
            top,
            right,
            bottom,
            left,
            constraints,
        }
    }

    // The source format is axis-aligned; corners that drifted off axis are
    // projected by writing only the two defining corners.
    fn write_back(&self, sketch: &Sketch) -> Rectangle {
        let mut rect = self.source.clone();
        rect.top_left = point_v2(sketch, self.top_left);
        rect.bottom_right = point_v2(sketch, self.bottom_right);
        rect
    }
}

/// A board Bezier lowered to its four control points.
#[derive(Debug, Clone)]
pub struct MappedBezier {
    pub source: Bezier,
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
    pub cubic: Cubic,
    pub constraints: Vec<Constraint>,
}

impl MappedBezier {
    fn create(sketch: &mut Sketch, bez: Bezier) -> Self {
        let p1 = sketch.point(to_mm(bez.start.x), to_mm(bez.start.y));
        let p2 = sketch.point(to_mm(bez.control1.x), to_mm(bez.control1.y));
        let p3 = sketch.point(to_mm(bez.control2.x), to_mm(bez.control2.y));
        let p4 = sketch.point(to_mm(bez.end.x), to_mm(bez.end.y));
        let cubic = sketch.cubic(p1, p2, p3, p4);
        MappedBezier {
            source: bez,
            start: p1,
            control1: p2,
            control2: p3,
            end: p4,
            cubic,
            constraints: Vec::new(),
        }
    }

    fn write_back(&self, sketch: &Sketch) -> Bezier {
        let mut bez = self.source.clone();
        bez.start = point_v2(sketch, self.start);
        bez.control1 = point_v2(sketch, self.control1);
        bez.control2 = point_v2(sketch, self.control2);
        bez.end = point_v2(sketch, self.end);
        bez
    }
}

/// A graphic primitive lowered into the sketch.
#[derive(Debug, Clone)]
pub enum MappedShape {
    Segment(MappedSegment),
    Arc(MappedArc),
    Circle(MappedCircle),
    Rectangle(MappedRectangle),
    Bezier(MappedBezier),
}

impl MappedShape {
    /// All solver points owned by this shape, in creation order.
    pub fn points(&self) -> Vec<Point> {
        match self {
            MappedShape::Segment(m) => vec![m.start, m.end],
            MappedShape::Arc(m) => vec![m.center, m.start, m.end],
            MappedShape::Circle(m) => vec![m.center],
            MappedShape::Rectangle(m) => {
                vec![m.top_left, m.top_right, m.bottom_right, m.bottom_left]
            }
            MappedShape::Bezier(m) => vec![m.start, m.control1, m.control2, m.end],
        }
    }

    /// All solver edges owned by this shape.
    pub fn lines(&self) -> Vec<Line> {
        match self {
            MappedShape::Segment(m) => vec![m.line],
            MappedShape::Rectangle(m) => vec![m.top, m.right, m.bottom, m.left],
            MappedShape::Arc(_) | MappedShape::Circle(_) | MappedShape::Bezier(_) => Vec::new(),
        }
    }

    /// Intrinsic constraints emitted by this shape's factory.
    pub fn constraints(&self) -> &[Constraint] {
        match self {
            MappedShape::Segment(m) => &m.constraints,
            MappedShape::Arc(m) => &m.constraints,
            MappedShape::Circle(m) => &m.constraints,
            MappedShape::Rectangle(m) => &m.constraints,
            MappedShape::Bezier(m) => &m.constraints,
        }
    }

    /// Reconstruct the source primitive from solved coordinates.
    pub fn write_back(&self, sketch: &Sketch) -> GraphicShape {
        match self {
            MappedShape::Segment(m) => GraphicShape::Segment(m.write_back(sketch)),
            MappedShape::Arc(m) => GraphicShape::Arc(m.write_back(sketch)),
            MappedShape::Circle(m) => GraphicShape::Circle(m.write_back(sketch)),
            MappedShape::Rectangle(m) => GraphicShape::Rectangle(m.write_back(sketch)),
            MappedShape::Bezier(m) => GraphicShape::Bezier(m.write_back(sketch)),
        }
    }
}

/// Lower a graphic primitive into solver entities, converting nanometers to
/// millimeters.
pub fn map_shape(sketch: &mut Sketch, shape: GraphicShape) -> Result<MappedShape, MapError> {
    match shape {
        GraphicShape::Segment(seg) => Ok(MappedShape::Segment(MappedSegment::create(sketch, seg))),
        GraphicShape::Arc(arc) => Ok(MappedShape::Arc(MappedArc::create(sketch, arc)?)),
        GraphicShape::Circle(circ) => Ok(MappedShape::Circle(MappedCircle::create(sketch, circ))),
        GraphicShape::Rectangle(rect) => {
            Ok(MappedShape::Rectangle(MappedRectangle::create(sketch, rect)))
        }
        GraphicShape::Bezier(bez) => Ok(MappedShape::Bezier(MappedBezier::create(sketch, bez))),
        GraphicShape::Polygon(p) => Err(MapError::UnsupportedShape(format!("polygon {}", p.id))),
    }
}

/// Write solved positions back onto all mapped shapes.
///
/// Fails with `SolveNotSuccessful` unless the solve converged; the returned
/// shapes are the modified sources, for the host to commit as one batch.
pub fn write_back_shapes(
    mapped: &[MappedShape],
    sketch: &Sketch,
    result: &SolveResult,
) -> Result<Vec<GraphicShape>, WritebackError> {
    if !result.ok {
        return Err(WritebackError::SolveNotSuccessful(result.code));
    }
    Ok(mapped.iter().map(|m| m.write_back(sketch)).collect())
}
