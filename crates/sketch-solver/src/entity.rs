/// Entity handles are indices into the sketch's entity arena. Handles are
/// allocated monotonically and never compacted or reused.
pub type EntityHandle = u32;

/// A 2D (or 3D bookkeeping) point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub(crate) handle: EntityHandle,
}

impl Point {
    pub fn handle(&self) -> EntityHandle {
        self.handle
    }
}

/// A line segment. The line's orientation is `p2 - p1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub(crate) handle: EntityHandle,
    pub p1: Point,
    pub p2: Point,
}

impl Line {
    pub fn handle(&self) -> EntityHandle {
        self.handle
    }
}

/// A circle with a center point and a scalar radius variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circle {
    pub(crate) handle: EntityHandle,
    pub center: Point,
}

impl Circle {
    pub fn handle(&self) -> EntityHandle {
        self.handle
    }
}

/// A circular arc through center, start and end points. The solver keeps the
/// center-start and center-end distances implicitly equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arc {
    pub(crate) handle: EntityHandle,
    pub center: Point,
    pub start: Point,
    pub end: Point,
}

impl Arc {
    pub fn handle(&self) -> EntityHandle {
        self.handle
    }
}

/// A cubic Bezier control polygon. No intrinsic constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cubic {
    pub(crate) handle: EntityHandle,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
    pub p4: Point,
}

impl Cubic {
    pub fn handle(&self) -> EntityHandle {
        self.handle
    }
}

/// Either curved entity, for radius-based constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveRef {
    Circle(EntityHandle),
    Arc(EntityHandle),
}

impl From<Circle> for CurveRef {
    fn from(c: Circle) -> Self {
        CurveRef::Circle(c.handle)
    }
}

impl From<Arc> for CurveRef {
    fn from(a: Arc) -> Self {
        CurveRef::Arc(a.handle)
    }
}

impl CurveRef {
    pub(crate) fn handle(&self) -> EntityHandle {
        match self {
            CurveRef::Circle(h) | CurveRef::Arc(h) => *h,
        }
    }
}

/// The kind of a constraint, mirrored on the opaque handle pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Coincident,
    Distance,
    DistanceProj,
    Horizontal,
    Vertical,
    Parallel,
    Perpendicular,
    Equal,
    Tangent,
    Midpoint,
    Symmetric,
    SymmetricH,
    SymmetricV,
    Angle,
    Diameter,
    Ratio,
    LengthDiff,
    OnLine,
    OnCircle,
    EqualAngle,
    EqualRadius,
    Dragged,
}

/// An opaque `(handle, kind)` pair identifying a constraint in the sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub(crate) handle: u32,
    pub(crate) kind: ConstraintKind,
}

impl Constraint {
    pub fn handle(&self) -> u32 {
        self.handle
    }

    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }
}

/// Arena storage for one entity. Workplane and normal form the fixed base
/// group created on sketch construction; everything else is user-group.
#[derive(Debug, Clone)]
pub(crate) enum EntityData {
    Workplane,
    Normal,
    /// 2D point: params[px] = u, params[px + 1] = v.
    Point { px: usize },
    /// 3D point: three consecutive params. Kept for normal bookkeeping.
    Point3d { px: usize },
    Line {
        p1: EntityHandle,
        p2: EntityHandle,
    },
    Circle {
        center: EntityHandle,
        radius_px: usize,
    },
    Arc {
        center: EntityHandle,
        start: EntityHandle,
        end: EntityHandle,
    },
    Cubic {
        p1: EntityHandle,
        p2: EntityHandle,
        p3: EntityHandle,
        p4: EntityHandle,
    },
}
