//! Lowering of multi-layer pads into sketch entities with the intrinsic
//! constraint nets that keep each layer's shape family invariant, and the
//! writeback that derives size / trapezoid delta / chamfer ratio from
//! solved coordinates.

use board_types::{Pad, PadShapeKind, PadStackLayer, Vec2Nm};
use sketch_solver::{Circle, Constraint, Line, Point, Sketch};
use tracing::warn;

use crate::common::{point_dist, point_v2, to_mm, to_mm_f};

/// A circular pad layer: one circle on the shared pad position.
#[derive(Debug, Clone)]
pub struct MappedPadCircle {
    pub source: PadStackLayer,
    pub layer_index: usize,
    pub center: Point,
    pub circle: Circle,
    pub constraints: Vec<Constraint>,
}

impl MappedPadCircle {
    fn create(
        sketch: &mut Sketch,
        layer: PadStackLayer,
        layer_index: usize,
        center: Point,
        _x: i64,
        _y: i64,
    ) -> Self {
        let circle = sketch.circle(center, to_mm_f(layer.size.x as f64 / 2.0));
        MappedPadCircle {
            source: layer,
            layer_index,
            center,
            circle,
            constraints: Vec::new(),
        }
    }

    fn write_back(&self, sketch: &Sketch) -> PadStackLayer {
        let mut layer = self.source.clone();
        let d = sketch.radius(self.circle) * 2.0;
        layer.size = Vec2Nm::from_mm(d, d);
        layer
    }

    pub fn points(&self) -> Vec<Point> {
        vec![self.center]
    }

    pub fn lines(&self) -> Vec<Line> {
        Vec::new()
    }
}

/// A rectangular pad layer: four corners, four edges, and a diagonal
/// construction line that pins the rectangle onto the pad position.
#[derive(Debug, Clone)]
pub struct MappedPadRectangle {
    pub source: PadStackLayer,
    pub layer_index: usize,
    pub center: Point,
    pub tl: Point,
    pub tr: Point,
    pub br: Point,
    pub bl: Point,
    pub top: Line,
    pub right: Line,
    pub bottom: Line,
    pub left: Line,
    pub construction: Line,
    pub constraints: Vec<Constraint>,
}

impl MappedPadRectangle {
    fn create(
        sketch: &mut Sketch,
        layer: PadStackLayer,
        layer_index: usize,
        center: Point,
        x: i64,
        y: i64,
    ) -> Self {
        let half_x = layer.size.x as f64 / 2.0;
        let half_y = layer.size.y as f64 / 2.0;
        let (x, y) = (x as f64, y as f64);
        let tl = sketch.point(to_mm_f(x - half_x), to_mm_f(y - half_y));
        let tr = sketch.point(to_mm_f(x + half_x), to_mm_f(y - half_y));
        let br = sketch.point(to_mm_f(x + half_x), to_mm_f(y + half_y));
        let bl = sketch.point(to_mm_f(x - half_x), to_mm_f(y + half_y));
        let construction = sketch.line(tl, br);
        let top = sketch.line(tl, tr);
        let bottom = sketch.line(bl, br);
        let left = sketch.line(tl, bl);
        let right = sketch.line(tr, br);
        let constraints = vec![
            sketch.midpoint(center, construction),
            sketch.perpendicular(top, left),
            sketch.perpendicular(bottom, right),
            sketch.perpendicular(left, bottom),
        ];
        MappedPadRectangle {
            source: layer,
            layer_index,
            center,
            tl,
            tr,
            br,
            bl,
            top,
            right,
            bottom,
            left,
            construction,
            constraints,
        }
    }

    fn write_back(&self, sketch: &Sketch) -> PadStackLayer {
        let mut layer = self.source.clone();
        let width = point_dist(sketch, self.tl, self.tr);
        let height = point_dist(sketch, self.tl, self.bl);
        layer.size = Vec2Nm::from_mm(width, height);
        layer
    }

    pub fn points(&self) -> Vec<Point> {
        vec![self.center, self.tl, self.tr, self.br, self.bl]
    }

    pub fn lines(&self) -> Vec<Line> {
        vec![self.top, self.right, self.bottom, self.left]
    }
}

/// A trapezoid pad layer. The non-zero component of the delta vector picks
/// the skew axis; the construction line joins the midpoints of the two
/// parallel edges.
#[derive(Debug, Clone)]
pub struct MappedPadTrapezoid {
    pub source: PadStackLayer,
    pub layer_index: usize,
    pub center: Point,
    pub tl: Point,
    pub tr: Point,
    pub br: Point,
    pub bl: Point,
    pub top: Line,
    pub right: Line,
    pub bottom: Line,
    pub left: Line,
    pub midpoint_a: Point,
    pub midpoint_b: Point,
    pub construction: Line,
    pub constraints: Vec<Constraint>,
}

impl MappedPadTrapezoid {
    fn create(
        sketch: &mut Sketch,
        layer: PadStackLayer,
        layer_index: usize,
        center: Point,
        x: i64,
        y: i64,
    ) -> Self {
        let delta_x = layer.trapezoid_delta.x as f64 * 0.5;
        let delta_y = layer.trapezoid_delta.y as f64 * 0.5;
        let half_x = layer.size.x as f64 / 2.0;
        let half_y = layer.size.y as f64 / 2.0;
        let (x, y) = (x as f64, y as f64);

        let tl = sketch.point(to_mm_f(x - half_x - delta_y), to_mm_f(y - half_y + delta_x));
        let tr = sketch.point(to_mm_f(x + half_x + delta_y), to_mm_f(y - half_y - delta_x));
        let br = sketch.point(to_mm_f(x + half_x - delta_y), to_mm_f(y + half_y + delta_x));
        let bl = sketch.point(to_mm_f(x - half_x + delta_y), to_mm_f(y + half_y - delta_x));
        let top = sketch.line(tl, tr);
        let bottom = sketch.line(bl, br);
        let left = sketch.line(tl, bl);
        let right = sketch.line(tr, br);

        let mut constraints = Vec::new();
        let (midpoint_a, midpoint_b, construction);
        if delta_x != 0.0 {
            // Skewed along the vertical axis: left/right stay parallel.
            let mp_a = sketch.point(to_mm_f(x - half_x), to_mm_f(y));
            let mp_b = sketch.point(to_mm_f(x + half_x), to_mm_f(y));
            let cons = sketch.line(mp_a, mp_b);
            constraints.extend([
                sketch.midpoint(mp_a, left),
                sketch.midpoint(mp_b, right),
                sketch.perpendicular(cons, left),
                sketch.midpoint(center, cons),
                sketch.parallel(left, right),
                sketch.equal(top, bottom),
            ]);
            midpoint_a = mp_a;
            midpoint_b = mp_b;
            construction = cons;
        } else {
            // Skewed along the horizontal axis: top/bottom stay parallel.
            let mp_a = sketch.point(to_mm_f(x), to_mm_f(y - half_y));
            let mp_b = sketch.point(to_mm_f(x), to_mm_f(y + half_y));
            let cons = sketch.line(mp_a, mp_b);
            constraints.extend([
                sketch.midpoint(mp_a, top),
                sketch.midpoint(mp_b, bottom),
                sketch.perpendicular(cons, top),
                sketch.midpoint(center, cons),
                sketch.parallel(top, bottom),
                sketch.equal(left, right),
            ]);
            midpoint_a = mp_a;
            midpoint_b = mp_b;
            construction = cons;
        }

        MappedPadTrapezoid {
            source: layer,
            layer_index,
            center,
            tl,
            tr,
            br,
            bl,
            top,
            right,
            bottom,
            left,
            midpoint_a,
            midpoint_b,
            construction,
            constraints,
        }
    }

    fn write_back(&self, sketch: &Sketch) -> PadStackLayer {
        let mut layer = self.source.clone();
        let construction_len = point_dist(sketch, self.midpoint_a, self.midpoint_b);
        let left_len = point_dist(sketch, self.tl, self.bl);
        let right_len = point_dist(sketch, self.tr, self.br);
        let top_len = point_dist(sketch, self.tl, self.tr);
        let bottom_len = point_dist(sketch, self.bl, self.br);

        // Branch on the original delta, before overwriting it. A zero delta
        // takes the vertical-skew interpretation.
        let original_delta = self.source.trapezoid_delta;
        if original_delta.x != 0 || original_delta.y == 0 {
            layer.size = Vec2Nm::from_mm(construction_len, (left_len + right_len) / 2.0);
            layer.trapezoid_delta = Vec2Nm::from_mm((right_len - left_len) / 2.0, 0.0);
        } else {
            layer.size = Vec2Nm::from_mm((top_len + bottom_len) / 2.0, construction_len);
            layer.trapezoid_delta = Vec2Nm::from_mm(0.0, (top_len - bottom_len) / 2.0);
        }
        layer
    }

    pub fn points(&self) -> Vec<Point> {
        vec![
            self.center,
            self.tl,
            self.tr,
            self.br,
            self.bl,
            self.midpoint_a,
            self.midpoint_b,
        ]
    }

    pub fn lines(&self) -> Vec<Line> {
        vec![self.top, self.right, self.bottom, self.left]
    }
}

/// Geometry for a single chamfered corner: the two chamfer endpoints, the
/// chamfer edge, and the construction lines back to the original corner.
#[derive(Debug, Clone)]
pub struct ChamferCorner {
    pub p_h: Point,
    pub p_v: Point,
    pub chamfer: Line,
    pub h_construction: Line,
    pub v_construction: Line,
}

/// A chamfered-rectangle pad layer with 0-4 cut corners.
#[derive(Debug, Clone)]
pub struct MappedPadChamferedRect {
    pub source: PadStackLayer,
    pub layer_index: usize,
    pub center: Point,
    pub tl: Point,
    pub tr: Point,
    pub br: Point,
    pub bl: Point,
    pub top: Line,
    pub right: Line,
    pub bottom: Line,
    pub left: Line,
    pub chamfer_tl: Option<ChamferCorner>,
    pub chamfer_tr: Option<ChamferCorner>,
    pub chamfer_bl: Option<ChamferCorner>,
    pub chamfer_br: Option<ChamferCorner>,
    pub top_mid: Point,
    pub left_mid: Point,
    pub right_mid: Point,
    pub bottom_mid: Point,
    pub construction_v: Line,
    pub construction_h: Line,
    pub constraints: Vec<Constraint>,
}

impl MappedPadChamferedRect {
    fn build_chamfer_corner(
        sketch: &mut Sketch,
        corner: Point,
        adj_h_nm: f64,
        adj_v_nm: f64,
    ) -> ChamferCorner {
        let (cu, cv) = sketch.point_pos(corner);
        let p_h = sketch.point(cu + to_mm_f(adj_h_nm), cv);
        let p_v = sketch.point(cu, cv + to_mm_f(adj_v_nm));
        let chamfer = sketch.line(p_h, p_v);
        let v_construction = sketch.line(corner, p_v);
        let h_construction = sketch.line(corner, p_h);
        ChamferCorner {
            p_h,
            p_v,
            chamfer,
            h_construction,
            v_construction,
        }
    }

    fn create(
        sketch: &mut Sketch,
        layer: PadStackLayer,
        layer_index: usize,
        center: Point,
        x: i64,
        y: i64,
    ) -> Self {
        let chamfer_dist = layer.size.x.min(layer.size.y) as f64 * layer.chamfer_ratio;
        let half_x = layer.size.x as f64 / 2.0;
        let half_y = layer.size.y as f64 / 2.0;
        let (x, y) = (x as f64, y as f64);

        let tl = sketch.point(to_mm_f(x - half_x), to_mm_f(y - half_y));
        let tr = sketch.point(to_mm_f(x + half_x), to_mm_f(y - half_y));
        let br = sketch.point(to_mm_f(x + half_x), to_mm_f(y + half_y));
        let bl = sketch.point(to_mm_f(x - half_x), to_mm_f(y + half_y));

        let mut constraints = Vec::new();
        let mut v_construction_lines: Vec<Line> = Vec::new();
        let mut h_construction_lines: Vec<Line> = Vec::new();

        // Per corner: (base point, chamfered flag, h sign, v sign).
        let corners = layer.chamfered_corners;
        let corner_specs = [
            (tl, corners.top_left, 1.0, 1.0),
            (tr, corners.top_right, -1.0, 1.0),
            (bl, corners.bottom_left, 1.0, -1.0),
            (br, corners.bottom_right, -1.0, -1.0),
        ];

        let mut chamfers: [Option<ChamferCorner>; 4] = [None, None, None, None];
        let mut edge_h: Vec<Point> = Vec::with_capacity(4);
        let mut edge_v: Vec<Point> = Vec::with_capacity(4);

        for (slot, (pt, is_chamfered, h_sign, v_sign)) in corner_specs.into_iter().enumerate() {
            if is_chamfered {
                let c = Self::build_chamfer_corner(
                    sketch,
                    pt,
                    h_sign * chamfer_dist,
                    v_sign * chamfer_dist,
                );
                v_construction_lines.push(c.v_construction);
                h_construction_lines.push(c.h_construction);
                constraints.push(sketch.equal(c.v_construction, c.h_construction));
                edge_h.push(c.p_h);
                edge_v.push(c.p_v);
                chamfers[slot] = Some(c);
            } else {
                edge_h.push(pt);
                edge_v.push(pt);
            }
        }

        // All chamfers the same size.
        for i in 1..v_construction_lines.len() {
            constraints.push(sketch.equal(v_construction_lines[i], v_construction_lines[i - 1]));
        }

        // Edge lines connecting the chamfer endpoints. Corner indices:
        // tl=0, tr=1, bl=2, br=3. Direction matters for the midpoints below.
        let top = sketch.line(edge_h[1], edge_h[0]);
        let left = sketch.line(edge_v[0], edge_v[2]);
        let right = sketch.line(edge_v[1], edge_v[3]);
        let bottom = sketch.line(edge_h[2], edge_h[3]);

        // Edge midpoints and centering construction lines.
        let tm = sketch.point(to_mm_f(x), to_mm_f(y - half_y));
        let lm = sketch.point(to_mm_f(x - half_x), to_mm_f(y));
        let rm = sketch.point(to_mm_f(x + half_x), to_mm_f(y));
        let bm = sketch.point(to_mm_f(x), to_mm_f(y + half_y));
        let construction_v = sketch.line(tm, bm);
        let construction_h = sketch.line(lm, rm);

        constraints.extend([
            sketch.midpoint(tm, top),
            sketch.midpoint(lm, left),
            sketch.midpoint(rm, right),
            sketch.midpoint(bm, bottom),
            sketch.midpoint(center, construction_v),
            sketch.midpoint(center, construction_h),
            sketch.perpendicular(construction_h, construction_v),
            sketch.parallel(construction_h, bottom),
            sketch.parallel(construction_h, top),
            sketch.parallel(construction_v, left),
            sketch.parallel(construction_v, right),
        ]);
        for line in &v_construction_lines {
            constraints.push(sketch.parallel(construction_v, *line));
        }
        for line in &h_construction_lines {
            constraints.push(sketch.parallel(construction_h, *line));
        }

        let [chamfer_tl, chamfer_tr, chamfer_bl, chamfer_br] = chamfers;

        MappedPadChamferedRect {
            source: layer,
            layer_index,
            center,
            tl,
            tr,
            br,
            bl,
            top,
            right,
            bottom,
            left,
            chamfer_tl,
            chamfer_tr,
            chamfer_bl,
            chamfer_br,
            top_mid: tm,
            left_mid: lm,
            right_mid: rm,
            bottom_mid: bm,
            construction_v,
            construction_h,
            constraints,
        }
    }

    fn chamfers(&self) -> [&Option<ChamferCorner>; 4] {
        [
            &self.chamfer_tl,
            &self.chamfer_tr,
            &self.chamfer_bl,
            &self.chamfer_br,
        ]
    }

    fn write_back(&self, sketch: &Sketch) -> PadStackLayer {
        let mut layer = self.source.clone();
        let width = point_dist(sketch, self.left_mid, self.right_mid);
        let height = point_dist(sketch, self.top_mid, self.bottom_mid);
        layer.size = Vec2Nm::from_mm(width, height);

        // Derive the chamfer ratio from the first existing chamfer.
        if let Some(chamfer) = self.chamfers().into_iter().flatten().next() {
            let chamfer_dist = point_dist(
                sketch,
                chamfer.h_construction.p1,
                chamfer.h_construction.p2,
            );
            layer.chamfer_ratio = chamfer_dist / width.min(height);
        }
        layer
    }

    pub fn points(&self) -> Vec<Point> {
        let mut pts = vec![
            self.center,
            self.tl,
            self.tr,
            self.br,
            self.bl,
            self.top_mid,
            self.left_mid,
            self.right_mid,
            self.bottom_mid,
        ];
        for chamfer in self.chamfers().into_iter().flatten() {
            pts.push(chamfer.p_h);
            pts.push(chamfer.p_v);
        }
        pts
    }

    pub fn lines(&self) -> Vec<Line> {
        let mut result = vec![self.top, self.right, self.bottom, self.left];
        for chamfer in self.chamfers().into_iter().flatten() {
            result.push(chamfer.chamfer);
        }
        result
    }
}

/// One mapped copper layer of a pad.
#[derive(Debug, Clone)]
pub enum MappedPadLayer {
    Circle(MappedPadCircle),
    Rectangle(MappedPadRectangle),
    Trapezoid(MappedPadTrapezoid),
    ChamferedRect(MappedPadChamferedRect),
}

impl MappedPadLayer {
    pub fn points(&self) -> Vec<Point> {
        match self {
            MappedPadLayer::Circle(m) => m.points(),
            MappedPadLayer::Rectangle(m) => m.points(),
            MappedPadLayer::Trapezoid(m) => m.points(),
            MappedPadLayer::ChamferedRect(m) => m.points(),
        }
    }

    pub fn lines(&self) -> Vec<Line> {
        match self {
            MappedPadLayer::Circle(m) => m.lines(),
            MappedPadLayer::Rectangle(m) => m.lines(),
            MappedPadLayer::Trapezoid(m) => m.lines(),
            MappedPadLayer::ChamferedRect(m) => m.lines(),
        }
    }

    pub fn constraints(&self) -> &[Constraint] {
        match self {
            MappedPadLayer::Circle(m) => &m.constraints,
            MappedPadLayer::Rectangle(m) => &m.constraints,
            MappedPadLayer::Trapezoid(m) => &m.constraints,
            MappedPadLayer::ChamferedRect(m) => &m.constraints,
        }
    }

    fn layer_index(&self) -> usize {
        match self {
            MappedPadLayer::Circle(m) => m.layer_index,
            MappedPadLayer::Rectangle(m) => m.layer_index,
            MappedPadLayer::Trapezoid(m) => m.layer_index,
            MappedPadLayer::ChamferedRect(m) => m.layer_index,
        }
    }

    fn write_back(&self, sketch: &Sketch) -> PadStackLayer {
        match self {
            MappedPadLayer::Circle(m) => m.write_back(sketch),
            MappedPadLayer::Rectangle(m) => m.write_back(sketch),
            MappedPadLayer::Trapezoid(m) => m.write_back(sketch),
            MappedPadLayer::ChamferedRect(m) => m.write_back(sketch),
        }
    }
}

/// A pad lowered into the sketch: one shared position point plus one mapped
/// geometry per supported copper layer.
#[derive(Debug, Clone)]
pub struct MappedPad {
    pub source: Pad,
    pub position: Point,
    pub layers: Vec<MappedPadLayer>,
    pub constraints: Vec<Constraint>,
}

impl MappedPad {
    /// All solver points of all layers (the shared position point appears in
    /// each layer's set).
    pub fn points(&self) -> Vec<Point> {
        self.layers.iter().flat_map(|l| l.points()).collect()
    }

    pub fn lines(&self) -> Vec<Line> {
        self.layers.iter().flat_map(|l| l.lines()).collect()
    }

    /// Reconstruct the source pad from solved coordinates: the position comes
    /// from the shared point, each layer writes its own slot back.
    pub fn write_back(&self, sketch: &Sketch) -> Pad {
        let mut pad = self.source.clone();
        pad.position = point_v2(sketch, self.position);
        for layer in &self.layers {
            pad.padstack.copper_layers[layer.layer_index()] = layer.write_back(sketch);
        }
        pad
    }
}

fn map_pad_layer(
    sketch: &mut Sketch,
    layer: PadStackLayer,
    layer_index: usize,
    center: Point,
    x: i64,
    y: i64,
) -> Option<MappedPadLayer> {
    match (layer.shape, layer.custom_anchor_shape) {
        (PadShapeKind::Circle, _) | (PadShapeKind::Custom, PadShapeKind::Circle) => Some(
            MappedPadLayer::Circle(MappedPadCircle::create(sketch, layer, layer_index, center, x, y)),
        ),
        (PadShapeKind::Rectangle | PadShapeKind::RoundRect, _)
        | (PadShapeKind::Custom, PadShapeKind::Rectangle) => {
            Some(MappedPadLayer::Rectangle(MappedPadRectangle::create(
                sketch,
                layer,
                layer_index,
                center,
                x,
                y,
            )))
        }
        (PadShapeKind::Trapezoid, _) => Some(MappedPadLayer::Trapezoid(
            MappedPadTrapezoid::create(sketch, layer, layer_index, center, x, y),
        )),
        (PadShapeKind::ChamferedRect, _) => Some(MappedPadLayer::ChamferedRect(
            MappedPadChamferedRect::create(sketch, layer, layer_index, center, x, y),
        )),
        // Oval, Unknown, and custom layers without a usable anchor.
        _ => None,
    }
}

/// Lower a pad into solver entities. Layers with unsupported outlines are
/// dropped with a warning; the rest share the pad's position point.
pub fn map_pad(sketch: &mut Sketch, pad: Pad) -> MappedPad {
    let center = sketch.point(to_mm(pad.position.x), to_mm(pad.position.y));
    let (x, y) = (pad.position.x, pad.position.y);

    let mut layers = Vec::new();
    for (i, layer) in pad.padstack.copper_layers.iter().enumerate() {
        match map_pad_layer(sketch, layer.clone(), i, center, x, y) {
            Some(mapped) => layers.push(mapped),
            None => warn!(
                pad = %pad.id,
                shape = ?layer.shape,
                "dropping unsupported pad layer"
            ),
        }
    }

    let constraints = layers
        .iter()
        .flat_map(|l| l.constraints().iter().copied())
        .collect();
    MappedPad {
        source: pad,
        position: center,
        layers,
        constraints,
    }
}
