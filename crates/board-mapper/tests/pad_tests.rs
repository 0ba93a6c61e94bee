use approx::assert_abs_diff_eq;
use uuid::Uuid;

use board_mapper::{map_pad, MappedPadLayer};
use board_types::{
    ChamferedCorners, Pad, PadShapeKind, PadStack, PadStackLayer, Vec2Nm,
};
use sketch_solver::{Point, Sketch};

const NM: i64 = 1_000_000; // 1 mm

fn layer(shape: PadShapeKind, w_mm: f64, h_mm: f64) -> PadStackLayer {
    PadStackLayer {
        shape,
        size: Vec2Nm::from_mm(w_mm, h_mm),
        trapezoid_delta: Vec2Nm::default(),
        chamfer_ratio: 0.0,
        chamfered_corners: ChamferedCorners::default(),
        custom_anchor_shape: PadShapeKind::Unknown,
    }
}

fn pad_at(x_mm: f64, y_mm: f64, layers: Vec<PadStackLayer>) -> Pad {
    Pad {
        id: Uuid::new_v4(),
        number: "1".to_string(),
        position: Vec2Nm::from_mm(x_mm, y_mm),
        padstack: PadStack {
            copper_layers: layers,
        },
    }
}

fn dist(sketch: &Sketch, a: Point, b: Point) -> f64 {
    let (ax, ay) = sketch.point_pos(a);
    let (bx, by) = sketch.point_pos(b);
    (bx - ax).hypot(by - ay)
}

fn unit(sketch: &Sketch, a: Point, b: Point) -> (f64, f64) {
    let (ax, ay) = sketch.point_pos(a);
    let (bx, by) = sketch.point_pos(b);
    let (dx, dy) = (bx - ax, by - ay);
    let len = dx.hypot(dy);
    (dx / len, dy / len)
}

// ── Circle layers ───────────────────────────────────────────────────────────

#[test]
fn circle_layer_radius_and_writeback() {
    let mut sketch = Sketch::new();
    let pad = pad_at(2.0, 3.0, vec![layer(PadShapeKind::Circle, 4.0, 4.0)]);
    let mapped = map_pad(&mut sketch, pad);

    assert_eq!(mapped.layers.len(), 1);
    let MappedPadLayer::Circle(circle) = &mapped.layers[0] else {
        panic!("expected circle layer");
    };
    assert!(sketch.solve().ok);
    assert_abs_diff_eq!(sketch.radius(circle.circle), 2.0, epsilon = 1e-9);

    let written = mapped.write_back(&sketch);
    assert_eq!(written.padstack.copper_layers[0].size, Vec2Nm::from_mm(4.0, 4.0));
    assert_eq!(written.position, Vec2Nm::from_mm(2.0, 3.0));
}

#[test]
fn custom_layer_uses_anchor_shape() {
    let mut sketch = Sketch::new();
    let mut custom = layer(PadShapeKind::Custom, 4.0, 4.0);
    custom.custom_anchor_shape = PadShapeKind::Circle;
    let mapped = map_pad(&mut sketch, pad_at(0.0, 0.0, vec![custom]));
    assert!(matches!(mapped.layers[0], MappedPadLayer::Circle(_)));
}

#[test]
fn oval_layer_is_dropped() {
    let mut sketch = Sketch::new();
    let pad = pad_at(
        0.0,
        0.0,
        vec![
            layer(PadShapeKind::Oval, 3.0, 1.0),
            layer(PadShapeKind::Circle, 2.0, 2.0),
        ],
    );
    let mapped = map_pad(&mut sketch, pad);

    assert_eq!(mapped.layers.len(), 1, "oval layer must be dropped");
    assert!(sketch.solve().ok);
    // The surviving circle layer still writes into its own padstack slot.
    let written = mapped.write_back(&sketch);
    assert_eq!(written.padstack.copper_layers[1].size, Vec2Nm::from_mm(2.0, 2.0));
    assert_eq!(written.padstack.copper_layers[0].size, Vec2Nm::from_mm(3.0, 1.0));
}

// ── Rectangle layers ────────────────────────────────────────────────────────

#[test]
fn rectangle_layer_centered_on_pad() {
    let mut sketch = Sketch::new();
    let mapped = map_pad(
        &mut sketch,
        pad_at(5.0, 5.0, vec![layer(PadShapeKind::Rectangle, 10.0, 6.0)]),
    );
    let MappedPadLayer::Rectangle(rect) = &mapped.layers[0] else {
        panic!("expected rectangle layer");
    };
    // One midpoint + three perpendiculars.
    assert_eq!(rect.constraints.len(), 4);

    assert!(sketch.solve().ok);
    assert_eq!(sketch.point_pos(rect.tl), (0.0, 2.0));
    assert_eq!(sketch.point_pos(rect.br), (10.0, 8.0));
}

#[test]
fn rectangle_layer_survives_perturbation_centered() {
    let mut sketch = Sketch::new();
    let mapped = map_pad(
        &mut sketch,
        pad_at(5.0, 5.0, vec![layer(PadShapeKind::Rectangle, 10.0, 6.0)]),
    );
    let MappedPadLayer::Rectangle(rect) = &mapped.layers[0] else {
        panic!("expected rectangle layer");
    };

    sketch.move_point(rect.tl, -3.0, -1.0);
    sketch.dragged(rect.tl);
    let result = sketch.solve();
    assert!(result.ok);

    // Rectangularity holds.
    let top = unit(&sketch, rect.tl, rect.tr);
    let left = unit(&sketch, rect.tl, rect.bl);
    assert_abs_diff_eq!(top.0 * left.0 + top.1 * left.1, 0.0, epsilon = 1e-6);

    // The shared pad position stays on the diagonal midpoint.
    let (cu, cv) = sketch.point_pos(mapped.position);
    let (tlu, tlv) = sketch.point_pos(rect.tl);
    let (bru, brv) = sketch.point_pos(rect.br);
    assert_abs_diff_eq!(cu, (tlu + bru) / 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(cv, (tlv + brv) / 2.0, epsilon = 1e-6);
}

#[test]
fn rectangle_layer_writeback_derives_size() {
    let mut sketch = Sketch::new();
    let mapped = map_pad(
        &mut sketch,
        pad_at(5.0, 5.0, vec![layer(PadShapeKind::RoundRect, 10.0, 6.0)]),
    );
    assert!(sketch.solve().ok);
    let written = mapped.write_back(&sketch);
    let size = written.padstack.copper_layers[0].size;
    assert!((size.x - 10 * NM).abs() < 100_000, "width {:?}", size);
    assert!((size.y - 6 * NM).abs() < 100_000, "height {:?}", size);
}

// ── Trapezoid layers ────────────────────────────────────────────────────────

fn trapezoid_pad(delta_x_mm: f64, delta_y_mm: f64) -> Pad {
    let mut l = layer(PadShapeKind::Trapezoid, 10.0, 6.0);
    l.trapezoid_delta = Vec2Nm::from_mm(delta_x_mm, delta_y_mm);
    pad_at(4.0, 4.0, vec![l])
}

#[test]
fn trapezoid_vertical_skew_properties() {
    let mut sketch = Sketch::new();
    let mapped = map_pad(&mut sketch, trapezoid_pad(2.0, 0.0));
    let MappedPadLayer::Trapezoid(trap) = &mapped.layers[0] else {
        panic!("expected trapezoid layer");
    };
    assert!(sketch.solve().ok);

    // Left and right stay parallel; top and bottom have equal length.
    let left = unit(&sketch, trap.tl, trap.bl);
    let right = unit(&sketch, trap.tr, trap.br);
    assert_abs_diff_eq!(left.0 * right.1 - left.1 * right.0, 0.0, epsilon = 1e-6);
    let top_len = dist(&sketch, trap.tl, trap.tr);
    let bottom_len = dist(&sketch, trap.bl, trap.br);
    assert_abs_diff_eq!(top_len, bottom_len, epsilon = 1e-2);
}

#[test]
fn trapezoid_vertical_skew_round_trips() {
    let mut sketch = Sketch::new();
    let mapped = map_pad(&mut sketch, trapezoid_pad(2.0, 0.0));
    assert!(sketch.solve().ok);

    let written = mapped.write_back(&sketch);
    let layer = &written.padstack.copper_layers[0];
    assert!((layer.size.x - 10 * NM).abs() < 10_000, "size {:?}", layer.size);
    assert!((layer.size.y - 6 * NM).abs() < 10_000, "size {:?}", layer.size);
    assert!(
        (layer.trapezoid_delta.x - 2 * NM).abs() < 10_000,
        "delta {:?}",
        layer.trapezoid_delta
    );
    assert_eq!(layer.trapezoid_delta.y, 0);
}

#[test]
fn trapezoid_horizontal_skew_round_trips() {
    let mut sketch = Sketch::new();
    let mapped = map_pad(&mut sketch, trapezoid_pad(0.0, 2.0));
    let MappedPadLayer::Trapezoid(trap) = &mapped.layers[0] else {
        panic!("expected trapezoid layer");
    };
    assert!(sketch.solve().ok);

    // Mirror properties: top parallel to bottom, left equals right.
    let top = unit(&sketch, trap.tl, trap.tr);
    let bottom = unit(&sketch, trap.bl, trap.br);
    assert_abs_diff_eq!(top.0 * bottom.1 - top.1 * bottom.0, 0.0, epsilon = 1e-6);
    let left_len = dist(&sketch, trap.tl, trap.bl);
    let right_len = dist(&sketch, trap.tr, trap.br);
    assert_abs_diff_eq!(left_len, right_len, epsilon = 1e-2);

    let written = mapped.write_back(&sketch);
    let layer = &written.padstack.copper_layers[0];
    assert!((layer.size.x - 10 * NM).abs() < 10_000, "size {:?}", layer.size);
    assert!((layer.size.y - 6 * NM).abs() < 10_000, "size {:?}", layer.size);
    assert_eq!(layer.trapezoid_delta.x, 0);
    assert!(
        (layer.trapezoid_delta.y - 2 * NM).abs() < 10_000,
        "delta {:?}",
        layer.trapezoid_delta
    );
}

// ── Chamfered rectangle layers ──────────────────────────────────────────────

fn chamfered_pad(corners: ChamferedCorners, ratio: f64) -> Pad {
    let mut l = layer(PadShapeKind::ChamferedRect, 10.0, 6.0);
    l.chamfer_ratio = ratio;
    l.chamfered_corners = corners;
    pad_at(5.0, 5.0, vec![l])
}

#[test]
fn chamfered_rect_all_corners_square_and_equal() {
    let mut sketch = Sketch::new();
    let mapped = map_pad(&mut sketch, chamfered_pad(ChamferedCorners::all(), 0.25));
    let MappedPadLayer::ChamferedRect(rect) = &mapped.layers[0] else {
        panic!("expected chamfered rect layer");
    };
    assert!(sketch.solve().ok);

    // chamfer_dist = min(10, 6) * 0.25 = 1.5 mm on every corner.
    let corners = [
        rect.chamfer_tl.as_ref().unwrap(),
        rect.chamfer_tr.as_ref().unwrap(),
        rect.chamfer_bl.as_ref().unwrap(),
        rect.chamfer_br.as_ref().unwrap(),
    ];
    for c in corners {
        let h_len = dist(&sketch, c.h_construction.p1, c.h_construction.p2);
        let v_len = dist(&sketch, c.v_construction.p1, c.v_construction.p2);
        assert_abs_diff_eq!(h_len, 1.5, epsilon = 1e-4);
        assert_abs_diff_eq!(h_len, v_len, epsilon = 1e-4);

        // Every chamfer edge runs at 45 degrees to the rectangle axes.
        let (du, dv) = unit(&sketch, c.chamfer.p1, c.chamfer.p2);
        assert_abs_diff_eq!(du.abs(), dv.abs(), epsilon = 1e-4);
    }

    // The pad position is the midpoint of both construction lines.
    let (cu, cv) = sketch.point_pos(mapped.position);
    let (tmu, tmv) = sketch.point_pos(rect.top_mid);
    let (bmu, bmv) = sketch.point_pos(rect.bottom_mid);
    assert_abs_diff_eq!(cu, (tmu + bmu) / 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(cv, (tmv + bmv) / 2.0, epsilon = 1e-6);
}

#[test]
fn chamfered_rect_partial_corners() {
    let corners = ChamferedCorners {
        top_left: true,
        bottom_right: true,
        ..Default::default()
    };
    let mut sketch = Sketch::new();
    let mapped = map_pad(&mut sketch, chamfered_pad(corners, 0.2));
    let MappedPadLayer::ChamferedRect(rect) = &mapped.layers[0] else {
        panic!("expected chamfered rect layer");
    };
    assert!(rect.chamfer_tl.is_some());
    assert!(rect.chamfer_tr.is_none());
    assert!(rect.chamfer_bl.is_none());
    assert!(rect.chamfer_br.is_some());
    // 4 edges + 2 chamfer edges
    assert_eq!(mapped.layers[0].lines().len(), 6);
    assert!(sketch.solve().ok);
}

#[test]
fn chamfered_rect_writeback_recovers_size_and_ratio() {
    let mut sketch = Sketch::new();
    let mapped = map_pad(&mut sketch, chamfered_pad(ChamferedCorners::all(), 0.25));
    assert!(sketch.solve().ok);

    let written = mapped.write_back(&sketch);
    let layer = &written.padstack.copper_layers[0];
    assert!((layer.size.x - 10 * NM).abs() < 100_000, "size {:?}", layer.size);
    assert!((layer.size.y - 6 * NM).abs() < 100_000, "size {:?}", layer.size);
    assert!(
        layer.chamfer_ratio > 0.23 && layer.chamfer_ratio < 0.27,
        "ratio {}",
        layer.chamfer_ratio
    );
    assert_eq!(written.position, Vec2Nm::from_mm(5.0, 5.0));
}

// ── Shared position ─────────────────────────────────────────────────────────

#[test]
fn layers_share_the_pad_position_point() {
    let mut sketch = Sketch::new();
    let pad = pad_at(
        1.0,
        2.0,
        vec![
            layer(PadShapeKind::Circle, 2.0, 2.0),
            layer(PadShapeKind::Rectangle, 4.0, 3.0),
        ],
    );
    let mapped = map_pad(&mut sketch, pad);
    assert_eq!(mapped.layers.len(), 2);

    let MappedPadLayer::Circle(c) = &mapped.layers[0] else {
        panic!("expected circle layer");
    };
    let MappedPadLayer::Rectangle(r) = &mapped.layers[1] else {
        panic!("expected rectangle layer");
    };
    assert_eq!(c.center.handle(), mapped.position.handle());
    assert_eq!(r.center.handle(), mapped.position.handle());

    // Intrinsic constraints flattened across layers: rectangle contributes 4.
    assert_eq!(mapped.constraints.len(), 4);
}
