//! Two-pass dimension mapping: build a name registry by matching dimension
//! endpoints to sketch points, then apply each dimension's suffix
//! constraints through the parsed specs.

use indexmap::IndexMap;
use tracing::debug;

use board_types::Dimension;
use sketch_solver::{Constraint, EntityHandle, Line, Point, Sketch};

use crate::common::{point_v2, to_mm, DEFAULT_TOLERANCE};
use crate::errors::DimensionError;
use crate::graphics::MappedShape;
use crate::pads::MappedPad;
use crate::suffix::parse_suffix;

/// A named dimension bound to a sketch edge.
#[derive(Debug, Clone)]
pub struct MappedEdgeDimension {
    pub source: Dimension,
    pub name: String,
    pub line: Line,
}

impl MappedEdgeDimension {
    /// Move the dimension's reference points onto the solved edge endpoints.
    fn write_back(&self, sketch: &Sketch) -> Dimension {
        let mut dim = self.source.clone();
        dim.set_start(point_v2(sketch, self.line.p1));
        dim.set_end(point_v2(sketch, self.line.p2));
        dim
    }
}

/// A named dimension bound to a single sketch point.
#[derive(Debug, Clone)]
pub struct MappedPointDimension {
    pub source: Dimension,
    pub name: String,
    pub point: Point,
}

impl MappedPointDimension {
    /// Translate the dimension so its start tracks the bound point while the
    /// extension line and label keep their original offsets.
    fn write_back(&self, sketch: &Sketch) -> Dimension {
        let orig_start = self.source.start();
        let end_offset = self.source.end() - orig_start;
        let text_offset = self.source.text_position() - orig_start;

        let mut dim = self.source.clone();
        let new_start = point_v2(sketch, self.point);
        dim.set_start(new_start);
        dim.set_end(new_start + end_offset);
        dim.set_text_position(new_start + text_offset);
        dim
    }
}

/// How one input dimension resolved against the sketch.
#[derive(Debug, Clone)]
enum Binding {
    /// Both endpoints resolved and a mapped edge connects them.
    Edge(Line),
    /// Both endpoints resolved but no edge connects them.
    TwoPoints(Point, Point),
    /// Exactly one reference point resolved.
    Point(Point),
    /// Nothing resolved (or the kind carries no point references).
    Unbound,
}

#[derive(Debug, Clone)]
struct DimensionBinding {
    name: Option<String>,
    suffix: String,
    binding: Binding,
}

/// The name registry plus per-dimension bindings produced by pass 1.
#[derive(Debug, Clone, Default)]
pub struct DimensionMapping {
    /// Named dimensions bound to edges, in insertion order.
    pub edges: IndexMap<String, MappedEdgeDimension>,
    /// Named dimensions bound to points, in insertion order.
    pub points: IndexMap<String, MappedPointDimension>,
    /// Points synthesized for center markers, pinned in place.
    pub extra_points: Vec<Point>,
    bindings: Vec<DimensionBinding>,
}

impl DimensionMapping {
    /// Resolve an edge reference from a suffix constraint.
    pub(crate) fn resolve_edge(&self, name: &str, context: &str) -> Result<Line, DimensionError> {
        self.edges
            .get(name)
            .map(|entry| entry.line)
            .ok_or_else(|| DimensionError::UnknownReference {
                context: context.to_string(),
                name: name.to_string(),
            })
    }

    /// Resolve a point reference from a suffix constraint.
    pub(crate) fn resolve_point(&self, name: &str, context: &str) -> Result<Point, DimensionError> {
        self.points
            .get(name)
            .map(|entry| entry.point)
            .ok_or_else(|| DimensionError::UnknownReference {
                context: context.to_string(),
                name: name.to_string(),
            })
    }

    /// Update all registered source dimensions from solved coordinates and
    /// return them for the host to commit.
    pub fn write_back(&self, sketch: &Sketch) -> Vec<Dimension> {
        let mut modified = Vec::new();
        for entry in self.edges.values() {
            modified.push(entry.write_back(sketch));
        }
        for entry in self.points.values() {
            modified.push(entry.write_back(sketch));
        }
        modified
    }
}

/// First sketch point within `tolerance` (mm) of the query position; ties
/// resolve to the earliest inserted point.
fn find_point(sketch: &Sketch, u: f64, v: f64, candidates: &[Point], tolerance: f64) -> Option<Point> {
    candidates.iter().copied().find(|p| {
        let (pu, pv) = sketch.point_pos(*p);
        (pu - u).hypot(pv - v) <= tolerance
    })
}

/// Dimensions opt in to naming via a `name:` prefix; leaders use the first
/// comma field of their override text.
fn extract_name(dim: &Dimension) -> Option<String> {
    if let Some(override_text) = dim.override_text() {
        let name = override_text.split(',').next().unwrap_or("").trim();
        return (!name.is_empty()).then(|| name.to_string());
    }
    let prefix = dim.prefix()?;
    let name = prefix.strip_suffix(':')?.trim();
    Some(name.to_string())
}

/// Raw suffix text carrying constraint tokens for one dimension.
fn extract_suffix(dim: &Dimension) -> String {
    if let Some(override_text) = dim.override_text() {
        return override_text
            .split_once(',')
            .map(|(_, rest)| rest.to_string())
            .unwrap_or_default();
    }
    dim.suffix().unwrap_or("").to_string()
}

/// Pass 1: bind dimension reference positions to sketch points and edges.
///
/// Every dimension gets a binding (for pass 2); named dimensions are also
/// recorded in the registry maps for reference resolution and writeback.
pub fn map_dimensions(
    sketch: &mut Sketch,
    dimensions: &[Dimension],
    shapes: &[MappedShape],
    pads: &[MappedPad],
    tolerance: f64,
) -> DimensionMapping {
    let mut all_points: Vec<Point> = Vec::new();
    for shape in shapes {
        all_points.extend(shape.points());
    }
    for pad in pads {
        all_points.extend(pad.points());
    }

    // Edge index keyed by the unordered endpoint handle pair.
    let mut edge_index: IndexMap<(EntityHandle, EntityHandle), Line> = IndexMap::new();
    let all_lines = shapes
        .iter()
        .flat_map(|s| s.lines())
        .chain(pads.iter().flat_map(|p| p.lines()));
    for line in all_lines {
        let a = line.p1.handle();
        let b = line.p2.handle();
        edge_index.insert((a.min(b), a.max(b)), line);
    }

    let mut mapping = DimensionMapping::default();

    // Pre-pass: synthesize pinned points for center markers so other
    // dimensions can bind against them.
    for dim in dimensions {
        if let Dimension::Center(center) = dim {
            let (u, v) = (to_mm(center.center.x), to_mm(center.center.y));
            let pt = sketch.point(u, v);
            sketch.dragged(pt);
            all_points.push(pt);
            mapping.extra_points.push(pt);
        }
    }

    for dim in dimensions {
        let name = extract_name(dim);
        let binding = match dim {
            Dimension::Aligned(_) | Dimension::Orthogonal(_) => {
                let (su, sv) = dim.start().to_mm();
                let (eu, ev) = dim.end().to_mm();
                let p_start = find_point(sketch, su, sv, &all_points, tolerance);
                let p_end = find_point(sketch, eu, ev, &all_points, tolerance);
                match (p_start, p_end) {
                    (Some(a), Some(b)) => {
                        let key = (a.handle().min(b.handle()), a.handle().max(b.handle()));
                        if let Some(line) = edge_index.get(&key).copied() {
                            if let Some(n) = &name {
                                mapping.edges.insert(
                                    n.clone(),
                                    MappedEdgeDimension {
                                        source: dim.clone(),
                                        name: n.clone(),
                                        line,
                                    },
                                );
                            }
                            Binding::Edge(line)
                        } else {
                            if let Some(n) = &name {
                                mapping.points.insert(
                                    format!("{n}:start"),
                                    MappedPointDimension {
                                        source: dim.clone(),
                                        name: format!("{n}:start"),
                                        point: a,
                                    },
                                );
                                mapping.points.insert(
                                    format!("{n}:end"),
                                    MappedPointDimension {
                                        source: dim.clone(),
                                        name: format!("{n}:end"),
                                        point: b,
                                    },
                                );
                            }
                            Binding::TwoPoints(a, b)
                        }
                    }
                    (Some(a), None) => {
                        if let Some(n) = &name {
                            mapping.points.insert(
                                format!("{n}:start"),
                                MappedPointDimension {
                                    source: dim.clone(),
                                    name: format!("{n}:start"),
                                    point: a,
                                },
                            );
                        }
                        Binding::Point(a)
                    }
                    (None, Some(b)) => {
                        if let Some(n) = &name {
                            mapping.points.insert(
                                format!("{n}:end"),
                                MappedPointDimension {
                                    source: dim.clone(),
                                    name: format!("{n}:end"),
                                    point: b,
                                },
                            );
                        }
                        Binding::Point(b)
                    }
                    (None, None) => Binding::Unbound,
                }
            }
            Dimension::Leader(_) => {
                let (su, sv) = dim.start().to_mm();
                match find_point(sketch, su, sv, &all_points, tolerance) {
                    Some(p) => {
                        if let Some(n) = &name {
                            mapping.points.insert(
                                n.clone(),
                                MappedPointDimension {
                                    source: dim.clone(),
                                    name: n.clone(),
                                    point: p,
                                },
                            );
                        }
                        Binding::Point(p)
                    }
                    None => Binding::Unbound,
                }
            }
            // Center markers only contribute extra points; radial dimensions
            // reference curves, not points.
            Dimension::Center(_) | Dimension::Radial(_) => Binding::Unbound,
        };

        mapping.bindings.push(DimensionBinding {
            name,
            suffix: extract_suffix(dim),
            binding,
        });
    }

    debug!(
        edges = mapping.edges.len(),
        points = mapping.points.len(),
        extra = mapping.extra_points.len(),
        "dimension registry built"
    );
    mapping
}

/// Pass 1 with the default 1e-4 mm tolerance.
pub fn map_dimensions_default(
    sketch: &mut Sketch,
    dimensions: &[Dimension],
    shapes: &[MappedShape],
    pads: &[MappedPad],
) -> DimensionMapping {
    map_dimensions(sketch, dimensions, shapes, pads, DEFAULT_TOLERANCE)
}

/// Pass 2: parse each bound dimension's suffix and apply the specs.
///
/// A parse or resolution error on any dimension aborts the whole pass; no
/// partial application.
pub fn apply_dimension_constraints(
    sketch: &mut Sketch,
    mapping: &DimensionMapping,
) -> Result<Vec<Constraint>, DimensionError> {
    let mut constraints = Vec::new();

    for entry in &mapping.bindings {
        if matches!(entry.binding, Binding::Unbound) {
            continue;
        }
        if entry.suffix.trim().is_empty() {
            continue;
        }

        let context = entry.name.clone().unwrap_or_else(|| "<unnamed>".to_string());
        let specs = parse_suffix(&entry.suffix).map_err(|source| DimensionError::Parse {
            context: context.clone(),
            source,
        })?;

        for spec in specs {
            let constraint = match &entry.binding {
                Binding::Edge(line) => spec.apply_to_line(sketch, *line, &context, mapping)?,
                Binding::TwoPoints(a, b) => {
                    spec.apply_to_two_points(sketch, *a, *b, &context, mapping)?
                }
                Binding::Point(p) => spec.apply_to_point(sketch, *p, &context, mapping)?,
                Binding::Unbound => unreachable!("unbound dimensions are skipped"),
            };
            constraints.push(constraint);
        }
    }

    Ok(constraints)
}
