//! The suffix constraint language written into dimension labels: a
//! comma-separated token list like `h, e(a), =7mm`.

use std::fmt;

use sketch_solver::{Constraint, Line, Point, Sketch};

use crate::dimensions::DimensionMapping;
use crate::errors::{DimensionError, SuffixError};

/// One parsed constraint token.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintSpec {
    /// `=<n>mm` — distance between the bound endpoints.
    Distance(f64),
    /// `v` / `vert`
    Vertical,
    /// `h` / `horiz`
    Horizontal,
    /// `p(x)` / `par(x)` — parallel to the named edge.
    Parallel(String),
    /// `x(x)` / `perp(x)` — perpendicular to the named edge.
    Perpendicular(String),
    /// `c(x)` / `coin(x)` — coincident with the named point.
    Coincident(String),
    /// `e(x)` / `eq(x)` — equal length with the named edge.
    Equal(String),
    /// `m(x)` / `mid(x)` — at the midpoint of the named edge.
    Midpoint(String),
}

impl fmt::Display for ConstraintSpec {
    /// Canonical token form; parsing the rendered text yields the same spec.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintSpec::Distance(v) => write!(f, "={v}mm"),
            ConstraintSpec::Vertical => write!(f, "v"),
            ConstraintSpec::Horizontal => write!(f, "h"),
            ConstraintSpec::Parallel(x) => write!(f, "par({x})"),
            ConstraintSpec::Perpendicular(x) => write!(f, "perp({x})"),
            ConstraintSpec::Coincident(x) => write!(f, "coin({x})"),
            ConstraintSpec::Equal(x) => write!(f, "eq({x})"),
            ConstraintSpec::Midpoint(x) => write!(f, "mid({x})"),
        }
    }
}

impl ConstraintSpec {
    fn keyword(&self) -> &'static str {
        match self {
            ConstraintSpec::Distance(_) => "=<n>mm",
            ConstraintSpec::Vertical => "v",
            ConstraintSpec::Horizontal => "h",
            ConstraintSpec::Parallel(_) => "par",
            ConstraintSpec::Perpendicular(_) => "perp",
            ConstraintSpec::Coincident(_) => "coin",
            ConstraintSpec::Equal(_) => "eq",
            ConstraintSpec::Midpoint(_) => "mid",
        }
    }

    fn wrong_context(&self, context: &str, applied_to: &'static str) -> DimensionError {
        DimensionError::WrongContext {
            context: context.to_string(),
            constraint: self.keyword(),
            applied_to,
        }
    }

    /// Apply this spec to a dimension bound to an edge.
    pub fn apply_to_line(
        &self,
        sketch: &mut Sketch,
        line: Line,
        context: &str,
        registry: &DimensionMapping,
    ) -> Result<Constraint, DimensionError> {
        match self {
            ConstraintSpec::Distance(value) => Ok(sketch.distance(line.p1, line.p2, *value)),
            ConstraintSpec::Vertical => Ok(sketch.vertical(line)),
            ConstraintSpec::Horizontal => Ok(sketch.horizontal(line)),
            ConstraintSpec::Parallel(other) => {
                let other = registry.resolve_edge(other, context)?;
                Ok(sketch.parallel(line, other))
            }
            ConstraintSpec::Perpendicular(other) => {
                let other = registry.resolve_edge(other, context)?;
                Ok(sketch.perpendicular(line, other))
            }
            ConstraintSpec::Equal(other) => {
                let other = registry.resolve_edge(other, context)?;
                Ok(sketch.equal(line, other))
            }
            ConstraintSpec::Coincident(_) | ConstraintSpec::Midpoint(_) => {
                Err(self.wrong_context(context, "edge"))
            }
        }
    }

    /// Apply this spec to a dimension whose endpoints resolved without a
    /// connecting edge.
    pub fn apply_to_two_points(
        &self,
        sketch: &mut Sketch,
        p1: Point,
        p2: Point,
        context: &str,
        _registry: &DimensionMapping,
    ) -> Result<Constraint, DimensionError> {
        match self {
            ConstraintSpec::Distance(value) => Ok(sketch.distance(p1, p2, *value)),
            _ => Err(self.wrong_context(context, "point pair")),
        }
    }

    /// Apply this spec to a dimension bound to a single point.
    pub fn apply_to_point(
        &self,
        sketch: &mut Sketch,
        point: Point,
        context: &str,
        registry: &DimensionMapping,
    ) -> Result<Constraint, DimensionError> {
        match self {
            ConstraintSpec::Coincident(other) => {
                let other = registry.resolve_point(other, context)?;
                Ok(sketch.coincident(point, other))
            }
            ConstraintSpec::Midpoint(other) => {
                let edge = registry.resolve_edge(other, context)?;
                Ok(sketch.midpoint(point, edge))
            }
            _ => Err(self.wrong_context(context, "point")),
        }
    }
}

fn is_number(s: &str) -> bool {
    // digits ("." digits)? — no sign, no exponent
    let mut parts = s.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match parts.next() {
        None => true,
        Some(frac) => !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit()),
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_token(token: &str) -> Result<ConstraintSpec, SuffixError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(SuffixError::EmptyToken);
    }

    // distance := "=" number "mm"
    if let Some(rest) = token.strip_prefix('=') {
        if let Some(number) = rest.strip_suffix("mm") {
            if is_number(number) {
                if let Ok(value) = number.parse() {
                    return Ok(ConstraintSpec::Distance(value));
                }
            }
        }
        return Err(SuffixError::UnrecognizedToken(token.to_string()));
    }

    // func := identifier "(" arg ")"
    if let Some(open) = token.find('(') {
        if token.ends_with(')') && open > 0 && open < token.len() - 1 {
            let name = &token[..open];
            let arg = token[open + 1..token.len() - 1].trim();
            if is_identifier(name) && !arg.is_empty() {
                let arg = arg.to_string();
                return match name {
                    "p" | "par" => Ok(ConstraintSpec::Parallel(arg)),
                    "x" | "perp" => Ok(ConstraintSpec::Perpendicular(arg)),
                    "c" | "coin" => Ok(ConstraintSpec::Coincident(arg)),
                    "e" | "eq" => Ok(ConstraintSpec::Equal(arg)),
                    "m" | "mid" => Ok(ConstraintSpec::Midpoint(arg)),
                    _ => Err(SuffixError::UnknownConstraint(name.to_string())),
                };
            }
        }
        return Err(SuffixError::UnrecognizedToken(token.to_string()));
    }

    // bare := v | vert | h | horiz
    match token {
        "v" | "vert" => Ok(ConstraintSpec::Vertical),
        "h" | "horiz" => Ok(ConstraintSpec::Horizontal),
        _ => Err(SuffixError::UnrecognizedToken(token.to_string())),
    }
}

/// Parse a comma-separated suffix into constraint specs. Empty or
/// whitespace-only suffixes parse to an empty list; an empty token between
/// commas is an error.
pub fn parse_suffix(suffix: &str) -> Result<Vec<ConstraintSpec>, SuffixError> {
    if suffix.trim().is_empty() {
        return Ok(Vec::new());
    }
    suffix.split(',').map(parse_token).collect()
}
