use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use board_types::{Dimension, GraphicShape, Pad};

use crate::errors::FixtureError;
use crate::BoardFixture;

/// The raw file structure; shape and dimension entries stay untyped until
/// their `type` tag has been checked.
#[derive(Debug, Deserialize)]
struct FixtureRaw {
    #[serde(default)]
    board_name: String,
    #[serde(default)]
    shapes: Vec<Value>,
    #[serde(default)]
    dimensions: Vec<Value>,
    #[serde(default)]
    pads: Vec<PadEntry>,
}

#[derive(Debug, Deserialize)]
struct PadEntry {
    proto: Pad,
}

const SHAPE_KINDS: &[&str] = &["segment", "arc", "circle", "rectangle", "bezier", "polygon"];
const DIMENSION_KINDS: &[&str] = &["aligned", "orthogonal", "leader", "center", "radial"];

fn entry_kind(entry: &Value) -> Option<String> {
    entry
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Deserialize a board fixture from a JSON string.
///
/// Entries with an unrecognized `type` tag are skipped with a warning, the
/// way the extractor marks primitives it cannot classify; a recognized tag
/// with a malformed payload is an error.
pub fn load_fixture(json: &str) -> Result<BoardFixture, FixtureError> {
    let raw: FixtureRaw =
        serde_json::from_str(json).map_err(|e| FixtureError::Parse(e.to_string()))?;

    let mut shapes = Vec::with_capacity(raw.shapes.len());
    for entry in raw.shapes {
        match entry_kind(&entry) {
            Some(kind) if SHAPE_KINDS.contains(&kind.as_str()) => {
                let shape: GraphicShape = serde_json::from_value(entry)
                    .map_err(|e| FixtureError::Parse(format!("shape '{kind}': {e}")))?;
                shapes.push(shape);
            }
            kind => warn!(kind = ?kind, "skipping unrecognized shape entry"),
        }
    }

    let mut dimensions = Vec::with_capacity(raw.dimensions.len());
    for entry in raw.dimensions {
        match entry_kind(&entry) {
            Some(kind) if DIMENSION_KINDS.contains(&kind.as_str()) => {
                let dim: Dimension = serde_json::from_value(entry)
                    .map_err(|e| FixtureError::Parse(format!("dimension '{kind}': {e}")))?;
                dimensions.push(dim);
            }
            kind => warn!(kind = ?kind, "skipping unrecognized dimension entry"),
        }
    }

    let pads: Vec<Pad> = raw.pads.into_iter().map(|entry| entry.proto).collect();

    Ok(BoardFixture {
        board_name: raw.board_name,
        shapes,
        dimensions,
        pads,
    })
}
