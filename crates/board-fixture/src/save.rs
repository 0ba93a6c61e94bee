use serde::Serialize;

use board_types::Pad;

use crate::errors::FixtureError;
use crate::BoardFixture;

#[derive(Serialize)]
struct PadEntryOut<'a> {
    proto: &'a Pad,
}

#[derive(Serialize)]
struct FixtureOut<'a> {
    board_name: &'a str,
    shapes: &'a [board_types::GraphicShape],
    dimensions: &'a [board_types::Dimension],
    pads: Vec<PadEntryOut<'a>>,
}

/// Serialize a board fixture into the same variant-tagged JSON form the
/// loader consumes.
pub fn save_fixture(fixture: &BoardFixture) -> Result<String, FixtureError> {
    let out = FixtureOut {
        board_name: &fixture.board_name,
        shapes: &fixture.shapes,
        dimensions: &fixture.dimensions,
        pads: fixture.pads.iter().map(|p| PadEntryOut { proto: p }).collect(),
    };
    serde_json::to_string_pretty(&out).map_err(|e| FixtureError::Serialize(e.to_string()))
}
