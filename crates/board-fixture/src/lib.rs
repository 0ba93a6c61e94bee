pub mod errors;
pub mod load;
pub mod save;

use board_types::{Dimension, GraphicShape, Pad};

pub use errors::FixtureError;
pub use load::load_fixture;
pub use save::save_fixture;

/// A board snapshot for offline testing: everything the pipeline consumes,
/// reconstructed from the variant-tagged wire form.
#[derive(Debug, Clone, Default)]
pub struct BoardFixture {
    pub board_name: String,
    pub shapes: Vec<GraphicShape>,
    pub dimensions: Vec<Dimension>,
    pub pads: Vec<Pad>,
}
