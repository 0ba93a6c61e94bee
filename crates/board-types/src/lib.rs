pub mod dimensions;
pub mod geometry;
pub mod pads;
pub mod shapes;

pub use dimensions::*;
pub use geometry::*;
pub use pads::*;
pub use shapes::*;
