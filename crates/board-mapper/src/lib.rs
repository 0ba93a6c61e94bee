pub mod common;
pub mod dimensions;
pub mod errors;
pub mod graphics;
pub mod pads;
pub mod pipeline;
pub mod suffix;

pub use common::{to_mm, DEFAULT_TOLERANCE};
pub use dimensions::{
    apply_dimension_constraints, map_dimensions, map_dimensions_default, DimensionMapping,
    MappedEdgeDimension, MappedPointDimension,
};
pub use errors::{DimensionError, MapError, PipelineError, SuffixError, WritebackError};
pub use graphics::{
    map_shape, write_back_shapes, MappedArc, MappedBezier, MappedCircle, MappedRectangle,
    MappedSegment, MappedShape,
};
pub use pads::{
    map_pad, ChamferCorner, MappedPad, MappedPadChamferedRect, MappedPadCircle, MappedPadLayer,
    MappedPadRectangle, MappedPadTrapezoid,
};
pub use pipeline::{constrain_board, BoardUpdate};
pub use suffix::{parse_suffix, ConstraintSpec};
