//! End-to-end orchestration for one board invocation: lower everything into
//! a sketch, bind and apply dimension constraints, solve, write back.

use board_types::{Dimension, GraphicShape, Pad};
use sketch_solver::{Sketch, SolveResult};
use tracing::info;

use crate::common::DEFAULT_TOLERANCE;
use crate::dimensions::{apply_dimension_constraints, map_dimensions};
use crate::errors::{PipelineError, WritebackError};
use crate::graphics::{map_shape, write_back_shapes};
use crate::pads::map_pad;

/// The mutated source primitives to commit back to the host, plus the solve
/// outcome they were derived from.
#[derive(Debug, Clone)]
pub struct BoardUpdate {
    pub shapes: Vec<GraphicShape>,
    pub pads: Vec<Pad>,
    pub dimensions: Vec<Dimension>,
    pub result: SolveResult,
}

/// Run the full constraint pipeline over one board's primitives.
pub fn constrain_board(
    shapes: Vec<GraphicShape>,
    dimensions: Vec<Dimension>,
    pads: Vec<Pad>,
) -> Result<BoardUpdate, PipelineError> {
    let mut sketch = Sketch::new();

    let mut mapped_shapes = Vec::with_capacity(shapes.len());
    for shape in shapes {
        mapped_shapes.push(map_shape(&mut sketch, shape)?);
    }
    let mut mapped_pads = Vec::with_capacity(pads.len());
    for pad in pads {
        mapped_pads.push(map_pad(&mut sketch, pad));
    }

    let mapping = map_dimensions(
        &mut sketch,
        &dimensions,
        &mapped_shapes,
        &mapped_pads,
        DEFAULT_TOLERANCE,
    );
    let user_constraints = apply_dimension_constraints(&mut sketch, &mapping)?;
    info!(
        shapes = mapped_shapes.len(),
        pads = mapped_pads.len(),
        edges = mapping.edges.len(),
        points = mapping.points.len(),
        user_constraints = user_constraints.len(),
        "board lowered into sketch"
    );

    let result = sketch.solve();
    info!(ok = result.ok, dof = result.dof, iterations = result.iterations, "solve finished");
    if !result.ok {
        return Err(WritebackError::SolveNotSuccessful(result.code).into());
    }

    let shapes_out = write_back_shapes(&mapped_shapes, &sketch, &result)?;
    let pads_out = mapped_pads.iter().map(|p| p.write_back(&sketch)).collect();
    let dimensions_out = mapping.write_back(&sketch);

    Ok(BoardUpdate {
        shapes: shapes_out,
        pads: pads_out,
        dimensions: dimensions_out,
        result,
    })
}
