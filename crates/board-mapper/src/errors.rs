use sketch_solver::SolveCode;

/// Errors while lowering board primitives into sketch entities.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MapError {
    #[error("unsupported shape: {0}")]
    UnsupportedShape(String),

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

/// Errors in the suffix constraint language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuffixError {
    #[error("empty constraint token")]
    EmptyToken,

    #[error("unrecognized constraint token: '{0}'")]
    UnrecognizedToken(String),

    #[error("unknown constraint: '{0}'")]
    UnknownConstraint(String),
}

/// Errors while binding dimensions or applying their suffix constraints.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DimensionError {
    #[error("dimension '{context}': {source}")]
    Parse {
        context: String,
        #[source]
        source: SuffixError,
    },

    #[error("dimension '{context}': '{name}' not found in dimension mapping")]
    UnknownReference { context: String, name: String },

    #[error("dimension '{context}': constraint '{constraint}' cannot apply to a {applied_to}")]
    WrongContext {
        context: String,
        constraint: &'static str,
        applied_to: &'static str,
    },
}

/// Writeback precondition failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WritebackError {
    #[error("cannot write back: solve was not successful ({0:?})")]
    SolveNotSuccessful(SolveCode),
}

/// Any failure of the end-to-end board pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Dimension(#[from] DimensionError),

    #[error(transparent)]
    Writeback(#[from] WritebackError),
}
