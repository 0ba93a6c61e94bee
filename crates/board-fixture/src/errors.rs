/// Errors during board fixture loading and saving.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to parse fixture: {0}")]
    Parse(String),

    #[error("failed to serialize fixture: {0}")]
    Serialize(String),
}
