use thiserror::Error;

/// Hard failures rejected at the engine boundary. Everything past the
/// boundary degrades to structured results instead of erroring (malformed
/// programs score zero, oversized conflict clusters fall back to greedy).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid project: {0}")]
    InvalidProject(String),

    #[error("program catalog is empty")]
    EmptyCatalog,
}
