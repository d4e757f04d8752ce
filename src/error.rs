use thiserror::Error;

use crate::snap::EdgeHandle;

/// Contract violations reported by the edge registry.
///
/// These never come from user input; they mean a caller kept a handle past
/// `delete_edge` or invented one. The registry state is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EdgeError {
    #[error("edge handle {0:?} was deleted")]
    Stale(EdgeHandle),
    #[error("edge handle {0:?} was never issued")]
    OutOfRange(EdgeHandle),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("area count must be between 1 and {max}, got {value}")]
    AreaCount { value: usize, max: usize },
    #[error("unknown palette `{0}`")]
    Palette(String),
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Errors surfaced by the `field-snap` binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
