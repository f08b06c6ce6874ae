use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolygonIndexError {
    /// A polygon was rejected by [`Context::add_polygon`][crate::Context::add_polygon].
    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    /// A query was issued before any polygon was added.
    #[error("Context holds no polygons")]
    EmptyContext,

    /// A handle was used after release, or was never issued.
    #[error("Handle misuse: {0}")]
    HandleMisuse(String),

    /// Malformed query input or options.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PolygonIndexError>;
