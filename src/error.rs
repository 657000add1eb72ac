use std::path::PathBuf;

use bracket_geometry::prelude::Point;
use thiserror::Error;

use crate::data::monsters::HostileKind;

/// Faults raised while advancing hostiles. The session logs them and skips
/// the rest of that tick.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("{} left the grid at row {}, col {}", kind.name(), point.y, point.x)]
    OutOfBounds { kind: HostileKind, point: Point },
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("save file ended early: missing {0}")]
    MissingLine(&'static str),

    #[error("malformed {field}: {value:?}")]
    Malformed { field: &'static str, value: String },

    #[error("level {0} does not exist")]
    InvalidLevel(u32),

    #[error("grid row {row} is malformed: {line:?}")]
    BadGridRow { row: usize, line: String },

    #[error("Save file corrupted: expected {expected} grid rows, found {found}")]
    TruncatedGrid { expected: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("terminal error: {0}")]
    Terminal(String),
}
