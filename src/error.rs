// error.rs
// Error taxonomy for the layout core and its configuration/catalog loaders

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    /// `remove` was asked for an index outside the current set.
    #[error("particle index {index} is out of range for a set of {len}")]
    InvalidIndex { index: usize, len: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("catalog record `{name}` refers to unknown category `{kind}`")]
    UnknownCategory { name: String, kind: String },
    #[error("category `{kind}` has invalid color `{color}`")]
    InvalidColor { kind: String, color: String },
    #[error("no catalog record named `{0}`")]
    UnknownRecord(String),
    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
