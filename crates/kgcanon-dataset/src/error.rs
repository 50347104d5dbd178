use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which ID table a symbol belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Entity,
    Relation,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Entity => f.write_str("entity"),
            SymbolKind::Relation => f.write_str("relation"),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}:{line}: {message}", .path.display())]
    Malformed {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("{}:{line}: duplicate {kind} {field} `{value}`", .path.display())]
    DuplicateId {
        path: PathBuf,
        line: u64,
        kind: SymbolKind,
        field: &'static str,
        value: String,
    },

    #[error("{}:{line}: unknown {kind} `{name}`", .path.display())]
    UnknownSymbol {
        path: PathBuf,
        line: u64,
        kind: SymbolKind,
        name: String,
    },

    #[error("{kind} side-information is empty but the dataset has {triples} triples")]
    EmptySideInfo { kind: SymbolKind, triples: usize },

    #[error("{}:{line}: duplicate gold cluster id `{cluster}`", .path.display())]
    DuplicateCluster {
        path: PathBuf,
        line: u64,
        cluster: String,
    },

    #[error("invalid index: {0}")]
    InvalidIndex(String),

    #[error("index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("batch size must be positive")]
    InvalidBatchSize,

    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl DatasetError {
    /// Classify an `open` failure: a missing file gets its own variant.
    pub(crate) fn from_open(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            DatasetError::FileNotFound { path }
        } else {
            DatasetError::Io { path, source }
        }
    }
}

pub type Result<T, E = DatasetError> = std::result::Result<T, E>;
