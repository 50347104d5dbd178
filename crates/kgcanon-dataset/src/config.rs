//! Loader configuration.
//!
//! Every field has a default, so an empty JSON object (`{}`) is a valid
//! config and reproduces the stock directory layout.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Result};

/// File names inside a dataset directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFiles {
    pub entities: PathBuf,
    pub relations: PathBuf,
    pub triples: PathBuf,
    pub typed_triples: PathBuf,
    pub entity_side_info: PathBuf,
    pub relation_side_info: PathBuf,
    pub gold_clusters: PathBuf,
}

impl Default for TableFiles {
    fn default() -> Self {
        Self {
            entities: PathBuf::from("ent2id.txt"),
            relations: PathBuf::from("rel2id.txt"),
            triples: PathBuf::from("triples.txt"),
            typed_triples: PathBuf::from("rel_triples.txt"),
            entity_side_info: PathBuf::from("ent_side_info.txt"),
            relation_side_info: PathBuf::from("rel_side_info.txt"),
            gold_clusters: PathBuf::from("gold_npclust.txt"),
        }
    }
}

/// What a missing gold-cluster file means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoldPolicy {
    /// Load without gold data.
    #[default]
    Optional,
    /// Fail with `FileNotFound`.
    Required,
}

/// What a repeated cluster id in the gold file means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateClusterPolicy {
    /// Last line wins.
    #[default]
    Overwrite,
    /// Fail with `DuplicateCluster`.
    Reject,
}

/// Configuration for [`crate::DatasetLoader`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub files: TableFiles,
    pub gold_policy: GoldPolicy,
    pub duplicate_clusters: DuplicateClusterPolicy,
}

impl DatasetConfig {
    pub fn from_json_str(text: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| DatasetError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| DatasetError::from_open(path.to_path_buf(), source))?;
        Self::from_json_str(&text, path)
    }
}
