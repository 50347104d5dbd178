//! Gold entity clusters.
//!
//! File format: one cluster per line, tab-separated, no header:
//!
//! ```text
//! <cluster id> \t <ignored> \t <member> \t <member> ...
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

use crate::config::DuplicateClusterPolicy;
use crate::error::{DatasetError, Result};
use crate::invert::invert_map;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GoldClusters {
    clusters: BTreeMap<String, BTreeSet<String>>,
    by_entity: BTreeMap<String, BTreeSet<String>>,
}

impl GoldClusters {
    pub fn from_clusters(clusters: BTreeMap<String, BTreeSet<String>>) -> Self {
        let by_entity = invert_map(&clusters);
        Self {
            clusters,
            by_entity,
        }
    }

    /// cluster id -> members
    pub fn clusters(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.clusters
    }

    /// entity -> cluster ids
    pub fn by_entity(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.by_entity
    }

    pub fn members(&self, cluster: &str) -> Option<&BTreeSet<String>> {
        self.clusters.get(cluster)
    }

    pub fn clusters_of(&self, entity: &str) -> Option<&BTreeSet<String>> {
        self.by_entity.get(entity)
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn entity_count(&self) -> usize {
        self.by_entity.len()
    }
}

/// Read the gold-cluster file. A missing file yields `Ok(None)`; whether
/// that is acceptable is the caller's decision.
pub fn read_gold_clust(
    path: &Path,
    duplicates: DuplicateClusterPolicy,
) -> Result<Option<GoldClusters>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(DatasetError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse_gold_clusters(BufReader::new(file), path, duplicates).map(Some)
}

pub fn parse_gold_clusters<R: BufRead>(
    reader: R,
    path: &Path,
    duplicates: DuplicateClusterPolicy,
) -> Result<GoldClusters> {
    let mut clusters: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let line_no = idx as u64 + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        let Some(cluster) = fields.next() else {
            continue;
        };
        let members: BTreeSet<String> = fields
            .skip(1)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();

        if duplicates == DuplicateClusterPolicy::Reject && clusters.contains_key(cluster) {
            return Err(DatasetError::DuplicateCluster {
                path: path.to_path_buf(),
                line: line_no,
                cluster: cluster.to_string(),
            });
        }
        clusters.insert(cluster.to_string(), members);
    }

    Ok(GoldClusters::from_clusters(clusters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str, policy: DuplicateClusterPolicy) -> Result<GoldClusters> {
        parse_gold_clusters(Cursor::new(text), Path::new("gold_npclust.txt"), policy)
    }

    #[test]
    fn single_cluster_inverts_to_each_member() {
        let gold = parse("C1\tX\tEntA\tEntB\n", DuplicateClusterPolicy::Overwrite).unwrap();
        assert_eq!(gold.clusters_of("EntA"), Some(&BTreeSet::from(["C1".to_string()])));
        assert_eq!(gold.clusters_of("EntB"), Some(&BTreeSet::from(["C1".to_string()])));
        assert_eq!(gold.clusters_of("X"), None);
        assert_eq!(gold.len(), 1);
        assert_eq!(gold.entity_count(), 2);
    }

    #[test]
    fn blank_lines_and_padding_are_ignored() {
        let text = "\n  C1\tX\tEntA  \n\nC2\tY\tEntB\tEntA\n";
        let gold = parse(text, DuplicateClusterPolicy::Overwrite).unwrap();
        assert_eq!(gold.len(), 2);
        assert_eq!(
            gold.clusters_of("EntA"),
            Some(&BTreeSet::from(["C1".to_string(), "C2".to_string()]))
        );
    }

    #[test]
    fn duplicate_cluster_overwrite_keeps_last() {
        let text = "C1\tX\tEntA\nC1\tX\tEntB\n";
        let gold = parse(text, DuplicateClusterPolicy::Overwrite).unwrap();
        assert_eq!(gold.members("C1"), Some(&BTreeSet::from(["EntB".to_string()])));
        assert_eq!(gold.clusters_of("EntA"), None);
    }

    #[test]
    fn duplicate_cluster_reject_reports_line() {
        let text = "C1\tX\tEntA\nC2\tX\tEntC\nC1\tX\tEntB\n";
        match parse(text, DuplicateClusterPolicy::Reject).unwrap_err() {
            DatasetError::DuplicateCluster { line, cluster, .. } => {
                assert_eq!(line, 3);
                assert_eq!(cluster, "C1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        let got = read_gold_clust(&path, DuplicateClusterPolicy::Overwrite).unwrap();
        assert!(got.is_none());
    }
}
