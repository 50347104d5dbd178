use std::path::Path;
use std::sync::Arc;

use crate::config::{DatasetConfig, GoldPolicy};
use crate::error::{DatasetError, Result, SymbolKind};
use crate::gold::read_gold_clust;
use crate::observer::{LoadObserver, TracingObserver};
use crate::records::{dedup_triples, filter_side_info, TypedTripleIndex};
use crate::tables::{read_rel_triples, read_table, IdTable};
use crate::CanonicalizationDataset;

/// Builds a [`CanonicalizationDataset`] from a directory of tables.
pub struct DatasetLoader {
    config: DatasetConfig,
    observer: Arc<dyn LoadObserver>,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(DatasetConfig::default())
    }
}

impl DatasetLoader {
    pub fn new(config: DatasetConfig) -> Self {
        Self {
            config,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: impl LoadObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Load every table under `dir`. Fails without building anything if the
    /// directory or a required file is missing, or if a table is malformed.
    pub fn load(&self, dir: impl AsRef<Path>) -> Result<CanonicalizationDataset> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(DatasetError::DirectoryNotFound(dir.to_path_buf()));
        }
        let files = &self.config.files;
        let observer = self.observer.as_ref();

        let path = dir.join(&files.entities);
        let rows = read_table::<2>(&path, observer)?;
        let entities = IdTable::from_rows(&path, SymbolKind::Entity, rows)?;

        let path = dir.join(&files.relations);
        let rows = read_table::<2>(&path, observer)?;
        let relations = IdTable::from_rows(&path, SymbolKind::Relation, rows)?;

        let path = dir.join(&files.triples);
        let rows = read_table::<3>(&path, observer)?;
        let primary = dedup_triples(&path, rows, &entities, &relations)?;

        let path = dir.join(&files.typed_triples);
        let typed = TypedTripleIndex::build(read_rel_triples(&path, observer)?, &relations);
        observer.rows_dropped(&path, typed.dropped());

        let path = dir.join(&files.entity_side_info);
        let (entity_side_info, entity_side_info_dropped) =
            filter_side_info(&path, read_table::<3>(&path, observer)?, &entities)?;
        observer.rows_dropped(&path, entity_side_info_dropped);

        let path = dir.join(&files.relation_side_info);
        let (relation_side_info, relation_side_info_dropped) =
            filter_side_info(&path, read_table::<3>(&path, observer)?, &relations)?;
        observer.rows_dropped(&path, relation_side_info_dropped);

        // Indexed access wraps with `item mod len`; an empty list has no
        // valid position.
        let triples = primary.triples.len();
        if triples > 0 {
            if entity_side_info.is_empty() {
                return Err(DatasetError::EmptySideInfo {
                    kind: SymbolKind::Entity,
                    triples,
                });
            }
            if relation_side_info.is_empty() {
                return Err(DatasetError::EmptySideInfo {
                    kind: SymbolKind::Relation,
                    triples,
                });
            }
        }

        let path = dir.join(&files.gold_clusters);
        let gold = match read_gold_clust(&path, self.config.duplicate_clusters)? {
            Some(gold) => {
                observer.table_loaded(&path, gold.len());
                Some(gold)
            }
            None if self.config.gold_policy == GoldPolicy::Required => {
                return Err(DatasetError::FileNotFound { path });
            }
            None => {
                observer.gold_missing(&path);
                None
            }
        };

        Ok(CanonicalizationDataset {
            dir: dir.to_path_buf(),
            entities,
            relations,
            raw_triples: primary.raw_count,
            triples: primary.triples,
            encoded: primary.encoded,
            typed,
            entity_side_info,
            entity_side_info_dropped,
            relation_side_info,
            relation_side_info_dropped,
            gold,
        })
    }
}
