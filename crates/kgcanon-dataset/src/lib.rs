//! Canonicalization dataset loader
//!
//! Loads the flat-file tables of an entity/relation canonicalization task and
//! exposes the deduplicated triples as a fixed-length, randomly indexable
//! view for an external training loop:
//!
//! ```text
//! ent2id.txt ─┐
//! rel2id.txt ─┼─► IdTable (entity / relation)
//!             │
//! triples.txt ──────► dedup ─► [head_id, rel_id, tail_id] ─┐
//! rel_triples.txt ──► TypedTripleIndex                     │
//! ent_side_info.txt ► SideInfo (filtered) ──── item mod M ─┼─► Item
//! rel_side_info.txt ► SideInfo (filtered) ──── item mod M ─┘
//! gold_npclust.txt ─► GoldClusters (entity -> clusters)
//! ```
//!
//! All tables are built once by [`DatasetLoader::load`] and are read-only
//! afterwards, so a dataset can be shared across threads behind an `Arc`.

pub mod batch;
pub mod config;
pub mod error;
pub mod gold;
pub mod index;
pub mod invert;
mod loader;
pub mod observer;
pub mod records;
pub mod tables;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use batch::{Batch, Batches};
pub use config::{DatasetConfig, DuplicateClusterPolicy, GoldPolicy, TableFiles};
pub use error::{DatasetError, Result, SymbolKind};
pub use gold::GoldClusters;
pub use index::ItemIndex;
pub use invert::invert_map;
pub use loader::DatasetLoader;
pub use observer::{LoadObserver, NoopObserver, TracingObserver};
pub use records::{SideInfo, Triple, TypedTriple, TypedTripleIndex};
pub use tables::IdTable;

/// One training example.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// `[head_id, relation_id, tail_id]`
    pub triple: [u32; 3],
    pub entity_side_info: SideInfo,
    pub relation_side_info: SideInfo,
}

/// Table sizes, for logs and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub directory: PathBuf,
    pub entities: usize,
    pub relations: usize,
    pub raw_triples: usize,
    pub triples: usize,
    pub typed_triples: usize,
    pub typed_triples_dropped: usize,
    pub entity_side_info: usize,
    pub entity_side_info_dropped: usize,
    pub relation_side_info: usize,
    pub relation_side_info_dropped: usize,
    pub gold_clusters: Option<usize>,
    pub gold_entities: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct CanonicalizationDataset {
    pub(crate) dir: PathBuf,
    pub(crate) entities: IdTable,
    pub(crate) relations: IdTable,
    pub(crate) raw_triples: usize,
    pub(crate) triples: Vec<Triple>,
    pub(crate) encoded: Vec<[u32; 3]>,
    pub(crate) typed: TypedTripleIndex,
    pub(crate) entity_side_info: Vec<SideInfo>,
    pub(crate) entity_side_info_dropped: usize,
    pub(crate) relation_side_info: Vec<SideInfo>,
    pub(crate) relation_side_info_dropped: usize,
    pub(crate) gold: Option<GoldClusters>,
}

impl CanonicalizationDataset {
    /// Load `dir` with the default layout, reporting through `tracing`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        DatasetLoader::default().load(dir)
    }

    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// Number of distinct primary triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// The `item`-th triple as ids, paired positionally with side
    /// information. Side-information lists shorter than the dataset wrap
    /// around (`item mod len`).
    pub fn get<I: ItemIndex>(&self, item: I) -> Result<Item> {
        let index = item.to_item_index()?;
        if index >= self.len() {
            return Err(DatasetError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(self.item_at(index))
    }

    /// Caller guarantees `index < len()`; the loader guarantees both
    /// side-information lists are non-empty whenever `len() > 0`.
    pub(crate) fn item_at(&self, index: usize) -> Item {
        Item {
            triple: self.encoded[index],
            entity_side_info: self.entity_side_info[index % self.entity_side_info.len()],
            relation_side_info: self.relation_side_info[index % self.relation_side_info.len()],
        }
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Item> + '_ {
        (0..self.len()).map(move |i| self.item_at(i))
    }

    pub fn batches(&self, batch_size: usize) -> Result<Batches<'_>> {
        if batch_size == 0 {
            return Err(DatasetError::InvalidBatchSize);
        }
        Ok(Batches::new(self, batch_size))
    }

    // ------------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------------

    pub fn entities(&self) -> &IdTable {
        &self.entities
    }

    pub fn relations(&self) -> &IdTable {
        &self.relations
    }

    /// Distinct triples in first-occurrence order.
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    pub fn typed_triples(&self) -> &TypedTripleIndex {
        &self.typed
    }

    pub fn relation_of_typed_triple(&self, triple: &TypedTriple) -> Option<u32> {
        self.typed.relation_of(triple)
    }

    pub fn typed_triple_of_relation(&self, relation_id: u32) -> Option<&TypedTriple> {
        self.typed.triple_of(relation_id)
    }

    pub fn entity_side_info(&self) -> &[SideInfo] {
        &self.entity_side_info
    }

    pub fn relation_side_info(&self) -> &[SideInfo] {
        &self.relation_side_info
    }

    /// `None` when the gold file was absent and gold data is optional.
    pub fn gold_clusters(&self) -> Option<&GoldClusters> {
        self.gold.as_ref()
    }

    pub fn gold_clusters_of(&self, entity: &str) -> Option<&BTreeSet<String>> {
        self.gold.as_ref()?.clusters_of(entity)
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            directory: self.dir.clone(),
            entities: self.entities.len(),
            relations: self.relations.len(),
            raw_triples: self.raw_triples,
            triples: self.triples.len(),
            typed_triples: self.typed.triples().len(),
            typed_triples_dropped: self.typed.dropped(),
            entity_side_info: self.entity_side_info.len(),
            entity_side_info_dropped: self.entity_side_info_dropped,
            relation_side_info: self.relation_side_info.len(),
            relation_side_info_dropped: self.relation_side_info_dropped,
            gold_clusters: self.gold.as_ref().map(GoldClusters::len),
            gold_entities: self.gold.as_ref().map(GoldClusters::entity_count),
        }
    }
}

impl<'a> IntoIterator for &'a CanonicalizationDataset {
    type Item = Item;
    type IntoIter = Box<dyn ExactSizeIterator<Item = Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
