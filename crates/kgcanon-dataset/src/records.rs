//! Typed records for the triple and side-information tables.

use std::collections::BTreeMap;
use std::path::Path;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Result};
use crate::tables::{IdTable, Row};

/// A `(head, relation, tail)` fact by surface form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub head: String,
    pub relation: String,
    pub tail: String,
}

impl From<[String; 3]> for Triple {
    fn from([head, relation, tail]: [String; 3]) -> Self {
        Self {
            head,
            relation,
            tail,
        }
    }
}

/// A `(subject category, relation, object category)` signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypedTriple {
    pub subject_category: String,
    pub relation: String,
    pub object_category: String,
}

impl From<[String; 3]> for TypedTriple {
    fn from([subject_category, relation, object_category]: [String; 3]) -> Self {
        Self {
            subject_category,
            relation,
            object_category,
        }
    }
}

/// Pairwise score between two entities or two relations, by id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideInfo {
    pub first: u32,
    pub second: u32,
    pub score: f64,
}

// ============================================================================
// Primary triples
// ============================================================================

#[derive(Debug)]
pub(crate) struct PrimaryTriples {
    pub triples: Vec<Triple>,
    pub encoded: Vec<[u32; 3]>,
    pub raw_count: usize,
}

/// Deduplicate triples (first occurrence wins) and resolve them to ids.
pub(crate) fn dedup_triples(
    path: &Path,
    rows: Vec<Row<3>>,
    entities: &IdTable,
    relations: &IdTable,
) -> Result<PrimaryTriples> {
    let raw_count = rows.len();
    let mut seen: AHashSet<Triple> = AHashSet::with_capacity(raw_count);
    let mut triples = Vec::with_capacity(raw_count);
    let mut encoded = Vec::with_capacity(raw_count);

    for Row { line, fields } in rows {
        let triple = Triple::from(fields);
        if seen.contains(&triple) {
            continue;
        }

        encoded.push([
            entities.resolve(path, line, &triple.head)?,
            relations.resolve(path, line, &triple.relation)?,
            entities.resolve(path, line, &triple.tail)?,
        ]);
        seen.insert(triple.clone());
        triples.push(triple);
    }

    Ok(PrimaryTriples {
        triples,
        encoded,
        raw_count,
    })
}

// ============================================================================
// Side information
// ============================================================================

/// Resolve side-information rows against `table`, skipping rows that name
/// unknown symbols. Returns the kept records and the number skipped.
pub(crate) fn filter_side_info(
    path: &Path,
    rows: Vec<Row<3>>,
    table: &IdTable,
) -> Result<(Vec<SideInfo>, usize)> {
    let mut kept = Vec::with_capacity(rows.len());
    let mut dropped = 0;

    for Row { line, fields } in rows {
        let [first, second, raw_score] = fields;
        let score: f64 = match raw_score.trim().parse() {
            Ok(score) => score,
            Err(_) => {
                return Err(DatasetError::Malformed {
                    path: path.to_path_buf(),
                    line,
                    message: format!("score `{raw_score}` is not a number"),
                })
            }
        };

        match (table.id_of(&first), table.id_of(&second)) {
            (Some(first), Some(second)) => kept.push(SideInfo {
                first,
                second,
                score,
            }),
            _ => dropped += 1,
        }
    }

    Ok((kept, dropped))
}

// ============================================================================
// Typed triples
// ============================================================================

/// Typed triples and their relation-id lookups.
///
/// `relation_to_triple` keeps one representative per relation: later rows
/// overwrite earlier ones. `representative_to_relation` is its inverse.
#[derive(Debug, Clone, Default)]
pub struct TypedTripleIndex {
    triples: Vec<TypedTriple>,
    triple_to_relation: AHashMap<TypedTriple, u32>,
    relation_to_triple: BTreeMap<u32, TypedTriple>,
    representative_to_relation: AHashMap<TypedTriple, u32>,
    dropped: usize,
}

impl TypedTripleIndex {
    pub(crate) fn build(rows: Vec<Row<3>>, relations: &IdTable) -> Self {
        let mut index = Self::default();

        for Row { fields, .. } in rows {
            let triple = TypedTriple::from(fields);
            let Some(relation_id) = relations.id_of(&triple.relation) else {
                index.dropped += 1;
                continue;
            };
            index.triple_to_relation.insert(triple.clone(), relation_id);
            index.relation_to_triple.insert(relation_id, triple.clone());
            index.triples.push(triple);
        }

        index.representative_to_relation = index
            .relation_to_triple
            .iter()
            .map(|(id, triple)| (triple.clone(), *id))
            .collect();
        index
    }

    /// Kept typed triples in file order.
    pub fn triples(&self) -> &[TypedTriple] {
        &self.triples
    }

    pub fn relation_of(&self, triple: &TypedTriple) -> Option<u32> {
        self.triple_to_relation.get(triple).copied()
    }

    pub fn triple_of(&self, relation_id: u32) -> Option<&TypedTriple> {
        self.relation_to_triple.get(&relation_id)
    }

    /// Relation id of `triple` if it is the representative for its relation.
    pub fn representative_relation(&self, triple: &TypedTriple) -> Option<u32> {
        self.representative_to_relation.get(triple).copied()
    }

    /// `(relation id, representative)` pairs in ascending id order.
    pub fn representatives(&self) -> impl Iterator<Item = (u32, &TypedTriple)> + '_ {
        self.relation_to_triple.iter().map(|(id, t)| (*id, t))
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
