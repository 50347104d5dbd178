//! Tab-separated table readers and the symbol ID tables built from them.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use ahash::AHashMap;

use crate::error::{DatasetError, Result, SymbolKind};
use crate::observer::LoadObserver;

/// One fixed-arity record together with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<const N: usize> {
    pub line: u64,
    pub fields: [String; N],
}

fn open_reader(path: &Path, has_headers: bool) -> Result<csv::Reader<File>> {
    let file = File::open(path)
        .map_err(|source| DatasetError::from_open(path.to_path_buf(), source))?;
    // Surface forms are free text; quotes carry no meaning here.
    Ok(csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .quoting(false)
        .from_reader(file))
}

fn csv_error(path: &Path, source: csv::Error) -> DatasetError {
    DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn to_row<const N: usize>(path: &Path, record: &csv::StringRecord) -> Result<Row<N>> {
    let line = record.position().map_or(0, |p| p.line());
    if record.len() != N {
        return Err(DatasetError::Malformed {
            path: path.to_path_buf(),
            line,
            message: format!("expected {} columns, found {}", N, record.len()),
        });
    }
    Ok(Row {
        line,
        fields: std::array::from_fn(|i| record[i].to_string()),
    })
}

/// Read a headered TSV whose rows all have exactly `N` columns.
pub fn read_table<const N: usize>(
    path: &Path,
    observer: &dyn LoadObserver,
) -> Result<Vec<Row<N>>> {
    let mut reader = open_reader(path, true)?;

    let header_len = reader.headers().map_err(|e| csv_error(path, e))?.len();
    if header_len != N {
        return Err(DatasetError::Malformed {
            path: path.to_path_buf(),
            line: 1,
            message: format!("expected a header row with {N} columns, found {header_len}"),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        rows.push(to_row::<N>(path, &record)?);
    }

    observer.table_loaded(path, rows.len());
    Ok(rows)
}

/// Read `rel_triples`-style tables: the first row is skipped unread and
/// the remaining rows are returned in file order.
pub fn read_rel_triples(path: &Path, observer: &dyn LoadObserver) -> Result<Vec<Row<3>>> {
    let mut reader = open_reader(path, false)?;

    let mut rows = Vec::new();
    for record in reader.records().skip(1) {
        let record = record.map_err(|e| csv_error(path, e))?;
        rows.push(to_row::<3>(path, &record)?);
    }

    observer.table_loaded(path, rows.len());
    Ok(rows)
}

// ============================================================================
// ID tables
// ============================================================================

/// Bidirectional surface form <-> dense id mapping.
#[derive(Debug, Clone)]
pub struct IdTable {
    kind: SymbolKind,
    by_name: AHashMap<String, u32>,
    by_id: BTreeMap<u32, String>,
}

impl IdTable {
    pub fn new(kind: SymbolKind) -> Self {
        Self {
            kind,
            by_name: AHashMap::new(),
            by_id: BTreeMap::new(),
        }
    }

    /// Build from `(name, id)` rows. Names and ids must both be unique.
    pub fn from_rows(path: &Path, kind: SymbolKind, rows: Vec<Row<2>>) -> Result<Self> {
        let mut table = Self::new(kind);
        table.by_name.reserve(rows.len());

        for Row { line, fields } in rows {
            let [name, raw_id] = fields;
            let id: u32 = match raw_id.trim().parse() {
                Ok(id) => id,
                Err(_) => {
                    return Err(DatasetError::Malformed {
                        path: path.to_path_buf(),
                        line,
                        message: format!("{kind} id `{raw_id}` is not a non-negative integer"),
                    })
                }
            };

            if table.by_name.contains_key(&name) {
                return Err(DatasetError::DuplicateId {
                    path: path.to_path_buf(),
                    line,
                    kind,
                    field: "name",
                    value: name,
                });
            }
            if table.by_id.contains_key(&id) {
                return Err(DatasetError::DuplicateId {
                    path: path.to_path_buf(),
                    line,
                    kind,
                    field: "id",
                    value: id.to_string(),
                });
            }

            table.by_name.insert(name.clone(), id);
            table.by_id.insert(id, name);
        }

        Ok(table)
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    pub fn contains_id(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// `(id, name)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.by_id.iter().map(|(id, name)| (*id, name.as_str()))
    }

    /// Resolve a name read from `path:line`, failing on unknown symbols.
    pub(crate) fn resolve(&self, path: &Path, line: u64, name: &str) -> Result<u32> {
        self.id_of(name).ok_or_else(|| DatasetError::UnknownSymbol {
            path: path.to_path_buf(),
            line,
            kind: self.kind,
            name: name.to_string(),
        })
    }
}
