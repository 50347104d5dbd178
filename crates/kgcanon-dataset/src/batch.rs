use serde::Serialize;

use crate::records::SideInfo;
use crate::CanonicalizationDataset;

/// Consecutive items collated column-wise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Batch {
    /// Index of the first item in the batch.
    pub start: usize,
    pub triples: Vec<[u32; 3]>,
    pub entity_side_info: Vec<SideInfo>,
    pub relation_side_info: Vec<SideInfo>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

/// Sequential, non-shuffled batches over a dataset.
pub struct Batches<'a> {
    dataset: &'a CanonicalizationDataset,
    next: usize,
    size: usize,
}

impl<'a> Batches<'a> {
    pub(crate) fn new(dataset: &'a CanonicalizationDataset, size: usize) -> Self {
        Self {
            dataset,
            next: 0,
            size,
        }
    }
}

impl Iterator for Batches<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        let len = self.dataset.len();
        if self.next >= len {
            return None;
        }
        let start = self.next;
        let end = (start + self.size).min(len);
        self.next = end;

        let mut batch = Batch {
            start,
            triples: Vec::with_capacity(end - start),
            entity_side_info: Vec::with_capacity(end - start),
            relation_side_info: Vec::with_capacity(end - start),
        };
        for i in start..end {
            let item = self.dataset.item_at(i);
            batch.triples.push(item.triple);
            batch.entity_side_info.push(item.entity_side_info);
            batch.relation_side_info.push(item.relation_side_info);
        }
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.dataset.len();
        let remaining = (len - self.next.min(len)).div_ceil(self.size);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Batches<'_> {}
