use std::collections::{BTreeMap, BTreeSet};

/// Invert a key -> values mapping into value -> {keys containing it}.
///
/// Keys whose collection is empty do not appear in the result.
pub fn invert_map<'a, K, C, V>(map: &'a BTreeMap<K, C>) -> BTreeMap<V, BTreeSet<K>>
where
    K: Ord + Clone + 'a,
    C: 'a,
    &'a C: IntoIterator<Item = &'a V>,
    V: Ord + Clone + 'a,
{
    let mut inverted: BTreeMap<V, BTreeSet<K>> = BTreeMap::new();
    for (key, values) in map {
        for value in values {
            inverted.entry(value.clone()).or_default().insert(key.clone());
        }
    }
    inverted
}
