use std::fmt::Write as _;
use std::path::Path;

use kgcanon_dataset::{CanonicalizationDataset, DatasetLoader, NoopObserver};
use proptest::prelude::*;

const MAX_ENTITIES: usize = 12;
const MAX_TRIPLES: usize = 40;

/// Write a synthetic dataset: `n_ent` entities `e0..`, one relation per
/// entity `r0..`, the given triples (by index, duplicates allowed) and
/// `side_len` side-information rows for each of entities and relations.
fn write_dataset(dir: &Path, n_ent: usize, triples: &[(usize, usize, usize)], side_len: usize) {
    let mut ent = String::from("entity\tid\n");
    let mut rel = String::from("relation\tid\n");
    for i in 0..n_ent {
        writeln!(ent, "e{i}\t{i}").unwrap();
        writeln!(rel, "r{i}\t{i}").unwrap();
    }

    let mut tri = String::from("head\trelation\ttail\n");
    for (h, r, t) in triples {
        writeln!(tri, "e{h}\tr{r}\te{t}").unwrap();
    }

    let mut ent_side = String::from("e1\te2\tscore\n");
    let mut rel_side = String::from("r1\tr2\tscore\n");
    for k in 0..side_len {
        let a = k % n_ent;
        let b = (k + 1) % n_ent;
        writeln!(ent_side, "e{a}\te{b}\t{k}.5").unwrap();
        writeln!(rel_side, "r{a}\tr{b}\t{k}.25").unwrap();
    }

    std::fs::write(dir.join("ent2id.txt"), ent).unwrap();
    std::fs::write(dir.join("rel2id.txt"), rel).unwrap();
    std::fs::write(dir.join("triples.txt"), tri).unwrap();
    std::fs::write(dir.join("rel_triples.txt"), "skip\nA\tr0\tB\n").unwrap();
    std::fs::write(dir.join("ent_side_info.txt"), ent_side).unwrap();
    std::fs::write(dir.join("rel_side_info.txt"), rel_side).unwrap();
}

fn dataset_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, usize)>, usize)> {
    (2usize..=MAX_ENTITIES).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n, 0..n), 1..=MAX_TRIPLES),
            1usize..=MAX_TRIPLES,
        )
    })
}

fn load(dir: &Path) -> CanonicalizationDataset {
    DatasetLoader::default()
        .with_observer(NoopObserver)
        .load(dir)
        .expect("synthetic dataset loads")
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn length_is_distinct_triple_count((n, triples, side_len) in dataset_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), n, &triples, side_len);
        let ds = load(dir.path());

        let mut distinct = triples.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(ds.len(), distinct.len());
    }

    #[test]
    fn side_info_position_is_index_mod_len((n, triples, side_len) in dataset_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), n, &triples, side_len);
        let ds = load(dir.path());

        let m = ds.entity_side_info().len();
        prop_assert_eq!(m, side_len);
        for i in 0..ds.len() {
            let item = ds.get(i).unwrap();
            prop_assert_eq!(item.entity_side_info, ds.entity_side_info()[i % m]);
            prop_assert_eq!(item.relation_side_info, ds.relation_side_info()[i % m]);
            if i + m < ds.len() {
                prop_assert_eq!(item.entity_side_info, ds.get(i + m).unwrap().entity_side_info);
            }
        }
    }

    #[test]
    fn items_decode_back_to_triples((n, triples, side_len) in dataset_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), n, &triples, side_len);
        let ds = load(dir.path());

        for (item, triple) in ds.iter().zip(ds.triples()) {
            let [h, r, t] = item.triple;
            prop_assert_eq!(ds.entities().name_of(h), Some(triple.head.as_str()));
            prop_assert_eq!(ds.relations().name_of(r), Some(triple.relation.as_str()));
            prop_assert_eq!(ds.entities().name_of(t), Some(triple.tail.as_str()));
        }
    }
}
