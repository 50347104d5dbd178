use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn kgcanon_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_kgcanon"))
}

fn write_dataset(dir: &Path) {
    let tables = [
        ("ent2id.txt", "entity\tid\nparis\t0\nparis france\t1\nfrance\t2\n"),
        ("rel2id.txt", "relation\tid\ncapital of\t0\nis capital of\t1\n"),
        (
            "triples.txt",
            "head\trelation\ttail\nparis\tcapital of\tfrance\nparis france\tis capital of\tfrance\nparis\tcapital of\tfrance\n",
        ),
        ("rel_triples.txt", "header\nCITY\tcapital of\tCOUNTRY\n"),
        ("ent_side_info.txt", "e1\te2\tscore\nparis\tparis france\t0.8\n"),
        ("rel_side_info.txt", "r1\tr2\tscore\ncapital of\tis capital of\t0.7\n"),
        ("gold_npclust.txt", "C7\tparis\tparis\tparis france\n"),
    ];
    for (name, body) in tables {
        std::fs::write(dir.join(name), body).unwrap();
    }
}

fn run(args: &[&str]) -> Output {
    Command::new(kgcanon_bin())
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("run kgcanon")
}

#[test]
fn summary_json_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());

    let out = run(&["summary", dir.path().to_str().unwrap(), "--json"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["triples"], 2);
    assert_eq!(summary["raw_triples"], 3);
    assert_eq!(summary["entities"], 3);
    assert_eq!(summary["gold_clusters"], 1);
}

#[test]
fn item_prints_ids_and_side_info() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());

    let out = run(&["item", dir.path().to_str().unwrap(), "1"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let item: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(item["triple"], serde_json::json!([1, 1, 2]));
    assert_eq!(item["entity_side_info"]["first"], 0);
    assert_eq!(item["relation_side_info"]["score"], 0.7);
}

#[test]
fn gold_lists_clusters_of_entity() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());

    let out = run(&["gold", dir.path().to_str().unwrap(), "paris france"]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "C7");
}

#[test]
fn missing_gold_with_require_flag_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    std::fs::remove_file(dir.path().join("gold_npclust.txt")).unwrap();

    let ok = run(&["summary", dir.path().to_str().unwrap()]);
    assert!(ok.status.success());

    let strict = run(&["--require-gold", "summary", dir.path().to_str().unwrap()]);
    assert!(!strict.status.success());
    assert!(String::from_utf8_lossy(&strict.stderr).contains("gold_npclust.txt"));
}

#[test]
fn missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    let out = run(&["summary", missing.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("dataset directory not found"));
}

#[test]
fn batches_report_shapes() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());

    let path = dir.path().to_str().unwrap();
    let out = run(&["batches", path, "--size", "1", "--limit", "1"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("batch start=0 len=1"));
    assert!(!stdout.contains("batch start=1"));
    assert!(stdout.contains("2 batches of up to 1 items"));
}
