//! Registry behavior against an isolated storage root.

mod common;

use std::fs;
use std::sync::Arc;

use arxiv_research_mcp::error::RegistryError;
use arxiv_research_mcp::models::Topic;
use arxiv_research_mcp::registry::Registry;

use common::paper;

fn topic(name: &str) -> Topic {
    Topic::parse(name).unwrap()
}

// =============================================================================
// Upsert
// =============================================================================

#[test]
fn test_upsert_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::open(dir.path()).unwrap();
    let batch = [paper("1", "One"), paper("2", "Two")];

    registry.upsert(&topic("t"), &batch).unwrap();
    registry.upsert(&topic("t"), &batch).unwrap();

    let catalog = registry.catalog(&topic("t")).unwrap().unwrap();
    assert_eq!(catalog.paper_ids().collect::<Vec<_>>(), ["1", "2"]);
}

#[test]
fn test_upsert_overwrites_without_merging() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::open(dir.path()).unwrap();

    registry.upsert(&topic("t"), &[paper("1", "Draft")]).unwrap();
    let mut revised = paper("1", "Final");
    revised.authors = vec!["Someone Else".into()];
    registry.upsert(&topic("t"), &[revised.clone()]).unwrap();

    assert_eq!(registry.lookup("1").unwrap(), Some(revised));
    assert_eq!(registry.count(Some(&topic("t"))).unwrap().get("t"), Some(1));
}

#[test]
fn test_round_trip_is_field_for_field() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::open(dir.path()).unwrap();
    let mut record = paper("2301.12345v2", "Unicode ∑ and \"quotes\"");
    record.summary = "Line one.\nLine two with é.".into();
    record.authors = Vec::new();

    registry.upsert(&topic("round trip"), &[record.clone()]).unwrap();

    assert_eq!(registry.lookup("2301.12345v2").unwrap(), Some(record.clone()));

    // And again from a fresh handle over the same files.
    let reopened = Registry::open(dir.path()).unwrap();
    assert_eq!(reopened.lookup("2301.12345v2").unwrap(), Some(record));
}

#[test]
fn test_lookup_prefers_latest_upsert_across_topics() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::open(dir.path()).unwrap();

    registry.upsert(&topic("a"), &[paper("p", "From A")]).unwrap();
    registry.upsert(&topic("b"), &[paper("p", "From B")]).unwrap();
    assert_eq!(registry.lookup("p").unwrap().unwrap().title, "From B");

    registry.upsert(&topic("a"), &[paper("p", "From A again")]).unwrap();
    assert_eq!(registry.lookup("p").unwrap().unwrap().title, "From A again");
}

#[test]
fn test_lookup_unknown_or_blank_ids() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::open(dir.path()).unwrap();
    registry.upsert(&topic("a"), &[paper("1", "One")]).unwrap();

    assert_eq!(registry.lookup("9999.99999").unwrap(), None);
    assert_eq!(registry.lookup("").unwrap(), None);
    assert_eq!(registry.lookup("   ").unwrap(), None);
    assert_eq!(registry.lookup("../a/papers_info.json").unwrap(), None);
    assert_eq!(registry.lookup(" 1 ").unwrap(), None);
    assert_eq!(registry.lookup("1").unwrap().unwrap().title, "One");
}

// =============================================================================
// Topics and counts
// =============================================================================

#[test]
fn test_counts_and_topics_in_creation_order() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::open(dir.path()).unwrap();

    registry.upsert(&topic("a"), &[paper("1", "x"), paper("2", "y"), paper("3", "z")]).unwrap();
    registry.upsert(&topic("b"), &[]).unwrap();

    let counts = registry.count(None).unwrap();
    assert_eq!(serde_json::to_value(&counts).unwrap(), serde_json::json!({"a": 3, "b": 0}));
    assert_eq!(counts.iter().map(|(t, _)| t).collect::<Vec<_>>(), ["a", "b"]);
    assert_eq!(registry.list_topics(), ["a", "b"]);
}

#[test]
fn test_zero_result_search_creates_topic() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::open(dir.path()).unwrap();
    assert!(registry.list_topics().is_empty());

    registry.upsert(&topic("c"), &[]).unwrap();

    assert_eq!(registry.list_topics(), ["c"]);
    assert!(dir.path().join("c").join("papers_info.json").is_file());
}

#[test]
fn test_count_unknown_topic_is_zero() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::open(dir.path()).unwrap();

    let counts = registry.count(Some(&topic("Never Searched"))).unwrap();
    assert_eq!(counts.get("never searched"), Some(0));
    assert!(registry.list_topics().is_empty());
}

#[test]
fn test_topic_names_are_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::open(dir.path()).unwrap();

    registry.upsert(&topic("  Quantum   Computing "), &[paper("1", "x")]).unwrap();
    registry.upsert(&topic("quantum computing"), &[paper("2", "y")]).unwrap();

    assert_eq!(registry.list_topics(), ["quantum computing"]);
    assert!(dir.path().join("quantum_computing").is_dir());
    assert_eq!(registry.count(None).unwrap().total(), 2);
}

// =============================================================================
// Persistence and failure isolation
// =============================================================================

#[test]
fn test_reopen_restores_topics_and_index() {
    let dir = tempfile::tempdir().unwrap();
    {
        let registry = Registry::open(dir.path()).unwrap();
        registry.upsert(&topic("first"), &[paper("1", "One")]).unwrap();
        registry.upsert(&topic("second"), &[paper("2", "Two")]).unwrap();
    }

    let registry = Registry::open(dir.path()).unwrap();
    let mut topics = registry.list_topics();
    topics.sort();
    assert_eq!(topics, ["first", "second"]);
    assert_eq!(registry.lookup("2").unwrap().unwrap().title, "Two");
}

#[test]
fn test_corrupt_catalog_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::open(dir.path()).unwrap();
    registry.upsert(&topic("good"), &[paper("1", "One")]).unwrap();
    registry.upsert(&topic("bad"), &[paper("2", "Two")]).unwrap();

    let bad_file = dir.path().join("bad").join("papers_info.json");
    fs::write(&bad_file, "{ not json").unwrap();

    // Other topics keep working.
    assert_eq!(registry.lookup("1").unwrap().unwrap().title, "One");
    assert_eq!(registry.lookup("2").unwrap(), None);

    let all = registry.count(None).unwrap();
    assert_eq!(all.get("good"), Some(1));
    assert_eq!(all.get("bad"), None);

    let err = registry.count(Some(&topic("bad"))).unwrap_err();
    assert!(matches!(err, RegistryError::CorruptCatalog { ref topic, .. } if topic == "bad"));

    // The corrupt file is never overwritten.
    let err = registry.upsert(&topic("bad"), &[paper("3", "Three")]).unwrap_err();
    assert_eq!(err.topic(), Some("bad"));
    assert_eq!(fs::read_to_string(&bad_file).unwrap(), "{ not json");

    // Still listed: the catalog exists.
    assert_eq!(registry.list_topics(), ["good", "bad"]);
}

#[test]
fn test_open_tolerates_corrupt_catalog() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("broken")).unwrap();
    fs::write(dir.path().join("broken").join("papers_info.json"), "[]").unwrap();

    let registry = Registry::open(dir.path()).unwrap();
    assert_eq!(registry.list_topics(), ["broken"]);
    assert!(registry.count(None).unwrap().is_empty());
}

#[test]
fn test_storage_fault_is_isolated_to_its_topic() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::open(dir.path()).unwrap();
    registry.upsert(&topic("ok"), &[]).unwrap();

    // A plain file where the topic directory belongs.
    fs::write(dir.path().join("blocked"), b"not a directory").unwrap();

    let err = registry.upsert(&topic("blocked"), &[paper("1", "One")]).unwrap_err();
    assert!(matches!(err, RegistryError::Storage { .. }), "{err:?}");
    assert_eq!(err.topic(), None);

    assert_eq!(registry.list_topics(), ["ok"]);
    let counts = registry.count(None).unwrap();
    assert_eq!(counts.iter().collect::<Vec<_>>(), [("ok", 0)]);
    assert_eq!(registry.lookup("1").unwrap(), None);

    registry.upsert(&topic("ok"), &[paper("2", "Two")]).unwrap();
    assert_eq!(registry.count(Some(&topic("ok"))).unwrap().get("ok"), Some(1));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_upserts_keep_all_ids() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(Registry::open(dir.path()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for i in 0..5 {
                    let id = format!("w{worker}-{i}");
                    registry.upsert(&Topic::parse("shared").unwrap(), &[paper(&id, &id)]).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let catalog = registry.catalog(&topic("shared")).unwrap().unwrap();
    assert_eq!(catalog.len(), 40);
    assert_eq!(registry.list_topics(), ["shared"]);

    // No temporary files left behind.
    let leftovers: Vec<_> = fs::read_dir(dir.path().join("shared")).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}
