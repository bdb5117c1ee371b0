use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use serde_json::json;
use tempfile::TempDir;

use cuttle::config::IndexSettings;
use cuttle::models::Document;
use cuttle::{CuttleError, SearchEngine};

fn open_engine(dir: &Path) -> SearchEngine {
    SearchEngine::open(IndexSettings::default(), dir.to_path_buf()).unwrap()
}

fn setup_engine() -> (TempDir, SearchEngine) {
    let tmp = TempDir::new().unwrap();
    let engine = open_engine(tmp.path());
    (tmp, engine)
}

fn doc(value: serde_json::Value) -> Document {
    Document::from_value(value).unwrap()
}

fn search_ids(engine: &SearchEngine, query: &str) -> HashSet<String> {
    engine
        .search(query)
        .unwrap()
        .iter()
        .map(|d| d.id().unwrap().to_string())
        .collect()
}

#[test]
fn add_then_search_matches_every_token() {
    let (_tmp, engine) = setup_engine();
    let id = engine
        .add_document(doc(json!({"text": "Quick brown foxes jump"})), "text")
        .unwrap();

    for query in ["quick", "brown", "foxes", "jump", "QUICK"] {
        assert!(
            search_ids(&engine, query).contains(&id),
            "query {:?} should match",
            query
        );
    }
}

#[test]
fn worked_example_scenario() {
    let (_tmp, engine) = setup_engine();
    let id = engine
        .add_document(doc(json!({"text": "Hello World"})), "text")
        .unwrap();

    assert_eq!(search_ids(&engine, "hello"), HashSet::from([id.clone()]));
    assert_eq!(search_ids(&engine, "world"), HashSet::from([id.clone()]));
    assert_eq!(
        search_ids(&engine, "hello world"),
        HashSet::from([id.clone()])
    );
    assert!(search_ids(&engine, "hello xyz").is_empty());

    engine.delete_document(&id).unwrap();
    assert!(search_ids(&engine, "hello").is_empty());
}

#[test]
fn multi_token_search_is_intersection_not_union() {
    let (_tmp, engine) = setup_engine();
    engine
        .add_document(doc(json!({"id": "a", "text": "rust systems"})), "text")
        .unwrap();
    engine
        .add_document(doc(json!({"id": "b", "text": "rust web"})), "text")
        .unwrap();

    assert_eq!(
        search_ids(&engine, "rust"),
        HashSet::from(["a".to_string(), "b".to_string()])
    );
    assert_eq!(
        search_ids(&engine, "rust systems"),
        HashSet::from(["a".to_string()])
    );
    assert!(search_ids(&engine, "systems web").is_empty());
}

#[test]
fn absent_tokens_return_empty_results() {
    let (_tmp, engine) = setup_engine();
    engine
        .add_document(doc(json!({"text": "something indexed"})), "text")
        .unwrap();

    assert!(search_ids(&engine, "nonexistent").is_empty());
    assert!(search_ids(&engine, "indexed nonexistent").is_empty());
}

#[test]
fn tokenless_query_is_rejected() {
    let (_tmp, engine) = setup_engine();
    for query in ["", "   ", "!!! ??? ---"] {
        let err = engine.search(query).unwrap_err();
        assert!(
            matches!(err, CuttleError::InvalidQuery(_)),
            "query {:?} should be invalid",
            query
        );
    }
}

#[test]
fn update_swaps_token_sets() {
    let (_tmp, engine) = setup_engine();
    let id = engine
        .add_document(doc(json!({"text": "old content here"})), "text")
        .unwrap();

    engine
        .update_document(&id, doc(json!({"text": "fresh words now"})), "text")
        .unwrap();

    assert!(search_ids(&engine, "old").is_empty());
    assert!(search_ids(&engine, "content").is_empty());
    assert!(search_ids(&engine, "fresh").contains(&id));
    assert!(search_ids(&engine, "words now").contains(&id));
}

#[test]
fn update_is_a_full_replace_not_a_merge() {
    let (_tmp, engine) = setup_engine();
    let id = engine
        .add_document(
            doc(json!({"text": "original", "author": "prior"})),
            "text",
        )
        .unwrap();

    engine
        .update_document(&id, doc(json!({"text": "replaced"})), "text")
        .unwrap();

    let stored = engine.get_document(&id).unwrap();
    assert!(stored.get("author").is_none());
    assert_eq!(stored.get("text"), Some(&json!("replaced")));
}

#[test]
fn readding_same_id_converges_to_latest_tokens() {
    let (_tmp, engine) = setup_engine();
    engine
        .add_document(doc(json!({"id": "x", "text": "alpha beta"})), "text")
        .unwrap();
    engine
        .add_document(doc(json!({"id": "x", "text": "beta gamma"})), "text")
        .unwrap();

    assert!(search_ids(&engine, "alpha").is_empty());
    assert_eq!(search_ids(&engine, "beta"), HashSet::from(["x".to_string()]));
    assert_eq!(
        search_ids(&engine, "gamma"),
        HashSet::from(["x".to_string()])
    );
    assert_eq!(engine.total_documents(), 1);
}

#[test]
fn missing_key_field_leaves_document_stored_but_unmatched() {
    let (_tmp, engine) = setup_engine();
    let id = engine
        .add_document(doc(json!({"title": "orphan"})), "text")
        .unwrap();

    // Retrievable by id, invisible to search.
    assert!(engine.get_document(&id).is_ok());
    assert!(search_ids(&engine, "orphan").is_empty());
}

#[test]
fn delete_removes_document_from_storage() {
    let tmp = TempDir::new().unwrap();
    let engine = open_engine(tmp.path());
    let id = engine
        .add_document(doc(json!({"text": "doomed"})), "text")
        .unwrap();

    engine.delete_document(&id).unwrap();
    assert!(engine.get_document(&id).unwrap_err().is_not_found());

    // Still gone after a restart: the deletion was physical.
    drop(engine);
    let engine = open_engine(tmp.path());
    assert!(engine.get_document(&id).unwrap_err().is_not_found());
    assert!(search_ids(&engine, "doomed").is_empty());
}

#[test]
fn delete_and_update_of_unknown_id_are_not_found() {
    let (_tmp, engine) = setup_engine();

    assert!(engine.delete_document("ghost").unwrap_err().is_not_found());
    assert!(engine
        .update_document("ghost", doc(json!({"text": "x"})), "text")
        .unwrap_err()
        .is_not_found());
    assert!(engine.get_document("ghost").unwrap_err().is_not_found());
}

#[test]
fn client_supplied_id_is_preserved() {
    let (_tmp, engine) = setup_engine();
    let id = engine
        .add_document(doc(json!({"id": "custom-7", "text": "keep my id"})), "text")
        .unwrap();

    assert_eq!(id, "custom-7");
    assert_eq!(
        engine.get_document("custom-7").unwrap().id(),
        Some("custom-7")
    );
}

#[test]
fn concurrent_adds_are_all_searchable() {
    let tmp = TempDir::new().unwrap();
    let engine = Arc::new(open_engine(tmp.path()));

    let threads = 8;
    let docs_per_thread = 25;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..docs_per_thread {
                    let id = format!("doc-{}-{}", t, i);
                    let text = format!("shared term{}x{}", t, i);
                    engine
                        .add_document(doc(json!({"id": id, "text": text})), "text")
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        search_ids(&engine, "shared").len(),
        threads * docs_per_thread
    );
    // Spot-check a unique token per thread.
    for t in 0..threads {
        let hits = search_ids(&engine, &format!("term{}x0", t));
        assert_eq!(hits, HashSet::from([format!("doc-{}-0", t)]));
    }
}

#[test]
fn concurrent_updates_of_one_document_leave_a_consistent_index() {
    let tmp = TempDir::new().unwrap();
    let engine = Arc::new(open_engine(tmp.path()));
    engine
        .add_document(doc(json!({"id": "hot", "text": "seed"})), "text")
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..10 {
                    let text = format!("rev{} common", t * 100 + i);
                    engine
                        .update_document("hot", doc(json!({"text": text})), "text")
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Whichever write won, the index holds exactly that revision's tokens.
    let stored = engine.get_document("hot").unwrap();
    let text = stored.get("text").unwrap().as_str().unwrap().to_string();
    let rev_token = text.split(' ').next().unwrap();

    assert_eq!(
        search_ids(&engine, &format!("{} common", rev_token)),
        HashSet::from(["hot".to_string()])
    );
    assert_eq!(search_ids(&engine, "common").len(), 1);
    assert!(search_ids(&engine, "seed").is_empty());
}

#[test]
fn restart_reproduces_search_results() {
    let tmp = TempDir::new().unwrap();
    let engine = open_engine(tmp.path());

    engine
        .add_document(doc(json!({"id": "a", "text": "rust search engine"})), "text")
        .unwrap();
    engine
        .add_document(doc(json!({"id": "b", "text": "rust web server"})), "text")
        .unwrap();
    engine
        .add_document(doc(json!({"id": "c", "title": "indexed by title"})), "title")
        .unwrap();
    engine
        .add_document(doc(json!({"id": "d", "name": "never indexed"})), "text")
        .unwrap();
    engine
        .update_document("b", doc(json!({"text": "rust database"})), "text")
        .unwrap();
    engine
        .add_document(doc(json!({"id": "e", "text": "short lived"})), "text")
        .unwrap();
    engine.delete_document("e").unwrap();

    let queries = ["rust", "rust engine", "database", "title", "lived", "never"];
    let before: Vec<HashSet<String>> = queries
        .iter()
        .map(|q| search_ids(&engine, q))
        .collect();

    drop(engine);
    let engine = open_engine(tmp.path());

    let after: Vec<HashSet<String>> = queries
        .iter()
        .map(|q| search_ids(&engine, q))
        .collect();
    assert_eq!(before, after);
    assert_eq!(engine.total_documents(), 4);
}

#[test]
fn rebuild_reads_persisted_key_field_not_a_guess() {
    let tmp = TempDir::new().unwrap();
    let engine = open_engine(tmp.path());

    // Indexed by "title" even though a "text" field is also present; after
    // restart only the recorded field must match.
    engine
        .add_document(
            doc(json!({"id": "a", "title": "headline", "text": "body copy"})),
            "title",
        )
        .unwrap();
    drop(engine);

    let engine = open_engine(tmp.path());
    assert_eq!(
        search_ids(&engine, "headline"),
        HashSet::from(["a".to_string()])
    );
    assert!(search_ids(&engine, "body").is_empty());
    assert!(search_ids(&engine, "copy").is_empty());
}
