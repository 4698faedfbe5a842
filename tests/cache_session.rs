//! Cache Session Tests
//!
//! - Identical reads inside a session hit the cache, not the store
//! - Every mutation inside a session fails before reaching the store
//! - Ending the session discards results and re-enables writes

use hbasta::client::{Client, ClientError, ScanRequest};
use hbasta::codec::Value;
use hbasta::store::MemoryStore;

// =============================================================================
// Test Utilities
// =============================================================================

const TABLE: &str = "__test__";

fn key(k: &str) -> Value {
    Value::bytes(k.as_bytes().to_vec())
}

fn setup() -> (Client<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    let mut client = Client::new(store.clone());
    client.create_table(TABLE).unwrap();
    client
        .add_row(
            TABLE,
            &key("1"),
            &[
                ("x", Value::bytes(b"a".to_vec())),
                ("y", Value::bytes(b"b".to_vec())),
                ("z", Value::bytes(b"c".to_vec())),
            ],
        )
        .unwrap();
    (client, store)
}

fn assert_write_rejected(result: Result<impl std::fmt::Debug, ClientError>) {
    match result {
        Err(ClientError::WriteDuringCacheSession { .. }) => {}
        other => panic!("expected WriteDuringCacheSession, got {:?}", other),
    }
}

// =============================================================================
// Read memoization
// =============================================================================

#[test]
fn test_repeated_get_issues_one_rpc() {
    let (mut client, store) = setup();
    client.begin_cache_session();

    let first = client.get_row(TABLE, &key("1"), &[]).unwrap();
    let calls_after_first = store.total_calls();
    let second = client.get_row(TABLE, &key("1"), &[]).unwrap();

    assert_eq!(first, second);
    let row = first.unwrap();
    assert_eq!(row.get("x").and_then(Value::as_bytes), Some(&b"a"[..]));
    assert_eq!(store.total_calls(), calls_after_first, "second read must not reach the store");
}

#[test]
fn test_misses_are_cached_too() {
    let (mut client, store) = setup();
    client.begin_cache_session();

    assert!(client.get_row(TABLE, &key("missing"), &[]).unwrap().is_none());
    let calls = store.calls("get_row");
    assert!(client.get_row(TABLE, &key("missing"), &[]).unwrap().is_none());
    assert_eq!(store.calls("get_row"), calls);
}

#[test]
fn test_column_order_does_not_split_entries() {
    let (mut client, store) = setup();
    client.begin_cache_session();

    client.get_row(TABLE, &key("1"), &["y", "x"]).unwrap();
    let calls = store.calls("get_row");
    let row = client.get_row(TABLE, &key("1"), &["x", "y", "x"]).unwrap().unwrap();

    assert_eq!(store.calls("get_row"), calls);
    assert_eq!(row.columns.len(), 2);
}

#[test]
fn test_without_session_every_read_reaches_store() {
    let (mut client, store) = setup();
    let before = store.calls("get_row");
    client.get_row(TABLE, &key("1"), &[]).unwrap();
    client.get_row(TABLE, &key("1"), &[]).unwrap();
    assert_eq!(store.calls("get_row"), before + 2);
    assert_eq!(client.cache_stats().hits, 0);
}

#[test]
fn test_cached_scan_replays_identically() {
    let (mut client, store) = setup();
    for k in ["10", "11", "2"] {
        client.add_row(TABLE, &key(k), &[("x", Value::Int64(1))]).unwrap();
    }
    client.begin_cache_session();

    let request = ScanRequest::with_prefix(key("1")).batch_size(1);
    let first: Vec<_> = client
        .scan(TABLE, request.clone())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    let opened = store.calls("open_scanner");

    for _ in 0..3 {
        let rows = client.scan(TABLE, request.clone()).unwrap();
        assert!(rows.is_cached());
        let replay: Vec<_> = rows.collect::<Result<_, _>>().unwrap();
        assert_eq!(replay, first);
    }

    assert_eq!(first.len(), 3);
    assert_eq!(store.calls("open_scanner"), opened);
    assert_eq!(store.open_scanners(), 0);
}

// =============================================================================
// Write guard
// =============================================================================

#[test]
fn test_mutations_rejected_without_rpc() {
    let (mut client, store) = setup();
    client.begin_cache_session();
    let before = store.total_calls();

    assert_write_rejected(client.add_row(TABLE, &key("2"), &[("x", Value::Int64(1))]));
    assert_write_rejected(client.delete_row(TABLE, &key("1")));
    assert_write_rejected(client.atomic_increment(TABLE, &key("1"), "n", 1));
    assert_write_rejected(client.create_table("other"));
    assert_write_rejected(client.enable_table(TABLE));
    assert_write_rejected(client.disable_table(TABLE));
    assert_write_rejected(client.drop_table(TABLE));

    assert_eq!(store.total_calls(), before, "rejected writes must not reach the store");
    assert_eq!(client.cache_stats().rejected_writes, 7);
}

#[test]
fn test_admin_reads_allowed_during_session() {
    let (mut client, _) = setup();
    client.begin_cache_session();
    assert!(client.is_table_enabled(TABLE).unwrap());
    assert_eq!(client.table_names().unwrap(), vec![TABLE.to_string()]);
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[test]
fn test_end_session_discards_results() {
    let (mut client, store) = setup();
    client.begin_cache_session();
    client.get_row(TABLE, &key("1"), &[]).unwrap();
    client.end_cache_session();

    client
        .add_row(TABLE, &key("1"), &[("x", Value::bytes(b"changed".to_vec()))])
        .unwrap();

    client.begin_cache_session();
    let before = store.calls("get_row");
    let row = client.get_row(TABLE, &key("1"), &[]).unwrap().unwrap();
    assert_eq!(store.calls("get_row"), before + 1);
    assert_eq!(row.get("x"), Some(&Value::bytes(b"changed".to_vec())));
}

#[test]
fn test_begin_twice_keeps_entries() {
    let (mut client, store) = setup();
    client.begin_cache_session();
    client.get_row(TABLE, &key("1"), &[]).unwrap();
    client.begin_cache_session();

    let before = store.total_calls();
    client.get_row(TABLE, &key("1"), &[]).unwrap();
    assert_eq!(store.total_calls(), before);
    assert_eq!(client.cache_stats().sessions, 1);
}
