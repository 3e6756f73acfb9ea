use super::*;

fn temp_store() -> (tempfile::TempDir, TokenStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = TokenStore::new(dir.path().join("access_token"));
    (dir, store)
}

// =============================================================================
// load
// =============================================================================

#[test]
fn load_returns_none_when_file_missing() {
    let (_dir, store) = temp_store();
    assert!(store.load().is_none());
}

#[test]
fn load_returns_none_for_empty_file() {
    let (_dir, store) = temp_store();
    store.save("").unwrap();
    assert!(store.load().is_none());
}

#[test]
fn load_trims_whitespace() {
    let (_dir, store) = temp_store();
    store.save("tok-123\n").unwrap();
    assert_eq!(store.load().as_deref(), Some("tok-123"));
}

// =============================================================================
// save
// =============================================================================

#[test]
fn save_then_load_round_trips() {
    let (_dir, store) = temp_store();
    store.save("tok-abc").unwrap();
    assert_eq!(store.load().as_deref(), Some("tok-abc"));
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = TokenStore::new(dir.path().join("nested/state/access_token"));
    store.save("tok-nested").unwrap();
    assert_eq!(store.load().as_deref(), Some("tok-nested"));
}

#[test]
fn save_overwrites_previous_token() {
    let (_dir, store) = temp_store();
    store.save("old").unwrap();
    store.save("new").unwrap();
    assert_eq!(store.load().as_deref(), Some("new"));
}

// =============================================================================
// clear
// =============================================================================

#[test]
fn clear_removes_persisted_token() {
    let (_dir, store) = temp_store();
    store.save("tok").unwrap();
    store.clear();
    assert!(store.load().is_none());
}

#[test]
fn clear_is_a_noop_when_nothing_persisted() {
    let (_dir, store) = temp_store();
    store.clear();
    store.clear();
    assert!(store.load().is_none());
}
