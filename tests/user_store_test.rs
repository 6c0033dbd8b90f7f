// tests/user_store_test.rs
// Credential store contract tests against real SQLite databases.

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;

use hostpanel_backend::auth::password::verify_password;
use hostpanel_backend::error::ApiError;
use hostpanel_backend::users::models::Role;
use hostpanel_backend::users::store::UserStore;

async fn memory_store() -> UserStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    UserStore::init_schema(&pool).await.expect("schema");
    UserStore::new(pool)
}

#[tokio::test]
async fn create_then_find_returns_matching_record_with_verifiable_hash() {
    let store = memory_store().await;

    let created = store.create("Alice", "pw123", Role::User).await.unwrap();
    assert_eq!(created.username, "alice");
    assert_eq!(created.role, Role::User);

    let record = store
        .find_by_username("alice")
        .await
        .unwrap()
        .expect("stored record");
    assert_eq!(record.role, Role::User);
    assert_ne!(record.password_hash, "pw123");
    assert!(verify_password("pw123", &record.password_hash).unwrap());
}

#[tokio::test]
async fn lookups_normalize_case_and_whitespace() {
    let store = memory_store().await;
    store.create("alice", "pw123", Role::User).await.unwrap();

    assert!(store.find_by_username(" ALICE ").await.unwrap().is_some());
    assert!(store.find_by_username("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn empty_username_or_password_is_invalid_input() {
    let store = memory_store().await;

    let err = store.create("   ", "pw", Role::User).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = store.create("alice", "", Role::User).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn concurrent_creates_of_the_same_normalized_username() {
    // A file-backed database with two connections so the creates really
    // run on separate connections.
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("users.db").display());
    let pool = SqlitePoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("file pool");
    UserStore::init_schema(&pool).await.expect("schema");
    let store = Arc::new(UserStore::new(pool));

    let a = {
        let store = store.clone();
        tokio::spawn(async move { store.create("Bob", "pw-a", Role::User).await })
    };
    let b = {
        let store = store.clone();
        tokio::spawn(async move { store.create(" bob ", "pw-b", Role::User).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let ok = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(ok, 1, "exactly one create may win");
    let conflict = results
        .iter()
        .filter(|r| matches!(r, Err(ApiError::Conflict(_))))
        .count();
    assert_eq!(conflict, 1, "the loser receives Conflict");
}

#[tokio::test]
async fn update_rejects_duplicates_and_unknown_ids() {
    let store = memory_store().await;
    store.create("alice", "pw123", Role::User).await.unwrap();
    let bob = store.create("bob", "pw123", Role::User).await.unwrap();

    let err = store
        .update(bob.id, Some("ALICE"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    let err = store.update(9999, Some("carol"), None).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // Failed rename left bob unchanged.
    let record = store.find_by_id(bob.id).await.unwrap().unwrap();
    assert_eq!(record.username, "bob");
}

#[tokio::test]
async fn set_password_recomputes_the_hash() {
    let store = memory_store().await;
    let alice = store.create("alice", "pw123", Role::User).await.unwrap();
    let before = store.find_by_id(alice.id).await.unwrap().unwrap();

    store.set_password(alice.id, "newpw456").await.unwrap();

    let after = store.find_by_id(alice.id).await.unwrap().unwrap();
    assert_ne!(before.password_hash, after.password_hash);
    assert!(verify_password("newpw456", &after.password_hash).unwrap());
    assert!(!verify_password("pw123", &after.password_hash).unwrap());
}

#[tokio::test]
async fn seed_default_admin_is_idempotent() {
    let store = memory_store().await;

    store.seed_default_admin().await.unwrap();
    store.seed_default_admin().await.unwrap();

    let users = store.list().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "admin");
    assert_eq!(users[0].role, Role::Admin);
}

#[tokio::test]
async fn delete_removes_the_row() {
    let store = memory_store().await;
    let alice = store.create("alice", "pw123", Role::User).await.unwrap();

    store.delete(alice.id).await.unwrap();
    assert!(store.find_by_id(alice.id).await.unwrap().is_none());

    let err = store.delete(alice.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
