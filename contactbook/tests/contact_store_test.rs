//! Integration tests for the SurrealDB contact store
//!
//! Every test runs against a fresh in-memory database and checks that the
//! mirrored rows of a relation always change together.

use chrono::Utc;
use contactbook::storage::{
    EmbeddedStore, StorageError, SurrealStore,
    config::SurrealDBConfig,
    models::{ContactStatus, NewUser, UserRecord},
    traits::{BaseStore, ContactStore, UserStore},
};
use uuid::Uuid;

async fn create_test_store() -> Result<EmbeddedStore, Box<dyn std::error::Error>> {
    let config = SurrealDBConfig {
        namespace: "test".to_string(),
        database: format!("contacts_{}", Uuid::new_v4().simple()),
        ..SurrealDBConfig::default()
    };

    let client = surrealdb::Surreal::new::<surrealdb::engine::local::Mem>(()).await?;
    let store = SurrealStore::new(client, config).await?;
    Ok(store)
}

async fn create_user(store: &EmbeddedStore, name: &str) -> UserRecord {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    store
        .create_user(NewUser::new(name, &email, "hash"))
        .await
        .expect("Failed to create user")
}

#[tokio::test]
async fn test_store_health() {
    let store = create_test_store()
        .await
        .expect("Failed to create test store");

    assert!(store.health_check().await.expect("Health check failed"));
    assert_eq!(store.location().0, "test");
}

#[tokio::test]
async fn test_user_email_is_unique_and_case_insensitive() {
    let store = create_test_store().await.unwrap();

    let ana = store
        .create_user(NewUser::new("  Ana Gil ", "Ana@Example.com", "hash"))
        .await
        .unwrap();
    assert_eq!(ana.full_name, "Ana Gil");
    assert_eq!(ana.email, "ana@example.com");

    let duplicate = store
        .create_user(NewUser::new("Other Ana", "ana@example.com", "hash"))
        .await;
    assert!(matches!(duplicate, Err(StorageError::AlreadyExists(_))));

    let found = store
        .find_user_by_email("ANA@EXAMPLE.COM")
        .await
        .unwrap()
        .expect("User should be found by email");
    assert_eq!(found.id, ana.id);
}

#[tokio::test]
async fn test_get_users_skips_missing_ids() {
    let store = create_test_store().await.unwrap();
    let ana = create_user(&store, "Ana").await;
    let ben = create_user(&store, "Ben").await;

    let mut found = store
        .get_users(vec![ana.id, Uuid::new_v4(), ben.id])
        .await
        .unwrap();
    found.sort_by(|a, b| a.full_name.cmp(&b.full_name));

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id, ana.id);
    assert_eq!(found[1].id, ben.id);
    assert!(store.get_users(Vec::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_bidirectional_writes_mirrored_rows() {
    let store = create_test_store().await.unwrap();
    let ana = create_user(&store, "Ana").await;
    let ben = create_user(&store, "Ben").await;

    let (forward, reverse) = store
        .create_bidirectional(ana.id, ben.id, ContactStatus::Pending)
        .await
        .expect("Failed to create relation");

    assert_eq!((forward.owner, forward.peer), (ana.id, ben.id));
    assert_eq!((reverse.owner, reverse.peer), (ben.id, ana.id));
    assert_eq!(forward.requested_by, ana.id);
    assert_eq!(reverse.requested_by, ana.id);
    assert_ne!(forward.id, reverse.id);

    // Found from either side
    let from_ana = store.find_relation(ana.id, ben.id).await.unwrap();
    let from_ben = store.find_relation(ben.id, ana.id).await.unwrap();
    assert_eq!(from_ana.map(|r| r.status), Some(ContactStatus::Pending));
    assert_eq!(from_ben.map(|r| r.status), Some(ContactStatus::Pending));

    let row = store.get_contact(reverse.id).await.unwrap().unwrap();
    assert_eq!(row.owner, ben.id);
    assert!(!row.is_outgoing());
}

#[tokio::test]
async fn test_duplicate_pair_writes_nothing() {
    let store = create_test_store().await.unwrap();
    let ana = create_user(&store, "Ana").await;
    let ben = create_user(&store, "Ben").await;

    store
        .create_bidirectional(ana.id, ben.id, ContactStatus::Pending)
        .await
        .unwrap();

    let reversed = store
        .create_bidirectional(ben.id, ana.id, ContactStatus::Pending)
        .await;
    assert!(matches!(reversed, Err(StorageError::AlreadyExists(_))));

    let ana_rows = store
        .list_contacts(ana.id, ContactStatus::Pending)
        .await
        .unwrap();
    let ben_rows = store
        .list_contacts(ben.id, ContactStatus::Pending)
        .await
        .unwrap();
    assert_eq!(ana_rows.len(), 1);
    assert_eq!(ben_rows.len(), 1);
    assert_eq!(ana_rows[0].requested_by, ana.id);
}

#[tokio::test]
async fn test_concurrent_requests_create_one_pair() {
    let store = create_test_store().await.unwrap();
    let ana = create_user(&store, "Ana").await;
    let ben = create_user(&store, "Ben").await;

    let (first, second) = tokio::join!(
        store.create_bidirectional(ana.id, ben.id, ContactStatus::Pending),
        store.create_bidirectional(ben.id, ana.id, ContactStatus::Pending),
    );

    let outcomes = [first.is_ok(), second.is_ok()];
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    for result in [first, second] {
        if let Err(e) = result {
            assert!(e.is_already_exists(), "unexpected error: {}", e);
        }
    }

    let ana_rows = store
        .list_contacts(ana.id, ContactStatus::Pending)
        .await
        .unwrap();
    let ben_rows = store
        .list_contacts(ben.id, ContactStatus::Pending)
        .await
        .unwrap();
    assert_eq!(ana_rows.len(), 1);
    assert_eq!(ben_rows.len(), 1);
    assert_eq!(ana_rows[0].requested_by, ben_rows[0].requested_by);
}

#[tokio::test]
async fn test_accept_updates_both_rows_once() {
    let store = create_test_store().await.unwrap();
    let ana = create_user(&store, "Ana").await;
    let ben = create_user(&store, "Ben").await;
    let before = Utc::now();

    store
        .create_bidirectional(ana.id, ben.id, ContactStatus::Pending)
        .await
        .unwrap();

    let changed = store
        .update_bidirectional_status(ben.id, ana.id, ContactStatus::Accepted)
        .await
        .unwrap();
    assert_eq!(changed, 2);

    let ana_row = store
        .list_contacts(ana.id, ContactStatus::Accepted)
        .await
        .unwrap()
        .remove(0);
    let ben_row = store
        .list_contacts(ben.id, ContactStatus::Accepted)
        .await
        .unwrap()
        .remove(0);

    let accepted_at = ana_row.accepted_at.expect("accepted_at should be set");
    assert!(accepted_at >= before);
    assert_eq!(ben_row.accepted_at, Some(accepted_at));

    // Repeating the update changes nothing
    let again = store
        .update_bidirectional_status(ana.id, ben.id, ContactStatus::Accepted)
        .await
        .unwrap();
    assert_eq!(again, 0);

    let unchanged = store.get_contact(ana_row.id).await.unwrap().unwrap();
    assert_eq!(unchanged.accepted_at, Some(accepted_at));
}

#[tokio::test]
async fn test_delete_removes_pair_and_reports_missing() {
    let store = create_test_store().await.unwrap();
    let ana = create_user(&store, "Ana").await;
    let ben = create_user(&store, "Ben").await;

    store
        .create_bidirectional(ana.id, ben.id, ContactStatus::Accepted)
        .await
        .unwrap();

    // Status filter that matches nothing
    let filtered = store
        .delete_bidirectional(ana.id, ben.id, Some(ContactStatus::Pending))
        .await;
    assert!(matches!(filtered, Err(StorageError::NotFound(_))));

    let deleted = store
        .delete_bidirectional(ben.id, ana.id, None)
        .await
        .unwrap();
    assert_eq!(deleted, 2);
    assert!(store.find_relation(ana.id, ben.id).await.unwrap().is_none());

    let retry = store.delete_bidirectional(ana.id, ben.id, None).await;
    assert!(retry.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_nickname_is_private_to_owner() {
    let store = create_test_store().await.unwrap();
    let ana = create_user(&store, "Ana").await;
    let ben = create_user(&store, "Ben").await;

    store
        .create_bidirectional(ana.id, ben.id, ContactStatus::Accepted)
        .await
        .unwrap();

    let updated = store
        .set_nickname(ana.id, ben.id, Some("Benny".to_string()))
        .await
        .unwrap()
        .expect("Accepted row should be updated");
    assert_eq!(updated.nickname.as_deref(), Some("Benny"));

    let ben_row = store
        .list_contacts(ben.id, ContactStatus::Accepted)
        .await
        .unwrap()
        .remove(0);
    assert_eq!(ben_row.nickname, None);

    let cleared = store
        .set_nickname(ana.id, ben.id, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.nickname, None);
}

#[tokio::test]
async fn test_nickname_requires_accepted_relation() {
    let store = create_test_store().await.unwrap();
    let ana = create_user(&store, "Ana").await;
    let ben = create_user(&store, "Ben").await;
    let cid = create_user(&store, "Cid").await;

    store
        .create_bidirectional(ana.id, ben.id, ContactStatus::Pending)
        .await
        .unwrap();

    let pending = store
        .set_nickname(ana.id, ben.id, Some("Benny".to_string()))
        .await
        .unwrap();
    assert!(pending.is_none());

    let unrelated = store
        .set_nickname(ana.id, cid.id, Some("Cid".to_string()))
        .await
        .unwrap();
    assert!(unrelated.is_none());
}

#[tokio::test]
async fn test_search_users_is_case_insensitive_and_excludes_caller() {
    let store = create_test_store().await.unwrap();
    let ana = create_user(&store, "Ana Martin").await;
    let mara = create_user(&store, "Mara Lopez").await;
    create_user(&store, "Zoe Ruiz").await;

    let results = store.search_users("mar", ana.id, 20).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, mara.id);

    // Matches on email too, sorted by name
    let by_email = store.search_users("EXAMPLE", ana.id, 20).await.unwrap();
    let names: Vec<_> = by_email.iter().map(|u| u.full_name.as_str()).collect();
    assert_eq!(names, vec!["Mara Lopez", "Zoe Ruiz"]);

    let limited = store.search_users("example", ana.id, 1).await.unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn test_clear_removes_everything() {
    let store = create_test_store().await.unwrap();
    let ana = create_user(&store, "Ana").await;
    let ben = create_user(&store, "Ben").await;
    store
        .create_bidirectional(ana.id, ben.id, ContactStatus::Pending)
        .await
        .unwrap();

    store.clear().await.unwrap();

    assert!(store.get_user(ana.id).await.unwrap().is_none());
    assert!(store.find_relation(ana.id, ben.id).await.unwrap().is_none());
}
