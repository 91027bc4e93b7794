//! End-to-end contact workflows through the `ContactManager`

use contactbook::prelude::*;
use uuid::Uuid;

async fn create_manager() -> ContactManager {
    let config = ConfigBuilder::testing()
        .build()
        .expect("Failed to build test config");
    contactbook::init(config)
        .await
        .expect("Failed to initialize contactbook")
}

async fn register(manager: &ContactManager, name: &str, email: &str) -> UserRecord {
    manager
        .users()
        .create_user(NewUser::new(name, email, "hash"))
        .await
        .expect("Failed to create user")
}

#[tokio::test]
async fn test_request_accept_nickname_remove() {
    let manager = create_manager().await;
    let ana = register(&manager, "Ana Torres", "ana@example.com").await;
    let ben = register(&manager, "Ben Ortiz", "ben@example.com").await;

    manager
        .send_request(ana.id, &ben.id.to_string())
        .await
        .expect("Failed to send request");

    let ben_pending = manager.list_pending(ben.id).await.unwrap();
    assert_eq!(ben_pending.received.len(), 1);
    assert!(ben_pending.sent.is_empty());
    assert_eq!(ben_pending.received[0].user.id, ana.id);

    let ana_pending = manager.list_pending(ana.id).await.unwrap();
    assert_eq!(ana_pending.sent.len(), 1);
    assert!(ana_pending.received.is_empty());

    // The sender cannot accept their own request
    let own = manager
        .accept_request(ana.id, &ana_pending.sent[0].request_id.to_string())
        .await;
    assert!(matches!(own, Err(ContactError::NotFound { .. })));

    let request_id = ben_pending.received[0].request_id.to_string();
    let peer = manager.accept_request(ben.id, &request_id).await.unwrap();
    assert_eq!(peer, ana.id);

    // Accepting again finds no pending request
    let again = manager.accept_request(ben.id, &request_id).await;
    assert!(matches!(again, Err(ContactError::NotFound { .. })));

    let ana_contacts = manager.list_accepted(ana.id).await.unwrap();
    let ben_contacts = manager.list_accepted(ben.id).await.unwrap();
    assert_eq!(ana_contacts.len(), 1);
    assert_eq!(ben_contacts.len(), 1);
    assert_eq!(ana_contacts[0].peer.id, ben.id);
    assert_eq!(ben_contacts[0].peer.id, ana.id);
    assert_eq!(ana_contacts[0].added_at, ben_contacts[0].added_at);

    let nickname = manager
        .set_nickname(ana.id, &ben.id.to_string(), Some("  Benny "))
        .await
        .unwrap();
    assert_eq!(nickname.as_deref(), Some("Benny"));

    let ana_contacts = manager.list_accepted(ana.id).await.unwrap();
    assert_eq!(ana_contacts[0].display_name, "Benny");
    let ben_contacts = manager.list_accepted(ben.id).await.unwrap();
    assert_eq!(ben_contacts[0].display_name, "Ana Torres");
    assert_eq!(ben_contacts[0].nickname, None);

    manager
        .remove_contact(ben.id, &ana.id.to_string())
        .await
        .unwrap();
    assert!(manager.list_accepted(ana.id).await.unwrap().is_empty());
    assert!(manager.list_accepted(ben.id).await.unwrap().is_empty());

    let retry = manager.remove_contact(ana.id, &ben.id.to_string()).await;
    assert!(matches!(
        retry,
        Err(ContactError::NotFound {
            resource: "Contact",
            ..
        })
    ));
}

#[tokio::test]
async fn test_reverse_request_is_refused_while_pending() {
    let manager = create_manager().await;
    let ana = register(&manager, "Ana", "ana@example.com").await;
    let ben = register(&manager, "Ben", "ben@example.com").await;

    manager
        .send_request(ana.id, &ben.id.to_string())
        .await
        .unwrap();

    let reverse = manager.send_request(ben.id, &ana.id.to_string()).await;
    assert!(matches!(
        reverse,
        Err(ContactError::AlreadyRelated {
            status: ContactStatus::Pending,
            ..
        })
    ));

    let unknown = manager
        .send_request(ana.id, &Uuid::new_v4().to_string())
        .await;
    assert!(matches!(
        unknown,
        Err(ContactError::NotFound { resource: "User", .. })
    ));
}

#[tokio::test]
async fn test_reject_and_cancel_remove_both_rows() {
    let manager = create_manager().await;
    let ana = register(&manager, "Ana", "ana@example.com").await;
    let ben = register(&manager, "Ben", "ben@example.com").await;
    let cid = register(&manager, "Cid", "cid@example.com").await;

    // Receiver rejects
    manager
        .send_request(ana.id, &ben.id.to_string())
        .await
        .unwrap();
    let received = manager.list_pending(ben.id).await.unwrap().received;
    manager
        .reject_request(ben.id, &received[0].request_id.to_string())
        .await
        .unwrap();
    assert!(manager.list_pending(ana.id).await.unwrap().sent.is_empty());

    // Sender cancels
    manager
        .send_request(ana.id, &cid.id.to_string())
        .await
        .unwrap();
    let sent = manager.list_pending(ana.id).await.unwrap().sent;
    manager
        .reject_request(ana.id, &sent[0].request_id.to_string())
        .await
        .unwrap();
    assert!(manager.list_pending(cid.id).await.unwrap().received.is_empty());

    // A new request is possible afterwards
    manager
        .send_request(cid.id, &ana.id.to_string())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_pending_lists_are_newest_first() {
    let manager = create_manager().await;
    let ana = register(&manager, "Ana", "ana@example.com").await;
    let ben = register(&manager, "Ben", "ben@example.com").await;
    let cid = register(&manager, "Cid", "cid@example.com").await;

    manager
        .send_request(ben.id, &ana.id.to_string())
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    manager
        .send_request(cid.id, &ana.id.to_string())
        .await
        .unwrap();

    let received = manager.list_pending(ana.id).await.unwrap().received;
    let order: Vec<_> = received.iter().map(|r| r.user.id).collect();
    assert_eq!(order, vec![cid.id, ben.id]);
}

#[tokio::test]
async fn test_search_annotates_candidates() {
    let manager = create_manager().await;
    let ana = register(&manager, "Ana", "ana@example.com").await;
    let marta = register(&manager, "Marta Ruiz", "marta@example.com").await;
    let mario = register(&manager, "Mario Vega", "mario@example.com").await;

    let short = manager.search_candidates(ana.id, "m").await;
    assert!(matches!(short, Err(ContactError::Validation(_))));

    manager
        .send_request(ana.id, &marta.id.to_string())
        .await
        .unwrap();

    let results = manager.search_candidates(ana.id, "MAR").await.unwrap();
    assert_eq!(results.len(), 2);

    let mario_hit = results.iter().find(|c| c.user.id == mario.id).unwrap();
    assert_eq!(mario_hit.relation_status, RelationStatus::None);
    assert!(mario_hit.can_add);

    let marta_hit = results.iter().find(|c| c.user.id == marta.id).unwrap();
    assert_eq!(marta_hit.relation_status, RelationStatus::Pending);
    assert!(!marta_hit.can_add);

    // The caller never appears in their own results
    let own = manager.search_candidates(ana.id, "ana").await.unwrap();
    assert!(own.iter().all(|c| c.user.id != ana.id));
}

#[tokio::test]
async fn test_nickname_only_on_accepted_contacts() {
    let manager = create_manager().await;
    let ana = register(&manager, "Ana", "ana@example.com").await;
    let ben = register(&manager, "Ben", "ben@example.com").await;

    manager
        .send_request(ana.id, &ben.id.to_string())
        .await
        .unwrap();

    let result = manager
        .set_nickname(ana.id, &ben.id.to_string(), Some("Benny"))
        .await;
    assert!(matches!(result, Err(ContactError::NotFound { .. })));
}

#[tokio::test]
async fn test_manager_health() {
    let manager = create_manager().await;
    assert!(manager.health_check().await.unwrap());
}
