//! End-to-end tests of the delivery pipeline: presence registry, message
//! router, conversation store, and unread tally wired together the way the
//! server wires them, with fake connection handles standing in for live
//! sockets.

use pretty_assertions::assert_eq;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

use wavelink::backend::presence::{ConnectionHandle, PresenceRegistry};
use wavelink::backend::router::MessageRouter;
use wavelink::backend::store::{ConversationStore, MemoryConversationStore};
use wavelink::backend::tally::UnreadTally;
use wavelink::shared::{MessageSubmission, ServerEvent, UserPublic};

struct TestBench {
    store: MemoryConversationStore,
    presence: PresenceRegistry,
    router: MessageRouter<MemoryConversationStore>,
    tally: UnreadTally<MemoryConversationStore>,
    alice: UserPublic,
    bob: UserPublic,
}

fn bench() -> TestBench {
    let store = MemoryConversationStore::new();
    let presence = PresenceRegistry::new();
    let router = MessageRouter::new(store.clone(), presence.clone());
    let tally = UnreadTally::new(store.clone());

    let alice = UserPublic {
        id: Uuid::new_v4(),
        name: "alice".to_string(),
        email: "alice@example.com".to_string(),
        mobile: Some("+15550001".to_string()),
    };
    let bob = UserPublic {
        id: Uuid::new_v4(),
        name: "bob".to_string(),
        email: "bob@example.com".to_string(),
        mobile: None,
    };
    store.add_user(alice.clone());
    store.add_user(bob.clone());

    TestBench {
        store,
        presence,
        router,
        tally,
        alice,
        bob,
    }
}

fn submission(sender: Uuid, receiver: Uuid, text: &str) -> MessageSubmission {
    MessageSubmission {
        sender: Some(sender),
        receiver: Some(receiver),
        text: Some(text.to_string()),
        media: None,
        client_timestamp: None,
    }
}

fn delivered_ids(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<i64> {
    let mut ids = Vec::new();
    while let Ok(event) = rx.try_recv() {
        match event {
            ServerEvent::Delivered { message } => ids.push(message.id),
            other => panic!("unexpected event: {:?}", other),
        }
    }
    ids
}

#[tokio::test]
async fn offline_submission_lands_in_tally_until_marked_read() {
    let bench = bench();
    let (alice_conn, mut alice_rx) = ConnectionHandle::new();
    bench.presence.register(bench.alice.id, alice_conn.clone());

    // Bob is offline: the message is stored, nothing is delivered to him.
    bench
        .router
        .route(
            &alice_conn,
            submission(bench.alice.id, bench.bob.id, "hi"),
        )
        .await
        .unwrap();

    assert_eq!(bench.store.len(), 1);
    assert_eq!(delivered_ids(&mut alice_rx).len(), 1); // the echo

    let counts = bench.tally.tally(bench.bob.id).await.unwrap();
    assert_eq!(counts.get(&bench.alice.id), Some(&1));

    // Bob comes online later and marks the conversation read.
    bench.tally.mark_read(bench.bob.id, bench.alice.id).await.unwrap();
    let counts = bench.tally.tally(bench.bob.id).await.unwrap();
    assert!(counts.is_empty());
}

#[tokio::test]
async fn online_recipient_sees_submissions_in_order() {
    let bench = bench();
    let (alice_conn, mut alice_rx) = ConnectionHandle::new();
    let (bob_conn, mut bob_rx) = ConnectionHandle::new();
    bench.presence.register(bench.alice.id, alice_conn.clone());
    bench.presence.register(bench.bob.id, bob_conn);

    bench
        .router
        .route(
            &alice_conn,
            submission(bench.alice.id, bench.bob.id, "first"),
        )
        .await
        .unwrap();
    bench
        .router
        .route(
            &alice_conn,
            submission(bench.alice.id, bench.bob.id, "second"),
        )
        .await
        .unwrap();

    let to_bob = delivered_ids(&mut bob_rx);
    assert_eq!(to_bob.len(), 2);
    assert!(to_bob[0] < to_bob[1]);

    // One echo per successful submission, regardless of Bob's presence.
    assert_eq!(delivered_ids(&mut alice_rx).len(), 2);
}

#[tokio::test]
async fn reconnect_converges_through_history_fetch() {
    let bench = bench();
    let (alice_conn, _alice_rx) = ConnectionHandle::new();

    let routed = bench
        .router
        .route(
            &alice_conn,
            submission(bench.alice.id, bench.bob.id, "missed you"),
        )
        .await
        .unwrap();

    // Bob reconnects and fetches the conversation instead of relying on
    // any redelivery.
    let (bob_conn, _bob_rx) = ConnectionHandle::new();
    bench.presence.register(bench.bob.id, bob_conn);

    let history = bench
        .store
        .find_conversation(bench.bob.id, bench.alice.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, routed.id);
    assert_eq!(history[0].text, "missed you");
    assert_eq!(history[0].sender.name, "alice");

    // The pair is unordered: both fetch directions agree.
    let mirrored = bench
        .store
        .find_conversation(bench.alice.id, bench.bob.id)
        .await
        .unwrap();
    assert_eq!(history, mirrored);
}

#[tokio::test]
async fn reregistration_routes_only_to_newest_connection() {
    let bench = bench();
    let (alice_conn, _alice_rx) = ConnectionHandle::new();

    let (old_conn, mut old_rx) = ConnectionHandle::new();
    let (new_conn, mut new_rx) = ConnectionHandle::new();
    bench.presence.register(bench.bob.id, old_conn.clone());
    bench.presence.register(bench.bob.id, new_conn);

    // The old connection's late disconnect must not evict the new one.
    bench.presence.remove(&old_conn);

    bench
        .router
        .route(
            &alice_conn,
            submission(bench.alice.id, bench.bob.id, "still there?"),
        )
        .await
        .unwrap();

    assert_eq!(delivered_ids(&mut old_rx).len(), 0);
    assert_eq!(delivered_ids(&mut new_rx).len(), 1);
}

#[tokio::test]
async fn echo_carries_the_authoritative_record() {
    let bench = bench();
    let (alice_conn, mut alice_rx) = ConnectionHandle::new();

    let routed = bench
        .router
        .route(
            &alice_conn,
            submission(bench.alice.id, bench.bob.id, "ack me"),
        )
        .await
        .unwrap();

    // The echo is how the sender learns the assigned id and timestamp.
    let mut events = Vec::new();
    while let Ok(event) = alice_rx.try_recv() {
        events.push(event);
    }
    assert_eq!(events.len(), 1);
    match &events[0] {
        ServerEvent::Delivered { message } => {
            assert_eq!(message.id, routed.id);
            assert_eq!(message.timestamp, routed.timestamp);
            assert!(!message.read);
        }
        other => panic!("unexpected event: {:?}", other),
    }

    let history = bench
        .store
        .find_conversation(bench.alice.id, bench.bob.id)
        .await
        .unwrap();
    assert_eq!(history[0].id, routed.id);
}

#[tokio::test]
async fn rejected_submission_has_no_side_effects() {
    let bench = bench();
    let (alice_conn, mut alice_rx) = ConnectionHandle::new();

    let incomplete = MessageSubmission {
        receiver: Some(bench.bob.id),
        ..Default::default()
    };
    let result = bench.router.route(&alice_conn, incomplete).await;

    assert!(result.is_err());
    assert!(bench.store.is_empty());
    assert!(delivered_ids(&mut alice_rx).is_empty());
    assert!(bench.tally.tally(bench.bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn mark_read_only_touches_the_named_pair() {
    let bench = bench();
    let carol = UserPublic {
        id: Uuid::new_v4(),
        name: "carol".to_string(),
        email: "carol@example.com".to_string(),
        mobile: None,
    };
    bench.store.add_user(carol.clone());

    let (conn, _rx) = ConnectionHandle::new();
    bench
        .router
        .route(&conn, submission(bench.alice.id, bench.bob.id, "from alice"))
        .await
        .unwrap();
    bench
        .router
        .route(&conn, submission(carol.id, bench.bob.id, "from carol"))
        .await
        .unwrap();

    bench.tally.mark_read(bench.bob.id, bench.alice.id).await.unwrap();

    let counts = bench.tally.tally(bench.bob.id).await.unwrap();
    assert!(!counts.contains_key(&bench.alice.id));
    assert_eq!(counts.get(&carol.id), Some(&1));
}
