use anka_core::{
    FeedClient, FeedError, FeedStatus, LocalBroker, Message, SessionConfig, AnkaSession,
};

fn message(id: &str, user: &str) -> Message {
    Message::with_id(id, user, Vec::new(), Vec::new())
}

fn open_page(broker: &LocalBroker, seed: Vec<Message>) -> AnkaSession<anka_core::LocalFeedClient> {
    let config = SessionConfig::new("1", "host", "viewer");
    AnkaSession::start(config, broker.client().unwrap(), seed).expect("session opens")
}

#[test]
fn start_joins_page_channel() {
    let broker = LocalBroker::new();
    let session = open_page(&broker, Vec::new());

    assert_eq!(session.status(), FeedStatus::Live);
    assert_eq!(broker.subscriber_count("1"), 1);
}

#[test]
fn delivered_messages_append_once_in_arrival_order() {
    let broker = LocalBroker::new();
    let seed: Vec<Message> = (0..7).map(|i| message(&format!("seed-{i}"), "u1")).collect();
    let mut session = open_page(&broker, seed);

    for id in ["a", "b", "c"] {
        assert_eq!(broker.deliver("1", &message(id, "u2")).unwrap(), 1);
    }

    assert_eq!(session.pump(), 3);
    assert_eq!(session.pump(), 0);

    let tail: Vec<&str> = session.store().messages()[7..]
        .iter()
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(tail, vec!["a", "b", "c"]);
    assert_eq!(session.store().len(), 10);
}

#[test]
fn messages_for_other_pages_are_not_received() {
    let broker = LocalBroker::new();
    let mut session = open_page(&broker, Vec::new());

    assert_eq!(broker.deliver("2", &message("x", "u2")).unwrap(), 0);
    assert_eq!(session.pump(), 0);
    assert!(session.store().is_empty());
}

#[test]
fn malformed_frames_are_skipped() {
    let broker = LocalBroker::new();
    let mut session = open_page(&broker, Vec::new());

    broker.deliver("1", &message("a", "u2")).unwrap();
    broker.deliver_raw("1", "{not json").unwrap();
    broker.deliver_raw("1", r#"{"event":"join","data":"1"}"#).unwrap();
    broker.deliver("1", &message("b", "u2")).unwrap();

    assert_eq!(session.pump(), 2);
    let ids: Vec<&str> = session.store().messages().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(session.status(), FeedStatus::Live);
}

#[test]
fn broker_outage_keeps_state_and_reconnect_resumes() {
    let broker = LocalBroker::new();
    let mut session = open_page(&broker, vec![message("seed", "u1")]);

    broker.deliver("1", &message("before", "u2")).unwrap();
    broker.set_online(false).unwrap();

    assert_eq!(session.pump(), 1, "queued frames drain before the outage is seen");
    assert_eq!(session.pump(), 0);
    assert_eq!(session.status(), FeedStatus::Disconnected);
    assert_eq!(session.store().len(), 2);

    let err = session.reconnect().expect_err("broker still offline");
    assert_eq!(err, anka_core::SessionError::Feed(FeedError::Disconnected));

    broker.set_online(true).unwrap();
    session.reconnect().expect("reconnect succeeds");
    assert_eq!(session.status(), FeedStatus::Live);

    broker.deliver("1", &message("after", "u2")).unwrap();
    assert_eq!(session.pump(), 1);
    let ids: Vec<&str> = session.store().messages().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["seed", "before", "after"]);
}

#[test]
fn reconnect_while_live_keeps_frames_delivered_before_rejoin() {
    let broker = LocalBroker::new();
    let mut session = open_page(&broker, Vec::new());

    broker.deliver("1", &message("a", "u2")).unwrap();
    session.reconnect().expect("reconnect while live");
    assert_eq!(broker.subscriber_count("1"), 1);
    broker.deliver("1", &message("b", "u2")).unwrap();

    assert_eq!(session.pump(), 2);
    let ids: Vec<&str> = session.store().messages().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(session.status(), FeedStatus::Live);
}

#[test]
fn failed_send_keeps_frames_delivered_before_outage() {
    let broker = LocalBroker::new();
    let mut session = open_page(&broker, Vec::new());

    broker.deliver("1", &message("a", "u2")).unwrap();
    broker.set_online(false).unwrap();
    let sent = session.send("hi").expect("send keeps the local message");

    assert_eq!(session.status(), FeedStatus::Disconnected);
    assert!(!session.feed().is_connected());
    assert_eq!(session.pump(), 1);
    assert_eq!(session.pump(), 0);
    let ids: Vec<&str> = session.store().messages().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec![sent.as_str(), "a"]);
}

#[test]
fn start_while_offline_opens_disconnected() {
    let broker = LocalBroker::new();
    broker.set_online(false).unwrap();

    let session = open_page(&broker, vec![message("seed", "u1")]);

    assert_eq!(session.status(), FeedStatus::Disconnected);
    assert_eq!(session.store().len(), 1);
}

#[test]
fn close_and_drop_release_subscription() {
    let broker = LocalBroker::new();
    let mut session = open_page(&broker, Vec::new());
    session.close().unwrap();
    session.close().unwrap();
    assert_eq!(broker.subscriber_count("1"), 0);
    assert_eq!(session.status(), FeedStatus::Closed);
    assert_eq!(
        session.send("hi"),
        Err(anka_core::SessionError::Closed)
    );

    {
        let _dropped = open_page(&broker, Vec::new());
        assert_eq!(broker.subscriber_count("1"), 1);
    }
    assert_eq!(broker.subscriber_count("1"), 0);
}

#[test]
fn sent_messages_reach_other_members_only() {
    let broker = LocalBroker::new();
    let mut alice = open_page(&broker, Vec::new());
    let mut bob_feed = broker.client().unwrap();
    bob_feed.connect().unwrap();
    bob_feed.join_channel("1").unwrap();

    let id = alice.send("hello [[dice]]").unwrap();

    assert_eq!(alice.pump(), 0);
    let received = bob_feed.next_message().unwrap().expect("bob receives");
    assert_eq!(received.id, id);
    assert_eq!(received.user_id, "viewer");
    assert_eq!(alice.store().last().unwrap().id, id);
}
