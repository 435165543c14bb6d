use anka_core::{
    AnkaElementType, AnkaSession, LocalBroker, LocalFeedClient, MatchRuleKind, Message,
    SessionConfig, SessionError,
};

fn seed() -> Vec<Message> {
    vec![
        anka_core::parse_message_data(anka_core::MessageData {
            id: "1".to_string(),
            user_id: "host".to_string(),
            content: "next reply rolls [[dice]]".to_string(),
        }),
        anka_core::parse_message_data(anka_core::MessageData {
            id: "2".to_string(),
            user_id: "u2".to_string(),
            content: "[[dice:4]]".to_string(),
        }),
        anka_core::parse_message_data(anka_core::MessageData {
            id: "3".to_string(),
            user_id: "u3".to_string(),
            content: "[[color:blue]]".to_string(),
        }),
    ]
}

fn open(viewer: &str, rule: MatchRuleKind) -> (LocalBroker, AnkaSession<LocalFeedClient>) {
    let broker = LocalBroker::new();
    let config = SessionConfig::new("7", "host", viewer).with_match_rule(rule);
    let session = AnkaSession::start(config, broker.client().unwrap(), seed()).unwrap();
    (broker, session)
}

#[test]
fn view_flags_matching_reply_and_suppresses_host() {
    let (_broker, session) = open("viewer", MatchRuleKind::Overlap);
    let view = session.view();

    assert_eq!(view.header.host_id, "host");
    assert_eq!(view.header.latest_host_elements.len(), 1);
    assert_eq!(view.header.latest_host_elements[0].kind, AnkaElementType::Dice);
    assert_eq!(view.matched_row_ids(), vec!["2"]);

    let host_row = &view.rows[0];
    assert!(host_row.is_host);
    assert!(!host_row.is_matched);
    assert!(session.match_report().is_flagged(0), "matcher itself flags host");
}

#[test]
fn new_host_reference_reflags_existing_rows() {
    let (broker, mut session) = open("viewer", MatchRuleKind::Overlap);

    let host_update = anka_core::parse_message_data(anka_core::MessageData {
        id: "4".to_string(),
        user_id: "host".to_string(),
        content: "now pick a [[color]]".to_string(),
    });
    broker.deliver("7", &host_update).unwrap();
    assert_eq!(session.pump(), 1);

    let view = session.view();
    assert_eq!(view.matched_row_ids(), vec!["3"]);
    assert_eq!(view.header.latest_host_elements[0].kind, AnkaElementType::Color);
}

#[test]
fn send_parses_content_and_recomputes_matches() {
    let (_broker, mut session) = open("viewer", MatchRuleKind::Overlap);

    let id = session.send("  I roll [[dice:6]]  ").unwrap();

    let view = session.view();
    let row = view.rows.last().unwrap();
    assert_eq!(row.id, id);
    assert_eq!(row.user_id, "viewer");
    assert!(row.is_matched);
    assert_eq!(row.elements[0].value.as_deref(), Some("6"));
}

#[test]
fn send_rejects_blank_content() {
    let (_broker, mut session) = open("viewer", MatchRuleKind::Overlap);
    assert_eq!(session.send("   "), Err(SessionError::EmptyContent));
    assert_eq!(session.store().len(), 3);
}

#[test]
fn host_viewer_is_detected() {
    let (_broker, session) = open("host", MatchRuleKind::Coverage);
    assert!(session.is_viewer_host());
}

#[test]
fn scroll_follows_latest_until_user_scrolls_up() {
    let (broker, mut session) = open("viewer", MatchRuleKind::Overlap);
    assert_eq!(session.view().scroll.anchor(), Some(2));

    session.scroll_to(0);
    broker
        .deliver("7", &Message::with_id("9", "u9", Vec::new(), Vec::new()))
        .unwrap();
    session.pump();
    assert_eq!(session.view().scroll.anchor(), Some(0));

    session.scroll_to_latest();
    assert_eq!(session.view().scroll.anchor(), Some(3));
    assert!(session.view().scroll.follows_latest());
}

#[test]
fn start_rejects_invalid_config() {
    let broker = LocalBroker::new();
    let err = AnkaSession::start(
        SessionConfig::new(" ", "host", "viewer"),
        broker.client().unwrap(),
        Vec::new(),
    )
    .err()
    .expect("blank page id must fail");
    assert!(matches!(err, SessionError::Config(_)));
    assert_eq!(broker.subscriber_count(""), 0);
}

#[test]
fn view_serializes_for_ui_consumers() {
    let (_broker, session) = open("viewer", MatchRuleKind::Overlap);
    let json = serde_json::to_value(session.view()).unwrap();
    assert_eq!(json["feed_status"], "live");
    assert_eq!(json["rows"][1]["is_matched"], true);
    assert_eq!(json["header"]["latest_host_elements"][0]["type"], "dice");
}

#[test]
fn receive_appends_like_a_feed_event() {
    let (_broker, mut session) = open("viewer", MatchRuleKind::Overlap);

    session
        .receive(anka_core::parse_message_data(anka_core::MessageData {
            id: "5".to_string(),
            user_id: "u5".to_string(),
            content: "[[dice]] again".to_string(),
        }))
        .unwrap();

    assert_eq!(session.store().len(), 4);
    assert_eq!(session.view().matched_row_ids(), vec!["2", "5"]);

    session.close().unwrap();
    let err = session
        .receive(Message::with_id("6", "u6", Vec::new(), Vec::new()))
        .expect_err("closed session rejects appends");
    assert_eq!(err, SessionError::Closed);
}
