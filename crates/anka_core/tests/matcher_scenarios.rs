use anka_core::{
    reference_element_types, AnkaElement, AnkaElementType, AnkaMatcher, Message, MatchRuleKind,
    MessageStore,
};

fn message(id: &str, user: &str, types: &[AnkaElementType]) -> Message {
    Message::with_id(
        id,
        user,
        Vec::new(),
        types.iter().copied().map(AnkaElement::new).collect(),
    )
}

#[test]
fn host_reply_scenario_flags_only_matching_reply() {
    let messages = vec![
        message("1", "host", &[AnkaElementType::Dice]),
        message("2", "u2", &[AnkaElementType::Dice]),
        message("3", "u3", &[AnkaElementType::Color]),
    ];

    let report = AnkaMatcher::default().evaluate(&messages, "host");

    let reference = report.reference.as_ref().expect("host reference exists");
    assert_eq!(reference.message_id, "1");
    assert!(report.is_flagged(1));
    assert!(!report.is_flagged(2));
    let non_host_matches: Vec<&str> = messages
        .iter()
        .zip(&report.flags)
        .filter(|(message, flagged)| **flagged && message.user_id != "host")
        .map(|(message, _)| message.id.as_str())
        .collect();
    assert_eq!(non_host_matches, vec!["2"]);
}

#[test]
fn no_host_elements_means_no_matches() {
    let messages = vec![
        message("1", "host", &[]),
        message("2", "u2", &[AnkaElementType::Dice]),
        message("3", "u3", &[AnkaElementType::Color, AnkaElementType::Emoji]),
    ];

    let report = AnkaMatcher::default().evaluate(&messages, "host");

    assert!(report.reference.is_none());
    assert!(report.matched_ids.is_empty());
    assert!(report.flags.iter().all(|flag| !flag));
    assert!(report.latest_host_elements().is_empty());
}

#[test]
fn empty_sequence_has_no_reference() {
    let report = AnkaMatcher::default().evaluate(&[], "host");
    assert!(report.reference.is_none());
    assert!(report.flags.is_empty());
}

#[test]
fn reference_comes_from_latest_host_message_only() {
    let messages = vec![
        message("1", "host", &[AnkaElementType::Dice]),
        message("2", "u2", &[AnkaElementType::Dice]),
        message("3", "host", &[AnkaElementType::Color]),
        message("4", "u3", &[AnkaElementType::Color]),
        message("5", "u4", &[AnkaElementType::Dice]),
    ];

    let report = AnkaMatcher::default().evaluate(&messages, "host");

    assert_eq!(report.reference.as_ref().unwrap().message_id, "3");
    assert_eq!(
        reference_element_types(&messages, "host").into_iter().collect::<Vec<_>>(),
        vec![AnkaElementType::Color]
    );
    assert!(!report.is_flagged(1), "earlier reference must not be used");
    assert!(report.is_flagged(3));
    assert!(!report.is_flagged(4));
}

#[test]
fn later_host_message_without_elements_keeps_previous_reference() {
    let messages = vec![
        message("1", "host", &[AnkaElementType::Number]),
        message("2", "host", &[]),
        message("3", "u2", &[AnkaElementType::Number]),
    ];

    let report = AnkaMatcher::default().evaluate(&messages, "host");

    assert_eq!(report.reference.as_ref().unwrap().message_id, "1");
    assert!(report.is_id_matched("3"));
}

#[test]
fn coverage_rule_requires_all_reference_types() {
    let messages = vec![
        message("1", "host", &[AnkaElementType::Dice, AnkaElementType::Choice]),
        message("2", "u2", &[AnkaElementType::Dice]),
        message("3", "u3", &[AnkaElementType::Choice, AnkaElementType::Dice]),
    ];

    let report = AnkaMatcher::from_kind(MatchRuleKind::Coverage).evaluate(&messages, "host");

    assert!(!report.is_id_matched("2"));
    assert!(report.is_id_matched("3"));
}

#[test]
fn matches_follow_store_growth_without_accumulating() {
    let matcher = AnkaMatcher::default();
    let mut store = MessageStore::initialize(vec![message("1", "host", &[AnkaElementType::Dice])]);

    store.append(message("2", "u2", &[AnkaElementType::Dice]));
    let first = matcher.evaluate(store.messages(), "host");
    store.append(message("3", "u3", &[AnkaElementType::Dice]));
    let second = matcher.evaluate(store.messages(), "host");
    let third = matcher.evaluate(store.messages(), "host");

    assert_eq!(first.matched_ids, vec!["1", "2"]);
    assert_eq!(second.matched_ids, vec!["1", "2", "3"]);
    assert_eq!(second, third);
}
