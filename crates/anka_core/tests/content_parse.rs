use anka_core::{
    parse_content, parse_message_data, AnkaElementType, ContentSegment, MessageData,
};

#[test]
fn mixed_content_splits_into_text_and_elements() {
    let parsed = parse_content("roll [[dice:6]] then pick [[choice:left]]!");

    assert_eq!(
        parsed.segments,
        vec![
            ContentSegment::Text {
                text: "roll ".to_string()
            },
            ContentSegment::Element { index: 0 },
            ContentSegment::Text {
                text: " then pick ".to_string()
            },
            ContentSegment::Element { index: 1 },
            ContentSegment::Text {
                text: "!".to_string()
            },
        ]
    );
    assert_eq!(parsed.elements[0].kind, AnkaElementType::Dice);
    assert_eq!(parsed.elements[0].value.as_deref(), Some("6"));
    assert_eq!(parsed.elements[1].kind, AnkaElementType::Choice);
}

#[test]
fn element_without_value_has_none() {
    let parsed = parse_content("[[emoji]]");
    assert_eq!(parsed.elements.len(), 1);
    assert_eq!(parsed.elements[0].value, None);

    let parsed = parse_content("[[number:   ]]");
    assert_eq!(parsed.elements[0].value, None);
}

#[test]
fn unclosed_markup_stays_text() {
    let parsed = parse_content("oops [[dice");
    assert!(parsed.elements.is_empty());
    assert_eq!(
        parsed.segments,
        vec![ContentSegment::Text {
            text: "oops [[dice".to_string()
        }]
    );
}

#[test]
fn message_data_keeps_identity_and_parses_content() {
    let data: MessageData = serde_json::from_value(serde_json::json!({
        "id": "42",
        "userId": "host",
        "content": "next reply decides [[color]]"
    }))
    .unwrap();

    let message = parse_message_data(data);

    assert_eq!(message.id, "42");
    assert_eq!(message.user_id, "host");
    assert_eq!(message.anka_elements.len(), 1);
    assert_eq!(message.plain_text(), "next reply decides [[color]]");
}

#[test]
fn plain_text_parses_back_to_the_same_content() {
    let message = parse_message_data(MessageData {
        id: "9".to_string(),
        user_id: "u9".to_string(),
        content: "roll [[dice:6]] or send [[emoji]]".to_string(),
    });

    let text = message.plain_text();
    assert_eq!(text, "roll [[dice:6]] or send [[emoji]]");
    let reparsed = parse_content(&text);
    assert_eq!(reparsed.segments, message.content);
    assert_eq!(reparsed.elements, message.anka_elements);
}
