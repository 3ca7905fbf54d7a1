//! Property-based tests using proptest

use proptest::prelude::*;
use rust_pattern_logger::prelude::*;
use rust_pattern_logger::pattern::MARKER;

fn level_strategy() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::ALL.to_vec())
}

/// Literal text free of pattern syntax
fn plain_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,:;|\\[\\]=-]{1,12}"
}

fn converter_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["level", "message", "date", "fields", "logger", "x_1"])
        .prop_map(str::to_string)
}

fn option_text() -> impl Strategy<Value = String> {
    "[a-z0-9:. -]{1,8}"
}

fn node_strategy() -> impl Strategy<Value = PatternNode> {
    let leaf = prop_oneof![
        plain_text().prop_map(PatternNode::Literal),
        (converter_name(), prop::collection::vec(option_text(), 0..3)).prop_map(
            |(name, options)| PatternNode::Converter {
                name,
                options,
                children: Vec::new(),
            }
        ),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        (
            converter_name(),
            prop::collection::vec(option_text(), 0..2),
            prop::collection::vec(inner, 1..4),
        )
            .prop_map(|(name, options, children)| PatternNode::Converter {
                name,
                options,
                children,
            })
    })
}

/// Merge adjacent literals the way the parser would produce them
fn normalize(nodes: Vec<PatternNode>) -> Vec<PatternNode> {
    let mut out: Vec<PatternNode> = Vec::new();
    for node in nodes {
        match node {
            PatternNode::Literal(text) => {
                if let Some(PatternNode::Literal(prev)) = out.last_mut() {
                    prev.push_str(&text);
                } else {
                    out.push(PatternNode::Literal(text));
                }
            }
            PatternNode::Converter {
                name,
                options,
                children,
            } => out.push(PatternNode::Converter {
                name,
                options,
                children: normalize(children),
            }),
        }
    }
    out
}

// ============================================================================
// Pattern parser properties
// ============================================================================

proptest! {
    #[test]
    fn test_pattern_display_reparses_to_same_tree(
        nodes in prop::collection::vec(node_strategy(), 0..6)
    ) {
        let pattern = Pattern::from_nodes(normalize(nodes));
        let rendered = pattern.to_string();
        let reparsed = Pattern::parse(&rendered).unwrap();
        prop_assert_eq!(reparsed, pattern);
    }

    #[test]
    fn test_plain_text_is_single_literal(text in plain_text()) {
        let pattern = Pattern::parse(&text).unwrap();
        prop_assert_eq!(pattern.nodes(), &[PatternNode::Literal(text)][..]);
    }

    #[test]
    fn test_unbalanced_open_is_rejected(
        prefix in plain_text(),
        open in prop::sample::select(vec!['(', '{'])
    ) {
        let pattern = format!("{}{}#level", prefix, open);
        let err = Pattern::parse(&pattern).unwrap_err();
        let is_parse_error = matches!(
            err,
            LoggerError::Parse { position, .. } if position == prefix.len()
        );
        prop_assert!(is_parse_error);
    }

    #[test]
    fn test_unbalanced_close_is_rejected(
        prefix in plain_text(),
        close in prop::sample::select(vec![')', '}'])
    ) {
        let pattern = format!("#message{}{}", prefix, close);
        let is_parse_error = matches!(Pattern::parse(&pattern), Err(LoggerError::Parse { .. }));
        prop_assert!(is_parse_error);
    }

    #[test]
    fn test_parser_never_panics(input in ".{0,40}") {
        let _ = Pattern::parse(&input);
    }

    #[test]
    fn test_marker_without_identifier_is_literal(suffix in "[ 0-9.,!?]{0,6}") {
        let text = format!("{}{}", MARKER, suffix);
        let pattern = Pattern::parse(&text).unwrap();
        prop_assert_eq!(pattern.nodes(), &[PatternNode::Literal(text)][..]);
    }
}

// ============================================================================
// Encoder properties
// ============================================================================

proptest! {
    #[test]
    fn test_encoded_line_is_single_line(message in ".*", level in level_strategy()) {
        let encoder = PatternEncoder::new("#level #message").unwrap();
        let line = encoder.encode_event(&LogEvent::new(level, message)).unwrap();
        prop_assert_eq!(line.last(), Some(&b'\n'));
        prop_assert_eq!(line.iter().filter(|&&b| b == b'\n').count(), 1);
    }

    #[test]
    fn test_level_and_message_render_verbatim(
        message in "[a-zA-Z0-9 ]{1,30}",
        level in level_strategy()
    ) {
        let encoder = PatternEncoder::new("#level #message").unwrap();
        let event = LogEvent::new(level, message.clone());
        let line = String::from_utf8(encoder.encode(&event.to_json().unwrap()).unwrap()).unwrap();
        prop_assert_eq!(line, format!("{} {}\n", level.to_str(), message));
    }
}

// ============================================================================
// Queue properties
// ============================================================================

proptest! {
    #[test]
    fn test_queue_preserves_fifo_order(
        capacity in 1usize..32,
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 0..64)
    ) {
        let queue = BoundedEventQueue::new(capacity).unwrap();
        let mut expected = std::collections::VecDeque::new();
        let mut received = Vec::new();

        for payload in &payloads {
            if queue.len() == capacity {
                received.push(queue.take().unwrap());
            }
            queue.put(payload).unwrap();
            expected.push_back(payload.clone());
        }
        queue.close();
        while let Some(payload) = queue.take() {
            received.push(payload);
        }

        prop_assert_eq!(received, expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_remaining_capacity_tracks_count(
        capacity in 1usize..64,
        puts in 0usize..64
    ) {
        let queue = BoundedEventQueue::new(capacity).unwrap();
        for _ in 0..puts.min(capacity) {
            queue.put(b"x").unwrap();
        }
        prop_assert_eq!(queue.len() + queue.remaining_capacity(), capacity);
        prop_assert_eq!(queue.put(b"y").is_err(), puts >= capacity);
    }
}

proptest! {
    #[test]
    fn test_log_level_str_roundtrip(level in level_strategy()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(parsed, level);
        let lower: LogLevel = level.to_str().to_lowercase().parse().unwrap();
        prop_assert_eq!(lower, level);
    }
}
