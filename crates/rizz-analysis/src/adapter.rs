//! Backend payload → [`AnalysisResult`].
//!
//! The payload is read field by field from a [`serde_json::Value`]. Missing or
//! wrongly-typed optional fields fall back to their defaults; adaptation never
//! fails.

use rizz_core::{AnalysisResult, ChatMessage, PickupLines, Profile, clamp_score};
use serde_json::{Map, Value};

/// Profile keys read for `interests`, in preference order. The first key
/// holding an array wins.
pub const INTEREST_ALIASES: [&str; 2] = ["bio_keywords", "top_hashtags"];

/// Prefix of the insight appended when the payload carries a `warning`.
pub const PARTIAL_ANALYSIS_PREFIX: &str = "Partial analysis: ";

/// Assistant preambles stripped from generated lines. Longest first.
const PREAMBLES: [&str; 6] = [
    "Sure! Here's a smart, funny, and personalized pickup line inspired by your profile details:",
    "Here's a smart, funny, and personalized pickup line inspired by your profile details:",
    "Here is a smart, funny, and personalized pickup line inspired by your profile details:",
    "Here is a pickup line inspired by your profile:",
    "Here's a pickup line inspired by your profile:",
    "Sure! ",
];

/// Map a raw analysis payload to the canonical result.
///
/// `contact_username` is the sender of every chat-history entry that does not
/// name one. `placeholder_line` fills an empty pickup-line list.
#[must_use]
pub fn adapt(payload: &Value, contact_username: &str, placeholder_line: &str) -> AnalysisResult {
    let empty = Map::new();
    let profile = payload
        .get("profile")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let mut insights = strings(payload.get("insights"));
    if let Some(warning) = payload
        .get("warning")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|w| !w.is_empty())
    {
        tracing::warn!(contact = contact_username, warning, "analysis completed with partial data");
        insights.push(format!("{PARTIAL_ANALYSIS_PREFIX}{warning}"));
    }

    let pickup_lines = strings(payload.get("pickup_lines"))
        .iter()
        .map(|line| clean_pickup_line(line))
        .filter(|line| !line.is_empty())
        .collect();

    AnalysisResult {
        messages: chat_history(payload.get("chat_history"), contact_username),
        profile: Profile {
            bio: profile
                .get("bio")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            interests: INTEREST_ALIASES
                .iter()
                .find_map(|key| profile.get(*key).filter(|v| v.is_array()))
                .map(|v| strings(Some(v)))
                .unwrap_or_default(),
            dominant_colors: strings(profile.get("color_palette")),
        },
        rizz_score: payload
            .get("rizz_score")
            .and_then(Value::as_f64)
            .and_then(clamp_score)
            .unwrap_or(0),
        insights,
        pickup_lines: PickupLines::with_placeholder(pickup_lines, placeholder_line),
        degraded: false,
    }
}

/// Strip a known assistant preamble and surrounding whitespace.
#[must_use]
pub fn clean_pickup_line(line: &str) -> String {
    let line = line.trim();
    PREAMBLES
        .iter()
        .find_map(|preamble| line.strip_prefix(preamble))
        .map_or(line, |rest| rest.trim_start_matches([' ', ':', '\n']))
        .trim_end()
        .to_string()
}

/// String elements of an array value. Anything else yields nothing.
fn strings(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn chat_history(value: Option<&Value>, contact_username: &str) -> Vec<ChatMessage> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(ChatMessage {
                sender: contact_username.to_string(),
                text: text.clone(),
                ..Default::default()
            }),
            Value::Object(fields) => {
                let field = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);
                Some(ChatMessage {
                    sender: field("sender").unwrap_or_else(|| contact_username.to_string()),
                    text: field("text")?,
                    time: field("time").unwrap_or_default(),
                    sentiment: field("sentiment").unwrap_or_default(),
                })
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rizz_core::PLACEHOLDER_PICKUP_LINE;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn canonical_fixture_maps_every_field() {
        let payload = json!({
            "success": true,
            "chat_history": ["hey!", {"text": "how was the hike?", "time": "10:02"}],
            "profile": {
                "bio": "Coffee lover. Mountain hiker.",
                "bio_keywords": ["Coffee", "lover.", "Mountain"],
                "top_hashtags": ["#ignored"],
                "color_palette": ["#FF6B6B", "#4ECDC4"],
                "links": "https://example.com"
            },
            "rizz_score": 87.4,
            "insights": ["Bio keywords: Coffee, lover., Mountain"],
            "pickup_lines": ["Sure! Are you a mountain? Because I'd climb you.", "  Line two  "],
            "dm_send_status": {"success": true}
        });

        let result = adapt(&payload, "sarah_j", PLACEHOLDER_PICKUP_LINE);

        assert_eq!(result.messages.len(), 2);
        assert_eq!(result.messages[0].sender, "sarah_j");
        assert_eq!(result.messages[1].text, "how was the hike?");
        assert_eq!(result.messages[1].time, "10:02");
        assert_eq!(result.messages[1].sentiment, "");
        assert_eq!(result.profile.bio, "Coffee lover. Mountain hiker.");
        assert_eq!(result.profile.interests, vec!["Coffee", "lover.", "Mountain"]);
        assert_eq!(result.profile.dominant_colors, vec!["#FF6B6B", "#4ECDC4"]);
        assert_eq!(result.rizz_score, 87);
        assert_eq!(result.insights, vec!["Bio keywords: Coffee, lover., Mountain"]);
        assert_eq!(
            result.pickup_lines.as_slice(),
            ["Are you a mountain? Because I'd climb you.", "Line two"]
        );
    }

    #[test]
    fn minimal_fixture_adapts_to_expected_result() {
        let payload = json!({
            "chat_history": ["hi"],
            "profile": {"bio": "b", "bio_keywords": ["x"]},
            "rizz_score": 77,
            "insights": ["i1"],
            "pickup_lines": ["p1", "p2"]
        });

        let expected = AnalysisResult {
            messages: vec![ChatMessage {
                sender: "sarah_j".into(),
                text: "hi".into(),
                ..Default::default()
            }],
            profile: Profile {
                bio: "b".into(),
                interests: vec!["x".into()],
                dominant_colors: Vec::new(),
            },
            rizz_score: 77,
            insights: vec!["i1".into()],
            pickup_lines: PickupLines::from(vec!["p1".to_string(), "p2".to_string()]),
            degraded: false,
        };
        assert_eq!(adapt(&payload, "sarah_j", PLACEHOLDER_PICKUP_LINE), expected);
    }

    #[test]
    fn top_hashtags_used_when_keywords_missing() {
        let payload = json!({"profile": {"bio_keywords": "not-a-list", "top_hashtags": ["#hike"]}});
        let result = adapt(&payload, "sarah_j", PLACEHOLDER_PICKUP_LINE);
        assert_eq!(result.profile.interests, vec!["#hike"]);
    }

    #[test]
    fn empty_payload_gets_defaults() {
        let result = adapt(&json!({}), "sarah_j", PLACEHOLDER_PICKUP_LINE);
        assert!(result.messages.is_empty());
        assert_eq!(result.profile, Profile::default());
        assert_eq!(result.rizz_score, 0);
        assert!(result.insights.is_empty());
        assert_eq!(result.pickup_lines.as_slice(), [PLACEHOLDER_PICKUP_LINE]);
    }

    #[test]
    fn mistyped_fields_are_treated_as_absent() {
        let payload = json!({
            "chat_history": "hello",
            "profile": ["not", "an", "object"],
            "rizz_score": "ninety",
            "insights": [1, "kept", null],
            "pickup_lines": "single string"
        });
        let result = adapt(&payload, "sarah_j", "nothing yet");
        assert!(result.messages.is_empty());
        assert_eq!(result.rizz_score, 0);
        assert_eq!(result.insights, vec!["kept"]);
        assert_eq!(result.pickup_lines.as_slice(), ["nothing yet"]);
    }

    #[test]
    fn blank_lines_are_dropped_before_widening() {
        let payload = json!({
            "pickup_lines": ["   ", "Here is a pickup line inspired by your profile:", ""]
        });
        let result = adapt(&payload, "sarah_j", PLACEHOLDER_PICKUP_LINE);
        assert_eq!(result.pickup_lines.as_slice(), [PLACEHOLDER_PICKUP_LINE]);
    }

    #[test]
    fn warning_becomes_partial_insight() {
        let payload = json!({
            "insights": ["Links: "],
            "warning": "Analysis completed with partial data due to error: timeout"
        });
        let result = adapt(&payload, "sarah_j", PLACEHOLDER_PICKUP_LINE);
        assert_eq!(
            result.insights,
            vec![
                "Links: ".to_string(),
                "Partial analysis: Analysis completed with partial data due to error: timeout"
                    .to_string(),
            ]
        );
    }

    #[rstest]
    #[case(json!(150), 100)]
    #[case(json!(-3), 0)]
    #[case(json!(64), 64)]
    #[case(json!(null), 0)]
    fn score_is_clamped(#[case] score: Value, #[case] expected: u8) {
        let result = adapt(&json!({"rizz_score": score}), "sarah_j", PLACEHOLDER_PICKUP_LINE);
        assert_eq!(result.rizz_score, expected);
    }

    #[rstest]
    #[case(
        "Sure! Here's a smart, funny, and personalized pickup line inspired by your profile details: \n Do you like coffee?",
        "Do you like coffee?"
    )]
    #[case("Here is a pickup line inspired by your profile:\nHi there", "Hi there")]
    #[case("Here's a pickup line inspired by your profile: : Hey", "Hey")]
    #[case("  Sure! Want to hike?  ", "Want to hike?")]
    #[case("No preamble here", "No preamble here")]
    fn preambles_are_stripped(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(clean_pickup_line(raw), expected);
    }
}
