//! Pure classification pieces: fast-path rules, classifier prompt, and
//! lenient parsing of the classifier's structured output.
//!
//! Parse failure is a soft error here; the router maps it to
//! [`Intent::fallback`] rather than surfacing it.

use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::conversation::FlowContext;

use super::extractor::extract_entities;
use super::model::{Intent, IntentKind};

/// Temperature used for classification calls (near-deterministic).
pub const CLASSIFY_TEMPERATURE: f32 = 0.1;

/// Question openers that mark an utterance as a follow-up candidate.
///
/// Ordered rule table; matched against the lowercased, trimmed utterance.
const QUESTION_PREFIXES: &[&str] = &[
    "should ",
    "would ",
    "could ",
    "can ",
    "do i ",
    "is it ",
    "what about",
    "what if",
];

/// System instruction for the classification call.
static SYSTEM_PROMPT: Lazy<String> = Lazy::new(|| {
    let labels: Vec<&str> = IntentKind::ALL.iter().map(|k| k.as_str()).collect();
    format!(
        "You are an intent classifier for an appliance-parts support assistant. \
         Classify the user's latest message into exactly one intent from this list: {}. \
         Respond with a single JSON object: \
         {{\"intent\": \"<label>\", \"confidence\": <0..1>, \
         \"part_number\": \"<id or null>\", \"model_number\": \"<id or null>\"}}. \
         Output only the JSON object, no prose.",
        labels.join(", ")
    )
});

/// Returns the classifier system instruction.
pub fn system_prompt() -> &'static str {
    &SYSTEM_PROMPT
}

/// Fast-path classification, no provider call.
///
/// A questioning utterance arriving while the conversation topic is
/// troubleshooting is a follow-up to the diagnostic steps just given.
pub fn fast_path_intent(utterance: &str, flow: &FlowContext) -> Option<Intent> {
    if !flow.in_troubleshooting() {
        return None;
    }
    let lowered = utterance.trim().to_lowercase();
    if QUESTION_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
        Some(Intent::follow_up())
    } else {
        None
    }
}

/// Classifier output failed to parse as valid structured data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassificationParseError {
    #[error("no JSON object found in classifier output")]
    NoJsonObject,

    #[error("classifier output is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("unknown intent label: {0}")]
    UnknownLabel(String),
}

/// Wire shape of the classifier's structured output.
#[derive(Debug, Deserialize)]
struct ClassificationWire {
    intent: String,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    part_number: Option<String>,
    #[serde(default)]
    model_number: Option<String>,
}

/// Parses the classifier's raw output into an [`Intent`].
///
/// Tolerates code fences and surrounding prose by slicing the outermost
/// JSON object. Entities missing from the structured output are filled in
/// from local extraction over `utterance`.
pub fn parse_classification(raw: &str, utterance: &str) -> Result<Intent, ClassificationParseError> {
    let json = slice_json_object(raw).ok_or(ClassificationParseError::NoJsonObject)?;
    let wire: ClassificationWire = serde_json::from_str(json)
        .map_err(|e| ClassificationParseError::InvalidJson(e.to_string()))?;

    let kind = IntentKind::from_label(&wire.intent)
        .ok_or_else(|| ClassificationParseError::UnknownLabel(wire.intent.clone()))?;

    let mut entities = extract_entities(utterance);
    if let Some(part) = wire.part_number.filter(|p| !p.is_empty() && p != "null") {
        entities.part_number = Some(part.to_uppercase());
    }
    if let Some(model) = wire.model_number.filter(|m| !m.is_empty() && m != "null") {
        entities.model_number = Some(model.to_uppercase());
    }

    Ok(Intent::new(kind, wire.confidence.unwrap_or(0.7)).with_entities(entities))
}

/// Returns the outermost `{...}` span of `raw`, if any.
fn slice_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end > start {
        Some(&raw[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::{ConversationStage, ConversationTopic};

    fn troubleshooting_flow() -> FlowContext {
        FlowContext {
            topic: Some(ConversationTopic::Troubleshooting),
            stage: ConversationStage::DiagnosticGiven,
        }
    }

    #[test]
    fn fast_path_fires_for_question_in_troubleshooting() {
        let intent = fast_path_intent("Should I call a technician?", &troubleshooting_flow())
            .expect("fast path should fire");
        assert_eq!(intent.kind, IntentKind::GeneralQuestion);
        assert!(intent.entities.is_follow_up);
        assert!(intent.confidence >= 0.9);
    }

    #[test]
    fn fast_path_requires_troubleshooting_topic() {
        let flow = FlowContext::initial();
        assert_eq!(fast_path_intent("Should I call a technician?", &flow), None);
    }

    #[test]
    fn fast_path_requires_question_prefix() {
        assert_eq!(
            fast_path_intent("my dryer is still broken", &troubleshooting_flow()),
            None
        );
    }

    #[test]
    fn parses_clean_json() {
        let raw = r#"{"intent": "compatibility_check", "confidence": 0.92}"#;
        let intent = parse_classification(raw, "does PS11752778 fit WDT780SAEM1?").unwrap();
        assert_eq!(intent.kind, IntentKind::CompatibilityCheck);
        assert!((intent.confidence - 0.92).abs() < f32::EPSILON);
        // Entities filled from local extraction.
        assert_eq!(intent.entities.part_number.as_deref(), Some("PS11752778"));
        assert_eq!(intent.entities.model_number.as_deref(), Some("WDT780SAEM1"));
    }

    #[test]
    fn parses_fenced_json() {
        let raw = "```json\n{\"intent\": \"order_support\", \"confidence\": 0.8}\n```";
        let intent = parse_classification(raw, "where is my order").unwrap();
        assert_eq!(intent.kind, IntentKind::OrderSupport);
    }

    #[test]
    fn structured_entities_override_extraction() {
        let raw = r#"{"intent": "product_search", "part_number": "ps99999999"}"#;
        let intent = parse_classification(raw, "looking for PS11752778").unwrap();
        assert_eq!(intent.entities.part_number.as_deref(), Some("PS99999999"));
    }

    #[test]
    fn rejects_prose_only_output() {
        let err = parse_classification("I think this is a product search.", "any").unwrap_err();
        assert_eq!(err, ClassificationParseError::NoJsonObject);
    }

    #[test]
    fn rejects_unknown_label() {
        let raw = r#"{"intent": "chitchat"}"#;
        assert!(matches!(
            parse_classification(raw, "hi").unwrap_err(),
            ClassificationParseError::UnknownLabel(_)
        ));
    }

    #[test]
    fn system_prompt_lists_all_labels() {
        for kind in IntentKind::ALL {
            assert!(system_prompt().contains(kind.as_str()));
        }
    }
}
