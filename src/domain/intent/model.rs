//! Intent model: closed intent set plus per-turn classification result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of request intents.
///
/// Adding a variant is a compile-time-checked extension: the orchestrator's
/// handler registry is built over all variants, so a missing handler is
/// caught at construction, not at dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    ProductSearch,
    CompatibilityCheck,
    Troubleshooting,
    InstallationHelp,
    OrderSupport,
    GeneralQuestion,
    OutOfScope,
}

impl IntentKind {
    /// All intent kinds, in dispatch-registry order.
    pub const ALL: [IntentKind; 7] = [
        IntentKind::ProductSearch,
        IntentKind::CompatibilityCheck,
        IntentKind::Troubleshooting,
        IntentKind::InstallationHelp,
        IntentKind::OrderSupport,
        IntentKind::GeneralQuestion,
        IntentKind::OutOfScope,
    ];

    /// Canonical wire label (matches the classifier's output vocabulary).
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::ProductSearch => "product_search",
            IntentKind::CompatibilityCheck => "compatibility_check",
            IntentKind::Troubleshooting => "troubleshooting",
            IntentKind::InstallationHelp => "installation_help",
            IntentKind::OrderSupport => "order_support",
            IntentKind::GeneralQuestion => "general_question",
            IntentKind::OutOfScope => "out_of_scope",
        }
    }

    /// Parses a wire label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        Self::ALL.iter().copied().find(|k| k.as_str() == label)
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured entities extracted alongside an intent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentEntities {
    /// Part identifier mentioned in the utterance (e.g. "PS11752778").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    /// Appliance model identifier (e.g. "WDT780SAEM1").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_number: Option<String>,
    /// True when the utterance continues the previous exchange.
    #[serde(default)]
    pub is_follow_up: bool,
}

impl IntentEntities {
    /// Fills any missing slot from `other`, keeping existing values.
    pub fn merge_missing_from(&mut self, other: &IntentEntities) {
        if self.part_number.is_none() {
            self.part_number = other.part_number.clone();
        }
        if self.model_number.is_none() {
            self.model_number = other.model_number.clone();
        }
        self.is_follow_up |= other.is_follow_up;
    }
}

/// Per-turn classification result.
///
/// Produced fresh each turn; never persisted beyond the current request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    /// Classifier confidence in [0, 1].
    pub confidence: f32,
    pub entities: IntentEntities,
}

impl Intent {
    /// Creates an intent, clamping confidence into [0, 1].
    pub fn new(kind: IntentKind, confidence: f32) -> Self {
        Self {
            kind,
            confidence: confidence.clamp(0.0, 1.0),
            entities: IntentEntities::default(),
        }
    }

    /// Attaches entities.
    pub fn with_entities(mut self, entities: IntentEntities) -> Self {
        self.entities = entities;
        self
    }

    /// Default intent when classification cannot produce a usable result.
    pub fn fallback() -> Self {
        Self::new(IntentKind::GeneralQuestion, 0.5)
    }

    /// Fast-path intent for a follow-up question inside troubleshooting.
    pub fn follow_up() -> Self {
        let mut intent = Self::new(IntentKind::GeneralQuestion, 0.9);
        intent.entities.is_follow_up = true;
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for kind in IntentKind::ALL {
            assert_eq!(IntentKind::from_label(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn label_parse_is_case_insensitive() {
        assert_eq!(
            IntentKind::from_label(" Compatibility_Check "),
            Some(IntentKind::CompatibilityCheck)
        );
        assert_eq!(IntentKind::from_label("order status"), None);
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(Intent::new(IntentKind::OrderSupport, 1.7).confidence, 1.0);
        assert_eq!(Intent::new(IntentKind::OrderSupport, -0.2).confidence, 0.0);
    }

    #[test]
    fn fallback_shape() {
        let intent = Intent::fallback();
        assert_eq!(intent.kind, IntentKind::GeneralQuestion);
        assert_eq!(intent.confidence, 0.5);
        assert_eq!(intent.entities, IntentEntities::default());
    }

    #[test]
    fn merge_keeps_existing_slots() {
        let mut a = IntentEntities {
            part_number: Some("PS111".into()),
            model_number: None,
            is_follow_up: false,
        };
        let b = IntentEntities {
            part_number: Some("PS999".into()),
            model_number: Some("WDT780SAEM1".into()),
            is_follow_up: true,
        };
        a.merge_missing_from(&b);
        assert_eq!(a.part_number.as_deref(), Some("PS111"));
        assert_eq!(a.model_number.as_deref(), Some("WDT780SAEM1"));
        assert!(a.is_follow_up);
    }
}
