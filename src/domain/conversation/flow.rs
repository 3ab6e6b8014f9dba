//! Conversation flow analysis.
//!
//! Derives a coarse topic and stage from recent history without calling any
//! provider. The analyzer is a pure function: deterministic, no I/O, zero
//! latency. It is used both to short-circuit intent classification for
//! obvious follow-ups and to decide when a wrap-up offer is appropriate.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::turn::{recent_window, ConversationTurn, Role};

/// Number of trailing turns the analyzer inspects.
pub const FLOW_WINDOW: usize = 5;

/// Coarse topic of the ongoing conversation, inferred from the most recent
/// assistant turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationTopic {
    Troubleshooting,
    Compatibility,
    Installation,
    ProductRecommendation,
}

impl fmt::Display for ConversationTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversationTopic::Troubleshooting => "troubleshooting",
            ConversationTopic::Compatibility => "compatibility",
            ConversationTopic::Installation => "installation",
            ConversationTopic::ProductRecommendation => "product_recommendation",
        };
        write!(f, "{s}")
    }
}

/// Stage of the conversation relative to the assistant's last move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStage {
    /// No history yet.
    Initial,
    /// The assistant just issued diagnostic steps.
    DiagnosticGiven,
    /// Anything else mid-conversation.
    Ongoing,
}

/// Result of flow analysis over recent history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowContext {
    pub topic: Option<ConversationTopic>,
    pub stage: ConversationStage,
}

impl FlowContext {
    /// Context for an empty conversation.
    pub fn initial() -> Self {
        Self {
            topic: None,
            stage: ConversationStage::Initial,
        }
    }

    /// True when the last assistant move was a troubleshooting exchange.
    pub fn in_troubleshooting(&self) -> bool {
        self.topic == Some(ConversationTopic::Troubleshooting)
    }
}

/// Ordered topic rules: the first rule with any matching marker wins.
///
/// Kept as an explicit table so coverage is enumerable and testable in
/// isolation from the provider-calling path.
const TOPIC_RULES: &[(&[&str], ConversationTopic)] = &[
    (
        &["step 1", "try the following", "check whether", "unplug", "diagnos"],
        ConversationTopic::Troubleshooting,
    ),
    (
        &["compatible", "compatibility", "fits your model", "fit your model"],
        ConversationTopic::Compatibility,
    ),
    (
        &["install", "installation", "replace the old", "mounting"],
        ConversationTopic::Installation,
    ),
    (
        &["recommend", "here are some parts", "you might need", "matching parts"],
        ConversationTopic::ProductRecommendation,
    ),
];

/// Markers indicating the assistant just handed out diagnostic steps.
const DIAGNOSTIC_MARKERS: &[&str] = &["step 1", "try the following", "start by checking"];

/// Analyzes the last [`FLOW_WINDOW`] turns of `history`.
///
/// Finds the most recent assistant turn and pattern-matches its content.
pub fn analyze_flow(history: &[ConversationTurn]) -> FlowContext {
    if history.is_empty() {
        return FlowContext::initial();
    }

    let window = recent_window(history, FLOW_WINDOW);
    let last_assistant = window
        .iter()
        .rev()
        .find(|turn| turn.role == Role::Assistant);

    let Some(turn) = last_assistant else {
        return FlowContext {
            topic: None,
            stage: ConversationStage::Ongoing,
        };
    };

    let content = turn.content.to_lowercase();
    let topic = TOPIC_RULES
        .iter()
        .find(|(markers, _)| markers.iter().any(|m| content.contains(m)))
        .map(|(_, topic)| *topic);

    let stage = if DIAGNOSTIC_MARKERS.iter().any(|m| content.contains(m)) {
        ConversationStage::DiagnosticGiven
    } else {
        ConversationStage::Ongoing
    };

    FlowContext { topic, stage }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_is_initial() {
        let flow = analyze_flow(&[]);
        assert_eq!(flow.stage, ConversationStage::Initial);
        assert_eq!(flow.topic, None);
    }

    #[test]
    fn diagnostic_steps_set_stage_and_topic() {
        let history = vec![
            ConversationTurn::user("my ice maker stopped working"),
            ConversationTurn::assistant(
                "Let's narrow it down. Step 1: unplug the fridge for two minutes.",
            ),
        ];
        let flow = analyze_flow(&history);
        assert_eq!(flow.stage, ConversationStage::DiagnosticGiven);
        assert_eq!(flow.topic, Some(ConversationTopic::Troubleshooting));
        assert!(flow.in_troubleshooting());
    }

    #[test]
    fn compatibility_reply_sets_topic() {
        let history = vec![
            ConversationTurn::user("will PS11752778 work for me?"),
            ConversationTurn::assistant("Good news, that part is compatible with your model."),
        ];
        let flow = analyze_flow(&history);
        assert_eq!(flow.topic, Some(ConversationTopic::Compatibility));
        assert_eq!(flow.stage, ConversationStage::Ongoing);
    }

    #[test]
    fn only_user_turns_means_no_topic() {
        let history = vec![ConversationTurn::user("hello"), ConversationTurn::user("anyone?")];
        let flow = analyze_flow(&history);
        assert_eq!(flow.topic, None);
        assert_eq!(flow.stage, ConversationStage::Ongoing);
    }

    #[test]
    fn analyzer_only_sees_recent_window() {
        let mut history = vec![ConversationTurn::assistant("Step 1: check the door seal.")];
        // Six newer turns push the diagnostic reply out of the window.
        for i in 0..6 {
            history.push(ConversationTurn::user(format!("unrelated {i}")));
        }
        let flow = analyze_flow(&history);
        assert_eq!(flow.topic, None);
    }

    #[test]
    fn topic_rules_are_ordered_first_match_wins() {
        // "install" appears but the troubleshooting rule is earlier.
        let history = vec![ConversationTurn::assistant(
            "Step 1: remove the install bracket and check the valve.",
        )];
        let flow = analyze_flow(&history);
        assert_eq!(flow.topic, Some(ConversationTopic::Troubleshooting));
    }
}
