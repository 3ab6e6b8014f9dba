//! Per-user session context slots.
//!
//! Carries partial multi-turn facts (a part number given one turn, the model
//! number expected the next) across requests. Advisory, not transactional:
//! concurrent writes for the same user are last-write-wins, and the
//! orchestration layer must stay correct when the context is absent.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::ConversationTopic;
use crate::domain::intent::IntentKind;

/// Marker naming the slot the system is waiting for the user to fill.
///
/// At most one marker is active at a time; `expecting` is an `Option`, so
/// setting a new marker structurally overwrites the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expecting {
    /// A part number is stored; waiting on the model number to check fit.
    ModelNumberForCompat,
    /// A model number is stored; waiting on the part number to check fit.
    PartNumberForCompat,
}

/// Named slots scoped to one user, expiring together after an idle window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_part_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_model_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expecting: Option<Expecting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_intent: Option<IntentKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_topic: Option<ConversationTopic>,
}

impl SessionContext {
    /// Empty context, as returned for unknown or expired users.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no slot carries a value.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Takes the active expecting marker, clearing it.
    pub fn take_expecting(&mut self) -> Option<Expecting> {
        self.expecting.take()
    }

    /// Clears the slots belonging to a compatibility sub-flow.
    ///
    /// Called when the flow resolves so a later "does it fit" question starts
    /// fresh instead of reusing stale identifiers.
    pub fn clear_compat_flow(&mut self) {
        self.last_part_number = None;
        self.last_model_number = None;
        self.expecting = None;
    }
}
