//! Agent response envelope.
//!
//! Every domain handler returns this shape and the orchestrator never
//! special-cases a response by handler identity.

use serde::{Deserialize, Serialize};

use crate::domain::intent::IntentKind;

/// Lightweight reference to a catalog product, as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub part_number: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// UI action attached to a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiAction {
    /// Ask the user to supply a specific value.
    InputRequest { prompt: String, field: String },
    /// Offer a closed set of choices.
    ButtonGroup { prompt: String, options: Vec<String> },
    /// Surface products in a dedicated display.
    ProductDisplay { part_numbers: Vec<String> },
    /// Link to a guide or documentation page.
    GuideLink { title: String, url: String },
    /// Offer to wrap up the conversation with suggested next steps.
    CompletionOffer { suggestions: Vec<String> },
}

impl UiAction {
    /// True when this action leaves a prompt open for the user to answer.
    ///
    /// An open prompt and a completion offer are mutually exclusive in one
    /// response; the orchestrator checks this before appending an offer.
    pub fn awaits_input(&self) -> bool {
        matches!(
            self,
            UiAction::InputRequest { .. } | UiAction::ButtonGroup { .. }
        )
    }
}

/// Intent metadata attached to the final envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub intent: IntentKind,
    pub confidence: f32,
}

/// Uniform handler output: message text, product references, UI actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<ProductRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<UiAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

impl AgentResponse {
    /// Creates a plain text response.
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            products: Vec::new(),
            actions: Vec::new(),
            metadata: None,
        }
    }

    /// Adds a product reference.
    pub fn with_product(mut self, product: ProductRef) -> Self {
        self.products.push(product);
        self
    }

    /// Adds a UI action.
    pub fn with_action(mut self, action: UiAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Attaches intent metadata.
    pub fn with_metadata(mut self, metadata: ResponseMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// True when any attached action is still waiting on user input.
    pub fn awaits_input(&self) -> bool {
        self.actions.iter().any(UiAction::awaits_input)
    }
}
