//! Intent domain: the closed intent set, entity extraction, and the pure
//! parts of classification (fast-path rules, prompt text, output parsing).
//!
//! Everything here is deterministic and provider-free; the application-layer
//! router wires these pieces to the resilient completion client.

mod classify;
mod extractor;
mod model;

pub use classify::{
    fast_path_intent, parse_classification, system_prompt, ClassificationParseError,
    CLASSIFY_TEMPERATURE,
};
pub use extractor::{extract_entities, extract_model_number, extract_part_number};
pub use model::{Intent, IntentEntities, IntentKind};
