use serde::{Deserialize, Serialize};

/// Message posted by the embedded reading document to its host.
///
/// The wire form is a JSON object tagged by `type`. Anything that does not
/// parse into one of these variants is dropped by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SurfaceMessage {
    /// The document finished loading and its script is live.
    Ready,
    /// A highlight was added or removed; `html` is the full serialized
    /// inner HTML of the content root after the mutation.
    Save { html: String },
}

impl SurfaceMessage {
    /// Parses one raw message. Malformed JSON and unknown `type` values
    /// yield `None`; the caller ignores those silently.
    pub fn parse(raw: &str) -> Option<SurfaceMessage> {
        serde_json::from_str(raw).ok()
    }
}
