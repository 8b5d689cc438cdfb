use crate::decide::Annotation;
use serde::{Deserialize, Serialize};

// ===================================================================
// Editor events (received via stdin, one JSON object per line)
// ===================================================================

/// Everything the host editor can tell us, tagged by `"event"`.
///
/// Document events carry the full text; the host owns the buffer and we
/// only ever read it. Command events come from the host's palette:
/// `setPercentage` carries the raw prompt string so validation (and the
/// re-prompt on bad input) stays on this side of the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EditorEvent {
    DocumentOpened { uri: String, text: String },
    DocumentChanged { uri: String, text: String },
    EditorFocused { uri: String },
    DocumentClosed { uri: String },
    ToggleAnnotations,
    SetPercentage { value: String },
}

// ===================================================================
// Overlay outputs (written to stdout, one JSON object per line)
// ===================================================================

/// What we tell the host, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OverlayOutput {
    /// Replace-all annotation set for one document. An empty list
    /// clears the overlay for that uri.
    Annotations {
        uri: String,
        annotations: Vec<Annotation>,
    },
    /// User-visible confirmation (toggle, percentage change).
    Notice { message: String },
    /// A `setPercentage` value was rejected; the host should re-prompt
    /// with this reason.
    InvalidValue { message: String },
}
