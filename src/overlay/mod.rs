use crate::catalog::Catalog;
use crate::debounce::Debounce;
use crate::decide;
use crate::types::{EditorEvent, OverlayOutput};
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

// ===================================================================
// Percentage validation
// ===================================================================

/// Why a user-entered percentage string was rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum PercentageError {
    NotANumber,
    OutOfRange(i64),
}

impl fmt::Display for PercentageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentageError::NotANumber => {
                write!(f, "enter a whole number between 1 and 100")
            }
            PercentageError::OutOfRange(value) => {
                write!(f, "{value} is out of range; enter a whole number between 1 and 100")
            }
        }
    }
}

/// Parse the raw string from a `setPercentage` prompt.
pub fn parse_percentage(raw: &str) -> Result<u8, PercentageError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| PercentageError::NotANumber)?;
    if !(1..=100).contains(&value) {
        return Err(PercentageError::OutOfRange(value));
    }
    Ok(value as u8)
}

// ===================================================================
// Overlay state
// ===================================================================

/// In-memory overlay state: which documents are open, which one is
/// displayed, whether annotations are on, and the current gate
/// percentage. Handlers take `now` explicitly and return the outputs
/// to emit, so the whole state machine runs without a clock or I/O.
pub struct Overlay {
    enabled: bool,
    percentage: u8,
    catalog: Catalog,
    /// uri -> full document text, tracked while the host reports the
    /// document open.
    documents: HashMap<String, String>,
    /// The uri the host currently displays, if any.
    active: Option<String>,
    debounce: Debounce,
}

impl Overlay {
    pub fn new(percentage: u8, catalog: Catalog, window: Duration) -> Self {
        Self {
            enabled: true,
            percentage,
            catalog,
            documents: HashMap::new(),
            active: None,
            debounce: Debounce::new(window),
        }
    }

    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Time until the pending repaint fires, for the event loop's
    /// receive timeout.
    pub fn until_deadline(&self, now: Instant) -> Option<Duration> {
        self.debounce.remaining(now)
    }

    // ---------------------------------------------------------------
    // Event dispatch
    // ---------------------------------------------------------------

    pub fn handle(&mut self, event: EditorEvent, now: Instant) -> Vec<OverlayOutput> {
        match event {
            EditorEvent::DocumentOpened { uri, text } => self.document_opened(uri, text),
            EditorEvent::DocumentChanged { uri, text } => self.document_changed(uri, text, now),
            EditorEvent::EditorFocused { uri } => self.editor_focused(uri, now),
            EditorEvent::DocumentClosed { uri } => self.document_closed(&uri),
            EditorEvent::ToggleAnnotations => self.toggle(),
            EditorEvent::SetPercentage { value } => self.set_percentage(&value),
        }
    }

    /// Repaint the pending document once its quiet period has elapsed.
    pub fn fire_due(&mut self, now: Instant) -> Option<OverlayOutput> {
        let uri = self.debounce.fire(now)?;
        self.repaint(&uri)
    }

    // ---------------------------------------------------------------
    // Document and focus events
    // ---------------------------------------------------------------

    fn document_opened(&mut self, uri: String, text: String) -> Vec<OverlayOutput> {
        self.documents.insert(uri.clone(), text);
        // The first document opened counts as displayed until the host
        // says otherwise.
        if self.active.is_none() {
            self.active = Some(uri.clone());
        }
        if self.active.as_deref() == Some(uri.as_str()) {
            return self.repaint(&uri).into_iter().collect();
        }
        Vec::new()
    }

    fn document_changed(&mut self, uri: String, text: String, now: Instant) -> Vec<OverlayOutput> {
        self.documents.insert(uri.clone(), text);
        if self.enabled {
            self.debounce.schedule(&uri, now);
        }
        Vec::new()
    }

    fn editor_focused(&mut self, uri: String, now: Instant) -> Vec<OverlayOutput> {
        self.active = Some(uri.clone());
        if self.enabled && self.documents.contains_key(&uri) {
            self.debounce.schedule(&uri, now);
        }
        Vec::new()
    }

    fn document_closed(&mut self, uri: &str) -> Vec<OverlayOutput> {
        self.documents.remove(uri);
        self.debounce.cancel_for(uri);
        if self.active.as_deref() == Some(uri) {
            self.active = None;
        }
        Vec::new()
    }

    // ---------------------------------------------------------------
    // Commands
    // ---------------------------------------------------------------

    fn toggle(&mut self) -> Vec<OverlayOutput> {
        self.enabled = !self.enabled;
        if self.enabled {
            let mut outputs = vec![notice("[gaslighter] annotations on".into())];
            if let Some(uri) = self.active.clone() {
                outputs.extend(self.repaint(&uri));
            }
            outputs
        } else {
            self.debounce.cancel();
            let mut outputs = vec![notice("[gaslighter] annotations off".into())];
            // Clear whatever the host is currently showing.
            if let Some(uri) = &self.active {
                outputs.push(OverlayOutput::Annotations {
                    uri: uri.clone(),
                    annotations: Vec::new(),
                });
            }
            outputs
        }
    }

    fn set_percentage(&mut self, raw: &str) -> Vec<OverlayOutput> {
        let value = match parse_percentage(raw) {
            Ok(value) => value,
            Err(err) => {
                return vec![OverlayOutput::InvalidValue {
                    message: err.to_string(),
                }];
            }
        };
        self.percentage = value;
        self.debounce.cancel();
        let mut outputs = vec![notice(format!("[gaslighter] gate percentage set to {value}"))];
        if let Some(uri) = self.active.clone() {
            outputs.extend(self.repaint(&uri));
        }
        outputs
    }

    // ---------------------------------------------------------------
    // Repainting
    // ---------------------------------------------------------------

    /// Recompute the full annotation set for `uri`. Quiet while the
    /// overlay is disabled or the document is no longer open.
    fn repaint(&self, uri: &str) -> Option<OverlayOutput> {
        if !self.enabled {
            return None;
        }
        let text = self.documents.get(uri)?;
        Some(OverlayOutput::Annotations {
            uri: uri.to_string(),
            annotations: decide::annotate_text(text, self.percentage, &self.catalog),
        })
    }
}

fn notice(message: String) -> OverlayOutput {
    OverlayOutput::Notice { message }
}
