// ===================================================================
// Built-in messages
// ===================================================================

/// The stock set of hover messages. Order matters: a line's hash picks
/// an index into this list, so reordering changes which message lands
/// on which line.
const BUILT_IN: &[&str] = &[
    "Are you sure this is right?",
    "Didn't this work differently yesterday?",
    "Someone else already fixed this line.",
    "This is the line everyone keeps asking about.",
    "Are you certain you want to keep this?",
    "This looked better before your last edit.",
    "The tests only pass because of this line. Probably.",
    "You copied this from somewhere, didn't you?",
    "This line is why the build was red on Friday.",
    "Wasn't this supposed to be temporary?",
    "Production runs a different version of this line.",
    "Your reviewer flagged this once. Remember?",
    "This works, but nobody knows why.",
    "Off by one? Just asking.",
    "This line is doing more than you think it is.",
    "The previous author regrets this line.",
    "You've rewritten this three times now.",
    "This allocates more than it should.",
    "Is this the only place that does it this way?",
    "Deleting this would probably be fine.",
    "This line shows up in the crash logs.",
    "Are you sure about that variable name?",
    "This was faster before the refactor.",
    "Somebody benchmarked this once. It lost.",
];

// ===================================================================
// Catalog
// ===================================================================

/// The fixed, ordered set of candidate messages. Built once at startup
/// and never mutated; non-emptiness is guaranteed by construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    messages: Vec<String>,
}

impl Catalog {
    /// The compiled-in message set.
    pub fn built_in() -> Self {
        Self {
            messages: BUILT_IN.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Build a catalog from a user-supplied list. Returns `None` for an
    /// empty list, which has no valid message indices.
    pub fn from_messages(messages: Vec<String>) -> Option<Self> {
        if messages.is_empty() {
            None
        } else {
            Some(Self { messages })
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn get(&self, index: usize) -> &str {
        &self.messages[index]
    }

    pub fn contains(&self, message: &str) -> bool {
        self.messages.iter().any(|m| m == message)
    }
}
