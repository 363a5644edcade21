// ABOUTME: Completion candidate type produced for the host framework
// ABOUTME: Pure data, built from parsed idetools suggestion records

use serde::{Deserialize, Serialize};

/// A single completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCandidate {
    /// Text inserted into the buffer: the last dotted segment of the
    /// symbol's qualified name.
    pub insert_text: String,

    /// One-line menu entry: kind label plus signature.
    pub short_description: String,

    /// Popup detail: signature, blank line, doc comment.
    pub detail_text: String,
}
