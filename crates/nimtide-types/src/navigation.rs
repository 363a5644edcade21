// ABOUTME: Go-to-definition location and the reply shapes sent to the host
// ABOUTME: Line and column are 1-based on the editor side

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::completion::CompletionCandidate;

/// Target of a go-to-definition lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoToLocation {
    /// File the definition lives in.
    pub file: PathBuf,

    /// 1-based line of the definition.
    pub line: u32,

    /// 1-based column of the definition.
    pub column: u32,

    /// Doc comment of the symbol, if the tool reported one.
    pub description: String,
}

/// The three reply shapes the adapter produces for the host framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reply {
    /// Completion candidates at the requested position.
    Candidates(Vec<CompletionCandidate>),
    /// A plain string shown to the user.
    DisplayMessage(String),
    /// A jump target.
    GoTo(GoToLocation),
}
