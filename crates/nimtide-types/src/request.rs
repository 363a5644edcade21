// ABOUTME: Completion request types shared across the adapter
// ABOUTME: Cursor coordinates are 1-based in both line and column

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 1-based cursor coordinates as reported by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A completion or navigation request from the host framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Path of the file the request refers to.
    pub file_path: PathBuf,

    /// Current in-editor text, which may differ from the on-disk file.
    pub buffer_contents: String,

    /// Cursor position the request refers to.
    pub cursor: Position,
}
