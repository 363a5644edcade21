// ABOUTME: Subprocess invocation of the Nim compiler's idetools subcommand
// ABOUTME: One child process per query, stdout captured, stderr logged

use std::path::Path;
use std::process::Stdio;

use nimtide_logging::{debug, warn};
use nimtide_types::Position;
use tokio::process::Command;

use crate::config::CompleterConfig;

/// Introspection mode selected by the idetools flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdeMode {
    /// Completion suggestions at the tracked position.
    #[default]
    Suggest,
    /// Definition of the symbol at the tracked position.
    Definition,
    /// Surrounding context of the tracked position.
    Context,
    /// Usages of the symbol at the tracked position.
    Usages,
}

impl IdeMode {
    /// Flag passed to the compiler.
    pub fn flag(self) -> &'static str {
        match self {
            IdeMode::Definition => "--def",
            IdeMode::Context => "--context",
            IdeMode::Usages => "--usages",
            IdeMode::Suggest => "--suggest",
        }
    }

    /// Select a mode from its request name. Anything unrecognized falls
    /// back to suggestions.
    pub fn from_name(name: &str) -> Self {
        match name {
            "definition" => IdeMode::Definition,
            "context" => IdeMode::Context,
            "usage" => IdeMode::Usages,
            _ => IdeMode::Suggest,
        }
    }
}

/// Tracking coordinate passed to the tool. The editor reports 1-based
/// columns; idetools expects them 0-based. Rows stay 1-based.
fn track_argument(file: &Path, cursor: Position) -> String {
    format!(
        "--track:{},{},{}",
        file.display(),
        cursor.line,
        cursor.column.saturating_sub(1)
    )
}

/// Run idetools against `file` at the given cursor position and return the
/// tool's stdout. Blocks until the child terminates and both output streams
/// are drained; there is no timeout.
pub(crate) async fn run_idetools(
    config: &CompleterConfig,
    mode: IdeMode,
    file: &Path,
    cursor: Position,
) -> std::io::Result<String> {
    let track = track_argument(file, cursor);

    debug!(
        nim = %config.nim_path.display(),
        mode = ?mode,
        track = %track,
        "Spawning idetools query"
    );

    let output = Command::new(&config.nim_path)
        .arg("--verbosity:0")
        .arg("idetools")
        .arg(&track)
        .arg(mode.flag())
        .arg(file)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.stderr.is_empty() {
        debug!(stderr = %String::from_utf8_lossy(&output.stderr), "idetools stderr");
    }
    if !output.status.success() {
        // idetools still emits whatever it resolved; stdout is parsed anyway
        warn!(status = ?output.status.code(), "idetools exited non-zero");
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn flags_match_the_idetools_surface() {
        assert_eq!(IdeMode::Suggest.flag(), "--suggest");
        assert_eq!(IdeMode::Definition.flag(), "--def");
        assert_eq!(IdeMode::Context.flag(), "--context");
        assert_eq!(IdeMode::Usages.flag(), "--usages");
    }

    #[test]
    fn suggest_is_the_default_mode() {
        assert_eq!(IdeMode::default(), IdeMode::Suggest);
        assert_eq!(IdeMode::from_name("definition"), IdeMode::Definition);
        assert_eq!(IdeMode::from_name("context"), IdeMode::Context);
        assert_eq!(IdeMode::from_name("usage"), IdeMode::Usages);
        assert_eq!(IdeMode::from_name("suggestion"), IdeMode::Suggest);
        assert_eq!(IdeMode::from_name("anything else"), IdeMode::Suggest);
    }

    #[test]
    fn track_argument_converts_the_column_to_zero_based() {
        let file = PathBuf::from("/tmp/a.nim");
        let track = track_argument(&file, Position::new(1, 5));
        assert_eq!(track, "--track:/tmp/a.nim,1,4");
    }

    #[test]
    fn track_argument_does_not_underflow_on_column_zero() {
        let file = PathBuf::from("a.nim");
        let track = track_argument(&file, Position::new(3, 0));
        assert_eq!(track, "--track:a.nim,3,0");
    }
}
