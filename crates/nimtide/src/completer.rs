// ABOUTME: The completion adapter: buffer handoff, idetools queries, reply shaping
// ABOUTME: Every operation is a stateless spawn-read-parse round trip

use std::io::Write;

use nimtide_logging::{info, instrument};
use nimtide_types::{CompletionCandidate, CompletionRequest, GoToLocation, Reply};

use crate::config::CompleterConfig;
use crate::error::{CompleterError, Result};
use crate::idetools::{self, IdeMode};
use crate::parse::{self, DefinitionRecord};

/// Filetype identifiers this adapter accepts.
pub const SUPPORTED_FILETYPES: [&str; 2] = ["nim", "nimrod"];

/// Subcommands reachable through [`NimCompleter::dispatch`].
pub const SUPPORTED_SUBCOMMANDS: [&str; 2] = ["GoTo", "GetType"];

/// Adapter between a host completion framework and `nim idetools`.
#[derive(Debug, Clone, Default)]
pub struct NimCompleter {
    config: CompleterConfig,
}

impl NimCompleter {
    pub fn new(config: CompleterConfig) -> Self {
        Self { config }
    }

    /// Whether the adapter handles the given filetype identifier.
    pub fn supports_filetype(filetype: &str) -> bool {
        SUPPORTED_FILETYPES.contains(&filetype)
    }

    /// Compute completion candidates at the request's cursor position.
    ///
    /// The in-editor buffer may hold unsaved edits and idetools only reads
    /// files, so the buffer is written to a uniquely named temporary file
    /// for the duration of the query. The file name carries the process id
    /// plus a random token, and the file is removed on every exit path.
    #[instrument(skip(self, request), fields(file = %request.file_path.display()))]
    pub async fn compute_candidates(
        &self,
        request: &CompletionRequest,
    ) -> Result<Vec<CompletionCandidate>> {
        let mut buffer_file = tempfile::Builder::new()
            .prefix(&format!("nimtide-{}-", std::process::id()))
            .suffix(".nim")
            .tempfile()?;
        buffer_file.write_all(request.buffer_contents.as_bytes())?;
        buffer_file.flush()?;

        let stdout = idetools::run_idetools(
            &self.config,
            IdeMode::Suggest,
            buffer_file.path(),
            request.cursor,
        )
        .await?;

        let candidates: Vec<CompletionCandidate> = stdout
            .lines()
            .filter_map(parse::parse_suggestion_line)
            .collect();

        info!(count = candidates.len(), "Computed completion candidates");
        Ok(candidates)
    }

    /// Resolve the definition of the symbol under the cursor.
    ///
    /// Queries the on-disk file; unsaved buffer edits are not reflected.
    #[instrument(skip(self, request), fields(file = %request.file_path.display()))]
    pub async fn goto(&self, request: &CompletionRequest) -> Result<GoToLocation> {
        let record = self.first_definition(request).await?;
        Ok(GoToLocation {
            file: record.file.into(),
            line: record.line,
            // idetools reports 0-based columns, the editor wants 1-based
            column: record.column + 1,
            description: record.doc,
        })
    }

    /// Produce the bracketed kind/qualified-name/type display string.
    #[instrument(skip(self, request), fields(file = %request.file_path.display()))]
    pub async fn get_type(&self, request: &CompletionRequest) -> Result<String> {
        let record = self.first_definition(request).await?;

        let mut reply = format!("[{}] ({})", record.kind.label(), record.qualified_name);
        if !record.return_type.is_empty() {
            reply.push_str(": ");
            reply.push_str(&record.return_type);
        }
        Ok(reply)
    }

    /// Run one of the named subcommands against the request.
    ///
    /// Only the subcommand name itself is consumed; trailing arguments are
    /// ignored.
    pub async fn dispatch(
        &self,
        arguments: &[String],
        request: &CompletionRequest,
    ) -> Result<Reply> {
        let name = arguments.first().ok_or(CompleterError::MissingSubcommand)?;
        match name.as_str() {
            "GoTo" => Ok(Reply::GoTo(self.goto(request).await?)),
            "GetType" => Ok(Reply::DisplayMessage(self.get_type(request).await?)),
            other => Err(CompleterError::UnknownSubcommand(other.to_string())),
        }
    }

    /// First record of a definition-mode query. A symbol resolving to
    /// several definitions keeps the first match.
    async fn first_definition(&self, request: &CompletionRequest) -> Result<DefinitionRecord> {
        let stdout = idetools::run_idetools(
            &self.config,
            IdeMode::Definition,
            &request.file_path,
            request.cursor,
        )
        .await?;

        let first = stdout.lines().next().unwrap_or_default();
        DefinitionRecord::parse(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimtide_types::Position;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn request(file: &Path) -> CompletionRequest {
        CompletionRequest {
            file_path: file.to_path_buf(),
            buffer_contents: "let x = 1".to_string(),
            cursor: Position::new(1, 5),
        }
    }

    /// Stand-in for the Nim compiler: emits a fixed stdout regardless of
    /// its arguments.
    #[cfg(unix)]
    fn fake_nim(dir: &Path, stdout: &str) -> PathBuf {
        let script = if stdout.is_empty() {
            "#!/bin/sh\nexit 0\n".to_string()
        } else {
            format!("#!/bin/sh\ncat <<'EOF'\n{stdout}\nEOF\n")
        };
        install_script(dir, &script)
    }

    #[cfg(unix)]
    fn install_script(dir: &Path, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("nim");
        fs::write(&path, script).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[cfg(unix)]
    fn completer_with_output(dir: &TempDir, stdout: &str) -> NimCompleter {
        NimCompleter::new(CompleterConfig {
            nim_path: fake_nim(dir.path(), stdout),
        })
    }

    #[test]
    fn filetype_support_is_exactly_nim_and_nimrod() {
        assert!(NimCompleter::supports_filetype("nim"));
        assert!(NimCompleter::supports_filetype("nimrod"));
        assert!(!NimCompleter::supports_filetype("python"));
        assert!(!NimCompleter::supports_filetype(""));
    }

    #[tokio::test]
    async fn dispatch_rejects_unknown_subcommands() {
        let completer = NimCompleter::default();
        let req = request(Path::new("a.nim"));

        let err = completer
            .dispatch(&["Bogus".to_string()], &req)
            .await
            .unwrap_err();
        assert!(matches!(err, CompleterError::UnknownSubcommand(_)));
    }

    #[tokio::test]
    async fn dispatch_rejects_an_empty_argument_list() {
        let completer = NimCompleter::default();
        let req = request(Path::new("a.nim"));

        let err = completer.dispatch(&[], &req).await.unwrap_err();
        assert!(matches!(err, CompleterError::MissingSubcommand));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn empty_tool_output_yields_an_empty_candidate_list() {
        let dir = TempDir::new().unwrap();
        let completer = completer_with_output(&dir, "");
        let req = request(&dir.path().join("a.nim"));

        let candidates = completer.compute_candidates(&req).await.unwrap();
        assert!(candidates.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn one_candidate_per_well_formed_line_in_input_order() {
        let dir = TempDir::new().unwrap();
        let stdout = "1\tskProc\tmodule.foo\tproc foo()\tfile.nim\t3\t1\tdoes a thing\n\
                      not enough fields\n\
                      1\tskVar\tmodule.bar\tint\tfile.nim\t9\t0\t";
        let completer = completer_with_output(&dir, stdout);
        let req = request(&dir.path().join("a.nim"));

        let candidates = completer.compute_candidates(&req).await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].insert_text, "foo");
        assert_eq!(candidates[0].short_description, "proc: proc foo()");
        assert_eq!(candidates[0].detail_text, "proc foo()\n\ndoes a thing");
        assert_eq!(candidates[1].insert_text, "bar");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn buffer_contents_reach_the_tool_and_the_temp_file_is_removed() {
        let dir = TempDir::new().unwrap();
        let arg_record = dir.path().join("argpath");
        let buffer_record = dir.path().join("buffer");
        // The fifth argument is the file idetools is pointed at
        let script = format!(
            "#!/bin/sh\nprintf '%s' \"$5\" > \"{}\"\ncat \"$5\" > \"{}\"\nexit 0\n",
            arg_record.display(),
            buffer_record.display()
        );
        let completer = NimCompleter::new(CompleterConfig {
            nim_path: install_script(dir.path(), &script),
        });
        let req = request(&dir.path().join("a.nim"));

        let candidates = completer.compute_candidates(&req).await.unwrap();
        assert!(candidates.is_empty());

        let seen_buffer = fs::read_to_string(&buffer_record).unwrap();
        assert_eq!(seen_buffer, "let x = 1");

        let temp_path = fs::read_to_string(&arg_record).unwrap();
        assert!(temp_path.contains("nimtide-"));
        assert!(temp_path.ends_with(".nim"));
        assert!(
            !Path::new(&temp_path).exists(),
            "buffer temp file {temp_path} should be gone after the call"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn a_missing_compiler_is_a_tool_fault() {
        let dir = TempDir::new().unwrap();
        let completer = NimCompleter::new(CompleterConfig {
            nim_path: dir.path().join("no-such-nim"),
        });
        let req = request(&dir.path().join("a.nim"));

        let err = completer.compute_candidates(&req).await.unwrap_err();
        assert!(matches!(err, CompleterError::Tool(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn goto_adjusts_the_column_to_one_based() {
        let dir = TempDir::new().unwrap();
        let completer = completer_with_output(
            &dir,
            "1\tskProc\tmodule.foo\tproc foo()\tfile.nim\t3\t5\tdoes a thing",
        );
        let req = request(&dir.path().join("a.nim"));

        let location = completer.goto(&req).await.unwrap();
        assert_eq!(location.file, PathBuf::from("file.nim"));
        assert_eq!(location.line, 3);
        assert_eq!(location.column, 6);
        assert_eq!(location.description, "does a thing");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn goto_keeps_the_first_of_several_definitions() {
        let dir = TempDir::new().unwrap();
        let stdout = "1\tskProc\tmodule.foo\tproc foo()\tfirst.nim\t3\t1\t\n\
                      1\tskProc\tmodule.foo\tproc foo()\tsecond.nim\t30\t1\t";
        let completer = completer_with_output(&dir, stdout);
        let req = request(&dir.path().join("a.nim"));

        let location = completer.goto(&req).await.unwrap();
        assert_eq!(location.file, PathBuf::from("first.nim"));
        assert_eq!(location.line, 3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn get_type_formats_kind_name_and_return_type() {
        let dir = TempDir::new().unwrap();
        let completer =
            completer_with_output(&dir, "1\tskVar\tmodule.x\tint\tfile.nim\t2\t1\t");
        let req = request(&dir.path().join("a.nim"));

        let display = completer.get_type(&req).await.unwrap();
        assert_eq!(display, "[var] (module.x): int");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn get_type_omits_an_empty_return_type() {
        let dir = TempDir::new().unwrap();
        let completer =
            completer_with_output(&dir, "1\tskProc\tmodule.foo\t\tfile.nim\t3\t1\tdoc");
        let req = request(&dir.path().join("a.nim"));

        let display = completer.get_type(&req).await.unwrap();
        assert_eq!(display, "[proc] (module.foo)");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn short_definition_output_is_no_such_symbol_for_both_lookups() {
        let dir = TempDir::new().unwrap();
        let completer = completer_with_output(&dir, "sym");
        let req = request(&dir.path().join("a.nim"));

        let err = completer.goto(&req).await.unwrap_err();
        assert!(matches!(err, CompleterError::NoSuchSymbol));

        let err = completer.get_type(&req).await.unwrap_err();
        assert!(matches!(err, CompleterError::NoSuchSymbol));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dispatch_routes_to_goto_and_get_type() {
        let dir = TempDir::new().unwrap();
        let completer = completer_with_output(
            &dir,
            "1\tskVar\tmodule.x\tint\tfile.nim\t2\t1\tx doc",
        );
        let req = request(&dir.path().join("a.nim"));

        let reply = completer
            .dispatch(&["GoTo".to_string()], &req)
            .await
            .unwrap();
        match reply {
            Reply::GoTo(location) => {
                assert_eq!(location.file, PathBuf::from("file.nim"));
                assert_eq!(location.column, 2);
                assert_eq!(location.description, "x doc");
            }
            other => panic!("expected a go-to reply, got {other:?}"),
        }

        let reply = completer
            .dispatch(&["GetType".to_string(), "ignored".to_string()], &req)
            .await
            .unwrap();
        assert_eq!(
            reply,
            Reply::DisplayMessage("[var] (module.x): int".to_string())
        );
    }
}
