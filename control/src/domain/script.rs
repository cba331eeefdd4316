//! Script session state and the path-to-language rule.

use hostctl_common::ScriptOutput;

/// Language of a script, derived from its file extension.
///
/// Everything after the last `.` of `path`; empty when there is no dot.
#[must_use]
pub fn language_from_path(path: &str) -> &str {
    path.rfind('.').map_or("", |idx| &path[idx + 1..])
}

/// State of the single open script buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptSessionState {
    pub buffer: String,
    pub language: String,
    /// Empty when no file is open.
    pub active_file_path: String,
    pub executing: bool,
    pub last_stdout: String,
    pub last_stderr: String,
    pub last_run_failed: bool,
    pub directory_loading: bool,
}

impl ScriptSessionState {
    /// Point the session at `path`, re-deriving the language.
    pub(crate) fn open(&mut self, path: &str) {
        self.active_file_path = path.to_string();
        self.language = language_from_path(path).to_string();
    }

    pub(crate) fn begin_run(&mut self) {
        self.last_stdout.clear();
        self.last_stderr.clear();
        self.last_run_failed = false;
        self.executing = true;
    }

    pub(crate) fn record_output(&mut self, output: ScriptOutput) {
        self.last_stdout = output.stdout;
        self.last_stderr = output.stderr;
    }
}
