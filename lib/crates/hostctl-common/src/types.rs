use serde::{Deserialize, Serialize};

/// One entry of a script directory listing.
///
/// Directories carry `leaf: false`; the host lists one level at a time, so
/// `children` is usually empty and filled in by the caller on expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptTreeNode {
    pub key: String,
    pub label: String,
    pub leaf: bool,
    #[serde(default)]
    pub children: Vec<ScriptTreeNode>,
}

/// Captured output streams of a script run.
///
/// On the wire this is the two-element array `[stdout, stderr]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct ScriptOutput {
    pub stdout: String,
    pub stderr: String,
}

impl From<(String, String)> for ScriptOutput {
    fn from((stdout, stderr): (String, String)) -> Self {
        Self { stdout, stderr }
    }
}

impl From<ScriptOutput> for (String, String) {
    fn from(output: ScriptOutput) -> Self {
        (output.stdout, output.stderr)
    }
}
