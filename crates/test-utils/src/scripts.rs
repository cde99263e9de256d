//! Small `sh` programs used as supervised commands in tests.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::trace;

/// `sh -c <script>` as an argv.
pub fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

/// A command that appends one line to `log` for every `signal` it receives
/// (e.g. `"HUP"`) and otherwise idles until killed.
///
/// It writes `ready` to `log` once the trap is installed.
pub fn signal_recorder(log: &Path, signal: &str) -> Vec<String> {
    let log = log.display();
    sh(&format!(
        "trap 'echo {signal} >> \"{log}\"' {signal}; echo ready >> \"{log}\"; \
         while :; do sleep 0.05; done"
    ))
}

/// A command that exits with `code` on the first `signal`.
pub fn exit_on_signal(signal: &str, code: i32, ready: &Path) -> Vec<String> {
    let ready = ready.display();
    sh(&format!(
        "trap 'exit {code}' {signal}; echo ready >> \"{ready}\"; \
         while :; do sleep 0.05; done"
    ))
}

/// Lines currently in `log`, or none if it does not exist yet.
pub fn read_lines(log: &Path) -> Vec<String> {
    std::fs::read_to_string(log)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Poll `log` until `pred` holds for its lines.
pub async fn wait_for_lines<F>(log: &Path, pred: F) -> Vec<String>
where
    F: Fn(&[String]) -> bool,
{
    loop {
        let lines = read_lines(log);
        if pred(&lines) {
            return lines;
        }
        trace!(log = %log.display(), ?lines, "still waiting for the command");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Replace `path` the way editors save: write a sibling, then rename it
/// over the original. The old inode is unlinked, so its watch goes away.
pub fn replace_file(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, contents)
        .with_context(|| format!("writing {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("renaming {} onto {}", tmp.display(), path.display()))
}

/// Count lines equal to `needle`.
pub fn count(lines: &[String], needle: &str) -> usize {
    lines.iter().filter(|l| l.as_str() == needle).count()
}
