use std::env;
use std::fs::OpenOptions;
use std::io::Write;

use tracing::debug;

use crate::error::Result;

/// Publish the fixed title for downstream workflow steps.
///
/// When running as a GitHub Action the runner points `GITHUB_OUTPUT` at a
/// file; `title` and `fixed` key/value lines appended there become the
/// action's outputs. Outside of an action this is a no-op.
pub fn write_action_outputs(title: &str, fixed: bool) -> Result<()> {
    match env::var("GITHUB_OUTPUT") {
        Ok(path) => write_outputs_to(&path, title, fixed),
        Err(_) => Ok(()),
    }
}

fn write_outputs_to(path: &str, title: &str, fixed: bool) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    // PR titles are single-line; the plain key=value form is sufficient
    writeln!(file, "title={}", title)?;
    writeln!(file, "fixed={}", fixed)?;
    debug!(path, fixed, "wrote action outputs");
    Ok(())
}
