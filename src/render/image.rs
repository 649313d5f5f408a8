//! Image rendering through the Graphviz `dot` executable.

use crate::error::{Error, Result};
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Default image format when the output path has no extension
const DEFAULT_FORMAT: &str = "png";

/// Render DOT source to an image with Graphviz.
///
/// The image format follows the output extension (`png`, `svg`, `pdf`, ...).
pub fn render_with_graphviz(dot_source: &str, output_path: &Path) -> Result<()> {
    run_layout("dot", dot_source, output_path)
}

fn run_layout(program: &str, dot_source: &str, output_path: &Path) -> Result<()> {
    let ext = output_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or(DEFAULT_FORMAT)
        .to_lowercase();

    let format_arg = format!("-T{}", ext);
    debug!(format = %ext, path = %output_path.display(), "running graphviz");

    let mut child = Command::new(program)
        .arg(&format_arg)
        .arg("-o")
        .arg(output_path)
        .stdin(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::Graphviz(format!(
                    "'{}' command not found. Install Graphviz or use --mode dot instead",
                    program
                ))
            } else {
                Error::Graphviz(format!("failed to run dot: {}", e))
            }
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(dot_source.as_bytes()) {
            drop(stdin);
            let _ = child.wait();
            return Err(Error::Graphviz(format!("failed to write to dot: {}", e)));
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|e| Error::Graphviz(e.to_string()))?;
    if !output.status.success() {
        return Err(Error::Graphviz(format!(
            "dot exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(())
}
