//! Output renderers for the intermediary representation.

mod dot;
pub mod image;
mod markdown;

pub use dot::to_dot;
pub use image::render_with_graphviz;
pub use markdown::to_markdown;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// What to produce for an output path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Image rendered by Graphviz from the dot source
    Graph,
    /// Graphviz dot source
    Dot,
    /// Markdown ER text
    Er,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Graph => write!(f, "graph"),
            OutputMode::Dot => write!(f, "dot"),
            OutputMode::Er => write!(f, "er"),
        }
    }
}

impl OutputMode {
    /// Detect mode from file extension; anything unknown is rendered as an image
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "er" | "md" => OutputMode::Er,
            "dot" | "gv" => OutputMode::Dot,
            _ => OutputMode::Graph,
        }
    }
}

/// Resolve the output mode for `path`.
///
/// `mode` is `auto` (pick by extension), `graph`, `dot` or `er`.
pub fn get_output_mode(path: Option<&Path>, mode: &str) -> Result<OutputMode> {
    match mode.to_lowercase().as_str() {
        "auto" => Ok(path
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .map(OutputMode::from_extension)
            .unwrap_or(if path.is_some() {
                OutputMode::Graph
            } else {
                OutputMode::Er
            })),
        "graph" => Ok(OutputMode::Graph),
        "dot" => Ok(OutputMode::Dot),
        "er" | "markdown" => Ok(OutputMode::Er),
        _ => Err(Error::UnsupportedOutputMode(mode.to_string())),
    }
}

/// Layout direction for diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Left to right
    #[default]
    LR,
    /// Top to bottom
    TB,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lr" | "left-right" | "horizontal" => Ok(Layout::LR),
            "tb" | "td" | "top-bottom" | "top-down" | "vertical" => Ok(Layout::TB),
            _ => Err(format!("Unknown layout: {}. Valid options: lr, tb", s)),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::LR => write!(f, "lr"),
            Layout::TB => write!(f, "tb"),
        }
    }
}

/// Presentation settings shared by the renderers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Diagram title, drawn above the graph
    pub title: Option<String>,
    pub layout: Layout,
}
