//! YAML configuration for the render command.
//!
//! ```yaml
//! title: Shop
//! layout: tb
//! mode: auto
//! schema: main
//! filter:
//!   exclude_tables: [migrations, "tmp_*"]
//!   exclude_columns: [created_at, updated_at]
//! ```

use crate::error::{Error, Result};
use crate::filter::FilterConfig;
use crate::render::Layout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete YAML configuration for a render
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Diagram title
    pub title: Option<String>,
    pub layout: Option<Layout>,
    /// Output mode: auto, graph, dot or er
    pub mode: Option<String>,
    /// Database schema to introspect
    pub schema: Option<String>,
    pub filter: FilterConfig,
}

impl RenderConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml_ng::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Overlay values given on the command line.
    ///
    /// Scalars replace the file's values when present; a non-empty filter list
    /// replaces the file's list of the same kind.
    pub fn merge(mut self, overrides: RenderConfig) -> Self {
        self.title = overrides.title.or(self.title);
        self.layout = overrides.layout.or(self.layout);
        self.mode = overrides.mode.or(self.mode);
        self.schema = overrides.schema.or(self.schema);

        let replace = |file: &mut Vec<String>, cli: Vec<String>| {
            if !cli.is_empty() {
                *file = cli;
            }
        };
        replace(&mut self.filter.include_tables, overrides.filter.include_tables);
        replace(&mut self.filter.exclude_tables, overrides.filter.exclude_tables);
        replace(&mut self.filter.include_columns, overrides.filter.include_columns);
        replace(&mut self.filter.exclude_columns, overrides.filter.exclude_columns);
        self
    }
}
