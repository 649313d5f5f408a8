//! Schema sources and their mappers into the intermediary.
//!
//! Each supported format has a parsed handle (`SqlSchema`, `MarkdownDocument`,
//! `DbmlDocument`, `Metadata`, `DatabaseSchema`) implementing
//! [`IntoIntermediary`]. [`Source`] detects which one an input is and loads it.

pub mod compression;
pub mod database;
pub mod dbml;
mod format;
pub mod markdown;
pub mod orm;
pub mod sql;

pub use compression::Compression;
pub use database::DatabaseSchema;
pub use dbml::DbmlDocument;
pub use format::{format_name, format_type, Formatters};
pub use markdown::MarkdownDocument;
pub use orm::Metadata;
pub use sql::SqlSchema;

use crate::error::{Error, Result};
use crate::model::Intermediary;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Conversion of a parsed source into the intermediary representation
pub trait IntoIntermediary {
    fn to_intermediary(&self, formatters: &Formatters) -> Result<Intermediary>;
}

const DUCKDB_SCHEME: &str = "duckdb://";

/// Detection heuristics, in the order they are tried
const HEURISTICS: [&str; 5] = [
    "duckdb (duckdb://<path>, *.duckdb, *.ddb)",
    "sql (*.sql, optionally .gz/.bz2/.xz/.zst)",
    "markdown (*.er, *.md)",
    "dbml (*.dbml)",
    "metadata (*.yaml, *.yml, *.json)",
];

/// A detected schema source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Database(PathBuf),
    Sql(PathBuf),
    Markdown(PathBuf),
    Dbml(PathBuf),
    Metadata(PathBuf),
}

impl Source {
    /// Detect the source format of an input path or URI
    pub fn detect(input: &str) -> Result<Self> {
        if let Some(path) = input.strip_prefix(DUCKDB_SCHEME) {
            return Ok(Source::Database(PathBuf::from(path)));
        }

        let path = PathBuf::from(input);
        let source = match Compression::inner_extension(&path).as_deref() {
            Some("duckdb" | "ddb") => Source::Database(path),
            Some("sql") => Source::Sql(path),
            Some("er" | "md") => Source::Markdown(path),
            Some("dbml") => Source::Dbml(path),
            Some("yaml" | "yml" | "json") => Source::Metadata(path),
            _ => {
                return Err(Error::UnrecognizedSourceFormat {
                    input: input.to_string(),
                    tried: HEURISTICS.to_vec(),
                })
            }
        };
        Ok(source)
    }

    pub fn path(&self) -> &Path {
        match self {
            Source::Database(p)
            | Source::Sql(p)
            | Source::Markdown(p)
            | Source::Dbml(p)
            | Source::Metadata(p) => p,
        }
    }

    /// Read the source and map it into the intermediary.
    ///
    /// `schema` limits database introspection to one schema and is ignored by
    /// file-based sources.
    pub fn load(&self, formatters: &Formatters, schema: Option<&str>) -> Result<Intermediary> {
        debug!(source = %self, "loading schema");

        let intermediary = match self {
            Source::Database(path) => {
                DatabaseSchema::open(path, schema)?.to_intermediary(formatters)?
            }
            Source::Sql(path) => {
                SqlSchema::parse(&compression::read_to_string(path)?).to_intermediary(formatters)?
            }
            Source::Markdown(path) => {
                MarkdownDocument::parse_str(&compression::read_to_string(path)?)?
                    .to_intermediary(formatters)?
            }
            Source::Dbml(path) => {
                DbmlDocument::parse(&compression::read_to_string(path)?)?
                    .to_intermediary(formatters)?
            }
            Source::Metadata(path) => {
                let text = compression::read_to_string(path)?;
                let metadata = match Compression::inner_extension(path).as_deref() {
                    Some("json") => Metadata::from_json(&text)?,
                    _ => Metadata::from_yaml(&text)?,
                };
                metadata.to_intermediary(formatters)?
            }
        };

        debug!(
            tables = intermediary.tables.len(),
            relations = intermediary.relations.len(),
            "schema loaded"
        );
        Ok(intermediary)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Source::Database(_) => "duckdb",
            Source::Sql(_) => "sql",
            Source::Markdown(_) => "markdown",
            Source::Dbml(_) => "dbml",
            Source::Metadata(_) => "metadata",
        };
        write!(f, "{} {}", kind, self.path().display())
    }
}
