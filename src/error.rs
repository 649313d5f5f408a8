//! Error type shared by the extraction, filtering and rendering layers.

use std::fmt;
use std::path::PathBuf;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Source format named in parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Sql,
    Markdown,
    Dbml,
    Metadata,
    Database,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Sql => write!(f, "sql"),
            SourceKind::Markdown => write!(f, "markdown"),
            SourceKind::Dbml => write!(f, "dbml"),
            SourceKind::Metadata => write!(f, "metadata"),
            SourceKind::Database => write!(f, "database"),
        }
    }
}

/// Errors raised while turning a schema source into a diagram
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Relation type code outside `<`, `>`, `-` and the empty code
    #[error("unsupported relation type: {code:?} (expected one of '<', '>', '-', '' or one-to-many, many-to-one, one-to-one, none)")]
    UnsupportedRelationType { code: String },

    /// No adapter matched the input
    #[error("unrecognized source format for '{input}': tried {}", .tried.join(", "))]
    UnrecognizedSourceFormat {
        input: String,
        tried: Vec<&'static str>,
    },

    /// Include and exclude lists given for the same resource kind
    #[error("cannot combine include_{kind} and exclude_{kind}")]
    ConflictingFilterConfiguration { kind: &'static str },

    #[error("unknown output mode: {0}. Valid options: auto, graph, dot, er")]
    UnsupportedOutputMode(String),

    #[error("{format} parse error on line {line}: {message}")]
    Parse {
        format: SourceKind,
        line: usize,
        message: String,
    },

    #[error("invalid model metadata: {0}")]
    Metadata(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("graphviz failed: {0}")]
    Graphviz(String),

    /// Same table name in several schemas with no schema selected
    #[error("table '{table}' exists in schemas {}; select one with --schema", .schemas.join(", "))]
    AmbiguousTable { table: String, schemas: Vec<String> },

    #[error("database introspection failed: {0}")]
    Database(#[from] duckdb::Error),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn parse(format: SourceKind, line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            format,
            line,
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_source_lists_heuristics() {
        let err = Error::UnrecognizedSourceFormat {
            input: "plop".to_string(),
            tried: vec!["sql (*.sql)", "dbml (*.dbml)"],
        };
        let msg = err.to_string();
        assert!(msg.contains("plop"));
        assert!(msg.contains("sql (*.sql), dbml (*.dbml)"));
    }

    #[test]
    fn test_conflicting_filter_message() {
        let err = Error::ConflictingFilterConfiguration { kind: "tables" };
        assert_eq!(
            err.to_string(),
            "cannot combine include_tables and exclude_tables"
        );
    }

    #[test]
    fn test_parse_error_message() {
        let err = Error::parse(SourceKind::Markdown, 3, "duplicate table 'users'");
        assert_eq!(
            err.to_string(),
            "markdown parse error on line 3: duplicate table 'users'"
        );
    }
}
