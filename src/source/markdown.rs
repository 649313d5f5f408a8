//! Markdown ER format (`.er`) parsing.
//!
//! ```text
//! # comment
//! [users]
//! *id {label:"INTEGER"}
//! email {label:"VARCHAR"}
//!
//! [orders]
//! *id {label:"INTEGER"}
//! user_id {label:"INTEGER"}
//!
//! users 1--* orders
//! ```
//!
//! Relations carry their cardinality symbols explicitly; either side may be
//! left empty (`users --* orders`) for an unknown multiplicity.

use super::format::unquote;
use super::{Formatters, IntoIntermediary};
use crate::error::{Error, Result, SourceKind};
use crate::model::{Cardinality, Column, Intermediary, Relation, Table};
use once_cell::sync::Lazy;
use regex::Regex;

static TABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[\s*([^\]]+?)\s*\]\s*(?:\{.*\})?$").unwrap());

static RELATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(`[^`]+`|"[^"]+"|\S+)\s+([*?+1]?)--([*?+1]?)\s+(`[^`]+`|"[^"]+"|\S+)\s*(?:\{.*\})?$"#)
        .unwrap()
});

static COLUMN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\*?)\+?\s*(`[^`]+`|"[^"]+"|[^\s{]+)\s*(\{.*\})?$"#).unwrap()
});

static LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"label\s*:\s*"([^"]*)""#).unwrap());

/// Column declared in a markdown document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownColumn {
    pub name: String,
    pub label: String,
    pub is_key: bool,
}

/// Table declared in a markdown document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownTable {
    pub name: String,
    pub columns: Vec<MarkdownColumn>,
}

/// Relation line with its explicit cardinality symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownRelation {
    pub left: String,
    pub right: String,
    pub left_cardinality: Option<Cardinality>,
    pub right_cardinality: Option<Cardinality>,
    /// 1-based line number, for error reporting
    pub line: usize,
}

/// Parsed markdown ER document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownDocument {
    pub tables: Vec<MarkdownTable>,
    pub relations: Vec<MarkdownRelation>,
}

impl MarkdownDocument {
    /// Parse a document from its lines
    pub fn parse<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut doc = MarkdownDocument::default();

        for (idx, raw) in lines.into_iter().enumerate() {
            let line_no = idx + 1;
            let line = raw.as_ref().trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(caps) = TABLE_RE.captures(line) {
                let name = caps[1].to_string();
                if doc.tables.iter().any(|t| t.name == name) {
                    return Err(Error::parse(
                        SourceKind::Markdown,
                        line_no,
                        format!("duplicate table '{}'", name),
                    ));
                }
                doc.tables.push(MarkdownTable {
                    name,
                    columns: Vec::new(),
                });
            } else if let Some(caps) = RELATION_RE.captures(line) {
                doc.relations.push(MarkdownRelation {
                    left: unquote(&caps[1]).to_string(),
                    right: unquote(&caps[4]).to_string(),
                    left_cardinality: parse_symbol(&caps[2]),
                    right_cardinality: parse_symbol(&caps[3]),
                    line: line_no,
                });
            } else if let Some(caps) = COLUMN_RE.captures(line) {
                let name = unquote(&caps[2]).to_string();
                let label = caps
                    .get(3)
                    .and_then(|opts| LABEL_RE.captures(opts.as_str()))
                    .map(|l| l[1].to_string())
                    .unwrap_or_default();

                let Some(table) = doc.tables.last_mut() else {
                    return Err(Error::parse(
                        SourceKind::Markdown,
                        line_no,
                        format!("column '{}' declared before any table", name),
                    ));
                };
                if table.columns.iter().any(|c| c.name == name) {
                    return Err(Error::parse(
                        SourceKind::Markdown,
                        line_no,
                        format!("duplicate column '{}' in table '{}'", name, table.name),
                    ));
                }
                table.columns.push(MarkdownColumn {
                    name,
                    label,
                    is_key: !caps[1].is_empty(),
                });
            } else {
                return Err(Error::parse(
                    SourceKind::Markdown,
                    line_no,
                    format!("cannot parse line: {}", line),
                ));
            }
        }

        for rel in &doc.relations {
            for end in [&rel.left, &rel.right] {
                if !doc.tables.iter().any(|t| &t.name == end) {
                    return Err(Error::parse(
                        SourceKind::Markdown,
                        rel.line,
                        format!("relation references undefined table '{}'", end),
                    ));
                }
            }
        }

        Ok(doc)
    }

    /// Parse a whole document held in a string
    pub fn parse_str(text: &str) -> Result<Self> {
        Self::parse(text.lines())
    }
}

fn parse_symbol(s: &str) -> Option<Cardinality> {
    s.parse().ok()
}

impl IntoIntermediary for MarkdownDocument {
    fn to_intermediary(&self, formatters: &Formatters) -> Result<Intermediary> {
        let tables = self
            .tables
            .iter()
            .map(|t| {
                Table::new(
                    (formatters.name)(&t.name),
                    t.columns
                        .iter()
                        .map(|c| {
                            let col_type = if c.label.is_empty() {
                                String::new()
                            } else {
                                (formatters.col_type)(&c.label)
                            };
                            Column::new((formatters.name)(&c.name), col_type, c.is_key)
                        })
                        .collect(),
                )
            })
            .collect();

        let relations = self
            .relations
            .iter()
            .map(|r| {
                Relation::new(
                    (formatters.name)(&r.left),
                    (formatters.name)(&r.right),
                    r.left_cardinality,
                    r.right_cardinality,
                )
            })
            .collect();

        Ok(Intermediary::new(tables, relations))
    }
}
