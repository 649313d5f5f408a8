//! Intermediary representation shared by every source format and renderer.
//!
//! This module provides:
//! - Table and column definitions in source declaration order
//! - Relations between tables, keyed by table name
//! - Cardinality symbols for each side of a relation

use std::fmt;
use std::str::FromStr;

/// Multiplicity of one side of a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// `1`: exactly one
    One,
    /// `+`: one or more
    OneOrMore,
    /// `*`: zero or more
    ZeroOrMore,
    /// `?`: zero or one
    ZeroOrOne,
}

impl Cardinality {
    /// Symbol used by the markdown ER format
    pub fn symbol(self) -> &'static str {
        match self {
            Cardinality::One => "1",
            Cardinality::OneOrMore => "+",
            Cardinality::ZeroOrMore => "*",
            Cardinality::ZeroOrOne => "?",
        }
    }

    /// Range label used on diagram edges
    pub fn label(self) -> &'static str {
        match self {
            Cardinality::One => "1",
            Cardinality::OneOrMore => "1..N",
            Cardinality::ZeroOrMore => "0..N",
            Cardinality::ZeroOrOne => "{0,1}",
        }
    }

    /// Nullable counterpart: `1` becomes `?` and `+` becomes `*`
    pub fn nullable(self) -> Self {
        match self {
            Cardinality::One | Cardinality::ZeroOrOne => Cardinality::ZeroOrOne,
            Cardinality::OneOrMore | Cardinality::ZeroOrMore => Cardinality::ZeroOrMore,
        }
    }
}

impl FromStr for Cardinality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Cardinality::One),
            "+" => Ok(Cardinality::OneOrMore),
            "*" => Ok(Cardinality::ZeroOrMore),
            "?" => Ok(Cardinality::ZeroOrOne),
            _ => Err(format!(
                "Unknown cardinality: {}. Valid options: 1, +, *, ?",
                s
            )),
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Column of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Display type, already passed through the type formatter
    pub col_type: String,
    /// Whether this column is part of the primary key
    pub is_key: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, col_type: impl Into<String>, is_key: bool) -> Self {
        Self {
            name: name.into(),
            col_type: col_type.into(),
            is_key,
        }
    }
}

/// Table with its columns in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns that are part of the primary key, in declaration order
    pub fn key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_key)
    }
}

/// Edge between two tables, referencing them by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub left_table: String,
    pub right_table: String,
    pub left_cardinality: Option<Cardinality>,
    pub right_cardinality: Option<Cardinality>,
}

impl Relation {
    pub fn new(
        left_table: impl Into<String>,
        right_table: impl Into<String>,
        left_cardinality: Option<Cardinality>,
        right_cardinality: Option<Cardinality>,
    ) -> Self {
        Self {
            left_table: left_table.into(),
            right_table: right_table.into(),
            left_cardinality,
            right_cardinality,
        }
    }

    /// Whether both ends point at the same table
    pub fn is_self_reference(&self) -> bool {
        self.left_table == self.right_table
    }

    /// Whether `table` is one of the endpoints
    pub fn touches(&self, table: &str) -> bool {
        self.left_table == table || self.right_table == table
    }
}

/// Tables and relations extracted from one schema source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intermediary {
    pub tables: Vec<Table>,
    pub relations: Vec<Relation>,
}

impl Intermediary {
    pub fn new(tables: Vec<Table>, relations: Vec<Relation>) -> Self {
        Self { tables, relations }
    }

    /// Get table by name
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Total number of columns across all tables
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// Check if there are no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
