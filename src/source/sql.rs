//! SQL DDL parsing for schema extraction.
//!
//! Parses CREATE TABLE, ALTER TABLE and CREATE UNIQUE INDEX statements to extract:
//! - Column definitions with types and NOT NULL flags
//! - Primary key constraints (inline and table-level)
//! - Unique constraints, used to tell one-to-one from many-to-one references
//! - Foreign key constraints (inline REFERENCES, table-level and ALTER TABLE)

use super::{Formatters, IntoIntermediary};
use crate::cardinality::{
    relation_to_intermediary, ColumnFlags, NullabilityFlags, RelationEdge, RelationType,
};
use crate::error::Result;
use crate::model::{Column, Intermediary, Table};
use once_cell::sync::Lazy;
use regex::Regex;

/// Regex to extract table name from CREATE TABLE
/// Supports: `table` (MySQL), "table" (PostgreSQL), [table] (MSSQL), table (SQLite/unquoted), schema.table
static CREATE_TABLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^\s*CREATE\s+(?:OR\s+REPLACE\s+)?(?:(?:GLOBAL|LOCAL)\s+)?(?:TEMP(?:ORARY)?\s+|UNLOGGED\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?((?:[\[`"]?[^\[\]`"\s(.]+[\]`"]?\s*\.\s*)*[\[`"]?[^\[\]`"\s(]+[\]`"]?)"#)
        .unwrap()
});

/// Regex to extract table name from ALTER TABLE
static ALTER_TABLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^\s*ALTER\s+TABLE\s+(?:IF\s+EXISTS\s+)?(?:ONLY\s+)?((?:[\[`"]?[^\[\]`"\s.]+[\]`"]?\s*\.\s*)*[\[`"]?[^\[\]`"\s]+[\]`"]?)"#)
        .unwrap()
});

/// Regex for column definition
/// Supports: `column` (MySQL), "column" (PostgreSQL), [column] (MSSQL), column (unquoted)
static COLUMN_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^\s*[\[`"]?([^\[\]`"\s,]+)[\]`"]?\s+(\w+(?:\s+varying|\s+precision)?(?:\s*\([^)]*\))?(?:\s+(?:with|without)\s+time\s+zone)?(?:\s+unsigned)?(?:\[\])?)"#,
    )
    .unwrap()
});

/// Regex for PRIMARY KEY constraint
/// Supports MSSQL CLUSTERED/NONCLUSTERED keywords: PRIMARY KEY CLUSTERED ([col])
static PRIMARY_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)PRIMARY\s+KEY\s*(?:CLUSTERED\s+|NONCLUSTERED\s+)?\(([^)]+)\)").unwrap()
});

/// Regex for inline PRIMARY KEY on column
static INLINE_PRIMARY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").unwrap());

/// Regex for inline UNIQUE on column
static INLINE_UNIQUE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bUNIQUE\b").unwrap());

/// Regex for table-level UNIQUE constraint: UNIQUE (a, b), UNIQUE KEY name (a), CONSTRAINT x UNIQUE (a)
static UNIQUE_CONSTRAINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bUNIQUE\s*(?:KEY|INDEX)?\s*(?:[\[`"]?\w+[\]`"]?\s*)?\(([^)]+)\)"#).unwrap()
});

/// Regex for FOREIGN KEY constraint with optional constraint name
static FOREIGN_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?:CONSTRAINT\s+[\[`"]?([^\[\]`"\s]+)[\]`"]?\s+)?FOREIGN\s+KEY\s*\(([^)]+)\)\s*REFERENCES\s+((?:[\[`"]?[^\[\]`"\s(.]+[\]`"]?\s*\.\s*)*[\[`"]?[^\[\]`"\s(]+[\]`"]?)\s*(?:\(([^)]+)\))?"#,
    )
    .unwrap()
});

/// Regex for inline REFERENCES on a column definition
static INLINE_REFERENCES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\bREFERENCES\s+((?:[\[`"]?[^\[\]`"\s(.]+[\]`"]?\s*\.\s*)*[\[`"]?[^\[\]`"\s(,]+[\]`"]?)\s*(?:\(([^)]+)\))?"#,
    )
    .unwrap()
});

/// Regex to detect NOT NULL constraint
static NOT_NULL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bNOT\s+NULL\b").unwrap());

/// Regex for CREATE UNIQUE INDEX statement
static CREATE_UNIQUE_INDEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^\s*CREATE\s+UNIQUE\s+(?:CLUSTERED\s+|NONCLUSTERED\s+)?INDEX\s+(?:CONCURRENTLY\s+)?(?:IF\s+NOT\s+EXISTS\s+)?(?:[\[`"]?\w+[\]`"]?\s+)?ON\s+(?:ONLY\s+)?((?:[\[`"]?\w+[\]`"]?\s*\.\s*)*[\[`"]?\w+[\]`"]?)\s*(?:USING\s+\w+\s*)?\(([^)]+)\)"#,
    )
    .unwrap()
});

/// Column parsed from a CREATE TABLE body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlColumn {
    pub name: String,
    pub type_name: String,
    pub not_null: bool,
    pub is_primary_key: bool,
    pub is_unique: bool,
}

impl NullabilityFlags for SqlColumn {
    fn not_null(&self) -> bool {
        self.not_null
    }

    fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }
}

/// Foreign key constraint definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Constraint name (optional)
    pub name: Option<String>,
    /// Column names in this table
    pub column_names: Vec<String>,
    /// Referenced table name
    pub referenced_table: String,
    /// Referenced column names, empty when the parent's primary key is implied
    pub referenced_columns: Vec<String>,
}

/// Table parsed from a CREATE TABLE statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTable {
    pub name: String,
    pub columns: Vec<SqlColumn>,
    /// Primary key column names (ordered for composite PKs)
    pub primary_key: Vec<String>,
    /// Column sets covered by a unique constraint or unique index
    pub unique_keys: Vec<Vec<String>>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl SqlTable {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            columns: Vec::new(),
            primary_key: Vec::new(),
            unique_keys: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Get a column by name (case-insensitive)
    pub fn get_column(&self, name: &str) -> Option<&SqlColumn> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub(crate) fn get_column_mut(&mut self, name: &str) -> Option<&mut SqlColumn> {
        self.columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub(crate) fn mark_primary_key(&mut self, columns: &[String]) {
        for col_name in columns {
            if let Some(col) = self.get_column_mut(col_name) {
                col.is_primary_key = true;
                let name = col.name.clone();
                if !self.primary_key.iter().any(|c| c.eq_ignore_ascii_case(&name)) {
                    self.primary_key.push(name);
                }
            }
        }
    }

    /// Whether the given column set is the primary key or covered by a unique key
    pub fn is_unique_set(&self, columns: &[String]) -> bool {
        let same = |set: &[String]| {
            set.len() == columns.len()
                && columns
                    .iter()
                    .all(|c| set.iter().any(|s| s.eq_ignore_ascii_case(c)))
        };

        if !self.primary_key.is_empty() && same(&self.primary_key) {
            return true;
        }
        if self.unique_keys.iter().any(|k| same(k)) {
            return true;
        }
        match columns {
            [single] => self.get_column(single).is_some_and(|c| c.is_unique),
            _ => false,
        }
    }

    fn flags_for(&self, columns: &[String]) -> ColumnFlags {
        ColumnFlags::combined(columns.iter().filter_map(|c| self.get_column(c)))
    }
}

/// Schema parsed from SQL DDL text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlSchema {
    pub tables: Vec<SqlTable>,
}

impl SqlSchema {
    /// Parse every schema statement in a SQL script.
    ///
    /// Statements other than CREATE TABLE, ALTER TABLE and CREATE UNIQUE INDEX
    /// are ignored, as are ALTER/INDEX statements for tables never created.
    pub fn parse(sql: &str) -> Self {
        let mut schema = SqlSchema::default();

        for stmt in split_statements(sql) {
            if CREATE_TABLE_NAME_RE.is_match(&stmt) {
                schema.parse_create_table(&stmt);
            } else if ALTER_TABLE_NAME_RE.is_match(&stmt) {
                schema.parse_alter_table(&stmt);
            } else if CREATE_UNIQUE_INDEX_RE.is_match(&stmt) {
                schema.parse_create_unique_index(&stmt);
            }
        }

        schema
    }

    /// Get table by name (case-insensitive)
    pub fn get_table(&self, name: &str) -> Option<&SqlTable> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    fn get_table_mut(&mut self, name: &str) -> Option<&mut SqlTable> {
        self.tables
            .iter_mut()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    fn parse_create_table(&mut self, stmt: &str) {
        let Some(table_name) = capture(&CREATE_TABLE_NAME_RE, stmt).map(|n| bare_name(&n)) else {
            return;
        };
        if self.get_table(&table_name).is_some() {
            return;
        }
        let Some(body) = extract_table_body(stmt) else {
            return;
        };

        let mut table = SqlTable::new(table_name);
        parse_table_body(&body, &mut table);
        self.tables.push(table);
    }

    fn parse_alter_table(&mut self, stmt: &str) {
        let Some(table_name) = capture(&ALTER_TABLE_NAME_RE, stmt).map(|n| bare_name(&n)) else {
            return;
        };
        let Some(table) = self.get_table_mut(&table_name) else {
            return;
        };

        table.foreign_keys.extend(parse_foreign_keys(stmt));

        if let Some(pk_cols) = parse_primary_key_constraint(stmt) {
            table.mark_primary_key(&pk_cols);
        }
        if let Some(unique) = parse_unique_constraint(stmt) {
            table.unique_keys.push(unique);
        }
    }

    fn parse_create_unique_index(&mut self, stmt: &str) {
        let Some(caps) = CREATE_UNIQUE_INDEX_RE.captures(stmt) else {
            return;
        };
        let table_name = bare_name(&caps[1]);
        let columns = parse_column_list(&caps[2]);

        if let Some(table) = self.get_table_mut(&table_name) {
            table.unique_keys.push(columns);
        }
    }
}

/// A foreign key seen from the child table, adapted for cardinality resolution
#[derive(Debug, Clone)]
pub struct ForeignKeyEdge<'a> {
    relation_type: RelationType,
    child: &'a str,
    parent: &'a str,
    child_flags: ColumnFlags,
    parent_flags: ColumnFlags,
}

impl<'a> ForeignKeyEdge<'a> {
    /// Adapt a foreign key of `child` that references `parent`
    pub fn new(child: &'a SqlTable, parent: &'a SqlTable, fk: &ForeignKey) -> Self {
        let referenced = if fk.referenced_columns.is_empty() {
            parent.primary_key.clone()
        } else {
            fk.referenced_columns.clone()
        };

        let relation_type = if child.is_unique_set(&fk.column_names) {
            RelationType::OneToOne
        } else {
            RelationType::ManyToOne
        };

        Self {
            relation_type,
            child: &child.name,
            parent: &parent.name,
            child_flags: child.flags_for(&fk.column_names),
            parent_flags: parent.flags_for(&referenced),
        }
    }
}

impl RelationEdge for ForeignKeyEdge<'_> {
    type Column = ColumnFlags;

    fn type_code(&self) -> &str {
        self.relation_type.code()
    }

    fn left_table(&self) -> &str {
        self.child
    }

    fn right_table(&self) -> &str {
        self.parent
    }

    fn left_column(&self) -> &ColumnFlags {
        &self.child_flags
    }

    fn right_column(&self) -> &ColumnFlags {
        &self.parent_flags
    }
}

impl IntoIntermediary for SqlSchema {
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
                            Column::new(
                                (formatters.name)(&c.name),
                                (formatters.col_type)(&c.type_name),
                                c.is_primary_key,
                            )
                        })
                        .collect(),
                )
            })
            .collect();

        let mut relations = Vec::new();
        for child in &self.tables {
            for fk in &child.foreign_keys {
                // References to tables outside the script have no node to attach to
                let Some(parent) = self.get_table(&fk.referenced_table) else {
                    continue;
                };
                let edge = ForeignKeyEdge::new(child, parent, fk);
                relations.push(relation_to_intermediary(&edge, formatters)?);
            }
        }

        Ok(Intermediary::new(tables, relations))
    }
}

fn capture(re: &Regex, stmt: &str) -> Option<String> {
    re.captures(stmt)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Last segment of a possibly schema-qualified, quoted identifier
fn bare_name(name: &str) -> String {
    super::format_name(name)
}

/// Split a SQL script into statements on `;`, skipping quoted text and comments
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            current.push(ch);
            if ch == '\\' && q == '\'' {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => {
                quote = Some(ch);
                current.push(ch);
            }
            '-' if chars.peek() == Some(&'-') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            '#' if current.trim().is_empty() => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                current.push(' ');
            }
            ';' => {
                if !current.trim().is_empty() {
                    statements.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        statements.push(current.trim().to_string());
    }

    statements
}

/// Extract the body of a CREATE TABLE statement (between first ( and matching ))
fn extract_table_body(stmt: &str) -> Option<String> {
    let bytes = stmt.as_bytes();
    let mut depth = 0;
    let mut start = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &b) in bytes.iter().enumerate() {
        if escape_next {
            escape_next = false;
            continue;
        }

        if b == b'\\' && in_string {
            escape_next = true;
            continue;
        }

        if b == b'\'' {
            in_string = !in_string;
            continue;
        }

        if in_string {
            continue;
        }

        if b == b'(' {
            if depth == 0 {
                start = Some(i + 1);
            }
            depth += 1;
        } else if b == b')' {
            depth -= 1;
            if depth == 0 {
                if let Some(s) = start {
                    return Some(stmt[s..i].to_string());
                }
            }
        }
    }

    None
}

/// Parse the body of a CREATE TABLE to extract columns and constraints
fn parse_table_body(body: &str, table: &mut SqlTable) {
    for part in split_table_body(body) {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }

        let upper = trimmed.to_uppercase();
        if upper.starts_with("PRIMARY KEY")
            || upper.starts_with("CONSTRAINT ")
            || upper.starts_with("FOREIGN KEY")
            || upper.starts_with("KEY ")
            || upper.starts_with("INDEX ")
            || upper.starts_with("UNIQUE ")
            || upper.starts_with("UNIQUE(")
            || upper.starts_with("FULLTEXT ")
            || upper.starts_with("SPATIAL ")
            || upper.starts_with("CHECK ")
            || upper.starts_with("CHECK(")
            || upper.starts_with("EXCLUDE ")
        {
            if let Some(pk_cols) = parse_primary_key_constraint(trimmed) {
                table.mark_primary_key(&pk_cols);
            }
            if let Some(unique) = parse_unique_constraint(trimmed) {
                table.unique_keys.push(unique);
            }
            table.foreign_keys.extend(parse_foreign_keys(trimmed));
        } else if let Some(col) = parse_column_def(trimmed) {
            if col.is_primary_key {
                table.primary_key.push(col.name.clone());
            }
            if let Some(fk) = parse_inline_reference(&strip_string_literals(trimmed), &col.name) {
                table.foreign_keys.push(fk);
            }
            table.columns.push(col);
        }
    }
}

/// Split table body by commas, respecting nested parentheses
pub fn split_table_body(body: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for ch in body.chars() {
        if escape_next {
            current.push(ch);
            escape_next = false;
            continue;
        }

        if ch == '\\' && in_string {
            current.push(ch);
            escape_next = true;
            continue;
        }

        if ch == '\'' {
            in_string = !in_string;
            current.push(ch);
            continue;
        }

        if in_string {
            current.push(ch);
            continue;
        }

        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current = String::new();
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }

    parts
}

/// Parse a column definition
fn parse_column_def(def: &str) -> Option<SqlColumn> {
    let caps = COLUMN_DEF_RE.captures(def)?;
    let name = caps.get(1)?.as_str().to_string();
    let type_name = caps.get(2)?.as_str().to_string();

    // Keywords inside string literals (DEFAULT 'not null') are not constraints
    let rest = strip_string_literals(&def[caps.get(2)?.end()..]);
    let is_primary_key = INLINE_PRIMARY_KEY_RE.is_match(&rest);

    Some(SqlColumn {
        name,
        type_name,
        not_null: NOT_NULL_RE.is_match(&rest) || is_primary_key,
        is_primary_key,
        is_unique: INLINE_UNIQUE_RE.is_match(&rest),
    })
}

fn strip_string_literals(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_string = false;
    for ch in s.chars() {
        if ch == '\'' {
            in_string = !in_string;
            continue;
        }
        if !in_string {
            out.push(ch);
        }
    }
    out
}

/// Parse PRIMARY KEY constraint, returns column names
fn parse_primary_key_constraint(constraint: &str) -> Option<Vec<String>> {
    let caps = PRIMARY_KEY_RE.captures(constraint)?;
    Some(parse_column_list(caps.get(1)?.as_str()))
}

/// Parse a table-level UNIQUE constraint, returns column names
fn parse_unique_constraint(constraint: &str) -> Option<Vec<String>> {
    let caps = UNIQUE_CONSTRAINT_RE.captures(constraint)?;
    let columns = parse_column_list(caps.get(1)?.as_str());
    (!columns.is_empty()).then_some(columns)
}

/// Parse FOREIGN KEY constraints from a statement
fn parse_foreign_keys(stmt: &str) -> Vec<ForeignKey> {
    let mut fks = Vec::new();

    for caps in FOREIGN_KEY_RE.captures_iter(stmt) {
        let name = caps.get(1).map(|m| m.as_str().to_string());
        let local_cols = caps
            .get(2)
            .map(|m| parse_column_list(m.as_str()))
            .unwrap_or_default();
        let ref_table = caps.get(3).map(|m| bare_name(m.as_str())).unwrap_or_default();
        let ref_cols = caps
            .get(4)
            .map(|m| parse_column_list(m.as_str()))
            .unwrap_or_default();

        if !local_cols.is_empty() && !ref_table.is_empty() {
            fks.push(ForeignKey {
                name,
                column_names: local_cols,
                referenced_table: ref_table,
                referenced_columns: ref_cols,
            });
        }
    }

    fks
}

/// Parse an inline `REFERENCES parent(col)` on a column definition
fn parse_inline_reference(def: &str, column: &str) -> Option<ForeignKey> {
    let caps = INLINE_REFERENCES_RE.captures(def)?;
    Some(ForeignKey {
        name: None,
        column_names: vec![column.to_string()],
        referenced_table: bare_name(caps.get(1)?.as_str()),
        referenced_columns: caps
            .get(2)
            .map(|m| parse_column_list(m.as_str()))
            .unwrap_or_default(),
    })
}

/// Parse a comma-separated column list, stripping quotes (backticks, double quotes, brackets)
pub fn parse_column_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|c| {
            c.trim()
                .trim_matches('`')
                .trim_matches('"')
                .trim_matches('[')
                .trim_matches(']')
                .to_string()
        })
        .filter(|c| !c.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cardinality;

    const SCHEMA: &str = r#"
-- parent table
CREATE TABLE `users` (
  `id` int(11) NOT NULL AUTO_INCREMENT,
  `email` varchar(255) NOT NULL,
  `nickname` varchar(64) DEFAULT 'not null',
  PRIMARY KEY (`id`),
  UNIQUE KEY `uniq_email` (`email`)
);

CREATE TABLE orders (
  id INTEGER PRIMARY KEY,
  user_id INT NOT NULL REFERENCES users(id),
  coupon_id INT,
  total DECIMAL(10,2)
);

CREATE TABLE profiles (
  user_id INT NOT NULL,
  bio TEXT,
  CONSTRAINT fk_profile_user FOREIGN KEY (user_id) REFERENCES users (id),
  UNIQUE (user_id)
);

CREATE TABLE "public"."coupons" (
  "id" serial PRIMARY KEY,
  "code" character varying(32) NOT NULL
);

ALTER TABLE ONLY orders ADD CONSTRAINT fk_coupon FOREIGN KEY (coupon_id) REFERENCES public.coupons(id);
CREATE UNIQUE INDEX idx_code ON coupons (code);
INSERT INTO users VALUES (1, 'a@b.c', 'x;y');
"#;

    #[test]
    fn test_parse_tables_in_order() {
        let schema = SqlSchema::parse(SCHEMA);
        let names: Vec<_> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["users", "orders", "profiles", "coupons"]);
    }

    #[test]
    fn test_parse_columns_and_flags() {
        let schema = SqlSchema::parse(SCHEMA);
        let users = schema.get_table("users").unwrap();
        assert_eq!(users.columns.len(), 3);
        assert!(users.columns[0].is_primary_key);
        assert!(users.columns[1].not_null);
        assert!(!users.columns[2].not_null, "literal 'not null' is not a constraint");
        assert_eq!(users.primary_key, vec!["id"]);
        assert_eq!(users.unique_keys, vec![vec!["email".to_string()]]);

        let coupons = schema.get_table("coupons").unwrap();
        assert_eq!(coupons.columns[1].type_name, "character varying(32)");
        assert_eq!(coupons.unique_keys, vec![vec!["code".to_string()]]);
    }

    #[test]
    fn test_parse_foreign_keys() {
        let schema = SqlSchema::parse(SCHEMA);
        let orders = schema.get_table("orders").unwrap();
        assert_eq!(orders.foreign_keys.len(), 2);
        assert_eq!(orders.foreign_keys[0].referenced_table, "users");
        assert_eq!(orders.foreign_keys[1].name.as_deref(), Some("fk_coupon"));
        assert_eq!(orders.foreign_keys[1].referenced_table, "coupons");
    }

    #[test]
    fn test_split_statements_respects_quotes_and_comments() {
        let stmts = split_statements("SELECT ';'; -- x; y\nSELECT 2; /* ; */ SELECT 3");
        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[0], "SELECT ';'");
    }

    #[test]
    fn test_split_table_body() {
        let parts = split_table_body("id INT, amount DECIMAL(10,2), note TEXT DEFAULT 'a,b'");
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1], "amount DECIMAL(10,2)");
    }

    #[test]
    fn test_to_intermediary_relations() {
        let schema = SqlSchema::parse(SCHEMA);
        let result = schema.to_intermediary(&Formatters::default()).unwrap();

        assert_eq!(result.tables.len(), 4);
        assert_eq!(result.tables[0].columns[1].col_type, "VARCHAR");
        assert_eq!(result.tables[3].columns[1].col_type, "VARCHAR");
        assert_eq!(result.relations.len(), 3);

        // orders.user_id NOT NULL -> users.id
        let r = &result.relations[0];
        assert_eq!((r.left_table.as_str(), r.right_table.as_str()), ("orders", "users"));
        assert_eq!(r.left_cardinality, Some(Cardinality::OneOrMore));
        assert_eq!(r.right_cardinality, Some(Cardinality::One));

        // nullable orders.coupon_id -> coupons.id
        let r = &result.relations[1];
        assert_eq!(r.right_table, "coupons");
        assert_eq!(r.left_cardinality, Some(Cardinality::ZeroOrMore));
        assert_eq!(r.right_cardinality, Some(Cardinality::One));

        // unique profiles.user_id -> one-to-one
        let r = &result.relations[2];
        assert_eq!(r.left_table, "profiles");
        assert_eq!(r.left_cardinality, Some(Cardinality::One));
        assert_eq!(r.right_cardinality, Some(Cardinality::One));
    }

    #[test]
    fn test_reference_to_missing_table_is_skipped() {
        let schema = SqlSchema::parse(
            "CREATE TABLE a (id INT PRIMARY KEY, b_id INT REFERENCES b(id));",
        );
        let result = schema.to_intermediary(&Formatters::default()).unwrap();
        assert_eq!(result.tables.len(), 1);
        assert!(result.relations.is_empty());
    }

    #[test]
    fn test_keywords_in_defaults_are_not_constraints() {
        let schema = SqlSchema::parse(
            "CREATE TABLE t (id INT NOT NULL, note VARCHAR DEFAULT 'primary key', \
             tag VARCHAR DEFAULT 'references users(id)');",
        );
        let table = &schema.tables[0];
        assert!(table.primary_key.is_empty());
        assert!(table.columns.iter().all(|c| !c.is_primary_key));
        assert!(table.foreign_keys.is_empty());
    }

    #[test]
    fn test_default_literal_does_not_change_implied_parent_key() {
        let schema = SqlSchema::parse(
            "CREATE TABLE parent (id INT PRIMARY KEY, note VARCHAR DEFAULT 'primary key');
             CREATE TABLE child (id INT PRIMARY KEY, parent_id INT NOT NULL REFERENCES parent);",
        );
        assert_eq!(schema.tables[0].primary_key, vec!["id"]);
        let result = schema.to_intermediary(&Formatters::default()).unwrap();
        assert_eq!(result.relations[0].left_cardinality, Some(Cardinality::OneOrMore));
        assert_eq!(result.relations[0].right_cardinality, Some(Cardinality::One));
    }

    #[test]
    fn test_self_reference_without_column_list() {
        let schema = SqlSchema::parse(
            "CREATE TABLE categories (id INT PRIMARY KEY, parent_id INT REFERENCES categories);",
        );
        let result = schema.to_intermediary(&Formatters::default()).unwrap();
        assert_eq!(result.relations.len(), 1);
        assert!(result.relations[0].is_self_reference());
        assert_eq!(
            result.relations[0].right_cardinality,
            Some(Cardinality::One)
        );
    }
}
