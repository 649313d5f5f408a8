//! DBML parsing.
//!
//! Supports `Table` blocks (columns, column settings, aliases, composite primary
//! keys declared under `indexes`), inline `ref:` settings and standalone `Ref`
//! lines and blocks. `Enum`, `Project`, `TableGroup` and `Note` elements are
//! skipped. The reference operator (`<`, `>`, `-`, `<>`) is passed to the
//! cardinality resolver unchanged.

use super::format::{split_qualified, unquote};
use super::{Formatters, IntoIntermediary};
use crate::cardinality::{relation_to_intermediary, ColumnFlags, NullabilityFlags, RelationEdge};
use crate::error::{Error, Result, SourceKind};
use crate::model::{Column, Intermediary, Table};
use once_cell::sync::Lazy;
use regex::Regex;

static TABLE_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^Table\s+((?:"[^"]+"|[^\s"\[]+)(?:\.(?:"[^"]+"|[^\s"\[]+))*)(?:\s+as\s+("[^"]+"|\S+))?\s*(?:\[.*\])?$"#)
        .unwrap()
});

static COLUMN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^("[^"]+"|`[^`]+`|[^\s\[]+)\s+("[^"]+"|[^\s\[(]+(?:\s*\([^)]*\))?(?:\[\])?)\s*(?:\[(.*)\])?$"#)
        .unwrap()
});

static REF_EXPR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?)\s*(<>|<|>|-)\s*([^\[]+?)\s*(?:\[.*\])?$").unwrap()
});

static INLINE_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^ref\s*:\s*(<>|<|>|-)\s*(.+)$").unwrap());

static INDEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\([^)]*\)|[^\s\[]+)\s*(?:\[(.*)\])?$").unwrap()
});

/// Column of a DBML table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbmlColumn {
    pub name: String,
    pub type_name: String,
    pub pk: bool,
    pub not_null: bool,
    pub unique: bool,
}

impl NullabilityFlags for DbmlColumn {
    fn not_null(&self) -> bool {
        self.not_null
    }

    fn is_primary_key(&self) -> bool {
        self.pk
    }
}

/// DBML table with its optional alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbmlTable {
    pub name: String,
    pub alias: Option<String>,
    pub columns: Vec<DbmlColumn>,
}

impl DbmlTable {
    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

/// One side of a reference, resolved to table and column positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub table: usize,
    pub columns: Vec<usize>,
}

/// Reference between two endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbmlRef {
    pub left: Endpoint,
    /// Reference operator as written: `<`, `>`, `-` or `<>`
    pub code: String,
    pub right: Endpoint,
    pub line: usize,
}

/// Parsed DBML document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbmlDocument {
    pub tables: Vec<DbmlTable>,
    pub refs: Vec<DbmlRef>,
}

/// Reference endpoint before table and column names are resolved
struct PendingRef {
    left: (String, Vec<String>),
    code: String,
    right: (String, Vec<String>),
    line: usize,
}

/// Top-level element: a header with an optional `{ body }`
struct Element {
    header: String,
    body: Option<String>,
    line: usize,
    body_line: usize,
}

impl DbmlDocument {
    /// Parse a DBML document
    pub fn parse(text: &str) -> Result<Self> {
        let mut doc = DbmlDocument::default();
        let mut pending = Vec::new();

        for element in split_elements(text)? {
            let keyword = element
                .header
                .split(|c: char| c.is_whitespace() || c == ':' || c == '[')
                .next()
                .unwrap_or("")
                .to_lowercase();

            match (keyword.as_str(), &element.body) {
                ("table", Some(body)) => {
                    let table = parse_table(&element, body, &mut pending)?;
                    if doc.tables.iter().any(|t| t.name == table.name) {
                        return Err(dbml_error(
                            element.line,
                            format!("duplicate table '{}'", table.name),
                        ));
                    }
                    doc.tables.push(table);
                }
                ("ref", Some(body)) => {
                    for (offset, line) in body.lines().enumerate() {
                        let expr = line.trim();
                        if !expr.is_empty() {
                            pending.push(parse_ref_expr(expr, element.body_line + offset)?);
                        }
                    }
                }
                ("ref", None) => {
                    let Some((_, expr)) = element.header.split_once(':') else {
                        return Err(dbml_error(element.line, "expected ':' after Ref"));
                    };
                    pending.push(parse_ref_expr(expr.trim(), element.line)?);
                }
                ("enum" | "project" | "tablegroup" | "note" | "tablepartial" | "records", _) => {}
                _ => {
                    return Err(dbml_error(
                        element.line,
                        format!("unexpected element: {}", element.header),
                    ))
                }
            }
        }

        for p in pending {
            let left = doc.resolve(&p.left, p.line)?;
            let right = doc.resolve(&p.right, p.line)?;
            doc.refs.push(DbmlRef {
                left,
                code: p.code,
                right,
                line: p.line,
            });
        }

        Ok(doc)
    }

    fn find_table(&self, name: &str) -> Option<usize> {
        let bare = super::format_name(name);
        self.tables.iter().position(|t| {
            super::format_name(&t.name) == bare || t.alias.as_deref() == Some(unquote(name))
        })
    }

    fn resolve(&self, (table, columns): &(String, Vec<String>), line: usize) -> Result<Endpoint> {
        let idx = self
            .find_table(table)
            .ok_or_else(|| dbml_error(line, format!("reference to unknown table '{}'", table)))?;
        let columns = columns
            .iter()
            .map(|c| {
                self.tables[idx].column_index(c).ok_or_else(|| {
                    dbml_error(line, format!("reference to unknown column '{}.{}'", table, c))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Endpoint {
            table: idx,
            columns,
        })
    }

    fn columns_of<'a>(&'a self, endpoint: &'a Endpoint) -> impl Iterator<Item = &'a DbmlColumn> + 'a {
        let table = &self.tables[endpoint.table];
        endpoint.columns.iter().map(move |&i| &table.columns[i])
    }
}

/// A reference adapted for cardinality resolution
#[derive(Debug, Clone)]
pub struct Reference<'a> {
    code: &'a str,
    left_table: &'a str,
    right_table: &'a str,
    left: ColumnFlags,
    right: ColumnFlags,
}

impl<'a> Reference<'a> {
    pub fn new(doc: &'a DbmlDocument, r: &'a DbmlRef) -> Self {
        Self {
            code: &r.code,
            left_table: &doc.tables[r.left.table].name,
            right_table: &doc.tables[r.right.table].name,
            left: ColumnFlags::combined(doc.columns_of(&r.left)),
            right: ColumnFlags::combined(doc.columns_of(&r.right)),
        }
    }
}

impl RelationEdge for Reference<'_> {
    type Column = ColumnFlags;

    fn type_code(&self) -> &str {
        self.code
    }

    fn left_table(&self) -> &str {
        self.left_table
    }

    fn right_table(&self) -> &str {
        self.right_table
    }

    fn left_column(&self) -> &ColumnFlags {
        &self.left
    }

    fn right_column(&self) -> &ColumnFlags {
        &self.right
    }
}

impl IntoIntermediary for DbmlDocument {
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
                                c.pk,
                            )
                        })
                        .collect(),
                )
            })
            .collect();

        let relations = self
            .refs
            .iter()
            .map(|r| relation_to_intermediary(&Reference::new(self, r), formatters))
            .collect::<Result<Vec<_>>>()?;

        Ok(Intermediary::new(tables, relations))
    }
}

fn dbml_error(line: usize, message: impl Into<String>) -> Error {
    Error::parse(SourceKind::Dbml, line, message)
}

/// Split the document into top-level elements, dropping comments.
///
/// String literals are kept verbatim except that newlines inside them become
/// spaces, so a body can be processed line by line.
fn split_elements(text: &str) -> Result<Vec<Element>> {
    let chars: Vec<char> = text.chars().collect();
    let mut elements = Vec::new();
    let mut header = String::new();
    let mut body = String::new();
    let mut depth = 0usize;
    let mut line = 1;
    let mut start_line = 1;
    let mut body_line = 1;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let buf = if depth == 0 { &mut header } else { &mut body };

        if ch == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }

        if ch == '/' && chars.get(i + 1) == Some(&'*') {
            i += 2;
            while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                if chars[i] == '\n' {
                    line += 1;
                    if depth > 0 {
                        buf.push('\n');
                    }
                }
                i += 1;
            }
            i += 2;
            continue;
        }

        if matches!(ch, '\'' | '"' | '`') {
            let triple = ch == '\''
                && chars.get(i + 1) == Some(&'\'')
                && chars.get(i + 2) == Some(&'\'');
            let width = if triple { 3 } else { 1 };
            let literal_line = line;

            buf.extend(&chars[i..i + width]);
            i += width;
            loop {
                if i >= chars.len() {
                    return Err(dbml_error(literal_line, "unterminated string literal"));
                }
                let closes = if triple {
                    chars[i..].starts_with(&['\'', '\'', '\''])
                } else {
                    chars[i] == ch
                };
                if closes {
                    buf.extend(&chars[i..i + width]);
                    i += width;
                    break;
                }
                if chars[i] == '\\' && i + 1 < chars.len() {
                    buf.push(chars[i]);
                    i += 1;
                }
                if chars[i] == '\n' {
                    line += 1;
                    buf.push(' ');
                } else {
                    buf.push(chars[i]);
                }
                i += 1;
            }
            continue;
        }

        match ch {
            '{' => {
                if depth == 0 {
                    body_line = line;
                } else {
                    body.push(ch);
                }
                depth += 1;
            }
            '}' => {
                if depth == 0 {
                    return Err(dbml_error(line, "unmatched '}'"));
                }
                depth -= 1;
                if depth == 0 {
                    elements.push(Element {
                        header: header.trim().to_string(),
                        body: Some(std::mem::take(&mut body)),
                        line: start_line,
                        body_line,
                    });
                    header.clear();
                } else {
                    body.push(ch);
                }
            }
            '\n' => {
                if depth == 0 {
                    if is_short_form(&header) {
                        elements.push(Element {
                            header: header.trim().to_string(),
                            body: None,
                            line: start_line,
                            body_line: start_line,
                        });
                        header.clear();
                    } else if !header.trim().is_empty() {
                        header.push(' ');
                    }
                } else {
                    body.push('\n');
                }
                line += 1;
            }
            _ => {
                if depth == 0 {
                    if header.trim().is_empty() && !ch.is_whitespace() {
                        start_line = line;
                    }
                    header.push(ch);
                } else {
                    body.push(ch);
                }
            }
        }
        i += 1;
    }

    if depth > 0 {
        return Err(dbml_error(start_line, "unclosed block"));
    }
    if !header.trim().is_empty() {
        if is_short_form(&header) {
            elements.push(Element {
                header: header.trim().to_string(),
                body: None,
                line: start_line,
                body_line: start_line,
            });
        } else {
            return Err(dbml_error(
                start_line,
                format!("unexpected element: {}", header.trim()),
            ));
        }
    }

    Ok(elements)
}

/// `Ref: a.x > b.y` and `Note: '...'` end at the newline; other headers wait for `{`
fn is_short_form(header: &str) -> bool {
    let header = header.trim_start();
    let keyword = header
        .split(|c: char| c.is_whitespace() || c == ':')
        .next()
        .unwrap_or("");
    (keyword.eq_ignore_ascii_case("ref") || keyword.eq_ignore_ascii_case("note"))
        && header.contains(':')
}

#[derive(Clone, Copy, PartialEq)]
enum Nested {
    Indexes,
    Other,
}

fn parse_table(element: &Element, body: &str, pending: &mut Vec<PendingRef>) -> Result<DbmlTable> {
    let caps = TABLE_HEADER_RE
        .captures(&element.header)
        .ok_or_else(|| dbml_error(element.line, format!("invalid table header: {}", element.header)))?;

    let mut table = DbmlTable {
        name: unquote_path(&caps[1]),
        alias: caps.get(2).map(|m| unquote(m.as_str()).to_string()),
        columns: Vec::new(),
    };
    let mut nested: Option<Nested> = None;
    let mut composite_pks: Vec<Vec<String>> = Vec::new();

    for (offset, raw) in body.lines().enumerate() {
        let line_no = element.body_line + offset;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(kind) = nested {
            if line.starts_with('}') {
                nested = None;
            } else if kind == Nested::Indexes {
                if let Some(pk) = parse_index_pk(line) {
                    composite_pks.push(pk);
                }
            }
            continue;
        }

        let lower = line.to_lowercase();
        if lower.starts_with("indexes") && line.ends_with('{') {
            nested = Some(Nested::Indexes);
            continue;
        }
        if lower.starts_with("note") {
            let rest = line[4..].trim_start();
            if rest.starts_with('{') && !rest.ends_with('}') {
                nested = Some(Nested::Other);
            }
            if rest.starts_with('{') || rest.starts_with(':') {
                continue;
            }
        }

        let caps = COLUMN_RE
            .captures(line)
            .ok_or_else(|| dbml_error(line_no, format!("invalid column definition: {}", line)))?;

        let name = unquote(&caps[1]).to_string();
        if table.column_index(&name).is_some() {
            return Err(dbml_error(
                line_no,
                format!("duplicate column '{}' in table '{}'", name, table.name),
            ));
        }

        let mut column = DbmlColumn {
            name,
            type_name: unquote(&caps[2]).to_string(),
            pk: false,
            not_null: false,
            unique: false,
        };

        if let Some(settings) = caps.get(3) {
            for setting in split_settings(settings.as_str()) {
                let lower = setting.to_lowercase();
                match lower.as_str() {
                    "pk" | "primary key" => column.pk = true,
                    "not null" => column.not_null = true,
                    "null" => column.not_null = false,
                    "unique" => column.unique = true,
                    _ => {
                        if let Some(r) = INLINE_REF_RE.captures(&setting) {
                            pending.push(PendingRef {
                                left: (table.name.clone(), vec![column.name.clone()]),
                                code: r[1].to_string(),
                                right: parse_endpoint(&r[2], line_no)?,
                                line: line_no,
                            });
                        }
                    }
                }
            }
        }

        table.columns.push(column);
    }

    for pk in composite_pks {
        for col_name in pk {
            if let Some(idx) = table.column_index(&col_name) {
                table.columns[idx].pk = true;
            }
        }
    }

    Ok(table)
}

/// Columns of an `indexes` entry flagged `pk`
fn parse_index_pk(line: &str) -> Option<Vec<String>> {
    let caps = INDEX_RE.captures(line)?;
    let settings = caps.get(2)?;
    let is_pk = split_settings(settings.as_str())
        .iter()
        .any(|s| s.eq_ignore_ascii_case("pk") || s.eq_ignore_ascii_case("primary key"));
    if !is_pk {
        return None;
    }
    let cols = caps[1].trim_start_matches('(').trim_end_matches(')');
    Some(
        cols.split(',')
            .map(|c| unquote(c.trim()).to_string())
            .filter(|c| !c.is_empty())
            .collect(),
    )
}

fn parse_ref_expr(expr: &str, line: usize) -> Result<PendingRef> {
    let caps = REF_EXPR_RE
        .captures(expr)
        .ok_or_else(|| dbml_error(line, format!("invalid reference: {}", expr)))?;
    Ok(PendingRef {
        left: parse_endpoint(&caps[1], line)?,
        code: caps[2].to_string(),
        right: parse_endpoint(&caps[3], line)?,
        line,
    })
}

/// Split `schema.table.column` or `table.(a, b)` into table and columns
fn parse_endpoint(s: &str, line: usize) -> Result<(String, Vec<String>)> {
    let s = s.trim();
    if let Some(pos) = s.rfind(".(") {
        if s.ends_with(')') {
            let columns = s[pos + 2..s.len() - 1]
                .split(',')
                .map(|c| unquote(c.trim()).to_string())
                .filter(|c| !c.is_empty())
                .collect();
            return Ok((s[..pos].to_string(), columns));
        }
    }

    let mut parts = split_qualified(s);
    match (parts.pop(), parts.is_empty()) {
        (Some(column), false) => Ok((parts.join("."), vec![unquote(column).to_string()])),
        _ => Err(dbml_error(
            line,
            format!("reference endpoint must be table.column: {}", s),
        )),
    }
}

fn unquote_path(s: &str) -> String {
    split_qualified(s)
        .into_iter()
        .map(unquote)
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a settings list on commas outside quotes and parentheses
fn split_settings(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut depth = 0;

    for ch in s.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"' | '`') => {
                quote = Some(ch);
                current.push(ch);
            }
            (None, '(') => {
                depth += 1;
                current.push(ch);
            }
            (None, ')') => {
                depth -= 1;
                current.push(ch);
            }
            (None, ',') if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            (None, c) => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cardinality;

    const DOC: &str = r#"
Project shop {
  database_type: 'PostgreSQL'
  Note: '''
    Shop schema {with braces}
  '''
}

// Users of the shop
Table users as U {
  id integer [pk, increment]
  email varchar(255) [not null, unique, note: 'login, lowercase']
  country_code int [ref: > countries.code]
  created_at timestamp [default: `now()`]
}

Table countries {
  code int [pk]
  name varchar
  Note: 'ISO 3166'
}

Table "order lines" {
  order_id int [not null]
  line_no int
  product_id int
  indexes {
    (order_id, line_no) [pk]
    product_id [name: 'idx_product']
  }
}

Table orders {
  id int [pk]
  user_id int [not null]
}

/* standalone references */
Ref: orders.user_id > U.id
Ref lines_to_orders {
  orders.id < "order lines".order_id
}

Enum status {
  active
  archived
}
"#;

    #[test]
    fn test_parse_tables() {
        let doc = DbmlDocument::parse(DOC).unwrap();
        let names: Vec<_> = doc.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["users", "countries", "order lines", "orders"]);
        assert_eq!(doc.tables[0].alias.as_deref(), Some("U"));
        assert_eq!(doc.tables[0].columns.len(), 4);
        assert_eq!(doc.tables[0].columns[1].type_name, "varchar(255)");
        assert!(doc.tables[0].columns[1].not_null);
        assert!(doc.tables[0].columns[1].unique);
        assert_eq!(doc.tables[1].columns.len(), 2);
    }

    #[test]
    fn test_composite_primary_key_from_indexes() {
        let doc = DbmlDocument::parse(DOC).unwrap();
        let lines = &doc.tables[2];
        assert!(lines.columns[0].pk);
        assert!(lines.columns[1].pk);
        assert!(!lines.columns[2].pk);
    }

    #[test]
    fn test_parse_refs() {
        let doc = DbmlDocument::parse(DOC).unwrap();
        assert_eq!(doc.refs.len(), 3);
        assert_eq!(doc.refs[0].code, ">");
        assert_eq!(doc.refs[0].left.table, 0);
        assert_eq!(doc.refs[0].right.table, 1);
        assert_eq!(doc.refs[1].right.table, 0, "alias U resolves to users");
        assert_eq!(doc.refs[2].code, "<");
        assert_eq!(doc.refs[2].right.table, 2);
    }

    #[test]
    fn test_to_intermediary_cardinalities() {
        let doc = DbmlDocument::parse(DOC).unwrap();
        let result = doc.to_intermediary(&Formatters::default()).unwrap();

        assert_eq!(result.tables[0].columns[1].col_type, "VARCHAR");

        // nullable users.country_code > countries.code (pk)
        let r = &result.relations[0];
        assert_eq!((r.left_table.as_str(), r.right_table.as_str()), ("users", "countries"));
        assert_eq!(r.left_cardinality, Some(Cardinality::ZeroOrMore));
        assert_eq!(r.right_cardinality, Some(Cardinality::One));

        // not null orders.user_id > users.id (pk)
        let r = &result.relations[1];
        assert_eq!(r.left_cardinality, Some(Cardinality::OneOrMore));
        assert_eq!(r.right_cardinality, Some(Cardinality::One));

        // orders.id (pk) < "order lines".order_id (not null)
        let r = &result.relations[2];
        assert_eq!(r.right_table, "order lines");
        assert_eq!(r.left_cardinality, Some(Cardinality::One));
        assert_eq!(r.right_cardinality, Some(Cardinality::OneOrMore));
    }

    #[test]
    fn test_composite_ref() {
        let doc = DbmlDocument::parse(
            "Table a {\n x int [pk]\n y int [pk]\n}\nTable b {\n x int\n y int [not null]\n}\nRef: b.(x, y) > a.(x, y)\n",
        )
        .unwrap();
        assert_eq!(doc.refs[0].left.columns, vec![0, 1]);
        let result = doc.to_intermediary(&Formatters::default()).unwrap();
        assert_eq!(result.relations[0].left_cardinality, Some(Cardinality::ZeroOrMore));
        assert_eq!(result.relations[0].right_cardinality, Some(Cardinality::One));
    }

    #[test]
    fn test_many_to_many_is_unsupported() {
        let doc = DbmlDocument::parse(
            "Table a {\n id int [pk]\n}\nTable b {\n id int [pk]\n}\nRef: a.id <> b.id\n",
        )
        .unwrap();
        let err = doc.to_intermediary(&Formatters::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedRelationType { .. }), "got: {err}");
    }

    #[test]
    fn test_unknown_reference_target_fails() {
        let err = DbmlDocument::parse("Table a {\n id int\n}\nRef: a.id > b.id\n").unwrap_err();
        assert!(err.to_string().contains("unknown table 'b'"), "got: {err}");

        let err = DbmlDocument::parse("Table a {\n id int\n}\nRef: a.id > a.nope\n").unwrap_err();
        assert!(err.to_string().contains("a.nope"), "got: {err}");
    }

    #[test]
    fn test_invalid_column_reports_line() {
        let err = DbmlDocument::parse("Table a {\n id int\n ???\n}\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }), "got: {err}");
    }

    #[test]
    fn test_table_settings_with_brace_on_next_line() {
        let doc = DbmlDocument::parse(
            "Table users [headercolor: #3498DB]\n{\n id int [pk]\n}\nTable posts\n{\n user_id int\n}\nRef: posts.user_id > users.id\n",
        )
        .unwrap();
        assert_eq!(doc.tables.len(), 2);
        assert_eq!(doc.tables[0].name, "users");
        assert!(doc.tables[0].columns[0].pk);
        assert_eq!(doc.refs.len(), 1);
    }

    #[test]
    fn test_unclosed_block_fails() {
        assert!(DbmlDocument::parse("Table a {\n id int\n").is_err());
    }

    #[test]
    fn test_split_settings() {
        assert_eq!(
            split_settings("pk, note: 'a, b', default: `now()`"),
            vec!["pk", "note: 'a, b'", "default: `now()`"]
        );
    }
}
