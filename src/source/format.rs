//! Name and type formatting applied before values enter the intermediary.

/// Pluggable string formatters used by every mapper
#[derive(Debug, Clone, Copy)]
pub struct Formatters {
    /// Applied to table and column names
    pub name: fn(&str) -> String,
    /// Applied to column type names
    pub col_type: fn(&str) -> String,
}

impl Default for Formatters {
    fn default() -> Self {
        Self {
            name: format_name,
            col_type: format_type,
        }
    }
}

impl Formatters {
    /// Formatters that pass names and types through untouched
    pub fn identity() -> Self {
        Self {
            name: |s| s.to_string(),
            col_type: |s| s.to_string(),
        }
    }
}

/// Strip quoting and schema qualification from an identifier.
///
/// `"public"."users"`, `[dbo].[users]` and `` `users` `` all become `users`.
pub fn format_name(name: &str) -> String {
    let name = name.trim();
    let last = split_qualified(name).pop().unwrap_or(name);
    unquote(last).to_string()
}

/// Collapse a source type name into a display name.
///
/// Parameters and modifiers are dropped and the result is upper-cased:
/// `varchar(255)` becomes `VARCHAR`, `int(11) unsigned` becomes `INT`.
pub fn format_type(col_type: &str) -> String {
    let lower = col_type.trim().to_lowercase();
    let base = lower.split('(').next().unwrap_or(&lower).trim();
    let base = base
        .trim_end_matches(" unsigned")
        .trim_end_matches(" signed")
        .trim_end_matches(" zerofill")
        .trim();

    let normalized = match base {
        "character varying" | "varying character" | "nvarchar" | "varchar2" => "varchar",
        "character" | "nchar" => "char",
        "double precision" => "double",
        "timestamp with time zone" => "timestamptz",
        "timestamp without time zone" => "timestamp",
        "time with time zone" => "timetz",
        "time without time zone" => "time",
        "int4" => "integer",
        "int8" => "bigint",
        "int2" => "smallint",
        "bool" => "boolean",
        other => other,
    };

    normalized.to_uppercase()
}

/// Split `a.b.c` on dots that are not inside quotes or brackets
pub(crate) fn split_qualified(name: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;

    for (i, ch) in name.char_indices() {
        match (quote, ch) {
            (None, '"' | '`') => quote = Some(ch),
            (None, '[') => quote = Some(']'),
            (Some(q), c) if c == q => quote = None,
            (None, '.') => {
                parts.push(&name[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&name[start..]);
    parts
}

pub(crate) fn unquote(s: &str) -> &str {
    let s = s.trim();
    for (open, close) in [('"', '"'), ('`', '`'), ('[', ']'), ('\'', '\'')] {
        if s.len() >= 2 && s.starts_with(open) && s.ends_with(close) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
