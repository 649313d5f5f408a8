//! Include/exclude filtering of tables and columns.

use crate::error::{Error, Result};
use crate::model::{Intermediary, Table};
use ahash::AHashSet;
use glob::Pattern;
use serde::{Deserialize, Serialize};

/// Table and column selection. Entries are glob patterns; a plain name matches itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub include_tables: Vec<String>,
    pub exclude_tables: Vec<String>,
    pub include_columns: Vec<String>,
    pub exclude_columns: Vec<String>,
}

impl FilterConfig {
    pub fn is_empty(&self) -> bool {
        self.include_tables.is_empty()
            && self.exclude_tables.is_empty()
            && self.include_columns.is_empty()
            && self.exclude_columns.is_empty()
    }

    /// Reject include and exclude lists given for the same kind
    pub fn validate(&self) -> Result<()> {
        if !self.include_tables.is_empty() && !self.exclude_tables.is_empty() {
            return Err(Error::ConflictingFilterConfiguration { kind: "tables" });
        }
        if !self.include_columns.is_empty() && !self.exclude_columns.is_empty() {
            return Err(Error::ConflictingFilterConfiguration { kind: "columns" });
        }
        Ok(())
    }
}

/// Compiled include/exclude rule for one kind of resource
struct Rule {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl Rule {
    fn new(include: &[String], exclude: &[String]) -> Self {
        Self {
            include: compile(include),
            exclude: compile(exclude),
        }
    }

    fn keeps(&self, name: &str) -> bool {
        if self.exclude.iter().any(|p| p.matches(name)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| p.matches(name))
    }
}

fn compile(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| {
            Pattern::new(p)
                .or_else(|_| Pattern::new(&Pattern::escape(p)))
                .ok()
        })
        .collect()
}

/// Apply a filter configuration, returning a new intermediary.
///
/// Relations are kept only when both of their tables survive. Cardinalities
/// are carried over unchanged.
pub fn filter_resources(intermediary: &Intermediary, config: &FilterConfig) -> Result<Intermediary> {
    config.validate()?;
    if config.is_empty() {
        return Ok(intermediary.clone());
    }

    let tables = Rule::new(&config.include_tables, &config.exclude_tables);
    let columns = Rule::new(&config.include_columns, &config.exclude_columns);

    let kept: Vec<Table> = intermediary
        .tables
        .iter()
        .filter(|t| tables.keeps(&t.name))
        .map(|t| {
            Table::new(
                t.name.clone(),
                t.columns
                    .iter()
                    .filter(|c| columns.keeps(&c.name))
                    .cloned()
                    .collect(),
            )
        })
        .collect();

    let kept_names: AHashSet<&str> = kept.iter().map(|t| t.name.as_str()).collect();
    let relations = intermediary
        .relations
        .iter()
        .filter(|r| {
            kept_names.contains(r.left_table.as_str()) && kept_names.contains(r.right_table.as_str())
        })
        .cloned()
        .collect();

    Ok(Intermediary::new(kept, relations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cardinality, Column, Relation};

    fn sample() -> Intermediary {
        Intermediary::new(
            vec![
                Table::new(
                    "parent",
                    vec![
                        Column::new("id", "INTEGER", true),
                        Column::new("name", "VARCHAR", false),
                    ],
                ),
                Table::new(
                    "child",
                    vec![
                        Column::new("id", "INTEGER", true),
                        Column::new("parent_id", "INTEGER", false),
                    ],
                ),
                Table::new("exclude", vec![Column::new("id", "INTEGER", true)]),
            ],
            vec![
                Relation::new(
                    "parent",
                    "child",
                    Some(Cardinality::ZeroOrOne),
                    Some(Cardinality::ZeroOrMore),
                ),
                Relation::new("exclude", "child", None, None),
            ],
        )
    }

    fn names(i: &Intermediary) -> Vec<&str> {
        i.tables.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_include_tables() {
        let config = FilterConfig {
            include_tables: vec!["parent".into(), "child".into()],
            ..Default::default()
        };
        let result = filter_resources(&sample(), &config).unwrap();
        assert_eq!(names(&result), vec!["parent", "child"]);
        assert_eq!(result.relations.len(), 1);
        assert_eq!(result.relations[0].left_cardinality, Some(Cardinality::ZeroOrOne));
    }

    #[test]
    fn test_include_single_table_drops_its_relations() {
        let config = FilterConfig {
            include_tables: vec!["parent".into()],
            ..Default::default()
        };
        let result = filter_resources(&sample(), &config).unwrap();
        assert_eq!(names(&result), vec!["parent"]);
        assert_eq!(result.tables[0], sample().tables[0]);
        assert!(result.relations.is_empty());
    }

    #[test]
    fn test_exclude_tables_drops_relations() {
        let config = FilterConfig {
            exclude_tables: vec!["exclude".into()],
            ..Default::default()
        };
        let result = filter_resources(&sample(), &config).unwrap();
        assert_eq!(names(&result), vec!["parent", "child"]);
        assert!(result.relations.iter().all(|r| r.left_table != "exclude"));
    }

    #[test]
    fn test_exclude_tables_with_glob() {
        let config = FilterConfig {
            exclude_tables: vec!["*ld".into()],
            ..Default::default()
        };
        let result = filter_resources(&sample(), &config).unwrap();
        assert_eq!(names(&result), vec!["parent", "exclude"]);
        assert!(result.relations.is_empty());
    }

    #[test]
    fn test_include_columns() {
        let config = FilterConfig {
            include_columns: vec!["id".into()],
            ..Default::default()
        };
        let result = filter_resources(&sample(), &config).unwrap();
        assert!(result.tables.iter().all(|t| t.columns.len() == 1));
        assert_eq!(result.relations.len(), 2);
    }

    #[test]
    fn test_exclude_columns() {
        let config = FilterConfig {
            exclude_columns: vec!["id".into()],
            ..Default::default()
        };
        let result = filter_resources(&sample(), &config).unwrap();
        assert!(result
            .tables
            .iter()
            .all(|t| t.columns.iter().all(|c| c.name != "id")));
        assert!(result.tables[2].columns.is_empty());
    }

    #[test]
    fn test_conflicting_configuration() {
        let config = FilterConfig {
            include_tables: vec!["parent".into()],
            exclude_tables: vec!["child".into()],
            ..Default::default()
        };
        assert!(matches!(
            filter_resources(&sample(), &config),
            Err(Error::ConflictingFilterConfiguration { kind: "tables" })
        ));

        let config = FilterConfig {
            include_columns: vec!["id".into()],
            exclude_columns: vec!["name".into()],
            ..Default::default()
        };
        assert!(matches!(
            filter_resources(&sample(), &config),
            Err(Error::ConflictingFilterConfiguration { kind: "columns" })
        ));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = sample();
        let config = FilterConfig {
            exclude_tables: vec!["parent".into()],
            ..Default::default()
        };
        let _ = filter_resources(&input, &config).unwrap();
        assert_eq!(input, sample());
    }

    #[test]
    fn test_invalid_glob_matches_literally() {
        let input = Intermediary::new(vec![Table::new("a[", vec![])], vec![]);
        let config = FilterConfig {
            include_tables: vec!["a[".into()],
            ..Default::default()
        };
        assert_eq!(filter_resources(&input, &config).unwrap().tables.len(), 1);
    }
}
