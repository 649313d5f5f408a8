//! Unit tests for resource filtering.

use erdraw::{filter_resources, Cardinality, Column, Error, FilterConfig, Intermediary, Relation, Table};

fn schema() -> Intermediary {
    let table = |name: &str| {
        Table::new(
            name,
            vec![
                Column::new("id", "INTEGER", true),
                Column::new("created_at", "TIMESTAMP", false),
                Column::new(format!("{name}_name"), "VARCHAR", false),
            ],
        )
    };
    Intermediary::new(
        vec![table("users"), table("orders"), table("tmp_orders"), table("audit_log")],
        vec![
            Relation::new("orders", "users", Some(Cardinality::OneOrMore), Some(Cardinality::One)),
            Relation::new("tmp_orders", "orders", Some(Cardinality::ZeroOrMore), Some(Cardinality::One)),
            Relation::new("audit_log", "users", None, None),
        ],
    )
}

#[test]
fn test_empty_config_keeps_everything() {
    let input = schema();
    let result = filter_resources(&input, &FilterConfig::default()).unwrap();
    assert_eq!(result, input);
}

#[test]
fn test_exclude_glob_drops_tables_and_their_relations() {
    let config = FilterConfig {
        exclude_tables: vec!["tmp_*".into(), "audit_log".into()],
        ..Default::default()
    };
    let result = filter_resources(&schema(), &config).unwrap();
    let names: Vec<_> = result.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["users", "orders"]);
    assert_eq!(result.relations.len(), 1);
    assert_eq!(result.relations[0].left_cardinality, Some(Cardinality::OneOrMore));
}

#[test]
fn test_surviving_relations_reference_surviving_tables() {
    for pattern in ["users", "*orders", "audit_*", "nothing"] {
        let config = FilterConfig {
            include_tables: vec![pattern.into()],
            ..Default::default()
        };
        let result = filter_resources(&schema(), &config).unwrap();
        for r in &result.relations {
            assert!(result.get_table(&r.left_table).is_some());
            assert!(result.get_table(&r.right_table).is_some());
        }
    }
}

#[test]
fn test_exclude_columns_by_glob() {
    let config = FilterConfig {
        exclude_columns: vec!["*_name".into(), "created_at".into()],
        ..Default::default()
    };
    let result = filter_resources(&schema(), &config).unwrap();
    for table in &result.tables {
        let cols: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(cols, vec!["id"]);
    }
    assert_eq!(result.relations.len(), 3);
}

#[test]
fn test_conflict_is_checked_before_filtering() {
    let config = FilterConfig {
        include_columns: vec!["id".into()],
        exclude_columns: vec!["id".into()],
        ..Default::default()
    };
    let err = filter_resources(&Intermediary::default(), &config).unwrap_err();
    assert!(matches!(err, Error::ConflictingFilterConfiguration { kind: "columns" }));
}
