//! Live DuckDB database introspection.
//!
//! Columns come from `information_schema.columns`; keys and foreign keys come
//! from `duckdb_constraints()`. The result is the same table model the SQL DDL
//! parser produces, so foreign keys resolve identically.

use super::sql::{ForeignKey, SqlColumn, SqlSchema, SqlTable};
use super::{Formatters, IntoIntermediary};
use crate::error::{Error, Result};
use crate::model::Intermediary;
use duckdb::Connection;
use std::path::Path;

const COLUMNS_QUERY: &str = "\
SELECT table_schema, table_name, column_name, data_type, is_nullable
FROM information_schema.columns
WHERE table_catalog = current_database()
ORDER BY table_schema, table_name, ordinal_position";

const CONSTRAINTS_QUERY: &str = "\
SELECT schema_name, table_name, constraint_type,
       array_to_string(constraint_column_names, ','),
       referenced_table,
       array_to_string(referenced_column_names, ',')
FROM duckdb_constraints()
WHERE database_name = current_database()
  AND constraint_type IN ('PRIMARY KEY', 'UNIQUE', 'FOREIGN KEY')
ORDER BY schema_name, table_name, constraint_index";

/// Schema introspected from a DuckDB database
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseSchema {
    pub schema: SqlSchema,
}

struct ColumnRow {
    schema: String,
    table: String,
    column: String,
    data_type: String,
    nullable: bool,
}

struct ConstraintRow {
    schema: String,
    table: String,
    kind: String,
    columns: Option<String>,
    referenced_table: Option<String>,
    referenced_columns: Option<String>,
}

impl DatabaseSchema {
    /// Open a database file read-only and introspect it
    pub fn open(path: &Path, schema: Option<&str>) -> Result<Self> {
        let config = duckdb::Config::default().access_mode(duckdb::AccessMode::ReadOnly)?;
        let conn = Connection::open_with_flags(path, config)?;
        Self::introspect(&conn, schema)
    }

    /// Introspect every table of the connection, or only those in `schema`
    pub fn introspect(conn: &Connection, schema: Option<&str>) -> Result<Self> {
        let in_scope = |s: &str| schema.map_or(true, |wanted| s == wanted);

        let mut stmt = conn.prepare(COLUMNS_QUERY)?;
        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnRow {
                    schema: row.get(0)?,
                    table: row.get(1)?,
                    column: row.get(2)?,
                    data_type: row.get(3)?,
                    nullable: row.get::<_, String>(4)? == "YES",
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // keyed by (schema, table)
        let mut tables: Vec<(String, SqlTable)> = Vec::new();
        for row in columns.into_iter().filter(|r| in_scope(&r.schema)) {
            let idx = match tables
                .iter()
                .position(|(s, t)| *s == row.schema && t.name == row.table)
            {
                Some(idx) => idx,
                None => {
                    tables.push((row.schema.clone(), SqlTable::new(row.table.clone())));
                    tables.len() - 1
                }
            };
            tables[idx].1.columns.push(SqlColumn {
                name: row.column,
                type_name: row.data_type,
                not_null: !row.nullable,
                is_primary_key: false,
                is_unique: false,
            });
        }
        check_unambiguous(&tables)?;

        let mut stmt = conn.prepare(CONSTRAINTS_QUERY)?;
        let constraints = stmt
            .query_map([], |row| {
                Ok(ConstraintRow {
                    schema: row.get(0)?,
                    table: row.get(1)?,
                    kind: row.get(2)?,
                    columns: row.get(3)?,
                    referenced_table: row.get(4)?,
                    referenced_columns: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for row in constraints.into_iter().filter(|r| in_scope(&r.schema)) {
            let Some((_, table)) = tables
                .iter_mut()
                .find(|(s, t)| *s == row.schema && t.name == row.table)
            else {
                continue;
            };
            let columns = split_list(row.columns.as_deref());

            match row.kind.as_str() {
                "PRIMARY KEY" => table.mark_primary_key(&columns),
                "UNIQUE" => {
                    if let [single] = columns.as_slice() {
                        if let Some(col) = table.get_column_mut(single) {
                            col.is_unique = true;
                        }
                    }
                    table.unique_keys.push(columns);
                }
                "FOREIGN KEY" => {
                    if let Some(referenced_table) = row.referenced_table {
                        table.foreign_keys.push(ForeignKey {
                            name: None,
                            column_names: columns,
                            referenced_table,
                            referenced_columns: split_list(row.referenced_columns.as_deref()),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(Self {
            schema: SqlSchema {
                tables: tables.into_iter().map(|(_, t)| t).collect(),
            },
        })
    }
}

fn check_unambiguous(tables: &[(String, SqlTable)]) -> Result<()> {
    for (_, table) in tables {
        let schemas: Vec<String> = tables
            .iter()
            .filter(|(_, t)| t.name == table.name)
            .map(|(s, _)| s.clone())
            .collect();
        if schemas.len() > 1 {
            return Err(Error::AmbiguousTable {
                table: table.name.clone(),
                schemas,
            });
        }
    }
    Ok(())
}

fn split_list(list: Option<&str>) -> Vec<String> {
    list.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl IntoIntermediary for DatabaseSchema {
    fn to_intermediary(&self, formatters: &Formatters) -> Result<Intermediary> {
        self.schema.to_intermediary(formatters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cardinality;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE SCHEMA audit;
             CREATE TABLE users (id INTEGER PRIMARY KEY, email VARCHAR NOT NULL UNIQUE);
             CREATE TABLE orders (
                 id INTEGER PRIMARY KEY,
                 user_id INTEGER REFERENCES users(id),
                 total DECIMAL(10, 2)
             );
             CREATE TABLE profiles (
                 user_id INTEGER NOT NULL UNIQUE REFERENCES users(id),
                 bio VARCHAR
             );
             CREATE TABLE audit.events (id INTEGER, payload VARCHAR);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_introspect_tables_and_keys() {
        let conn = setup();
        let db = DatabaseSchema::introspect(&conn, Some("main")).unwrap();
        let names: Vec<_> = db.schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["orders", "profiles", "users"]);

        let users = db.schema.get_table("users").unwrap();
        assert_eq!(users.primary_key, vec!["id"]);
        assert!(users.get_column("email").unwrap().not_null);

        let orders = db.schema.get_table("orders").unwrap();
        assert_eq!(orders.foreign_keys.len(), 1);
        assert_eq!(orders.foreign_keys[0].referenced_table, "users");
    }

    #[test]
    fn test_schema_filter() {
        let conn = setup();
        let db = DatabaseSchema::introspect(&conn, Some("audit")).unwrap();
        assert_eq!(db.schema.tables.len(), 1);
        assert_eq!(db.schema.tables[0].name, "events");

        let all = DatabaseSchema::introspect(&conn, None).unwrap();
        assert_eq!(all.schema.tables.len(), 4);
    }

    #[test]
    fn test_same_table_name_in_two_schemas() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE SCHEMA audit;
             CREATE TABLE events (id INTEGER PRIMARY KEY);
             CREATE TABLE audit.events (id INTEGER, payload VARCHAR);",
        )
        .unwrap();

        let main = DatabaseSchema::introspect(&conn, Some("main")).unwrap();
        let events = &main.schema.tables[0];
        assert_eq!(main.schema.tables.len(), 1);
        assert_eq!(events.columns.len(), 1);
        assert_eq!(events.primary_key, vec!["id"]);

        let audit = DatabaseSchema::introspect(&conn, Some("audit")).unwrap();
        let events = &audit.schema.tables[0];
        let cols: Vec<_> = events.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(cols, vec!["id", "payload"]);
        assert!(events.primary_key.is_empty());

        let err = DatabaseSchema::introspect(&conn, None).unwrap_err();
        match err {
            Error::AmbiguousTable { table, schemas } => {
                assert_eq!(table, "events");
                assert_eq!(schemas, vec!["audit", "main"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_to_intermediary() {
        let conn = setup();
        let db = DatabaseSchema::introspect(&conn, Some("main")).unwrap();
        let result = db.to_intermediary(&Formatters::default()).unwrap();

        assert_eq!(result.relations.len(), 2);
        let orders = result.relations.iter().find(|r| r.left_table == "orders").unwrap();
        assert_eq!(orders.left_cardinality, Some(Cardinality::ZeroOrMore));
        assert_eq!(orders.right_cardinality, Some(Cardinality::One));

        let profiles = result.relations.iter().find(|r| r.left_table == "profiles").unwrap();
        assert_eq!(profiles.left_cardinality, Some(Cardinality::One));
        assert_eq!(profiles.right_cardinality, Some(Cardinality::One));
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope").join("db.duckdb");
        assert!(DatabaseSchema::open(&missing, None).is_err());
    }
}
