//! ORM model metadata (YAML or JSON).
//!
//! ```yaml
//! models:
//!   - name: User
//!     table: users
//!     columns:
//!       - { name: id, type: integer, primary_key: true }
//!       - { name: email, type: varchar(255), nullable: false, unique: true }
//!   - name: Order
//!     table: orders
//!     columns:
//!       - { name: id, type: integer, primary_key: true }
//!       - { name: user_id, type: integer, foreign_key: users.id }
//!     relationships:
//!       - { local: orders.id, remote: order_lines.order_id, direction: one-to-many }
//! ```

use super::{Formatters, IntoIntermediary};
use crate::cardinality::{relation_to_intermediary, ColumnFlags, NullabilityFlags, RelationEdge, RelationType};
use crate::error::{Error, Result};
use crate::model::{Column, Intermediary, Table};
use serde::Deserialize;

/// Root of a metadata file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    #[serde(default)]
    pub models: Vec<Model>,
}

/// One mapped model
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Model {
    /// Class name, informational only
    #[serde(default)]
    pub name: Option<String>,
    /// Table the model maps to
    pub table: String,
    #[serde(default)]
    pub columns: Vec<ModelColumn>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

/// Mapped column
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelColumn {
    pub name: String,
    #[serde(rename = "type", default)]
    pub col_type: String,
    /// Defaults to true, except for primary key columns
    #[serde(default)]
    pub nullable: Option<bool>,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
    /// Referenced column as `table.column`
    #[serde(default)]
    pub foreign_key: Option<String>,
}

impl ModelColumn {
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(!self.primary_key)
    }
}

impl NullabilityFlags for ModelColumn {
    fn not_null(&self) -> bool {
        !self.is_nullable()
    }

    fn is_primary_key(&self) -> bool {
        self.primary_key
    }
}

/// Relationship declared on a model
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Relationship {
    /// Local side as `table.column`, or a bare column of the declaring model
    pub local: String,
    /// Remote side as `table.column`
    pub remote: String,
    /// Relation type code: `<`, `>`, `-`, `one-to-many`, `MANYTOONE`, ...
    #[serde(default)]
    pub direction: String,
}

impl Metadata {
    /// Parse YAML metadata (JSON is accepted too, being a YAML subset)
    pub fn from_yaml(text: &str) -> Result<Self> {
        let metadata: Metadata =
            serde_yaml_ng::from_str(text).map_err(|e| Error::Metadata(e.to_string()))?;
        metadata.validate()?;
        Ok(metadata)
    }

    /// Parse JSON metadata
    pub fn from_json(text: &str) -> Result<Self> {
        let metadata: Metadata =
            serde_json::from_str(text).map_err(|e| Error::Metadata(e.to_string()))?;
        metadata.validate()?;
        Ok(metadata)
    }

    fn validate(&self) -> Result<()> {
        for (i, model) in self.models.iter().enumerate() {
            if self.models[..i].iter().any(|m| m.table == model.table) {
                return Err(Error::Metadata(format!(
                    "table '{}' is mapped twice",
                    model.table
                )));
            }
            for (j, column) in model.columns.iter().enumerate() {
                if model.columns[..j].iter().any(|c| c.name == column.name) {
                    return Err(Error::Metadata(format!(
                        "duplicate column '{}' in table '{}'",
                        column.name, model.table
                    )));
                }
            }
        }
        Ok(())
    }

    fn model(&self, table: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.table == table)
    }

    /// Resolve `table.column` to its model and column
    fn lookup(&self, target: &str) -> Result<(&Model, &ModelColumn)> {
        let (table, column) = target
            .rsplit_once('.')
            .ok_or_else(|| Error::Metadata(format!("expected table.column, got '{}'", target)))?;
        let model = self
            .model(table)
            .ok_or_else(|| Error::Metadata(format!("unknown table '{}'", table)))?;
        let column = model
            .columns
            .iter()
            .find(|c| c.name == column)
            .ok_or_else(|| Error::Metadata(format!("unknown column '{}'", target)))?;
        Ok((model, column))
    }
}

/// A foreign key column or declared relationship, adapted for resolution
#[derive(Debug, Clone)]
pub struct ModelEdge<'a> {
    code: &'a str,
    local_table: &'a str,
    remote_table: &'a str,
    local: ColumnFlags,
    remote: ColumnFlags,
}

impl<'a> ModelEdge<'a> {
    fn new(
        code: &'a str,
        (local_model, local): (&'a Model, &ModelColumn),
        (remote_model, remote): (&'a Model, &ModelColumn),
    ) -> Self {
        Self {
            code,
            local_table: &local_model.table,
            remote_table: &remote_model.table,
            local: ColumnFlags::combined([local]),
            remote: ColumnFlags::combined([remote]),
        }
    }
}

impl RelationEdge for ModelEdge<'_> {
    type Column = ColumnFlags;

    fn type_code(&self) -> &str {
        self.code
    }

    fn left_table(&self) -> &str {
        self.local_table
    }

    fn right_table(&self) -> &str {
        self.remote_table
    }

    fn left_column(&self) -> &ColumnFlags {
        &self.local
    }

    fn right_column(&self) -> &ColumnFlags {
        &self.remote
    }
}

impl IntoIntermediary for Metadata {
    fn to_intermediary(&self, formatters: &Formatters) -> Result<Intermediary> {
        let tables = self
            .models
            .iter()
            .map(|m| {
                Table::new(
                    (formatters.name)(&m.table),
                    m.columns
                        .iter()
                        .map(|c| {
                            Column::new(
                                (formatters.name)(&c.name),
                                (formatters.col_type)(&c.col_type),
                                c.primary_key,
                            )
                        })
                        .collect(),
                )
            })
            .collect();

        let mut relations = Vec::new();
        for model in &self.models {
            for column in &model.columns {
                let Some(target) = &column.foreign_key else {
                    continue;
                };
                let code = if column.unique || column.primary_key {
                    RelationType::OneToOne.code()
                } else {
                    RelationType::ManyToOne.code()
                };
                let edge = ModelEdge::new(code, (model, column), self.lookup(target)?);
                relations.push(relation_to_intermediary(&edge, formatters)?);
            }

            for rel in &model.relationships {
                let local = if rel.local.contains('.') {
                    self.lookup(&rel.local)?
                } else {
                    self.lookup(&format!("{}.{}", model.table, rel.local))?
                };
                let edge = ModelEdge::new(&rel.direction, local, self.lookup(&rel.remote)?);
                relations.push(relation_to_intermediary(&edge, formatters)?);
            }
        }

        Ok(Intermediary::new(tables, relations))
    }
}
