//! Entity-relationship diagrams from database schema sources.
//!
//! A source (SQL DDL, markdown ER, DBML, ORM model metadata or a live DuckDB
//! database) is mapped into an [`Intermediary`] of tables and relations, with
//! relation cardinalities derived from the relation type and the nullability
//! of the columns on each side. The intermediary can then be filtered and
//! rendered as Graphviz dot, an image, or markdown ER text.

pub mod cardinality;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod render;
pub mod source;

pub use cardinality::{
    apply_nullability, extract_cardinalities, relation_to_intermediary, resolve_relation_type,
    NullabilityFlags, RelationEdge, RelationType,
};
pub use error::{Error, Result};
pub use filter::{filter_resources, FilterConfig};
pub use model::{Cardinality, Column, Intermediary, Relation, Table};
pub use render::{get_output_mode, Layout, OutputMode, RenderOptions};
pub use source::{Formatters, IntoIntermediary, Source};
