//! Cardinality resolution for relation edges.
//!
//! Every source format describes a relation with a type code and the columns on
//! each side. The type code gives the base cardinality pair; each side is then
//! downgraded to its nullable variant unless that side's column is NOT NULL or
//! part of the primary key.

use crate::error::{Error, Result};
use crate::model::{Cardinality, Relation};
use crate::source::Formatters;
use std::fmt;
use std::str::FromStr;

/// Shape of a relation between two tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationType {
    /// `<`: one row on the left, many on the right
    OneToMany,
    /// `>`: many rows on the left, one on the right
    ManyToOne,
    /// `-`
    OneToOne,
    /// Empty code: relation without known multiplicity
    Unknown,
}

impl RelationType {
    /// Base cardinality pair, before nullability is taken into account
    pub fn base_cardinalities(self) -> (Option<Cardinality>, Option<Cardinality>) {
        match self {
            RelationType::OneToMany => (Some(Cardinality::One), Some(Cardinality::OneOrMore)),
            RelationType::ManyToOne => (Some(Cardinality::OneOrMore), Some(Cardinality::One)),
            RelationType::OneToOne => (Some(Cardinality::One), Some(Cardinality::One)),
            RelationType::Unknown => (None, None),
        }
    }

    /// The DBML reference operator for this shape
    pub fn code(self) -> &'static str {
        match self {
            RelationType::OneToMany => "<",
            RelationType::ManyToOne => ">",
            RelationType::OneToOne => "-",
            RelationType::Unknown => "",
        }
    }
}

impl FromStr for RelationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "<" | "one-to-many" | "one_to_many" | "onetomany" => Ok(RelationType::OneToMany),
            ">" | "many-to-one" | "many_to_one" | "manytoone" => Ok(RelationType::ManyToOne),
            "-" | "one-to-one" | "one_to_one" | "onetoone" => Ok(RelationType::OneToOne),
            "" | "none" | "unknown" => Ok(RelationType::Unknown),
            _ => Err(Error::UnsupportedRelationType {
                code: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationType::OneToMany => write!(f, "one-to-many"),
            RelationType::ManyToOne => write!(f, "many-to-one"),
            RelationType::OneToOne => write!(f, "one-to-one"),
            RelationType::Unknown => write!(f, "none"),
        }
    }
}

/// Column flags that decide whether a relation side may be empty
pub trait NullabilityFlags {
    fn not_null(&self) -> bool;
    fn is_primary_key(&self) -> bool;
}

/// Plain pair of nullability flags, for adapters without a richer column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnFlags {
    pub not_null: bool,
    pub is_primary_key: bool,
}

impl ColumnFlags {
    /// Flags of a composite endpoint: each flag holds only if it holds for every column
    pub fn combined<'a, C, I>(columns: I) -> Self
    where
        C: NullabilityFlags + 'a,
        I: IntoIterator<Item = &'a C>,
    {
        let mut any = false;
        let mut flags = ColumnFlags {
            not_null: true,
            is_primary_key: true,
        };
        for column in columns {
            any = true;
            flags.not_null &= column.not_null();
            flags.is_primary_key &= column.is_primary_key();
        }
        if any {
            flags
        } else {
            ColumnFlags::default()
        }
    }
}

impl NullabilityFlags for ColumnFlags {
    fn not_null(&self) -> bool {
        self.not_null
    }

    fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }
}

/// A source-format relation adapted for cardinality resolution
pub trait RelationEdge {
    type Column: NullabilityFlags;

    /// Relation type code, parsed with [`RelationType::from_str`]
    fn type_code(&self) -> &str;

    fn left_table(&self) -> &str;
    fn right_table(&self) -> &str;

    fn left_column(&self) -> &Self::Column;
    fn right_column(&self) -> &Self::Column;
}

/// Map a relation type code to its base cardinality pair
pub fn resolve_relation_type(code: &str) -> Result<(Option<Cardinality>, Option<Cardinality>)> {
    let relation_type: RelationType = code.parse()?;
    Ok(relation_type.base_cardinalities())
}

/// Downgrade a base cardinality unless the column is NOT NULL or a primary key
pub fn apply_nullability<C: NullabilityFlags + ?Sized>(
    column: &C,
    base: Option<Cardinality>,
) -> Option<Cardinality> {
    if column.not_null() || column.is_primary_key() {
        return base;
    }
    base.map(Cardinality::nullable)
}

/// Resolve the adjusted cardinality of both sides of a relation
pub fn extract_cardinalities<E: RelationEdge + ?Sized>(
    relation: &E,
) -> Result<(Option<Cardinality>, Option<Cardinality>)> {
    let (left, right) = resolve_relation_type(relation.type_code())?;
    Ok((
        apply_nullability(relation.left_column(), left),
        apply_nullability(relation.right_column(), right),
    ))
}

/// Build the intermediary relation for an adapted edge
pub fn relation_to_intermediary<E: RelationEdge + ?Sized>(
    relation: &E,
    formatters: &Formatters,
) -> Result<Relation> {
    let (left_cardinality, right_cardinality) = extract_cardinalities(relation)?;
    Ok(Relation {
        left_table: (formatters.name)(relation.left_table()),
        right_table: (formatters.name)(relation.right_table()),
        left_cardinality,
        right_cardinality,
    })
}
