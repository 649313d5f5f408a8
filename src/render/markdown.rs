//! Markdown ER (`.er`) output, readable again by the markdown mapper.

use super::RenderOptions;
use crate::model::{Intermediary, Relation, Table};

/// Generate markdown ER text
pub fn to_markdown(intermediary: &Intermediary, options: &RenderOptions) -> String {
    let mut output = String::new();

    if let Some(title) = &options.title {
        for line in title.lines() {
            output.push_str(&format!("# {}\n", line));
        }
        output.push('\n');
    }

    for table in &intermediary.tables {
        output.push_str(&table_block(table));
        output.push('\n');
    }

    for relation in &intermediary.relations {
        output.push_str(&relation_line(relation));
        output.push('\n');
    }

    output
}

fn table_block(table: &Table) -> String {
    let mut block = format!("[{}]\n", table.name);
    for col in &table.columns {
        let key = if col.is_key { "*" } else { "" };
        let name = if col.name.starts_with('*') {
            format!("`{}`", col.name)
        } else {
            quote_spaced(&col.name)
        };
        if col.col_type.is_empty() {
            block.push_str(&format!("{}{}\n", key, name));
        } else {
            block.push_str(&format!("{}{} {{label:\"{}\"}}\n", key, name, col.col_type));
        }
    }
    block
}

fn relation_line(relation: &Relation) -> String {
    let symbol = |c: Option<crate::model::Cardinality>| c.map(|c| c.symbol()).unwrap_or("");
    format!(
        "{} {}--{} {}",
        quote_spaced(&relation.left_table),
        symbol(relation.left_cardinality),
        symbol(relation.right_cardinality),
        quote_spaced(&relation.right_table)
    )
}

/// Backtick-quote names the line grammar would otherwise split
fn quote_spaced(name: &str) -> String {
    if name.contains(char::is_whitespace) {
        format!("`{}`", name)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cardinality, Column};
    use crate::source::{Formatters, IntoIntermediary, MarkdownDocument};

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
                        Column::new("notes", "", false),
                    ],
                ),
            ],
            vec![
                Relation::new(
                    "parent",
                    "child",
                    Some(Cardinality::ZeroOrOne),
                    Some(Cardinality::ZeroOrMore),
                ),
                Relation::new("child", "parent", None, None),
            ],
        )
    }

    #[test]
    fn test_markdown_layout() {
        let output = to_markdown(&sample(), &RenderOptions::default());
        assert!(output.starts_with("[parent]\n*id {label:\"INTEGER\"}\nname {label:\"VARCHAR\"}\n"));
        assert!(output.contains("\nnotes\n"));
        assert!(output.contains("parent ?--* child\n"));
        assert!(output.contains("child -- parent\n"));
    }

    #[test]
    fn test_markdown_title_is_comment() {
        let options = RenderOptions {
            title: Some("Shop".to_string()),
            ..Default::default()
        };
        assert!(to_markdown(&sample(), &options).starts_with("# Shop\n\n[parent]"));
    }

    #[test]
    fn test_markdown_reparses_to_same_intermediary() {
        let output = to_markdown(&sample(), &RenderOptions::default());
        let doc = MarkdownDocument::parse_str(&output).unwrap();
        let reparsed = doc.to_intermediary(&Formatters::identity()).unwrap();
        assert_eq!(reparsed, sample());
    }

    #[test]
    fn test_markdown_reparses_names_with_spaces() {
        let input = Intermediary::new(
            vec![
                Table::new("orders", vec![Column::new("id", "INTEGER", true)]),
                Table::new(
                    "order lines",
                    vec![
                        Column::new("id", "INTEGER", true),
                        Column::new("order id", "INTEGER", false),
                    ],
                ),
            ],
            vec![Relation::new(
                "order lines",
                "orders",
                Some(Cardinality::OneOrMore),
                Some(Cardinality::One),
            )],
        );
        let output = to_markdown(&input, &RenderOptions::default());
        assert!(output.contains("`order lines` +--1 orders\n"));
        let doc = MarkdownDocument::parse_str(&output).unwrap();
        let reparsed = doc.to_intermediary(&Formatters::identity()).unwrap();
        assert_eq!(reparsed, input);
    }
}
