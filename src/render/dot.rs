//! Graphviz DOT output.

use super::{Layout, RenderOptions};
use crate::model::{Cardinality, Intermediary, Relation, Table};

/// Generate DOT source with one HTML-like table node per table
pub fn to_dot(intermediary: &Intermediary, options: &RenderOptions) -> String {
    let mut output = String::new();

    output.push_str("graph {\n");
    output.push_str("  graph [pad=\"0.5\", nodesep=\"0.5\", ranksep=\"2\", fontname=\"Helvetica\"];\n");

    let rankdir = match options.layout {
        Layout::LR => "LR",
        Layout::TB => "TB",
    };
    output.push_str(&format!("  rankdir={};\n", rankdir));

    if let Some(title) = &options.title {
        output.push_str(&format!(
            "  labelloc=t;\n  label=<<FONT POINT-SIZE=\"20\">{}</FONT>>;\n",
            escape_html(title)
        ));
    }

    output.push_str("  node [shape=none, margin=0, fontname=\"Helvetica\"];\n");
    output.push_str("  edge [fontname=\"Helvetica\", fontsize=\"10\"];\n\n");

    for table in &intermediary.tables {
        output.push_str(&format!(
            "  {} [label=<{}>];\n",
            escape_dot_id(&table.name),
            generate_table_label(table)
        ));
    }

    if !intermediary.relations.is_empty() {
        output.push('\n');
    }

    for relation in &intermediary.relations {
        output.push_str(&format!("  {};\n", generate_edge(relation)));
    }

    output.push_str("}\n");
    output
}

fn generate_edge(relation: &Relation) -> String {
    let mut attrs = Vec::new();
    if let Some(label) = relation.left_cardinality.map(Cardinality::label) {
        attrs.push(format!("taillabel=<<FONT>{}</FONT>>", escape_html(label)));
    }
    if let Some(label) = relation.right_cardinality.map(Cardinality::label) {
        attrs.push(format!("headlabel=<<FONT>{}</FONT>>", escape_html(label)));
    }

    let mut edge = format!(
        "{} -- {}",
        escape_dot_id(&relation.left_table),
        escape_dot_id(&relation.right_table)
    );
    if !attrs.is_empty() {
        edge.push_str(&format!(" [{}]", attrs.join(", ")));
    }
    edge
}

/// HTML-like label: a header row, then one row per column with key columns underlined
fn generate_table_label(table: &Table) -> String {
    let mut html = String::new();

    html.push_str("<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\" CELLPADDING=\"4\">");
    html.push_str(&format!(
        "<TR><TD BGCOLOR=\"#ececfc\" ALIGN=\"CENTER\"><B><FONT POINT-SIZE=\"16\">{}</FONT></B></TD></TR>",
        escape_html(&table.name)
    ));

    for col in &table.columns {
        let name = if col.is_key {
            format!("<U>{}</U>", escape_html(&col.name))
        } else {
            escape_html(&col.name)
        };
        let col_type = if col.col_type.is_empty() {
            String::new()
        } else {
            format!(" <FONT COLOR=\"#666666\">[{}]</FONT>", escape_html(&col.col_type))
        };
        html.push_str(&format!(
            "<TR><TD ALIGN=\"LEFT\">{}{}</TD></TR>",
            name, col_type
        ));
    }

    html.push_str("</TABLE>");
    html
}

/// Escape a string for use in DOT HTML labels
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape a string for use as a DOT node ID
fn escape_dot_id(s: &str) -> String {
    if s.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !s.is_empty()
        && !s.starts_with(|c: char| c.is_ascii_digit())
    {
        s.to_string()
    } else {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
