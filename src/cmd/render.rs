//! Render command implementation.

use anyhow::{bail, Context, Result};
use erdraw::config::RenderConfig;
use erdraw::render::{render_with_graphviz, to_dot, to_markdown};
use erdraw::{
    filter_resources, get_output_mode, FilterConfig, Formatters, Layout, OutputMode,
    RenderOptions, Source,
};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct RenderArgs {
    pub input: String,
    pub output: Option<PathBuf>,
    pub mode: Option<String>,
    pub title: Option<String>,
    pub layout: Option<String>,
    pub schema: Option<String>,
    pub include_tables: Option<String>,
    pub exclude_tables: Option<String>,
    pub include_columns: Option<String>,
    pub exclude_columns: Option<String>,
    pub config: Option<PathBuf>,
}

/// Run the render command
pub fn run(args: RenderArgs) -> Result<()> {
    let layout = args
        .layout
        .map(|l| l.parse::<Layout>())
        .transpose()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let overrides = RenderConfig {
        title: args.title,
        layout,
        mode: args.mode,
        schema: args.schema,
        filter: FilterConfig {
            include_tables: split_list(args.include_tables),
            exclude_tables: split_list(args.exclude_tables),
            include_columns: split_list(args.include_columns),
            exclude_columns: split_list(args.exclude_columns),
        },
    };

    let config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?
            .merge(overrides),
        None => overrides,
    };
    debug!(?config, "effective configuration");

    let mode = get_output_mode(args.output.as_deref(), config.mode.as_deref().unwrap_or("auto"))?;
    if mode == OutputMode::Graph && args.output.is_none() {
        bail!("graph mode renders an image and needs an output file (-o diagram.png)");
    }

    let source = Source::detect(&args.input)?;
    let intermediary = source
        .load(&Formatters::default(), config.schema.as_deref())
        .with_context(|| format!("failed to load {}", args.input))?;
    let intermediary = filter_resources(&intermediary, &config.filter)?;

    if intermediary.is_empty() {
        eprintln!("No tables found in {}.", args.input);
    }

    let options = RenderOptions {
        title: config.title,
        layout: config.layout.unwrap_or_default(),
    };

    match (mode, &args.output) {
        (OutputMode::Graph, Some(path)) => {
            render_with_graphviz(&to_dot(&intermediary, &options), path)?;
            eprintln!("Rendered to: {}", path.display());
        }
        (OutputMode::Dot | OutputMode::Er, Some(path)) => {
            fs::write(path, render_text(mode, &intermediary, &options))
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("ERD written to: {}", path.display());
        }
        (_, None) => print!("{}", render_text(mode, &intermediary, &options)),
    }

    eprintln!(
        "ERD: {} tables, {} columns, {} relationships",
        intermediary.tables.len(),
        intermediary.column_count(),
        intermediary.relations.len()
    );

    Ok(())
}

fn render_text(mode: OutputMode, intermediary: &erdraw::Intermediary, options: &RenderOptions) -> String {
    match mode {
        OutputMode::Er => to_markdown(intermediary, options),
        _ => to_dot(intermediary, options),
    }
}

fn split_list(list: Option<String>) -> Vec<String> {
    list.map(|l| {
        l.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
