mod render;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "erdraw")]
#[command(version)]
#[command(about = "Draw entity-relationship diagrams from database schemas", long_about = None)]
pub struct Cli {
    /// Verbose output (debug logging to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a schema source as a diagram, dot source or markdown ER text
    #[command(visible_alias = "r")]
    Render {
        /// Schema source: duckdb://path, *.duckdb, *.sql (optionally compressed),
        /// *.er, *.md, *.dbml, *.yaml, *.yml or *.json
        #[arg(short, long)]
        input: String,

        /// Output file (stdout if not specified; required for images)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output mode: auto, graph, dot, er (auto picks by output extension)
        #[arg(short, long)]
        mode: Option<String>,

        /// Diagram title
        #[arg(long)]
        title: Option<String>,

        /// Layout direction: lr (left-right) or tb (top-bottom)
        #[arg(long)]
        layout: Option<String>,

        /// Database schema to introspect (DuckDB sources only)
        #[arg(long)]
        schema: Option<String>,

        /// Only include these tables (comma-separated, supports globs)
        #[arg(long, conflicts_with = "exclude_tables")]
        include_tables: Option<String>,

        /// Exclude these tables (comma-separated, supports globs)
        #[arg(long)]
        exclude_tables: Option<String>,

        /// Only include these columns (comma-separated, supports globs)
        #[arg(long, conflicts_with = "exclude_columns")]
        include_columns: Option<String>,

        /// Exclude these columns (comma-separated, supports globs)
        #[arg(long)]
        exclude_columns: Option<String>,

        /// YAML config file with title, layout, mode, schema and filter settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Install the stderr log subscriber; `RUST_LOG` takes precedence over `-v`
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Render {
            input,
            output,
            mode,
            title,
            layout,
            schema,
            include_tables,
            exclude_tables,
            include_columns,
            exclude_columns,
            config,
        } => render::run(render::RenderArgs {
            input,
            output,
            mode,
            title,
            layout,
            schema,
            include_tables,
            exclude_tables,
            include_columns,
            exclude_columns,
            config,
        }),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "erdraw", &mut io::stdout());
            Ok(())
        }
    }
}
