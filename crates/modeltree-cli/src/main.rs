//! Modeltree Command-Line Interface
//!
//! Inspect the shortest-path tree of a schema, resolve field query strings,
//! and render the joins a selection needs.

mod commands;
mod formatter;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use commands::FieldArg;
use formatter::OutputFormat;
use modeltree_core::fixtures::company_schema;
use modeltree_core::{RegistryConfig, SchemaBundle, SchemaSource, TreeConfig, TreeRegistry};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Modeltree Command-Line Interface
#[derive(Parser, Debug)]
#[command(name = "modeltree")]
#[command(version, about = "Shortest-path join trees over relational schemas")]
pub struct Args {
    /// Schema JSON file (defaults to the built-in company schema)
    #[arg(short, long, global = true)]
    pub schema: Option<PathBuf>,

    /// Registry configuration JSON file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text", value_enum, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the tree
    Tree {
        /// Tree alias or root entity label (defaults to the configured default)
        #[arg(short, long)]
        alias: Option<String>,
    },
    /// Print the query string addressing a field
    Path {
        /// Field as `app.Entity.field` or `Entity.field`
        field: FieldArg,
        /// Tree alias or root entity label
        #[arg(short, long)]
        alias: Option<String>,
        /// Append a lookup operator, e.g. `gt`
        #[arg(short, long)]
        lookup: Option<String>,
    },
    /// Print the query selecting the given fields
    Sql {
        /// Fields as `app.Entity.field` or `Entity.field`
        #[arg(required = true)]
        fields: Vec<FieldArg>,
        /// Tree alias or root entity label
        #[arg(short, long)]
        alias: Option<String>,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modeltree=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let schema: Arc<dyn SchemaSource> = match &args.schema {
        Some(path) => Arc::new(SchemaBundle::from_file(path)?),
        None => Arc::new(company_schema()),
    };
    let config = match (&args.config, &args.schema) {
        (Some(path), _) => RegistryConfig::from_file(path)?,
        (None, Some(_)) => RegistryConfig::new(),
        (None, None) => demo_config(),
    };
    debug!(
        entities = schema.entities().len(),
        trees = config.trees.len(),
        "Loaded schema"
    );

    let registry = TreeRegistry::new(schema, config);
    let formatter = formatter::create_formatter(args.format);

    let output = match &args.command {
        Command::Tree { alias } => commands::tree(&registry, alias.as_deref(), &*formatter)?,
        Command::Path {
            field,
            alias,
            lookup,
        } => commands::path(
            &registry,
            alias.as_deref(),
            field,
            lookup.as_deref(),
            &*formatter,
        )?,
        Command::Sql { fields, alias } => {
            commands::sql(&registry, alias.as_deref(), fields, &*formatter)?
        }
    };

    println!("{}", output);
    Ok(())
}

/// Trees over the built-in schema when no configuration is given.
fn demo_config() -> RegistryConfig {
    RegistryConfig::new()
        .with_tree("default", TreeConfig::new("tests.Employee"))
        .with_tree("office", TreeConfig::new("tests.Office"))
        .with_tree("meeting", TreeConfig::new("tests.Meeting"))
}
