use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sqlweave_core::{ColumnMeta, Config, Diagnostic, DiagnosticCode, DialectConfig};
use sqlweave_sql::{ContextKind, Environment, Node, RenderContext, SelectStatement};

/// Default config file looked up in the working directory
const CONFIG_FILE: &str = "sqlweave.toml";

/// SQLWeave - Context-sensitive SQL rendering for expression trees
#[derive(Parser)]
#[command(name = "sqlweave")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: sqlweave.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured dialect
    #[arg(short, long, global = true)]
    dialect: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit diagnostics as JSON on failure
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single node in a context
    Render {
        /// JSON file holding the node
        node: PathBuf,

        /// Context to render the node in
        #[arg(long, value_enum, default_value = "select-list")]
        context: ContextArg,

        /// Column metadata as JSON, used to quote operands
        #[arg(long)]
        column: Option<String>,
    },

    /// Render a full SELECT statement
    Statement {
        /// JSON file holding the statement
        statement: PathBuf,
    },

    /// Write a default config file
    InitConfig {
        /// Destination (default: sqlweave.toml)
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ContextArg {
    SelectList,
    Where,
    Order,
    Group,
    WhereCondition,
    AttributeOperand,
    TableReference,
    SelectStatement,
}

impl From<ContextArg> for ContextKind {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::SelectList => ContextKind::SelectList,
            ContextArg::Where => ContextKind::Where,
            ContextArg::Order => ContextKind::Order,
            ContextArg::Group => ContextKind::Group,
            ContextArg::WhereCondition => ContextKind::WhereCondition,
            ContextArg::AttributeOperand => ContextKind::AttributeOperand,
            ContextArg::TableReference => ContextKind::TableReference,
            ContextArg::SelectStatement => ContextKind::SelectStatement,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Render { node, context, column } => load_config(&cli).and_then(|config| {
            render_command(&config, node, (*context).into(), column.as_deref(), cli.verbose)
        }),
        Commands::Statement { statement } => {
            load_config(&cli).and_then(|config| statement_command(&config, statement, cli.verbose))
        }
        Commands::InitConfig { path } => init_config_command(path.as_deref(), cli.verbose),
    };

    match result {
        Ok(sql) => {
            println!("{}", sql);
            Ok(())
        }
        Err(diagnostic) => {
            report_failure(&diagnostic, cli.json)?;
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Load config from --config, then ./sqlweave.toml, then defaults
fn load_config(cli: &Cli) -> Result<Config, Diagnostic> {
    let config_error = |e: sqlweave_core::ConfigError| {
        Diagnostic::error(DiagnosticCode::ConfigInvalid, e.to_string())
    };

    let mut config = if let Some(config_path) = &cli.config {
        tracing::debug!(path = %config_path.display(), "loading config");
        Config::from_file(config_path).map_err(config_error)?
    } else if Path::new(CONFIG_FILE).exists() {
        tracing::debug!(path = CONFIG_FILE, "loading config from working directory");
        Config::from_file(Path::new(CONFIG_FILE)).map_err(config_error)?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    if let Some(dialect) = &cli.dialect {
        config.dialect = dialect.parse::<DialectConfig>().map_err(config_error)?;
        tracing::debug!(dialect = ?config.dialect, "dialect overridden from command line");
    }

    if cli.verbose {
        eprintln!("{} dialect: {:?}", "Using".cyan(), config.dialect);
    }

    Ok(config)
}

/// Render command - one node in one context
fn render_command(
    config: &Config,
    node_path: &Path,
    context: ContextKind,
    column: Option<&str>,
    verbose: bool,
) -> Result<String, Diagnostic> {
    let node: Node = read_json(node_path)?;
    let column: Option<ColumnMeta> = column
        .map(|json| {
            serde_json::from_str(json).map_err(|e| {
                Diagnostic::error(DiagnosticCode::InputInvalid, format!("Invalid column metadata: {}", e))
            })
        })
        .transpose()?;

    if verbose {
        eprintln!("{} {} in {} context", "Rendering".cyan(), node.kind(), context);
    }

    if let Some(warning) = column_hint_warning(context, column.as_ref()) {
        eprintln!("{} {}", "!".yellow().bold(), warning.to_string().yellow());
    }

    render_node(config, &node, context, column.as_ref())
}

/// Column hints only reach scalars rendered as attribute operands
fn column_hint_warning(context: ContextKind, column: Option<&ColumnMeta>) -> Option<Diagnostic> {
    match (context, column) {
        (ContextKind::AttributeOperand, _) | (_, None) => None,
        (other, Some(column)) => Some(
            Diagnostic::warning(
                DiagnosticCode::ColumnHintIgnored,
                format!("Column hint '{}' is not used in {} context", column.name, other),
            )
            .with_context(other.as_str()),
        ),
    }
}

/// Christen the node's relations and render it
fn render_node(
    config: &Config,
    node: &Node,
    context: ContextKind,
    column: Option<&ColumnMeta>,
) -> Result<String, Diagnostic> {
    let env = Environment::from_config(config).with_node(node);
    let context = match context {
        ContextKind::AttributeOperand => RenderContext::attribute_operand(&env, column),
        other => RenderContext::new(other, &env),
    };

    node.to_sql(&context).map_err(|e| e.to_diagnostic())
}

/// Statement command - a full SELECT
fn statement_command(config: &Config, statement_path: &Path, verbose: bool) -> Result<String, Diagnostic> {
    let statement: SelectStatement = read_json(statement_path)?;
    let env = Environment::from_config(config).with_statement(&statement);
    tracing::debug!(relations = env.names().len(), dialect = ?config.dialect, "environment ready");

    if verbose {
        eprintln!("{} {} relations", "Christened".cyan(), env.names().len());
        for (relation, name) in env.names().relations() {
            eprintln!("  {} -> {}", relation, name.green());
        }
    }

    statement.to_sql(&env).map_err(|e| e.to_diagnostic())
}

/// Init-config command - write the default config
fn init_config_command(path: Option<&Path>, verbose: bool) -> Result<String, Diagnostic> {
    let path = path.unwrap_or_else(|| Path::new(CONFIG_FILE));

    if path.exists() {
        return Err(Diagnostic::error(
            DiagnosticCode::ConfigInvalid,
            format!("{} already exists", path.display()),
        ));
    }

    Config::default()
        .save_to_file(path)
        .map_err(|e| Diagnostic::error(DiagnosticCode::ConfigInvalid, e.to_string()))?;

    if verbose {
        eprintln!("{} {}", "Config saved to:".green(), path.display());
    }

    Ok(format!("Created {}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Diagnostic> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Diagnostic::error(
            DiagnosticCode::InputInvalid,
            format!("Failed to read {}: {}", path.display(), e),
        )
    })?;

    serde_json::from_str(&content).map_err(|e| {
        Diagnostic::error(
            DiagnosticCode::InputInvalid,
            format!("Failed to parse {}: {}", path.display(), e),
        )
    })
}

fn report_failure(diagnostic: &Diagnostic, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(diagnostic)?);
    } else {
        eprintln!("{} {}", "✗".red().bold(), diagnostic.to_string().red());
    }
    Ok(())
}
