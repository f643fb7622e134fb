use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tfbreak_ruleset_azurerm::schema::{self, Schema, SchemaError};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare two configurations and report force-new changes
    Check(CheckArgs),
    /// Show force-new attributes known to the provider schema
    Schema(SchemaArgs),
    /// List the rules of this rule set
    Rules,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Directory holding the configuration before the change
    #[arg(long)]
    pub old: PathBuf,

    /// Directory holding the configuration after the change
    #[arg(long)]
    pub new: PathBuf,

    #[arg(long, value_enum, env = "TFBREAK_FORMAT", default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub schema: SchemaSource,
}

#[derive(clap::Args, Debug)]
pub struct SchemaArgs {
    /// Resource type to print; omit for a summary of the whole schema
    pub resource_type: Option<String>,

    #[command(flatten)]
    pub schema: SchemaSource,
}

#[derive(clap::Args, Debug)]
pub struct SchemaSource {
    /// Gzip-compressed provider schema to use instead of the embedded one
    #[arg(long = "schema", env = "TFBREAK_AZURERM_SCHEMA")]
    pub path: Option<PathBuf>,
}

impl SchemaSource {
    pub fn load(&self) -> Result<Arc<Schema>, SchemaError> {
        match &self.path {
            Some(path) => schema::load_from_path(path).map(Arc::new),
            None => Ok(schema::load()),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
