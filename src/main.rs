mod cli;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, OutputFormat};
use tfbreak_ruleset_azurerm::{LocalRunner, RuleSet, Severity, output, rules};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check(args) => {
            let rule_set = RuleSet::with_schema(args.schema.load()?);
            let runner = LocalRunner::from_dirs(&args.old, &args.new)?;
            rule_set.check(&runner).await?;

            let issues = runner.issues();
            tracing::info!(count = issues.len(), "check complete");

            match args.format {
                OutputFormat::Table => println!("{}", output::issues_table(&issues)),
                OutputFormat::Json => println!("{}", output::issues_json(&issues)?),
            }

            if issues.iter().any(|issue| issue.severity == Severity::Error) {
                std::process::exit(2);
            }
        }
        Command::Schema(args) => {
            let schema = args.schema.load()?;
            match args.resource_type {
                Some(resource_type) => {
                    if !schema.has_resource(&resource_type) {
                        color_eyre::eyre::bail!("unknown resource type: {resource_type}");
                    }
                    let paths = schema.force_new_attributes(&resource_type);
                    print!("{}", output::path_tree(&resource_type, &paths));
                }
                None => {
                    println!(
                        "{} resources with {} force-new attributes",
                        schema.resource_schemas.len(),
                        schema.count_force_new()
                    );
                }
            }
        }
        Command::Rules => {
            println!("{}", output::rules_table(rules::builtin()));
        }
    }

    Ok(())
}
