mod commands;
mod output;
mod terminal;

use anyhow::Result;
use clap::{Parser, Subcommand};
use persona_lib::Settings;

use crate::output::OutputFormat;

/// Default log level for this binary's own targets.
const LOG_DIRECTIVE: &str = concat!(env!("CARGO_CRATE_NAME"), "=info");

#[derive(Parser)]
#[command(name = "personas")]
#[command(about = "Browse and manage the people stored in a Personas directory")]
struct Cli {
    /// Output format: table, json, csv, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Base URL of the directory API (overrides PERSONAS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List people one page at a time
    List(commands::list::ListArgs),
    /// Show a single person by ID
    Get(commands::get::GetArgs),
    /// Add a person
    Create(commands::create::CreateArgs),
    /// Replace a person's name, age, and email
    Update(commands::update::UpdateArgs),
    /// Delete a person
    Delete(commands::delete::DeleteArgs),
    /// Browse the list and edit people from a prompt
    Interactive,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(LOG_DIRECTIVE.parse()?)
                .add_directive("persona_lib=warn".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = OutputFormat::parse(&cli.output);
    let settings = Settings::from_env().with_api_url(cli.api_url.as_deref());
    let directory = settings.directory();
    tracing::debug!("Using directory at {}", settings.api_url);

    match &cli.command {
        Commands::List(args) => commands::list::run(args, &directory, &settings, format).await?,
        Commands::Get(args) => commands::get::run(args, &directory, format).await?,
        Commands::Create(args) => commands::create::run(args, &directory, format).await?,
        Commands::Update(args) => commands::update::run(args, &directory, format).await?,
        Commands::Delete(args) => commands::delete::run(args, &directory).await?,
        Commands::Interactive => commands::interactive::run(directory, &settings).await?,
    }

    Ok(())
}
