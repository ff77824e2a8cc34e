use std::time::Duration;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use persona_lib::{validation, Directory, RemoteDirectory};

use crate::output::{print_person, OutputFormat};

#[derive(Args)]
pub struct GetArgs {
    /// Person ID
    pub id: String,
}

pub async fn run(args: &GetArgs, directory: &RemoteDirectory, format: OutputFormat) -> Result<()> {
    let id = validation::validate_id(&args.id).map_err(super::user_error)?;

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("loading person {}...", id));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = directory.fetch_one(id).await;
    spinner.finish_and_clear();

    let person = result.map_err(super::user_error)?;
    print_person(&person, format)
}
