use anyhow::Result;
use clap::Args;
use persona_lib::{validation, Directory, RemoteDirectory};

use crate::terminal::Prompter;

#[derive(Args)]
pub struct DeleteArgs {
    /// Person ID
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

pub async fn run(args: &DeleteArgs, directory: &RemoteDirectory) -> Result<()> {
    let id = validation::validate_id(&args.id).map_err(super::user_error)?;

    if !args.yes {
        let prompter = Prompter::stdin();
        let question = format!("Delete person {}? [y/N] ", id);
        if !prompter.confirm(&question).await {
            eprintln!("Nothing deleted");
            return Ok(());
        }
    }

    directory.delete(id).await.map_err(super::user_error)?;
    eprintln!("Deleted person {}", id);
    Ok(())
}
