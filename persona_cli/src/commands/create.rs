use anyhow::{bail, Result};
use clap::Args;
use persona_lib::{validation, Directory, PersonForm, RemoteDirectory};

use crate::output::{print_person, OutputFormat};

#[derive(Args)]
pub struct CreateArgs {
    /// Full name (at most 50 characters)
    #[arg(long)]
    pub name: String,

    /// Age in years, 0 to 150
    #[arg(long)]
    pub age: String,

    /// Email address
    #[arg(long)]
    pub email: String,
}

pub async fn run(args: &CreateArgs, directory: &RemoteDirectory, format: OutputFormat) -> Result<()> {
    let form = PersonForm::new(&args.name, &args.age, &args.email);
    let draft = match validation::validate_person_form(&form) {
        Ok(draft) => draft,
        Err(errors) => bail!("Invalid person: {}", errors),
    };

    let person = directory.create(&draft).await.map_err(super::user_error)?;
    eprintln!("Created person {}", person.id);
    print_person(&person, format)
}
