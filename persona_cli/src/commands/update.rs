use anyhow::{bail, Result};
use clap::Args;
use persona_lib::{validation, Directory, Person, PersonForm, RemoteDirectory};

use crate::output::{print_person, OutputFormat};

#[derive(Args)]
pub struct UpdateArgs {
    /// Person ID
    pub id: String,

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

pub async fn run(args: &UpdateArgs, directory: &RemoteDirectory, format: OutputFormat) -> Result<()> {
    let id = validation::validate_id(&args.id).map_err(super::user_error)?;
    let form = PersonForm::new(&args.name, &args.age, &args.email);
    let draft = match validation::validate_person_form(&form) {
        Ok(draft) => draft,
        Err(errors) => bail!("Invalid person: {}", errors),
    };

    // An empty acknowledgement means the submitted values were stored as-is.
    let person = directory
        .update(id, &draft)
        .await
        .map_err(super::user_error)?
        .unwrap_or_else(|| Person::from_draft(id, &draft));
    eprintln!("Updated person {}", person.id);
    print_person(&person, format)
}
