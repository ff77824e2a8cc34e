use std::io::Write;

use anyhow::Result;
use persona_lib::{DetailState, Page, Person};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Self {
        match value {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct PersonRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Age")]
    #[serde(rename = "Age")]
    age: i64,
    #[tabled(rename = "Email")]
    #[serde(rename = "Email")]
    email: String,
}

fn build_person_rows(people: &[Person]) -> Vec<PersonRow> {
    people
        .iter()
        .map(|p| PersonRow {
            id: p.id,
            name: p.name.clone(),
            age: p.age,
            email: p.email.clone(),
        })
        .collect()
}

pub fn people_table(people: &[Person]) -> String {
    Table::new(build_person_rows(people)).to_string()
}

pub fn people_markdown(people: &[Person]) -> String {
    let mut table = Table::new(build_person_rows(people));
    table.with(Style::markdown());
    table.to_string()
}

pub fn write_people_csv<W: Write>(writer: W, people: &[Person]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in build_person_rows(people) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_people(people: &[Person], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", people_table(people)),
        OutputFormat::Markdown => println!("{}", people_markdown(people)),
        OutputFormat::Csv => write_people_csv(std::io::stdout(), people)?,
        OutputFormat::Json => print_json(&people),
    }
    Ok(())
}

pub fn print_person(person: &Person, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(person);
            Ok(())
        }
        _ => print_people(std::slice::from_ref(person), format),
    }
}

/// One-line summary printed to stderr above a page of rows.
pub fn page_summary(page: &Page) -> String {
    if page.total_pages == 0 {
        return "No people found".to_string();
    }
    format!(
        "Page {}/{} ({} total people, {} per page)",
        page.current_page, page.total_pages, page.total_records, page.page_size
    )
}

pub fn detail_text(state: &DetailState) -> String {
    match state {
        DetailState::Loading => "Loading...".to_string(),
        DetailState::Loaded(p) => format!(
            "ID:    {}\nName:  {}\nAge:   {}\nEmail: {}",
            p.id, p.name, p.age, p.email
        ),
        DetailState::Failed(msg) => format!("Could not load this person: {}", msg),
    }
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
