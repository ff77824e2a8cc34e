//! The `list` subcommand: one page of people, or everyone with `--all`.

use anyhow::{anyhow, Result};
use clap::Args;
use persona_lib::{validation, Directory, RemoteDirectory, Settings, SortColumn, SortDirection, SortOrder};

use crate::output::{page_summary, print_people, OutputFormat};

#[derive(Args)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Results per page (defaults to PERSONAS_PAGE_SIZE)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Fetch every person in one request instead of a single page
    #[arg(long, conflicts_with_all = ["page", "page_size"])]
    pub all: bool,

    /// Sort field: id, name, age, email
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort ascending instead of descending
    #[arg(long, requires = "sort_by")]
    pub asc: bool,
}

impl ListArgs {
    fn sort_order(&self) -> Result<Option<SortOrder>> {
        let Some(column) = &self.sort_by else {
            return Ok(None);
        };
        let column: SortColumn = column.parse().map_err(|e: String| anyhow!(e))?;
        let direction = if self.asc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        Ok(Some(SortOrder::new(column, direction)))
    }
}

pub async fn run(
    args: &ListArgs,
    directory: &RemoteDirectory,
    settings: &Settings,
    format: OutputFormat,
) -> Result<()> {
    let order = args.sort_order()?;

    if args.all {
        let mut people = directory.list_all().await;
        if let Some(order) = order {
            order.sort(&mut people);
        }
        eprintln!("{} people", people.len());
        return print_people(&people, format);
    }

    let page_size = validation::validate_page_size(args.page_size.unwrap_or(settings.page_size))
        .map_err(super::user_error)?;
    let page_index = validation::validate_page_number(args.page).map_err(super::user_error)?;

    let page = directory.fetch_page(page_index + 1, page_size).await;
    eprintln!("{}", page_summary(&page));
    print_people(&page.sorted_records(order), format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(sort_by: Option<&str>, asc: bool) -> ListArgs {
        ListArgs {
            page: 1,
            page_size: None,
            all: false,
            sort_by: sort_by.map(str::to_string),
            asc,
        }
    }

    #[test]
    fn test_sort_order_defaults_to_descending() {
        let order = args(Some("name"), false).sort_order().unwrap().unwrap();
        assert_eq!(order, SortOrder::new(SortColumn::Name, SortDirection::Desc));
        let order = args(Some("age"), true).sort_order().unwrap().unwrap();
        assert_eq!(order.direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_order_unset_and_invalid() {
        assert!(args(None, false).sort_order().unwrap().is_none());
        assert!(args(Some("salary"), false).sort_order().is_err());
    }
}
