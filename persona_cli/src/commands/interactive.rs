//! The `interactive` subcommand: a paginated list screen driven from a prompt.

use std::sync::Arc;

use anyhow::Result;
use persona_lib::{
    validation, DeleteOutcome, ListController, PersonaID, RemoteDirectory, Settings, SortColumn,
    SortDirection, SortOrder,
};

use crate::output::{page_summary, people_table};
use crate::terminal::{Prompter, TerminalHost};

const HELP: &str = "\
Commands:
  n                  next page
  p                  previous page
  g <page>           go to page (1-based)
  z <size>           change page size (1-100)
  s [column] [dir]   sort by id|name|age|email, asc|desc; no column clears
  c                  add a person
  e <id>             edit a person on this page
  v <id>             view a person on this page
  d <id>             delete a person on this page
  r                  reload
  h                  help
  q                  quit
In forms, a blank answer keeps the shown value and '-' clears it.";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Next,
    Previous,
    Goto(usize),
    PageSize(usize),
    Sort(Option<SortOrder>),
    Create,
    Edit(PersonaID),
    View(PersonaID),
    Delete(PersonaID),
    Reload,
    Help,
    Quit,
    Nothing,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(Command::Nothing);
    };
    let arg = parts.next();
    let id = |arg: Option<&str>| -> Result<PersonaID, String> {
        let arg = arg.ok_or_else(|| format!("'{}' needs a person ID", head))?;
        validation::validate_id(arg).map_err(|e| e.user_message())
    };
    let number = |arg: Option<&str>| -> Result<usize, String> {
        arg.ok_or_else(|| format!("'{}' needs a number", head))?
            .parse::<usize>()
            .map_err(|_| format!("'{}' needs a number", head))
    };

    let command = match head.to_lowercase().as_str() {
        "n" | "next" => Command::Next,
        "p" | "prev" => Command::Previous,
        "g" | "goto" => {
            let page = number(arg)?;
            Command::Goto(validation::validate_page_number(page).map_err(|e| e.user_message())?)
        }
        "z" | "size" => {
            let size = number(arg)?;
            Command::PageSize(validation::validate_page_size(size).map_err(|e| e.user_message())?)
        }
        "s" | "sort" => match arg {
            None | Some("none") => Command::Sort(None),
            Some(column) => {
                let column: SortColumn = column.parse()?;
                let direction = match parts.next() {
                    Some(dir) => dir.parse::<SortDirection>()?,
                    None => SortDirection::Asc,
                };
                Command::Sort(Some(SortOrder::new(column, direction)))
            }
        },
        "c" | "create" => Command::Create,
        "e" | "edit" => Command::Edit(id(arg)?),
        "v" | "view" => Command::View(id(arg)?),
        "d" | "delete" => Command::Delete(id(arg)?),
        "r" | "reload" => Command::Reload,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command '{}'. Type h for help.", other)),
    };
    Ok(command)
}

/// Keeps the first visible row on screen when the page size changes.
fn index_for_new_size(page_index: usize, old_size: usize, new_size: usize) -> usize {
    page_index.saturating_mul(old_size) / new_size.max(1)
}

fn render(controller: &ListController<RemoteDirectory, TerminalHost>) {
    let page = controller.source().current_page();
    println!();
    println!("{}", people_table(&controller.visible_rows()));
    match controller.sort() {
        Some(order) => eprintln!("{} | sorted by {} {}", page_summary(&page), order.column, order.direction),
        None => eprintln!("{}", page_summary(&page)),
    }
}

pub async fn run(directory: RemoteDirectory, settings: &Settings) -> Result<()> {
    let prompter = Arc::new(Prompter::stdin());
    let host = Arc::new(TerminalHost::new(prompter.clone()));
    let mut controller = ListController::new(Arc::new(directory), host, settings.page_size);

    controller.start().await;
    render(&controller);
    eprintln!("Type h for help.");

    while let Some(line) = prompter.read_line("> ").await {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(msg) => {
                eprintln!("{}", msg);
                continue;
            }
        };

        match command {
            Command::Nothing => continue,
            Command::Help => {
                eprintln!("{}", HELP);
                continue;
            }
            Command::Quit => break,
            Command::Next => {
                if !controller.next_page().await {
                    eprintln!("Already on the last page");
                    continue;
                }
            }
            Command::Previous => {
                if !controller.previous_page().await {
                    eprintln!("Already on the first page");
                    continue;
                }
            }
            Command::Goto(index) => {
                let size = controller.position().page_size;
                controller.on_page_change(index, size).await;
            }
            Command::PageSize(size) => {
                let position = controller.position();
                let index = index_for_new_size(position.page_index, position.page_size, size);
                controller.on_page_change(index, size).await;
            }
            Command::Sort(order) => controller.on_sort_change(order).await,
            Command::Create => {
                controller.create().await;
            }
            Command::Reload => controller.reload().await,
            Command::Edit(id) | Command::View(id) | Command::Delete(id) => {
                let Some(person) = controller.find_row(id) else {
                    eprintln!("Person {} is not on this page", id);
                    continue;
                };
                match command {
                    Command::Edit(_) => {
                        controller.edit(&person).await;
                    }
                    Command::View(_) => {
                        controller.view(&person).await;
                        continue;
                    }
                    _ => {
                        if controller.delete(&person).await == DeleteOutcome::Declined {
                            continue;
                        }
                    }
                }
            }
        }
        render(&controller);
    }

    controller.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation() {
        assert_eq!(parse_command("n"), Ok(Command::Next));
        assert_eq!(parse_command("  p "), Ok(Command::Previous));
        assert_eq!(parse_command("g 3"), Ok(Command::Goto(2)));
        assert_eq!(parse_command("z 25"), Ok(Command::PageSize(25)));
        assert_eq!(parse_command(""), Ok(Command::Nothing));
        assert!(parse_command("g 0").is_err());
        assert!(parse_command("z 101").is_err());
        assert!(parse_command("g").is_err());
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(
            parse_command("s name"),
            Ok(Command::Sort(Some(SortOrder::new(SortColumn::Name, SortDirection::Asc))))
        );
        assert_eq!(
            parse_command("sort age desc"),
            Ok(Command::Sort(Some(SortOrder::new(SortColumn::Age, SortDirection::Desc))))
        );
        assert_eq!(parse_command("s"), Ok(Command::Sort(None)));
        assert!(parse_command("s salary").is_err());
        assert!(parse_command("s name sideways").is_err());
    }

    #[test]
    fn test_parse_row_actions() {
        assert_eq!(parse_command("e 12"), Ok(Command::Edit(12)));
        assert_eq!(parse_command("V 4"), Ok(Command::View(4)));
        assert_eq!(parse_command("d 7"), Ok(Command::Delete(7)));
        assert!(parse_command("d").is_err());
        assert!(parse_command("d seven").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn test_index_for_new_size() {
        // Rows 20..29 at size 10 stay visible at size 25 on page index 0.
        assert_eq!(index_for_new_size(2, 10, 25), 0);
        assert_eq!(index_for_new_size(3, 10, 5), 6);
        assert_eq!(index_for_new_size(0, 10, 1), 0);
        // A far-away page typed at the prompt must not overflow.
        let far = match parse_command("g 18446744073709551615") {
            Ok(Command::Goto(index)) => index,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(index_for_new_size(far, 10, 5), usize::MAX / 5);
    }
}
