//! Line-based terminal host for the dialogs.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use persona_lib::{DetailState, DialogHost, Person, PersonForm, PersonFormView};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use crate::output::detail_text;

/// Reads answers one line at a time. Shared by the command loop and the
/// dialog host so they never race for input.
pub struct Prompter {
    reader: Mutex<Box<dyn AsyncBufRead + Send + Unpin>>,
}

impl Prompter {
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }

    pub fn from_reader(reader: impl AsyncBufRead + Send + Unpin + 'static) -> Self {
        Self {
            reader: Mutex::new(Box::new(reader)),
        }
    }

    /// Prints `prompt` and returns the next line without its line ending.
    /// `None` once input is exhausted.
    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = std::io::stdout().flush();

        let mut reader = self.reader.lock().await;
        let mut line = String::new();
        match reader.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                tracing::warn!("Could not read from terminal: {}", e);
                None
            }
        }
    }

    /// `y`/`yes` (any case) is a yes; anything else, including end of input,
    /// is a no.
    pub async fn confirm(&self, question: &str) -> bool {
        match self.read_line(question).await {
            Some(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }

    /// Asks for one form field. Blank keeps `current`, `-` clears it.
    async fn field(&self, label: &str, current: &str) -> Option<String> {
        let answer = self.read_line(&format!("{} [{}]: ", label, current)).await?;
        Some(match answer.trim() {
            "" => current.to_string(),
            "-" => String::new(),
            _ => answer,
        })
    }
}

/// Hosts every dialog on the terminal.
pub struct TerminalHost {
    prompter: Arc<Prompter>,
}

impl TerminalHost {
    pub fn new(prompter: Arc<Prompter>) -> Self {
        Self { prompter }
    }
}

#[async_trait]
impl DialogHost for TerminalHost {
    async fn prompt_person_form(&self, view: &PersonFormView) -> Option<PersonForm> {
        println!();
        println!("== {} ==", view.title);
        if let Some(errors) = &view.errors {
            for error in errors.errors() {
                println!("  ! {}", error);
            }
        }

        let name = self.prompter.field("Name", &view.values.name).await?;
        let age = self.prompter.field("Age", &view.values.age).await?;
        let email = self.prompter.field("Email", &view.values.email).await?;

        let answer = self
            .prompter
            .read_line(&format!("{}? [Y/n] ", view.action_label))
            .await?;
        if matches!(answer.trim().to_lowercase().as_str(), "n" | "no") {
            return None;
        }
        Some(PersonForm::new(name, age, email))
    }

    async fn confirm_delete(&self, person: &Person) -> bool {
        let question = format!("Delete {} <{}> (ID {})? [y/N] ", person.name, person.email, person.id);
        self.prompter.confirm(&question).await
    }

    async fn render_detail(&self, state: &DetailState) {
        println!("{}", detail_text(state));
    }

    async fn await_dismiss(&self) {
        self.prompter.read_line("Press Enter to close ").await;
    }

    async fn show_error(&self, message: &str) {
        eprintln!("Error: {}", message);
        self.prompter.read_line("Press Enter to continue ").await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(input: &str) -> TerminalHost {
        let reader = BufReader::new(std::io::Cursor::new(input.as_bytes().to_vec()));
        TerminalHost::new(Arc::new(Prompter::from_reader(reader)))
    }

    fn view(values: PersonForm) -> PersonFormView {
        PersonFormView {
            title: "Edit person",
            action_label: "Update",
            values,
            errors: None,
        }
    }

    #[tokio::test]
    async fn test_form_blank_keeps_and_dash_clears() {
        let host = host("\n-\nana@new.io\ny\n");
        let form = host
            .prompt_person_form(&view(PersonForm::new("Ana", "34", "ana@x.io")))
            .await
            .unwrap();
        assert_eq!(form, PersonForm::new("Ana", "", "ana@new.io"));
    }

    #[tokio::test]
    async fn test_form_declined_or_eof_cancels() {
        let declined = host("Bea\n40\nbea@x.io\nn\n");
        assert!(declined
            .prompt_person_form(&view(PersonForm::default()))
            .await
            .is_none());

        let truncated = host("Bea\n");
        assert!(truncated
            .prompt_person_form(&view(PersonForm::default()))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_confirm_delete_requires_explicit_yes() {
        let person = Person {
            id: 7,
            name: "Ana".to_string(),
            age: 34,
            email: "ana@x.io".to_string(),
        };
        assert!(host("YES\n").confirm_delete(&person).await);
        assert!(!host("\n").confirm_delete(&person).await);
        assert!(!host("").confirm_delete(&person).await);
    }

    #[tokio::test]
    async fn test_read_line_strips_crlf() {
        let prompter = Prompter::from_reader(BufReader::new(std::io::Cursor::new(
            b"g 2\r\nq\n".to_vec(),
        )));
        assert_eq!(prompter.read_line("").await.as_deref(), Some("g 2"));
        assert_eq!(prompter.read_line("").await.as_deref(), Some("q"));
        assert_eq!(prompter.read_line("").await, None);
    }
}
