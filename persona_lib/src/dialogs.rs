//! Mutation dialogs: the create/edit form, delete confirmation, detail view
//! and error notice.
//!
//! Rendering and input belong to a [`DialogHost`]. The dialogs here own the
//! behaviour: what gets validated, which call is made, when the dialog closes.

use async_trait::async_trait;
use persona_api::types::PersonaID;

use crate::directory::Directory;
use crate::error::DirectoryError;
use crate::model::{Person, PersonDraft};
use crate::validation::{self, PersonForm, ValidationErrors};

/// How a dialog ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome<T> {
    Completed(T),
    Cancelled,
}

impl<T> DialogOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            DialogOutcome::Completed(value) => Some(value),
            DialogOutcome::Cancelled => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, DialogOutcome::Completed(_))
    }
}

/// Dialog lifecycle: `Opening -> AwaitingInput -> Closed(outcome)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState<T> {
    Opening,
    AwaitingInput,
    Closed(DialogOutcome<T>),
}

impl<T: Clone> DialogState<T> {
    fn begin(&mut self) {
        if matches!(self, DialogState::Opening) {
            *self = DialogState::AwaitingInput;
        }
    }

    fn close(&mut self, outcome: DialogOutcome<T>) -> DialogOutcome<T> {
        *self = DialogState::Closed(outcome.clone());
        outcome
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, DialogState::Closed(_))
    }
}

/// What the detail dialog is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Loaded(Person),
    Failed(String),
}

/// Create or edit, with the record being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Person),
}

impl FormMode {
    pub fn title(&self) -> &'static str {
        match self {
            FormMode::Create => "Add person",
            FormMode::Edit(_) => "Edit person",
        }
    }

    pub fn action_label(&self) -> &'static str {
        match self {
            FormMode::Create => "Create",
            FormMode::Edit(_) => "Update",
        }
    }
}

/// Everything the host needs to render the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonFormView {
    pub title: &'static str,
    pub action_label: &'static str,
    pub values: PersonForm,
    /// Errors from the previous submission attempt.
    pub errors: Option<ValidationErrors>,
}

/// The surface dialogs are displayed on.
///
/// Every method suspends the caller until the user has answered.
#[async_trait]
pub trait DialogHost: Send + Sync {
    /// Shows the form and returns the submitted values, or `None` on cancel.
    async fn prompt_person_form(&self, view: &PersonFormView) -> Option<PersonForm>;

    /// Yes/no gate before deleting `person`.
    async fn confirm_delete(&self, person: &Person) -> bool;

    /// Renders the detail dialog in its current state.
    async fn render_detail(&self, state: &DetailState);

    /// Waits until the user closes the detail dialog.
    async fn await_dismiss(&self);

    /// Shows the error notice and waits until it is closed.
    async fn show_error(&self, message: &str);
}

/// Create/edit form. Validates locally, then performs the create or update
/// itself and closes with the stored record.
pub struct PersonFormDialog {
    mode: FormMode,
    state: DialogState<Person>,
    values: PersonForm,
    errors: Option<ValidationErrors>,
}

impl PersonFormDialog {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            state: DialogState::Opening,
            values: PersonForm::default(),
            errors: None,
        }
    }

    /// Form pre-filled with `person`; submission updates it by id.
    pub fn edit(person: &Person) -> Self {
        Self {
            mode: FormMode::Edit(person.clone()),
            state: DialogState::Opening,
            values: PersonForm::from_person(person),
            errors: None,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn state(&self) -> &DialogState<Person> {
        &self.state
    }

    pub fn view(&self) -> PersonFormView {
        PersonFormView {
            title: self.mode.title(),
            action_label: self.mode.action_label(),
            values: self.values.clone(),
            errors: self.errors.clone(),
        }
    }

    /// Runs the dialog until it closes.
    ///
    /// Invalid input never reaches the directory. A failed create/update
    /// shows the error notice and keeps the dialog open.
    pub async fn run<D, H>(&mut self, directory: &D, host: &H) -> DialogOutcome<Person>
    where
        D: Directory + ?Sized,
        H: DialogHost + ?Sized,
    {
        self.state.begin();
        loop {
            let Some(input) = host.prompt_person_form(&self.view()).await else {
                tracing::debug!("{} dialog cancelled", self.mode.action_label());
                return self.state.close(DialogOutcome::Cancelled);
            };
            self.values = input;

            let draft = match validation::validate_person_form(&self.values) {
                Ok(draft) => {
                    self.errors = None;
                    draft
                }
                Err(errors) => {
                    tracing::debug!("Form submission blocked: {}", errors);
                    self.errors = Some(errors);
                    continue;
                }
            };

            match self.persist(directory, &draft).await {
                Ok(person) => return self.state.close(DialogOutcome::Completed(person)),
                Err(err) => {
                    tracing::error!("{} failed: {}", self.mode.action_label(), err);
                    ErrorNotice::new(err.user_message()).show(host).await;
                }
            }
        }
    }

    async fn persist<D>(&self, directory: &D, draft: &PersonDraft) -> Result<Person, DirectoryError>
    where
        D: Directory + ?Sized,
    {
        match &self.mode {
            FormMode::Edit(person) => {
                let stored = directory.update(person.id, draft).await?;
                Ok(stored.unwrap_or_else(|| Person::from_draft(person.id, draft)))
            }
            FormMode::Create => directory.create(draft).await,
        }
    }
}

/// Yes/no gate. Performs no I/O.
pub struct DeleteConfirmDialog {
    person: Person,
    state: DialogState<bool>,
}

impl DeleteConfirmDialog {
    pub fn new(person: &Person) -> Self {
        Self {
            person: person.clone(),
            state: DialogState::Opening,
        }
    }

    pub fn state(&self) -> &DialogState<bool> {
        &self.state
    }

    /// True only on explicit confirmation.
    pub async fn run<H: DialogHost + ?Sized>(&mut self, host: &H) -> bool {
        self.state.begin();
        let confirmed = host.confirm_delete(&self.person).await;
        self.state.close(DialogOutcome::Completed(confirmed));
        confirmed
    }
}

/// Read-only detail. Refreshes the record by id on open since list rows may
/// be stale.
pub struct DetailDialog {
    person_id: PersonaID,
    state: DialogState<()>,
    detail: DetailState,
}

impl DetailDialog {
    pub fn new(person: &Person) -> Self {
        Self {
            person_id: person.id,
            state: DialogState::Opening,
            detail: DetailState::Loading,
        }
    }

    pub fn state(&self) -> &DialogState<()> {
        &self.state
    }

    pub fn detail(&self) -> &DetailState {
        &self.detail
    }

    pub async fn run<D, H>(&mut self, directory: &D, host: &H)
    where
        D: Directory + ?Sized,
        H: DialogHost + ?Sized,
    {
        host.render_detail(&self.detail).await;
        self.state.begin();
        self.detail = match directory.fetch_one(self.person_id).await {
            Ok(person) => DetailState::Loaded(person),
            Err(err) => {
                tracing::error!("Loading person {} failed: {}", self.person_id, err);
                DetailState::Failed(err.user_message())
            }
        };
        host.render_detail(&self.detail).await;
        host.await_dismiss().await;
        self.state.close(DialogOutcome::Completed(()));
    }
}

/// Single-message notice.
pub struct ErrorNotice {
    message: String,
}

impl ErrorNotice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub async fn show<H: DialogHost + ?Sized>(&self, host: &H) {
        host.show_error(&self.message).await;
    }
}
