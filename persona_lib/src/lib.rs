//! Library layer for the persona admin client: domain model, remote
//! directory with failure policies, paginated list source, list controller
//! and mutation dialogs.

pub mod controller;
pub mod dialogs;
pub mod directory;
pub mod error;
pub mod list_source;
pub mod model;
pub mod settings;
pub mod validation;

pub use persona_api;
pub use persona_api::types::PersonaID;

pub use controller::{DeleteOutcome, ListController, PagePosition};
pub use dialogs::{
    DeleteConfirmDialog, DetailDialog, DetailState, DialogHost, DialogOutcome, DialogState,
    ErrorNotice, FormMode, PersonFormDialog, PersonFormView,
};
pub use directory::{Directory, FailurePolicy, Operation, RemoteDirectory, RetryConfig};
pub use error::DirectoryError;
pub use list_source::{ListViewState, PagedListSource};
pub use model::{Page, Person, PersonDraft, SortColumn, SortDirection, SortOrder};
pub use settings::Settings;
pub use validation::{FieldError, PersonForm, ValidationErrors};
