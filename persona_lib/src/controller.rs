//! List controller: turns user events into list reloads and dialogs.

use std::sync::Arc;

use persona_api::types::PersonaID;

use crate::dialogs::{
    DeleteConfirmDialog, DetailDialog, DialogHost, DialogOutcome, ErrorNotice, PersonFormDialog,
};
use crate::directory::Directory;
use crate::list_source::PagedListSource;
use crate::model::{Person, SortOrder};

/// Where the user is in the list: 0-based page index and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePosition {
    pub page_index: usize,
    pub page_size: usize,
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user answered "no"; nothing was sent.
    Declined,
    /// The directory refused; the row stays and the error notice was shown.
    Failed,
}

/// Drives one list screen.
///
/// Every reload targets the tracked [`PagePosition`], so reconciling after a
/// mutation keeps the user on the page they were viewing. Only a sort change
/// moves back to the first page.
pub struct ListController<D: Directory + ?Sized, H: DialogHost + ?Sized> {
    directory: Arc<D>,
    host: Arc<H>,
    source: Arc<PagedListSource<D>>,
    position: PagePosition,
    sort: Option<SortOrder>,
}

impl<D: Directory + ?Sized, H: DialogHost + ?Sized> ListController<D, H> {
    pub fn new(directory: Arc<D>, host: Arc<H>, page_size: usize) -> Self {
        let source = Arc::new(PagedListSource::new(directory.clone()));
        Self {
            directory,
            host,
            source,
            position: PagePosition {
                page_index: 0,
                page_size: page_size.max(1),
            },
            sort: None,
        }
    }

    pub fn source(&self) -> &Arc<PagedListSource<D>> {
        &self.source
    }

    pub fn position(&self) -> PagePosition {
        self.position
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    /// Rows of the current page in display order.
    pub fn visible_rows(&self) -> Vec<Person> {
        self.source.current_page().sorted_records(self.sort)
    }

    /// First load when the screen opens.
    pub async fn start(&self) {
        self.reload().await;
    }

    /// Reloads at the tracked position.
    pub async fn reload(&self) {
        self.source
            .load_page(self.position.page_index, self.position.page_size)
            .await;
    }

    /// Explicit navigation from the paginator.
    pub async fn on_page_change(&mut self, page_index: usize, page_size: usize) {
        let page_size = page_size.max(1);
        if page_size != self.position.page_size {
            tracing::debug!("Page size changed to {}", page_size);
        }
        self.position = PagePosition {
            page_index,
            page_size,
        };
        self.reload().await;
    }

    /// Sort change: back to the first page, then reload.
    pub async fn on_sort_change(&mut self, order: Option<SortOrder>) {
        self.sort = order;
        self.position.page_index = 0;
        self.reload().await;
    }

    pub async fn next_page(&mut self) -> bool {
        if !self.source.current_page().has_next() {
            return false;
        }
        let next = self.position.page_index + 1;
        self.on_page_change(next, self.position.page_size).await;
        true
    }

    pub async fn previous_page(&mut self) -> bool {
        if self.position.page_index == 0 {
            return false;
        }
        let prev = self.position.page_index - 1;
        self.on_page_change(prev, self.position.page_size).await;
        true
    }

    /// Opens the form in create mode; reloads when a record was created.
    pub async fn create(&self) -> DialogOutcome<Person> {
        let mut dialog = PersonFormDialog::create();
        let outcome = dialog.run(self.directory.as_ref(), self.host.as_ref()).await;
        if let DialogOutcome::Completed(person) = &outcome {
            tracing::info!("Person {} added", person.id);
            self.reload().await;
        }
        outcome
    }

    /// Opens the form pre-filled with `person`; reloads when it was updated.
    pub async fn edit(&self, person: &Person) -> DialogOutcome<Person> {
        let mut dialog = PersonFormDialog::edit(person);
        let outcome = dialog.run(self.directory.as_ref(), self.host.as_ref()).await;
        if let DialogOutcome::Completed(updated) = &outcome {
            tracing::info!("Person {} updated", updated.id);
            self.reload().await;
        }
        outcome
    }

    /// Opens the read-only detail dialog. Never reloads the list.
    pub async fn view(&self, person: &Person) {
        let mut dialog = DetailDialog::new(person);
        dialog.run(self.directory.as_ref(), self.host.as_ref()).await;
    }

    /// Confirms, then deletes and reloads. No optimistic removal: on failure
    /// the row stays where it is.
    pub async fn delete(&self, person: &Person) -> DeleteOutcome {
        let mut dialog = DeleteConfirmDialog::new(person);
        if !dialog.run(self.host.as_ref()).await {
            return DeleteOutcome::Declined;
        }
        match self.directory.delete(person.id).await {
            Ok(()) => {
                self.reload().await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                tracing::error!("Deleting person {} failed: {}", person.id, err);
                ErrorNotice::new(err.user_message())
                    .show(self.host.as_ref())
                    .await;
                DeleteOutcome::Failed
            }
        }
    }

    /// Row on the current page with `id`, if visible.
    pub fn find_row(&self, id: PersonaID) -> Option<Person> {
        self.source
            .current_page()
            .records
            .into_iter()
            .find(|p| p.id == id)
    }

    /// Tears the screen down: releases the list source's channels.
    pub fn shutdown(&self) {
        self.source.disconnect();
    }
}
