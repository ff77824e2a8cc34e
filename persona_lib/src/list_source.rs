//! Paginated list source: owns the current page and the loading flag and
//! republishes them to observers.
//!
//! Loads are neither queued nor cancelled against each other. When two loads
//! overlap, whichever fetch resolves last decides the published page, and the
//! first completion already clears the loading flag.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::directory::Directory;
use crate::model::{Page, DEFAULT_PAGE_SIZE};

/// Point-in-time view of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListViewState {
    pub page: Page,
    pub is_loading: bool,
}

impl Default for ListViewState {
    fn default() -> Self {
        Self {
            page: Page::empty(1, DEFAULT_PAGE_SIZE),
            is_loading: false,
        }
    }
}

struct Channels {
    page: watch::Sender<Page>,
    loading: watch::Sender<bool>,
}

enum Link {
    Connected(Channels),
    /// Channels released; holds the last published state.
    Disconnected(ListViewState),
}

pub struct PagedListSource<D: Directory + ?Sized> {
    directory: Arc<D>,
    link: Mutex<Link>,
}

impl<D: Directory + ?Sized> PagedListSource<D> {
    pub fn new(directory: Arc<D>) -> Self {
        let initial = ListViewState::default();
        let (page, _) = watch::channel(initial.page);
        let (loading, _) = watch::channel(initial.is_loading);
        Self {
            directory,
            link: Mutex::new(Link::Connected(Channels { page, loading })),
        }
    }

    fn with_link<R>(&self, f: impl FnOnce(&mut Link) -> R) -> R {
        let mut link = self.link.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut link)
    }

    /// Receiver for page changes, `None` once disconnected.
    pub fn subscribe_page(&self) -> Option<watch::Receiver<Page>> {
        self.with_link(|link| match link {
            Link::Connected(ch) => Some(ch.page.subscribe()),
            Link::Disconnected(_) => None,
        })
    }

    /// Receiver for loading-flag changes, `None` once disconnected.
    pub fn subscribe_loading(&self) -> Option<watch::Receiver<bool>> {
        self.with_link(|link| match link {
            Link::Connected(ch) => Some(ch.loading.subscribe()),
            Link::Disconnected(_) => None,
        })
    }

    pub fn state(&self) -> ListViewState {
        self.with_link(|link| match link {
            Link::Connected(ch) => ListViewState {
                page: ch.page.borrow().clone(),
                is_loading: *ch.loading.borrow(),
            },
            Link::Disconnected(last) => last.clone(),
        })
    }

    pub fn current_page(&self) -> Page {
        self.state().page
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn is_connected(&self) -> bool {
        self.with_link(|link| matches!(link, Link::Connected(_)))
    }

    /// Loads the page at 0-based `page_index` and publishes it.
    ///
    /// Never fails: the directory substitutes an empty page when the fetch
    /// cannot be completed. Ignored after [`disconnect`](Self::disconnect).
    pub async fn load_page(&self, page_index: usize, page_size: usize) {
        let started = self.with_link(|link| match link {
            Link::Connected(ch) => {
                ch.loading.send_replace(true);
                true
            }
            Link::Disconnected(_) => false,
        });
        if !started {
            tracing::debug!("Ignoring load of page {} after disconnect", page_index);
            return;
        }

        tracing::debug!("Loading page {} (size {})", page_index, page_size);
        let page = self
            .directory
            .fetch_page(page_index.saturating_add(1), page_size.max(1))
            .await;

        self.with_link(|link| match link {
            Link::Connected(ch) => {
                ch.page.send_replace(page);
                ch.loading.send_replace(false);
            }
            Link::Disconnected(_) => {
                tracing::debug!("Discarding page {} loaded after disconnect", page_index);
            }
        });
    }

    /// Releases the channels. Subscribers see the senders close and no
    /// further notifications are delivered.
    pub fn disconnect(&self) {
        self.with_link(|link| {
            if let Link::Connected(ch) = link {
                let last = ListViewState {
                    page: ch.page.borrow().clone(),
                    is_loading: false,
                };
                // Dropping the old link drops both senders.
                *link = Link::Disconnected(last);
            }
        });
    }
}
