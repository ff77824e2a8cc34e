//! Remote directory client: the API client wrapped with per-operation
//! failure policies and the wire-to-domain adapter.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use persona_api::types::{PersonaID, PersonaPayload};
use persona_api::{Client, PageQuery};
use rand::Rng;

use crate::error::DirectoryError;
use crate::model::{Page, Person, PersonDraft};

/// The operations the directory exposes, each bound to a [`FailurePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListAll,
    FetchPage,
    FetchOne,
    Create,
    Update,
    Delete,
}

/// What happens when an operation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Retry transient failures, then degrade to an empty result.
    RetryThenEmpty,
    /// Single attempt; the failure goes back to the caller.
    FailFast,
}

impl Operation {
    /// Reads backing the list view absorb failures; everything else reports them.
    pub const fn policy(self) -> FailurePolicy {
        match self {
            Operation::ListAll | Operation::FetchPage => FailurePolicy::RetryThenEmpty,
            Operation::FetchOne | Operation::Create | Operation::Update | Operation::Delete => {
                FailurePolicy::FailFast
            }
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Operation::ListAll => "list",
            Operation::FetchPage => "page",
            Operation::FetchOne => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Retry budget and back-off for [`FailurePolicy::RetryThenEmpty`] operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_millis(2000),
        }
    }
}

impl RetryConfig {
    /// Retries without waiting between attempts.
    pub fn immediate(max_retries: usize) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let base_ms = self.base_delay.as_millis() as u64;
        let max_ms = self.max_delay.as_millis() as u64;
        let base = base_ms.saturating_mul(1u64 << shift).min(max_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

/// The person directory as seen by the list source, controller and dialogs.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Every live record. Degrades to an empty list on failure.
    async fn list_all(&self) -> Vec<Person>;

    /// One page (`page_number` is 1-based). Degrades to an empty page on failure.
    async fn fetch_page(&self, page_number: usize, page_size: usize) -> Page;

    async fn fetch_one(&self, id: PersonaID) -> Result<Person, DirectoryError>;

    async fn create(&self, draft: &PersonDraft) -> Result<Person, DirectoryError>;

    /// `Ok(None)` when the server acknowledges without echoing the record.
    async fn update(
        &self,
        id: PersonaID,
        draft: &PersonDraft,
    ) -> Result<Option<Person>, DirectoryError>;

    async fn delete(&self, id: PersonaID) -> Result<(), DirectoryError>;
}

/// [`Directory`] backed by the REST service.
pub struct RemoteDirectory {
    inner: Client,
    retry: RetryConfig,
}

impl RemoteDirectory {
    pub fn new(inner: Client, retry: RetryConfig) -> Self {
        Self { inner, retry }
    }

    /// Directory over `base_url` with immediate retries. Used for testing.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::new(Client::with_base_url(base_url), RetryConfig::immediate(3))
    }

    pub fn client(&self) -> &Client {
        &self.inner
    }

    /// Runs `f` under the policy of `op`. `FailFast` operations get exactly one
    /// attempt; the others retry transient failures up to `max_retries` times.
    async fn with_policy<T, F, Fut>(&self, op: Operation, mut f: F) -> Result<T, DirectoryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DirectoryError>>,
    {
        let max_retries = match op.policy() {
            FailurePolicy::FailFast => 0,
            FailurePolicy::RetryThenEmpty => self.retry.max_retries,
        };
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > max_retries || !err.is_transient() {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s",
                        op.label(),
                        attempt,
                        max_retries,
                        delay.as_secs_f64()
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }
}

#[async_trait]
impl Directory for RemoteDirectory {
    async fn list_all(&self) -> Vec<Person> {
        let result = self
            .with_policy(Operation::ListAll, || async {
                Ok(self.inner.get_personas().await?)
            })
            .await;
        match result {
            Ok(records) => {
                if records.is_empty() {
                    tracing::info!("Directory returned no people");
                }
                records.into_iter().filter_map(Person::from_record).collect()
            }
            Err(err) => {
                tracing::warn!("Listing people failed, showing none: {}", err);
                Vec::new()
            }
        }
    }

    async fn fetch_page(&self, page_number: usize, page_size: usize) -> Page {
        let page_number = page_number.max(1);
        let page_size = page_size.max(1);
        let (Ok(wire_page), Ok(wire_size)) = (i64::try_from(page_number), i64::try_from(page_size))
        else {
            tracing::warn!(
                "Page {} (size {}) is out of range, showing an empty page",
                page_number,
                page_size
            );
            return Page::empty(page_number, page_size);
        };
        let query = PageQuery::default()
            .with_page(wire_page)
            .with_page_size(wire_size);

        let result = self
            .with_policy(Operation::FetchPage, || async {
                Ok(self.inner.get_personas_paginadas(&query).await?)
            })
            .await;
        match result {
            Ok(resp) => Page::from_envelope(resp, page_size),
            Err(err) => {
                tracing::warn!(
                    "Loading page {} (size {}) failed, showing an empty page: {}",
                    page_number,
                    page_size,
                    err
                );
                Page::empty(page_number, page_size)
            }
        }
    }

    async fn fetch_one(&self, id: PersonaID) -> Result<Person, DirectoryError> {
        let record = self
            .with_policy(Operation::FetchOne, || async {
                Ok(self.inner.get_persona(id).await?)
            })
            .await?;
        Person::from_record(record).ok_or(DirectoryError::NotFound(id))
    }

    async fn create(&self, draft: &PersonDraft) -> Result<Person, DirectoryError> {
        let payload = PersonaPayload::from(draft);
        let record = self
            .with_policy(Operation::Create, || async {
                Ok(self.inner.create_persona(&payload).await?)
            })
            .await?;
        tracing::info!("Created person {}", record.id);
        let id = record.id;
        Person::from_record(record).ok_or(DirectoryError::NotFound(id))
    }

    async fn update(
        &self,
        id: PersonaID,
        draft: &PersonDraft,
    ) -> Result<Option<Person>, DirectoryError> {
        let payload = PersonaPayload::from(draft);
        let record = self
            .with_policy(Operation::Update, || async {
                Ok(self.inner.update_persona(id, &payload).await?)
            })
            .await?;
        tracing::info!("Updated person {}", id);
        match record {
            Some(record) => Person::from_record(record)
                .map(Some)
                .ok_or(DirectoryError::NotFound(id)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: PersonaID) -> Result<(), DirectoryError> {
        self.with_policy(Operation::Delete, || async {
            Ok(self.inner.delete_persona(id).await?)
        })
        .await?;
        tracing::info!("Deleted person {}", id);
        Ok(())
    }
}
