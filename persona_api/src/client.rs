//! HTTP client for the persona directory service.

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::{PageQuery, Query},
    types::{PaginatedResponse, PersonaID, PersonaPayload, PersonaRecord},
    Error,
};

const DEFAULT_BASE_URL: &str = "https://localhost:7144";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the persona directory service.
///
/// Each request builds a fresh `reqwest::Client` with the configured timeout.
/// Responses are read as text first so that failures can carry a body snippet.
#[derive(Clone, Debug)]
pub struct Client {
    /// Base URL for the API. Defaults to `https://localhost:7144`.
    base_api_url: String,
    timeout: Duration,
    /// Accept self-signed certificates (local development servers).
    accept_invalid_certs: bool,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the local development server.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accepts invalid TLS certificates when `accept` is true.
    pub fn with_insecure_tls(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    fn get_url(&self, path: &str, query: Option<&impl Query>) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed(format!("invalid URL: {}", e))
        })?;
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    /// Sends one request and returns the response body on a 2xx status.
    async fn send(
        &self,
        method: Method,
        url: Url,
        payload: Option<&PersonaPayload>,
    ) -> Result<String, Error> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed(e.to_string())
            })?;

        let mut request = client
            .request(method.clone(), url.clone())
            .header("accept", "application/json, text/plain, */*");
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let resp = request.send().await.map_err(|e| {
            tracing::error!("{} {} failed: {}", method, url.path(), e);
            Error::RequestFailed(e.to_string())
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed(e.to_string())
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!(
                "{} {} failed with status {}: {}",
                method,
                url.path(),
                status,
                snippet
            );
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }

    fn parse<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
        serde_json::from_str::<T>(body).map_err(|e| {
            let snippet = truncate_body(body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::Parse(e.to_string())
        })
    }

    async fn get<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Query,
    {
        let url = self.get_url(path, query)?;
        let body = self.send(Method::GET, url, None).await?;
        Self::parse(&body)
    }

    /// Fetches every person record, soft-deleted ones included.
    pub async fn get_personas(&self) -> Result<Vec<PersonaRecord>, Error> {
        self.get::<Vec<PersonaRecord>, PageQuery>("/personas", None)
            .await
    }

    /// Fetches one page of person records.
    pub async fn get_personas_paginadas(
        &self,
        query: &PageQuery,
    ) -> Result<PaginatedResponse<PersonaRecord>, Error> {
        self.get::<PaginatedResponse<PersonaRecord>, PageQuery>("/personasPaginadas", Some(query))
            .await
    }

    /// Fetches a single person by its numeric ID.
    pub async fn get_persona(&self, id: PersonaID) -> Result<PersonaRecord, Error> {
        self.get::<PersonaRecord, PageQuery>(format!("/persona/{}", id).as_str(), None)
            .await
    }

    /// Creates a person and returns the stored record.
    pub async fn create_persona(&self, payload: &PersonaPayload) -> Result<PersonaRecord, Error> {
        let url = self.get_url("/persona", None::<&PageQuery>)?;
        let body = self.send(Method::POST, url, Some(payload)).await?;
        Self::parse(&body)
    }

    /// Updates a person. Returns the stored record when the server echoes it,
    /// `None` when it answers with an empty body.
    pub async fn update_persona(
        &self,
        id: PersonaID,
        payload: &PersonaPayload,
    ) -> Result<Option<PersonaRecord>, Error> {
        let url = self.get_url(format!("/persona/{}", id).as_str(), None::<&PageQuery>)?;
        let body = self.send(Method::PUT, url, Some(payload)).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Self::parse(&body).map(Some)
    }

    /// Deletes a person. Any response body is ignored.
    pub async fn delete_persona(&self, id: PersonaID) -> Result<(), Error> {
        let url = self.get_url(format!("/persona/{}", id).as_str(), None::<&PageQuery>)?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
