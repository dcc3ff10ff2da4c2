//! External bibliographic registry interface.
//!
//! The validator consumes a [`Registry`]: two lookup operations against an
//! external metadata service, both assumed to be network calls with
//! realistic latency and intermittent failure. The bundled
//! [`CrossrefRegistry`] (feature `crossref`, enabled by default) talks to
//! the CrossRef REST API; offline callers and tests can implement the trait
//! directly.
//!
//! API: `https://api.crossref.org/works/{doi}` and `/works?query.title=`.
//! Polite pool: User-Agent carries a mailto (see CrossRef etiquette).

use crate::CanonicalRecord;
use thiserror::Error;

#[cfg(feature = "crossref")]
mod response;

#[cfg(feature = "crossref")]
use std::time::Duration;

/// Errors reported by registry lookups.
///
/// All variants are treated as transient by the validator: a failing
/// lookup degrades the affected reference instead of propagating.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Transport-level failure: connectivity, TLS, or timeout.
    #[cfg(feature = "crossref")]
    #[error("registry request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The registry answered with a non-success status.
    #[error("registry returned status {0}")]
    Status(u16),

    /// The registry answered with a payload that could not be decoded.
    #[error("malformed registry response: {0}")]
    Malformed(String),

    /// Failure reported by a custom registry implementation.
    #[error("registry error: {0}")]
    Other(String),
}

/// A bibliographic metadata service that can confirm citations.
pub trait Registry {
    /// Looks up canonical metadata for a normalized DOI.
    ///
    /// Returns `Ok(None)` when the registry does not know the DOI, which
    /// is distinct from a transport or decoding failure.
    fn lookup_by_doi(&self, doi: &str) -> Result<Option<CanonicalRecord>, RegistryError>;

    /// Searches the registry by title text, returning up to `rows`
    /// candidate records in the registry's relevance order.
    fn search_by_title(
        &self,
        title: &str,
        rows: usize,
    ) -> Result<Vec<CanonicalRecord>, RegistryError>;
}

#[cfg(feature = "crossref")]
const CROSSREF_API_BASE: &str = "https://api.crossref.org";

#[cfg(feature = "crossref")]
const USER_AGENT: &str = concat!(
    "citecheck/",
    env!("CARGO_PKG_VERSION"),
    " (mailto:aliazlanofficial@gmail.com)"
);

/// Registry calls must not hang validation; 10 seconds covers CrossRef's
/// worst polite-pool latency.
#[cfg(feature = "crossref")]
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// CrossRef-backed [`Registry`] implementation.
///
/// Issues synchronous, blocking HTTP requests with a mandatory timeout.
/// The base URL can be overridden to point at a mirror or a test server.
///
/// # Examples
///
/// ```no_run
/// use citecheck::registry::{CrossrefRegistry, Registry};
///
/// let registry = CrossrefRegistry::new().unwrap();
/// let record = registry.lookup_by_doi("10.1038/nature12373").unwrap();
/// ```
#[cfg(feature = "crossref")]
#[derive(Debug, Clone)]
pub struct CrossrefRegistry {
    client: reqwest::blocking::Client,
    base_url: String,
}

#[cfg(feature = "crossref")]
impl CrossrefRegistry {
    /// Creates a client against the public CrossRef API.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Http`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new() -> Result<Self, RegistryError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: CROSSREF_API_BASE.to_string(),
        })
    }

    /// Points the client at a different API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(feature = "crossref")]
impl Registry for CrossrefRegistry {
    fn lookup_by_doi(&self, doi: &str) -> Result<Option<CanonicalRecord>, RegistryError> {
        let url = format!("{}/works/{}", self.base_url, doi);
        tracing::debug!(doi, "crossref DOI lookup");

        let response = self.client.get(&url).send()?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(RegistryError::Status(response.status().as_u16()));
        }

        let envelope: response::WorkEnvelope = response
            .json()
            .map_err(|e| RegistryError::Malformed(e.to_string()))?;
        Ok(Some(envelope.message.into()))
    }

    fn search_by_title(
        &self,
        title: &str,
        rows: usize,
    ) -> Result<Vec<CanonicalRecord>, RegistryError> {
        let url = format!("{}/works", self.base_url);
        tracing::debug!(title, rows, "crossref title search");

        let response = self
            .client
            .get(&url)
            .query(&[("query.title", title), ("rows", &rows.to_string())])
            .send()?;
        if !response.status().is_success() {
            return Err(RegistryError::Status(response.status().as_u16()));
        }

        let envelope: response::SearchEnvelope = response
            .json()
            .map_err(|e| RegistryError::Malformed(e.to_string()))?;
        Ok(envelope
            .message
            .items
            .into_iter()
            .map(CanonicalRecord::from)
            .collect())
    }
}
