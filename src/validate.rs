//! Citation validator implementation.
//!
//! A module for confirming candidate references against a bibliographic
//! registry and for detecting duplicate papers. Validation is best-effort:
//! every input reference produces exactly one output record, annotated with
//! a confidence tier and the method that produced it.
//!
//! ## Features
//!
//! - DOI-based confirmation (`HIGH` confidence)
//! - Fuzzy title matching (`MEDIUM`/`LOW` confidence)
//! - Duplicate detection by DOI and title similarity
//! - Process-wide request spacing for registry compliance
//!
//! ## Usage
//!
//! ```rust
//! use citecheck::{CanonicalRecord, CitationValidator, Confidence, Reference, ValidationMethod};
//! use citecheck::registry::{Registry, RegistryError};
//!
//! struct OneWork;
//!
//! impl Registry for OneWork {
//!     fn lookup_by_doi(&self, doi: &str) -> Result<Option<CanonicalRecord>, RegistryError> {
//!         Ok(Some(CanonicalRecord {
//!             title: Some("Known work".to_string()),
//!             doi: Some(doi.to_string()),
//!             ..Default::default()
//!         }))
//!     }
//!     fn search_by_title(
//!         &self,
//!         _title: &str,
//!         _rows: usize,
//!     ) -> Result<Vec<CanonicalRecord>, RegistryError> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! let validator = CitationValidator::new(OneWork);
//! let results = validator.validate(&[Reference {
//!     doi: Some("https://doi.org/10.1000/known".to_string()),
//!     ..Default::default()
//! }]);
//!
//! assert_eq!(results[0].confidence, Confidence::High);
//! assert_eq!(results[0].method, ValidationMethod::Doi);
//! ```
//!
//! ## Validation strategy
//!
//! Each reference walks a ladder of strategies, weakest last; a reference
//! that fails one rung falls through to the next instead of erroring:
//!
//! 1. **DOI lookup** — when a DOI is present, normalizable, and
//!    syntactically valid. Registry confirmation yields `HIGH`; a known-bad
//!    DOI yields `LOW` with `doi_not_found`.
//! 2. **Title search** — when a non-blank title is present. The best of
//!    the top candidates is scored with normalized similarity; `>= 0.8`
//!    yields `MEDIUM`, anything else `LOW`, with the score always reported.
//! 3. **No usable fields** — `LOW` with method `none`.
//!
//! At most one registry request is issued per reference, and each request
//! first waits on the shared [`RateLimiter`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::rate_limit::RateLimiter;
use crate::registry::Registry;
use crate::similarity::title_similarity;
use crate::utils::{format_doi, is_valid_doi};
use crate::{
    CanonicalRecord, Confidence, DuplicateMatch, PaperMetadata, Reference, ValidatedCitation,
    ValidationMethod,
};

/// Configuration options for controlling validation and duplicate detection.
///
/// # Examples
///
/// ```
/// use citecheck::ValidatorConfig;
///
/// let config = ValidatorConfig {
///     duplicate_title_threshold: 0.9,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Minimum title similarity for a `MEDIUM`-confidence match.
    pub title_match_threshold: f64,
    /// Minimum title similarity for flagging a paper as a duplicate.
    pub duplicate_title_threshold: f64,
    /// Number of candidates requested from the registry's title search.
    pub max_title_candidates: usize,
    /// Registry request budget enforced by the built-in rate limiter.
    pub requests_per_second: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            title_match_threshold: 0.8,
            duplicate_title_threshold: 0.85,
            max_title_candidates: 5,
            requests_per_second: 50.0,
        }
    }
}

/// Validates citations against a [`Registry`] and detects duplicate papers.
///
/// The validator is generic over the registry so tests and offline callers
/// can substitute an in-memory implementation. It never fails a batch:
/// registry faults degrade the affected reference to `LOW` confidence with
/// a machine-readable reason and processing continues.
#[derive(Debug)]
pub struct CitationValidator<R> {
    registry: R,
    config: ValidatorConfig,
    limiter: Arc<RateLimiter>,
}

impl<R: Registry> CitationValidator<R> {
    /// Creates a validator with default configuration.
    pub fn new(registry: R) -> Self {
        let config = ValidatorConfig::default();
        let limiter = Arc::new(RateLimiter::per_second(config.requests_per_second));
        Self {
            registry,
            config,
            limiter,
        }
    }

    /// Replaces the configuration, rebuilding the rate limiter to match
    /// the configured request budget.
    #[must_use]
    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.limiter = Arc::new(RateLimiter::per_second(config.requests_per_second));
        self.config = config;
        self
    }

    /// Shares an external rate limiter.
    ///
    /// Callers running several validators (or threads) against the same
    /// registry must share one limiter, since the registry's rate limit is
    /// global rather than per-caller.
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    /// Validates a batch of references.
    ///
    /// The output has the same length and order as the input; each element
    /// corresponds positionally to its reference. Failures never propagate:
    /// they surface as `LOW` confidence with an explanatory method tag.
    pub fn validate(&self, references: &[Reference]) -> Vec<ValidatedCitation> {
        info!(count = references.len(), "validating citations");

        let mut validated = Vec::with_capacity(references.len());
        for (index, reference) in references.iter().enumerate() {
            debug!(current = index + 1, total = references.len(), "validating citation");
            validated.push(self.validate_one(reference));
        }

        info!(count = validated.len(), "validation complete");
        validated
    }

    fn validate_one(&self, reference: &Reference) -> ValidatedCitation {
        // Strategy 1: DOI lookup, strongest signal
        if let Some(raw) = reference.doi.as_deref() {
            if let Some(doi) = format_doi(raw) {
                if is_valid_doi(&doi) {
                    return self.validate_by_doi(reference, &doi);
                }
            }
        }

        // Strategy 2: fuzzy title search
        if let Some(title) = reference.title.as_deref() {
            let title = title.trim();
            if !title.is_empty() {
                return self.validate_by_title(reference, title);
            }
        }

        // Nothing to validate against
        ValidatedCitation {
            original: reference.clone(),
            validated: reference.into(),
            confidence: Confidence::Low,
            method: ValidationMethod::None,
            title_similarity: None,
            error: None,
        }
    }

    fn validate_by_doi(&self, reference: &Reference, doi: &str) -> ValidatedCitation {
        self.limiter.await_turn();

        match self.registry.lookup_by_doi(doi) {
            Ok(Some(record)) => ValidatedCitation {
                original: reference.clone(),
                validated: record,
                confidence: Confidence::High,
                method: ValidationMethod::Doi,
                title_similarity: None,
                error: None,
            },
            Ok(None) => {
                warn!(doi, "DOI not found in registry");
                ValidatedCitation {
                    original: reference.clone(),
                    validated: reference.into(),
                    confidence: Confidence::Low,
                    method: ValidationMethod::DoiNotFound,
                    title_similarity: None,
                    error: None,
                }
            }
            Err(e) => {
                warn!(doi, error = %e, "registry error during DOI lookup");
                ValidatedCitation {
                    original: reference.clone(),
                    validated: reference.into(),
                    confidence: Confidence::Low,
                    method: ValidationMethod::DoiApiError,
                    title_similarity: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    fn validate_by_title(&self, reference: &Reference, title: &str) -> ValidatedCitation {
        self.limiter.await_turn();

        let candidates = match self
            .registry
            .search_by_title(title, self.config.max_title_candidates)
        {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(title, error = %e, "registry error during title search");
                return ValidatedCitation {
                    original: reference.clone(),
                    validated: reference.into(),
                    confidence: Confidence::Low,
                    method: ValidationMethod::TitleApiError,
                    title_similarity: None,
                    error: Some(e.to_string()),
                };
            }
        };

        if candidates.is_empty() {
            return ValidatedCitation {
                original: reference.clone(),
                validated: reference.into(),
                confidence: Confidence::Low,
                method: ValidationMethod::TitleNoMatch,
                title_similarity: None,
                error: None,
            };
        }

        let mut best_match: Option<&CanonicalRecord> = None;
        let mut best_similarity = 0.0_f64;
        for candidate in &candidates {
            if let Some(candidate_title) = candidate.title.as_deref() {
                let similarity = title_similarity(title, candidate_title);
                if similarity > best_similarity {
                    best_similarity = similarity;
                    best_match = Some(candidate);
                }
            }
        }

        let confidence = if best_similarity >= self.config.title_match_threshold {
            Confidence::Medium
        } else {
            Confidence::Low
        };

        ValidatedCitation {
            original: reference.clone(),
            validated: best_match
                .cloned()
                .unwrap_or_else(|| CanonicalRecord::from(reference)),
            confidence,
            method: ValidationMethod::TitleFuzzy,
            title_similarity: Some(best_similarity),
            error: None,
        }
    }

    /// Checks whether a candidate paper duplicates one of the existing
    /// papers.
    ///
    /// Exact DOI equality (after normalization) takes precedence over any
    /// title comparison and reports similarity `1.0`. Otherwise titles are
    /// compared in order and the **first** existing paper whose similarity
    /// meets the configured threshold is returned — not the best match
    /// overall, so the scan order of `existing` is part of the contract.
    pub fn check_duplicate(
        &self,
        candidate: &PaperMetadata,
        existing: &[PaperMetadata],
    ) -> Option<DuplicateMatch> {
        if let Some(doi) = candidate.doi.as_deref().and_then(format_doi) {
            for paper in existing {
                if let Some(existing_doi) = paper.doi.as_deref().and_then(format_doi) {
                    if existing_doi == doi {
                        info!(doi = %doi, paper_id = %paper.id, "duplicate found by DOI");
                        return Some(DuplicateMatch {
                            paper_id: paper.id.clone(),
                            similarity: 1.0,
                        });
                    }
                }
            }
        }

        if let Some(title) = candidate.title.as_deref() {
            if !title.trim().is_empty() {
                for paper in existing {
                    if let Some(existing_title) = paper.title.as_deref() {
                        let similarity = title_similarity(title, existing_title);
                        if similarity >= self.config.duplicate_title_threshold {
                            info!(
                                paper_id = %paper.id,
                                similarity,
                                "duplicate found by title similarity"
                            );
                            return Some(DuplicateMatch {
                                paper_id: paper.id.clone(),
                                similarity,
                            });
                        }
                    }
                }
            }
        }

        None
    }
}
