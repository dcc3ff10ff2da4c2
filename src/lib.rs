//! A library for validating, deduplicating, and quality-checking academic citations.
//!
//! `citecheck` supports literature-review workflows: it confirms candidate
//! references against an external bibliographic registry, flags duplicate
//! papers, and measures inter-rater agreement between screening reviewers.
//!
//! # Key Features
//!
//! - **Citation Validation**: confirm references against a registry such as
//!   CrossRef, with confidence tiers:
//!   - `HIGH` — the reference's DOI was confirmed by the registry
//!   - `MEDIUM` — a registry title search matched with similarity ≥ 0.8
//!   - `LOW` — everything else, tagged with a machine-readable reason
//!
//! - **Duplicate Detection**:
//!   - exact matching on normalized DOIs
//!   - fuzzy title comparison with configurable thresholds
//!
//! - **Screening Reliability**:
//!   - Cohen's kappa over paired reviewer decisions
//!   - Landis & Koch interpretation bands
//!   - per-paper disagreement listing
//!
//! # Citation Validation
//!
//! Validation consumes any [`Registry`] implementation. The bundled
//! [`CrossrefRegistry`] talks to the CrossRef REST API; tests and offline
//! callers can supply their own:
//!
//! ```rust
//! use citecheck::{CanonicalRecord, CitationValidator, Confidence, Reference};
//! use citecheck::registry::{Registry, RegistryError};
//!
//! struct EmptyRegistry;
//!
//! impl Registry for EmptyRegistry {
//!     fn lookup_by_doi(&self, _doi: &str) -> Result<Option<CanonicalRecord>, RegistryError> {
//!         Ok(None)
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
//! let validator = CitationValidator::new(EmptyRegistry);
//! let references = vec![Reference {
//!     title: Some("Food deserts and health outcomes".to_string()),
//!     ..Default::default()
//! }];
//!
//! let results = validator.validate(&references);
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].confidence, Confidence::Low);
//! ```
//!
//! # Duplicate Detection
//!
//! ```rust
//! use citecheck::similarity::title_similarity;
//!
//! let score = title_similarity("Machine Learning Basics", "Machine learning basics.");
//! assert!(score > 0.99);
//! ```
//!
//! # Inter-Rater Reliability
//!
//! ```rust
//! use citecheck::reliability::cohen_kappa;
//! use citecheck::screening::Decision;
//!
//! let first = vec![Decision::Include, Decision::Exclude];
//! let second = vec![Decision::Include, Decision::Exclude];
//! assert_eq!(cohen_kappa(&first, &second), 1.0);
//! ```
//!
//! # Error Handling
//!
//! Validation never fails a batch: registry faults degrade the affected
//! reference to `LOW` confidence with a descriptive [`ValidationMethod`] tag
//! and the batch continues. Registry implementations report transport-level
//! problems through [`RegistryError`].
//!
//! # Thread Safety
//!
//! The validator issues synchronous, blocking registry calls and holds no
//! shared state besides its [`RateLimiter`]. Callers parallelizing across
//! references must share a single limiter (`Arc<RateLimiter>`) so the
//! registry-wide request spacing is preserved.

use serde::{Deserialize, Serialize};

pub mod extract;
pub mod rate_limit;
pub mod registry;
pub mod reliability;
pub mod screening;
pub mod similarity;
pub mod synthesis;
pub mod validate;
mod utils;

// Reexports
#[cfg(feature = "crossref")]
pub use registry::CrossrefRegistry;
pub use rate_limit::RateLimiter;
pub use registry::{Registry, RegistryError};
pub use reliability::{KappaInterpretation, ReliabilityCalculator, ReliabilityReport};
pub use screening::{Decision, DecisionSource, ScreeningDecision, ScreeningStage};
pub use validate::{CitationValidator, ValidatorConfig};

/// An unvalidated citation supplied by a caller.
///
/// All fields are optional except the author list, which may simply be
/// empty. References are treated as immutable input: validation returns a
/// separate [`ValidatedCitation`] and never mutates the original.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    /// Title of the work
    pub title: Option<String>,
    /// Author names, in citation order
    pub authors: Vec<String>,
    /// Publication year
    pub year: Option<i32>,
    /// Digital Object Identifier, in any common notation
    pub doi: Option<String>,
}

/// Registry-confirmed bibliographic metadata.
///
/// Partial by design: only the fields present in the registry response are
/// populated. When no confirmation is found, validation falls back to a
/// record carrying the original reference's fields unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Title of the work
    pub title: Option<String>,
    /// Author names, surname-first, in citation order
    pub authors: Vec<String>,
    /// Publication year
    pub year: Option<i32>,
    /// Journal name
    pub journal: Option<String>,
    /// Volume number
    pub volume: Option<String>,
    /// Issue number
    pub issue: Option<String>,
    /// Page range
    pub pages: Option<String>,
    /// Normalized DOI
    pub doi: Option<String>,
}

impl From<&Reference> for CanonicalRecord {
    fn from(reference: &Reference) -> Self {
        Self {
            title: reference.title.clone(),
            authors: reference.authors.clone(),
            year: reference.year,
            doi: reference.doi.clone(),
            ..Default::default()
        }
    }
}

/// Qualitative trust level attached to a validation outcome.
///
/// `High` is only produced when a DOI was matched and confirmed by the
/// registry; `Medium` only when a registry title search scored ≥ 0.8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "HIGH"),
            Confidence::Medium => write!(f, "MEDIUM"),
            Confidence::Low => write!(f, "LOW"),
        }
    }
}

/// How a validation result was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMethod {
    /// DOI confirmed by the registry
    Doi,
    /// Best title-search candidate, scored by normalized similarity
    TitleFuzzy,
    /// DOI was syntactically valid but unknown to the registry
    DoiNotFound,
    /// Registry or transport failure during DOI lookup
    DoiApiError,
    /// Title search returned no candidates
    TitleNoMatch,
    /// Registry or transport failure during title search
    TitleApiError,
    /// Nothing to validate against: no usable DOI and no title
    None,
}

impl std::fmt::Display for ValidationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            ValidationMethod::Doi => "doi",
            ValidationMethod::TitleFuzzy => "title_fuzzy",
            ValidationMethod::DoiNotFound => "doi_not_found",
            ValidationMethod::DoiApiError => "doi_api_error",
            ValidationMethod::TitleNoMatch => "title_no_match",
            ValidationMethod::TitleApiError => "title_api_error",
            ValidationMethod::None => "none",
        };
        write!(f, "{tag}")
    }
}

/// The annotated outcome of validating one [`Reference`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedCitation {
    /// The reference exactly as supplied
    pub original: Reference,
    /// Best-known metadata; falls back to the original when unconfirmed
    pub validated: CanonicalRecord,
    /// Trust level of the outcome
    pub confidence: Confidence,
    /// How the outcome was obtained
    pub method: ValidationMethod,
    /// Best normalized title similarity, when a title search ran
    pub title_similarity: Option<f64>,
    /// Machine-readable failure detail, when a registry call failed
    pub error: Option<String>,
}

/// Metadata of a stored paper, as consumed by duplicate detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperMetadata {
    /// Stable identifier of the paper in the caller's store
    pub id: String,
    /// Title of the work
    pub title: Option<String>,
    /// Digital Object Identifier, in any common notation
    pub doi: Option<String>,
}

/// A duplicate-detection hit against an existing paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    /// Identifier of the matched existing paper
    pub paper_id: String,
    /// Similarity in `[0, 1]`; exactly `1.0` for DOI matches
    pub similarity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_display() {
        assert_eq!(Confidence::High.to_string(), "HIGH");
        assert_eq!(Confidence::Low.to_string(), "LOW");
    }

    #[test]
    fn test_method_tags_roundtrip() {
        let tags = [
            (ValidationMethod::Doi, "doi"),
            (ValidationMethod::TitleFuzzy, "title_fuzzy"),
            (ValidationMethod::DoiNotFound, "doi_not_found"),
            (ValidationMethod::DoiApiError, "doi_api_error"),
            (ValidationMethod::TitleNoMatch, "title_no_match"),
            (ValidationMethod::TitleApiError, "title_api_error"),
            (ValidationMethod::None, "none"),
        ];
        for (method, tag) in tags {
            assert_eq!(method.to_string(), tag);
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{tag}\""));
        }
    }

    #[test]
    fn test_fallback_record_keeps_reference_fields() {
        let reference = Reference {
            title: Some("Example".to_string()),
            authors: vec!["Smith, John".to_string()],
            year: Some(2021),
            doi: Some("10.1000/example".to_string()),
        };
        let record = CanonicalRecord::from(&reference);
        assert_eq!(record.title, reference.title);
        assert_eq!(record.authors, reference.authors);
        assert_eq!(record.year, reference.year);
        assert_eq!(record.doi, reference.doi);
        assert_eq!(record.journal, None);
    }
}
