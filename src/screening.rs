//! Screening decisions and their sources.
//!
//! Screening walks every paper through named review stages; at each stage
//! reviewers record `include`, `exclude`, or `maybe`. Decisions live in the
//! caller's store — this module defines the records, the [`DecisionSource`]
//! seam the reliability calculator reads through, and the validation rules
//! applied when decisions are recorded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A reviewer's verdict on one paper at one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Include,
    Exclude,
    Maybe,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Include => write!(f, "include"),
            Decision::Exclude => write!(f, "exclude"),
            Decision::Maybe => write!(f, "maybe"),
        }
    }
}

/// A named phase of paper inclusion/exclusion review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningStage {
    /// First pass over titles and abstracts
    TitleAbstract,
    /// Full-text eligibility review
    FullText,
    /// Methodological quality appraisal
    Quality,
}

impl ScreeningStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreeningStage::TitleAbstract => "title_abstract",
            ScreeningStage::FullText => "full_text",
            ScreeningStage::Quality => "quality",
        }
    }
}

impl std::fmt::Display for ScreeningStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised when recording a screening decision.
#[derive(Debug, Error)]
pub enum ScreeningError {
    /// Exclusions must cite the inclusion criteria they fail.
    #[error("exclude decisions require a rationale referencing the inclusion criteria")]
    MissingRationale,
}

/// One recorded screening decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningDecision {
    /// Reviewer who recorded the decision
    pub reviewer_id: String,
    /// The verdict
    pub decision: Decision,
    /// Free-text rationale; mandatory for exclusions
    pub rationale: Option<String>,
}

impl ScreeningDecision {
    /// Creates a decision record, enforcing that exclusions carry a
    /// rationale.
    ///
    /// # Errors
    ///
    /// Returns [`ScreeningError::MissingRationale`] for an `exclude`
    /// decision with no (or a blank) rationale.
    pub fn new(
        reviewer_id: impl Into<String>,
        decision: Decision,
        rationale: Option<String>,
    ) -> Result<Self, ScreeningError> {
        if decision == Decision::Exclude
            && rationale.as_deref().is_none_or(|r| r.trim().is_empty())
        {
            return Err(ScreeningError::MissingRationale);
        }
        Ok(Self {
            reviewer_id: reviewer_id.into(),
            decision,
            rationale,
        })
    }
}

/// Source of recorded screening decisions, typically backed by the
/// caller's review store.
///
/// Implementations must return decisions in the order they were recorded.
pub trait DecisionSource {
    /// All decisions recorded for a paper at a stage, oldest first.
    fn fetch_decisions(&self, paper_id: &str, stage: ScreeningStage) -> Vec<ScreeningDecision>;
}

/// Papers the given reviewer has not yet screened at a stage, preserving
/// the input paper order.
pub fn papers_needing_screening<S: DecisionSource>(
    source: &S,
    papers: &[String],
    reviewer_id: &str,
    stage: ScreeningStage,
) -> Vec<String> {
    papers
        .iter()
        .filter(|paper_id| {
            let decisions = source.fetch_decisions(paper_id.as_str(), stage);
            !decisions
                .iter()
                .any(|decision| decision.reviewer_id == reviewer_id)
        })
        .cloned()
        .collect()
}
