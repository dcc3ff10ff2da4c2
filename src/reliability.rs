//! Inter-rater reliability for screening decisions.
//!
//! Computes Cohen's kappa — chance-corrected agreement between two
//! categorical raters — over papers that were screened by exactly two
//! reviewers at a given stage, along with simple percent agreement and the
//! list of disagreements.
//!
//! # Usage
//!
//! ```rust
//! use citecheck::reliability::ReliabilityCalculator;
//! use citecheck::screening::{Decision, DecisionSource, ScreeningDecision, ScreeningStage};
//!
//! struct TwoReviewers;
//!
//! impl DecisionSource for TwoReviewers {
//!     fn fetch_decisions(&self, _paper_id: &str, _stage: ScreeningStage) -> Vec<ScreeningDecision> {
//!         vec![
//!             ScreeningDecision {
//!                 reviewer_id: "alice".to_string(),
//!                 decision: Decision::Include,
//!                 rationale: None,
//!             },
//!             ScreeningDecision {
//!                 reviewer_id: "bob".to_string(),
//!                 decision: Decision::Include,
//!                 rationale: None,
//!             },
//!         ]
//!     }
//! }
//!
//! let calculator = ReliabilityCalculator::new(TwoReviewers);
//! let papers = vec!["p1".to_string(), "p2".to_string()];
//! let report = calculator
//!     .calculate_screening_kappa(&papers, ScreeningStage::TitleAbstract)
//!     .unwrap();
//!
//! assert_eq!(report.kappa, 1.0);
//! assert_eq!(report.percent_agreement, 100.0);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::screening::{Decision, DecisionSource, ScreeningStage};

/// The two decisions recorded for one dual-screened paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningPair {
    /// Paper the decisions refer to
    pub paper_id: String,
    /// Reviewer whose decision was recorded first
    pub first_reviewer: String,
    /// Reviewer whose decision was recorded second
    pub second_reviewer: String,
    /// First recorded decision
    pub first_decision: Decision,
    /// Second recorded decision
    pub second_decision: Decision,
}

impl ScreeningPair {
    /// Whether both reviewers reached the same decision.
    pub fn agree(&self) -> bool {
        self.first_decision == self.second_decision
    }
}

/// Landis & Koch interpretation bands for kappa.
///
/// Bands are right-open except the top: `[0.60, 0.80)` is `Substantial`,
/// everything from `0.80` up is `AlmostPerfect`, and negative kappa is
/// `Poor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KappaInterpretation {
    Poor,
    Slight,
    Fair,
    Moderate,
    Substantial,
    #[serde(rename = "Almost Perfect")]
    AlmostPerfect,
}

impl KappaInterpretation {
    /// Classifies a kappa value on the Landis & Koch scale.
    #[must_use]
    pub fn from_kappa(kappa: f64) -> Self {
        if kappa < 0.0 {
            KappaInterpretation::Poor
        } else if kappa < 0.20 {
            KappaInterpretation::Slight
        } else if kappa < 0.40 {
            KappaInterpretation::Fair
        } else if kappa < 0.60 {
            KappaInterpretation::Moderate
        } else if kappa < 0.80 {
            KappaInterpretation::Substantial
        } else {
            KappaInterpretation::AlmostPerfect
        }
    }
}

impl std::fmt::Display for KappaInterpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let band = match self {
            KappaInterpretation::Poor => "Poor",
            KappaInterpretation::Slight => "Slight",
            KappaInterpretation::Fair => "Fair",
            KappaInterpretation::Moderate => "Moderate",
            KappaInterpretation::Substantial => "Substantial",
            KappaInterpretation::AlmostPerfect => "Almost Perfect",
        };
        write!(f, "{band}")
    }
}

/// Agreement statistics over the dual-screened papers of one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityReport {
    /// Cohen's kappa
    pub kappa: f64,
    /// Qualitative band for `kappa`
    pub interpretation: KappaInterpretation,
    /// Number of papers screened by exactly two reviewers
    pub total_paired_papers: usize,
    /// Papers whose two decisions agree
    pub agreement_count: usize,
    /// Observed agreement, 0-100 (not chance-corrected)
    pub percent_agreement: f64,
    /// Every paired paper whose decisions differ, in paper order
    pub disagreements: Vec<ScreeningPair>,
}

/// Calculates screening reliability over a [`DecisionSource`].
#[derive(Debug)]
pub struct ReliabilityCalculator<S> {
    source: S,
}

impl<S: DecisionSource> ReliabilityCalculator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Computes Cohen's kappa for the papers screened by exactly two
    /// reviewers at `stage`.
    ///
    /// Papers with zero, one, or three-plus decisions at the stage are
    /// silently excluded from the paired set. Returns `None` when no
    /// dual-screened papers exist — distinct from a zero-agreement report.
    pub fn calculate_screening_kappa(
        &self,
        paper_ids: &[String],
        stage: ScreeningStage,
    ) -> Option<ReliabilityReport> {
        let mut pairs = Vec::new();
        for paper_id in paper_ids {
            let decisions = self.source.fetch_decisions(paper_id, stage);
            if decisions.len() == 2 {
                pairs.push(ScreeningPair {
                    paper_id: paper_id.clone(),
                    first_reviewer: decisions[0].reviewer_id.clone(),
                    second_reviewer: decisions[1].reviewer_id.clone(),
                    first_decision: decisions[0].decision,
                    second_decision: decisions[1].decision,
                });
            } else {
                debug!(
                    paper_id = %paper_id,
                    decisions = decisions.len(),
                    "paper not dual-screened, excluded from paired set"
                );
            }
        }

        if pairs.is_empty() {
            return None;
        }

        let first: Vec<Decision> = pairs.iter().map(|pair| pair.first_decision).collect();
        let second: Vec<Decision> = pairs.iter().map(|pair| pair.second_decision).collect();
        let kappa = cohen_kappa(&first, &second);

        let agreement_count = pairs.iter().filter(|pair| pair.agree()).count();
        let percent_agreement = 100.0 * agreement_count as f64 / pairs.len() as f64;
        let total_paired_papers = pairs.len();
        let disagreements: Vec<ScreeningPair> =
            pairs.into_iter().filter(|pair| !pair.agree()).collect();

        Some(ReliabilityReport {
            kappa,
            interpretation: KappaInterpretation::from_kappa(kappa),
            total_paired_papers,
            agreement_count,
            percent_agreement,
            disagreements,
        })
    }
}

/// Cohen's kappa for two aligned label sequences.
///
/// `κ = (p_o − p_e) / (1 − p_e)` where `p_o` is the observed proportion of
/// exact agreement and `p_e` the agreement expected by chance from each
/// rater's marginal label frequencies. When both raters used a single
/// identical label throughout, `p_e = 1` and kappa is defined as `1.0`.
///
/// # Panics
///
/// Panics when the sequences are empty or have different lengths; callers
/// are responsible for pairing labels by paper first.
pub fn cohen_kappa(first: &[Decision], second: &[Decision]) -> f64 {
    assert_eq!(
        first.len(),
        second.len(),
        "label sequences must be aligned by paper"
    );
    assert!(!first.is_empty(), "at least one paired decision is required");

    let n = first.len() as f64;
    let observed = first
        .iter()
        .zip(second.iter())
        .filter(|(a, b)| a == b)
        .count() as f64
        / n;

    let mut first_counts: HashMap<Decision, usize> = HashMap::new();
    let mut second_counts: HashMap<Decision, usize> = HashMap::new();
    for label in first {
        *first_counts.entry(*label).or_insert(0) += 1;
    }
    for label in second {
        *second_counts.entry(*label).or_insert(0) += 1;
    }

    let expected: f64 = first_counts
        .iter()
        .map(|(label, count)| {
            let other = second_counts.get(label).copied().unwrap_or(0);
            (*count as f64 / n) * (other as f64 / n)
        })
        .sum();

    // Single shared label leaves no room for chance correction
    if (1.0 - expected).abs() < f64::EPSILON {
        return 1.0;
    }

    (observed - expected) / (1.0 - expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::ScreeningDecision;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::collections::HashMap;

    struct MapSource(HashMap<String, Vec<ScreeningDecision>>);

    impl DecisionSource for MapSource {
        fn fetch_decisions(
            &self,
            paper_id: &str,
            _stage: ScreeningStage,
        ) -> Vec<ScreeningDecision> {
            self.0.get(paper_id).cloned().unwrap_or_default()
        }
    }

    fn decision(reviewer: &str, verdict: Decision) -> ScreeningDecision {
        ScreeningDecision {
            reviewer_id: reviewer.to_string(),
            decision: verdict,
            rationale: None,
        }
    }

    fn source(entries: &[(&str, &[(&str, Decision)])]) -> MapSource {
        let map = entries
            .iter()
            .map(|(paper, decisions)| {
                (
                    paper.to_string(),
                    decisions
                        .iter()
                        .map(|(reviewer, verdict)| decision(reviewer, *verdict))
                        .collect(),
                )
            })
            .collect();
        MapSource(map)
    }

    fn papers(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_perfect_agreement() {
        let source = source(&[
            ("p1", &[("a", Decision::Include), ("b", Decision::Include)]),
            ("p2", &[("a", Decision::Exclude), ("b", Decision::Exclude)]),
        ]);
        let calculator = ReliabilityCalculator::new(source);

        let report = calculator
            .calculate_screening_kappa(&papers(&["p1", "p2"]), ScreeningStage::TitleAbstract)
            .unwrap();

        assert_eq!(report.kappa, 1.0);
        assert_eq!(report.interpretation, KappaInterpretation::AlmostPerfect);
        assert_eq!(report.interpretation.to_string(), "Almost Perfect");
        assert_eq!(report.total_paired_papers, 2);
        assert_eq!(report.agreement_count, 2);
        assert_eq!(report.percent_agreement, 100.0);
        assert!(report.disagreements.is_empty());
    }

    #[test]
    fn test_complete_disagreement_is_negative() {
        // Two binary labels with a 50/50 marginal split for each rater
        let source = source(&[
            ("p1", &[("a", Decision::Include), ("b", Decision::Exclude)]),
            ("p2", &[("a", Decision::Exclude), ("b", Decision::Include)]),
        ]);
        let calculator = ReliabilityCalculator::new(source);

        let report = calculator
            .calculate_screening_kappa(&papers(&["p1", "p2"]), ScreeningStage::FullText)
            .unwrap();

        assert!(report.kappa < 0.0, "kappa was {}", report.kappa);
        assert_eq!(report.interpretation, KappaInterpretation::Poor);
        assert_eq!(report.percent_agreement, 0.0);
        assert_eq!(report.disagreements.len(), 2);
        assert_eq!(report.disagreements[0].paper_id, "p1");
        assert_eq!(report.disagreements[1].paper_id, "p2");
    }

    #[test]
    fn test_known_mid_scale_value() {
        // p_o = 0.5 and p_e = 0.5 with symmetric marginals: kappa = 0
        let source = source(&[
            ("p1", &[("a", Decision::Include), ("b", Decision::Include)]),
            ("p2", &[("a", Decision::Include), ("b", Decision::Exclude)]),
            ("p3", &[("a", Decision::Exclude), ("b", Decision::Exclude)]),
            ("p4", &[("a", Decision::Exclude), ("b", Decision::Include)]),
        ]);
        let calculator = ReliabilityCalculator::new(source);

        let report = calculator
            .calculate_screening_kappa(
                &papers(&["p1", "p2", "p3", "p4"]),
                ScreeningStage::TitleAbstract,
            )
            .unwrap();

        assert!(report.kappa.abs() < f64::EPSILON);
        assert_eq!(report.interpretation, KappaInterpretation::Slight);
        assert_eq!(report.percent_agreement, 50.0);
    }

    #[test]
    fn test_single_decision_papers_are_excluded() {
        let source = source(&[
            ("p1", &[("a", Decision::Include), ("b", Decision::Include)]),
            ("solo", &[("a", Decision::Exclude)]),
            (
                "triple",
                &[
                    ("a", Decision::Include),
                    ("b", Decision::Include),
                    ("c", Decision::Maybe),
                ],
            ),
        ]);
        let calculator = ReliabilityCalculator::new(source);

        let report = calculator
            .calculate_screening_kappa(
                &papers(&["p1", "solo", "triple", "unscreened"]),
                ScreeningStage::TitleAbstract,
            )
            .unwrap();

        assert_eq!(report.total_paired_papers, 1);
        assert_eq!(report.percent_agreement, 100.0);
    }

    #[test]
    fn test_no_paired_papers_yields_none() {
        let source = source(&[("solo", &[("a", Decision::Include)])]);
        let calculator = ReliabilityCalculator::new(source);

        let report = calculator.calculate_screening_kappa(
            &papers(&["solo", "unscreened"]),
            ScreeningStage::Quality,
        );

        assert_eq!(report, None);
    }

    #[test]
    fn test_degenerate_single_label_is_perfect() {
        let all_include = vec![Decision::Include; 5];
        assert_eq!(cohen_kappa(&all_include, &all_include), 1.0);
    }

    #[test]
    fn test_kappa_binary_complete_disagreement() {
        let first = vec![Decision::Include, Decision::Exclude];
        let second = vec![Decision::Exclude, Decision::Include];
        assert_eq!(cohen_kappa(&first, &second), -1.0);
    }

    #[test]
    #[should_panic(expected = "aligned by paper")]
    fn test_mismatched_lengths_panic() {
        cohen_kappa(&[Decision::Include], &[]);
    }

    #[rstest]
    #[case(-0.3, KappaInterpretation::Poor)]
    #[case(0.0, KappaInterpretation::Slight)]
    #[case(0.19, KappaInterpretation::Slight)]
    #[case(0.20, KappaInterpretation::Fair)]
    #[case(0.39, KappaInterpretation::Fair)]
    #[case(0.40, KappaInterpretation::Moderate)]
    #[case(0.59, KappaInterpretation::Moderate)]
    #[case(0.60, KappaInterpretation::Substantial)]
    #[case(0.79, KappaInterpretation::Substantial)]
    #[case(0.80, KappaInterpretation::AlmostPerfect)]
    #[case(1.0, KappaInterpretation::AlmostPerfect)]
    fn test_interpretation_bands(#[case] kappa: f64, #[case] expected: KappaInterpretation) {
        assert_eq!(KappaInterpretation::from_kappa(kappa), expected);
    }
}
