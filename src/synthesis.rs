//! Thematic synthesis with a pluggable semantic backend.
//!
//! Theme suggestion clusters extracted findings by meaning. The embedding
//! and clustering models are heavyweight optional capabilities, so they sit
//! behind the [`SemanticBackend`] trait; without one the synthesizer runs
//! in manual mode and hands the raw findings back for a human pass.
//! Backend failures also degrade to manual mode — synthesis never blocks a
//! review.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

static KEYWORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-z]{4,}\b").unwrap());

/// How many example quotes each suggested theme carries.
const EXAMPLE_QUOTES_PER_THEME: usize = 5;

/// Errors reported by a semantic backend.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("semantic backend error: {0}")]
    Backend(String),
}

/// Embedding and clustering capability.
///
/// `cluster` returns one group label per input vector; negative labels
/// mark noise points that belong to no cluster.
pub trait SemanticBackend {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, SynthesisError>;
    fn cluster(&self, embeddings: &[Vec<f32>]) -> Result<Vec<i64>, SynthesisError>;
}

/// One extracted finding, attributed to its paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub paper_id: String,
    pub text: String,
}

/// A suggested theme: a cluster of findings with a keyword-derived name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Name built from the cluster's most frequent keywords
    pub suggested_name: String,
    /// Up to five representative quotes
    pub example_quotes: Vec<String>,
    /// Distinct papers contributing to the theme
    pub paper_ids: Vec<String>,
    pub paper_count: usize,
    pub finding_count: usize,
}

/// Result of a synthesis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ThemeSuggestions {
    /// No backend available: findings are returned for manual grouping
    Manual { findings: Vec<Finding> },
    /// Backend-clustered themes, largest first
    Clustered {
        themes: Vec<Theme>,
        total_findings: usize,
        clustered_findings: usize,
        unclustered_findings: usize,
    },
}

/// Groups findings into suggested themes.
pub struct ThematicSynthesizer {
    backend: Option<Box<dyn SemanticBackend>>,
}

impl ThematicSynthesizer {
    /// Creates a synthesizer with no semantic backend (manual mode).
    #[must_use]
    pub fn manual() -> Self {
        Self { backend: None }
    }

    /// Creates a synthesizer driven by the given backend.
    #[must_use]
    pub fn with_backend(backend: Box<dyn SemanticBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Suggests themes for the findings.
    ///
    /// Without a backend — or when the backend fails — returns
    /// [`ThemeSuggestions::Manual`] with the findings unchanged.
    pub fn suggest_themes(&self, findings: Vec<Finding>) -> ThemeSuggestions {
        let Some(backend) = self.backend.as_ref() else {
            return ThemeSuggestions::Manual { findings };
        };

        if findings.is_empty() {
            return ThemeSuggestions::Clustered {
                themes: Vec::new(),
                total_findings: 0,
                clustered_findings: 0,
                unclustered_findings: 0,
            };
        }

        let texts: Vec<String> = findings.iter().map(|f| f.text.clone()).collect();
        let labels = match backend
            .embed(&texts)
            .and_then(|embeddings| backend.cluster(&embeddings))
        {
            Ok(labels) if labels.len() == findings.len() => labels,
            Ok(_) => {
                warn!("semantic backend returned misaligned labels, falling back to manual mode");
                return ThemeSuggestions::Manual { findings };
            }
            Err(e) => {
                warn!(error = %e, "semantic backend failed, falling back to manual mode");
                return ThemeSuggestions::Manual { findings };
            }
        };

        // Group finding indices by cluster label, noise (< 0) excluded
        let mut clusters: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (index, label) in labels.iter().enumerate() {
            if *label >= 0 {
                clusters.entry(*label).or_default().push(index);
            }
        }

        let clustered_findings: usize = clusters.values().map(Vec::len).sum();
        let mut themes: Vec<Theme> = clusters
            .values()
            .map(|indices| {
                let cluster_texts: Vec<&str> =
                    indices.iter().map(|&i| findings[i].text.as_str()).collect();

                let mut paper_ids: Vec<String> = Vec::new();
                for &i in indices {
                    if !paper_ids.contains(&findings[i].paper_id) {
                        paper_ids.push(findings[i].paper_id.clone());
                    }
                }

                Theme {
                    suggested_name: extract_keywords(&cluster_texts),
                    example_quotes: indices
                        .iter()
                        .take(EXAMPLE_QUOTES_PER_THEME)
                        .map(|&i| findings[i].text.clone())
                        .collect(),
                    paper_count: paper_ids.len(),
                    finding_count: indices.len(),
                    paper_ids,
                }
            })
            .collect();

        // Largest themes first; stable sort keeps label order on ties
        themes.sort_by(|a, b| b.paper_count.cmp(&a.paper_count));

        ThemeSuggestions::Clustered {
            themes,
            total_findings: findings.len(),
            clustered_findings,
            unclustered_findings: findings.len() - clustered_findings,
        }
    }
}

/// Names a cluster from its three most frequent keywords (words of four
/// or more letters), title-cased and joined with `+`.
fn extract_keywords(texts: &[&str]) -> String {
    let mut words: Vec<String> = Vec::new();
    for text in texts {
        let lowered = text.to_lowercase();
        words.extend(
            KEYWORD_REGEX
                .find_iter(&lowered)
                .map(|word| word.as_str().to_string()),
        );
    }

    let counts = words.iter().counts();
    let mut ranked: Vec<(&String, usize)> = words
        .iter()
        .unique()
        .map(|word| (word, counts[word]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .iter()
        .take(3)
        .map(|(word, _)| title_case(word))
        .join(" + ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
