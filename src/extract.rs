//! Metadata extraction from PDF filenames.
//!
//! Ingested papers frequently arrive as `Author_Year_Title.pdf` (or close
//! variants), which is enough to seed a metadata record before any heavier
//! extraction runs. The 4-digit year anchors the pattern: the first word
//! before it is taken as the lead author's surname and everything after it
//! as the title. Each field that could not be recovered lowers the
//! extraction confidence.

use std::sync::LazyLock;

use nanoid::nanoid;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::PaperMetadata;

static YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

/// Metadata recovered from a filename, with a fresh paper id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    /// Newly assigned identifier for the candidate paper
    pub id: String,
    /// Title of the work, when recoverable
    pub title: Option<String>,
    /// Lead author surname, when recoverable
    pub authors: Vec<String>,
    /// Publication year, when recoverable
    pub year: Option<i32>,
    /// Fraction of `{title, authors, year}` that was recovered
    pub confidence: f64,
}

impl ExtractedMetadata {
    /// Converts into the record shape consumed by duplicate detection.
    #[must_use]
    pub fn into_paper_metadata(self) -> PaperMetadata {
        PaperMetadata {
            id: self.id,
            title: self.title,
            doi: None,
        }
    }
}

/// Extracts metadata from a filename such as `Smith_2020_Food_deserts.pdf`.
///
/// # Examples
///
/// ```
/// use citecheck::extract::extract_from_filename;
///
/// let metadata = extract_from_filename("Turner_2019_Mobile_markets.pdf");
/// assert_eq!(metadata.authors, vec!["Turner".to_string()]);
/// assert_eq!(metadata.year, Some(2019));
/// assert_eq!(metadata.title.as_deref(), Some("Mobile markets"));
/// ```
pub fn extract_from_filename(filename: &str) -> ExtractedMetadata {
    let name = filename
        .strip_suffix(".pdf")
        .unwrap_or(filename)
        .replace('_', " ");

    let mut title = None;
    let mut authors = Vec::new();
    let mut year = None;

    if let Some(found) = YEAR_REGEX.find(&name) {
        year = found.as_str().parse::<i32>().ok();

        let before_year = name[..found.start()].trim();
        if let Some(surname) = before_year.split_whitespace().next() {
            authors.push(surname.to_string());
        }

        let after_year = name[found.end()..].trim();
        if !after_year.is_empty() {
            title = Some(after_year.to_string());
        }
    }

    let recovered = [title.is_some(), !authors.is_empty(), year.is_some()]
        .iter()
        .filter(|found| **found)
        .count();

    ExtractedMetadata {
        id: nanoid!(),
        title,
        authors,
        year,
        confidence: recovered as f64 / 3.0,
    }
}
