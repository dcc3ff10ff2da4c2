//! Typed CrossRef response envelopes.
//!
//! CrossRef wraps every payload in a `message` object; work lookups return
//! a single work, searches a `message.items` list. Only the fields needed
//! for a [`CanonicalRecord`] are modeled; everything else is ignored.

use serde::Deserialize;

use crate::CanonicalRecord;
use crate::utils::{format_author_name, format_doi, format_page_numbers};

#[derive(Debug, Deserialize)]
pub(crate) struct WorkEnvelope {
    pub(crate) message: Work,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchEnvelope {
    pub(crate) message: SearchBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchBody {
    #[serde(default)]
    pub(crate) items: Vec<Work>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Work {
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<WorkAuthor>,
    #[serde(rename = "container-title", default)]
    container_title: Vec<String>,
    published: Option<WorkDate>,
    #[serde(rename = "published-print")]
    published_print: Option<WorkDate>,
    #[serde(rename = "published-online")]
    published_online: Option<WorkDate>,
    volume: Option<String>,
    issue: Option<String>,
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorkAuthor {
    given: Option<String>,
    family: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorkDate {
    // date-parts entries may contain nulls for unknown components
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i64>>>,
}

impl WorkDate {
    fn year(&self) -> Option<i32> {
        self.date_parts.first()?.first()?.map(|year| year as i32)
    }
}

impl From<Work> for CanonicalRecord {
    fn from(work: Work) -> Self {
        // Authors without a family name are dropped rather than guessed at
        let authors: Vec<String> = work
            .author
            .iter()
            .filter_map(|author| {
                let family = author.family.as_deref().unwrap_or("").trim();
                if family.is_empty() {
                    return None;
                }
                Some(format_author_name(
                    family,
                    author.given.as_deref().unwrap_or(""),
                ))
            })
            .collect();

        let year = work
            .published
            .as_ref()
            .and_then(WorkDate::year)
            .or_else(|| work.published_print.as_ref().and_then(WorkDate::year))
            .or_else(|| work.published_online.as_ref().and_then(WorkDate::year));

        Self {
            authors,
            year,
            pages: work.page.as_deref().map(format_page_numbers),
            doi: work.doi.as_deref().and_then(format_doi),
            title: work.title.into_iter().next(),
            journal: work.container_title.into_iter().next(),
            volume: work.volume,
            issue: work.issue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_work_envelope_minimal() {
        let json = r#"{
            "message": {
                "DOI": "10.1000/Test",
                "title": ["Test Paper Title"],
                "author": [
                    {"given": "Jane", "family": "Doe"},
                    {"given": "J."}
                ],
                "container-title": ["Nature"],
                "published": {"date-parts": [[2024, 6, 1]]},
                "volume": "61",
                "issue": "4",
                "page": "1234-45"
            }
        }"#;

        let envelope: WorkEnvelope = serde_json::from_str(json).unwrap();
        let record = CanonicalRecord::from(envelope.message);

        assert_eq!(record.title.as_deref(), Some("Test Paper Title"));
        assert_eq!(record.authors, vec!["Doe, Jane".to_string()]);
        assert_eq!(record.year, Some(2024));
        assert_eq!(record.journal.as_deref(), Some("Nature"));
        assert_eq!(record.volume.as_deref(), Some("61"));
        assert_eq!(record.issue.as_deref(), Some("4"));
        assert_eq!(record.pages.as_deref(), Some("1234-1245"));
        assert_eq!(record.doi.as_deref(), Some("10.1000/test"));
    }

    #[test]
    fn test_search_envelope_defaults_to_empty_items() {
        let envelope: SearchEnvelope = serde_json::from_str(r#"{"message": {}}"#).unwrap();
        assert!(envelope.message.items.is_empty());
    }

    #[test]
    fn test_search_envelope_items() {
        let json = r#"{
            "message": {
                "items": [
                    {"DOI": "10.1000/a", "title": ["First"]},
                    {"title": []}
                ]
            }
        }"#;

        let envelope: SearchEnvelope = serde_json::from_str(json).unwrap();
        let records: Vec<CanonicalRecord> = envelope
            .message
            .items
            .into_iter()
            .map(CanonicalRecord::from)
            .collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("First"));
        assert_eq!(records[0].doi.as_deref(), Some("10.1000/a"));
        assert_eq!(records[1].title, None);
        assert_eq!(records[1].doi, None);
    }

    #[test]
    fn test_year_fallback_chain() {
        let json = r#"{
            "message": {
                "published-print": {"date-parts": [[2019]]}
            }
        }"#;
        let envelope: WorkEnvelope = serde_json::from_str(json).unwrap();
        let record = CanonicalRecord::from(envelope.message);
        assert_eq!(record.year, Some(2019));
    }

    #[test]
    fn test_null_date_parts() {
        let json = r#"{"message": {"published": {"date-parts": [[null]]}}}"#;
        let envelope: WorkEnvelope = serde_json::from_str(json).unwrap();
        let record = CanonicalRecord::from(envelope.message);
        assert_eq!(record.year, None);
    }
}
