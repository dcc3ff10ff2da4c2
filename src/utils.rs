use regex::Regex;
use std::sync::LazyLock;

static DOI_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://(?:dx\.)?doi\.org/(.+)$").unwrap());

static DOI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^10\.\d+(\.\d+)*/\S+$").unwrap());

/// Normalizes a DOI string by removing URL prefixes and `[doi]` suffixes.
///
/// Returns `None` when no `10.`-prefixed identifier can be found in the
/// input. The result is lowercased with all whitespace removed.
///
/// # Arguments
///
/// * `doi_str` - The DOI string to normalize
pub fn format_doi(doi_str: &str) -> Option<String> {
    if doi_str.is_empty() {
        return None;
    }
    let doi = doi_str
        .trim()
        .trim_end_matches("[doi]")
        .trim()
        .replace(|c: char| c.is_whitespace(), "")
        .to_lowercase();

    // A DOI directory indicator always starts with "10."
    if let Some(pos) = doi.find("10.") {
        let doi = &doi[pos..];
        if let Some(captures) = DOI_URL_REGEX.captures(doi) {
            Some(captures[1].to_string())
        } else {
            Some(doi.to_string())
        }
    } else {
        None
    }
}

/// Syntactic check for a normalized DOI: the `10.`-prefixed registrant
/// code, a slash, and a non-empty suffix.
pub fn is_valid_doi(doi: &str) -> bool {
    DOI_PATTERN.is_match(doi)
}

/// Formats an author name surname-first, the way registry responses are
/// reported (`"Family, Given"`; bare family name when no given name).
pub fn format_author_name(family: &str, given: &str) -> String {
    let family = family.trim();
    let given = given.trim();
    if given.is_empty() {
        family.to_string()
    } else {
        format!("{family}, {given}")
    }
}

/// Formats page numbers consistently, handling partial end page numbers
/// (`"1234-45"` becomes `"1234-1245"`).
///
/// # Arguments
///
/// * `page_range` - The page string to format
pub fn format_page_numbers(page_range: &str) -> String {
    if !page_range.contains('-') {
        return page_range.to_string();
    }

    let parts: Vec<&str> = page_range.split('-').collect();
    if parts.len() != 2 {
        return page_range.to_string();
    }

    let (from, to) = (parts[0], parts[1]);

    let (from_prefix, from_num) = split_prefix_and_number(from);
    let (to_prefix, to_num) = split_prefix_and_number(to);

    // Mismatched non-empty prefixes are not a continuable range
    if from_prefix != to_prefix && !from_prefix.is_empty() && !to_prefix.is_empty() {
        return page_range.to_string();
    }

    let to_num = match to_num {
        Some(num) => num,
        None => return page_range.to_string(),
    };

    let from_num = match from_num {
        Some(num) => num,
        None => return page_range.to_string(),
    };

    // If the end number is shorter, complete it from the start number
    let completed_to = if to_num.len() < from_num.len() {
        format!("{}{}", &from_num[..from_num.len() - to_num.len()], to_num)
    } else {
        to_num.to_string()
    };

    if from_num == completed_to {
        return format!("{}{}", from_prefix, from_num);
    }

    format!("{}{}-{}{}", from_prefix, from_num, from_prefix, completed_to)
}

/// Helper function to split a page number into prefix and numeric part
fn split_prefix_and_number(input: &str) -> (String, Option<String>) {
    match input.find(|c: char| c.is_ascii_digit()) {
        Some(index) => {
            let prefix = input[..index].to_string();
            let number = input[index..].to_string();
            (prefix, Some(number))
        }
        None => (input.to_string(), None),
    }
}
