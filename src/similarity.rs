//! Fuzzy title similarity scoring.
//!
//! Titles are compared after normalization (lowercased, punctuation
//! stripped, whitespace collapsed) using a longest-matching-blocks ratio:
//! `2 × matched / (len(a) + len(b))` over the normalized strings. The score
//! is symmetric and bounded in `[0, 1]`; titles that are identical after
//! normalization score exactly `1.0`.

use std::collections::HashMap;

/// Computes the similarity of two titles in `[0, 1]`.
///
/// # Examples
///
/// ```
/// use citecheck::similarity::title_similarity;
///
/// assert_eq!(title_similarity("Deep Learning", "deep learning!"), 1.0);
/// assert!(title_similarity("Deep Learning", "Shallow Parsing") < 0.5);
/// ```
pub fn title_similarity(first: &str, second: &str) -> f64 {
    sequence_ratio(&normalize_title(first), &normalize_title(second))
}

/// Normalizes a title for comparison: keeps alphanumerics and spaces,
/// lowercases, and collapses runs of whitespace to single spaces.
pub fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Longest-matching-blocks similarity ratio over raw strings.
///
/// Two empty strings are trivially identical and score `1.0`.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    // Block selection is orientation-dependent on ties; fixing an
    // orientation keeps the score symmetric.
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let x: Vec<char> = first.chars().collect();
    let y: Vec<char> = second.chars().collect();

    let total = x.len() + y.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&x, &y) as f64 / total as f64
}

/// Total length of the matching blocks found by recursively locating the
/// longest common block and matching to either side of it.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut regions = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = regions.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size > 0 {
            matched += size;
            regions.push((alo, i, blo, j));
            regions.push((i + size, ahi, j + size, bhi));
        }
    }
    matched
}

/// Finds the longest block `a[i..i+size] == b[j..j+size]` within the given
/// region, preferring the earliest block in `a`, then in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut b_indices: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate().take(bhi).skip(blo) {
        b_indices.entry(*c).or_default().push(j);
    }

    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run_lengths[j] = length of the common run ending at a[i], b[j]
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut new_runs: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b_indices.get(c) {
            for &j in positions {
                let len = j
                    .checked_sub(1)
                    .and_then(|prev| run_lengths.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                new_runs.insert(j, len);
                if len > best_size {
                    best_i = i + 1 - len;
                    best_j = j + 1 - len;
                    best_size = len;
                }
            }
        }
        run_lengths = new_runs;
    }

    (best_i, best_j, best_size)
}
