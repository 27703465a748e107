//! # Text and Metadata Similarity
//!
//! Pure comparison primitives used by the publication validator: normalized
//! Levenshtein similarity for titles and bodies, and Jaccard overlap for tag
//! and category sets.
//!
//! Thresholds are exposed as constants rather than buried in comparison
//! logic so tests can assert against the exact values the validator uses.

use std::collections::HashSet;

/// Minimum normalized similarity for a remote title to match the original.
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.85;

/// Minimum normalized similarity for a remote body to match the original.
pub const BODY_SIMILARITY_THRESHOLD: f64 = 0.75;

/// Minimum Jaccard overlap for tag and category sets to match.
pub const METADATA_OVERLAP_THRESHOLD: f64 = 0.7;

/// Normalize text for comparison: lowercase, strip characters that are
/// neither alphanumeric nor whitespace, and collapse whitespace runs into
/// single spaces.
pub fn normalize_text(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove markup tags (`<...>`) from rendered content before comparison.
///
/// Platforms commonly return stored HTML for content submitted as markdown,
/// so tag payloads must not count against body similarity.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Levenshtein edit distance between two strings, by character.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Normalized similarity between two strings in `[0.0, 1.0]`.
///
/// Equal strings short-circuit to `1.0`; if exactly one side is empty the
/// result is `0.0`. Otherwise `(max_len - distance) / max_len` where
/// `distance` is the Levenshtein distance.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let max_len = a.chars().count().max(b.chars().count());
    let distance = levenshtein(a, b);
    (max_len - distance) as f64 / max_len as f64
}

/// Jaccard overlap of two sets: intersection size over union size.
///
/// Two empty sets overlap completely (`1.0`); an empty set against a
/// non-empty one does not overlap at all (`0.0`).
pub fn set_overlap(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Case-normalize a list of labels into a comparison set.
pub fn normalize_labels(labels: &[String]) -> HashSet<String> {
    labels
        .iter()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect()
}
