use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Normalize text for fuzzy comparison — strips to lowercase alphanumeric only.
///
/// Steps (order matters):
/// 1. Unicode NFKD normalization (decomposes accents)
/// 2. Strip to ASCII
/// 3. Keep only `[a-zA-Z0-9]`
/// 4. Lowercase
///
/// Two strings that differ only in accents, punctuation, casing or spacing
/// normalize to the same form, which is what OCR'd emphasis excerpts need.
pub fn normalize_for_match(text: &str) -> String {
    let ascii: String = text.nfkd().filter(|c| c.is_ascii()).collect();

    static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").unwrap());
    NON_ALNUM.replace_all(&ascii, "").to_lowercase()
}

/// Normalized similarity between two strings, 0.0–1.0.
///
/// Both sides go through [`normalize_for_match`] first; either side
/// normalizing to empty scores 0.0 rather than matching everything.
pub fn similarity(a: &str, b: &str) -> f64 {
    let norm_a = normalize_for_match(a);
    let norm_b = normalize_for_match(b);

    if norm_a.is_empty() || norm_b.is_empty() {
        return 0.0;
    }

    rapidfuzz::fuzz::ratio(norm_a.chars(), norm_b.chars())
}

/// Best-scoring candidate for `needle`, as `(index, score)`.
///
/// Ties keep the earliest candidate. Returns `None` when there are no
/// candidates or the needle normalizes to empty.
pub fn best_match(needle: &str, candidates: &[String]) -> Option<(usize, f64)> {
    let norm_needle = normalize_for_match(needle);
    if norm_needle.is_empty() {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let norm_candidate = normalize_for_match(candidate);
        if norm_candidate.is_empty() {
            continue;
        }
        let score = rapidfuzz::fuzz::ratio(norm_needle.chars(), norm_candidate.chars());
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((i, score));
        }
    }
    best
}
