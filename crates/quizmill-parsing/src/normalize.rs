use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{ParseMode, ParsingConfig};

/// Characters the pipeline keeps: Latin letters, digits, punctuation,
/// whitespace, and the math/measure symbols the canonicalizer needs.
/// Everything else (emoji, control characters, non-Latin scripts) is dropped.
static CHARSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{Latin}\p{Nd}\p{P}\s+<>=|^~ºª°µ]").unwrap());

/// Unify quote/apostrophe variants and known OCR substitutions.
///
/// The `€)`/`©` forms are what OCR tends to produce for a `c)` answer
/// marker; `*C`/`°` are degree-sign misreads.
fn substitute(text: &str) -> String {
    text.replace('\u{feff}', "")
        .replace(['\u{201c}', '\u{201d}', '\u{201e}'], "\"")
        .replace(['\u{2018}', '\u{2019}', '\u{201a}'], "'")
        .replace("\u{b4}\u{b4}", "\"")
        .replace("``", "\"")
        .replace('\u{b4}', "'")
        .replace('`', "'")
        .replace('\u{2026}', "...")
        .replace(['\u{2013}', '\u{2014}'], "-")
        .replace('°', "º")
        .replace("€)", "c)")
        .replace('©', "c)")
        .replace("*C", "ºC")
}

/// Normalize raw document text, in fixed order: character substitutions,
/// charset restriction, per-line trimming (dropping blank lines in
/// [`ParseMode::Auto`]), then blacklist erasure.
pub fn normalize_text(text: &str, config: &ParsingConfig) -> String {
    let text = substitute(text);
    let text = CHARSET_RE.replace_all(&text, "");

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| config.mode == ParseMode::SingleLine || !line.is_empty())
        .collect();
    let text = lines.join("\n");

    match &config.blacklist_re {
        Some(re) => re.replace_all(&text, "").into_owned(),
        None => text,
    }
}
