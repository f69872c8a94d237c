use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Reserved measurement tokens (SI prefix × unit products), lowercase.
///
/// A first word in this set keeps its casing ("ml" never becomes "Ml"), and
/// a number followed by one of these joins up ("10 mm2" → "10mm2").
/// Single-letter units are deliberately absent: they collide with articles
/// and pronouns far more often than they measure anything.
static UNIT_TOKENS: Lazy<HashSet<String>> = Lazy::new(|| {
    const PREFIXES: &[&str] = &["", "k", "h", "da", "d", "c", "m", "n", "p", "u", "µ"];
    const BASES: &[&str] = &[
        "g", "m", "l", "s", "a", "v", "w", "j", "b", "hz", "pa", "mol", "cal", "m2", "m3",
    ];
    let mut tokens = HashSet::new();
    for prefix in PREFIXES {
        for base in BASES {
            let token = format!("{prefix}{base}");
            if token.chars().count() >= 2 {
                tokens.insert(token);
            }
        }
    }
    tokens
});

static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static HYPHEN_WRAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\p{L})-\s(\p{L})").unwrap());
static ORDINAL_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([ªº])").unwrap());
static OPEN_BRACKET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([(\[])\s+").unwrap());
static CLOSE_BRACKET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([)\]])").unwrap());
static SIGN_NUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(^|[\s<>=(])([+-])\s+(\d)").unwrap());
static CMP_NUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([<>]=?)\s+([+-]?\d)").unwrap());
static UNIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)\s+(\p{L}{2,}\d?)\b").unwrap());
static PERCENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)\s+%").unwrap());
static TEMP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)\s*º\s*([CF])\b").unwrap());
static TRAILING_QMARK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\?[\s?]*$").unwrap());
static TRAILING_COLON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+:$").unwrap());

/// Cleanup shared by question and answer text. Substitutions are
/// order-dependent: every later rule assumes whitespace is already
/// collapsed to single spaces.
fn canonicalize_common(text: &str) -> String {
    let text = WS_RE.replace_all(text.trim(), " ");
    let text = HYPHEN_WRAP_RE.replace_all(&text, "$1$2");
    let text = ORDINAL_SPACE_RE.replace_all(&text, "$1");
    let text = OPEN_BRACKET_RE.replace_all(&text, "$1");
    let text = CLOSE_BRACKET_RE.replace_all(&text, "$1");
    let text = SIGN_NUM_RE.replace_all(&text, "${1}${2}${3}");
    let text = CMP_NUM_RE.replace_all(&text, "$1$2");
    let text = UNIT_RE.replace_all(&text, |caps: &regex::Captures| {
        let token = &caps[2];
        if UNIT_TOKENS.contains(&token.to_lowercase()) {
            format!("{}{}", &caps[1], token)
        } else {
            format!("{} {}", &caps[1], token)
        }
    });
    let text = PERCENT_RE.replace_all(&text, "$1%");
    TEMP_RE.replace_all(&text, "$1º$2").into_owned()
}

/// Uppercase the first character unless the first token is a reserved unit.
fn capitalize_first(text: &str) -> String {
    let first_token = text.split_whitespace().next().unwrap_or("");
    let token_key: String = first_token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    if UNIT_TOKENS.contains(&token_key) {
        return text.to_string();
    }

    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() && first.is_lowercase() => {
            first.to_uppercase().collect::<String>() + chars.as_str()
        }
        _ => text.to_string(),
    }
}

/// Canonicalize question text: common cleanup, then trailing `?`-run
/// collapse and trailing `:` tightening.
pub fn canonicalize_question(text: &str) -> String {
    let text = canonicalize_common(text);
    let text = TRAILING_QMARK_RE.replace(&text, "?");
    let text = TRAILING_COLON_RE.replace(&text, ":");
    capitalize_first(text.trim())
}

/// Canonicalize answer text: common cleanup, then trailing period and
/// whitespace stripping.
pub fn canonicalize_answer(text: &str) -> String {
    let text = canonicalize_common(text);
    capitalize_first(text.trim_end_matches(['.', ' ']))
}
