use once_cell::sync::Lazy;
use regex::Regex;

use quizmill_core::{AnswerKeyEntry, Diagnostic};

use crate::config::ParsingConfig;

/// Key entry: word-boundary dotted numeric id, a non-word separator run,
/// then a single letter at a word boundary. The trailing `\b` keeps the
/// letter from being part of a longer word (the regex crate has no
/// look-ahead). Matches `1-A`, `2.b`, `3 // C`, `(6.1b)`.
static KEY_ENTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d+(?:\.\d+)*)\W*([a-zA-Z])\b").unwrap());

/// Extract `(question id, answer index)` pairs from the solutions section.
///
/// Letters convert to zero-based indices by alphabet position. When the
/// expected answer count is known, out-of-range pairs are discarded with a
/// warning rather than stored.
pub fn parse_answer_key(
    text: &str,
    config: &ParsingConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<AnswerKeyEntry> {
    let re = config.key_entry_re.as_ref().unwrap_or(&KEY_ENTRY_RE);

    let mut entries = Vec::new();
    for caps in re.captures_iter(text) {
        let (Some(id), Some(letter)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let question_id = id.as_str().to_lowercase();
        let letter = letter.as_str().chars().next().unwrap_or('a');
        let answer_index = (letter.to_ascii_lowercase() as u8 - b'a') as usize;

        if let Some(expected) = config.expected_answers()
            && answer_index >= expected
        {
            tracing::warn!(id = %question_id, letter = %letter, "answer key entry out of range");
            diagnostics.push(Diagnostic::warning(format!(
                "answer key entry '{question_id}-{letter}' exceeds the expected \
                 {expected} answers; discarded"
            )));
            continue;
        }

        entries.push(AnswerKeyEntry {
            question_id,
            answer_index,
        });
    }
    entries
}
