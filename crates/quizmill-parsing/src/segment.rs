use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{ParseMode, ParsingConfig};

/// Question-start marker: line-start dotted decimal identifier, an optional
/// trailing letter (the answer-style-id probe — see [`split_questions`]), a
/// separator run without newlines, then something that looks like a sentence
/// start. The regex crate has no look-ahead, so the first content character
/// is a capture group and chunk bodies begin at its position.
static QUESTION_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(\d+(?:\.\d+)*)([a-zA-Z])?([^\w\n]+?)(¿|¡|[+-]\d|\d|\p{L})").unwrap()
});

/// Answer marker: optional leading punctuation, optional dotted numeric
/// prefix, exactly one letter, separator, content probe. Matches `a)`,
/// `(b)`, `c---1.3`, `12.b`, `6.1a)`.
static ANSWER_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([^\w\n]*)(?:(\d+(?:\.\d+)*)[.\-]?)?([a-zA-Z])([^\w\n]+?)(¿|¡|[+-]\d|\d|\p{L})")
        .unwrap()
});

/// The raw text of one question, between its start marker and the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionChunk {
    /// Lowercased identifier from the start marker.
    pub id: String,
    /// Chunk text with the marker stripped.
    pub body: String,
}

/// An intermediate fragment produced during answer segmentation.
///
/// `id` is `None` when the fragment carries no explicit marker (meaning:
/// continuation of the previous block). `body` is the marker-stripped text;
/// `raw` keeps the original fragment so that a block demoted to a
/// continuation re-joins with its marker intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub id: Option<String>,
    pub body: String,
    pub raw: String,
}

struct Boundary {
    start: usize,
    content_start: usize,
    id: String,
}

/// Content starts at the final capture group; a custom pattern without one
/// falls back to the match end.
fn content_start(caps: &regex::Captures) -> usize {
    caps.get(caps.len() - 1)
        .map(|g| g.start())
        .unwrap_or_else(|| caps.get(0).unwrap().end())
}

/// Split normalized text into question chunks.
///
/// Candidates whose identifier carries a trailing letter ("6.1a", "6b") are
/// answer-style ids, not question starts — OCR-merged numbering — and stay
/// inside the previous chunk as stray answer continuations. Text before the
/// first recognized marker is discarded.
pub fn split_questions(text: &str, config: &ParsingConfig) -> Vec<QuestionChunk> {
    let re = config
        .question_marker_re
        .as_ref()
        .unwrap_or(&QUESTION_MARKER_RE);

    let mut boundaries: Vec<Boundary> = Vec::new();
    for caps in re.captures_iter(text) {
        if caps.get(2).is_some() {
            // answer-style id: continuation of the previous block
            continue;
        }
        let Some(id) = caps.get(1) else { continue };
        boundaries.push(Boundary {
            start: caps.get(0).unwrap().start(),
            content_start: content_start(&caps),
            id: id.as_str().to_lowercase(),
        });
    }

    let mut chunks = Vec::new();
    for (i, boundary) in boundaries.iter().enumerate() {
        let end = boundaries
            .get(i + 1)
            .map(|next| next.start)
            .unwrap_or(text.len());
        let body = text[boundary.content_start..end].trim();
        if body.is_empty() {
            continue;
        }
        chunks.push(QuestionChunk {
            id: boundary.id.clone(),
            body: body.to_string(),
        });
    }
    chunks
}

/// Split one question chunk into an ordered sequence of [`RawBlock`]s.
///
/// The first block is the question itself (carrying the chunk id); blocks
/// after it are answer fragments in discovery order. In
/// [`ParseMode::SingleLine`] every physical line is one block instead.
/// Answer fragments whose residual text is entirely non-alphanumeric are
/// discarded as noise.
pub fn split_answers(chunk: &QuestionChunk, config: &ParsingConfig) -> Vec<RawBlock> {
    match config.mode() {
        ParseMode::SingleLine => split_answers_per_line(chunk),
        ParseMode::Auto => split_answers_structured(chunk, config),
    }
}

fn split_answers_structured(chunk: &QuestionChunk, config: &ParsingConfig) -> Vec<RawBlock> {
    let re = config
        .answer_marker_re
        .as_ref()
        .unwrap_or(&ANSWER_MARKER_RE);

    let mut boundaries: Vec<Boundary> = Vec::new();
    for caps in re.captures_iter(&chunk.body) {
        let Some(letter) = caps.get(3) else { continue };
        boundaries.push(Boundary {
            start: caps.get(0).unwrap().start(),
            content_start: content_start(&caps),
            id: letter.as_str().to_lowercase(),
        });
    }

    let question_end = boundaries
        .first()
        .map(|b| b.start)
        .unwrap_or(chunk.body.len());
    let question_body = chunk.body[..question_end].trim().to_string();
    let mut blocks = vec![RawBlock {
        id: Some(chunk.id.clone()),
        raw: question_body.clone(),
        body: question_body,
    }];

    for (i, boundary) in boundaries.iter().enumerate() {
        let end = boundaries
            .get(i + 1)
            .map(|next| next.start)
            .unwrap_or(chunk.body.len());
        let body = chunk.body[boundary.content_start..end].trim();
        if !body.chars().any(char::is_alphanumeric) {
            continue;
        }
        blocks.push(RawBlock {
            id: Some(boundary.id.clone()),
            body: body.to_string(),
            raw: chunk.body[boundary.start..end].trim().to_string(),
        });
    }
    blocks
}

fn split_answers_per_line(chunk: &QuestionChunk) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    for (i, line) in chunk.body.lines().enumerate() {
        let line = line.trim();
        if i == 0 {
            blocks.push(RawBlock {
                id: Some(chunk.id.clone()),
                body: line.to_string(),
                raw: line.to_string(),
            });
            continue;
        }
        if !line.chars().any(char::is_alphanumeric) {
            continue;
        }
        blocks.push(RawBlock {
            id: None,
            body: line.to_string(),
            raw: line.to_string(),
        });
    }
    blocks
}
