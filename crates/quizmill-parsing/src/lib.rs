use thiserror::Error;

pub mod answer_key;
pub mod assemble;
pub mod canonical;
pub mod config;
pub mod infer;
pub mod normalize;
pub mod parser;
pub mod segment;
pub mod selector;

pub use config::{ConfigError, ParseMode, ParsingConfig, ParsingConfigBuilder};
pub use parser::QuizParser;
pub use segment::{QuestionChunk, RawBlock};
// Re-export domain types from core (canonical definitions live there)
pub use quizmill_core::{AnswerKeyEntry, Diagnostic, ParseStats, Question, Quiz, Severity};

#[derive(Error, Debug)]
pub enum ParseError {
    /// The answer-token delimiter produced more than two sections; a caller
    /// mistake, not document noise, so the whole document aborts.
    #[error("answer token split produced {0} sections, expected 1 or 2")]
    AmbiguousAnswerSections(usize),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Everything one document parse produces: a best-effort quiz, counters,
/// and the structured diagnostics explaining what was repaired or dropped.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub quiz: Quiz,
    pub stats: ParseStats,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse one document of OCR-noisy quiz text into a [`Quiz`].
///
/// Pipeline:
/// 1. Normalize text (quotes, charset, whitespace, blacklist)
/// 2. Split off the answer-key section, if a delimiter is configured
/// 3. Segment questions, then answers, by position-anchored markers
/// 4. Merge/repair blocks under the expected-answer-count policy
/// 5. Canonicalize question and answer text
/// 6. Resolve correct answers from the key section and/or the emphasized
///    excerpt
/// 7. Assemble the quiz, reporting collisions and orphaned key entries
pub fn parse_document(
    raw_text: &str,
    config: &ParsingConfig,
) -> Result<ParseOutcome, ParseError> {
    QuizParser::with_config(config.clone()).parse_document(raw_text)
}
