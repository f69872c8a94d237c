use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// How the document's line structure is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Blank lines are dropped during normalization; answer markers delimit
    /// blocks.
    #[default]
    Auto,
    /// Blank lines are kept as block separators and every physical line of a
    /// question chunk is one block (sources with one answer per line and
    /// unreliable markers).
    SingleLine,
}

/// A fatal configuration mistake, reported at build time.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("expected answer count {0} outside the supported 2-26 range")]
    AnswerCountOutOfRange(usize),
}

/// Configuration for the quiz parsing pipeline.
///
/// All regex fields are `Option<Regex>` — `None` means "use the built-in
/// default". Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── normalize.rs ──
    /// Line handling mode (see [`ParseMode`]).
    pub(crate) mode: ParseMode,
    /// Single alternation built from every blacklist term, `(?im)`.
    pub(crate) blacklist_re: Option<Regex>,

    // ── parser.rs / sections ──
    /// Delimiter locating the answer-key ("solutions") section, `(?im)`,
    /// matched once.
    pub(crate) answer_token_re: Option<Regex>,

    // ── segment.rs ──
    /// Override for the question-start marker pattern.
    pub(crate) question_marker_re: Option<Regex>,
    /// Override for the answer marker pattern.
    pub(crate) answer_marker_re: Option<Regex>,

    // ── infer.rs ──
    /// Answers each question is expected to have.
    pub(crate) expected_answers: Option<usize>,
    /// Merge stray blocks into the preceding block (line-wrapped answers).
    pub(crate) infer_question: bool,
    /// Drop questions whose answer count mismatches instead of keeping them
    /// with a warning.
    pub(crate) skip_on_error: bool,
    /// Text used to synthesize missing answers when too few are found.
    pub(crate) fill_missing_answers: Option<String>,

    // ── answer_key.rs ──
    /// Override for the key-entry pattern.
    pub(crate) key_entry_re: Option<Regex>,

    // ── selector.rs ──
    /// Similarity below which an emphasized line never selects an answer.
    pub(crate) selector_accept: f64,
    /// Similarity treated as near-exact; consumes the matched line.
    pub(crate) selector_advance: f64,
    /// Emphasized lines examined per question before giving up.
    pub(crate) selector_lookahead: usize,
    /// Emphasized/bold excerpt supplied by the extraction collaborator.
    pub(crate) emphasized_text: Option<String>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            mode: ParseMode::Auto,
            blacklist_re: None,
            answer_token_re: None,
            question_marker_re: None,
            answer_marker_re: None,
            expected_answers: None,
            infer_question: true,
            skip_on_error: false,
            fill_missing_answers: None,
            key_entry_re: None,
            selector_accept: 0.75,
            selector_advance: 0.90,
            selector_lookahead: 10,
            emphasized_text: None,
        }
    }
}

impl ParsingConfig {
    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    pub fn expected_answers(&self) -> Option<usize> {
        self.expected_answers
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in
/// [`build()`](Self::build). Fails fast with [`ConfigError`] if any pattern
/// is invalid or the expected answer count is out of range.
///
/// Custom marker patterns must follow the capture contract of the defaults:
/// the question pattern captures the identifier as group 1, an optional
/// answer-style letter probe as group 2, and the first content character as
/// its final group; the answer pattern captures its single marker letter as
/// group 3 and the first content character as its final group; the key-entry
/// pattern captures the question id as group 1 and the answer letter as
/// group 2.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    mode: ParseMode,
    blacklist: Vec<String>,
    answer_token: Option<String>,
    question_marker_re: Option<String>,
    answer_marker_re: Option<String>,
    expected_answers: Option<usize>,
    infer_question: Option<bool>,
    skip_on_error: Option<bool>,
    fill_missing_answers: Option<String>,
    key_entry_re: Option<String>,
    selector_accept: Option<f64>,
    selector_advance: Option<f64>,
    selector_lookahead: Option<usize>,
    emphasized_text: Option<String>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    // ── Blacklist ──

    /// Replace the blacklist with these terms (literal or regex).
    pub fn set_blacklist(mut self, terms: Vec<String>) -> Self {
        self.blacklist = terms;
        self
    }

    pub fn add_blacklist_term(mut self, term: String) -> Self {
        self.blacklist.push(term);
        self
    }

    // ── Sections ──

    /// Pattern delimiting the answer-key section. Used verbatim,
    /// case-insensitive, multi-line, matched once.
    pub fn answer_token(mut self, pattern: &str) -> Self {
        self.answer_token = Some(pattern.to_string());
        self
    }

    // ── Marker overrides ──

    pub fn question_marker_regex(mut self, pattern: &str) -> Self {
        self.question_marker_re = Some(pattern.to_string());
        self
    }

    pub fn answer_marker_regex(mut self, pattern: &str) -> Self {
        self.answer_marker_re = Some(pattern.to_string());
        self
    }

    pub fn key_entry_regex(mut self, pattern: &str) -> Self {
        self.key_entry_re = Some(pattern.to_string());
        self
    }

    // ── Inference flags ──

    pub fn expected_answers(mut self, n: usize) -> Self {
        self.expected_answers = Some(n);
        self
    }

    pub fn infer_question(mut self, enabled: bool) -> Self {
        self.infer_question = Some(enabled);
        self
    }

    pub fn skip_on_error(mut self, enabled: bool) -> Self {
        self.skip_on_error = Some(enabled);
        self
    }

    pub fn fill_missing_answers(mut self, filler: &str) -> Self {
        self.fill_missing_answers = Some(filler.to_string());
        self
    }

    // ── Selector ──

    pub fn selector_accept_threshold(mut self, threshold: f64) -> Self {
        self.selector_accept = Some(threshold);
        self
    }

    pub fn selector_advance_threshold(mut self, threshold: f64) -> Self {
        self.selector_advance = Some(threshold);
        self
    }

    pub fn selector_lookahead(mut self, lines: usize) -> Self {
        self.selector_lookahead = Some(lines);
        self
    }

    /// Emphasized/bold excerpt for the fuzzy selector matcher.
    pub fn emphasized_text(mut self, excerpt: &str) -> Self {
        self.emphasized_text = Some(excerpt.to_string());
        self
    }

    /// Compile all string patterns and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, ConfigError> {
        if let Some(n) = self.expected_answers
            && !(2..=26).contains(&n)
        {
            return Err(ConfigError::AnswerCountOutOfRange(n));
        }

        let compile_im = |pattern: &str| -> Result<Regex, regex::Error> {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .multi_line(true)
                .build()
        };

        let blacklist_re = if self.blacklist.is_empty() {
            None
        } else {
            let alternation = self
                .blacklist
                .iter()
                .map(|term| format!("(?:{term})"))
                .collect::<Vec<_>>()
                .join("|");
            Some(compile_im(&alternation)?)
        };

        let answer_token_re = self
            .answer_token
            .as_deref()
            .map(compile_im)
            .transpose()?;

        let compile = |opt: Option<String>| -> Result<Option<Regex>, regex::Error> {
            opt.map(|p| Regex::new(&p)).transpose()
        };

        Ok(ParsingConfig {
            mode: self.mode,
            blacklist_re,
            answer_token_re,
            question_marker_re: compile(self.question_marker_re)?,
            answer_marker_re: compile(self.answer_marker_re)?,
            expected_answers: self.expected_answers,
            infer_question: self.infer_question.unwrap_or(true),
            skip_on_error: self.skip_on_error.unwrap_or(false),
            fill_missing_answers: self.fill_missing_answers,
            key_entry_re: compile(self.key_entry_re)?,
            selector_accept: self.selector_accept.unwrap_or(0.75),
            selector_advance: self.selector_advance.unwrap_or(0.90),
            selector_lookahead: self.selector_lookahead.unwrap_or(10),
            emphasized_text: self.emphasized_text,
        })
    }
}
