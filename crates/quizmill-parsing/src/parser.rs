use quizmill_core::{AnswerKeyEntry, Diagnostic, ParseStats, Question};

use crate::config::ParsingConfig;
use crate::segment::QuestionChunk;
use crate::{ParseError, ParseOutcome, answer_key, assemble, canonical, infer, normalize, segment, selector};

/// A configurable quiz parsing pipeline.
///
/// Holds a [`ParsingConfig`] and exposes each pipeline step as a method.
/// The default constructor uses built-in defaults; use
/// [`QuizParser::with_config`] to supply custom patterns, flags and
/// thresholds.
pub struct QuizParser {
    config: ParsingConfig,
}

impl Default for QuizParser {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizParser {
    /// Create a parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
        }
    }

    /// Create a parser with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Clean raw document text (step 1): substitutions, charset
    /// restriction, line trimming, blacklist erasure.
    pub fn normalize_text(&self, raw_text: &str) -> String {
        normalize::normalize_text(raw_text, &self.config)
    }

    /// Split normalized text into the question section and the optional
    /// answer-key section (step 2).
    ///
    /// Without an answer token the whole text is questions. One section
    /// after splitting means the token never matched (warning); more than
    /// two sections signal a caller mistake and abort the document.
    pub fn split_sections<'a>(
        &self,
        text: &'a str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<(&'a str, Option<&'a str>), ParseError> {
        let Some(re) = &self.config.answer_token_re else {
            return Ok((text, None));
        };

        let sections: Vec<&str> = re.split(text).collect();
        match sections.len() {
            1 => {
                diagnostics.push(Diagnostic::warning(
                    "no answer section detected; review the answer token (regex supported)",
                ));
                Ok((sections[0], None))
            }
            2 => Ok((sections[0], Some(sections[1]))),
            n => Err(ParseError::AmbiguousAnswerSections(n)),
        }
    }

    /// Split the question section into raw chunks (step 3).
    pub fn segment_questions(&self, text: &str) -> Vec<QuestionChunk> {
        segment::split_questions(text, &self.config)
    }

    /// Segment, infer and canonicalize one question chunk (steps 4-5).
    ///
    /// Returns `None` when the block is rejected; the reason lands in
    /// `diagnostics` and the document continues.
    pub fn parse_question_block(
        &self,
        chunk: &QuestionChunk,
        diagnostics: &mut Vec<Diagnostic>,
        stats: &mut ParseStats,
    ) -> Option<Question> {
        let blocks = segment::split_answers(chunk, &self.config);
        let mut question = infer::infer_blocks(blocks, &self.config, diagnostics, stats)?;

        question.question = canonical::canonicalize_question(&question.question);
        for answer in &mut question.answers {
            *answer = canonical::canonicalize_answer(answer);
        }
        Some(question)
    }

    /// Extract key entries from the solutions section (step 6).
    pub fn parse_answer_key(
        &self,
        text: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<AnswerKeyEntry> {
        answer_key::parse_answer_key(text, &self.config, diagnostics)
    }

    /// Align the emphasized-text excerpt against parsed questions (step 7).
    pub fn match_emphasized(
        &self,
        excerpt: &str,
        questions: &[Question],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<AnswerKeyEntry> {
        selector::match_emphasized(excerpt, questions, &self.config, diagnostics)
    }

    /// Run the full pipeline on one document.
    ///
    /// Block-local failures surface as diagnostics beside a best-effort
    /// quiz; only configuration mistakes return `Err`.
    pub fn parse_document(&self, raw_text: &str) -> Result<ParseOutcome, ParseError> {
        let mut diagnostics = Vec::new();
        let mut stats = ParseStats::default();

        let text = self.normalize_text(raw_text);
        let (question_text, key_text) = self.split_sections(&text, &mut diagnostics)?;

        let chunks = self.segment_questions(question_text);
        stats.raw_questions = chunks.len();

        let mut questions = Vec::new();
        for chunk in &chunks {
            if let Some(question) = self.parse_question_block(chunk, &mut diagnostics, &mut stats) {
                questions.push(question);
            }
        }

        let mut entries = Vec::new();
        if let Some(key_text) = key_text {
            let parsed = self.parse_answer_key(key_text, &mut diagnostics);
            stats.key_entries = parsed.len();
            entries.extend(parsed);
        }
        if let Some(excerpt) = &self.config.emphasized_text {
            let matched = self.match_emphasized(excerpt, &questions, &mut diagnostics);
            stats.selector_matched = matched.len();
            stats.selector_skipped = questions.len() - matched.len();
            entries.extend(matched);
        }

        let quiz = assemble::build_quiz(questions, &entries, &mut diagnostics, &mut stats);
        stats.parsed_questions = quiz.len();

        tracing::debug!(
            questions = stats.parsed_questions,
            raw = stats.raw_questions,
            entries = entries.len(),
            "document parsed"
        );

        Ok(ParseOutcome {
            quiz,
            stats,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParsingConfigBuilder;
    use quizmill_core::Severity;

    // ── Scenario A: plain questions, no answer key ──

    #[test]
    fn test_parse_document_no_key() {
        let parser = QuizParser::new();
        let outcome = parser
            .parse_document("1. What is 2+2?\na) 3\nb) 4\nc) 5")
            .unwrap();

        assert_eq!(outcome.quiz.len(), 1);
        let q = outcome.quiz.get("1").unwrap();
        assert_eq!(q.question, "What is 2+2?");
        assert_eq!(q.answers, vec!["3", "4", "5"]);
        assert_eq!(q.correct_answer, None);
        assert_eq!(outcome.stats.parsed_questions, 1);
    }

    // ── Scenario B: delimited answer section ──

    #[test]
    fn test_parse_document_with_key_section() {
        let config = ParsingConfigBuilder::new().answer_token("===").build().unwrap();
        let parser = QuizParser::with_config(config);
        let outcome = parser
            .parse_document("1. What is 2+2?\na) 3\nb) 4\nc) 5\n===\n1-b")
            .unwrap();

        assert_eq!(outcome.quiz.get("1").unwrap().correct_answer, Some(1));
        assert_eq!(outcome.stats.key_entries, 1);
    }

    #[test]
    fn test_missing_answer_section_warns() {
        let config = ParsingConfigBuilder::new()
            .answer_token("SOLUTIONS:")
            .build()
            .unwrap();
        let parser = QuizParser::with_config(config);
        let outcome = parser
            .parse_document("1. Question?\na) x\nb) y")
            .unwrap();

        assert!(
            outcome
                .diagnostics
                .iter()
                .any(|d| d.severity == Severity::Warning
                    && d.message.contains("no answer section"))
        );
        assert_eq!(outcome.quiz.len(), 1);
    }

    #[test]
    fn test_too_many_sections_is_fatal() {
        let config = ParsingConfigBuilder::new().answer_token("===").build().unwrap();
        let parser = QuizParser::with_config(config);
        let result = parser.parse_document("1. Q?\na) x\nb) y\n===\n1-a\n===\nagain");
        assert!(matches!(
            result,
            Err(ParseError::AmbiguousAnswerSections(3))
        ));
    }

    // ── Scenario C: filler answers ──

    #[test]
    fn test_fill_missing_answers_end_to_end() {
        let config = ParsingConfigBuilder::new()
            .expected_answers(4)
            .fill_missing_answers("N/A")
            .build()
            .unwrap();
        let parser = QuizParser::with_config(config);
        let outcome = parser
            .parse_document("1. Question?\na) one\nb) two\nc) three")
            .unwrap();

        let q = outcome.quiz.get("1").unwrap();
        assert_eq!(q.answers.len(), 4);
        assert_eq!(q.answers[3], "N/A");
        assert!(
            outcome
                .diagnostics
                .iter()
                .any(|d| d.severity == Severity::Warning)
        );
    }

    // ── Scenario D: id collision ──

    #[test]
    fn test_duplicate_id_keeps_first() {
        let parser = QuizParser::new();
        let outcome = parser
            .parse_document("2. First version?\na) x\nb) y\n2. Duplicate version?\na) p\nb) q")
            .unwrap();

        assert_eq!(outcome.quiz.len(), 1);
        assert_eq!(outcome.quiz.get("2").unwrap().question, "First version?");
        assert_eq!(outcome.stats.id_collisions, 1);
    }

    // ── Scenario E: fuzzy selector ──

    #[test]
    fn test_emphasized_excerpt_resolves_answer() {
        let config = ParsingConfigBuilder::new()
            .emphasized_text("the powerhouse of the cell\n")
            .build()
            .unwrap();
        let parser = QuizParser::with_config(config);
        let outcome = parser
            .parse_document(
                "5. What are mitochondria?\n\
                 a) a kind of ribosome\n\
                 b) part of the cell wall\n\
                 c) the powerhouse of the cell",
            )
            .unwrap();

        let q = outcome.quiz.get("5").unwrap();
        assert_eq!(q.correct_answer, Some(2));
        assert_eq!(outcome.stats.selector_matched, 1);
        assert_eq!(outcome.stats.selector_skipped, 0);
    }

    #[test]
    fn test_rejected_block_is_local_not_fatal() {
        let parser = QuizParser::new();
        // question 1 has a single answer and is dropped; question 2 survives
        let outcome = parser
            .parse_document("1. Broken?\na) only one\n2. Fine?\na) x\nb) y")
            .unwrap();

        assert_eq!(outcome.quiz.len(), 1);
        assert!(outcome.quiz.get("2").is_some());
        assert_eq!(outcome.stats.too_few_answers, 1);
        assert_eq!(outcome.stats.raw_questions, 2);
    }
}
