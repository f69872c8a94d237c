use quizmill_core::{AnswerKeyEntry, Diagnostic, Question, matching};

use crate::config::ParsingConfig;

/// Align an emphasized/bold-text excerpt against parsed questions,
/// producing the same `(question id, answer index)` pairs as the regex key
/// parser.
///
/// Questions are visited in discovery order with a forward-only cursor over
/// the excerpt lines (emphasized lines are assumed to appear in the same
/// relative order as their questions). A near-exact line (score ≥ the
/// advance threshold) selects its answer and consumes the line; failing
/// that, the best line in the look-ahead window selects without consuming
/// if it reaches the acceptance threshold; otherwise the question is
/// skipped with a diagnostic rather than guessed. No backtracking across
/// questions — cursor drift on malformed documents is an accepted risk that
/// bounds the scan to O(lines × answers).
pub fn match_emphasized(
    excerpt: &str,
    questions: &[Question],
    config: &ParsingConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<AnswerKeyEntry> {
    let lines: Vec<&str> = excerpt
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut entries = Vec::new();
    let mut cursor = 0usize;

    for question in questions {
        if question.answers.is_empty() {
            continue;
        }
        let window_end = (cursor + config.selector_lookahead).min(lines.len());
        let mut window_best: Option<(usize, f64)> = None;
        let mut consumed = false;

        for (offset, line) in lines[cursor..window_end].iter().enumerate() {
            let Some((index, score)) = matching::best_match(line, &question.answers) else {
                continue;
            };
            if score >= config.selector_advance {
                entries.push(AnswerKeyEntry {
                    question_id: question.id.clone(),
                    answer_index: index,
                });
                cursor += offset + 1;
                consumed = true;
                break;
            }
            if window_best.is_none_or(|(_, best)| score > best) {
                window_best = Some((index, score));
            }
        }
        if consumed {
            continue;
        }

        match window_best {
            Some((index, score)) if score >= config.selector_accept => {
                entries.push(AnswerKeyEntry {
                    question_id: question.id.clone(),
                    answer_index: index,
                });
            }
            _ => {
                tracing::debug!(id = %question.id, "no emphasized line matched");
                diagnostics.push(Diagnostic::warning(format!(
                    "no emphasized line matched question '{}'; no answer asserted",
                    question.id
                )));
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParsingConfigBuilder;

    fn question(id: &str, answers: &[&str]) -> Question {
        Question {
            id: id.to_string(),
            question: format!("Question {id}"),
            answers: answers.iter().map(|s| s.to_string()).collect(),
            correct_answer: None,
        }
    }

    fn run(
        excerpt: &str,
        questions: &[Question],
        config: &ParsingConfig,
    ) -> (Vec<AnswerKeyEntry>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let entries = match_emphasized(excerpt, questions, config, &mut diagnostics);
        (entries, diagnostics)
    }

    #[test]
    fn test_exact_match_selects_answer() {
        let config = ParsingConfig::default();
        let questions = vec![question("5", &["Lisbon", "Madrid", "Paris"])];
        let (entries, diagnostics) = run("Paris\n", &questions, &config);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].question_id, "5");
        assert_eq!(entries[0].answer_index, 2);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_cursor_advances_in_question_order() {
        let config = ParsingConfig::default();
        let questions = vec![
            question("1", &["apple", "banana"]),
            question("2", &["carrot", "daikon"]),
        ];
        // one emphasized line per question, in order
        let (entries, _) = run("banana\ncarrot\n", &questions, &config);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].answer_index, 1);
        assert_eq!(entries[1].answer_index, 0);
    }

    #[test]
    fn test_near_match_accepted_without_consuming() {
        let config = ParsingConfigBuilder::new()
            .selector_accept_threshold(0.75)
            .selector_advance_threshold(0.99)
            .build()
            .unwrap();
        let questions = vec![question("1", &["the mitochondria produce energy", "ribosomes"])];
        // close but not near-exact: accepted, cursor stays put
        let (entries, _) = run("the mitochondria produce the energy", &questions, &config);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].answer_index, 0);
    }

    #[test]
    fn test_unmatched_question_is_skipped_with_diagnostic() {
        let config = ParsingConfig::default();
        let questions = vec![question("3", &["alpha", "beta"])];
        let (entries, diagnostics) = run("completely unrelated emphasis\n", &questions, &config);
        assert!(entries.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("'3'"));
    }

    #[test]
    fn test_lookahead_window_bounds_the_scan() {
        let config = ParsingConfigBuilder::new()
            .selector_lookahead(2)
            .build()
            .unwrap();
        let questions = vec![question("1", &["target answer text", "other"])];
        // the matching line sits beyond the 2-line window
        let excerpt = "noise one\nnoise two\ntarget answer text\n";
        let (entries, diagnostics) = run(excerpt, &questions, &config);
        assert!(entries.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_forward_only_no_backtracking() {
        let config = ParsingConfig::default();
        let questions = vec![
            question("1", &["shared emphasized line", "x"]),
            question("2", &["shared emphasized line", "y"]),
        ];
        // a single near-exact line is consumed by question 1; question 2
        // has nothing left in its window
        let (entries, diagnostics) = run("shared emphasized line\n", &questions, &config);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].question_id, "1");
        assert_eq!(diagnostics.len(), 1);
    }
}
