use std::collections::HashSet;

use quizmill_core::{AnswerKeyEntry, Diagnostic, ParseStats, Question, Quiz, natural_cmp};

/// Merge finalized questions and resolved answer-key entries into a quiz.
///
/// Duplicate ids keep the first occurrence; entries without a matching
/// question are reported as orphaned; entries pointing past a question's
/// answer count are discarded so that `correct_answer` stays in bounds.
/// When entry and question counts differ, both symmetric-difference id sets
/// are reported for diagnosis.
pub fn build_quiz(
    questions: Vec<Question>,
    entries: &[AnswerKeyEntry],
    diagnostics: &mut Vec<Diagnostic>,
    stats: &mut ParseStats,
) -> Quiz {
    let mut quiz = Quiz::new();

    for question in questions {
        if quiz.contains(&question.id) {
            tracing::warn!(id = %question.id, "duplicate question id");
            diagnostics.push(Diagnostic::warning(format!(
                "duplicate question id '{}'; keeping the first occurrence",
                question.id
            )));
            stats.id_collisions += 1;
            continue;
        }
        quiz.insert(question);
    }

    let mut resolved: HashSet<String> = HashSet::new();
    for entry in entries {
        let id = entry.question_id.to_lowercase();
        match quiz.get_mut(&id) {
            Some(question) => {
                if entry.answer_index >= question.answers.len() {
                    diagnostics.push(Diagnostic::warning(format!(
                        "answer key for '{id}' points at answer {} but the question \
                         has {}; discarded",
                        entry.answer_index + 1,
                        question.answers.len()
                    )));
                    stats.orphan_key_entries += 1;
                    continue;
                }
                question.correct_answer = Some(entry.answer_index);
                resolved.insert(id);
            }
            None => {
                tracing::warn!(id = %id, "missing question for answer key entry");
                diagnostics.push(Diagnostic::warning(format!(
                    "missing question for answer key entry '{id}'"
                )));
                stats.orphan_key_entries += 1;
            }
        }
    }

    if !entries.is_empty() && entries.len() != quiz.len() {
        diagnostics.push(Diagnostic::warning(format!(
            "the number of questions ({}) and answer key entries ({}) do not match",
            quiz.len(),
            entries.len()
        )));

        // ids_ordered is already naturally sorted
        let unanswered: Vec<&str> = quiz
            .ids_ordered()
            .into_iter()
            .filter(|id| !resolved.contains(*id))
            .collect();

        let mut orphaned: Vec<String> = entries
            .iter()
            .map(|e| e.question_id.to_lowercase())
            .filter(|id| !quiz.contains(id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        orphaned.sort_by(|a, b| natural_cmp(a, b));

        if !unanswered.is_empty() {
            diagnostics.push(Diagnostic::info(format!(
                "questions with no key entry: {}",
                unanswered.join(", ")
            )));
        }
        if !orphaned.is_empty() {
            diagnostics.push(Diagnostic::info(format!(
                "key entries with no matching question: {}",
                orphaned.join(", ")
            )));
        }
    }

    quiz
}
