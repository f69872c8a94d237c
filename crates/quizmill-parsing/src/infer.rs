use quizmill_core::{Diagnostic, ParseStats, Question};

use crate::config::{ParseMode, ParsingConfig};
use crate::segment::RawBlock;

/// The answer letter expected at answer position `n` (`a`, `b`, `c`, …).
/// `None` past `z`; more than 26 answers per question is unsupported.
fn expected_letter(n: usize) -> Option<char> {
    if n < 26 { Some((b'a' + n as u8) as char) } else { None }
}

/// The merge-vs-new-block decision: does `block` continue the previous
/// block instead of starting a new answer?
///
/// A block with no explicit id, or whose single-letter id is not the next
/// expected letter in sequence, is a continuation (line-wrapped answer text
/// whose first word happened to look like a marker). `answers_so_far` is the
/// number of answers already accepted.
pub(crate) fn continues_previous(block: &RawBlock, answers_so_far: usize) -> bool {
    let Some(id) = &block.id else { return true };

    let mut chars = id.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => {
            expected_letter(answers_so_far) != Some(letter.to_ascii_lowercase())
        }
        // ids that are not a single letter never came from an answer marker;
        // let them through and re-letter positionally
        _ => false,
    }
}

fn join_into(target: &mut RawBlock, fragment: &RawBlock) {
    if !target.body.is_empty() {
        target.body.push(' ');
    }
    target.body.push_str(fragment.raw.trim());
}

/// Merge and repair the raw blocks of one question, applying the
/// expected-answer-count policy.
///
/// Returns `None` (with a diagnostic) when the block is rejected: fewer than
/// two answers survive, or the count mismatches expectations and
/// `skip_on_error` is set. Answer order is always source discovery order;
/// re-lettering never reorders content.
pub fn infer_blocks(
    blocks: Vec<RawBlock>,
    config: &ParsingConfig,
    diagnostics: &mut Vec<Diagnostic>,
    stats: &mut ParseStats,
) -> Option<Question> {
    let mut iter = blocks.into_iter();
    let mut question = iter.next()?;
    let id = question.id.clone()?;

    let mut answers: Vec<RawBlock> = Vec::new();
    let structured = config.mode() == ParseMode::Auto;
    for block in iter {
        if structured && config.infer_question && continues_previous(&block, answers.len()) {
            let target = answers.last_mut().unwrap_or(&mut question);
            join_into(target, &block);
        } else {
            answers.push(block);
        }
    }

    if answers.len() < 2 {
        tracing::debug!(id = %id, found = answers.len(), "dropping question: too few answers");
        diagnostics.push(Diagnostic::warning(format!(
            "question '{id}': fewer than two answers found; skipping"
        )));
        stats.too_few_answers += 1;
        return None;
    }

    if let Some(expected) = config.expected_answers {
        if answers.len() > expected {
            diagnostics.push(Diagnostic::warning(format!(
                "question '{id}': {} answers found / {expected} expected",
                answers.len()
            )));
            stats.answer_count_mismatch += 1;
            if config.skip_on_error {
                return None;
            }
        } else if answers.len() < expected {
            if let Some(filler) = &config.fill_missing_answers {
                let missing = expected - answers.len();
                diagnostics.push(Diagnostic::warning(format!(
                    "question '{id}': synthesized {missing} missing answer(s)"
                )));
                stats.filled_answers += missing;
                for _ in 0..missing {
                    answers.push(RawBlock {
                        id: None,
                        body: filler.clone(),
                        raw: filler.clone(),
                    });
                }
            } else {
                diagnostics.push(Diagnostic::warning(format!(
                    "question '{id}': {} answers found / {expected} expected",
                    answers.len()
                )));
                stats.answer_count_mismatch += 1;
                if config.skip_on_error {
                    return None;
                }
            }
        }
    }

    Some(Question {
        id,
        question: question.body,
        answers: answers.into_iter().map(|block| block.body).collect(),
        correct_answer: None,
    })
}
