use std::collections::HashMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

pub mod ids;
pub mod matching;

pub use ids::natural_cmp;

/// A single multiple-choice question.
///
/// `correct_answer` is a zero-based index into `answers`; `None` means no
/// answer key entry resolved for this question. Serialized field names are
/// the persisted-artifact contract consumed by downstream renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub answers: Vec<String>,
    pub correct_answer: Option<usize>,
}

/// A parsed quiz: question records keyed by case-insensitive id.
///
/// Insertion order is irrelevant; [`Quiz::iter_ordered`] and the `Serialize`
/// impl emit questions in natural (numeric-aware) id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quiz {
    questions: HashMap<String, Question>,
}

impl Quiz {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.questions.contains_key(&id.to_lowercase())
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.get(&id.to_lowercase())
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Question> {
        self.questions.get_mut(&id.to_lowercase())
    }

    /// Insert a question, keyed by its lowercased id. An existing entry with
    /// the same id is replaced; collision policy is the assembler's concern.
    pub fn insert(&mut self, mut question: Question) {
        question.id = question.id.to_lowercase();
        self.questions.insert(question.id.clone(), question);
    }

    /// Question ids in natural order.
    pub fn ids_ordered(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.questions.keys().map(String::as_str).collect();
        ids.sort_by(|a, b| natural_cmp(a, b));
        ids
    }

    /// Iterate questions in natural id order.
    pub fn iter_ordered(&self) -> impl Iterator<Item = &Question> {
        self.ids_ordered()
            .into_iter()
            .map(|id| &self.questions[id])
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl Serialize for Quiz {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.questions.len()))?;
        for question in self.iter_ordered() {
            map.serialize_entry(&question.id, question)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Quiz {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: HashMap<String, Question> = HashMap::deserialize(deserializer)?;
        let mut quiz = Quiz::new();
        for (_, question) in raw {
            quiz.insert(question);
        }
        Ok(quiz)
    }
}

/// A resolved (question id, answer index) pair from either the regex key
/// parser or the fuzzy selector matcher. The two streams are concatenated,
/// not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKeyEntry {
    pub question_id: String,
    pub answer_index: usize,
}

/// Severity of a parse diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// A structured parse diagnostic; callers choose their own log format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity.label(), self.message)
    }
}

/// Counters describing one document parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Question chunks produced by segmentation, before inference.
    pub raw_questions: usize,
    /// Questions that survived inference and landed in the quiz.
    pub parsed_questions: usize,
    pub too_few_answers: usize,
    pub answer_count_mismatch: usize,
    pub filled_answers: usize,
    pub key_entries: usize,
    pub selector_matched: usize,
    pub selector_skipped: usize,
    pub id_collisions: usize,
    pub orphan_key_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, text: &str, answers: &[&str]) -> Question {
        Question {
            id: id.to_string(),
            question: text.to_string(),
            answers: answers.iter().map(|s| s.to_string()).collect(),
            correct_answer: None,
        }
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut quiz = Quiz::new();
        quiz.insert(question("12A", "Q?", &["x", "y"]));
        assert!(quiz.contains("12a"));
        assert_eq!(quiz.get("12A").unwrap().id, "12a");
    }

    #[test]
    fn test_iter_ordered_is_natural() {
        let mut quiz = Quiz::new();
        for id in ["10", "2", "3.1", "3"] {
            quiz.insert(question(id, "Q?", &["x", "y"]));
        }
        let ids: Vec<&str> = quiz.iter_ordered().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "3.1", "10"]);
    }

    #[test]
    fn test_serialization_contract() {
        // The persisted shape: mapping keyed by id, values
        // {id, question, answers, correct_answer}, null for unresolved keys.
        let mut quiz = Quiz::new();
        quiz.insert(question("1", "What is 2+2?", &["3", "4", "5"]));

        let value = serde_json::to_value(&quiz).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "1": {
                    "id": "1",
                    "question": "What is 2+2?",
                    "answers": ["3", "4", "5"],
                    "correct_answer": null,
                }
            })
        );
    }

    #[test]
    fn test_serialization_orders_ids_naturally() {
        let mut quiz = Quiz::new();
        for id in ["10", "9", "1"] {
            quiz.insert(question(id, "Q?", &["x", "y"]));
        }
        let json = serde_json::to_string(&quiz).unwrap();
        let p1 = json.find("\"1\":").unwrap();
        let p9 = json.find("\"9\":").unwrap();
        let p10 = json.find("\"10\":").unwrap();
        assert!(p1 < p9 && p9 < p10);
    }

    #[test]
    fn test_round_trip() {
        let mut quiz = Quiz::new();
        let mut q = question("2", "Pick one", &["a", "b", "c"]);
        q.correct_answer = Some(1);
        quiz.insert(q);

        let json = serde_json::to_string(&quiz).unwrap();
        let back: Quiz = serde_json::from_str(&json).unwrap();
        assert_eq!(back, quiz);
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::warning("too few answers");
        assert_eq!(d.to_string(), "[WARNING] too few answers");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
