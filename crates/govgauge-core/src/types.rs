//! Core data model for assessments, scoring, and recommendations.
//!
//! All collections that feed fingerprinting or document assembly use
//! `BTreeMap` so iteration order is deterministic.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Well-known answer keys consulted by the template selector and the
/// recommendation composer.
pub mod answer_keys {
    pub const ORGANIZATION_NAME: &str = "organization-name";
    pub const ORGANIZATION_SIZE: &str = "organization-size";
    pub const SENSITIVE_DATA: &str = "sensitive-data";
    pub const COMPLIANCE_FRAMEWORKS: &str = "compliance-frameworks";
    pub const GOVERNANCE_MATURITY: &str = "governance-maturity";
    pub const DATA_ACCESS: &str = "data-access";
}

/// One selectable option of a single- or multi-select question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionOption {
    /// Value stored in the answer set when this option is chosen.
    pub value: String,

    /// Display label (falls back to `value` in UI layers).
    #[serde(default)]
    pub label: Option<String>,

    /// Score contributed when this option is selected.
    pub score: f64,
}

/// Type-specific shape of a question.
///
/// The `Unknown` variant absorbs unrecognized type tags from newer
/// configurations; unknown questions score 0 and contribute 0 to the
/// maximum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    SingleSelect {
        #[serde(default)]
        options: Vec<QuestionOption>,
    },
    MultiSelect {
        #[serde(default)]
        options: Vec<QuestionOption>,
    },
    RatingScale {
        /// Number of points on the scale; valid answers are 1..=scale.
        scale: u32,
    },
    NumberInput {
        min: f64,
        max: f64,
    },
    TextInput,
    #[serde(other)]
    Unknown,
}

fn default_weight() -> f64 {
    1.0
}

fn default_category() -> String {
    "general".to_string()
}

/// A single questionnaire question. Immutable once loaded into the
/// active configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    /// Unique identifier, also the answer-set key.
    pub id: String,

    /// Category tag grouping questions for weighted scoring.
    #[serde(default = "default_category")]
    pub category: String,

    /// Question text shown to the respondent.
    pub prompt: String,

    #[serde(flatten)]
    pub kind: QuestionKind,

    /// Scoring weight, strictly positive.
    #[serde(default = "default_weight")]
    pub weight: f64,

    #[serde(default)]
    pub required: bool,
}

/// An answer value; its shape depends on the question type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Many(Vec<String>),
    Text(String),
}

impl AnswerValue {
    /// The answer as free text, if it is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The answer as a number. Numeric strings parse; anything else is
    /// `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            AnswerValue::Text(s) => s.trim().parse().ok(),
            AnswerValue::Many(_) => None,
        }
    }

    /// The answer as a selection list, if it is one.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AnswerValue::Many(values) => Some(values),
            _ => None,
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(values: Vec<&str>) -> Self {
        AnswerValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Mapping from question id to answer value.
pub type AnswerSet = BTreeMap<String, AnswerValue>;

/// One questionnaire instance with its answer set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assessment {
    pub id: String,

    #[serde(default)]
    pub answers: AnswerSet,
}

impl Assessment {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            answers: AnswerSet::new(),
        }
    }

    /// Set or replace an answer. Entries are always replaced whole;
    /// nested structures are never mutated in place.
    pub fn set_answer(&mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) {
        self.answers.insert(question_id.into(), value.into());
    }

    pub fn remove_answer(&mut self, question_id: &str) -> Option<AnswerValue> {
        self.answers.remove(question_id)
    }
}

/// Per-category scoring breakdown. Derived, recomputed on every call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryScore {
    pub raw_score: f64,
    pub max_score: f64,
    /// `round(raw / max * 100)`, 0 when max is 0.
    pub percentage: i64,
    pub weight: f64,
}

/// Weighted total score with per-category breakdown.
///
/// Totals follow rounding-per-step semantics: each category's weighted
/// contribution is summed as a float and rounded once at the end, so
/// `total_score <= max_score` is not an algebraic guarantee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreResult {
    pub total_score: i64,
    pub max_score: i64,
    pub breakdown: BTreeMap<String, CategoryScore>,
}

/// Coarse maturity tier derived from the total score against a fixed
/// 100-point assumption (not the dynamically computed max).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GovernanceLevel {
    Basic,
    Developing,
    Medium,
    High,
}

impl GovernanceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GovernanceLevel::Basic => "basic",
            GovernanceLevel::Developing => "developing",
            GovernanceLevel::Medium => "medium",
            GovernanceLevel::High => "high",
        }
    }
}

impl std::fmt::Display for GovernanceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named bundle of base recommendation text per section. Read-only to
/// the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Template {
    pub id: String,

    pub name: String,

    /// Summary text; `{organization}`, `{score}`, `{max_score}` and
    /// `{level}` placeholders are substituted at composition time.
    #[serde(default)]
    pub summary: Option<String>,

    /// Section name mapped to base recommendations for that section.
    #[serde(default)]
    pub sections: BTreeMap<String, Vec<String>>,
}

/// Lightweight reference to the template a result was built from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateRef {
    pub id: String,
    pub name: String,
}

impl From<&Template> for TemplateRef {
    fn from(template: &Template) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
        }
    }
}

/// The composed recommendation document: one summary plus ordered
/// recommendation lists per section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationDocument {
    pub summary: String,

    #[serde(default)]
    pub sections: BTreeMap<String, Vec<String>>,
}

/// A recommendation emitted by the external rule evaluator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleRecommendation {
    pub message: String,

    #[serde(default)]
    pub severity: Option<String>,
}

/// A follow-up action emitted by the external rule evaluator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleAction {
    pub description: String,

    #[serde(default)]
    pub owner: Option<String>,
}

/// Output of the external rule evaluator. An absent or failed evaluator
/// contributes the default (empty) outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RuleOutcome {
    #[serde(default)]
    pub recommendations: Vec<RuleRecommendation>,

    #[serde(default)]
    pub actions: Vec<RuleAction>,
}

impl RuleOutcome {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty() && self.actions.is_empty()
    }
}

/// The final engine output for one assessment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResult {
    /// Stable result identifier derived from the input fingerprint.
    pub id: String,

    pub assessment_id: String,

    pub score: i64,
    pub max_score: i64,
    /// `round(score / max_score * 100)`, 0 when max is 0.
    pub percentage: i64,

    pub level: GovernanceLevel,

    pub template: TemplateRef,

    pub recommendations: RecommendationDocument,

    pub score_breakdown: BTreeMap<String, CategoryScore>,

    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_parses_with_flattened_kind() {
        let yaml = r#"
id: "backup-policy"
category: "controls"
prompt: "Do you maintain tested backups?"
type: "single-select"
options:
  - value: "yes"
    score: 10
  - value: "no"
    score: 0
weight: 2
required: true
"#;
        let question: Question = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(question.category, "controls");
        assert_eq!(question.weight, 2.0);
        match &question.kind {
            QuestionKind::SingleSelect { options } => assert_eq!(options.len(), 2),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn question_defaults_apply() {
        let yaml = r#"
id: "notes"
prompt: "Anything else?"
type: "text-input"
"#;
        let question: Question = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(question.category, "general");
        assert_eq!(question.weight, 1.0);
        assert!(!question.required);
    }

    #[test]
    fn unknown_question_type_is_absorbed() {
        let yaml = r#"
id: "future"
prompt: "From a newer schema"
type: "matrix-grid"
"#;
        let question: Question = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(question.kind, QuestionKind::Unknown);
    }

    #[test]
    fn answer_value_untagged_shapes() {
        let number: AnswerValue = serde_json::from_str("4").unwrap();
        assert_eq!(number.as_number(), Some(4.0));

        let list: AnswerValue = serde_json::from_str(r#"["gdpr", "hipaa"]"#).unwrap();
        assert_eq!(list.as_list().map(<[String]>::len), Some(2));

        let text: AnswerValue = serde_json::from_str(r#""5""#).unwrap();
        assert_eq!(text.as_text(), Some("5"));
        assert_eq!(text.as_number(), Some(5.0));
    }

    #[test]
    fn set_answer_replaces_whole_entry() {
        let mut assessment = Assessment::new("a-1");
        assessment.set_answer("frameworks", vec!["gdpr"]);
        assessment.set_answer("frameworks", vec!["gdpr", "hipaa"]);

        let stored = assessment.answers.get("frameworks").unwrap();
        assert_eq!(stored.as_list().map(<[String]>::len), Some(2));
    }
}
