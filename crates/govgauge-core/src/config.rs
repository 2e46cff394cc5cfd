//! Engine configuration parsing from YAML/JSON.
//!
//! A configuration bundles the active questions, the recommendation
//! templates, the per-category scoring weights, and a version token that
//! must change whenever any of those are edited.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Question, QuestionKind, Template};

/// Weight applied to a category that has no configured entry.
pub const DEFAULT_CATEGORY_WEIGHT: f64 = 0.1;

/// Errors that can occur when loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration validation failed: {0}")]
    Validation(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// The engine's configuration snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Version token; any edit to questions, templates, or weights must
    /// come with a new token so cached results are not reused.
    pub version: String,

    #[serde(default)]
    pub questions: Vec<Question>,

    #[serde(default)]
    pub templates: Vec<Template>,

    /// Category name mapped to its scoring weight.
    #[serde(default)]
    pub scoring_weights: BTreeMap<String, f64>,
}

impl EngineConfig {
    /// Parse a configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_yaml(&contents)?;
        tracing::debug!(
            version = %config.version,
            questions = config.questions.len(),
            templates = config.templates.len(),
            "Loaded engine configuration"
        );
        Ok(config)
    }

    /// Parse a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        tracing::debug!(
            version = %config.version,
            questions = config.questions.len(),
            templates = config.templates.len(),
            "Loaded engine configuration"
        );
        Ok(config)
    }

    /// Validate structural invariants of the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version.is_empty() {
            return Err(ConfigError::MissingField("version".to_string()));
        }

        self.validate_unique_question_ids()?;
        self.validate_unique_template_ids()?;

        for question in &self.questions {
            if question.id.is_empty() {
                return Err(ConfigError::MissingField("question.id".to_string()));
            }
            if question.weight <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "Question {} has non-positive weight {}",
                    question.id, question.weight
                )));
            }
            match &question.kind {
                QuestionKind::SingleSelect { options } | QuestionKind::MultiSelect { options } => {
                    // A negative option score would drop below the zero
                    // floor the per-question maximum is computed against.
                    if let Some(bad) = options.iter().find(|o| o.score < 0.0) {
                        return Err(ConfigError::Validation(format!(
                            "Question {} option {} has negative score {}",
                            question.id, bad.value, bad.score
                        )));
                    }
                }
                QuestionKind::RatingScale { scale } if *scale < 1 => {
                    return Err(ConfigError::Validation(format!(
                        "Question {} has a zero-point rating scale",
                        question.id
                    )));
                }
                QuestionKind::NumberInput { min, max } if min >= max => {
                    return Err(ConfigError::Validation(format!(
                        "Question {} has an empty numeric range [{min}, {max}]",
                        question.id
                    )));
                }
                _ => {}
            }
        }

        for (category, weight) in &self.scoring_weights {
            if *weight < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "Category {category} has negative weight {weight}"
                )));
            }
        }

        Ok(())
    }

    fn validate_unique_question_ids(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for question in &self.questions {
            if !seen.insert(&question.id) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate question ID: {}",
                    question.id
                )));
            }
        }
        Ok(())
    }

    fn validate_unique_template_ids(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for template in &self.templates {
            if !seen.insert(&template.id) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate template ID: {}",
                    template.id
                )));
            }
        }
        Ok(())
    }

    /// Look up a template by id.
    pub fn template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Look up a question by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Scoring weight for a category, falling back to
    /// [`DEFAULT_CATEGORY_WEIGHT`] when the category is unrecognized.
    pub fn category_weight(&self, category: &str) -> f64 {
        self.scoring_weights
            .get(category)
            .copied()
            .unwrap_or(DEFAULT_CATEGORY_WEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CONFIG: &str = r#"
version: "2026-01"
questions:
  - id: "classification"
    category: "governance"
    prompt: "Is data classified by sensitivity?"
    type: "single-select"
    options:
      - value: "yes"
        score: 10
      - value: "partially"
        score: 5
      - value: "no"
        score: 0
templates:
  - id: "basic"
    name: "Basic Governance"
    sections:
      governance:
        - "Establish a data governance charter"
scoring_weights:
  governance: 0.3
"#;

    #[test]
    fn parse_valid_config() {
        let config = EngineConfig::from_yaml(VALID_CONFIG).unwrap();
        assert_eq!(config.version, "2026-01");
        assert_eq!(config.questions.len(), 1);
        assert!(config.template("basic").is_some());
    }

    #[test]
    fn missing_version_rejected() {
        let yaml = r#"
version: ""
questions: []
"#;
        let result = EngineConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn duplicate_question_ids_rejected() {
        let yaml = r#"
version: "v1"
questions:
  - id: "q1"
    prompt: "First"
    type: "text-input"
  - id: "q1"
    prompt: "Second"
    type: "text-input"
"#;
        let result = EngineConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn non_positive_weight_rejected() {
        let yaml = r#"
version: "v1"
questions:
  - id: "q1"
    prompt: "Weighted"
    type: "text-input"
    weight: 0
"#;
        let result = EngineConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn negative_option_score_rejected() {
        let yaml = r#"
version: "v1"
questions:
  - id: "q1"
    prompt: "Penalized"
    type: "single-select"
    options:
      - value: "yes"
        score: 10
      - value: "no"
        score: -5
"#;
        let result = EngineConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_numeric_range_rejected() {
        let yaml = r#"
version: "v1"
questions:
  - id: "q1"
    prompt: "Range"
    type: "number-input"
    min: 10
    max: 10
"#;
        let result = EngineConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn unknown_category_gets_default_weight() {
        let config = EngineConfig::from_yaml(VALID_CONFIG).unwrap();
        assert_eq!(config.category_weight("governance"), 0.3);
        assert_eq!(config.category_weight("mystery"), DEFAULT_CATEGORY_WEIGHT);
    }
}
