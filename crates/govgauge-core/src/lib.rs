//! # govgauge-core
//!
//! Deterministic data-governance maturity scoring and recommendation
//! composition.
//!
//! This crate turns a questionnaire configuration and an answer set into
//! a weighted maturity score, a governance level, a selected
//! recommendation template, and a composed recommendation document.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same configuration and answers always produce
//!    the same score and document
//! 2. **Total**: Malformed answers, unknown question types, and missing
//!    templates degrade to zero scores or built-in fallbacks, never
//!    errors
//! 3. **No I/O**: Beyond configuration file loading, everything here is
//!    pure computation; caching and external rule evaluation live in
//!    `govgauge-runtime`
//!
//! ## Example
//!
//! ```rust,ignore
//! use govgauge_core::{compute_score, governance_level, select_template, compose, EngineConfig};
//!
//! let config = EngineConfig::from_yaml_file("questionnaire.yaml")?;
//! let score = compute_score(&config.questions, &assessment.answers, &config.scoring_weights);
//! let level = governance_level(score.total_score);
//! let template = select_template(&assessment.answers, &score, &config.templates);
//! let document = compose(&assessment, &score, level, &template);
//! ```

pub mod composer;
pub mod config;
pub mod merge;
pub mod scoring;
pub mod selector;
pub mod types;

// Re-export main types and operations at crate root
pub use composer::compose;
pub use config::{ConfigError, EngineConfig, DEFAULT_CATEGORY_WEIGHT};
pub use merge::{merge, PRIORITY_MARKER, RULES_SECTION};
pub use scoring::compute_score;
pub use selector::{default_template, governance_level, select_template};
pub use types::{
    answer_keys, AnswerSet, AnswerValue, Assessment, CategoryScore, GovernanceLevel, Question,
    QuestionKind, QuestionOption, RecommendationDocument, RecommendationResult, RuleAction,
    RuleOutcome, RuleRecommendation, ScoreResult, Template, TemplateRef,
};
