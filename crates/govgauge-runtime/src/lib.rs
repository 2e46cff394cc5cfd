//! # govgauge-runtime
//!
//! Cached, async recommendation engine on top of `govgauge-core`.
//!
//! The core crate is pure and synchronous; this crate adds everything
//! that touches the outside world:
//! - content-addressed caching of results (at most one computation per
//!   unique assessment/answers/config-version combination)
//! - the external rule-evaluator boundary, with failures absorbed
//! - event notification for downstream reporting collaborators
//! - scoring-weight updates with coarse cache invalidation
//!
//! ## Example
//!
//! ```rust,ignore
//! use govgauge_core::{Assessment, EngineConfig};
//! use govgauge_runtime::RecommendationEngine;
//!
//! let config = EngineConfig::from_yaml_file("questionnaire.yaml")?;
//! let engine = RecommendationEngine::builder().config(config).build()?;
//!
//! let mut assessment = Assessment::new("acme-2026");
//! assessment.set_answer("maturity-rating", "4");
//!
//! let result = engine.generate_recommendations(&assessment).await?;
//! println!("{}: {}", result.level, result.recommendations.summary);
//! ```

pub mod cache;
pub mod engine;
pub mod events;
pub mod rules;

pub use cache::{fingerprint, RecommendationCache};
pub use engine::{EngineError, RecommendationEngine, RecommendationEngineBuilder};
pub use events::EventSink;
pub use rules::{RuleError, RuleEvaluator};
