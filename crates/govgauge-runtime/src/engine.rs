//! The recommendation engine.
//!
//! One engine instance owns its configuration snapshot, weight table,
//! and cache store; there are no process-wide singletons. The
//! generation pipeline is: cache lookup, score, level, template,
//! compose, external rules, merge, store, notify.
//!
//! Concurrency model: two concurrent requests for the same uncached
//! fingerprint may both compute; the computation is pure, so the last
//! cache write winning is duplicate work, not a correctness hazard.
//! No in-flight de-duplication is attempted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use thiserror::Error;

use govgauge_core::{
    compose, compute_score, governance_level, merge, select_template, Assessment, ConfigError,
    EngineConfig, RecommendationResult, RuleOutcome, ScoreResult, TemplateRef,
};

use crate::cache::{fingerprint, RecommendationCache};
use crate::events::EventSink;
use crate::rules::RuleEvaluator;

/// Errors surfaced to engine callers.
///
/// Rule-evaluator failures never appear here; they are absorbed into an
/// empty rule outcome.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Recommendation generation failed: {0}")]
    Generation(String),
}

/// The recommendation engine.
pub struct RecommendationEngine {
    /// Active configuration snapshot.
    config: RwLock<EngineConfig>,

    /// Bumped on every weight update so fingerprints of stale results
    /// stop matching even if the coarse cache clear raced a writer.
    weight_revision: AtomicU64,

    cache: RecommendationCache,

    /// Last known fingerprint per assessment id, for cached lookups by
    /// assessment.
    index: RwLock<HashMap<String, String>>,

    rule_evaluator: Option<Arc<dyn RuleEvaluator>>,

    event_sink: Option<Arc<dyn EventSink>>,
}

impl RecommendationEngine {
    /// Create an engine over a validated configuration snapshot.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: RwLock::new(config),
            weight_revision: AtomicU64::new(0),
            cache: RecommendationCache::default(),
            index: RwLock::new(HashMap::new()),
            rule_evaluator: None,
            event_sink: None,
        }
    }

    pub fn builder() -> RecommendationEngineBuilder {
        RecommendationEngineBuilder::new()
    }

    /// Generate (or fetch from cache) the recommendation result for an
    /// assessment.
    ///
    /// # Execution Flow
    /// 1. Fingerprint the input against the effective config version
    /// 2. Cache lookup; a hit returns immediately
    /// 3. Score, derive level, select template, compose document
    /// 4. Run the external rule evaluator (failures absorbed)
    /// 5. Merge and prioritize, store, notify the event sink
    pub async fn generate_recommendations(
        &self,
        assessment: &Assessment,
    ) -> Result<RecommendationResult, EngineError> {
        let (config, version) = {
            let config = self.config.read();
            (config.clone(), self.effective_version(&config))
        };

        if config.questions.is_empty() {
            return Err(EngineError::Generation(
                "configuration defines no questions".to_string(),
            ));
        }

        let key = fingerprint(assessment, &version);

        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(assessment = %assessment.id, fingerprint = %key, "Cache hit");
            self.index
                .write()
                .insert(assessment.id.clone(), key);
            return Ok(hit);
        }
        tracing::debug!(assessment = %assessment.id, fingerprint = %key, "Cache miss, computing");

        let score = compute_score(
            &config.questions,
            &assessment.answers,
            &config.scoring_weights,
        );
        let level = governance_level(score.total_score);
        let template = select_template(&assessment.answers, &score, &config.templates);
        let document = compose(assessment, &score, level, &template);

        let rules = self.apply_rules(assessment).await;
        let document = merge(document, &rules);

        let result = RecommendationResult {
            id: format!("rec-{key}"),
            assessment_id: assessment.id.clone(),
            score: score.total_score,
            max_score: score.max_score,
            percentage: overall_percentage(&score),
            level,
            template: TemplateRef::from(&template),
            recommendations: document,
            score_breakdown: score.breakdown,
            generated_at: Utc::now(),
        };

        self.cache.insert(key.clone(), result.clone()).await;
        self.index.write().insert(assessment.id.clone(), key);

        if let Some(sink) = &self.event_sink {
            sink.recommendations_generated(&result);
        }

        Ok(result)
    }

    /// Run the external rule evaluator, absorbing absence and failure
    /// into an empty outcome.
    async fn apply_rules(&self, assessment: &Assessment) -> RuleOutcome {
        let Some(evaluator) = &self.rule_evaluator else {
            return RuleOutcome::default();
        };

        match evaluator.evaluate(&assessment.answers, &assessment.id).await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(
                    evaluator = evaluator.name(),
                    assessment = %assessment.id,
                    error = %error,
                    "Rule evaluation failed, continuing without rule output"
                );
                RuleOutcome::default()
            }
        }
    }

    /// Merge partial weight updates into the weight table. The merged
    /// table passes the same validation the configuration loader runs;
    /// a rejected update leaves weights and cache untouched. Any
    /// committed change invalidates the entire cache, coarsely.
    pub fn update_scoring_weights(
        &self,
        partial: impl IntoIterator<Item = (String, f64)>,
    ) -> Result<(), EngineError> {
        {
            let mut config = self.config.write();
            let mut merged = config.clone();
            for (category, weight) in partial {
                merged.scoring_weights.insert(category, weight);
            }
            merged.validate()?;
            *config = merged;
        }
        self.weight_revision.fetch_add(1, Ordering::SeqCst);
        self.clear_cache();
        tracing::debug!("Scoring weights updated, cache cleared");
        Ok(())
    }

    /// Replace the whole configuration snapshot, e.g. after the
    /// configuration provider published a new version.
    pub fn replace_config(&self, config: EngineConfig) -> Result<(), EngineError> {
        config.validate()?;
        *self.config.write() = config;
        self.clear_cache();
        Ok(())
    }

    /// Drop all cached results.
    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
        self.index.write().clear();
    }

    /// Last cached result for an assessment id, if its fingerprint is
    /// still current.
    pub async fn cached_recommendation(
        &self,
        assessment_id: &str,
    ) -> Option<RecommendationResult> {
        let key = self.index.read().get(assessment_id).cloned()?;
        self.cache.get(&key).await
    }

    pub fn cache_entries(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Config version with the weight revision folded in, so weight
    /// edits change every fingerprint.
    fn effective_version(&self, config: &EngineConfig) -> String {
        format!(
            "{}+w{}",
            config.version,
            self.weight_revision.load(Ordering::SeqCst)
        )
    }
}

fn overall_percentage(score: &ScoreResult) -> i64 {
    if score.max_score > 0 {
        ((score.total_score as f64) / (score.max_score as f64) * 100.0).round() as i64
    } else {
        0
    }
}

/// Builder for [`RecommendationEngine`].
pub struct RecommendationEngineBuilder {
    config: Option<EngineConfig>,
    cache: Option<RecommendationCache>,
    rule_evaluator: Option<Arc<dyn RuleEvaluator>>,
    event_sink: Option<Arc<dyn EventSink>>,
}

impl RecommendationEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            cache: None,
            rule_evaluator: None,
            event_sink: None,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn cache(mut self, cache: RecommendationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn rule_evaluator(mut self, evaluator: Arc<dyn RuleEvaluator>) -> Self {
        self.rule_evaluator = Some(evaluator);
        self
    }

    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<RecommendationEngine, EngineError> {
        let config = self
            .config
            .ok_or_else(|| EngineError::Generation("no configuration set".to_string()))?;
        config.validate()?;

        let mut engine = RecommendationEngine::new(config);
        if let Some(cache) = self.cache {
            engine.cache = cache;
        }
        engine.rule_evaluator = self.rule_evaluator;
        engine.event_sink = self.event_sink;
        Ok(engine)
    }
}

impl Default for RecommendationEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
