//! Event notification sink.
//!
//! Rendering and reporting collaborators can observe generated results
//! without the engine depending on them. No sink registered means no
//! notification, which is a no-op rather than an error.

use govgauge_core::RecommendationResult;

/// Receives engine lifecycle events.
pub trait EventSink: Send + Sync {
    /// Called after a recommendation result is computed and cached.
    /// Not called on cache hits.
    fn recommendations_generated(&self, result: &RecommendationResult);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use parking_lot::Mutex;

    /// Records every event for assertions.
    #[derive(Default)]
    pub struct RecordingSink {
        pub seen: Mutex<Vec<String>>,
    }

    impl EventSink for RecordingSink {
        fn recommendations_generated(&self, result: &RecommendationResult) {
            self.seen.lock().push(result.assessment_id.clone());
        }
    }
}
