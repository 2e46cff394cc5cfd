//! Merging rule-evaluator output into a composed document and surfacing
//! priority items first.

use crate::types::{RecommendationDocument, RuleOutcome};

/// Marker that promotes a recommendation ahead of its section peers.
pub const PRIORITY_MARKER: &str = "PRIORITY";

/// Section that collects rule-evaluator recommendations.
pub const RULES_SECTION: &str = "rules";

/// Fold rule-evaluator output into the document, then stably partition
/// every section so `PRIORITY` entries come first. Relative order inside
/// each tier is preserved; this is a stable partition, not a sort by
/// comparator.
pub fn merge(mut document: RecommendationDocument, rules: &RuleOutcome) -> RecommendationDocument {
    if !rules.recommendations.is_empty() {
        let section = document
            .sections
            .entry(RULES_SECTION.to_string())
            .or_default();
        section.extend(rules.recommendations.iter().map(|r| r.message.clone()));
    }

    for recommendations in document.sections.values_mut() {
        prioritize(recommendations);
    }

    document
}

/// Stable partition: entries containing [`PRIORITY_MARKER`] move to the
/// front, both tiers keeping their original relative order.
fn prioritize(recommendations: &mut Vec<String>) {
    let (priority, rest): (Vec<String>, Vec<String>) = recommendations
        .drain(..)
        .partition(|r| r.contains(PRIORITY_MARKER));
    recommendations.extend(priority);
    recommendations.extend(rest);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RuleRecommendation;
    use std::collections::BTreeMap;

    fn document_with(section: &str, entries: &[&str]) -> RecommendationDocument {
        let mut sections = BTreeMap::new();
        sections.insert(
            section.to_string(),
            entries.iter().map(|e| e.to_string()).collect(),
        );
        RecommendationDocument {
            summary: "summary".to_string(),
            sections,
        }
    }

    fn rule(message: &str) -> RuleRecommendation {
        RuleRecommendation {
            message: message.to_string(),
            severity: None,
        }
    }

    #[test]
    fn priority_entries_surface_first_stably() {
        let document = document_with("controls", &["A", "PRIORITY: B", "C", "PRIORITY: D"]);

        let merged = merge(document, &RuleOutcome::default());

        assert_eq!(
            merged.sections["controls"],
            vec!["PRIORITY: B", "PRIORITY: D", "A", "C"]
        );
    }

    #[test]
    fn rule_messages_land_in_rules_section() {
        let document = document_with("governance", &["Name an owner"]);
        let rules = RuleOutcome {
            recommendations: vec![rule("Tag critical datasets"), rule("PRIORITY: Fix retention")],
            actions: vec![],
        };

        let merged = merge(document, &rules);

        assert_eq!(
            merged.sections[RULES_SECTION],
            vec!["PRIORITY: Fix retention", "Tag critical datasets"]
        );
        // Existing sections untouched apart from prioritization.
        assert_eq!(merged.sections["governance"], vec!["Name an owner"]);
    }

    #[test]
    fn empty_rule_outcome_creates_no_rules_section() {
        let document = document_with("governance", &["Name an owner"]);

        let merged = merge(document, &RuleOutcome::default());

        assert!(!merged.sections.contains_key(RULES_SECTION));
    }

    #[test]
    fn rules_append_to_existing_rules_section() {
        let document = document_with(RULES_SECTION, &["Existing note"]);
        let rules = RuleOutcome {
            recommendations: vec![rule("New note")],
            actions: vec![],
        };

        let merged = merge(document, &rules);

        assert_eq!(
            merged.sections[RULES_SECTION],
            vec!["Existing note", "New note"]
        );
    }
}
