//! Template selection and governance-level derivation.
//!
//! Selection is an ordered list of (predicate, template id) pairs
//! evaluated top to bottom with first-match semantics. The order encodes
//! product intent and is not a scored ranking. A matched id that is
//! missing from the loaded template set falls through to the next rule;
//! if nothing resolves, a built-in default keeps the engine total.

use std::collections::BTreeMap;

use crate::types::{answer_keys, AnswerSet, GovernanceLevel, ScoreResult, Template};

/// Derive the governance level from the total score.
///
/// Thresholds are relative to a fixed 100-point assumption, not the
/// dynamically computed max score. Intentional; see the configuration
/// docs before changing.
pub fn governance_level(total_score: i64) -> GovernanceLevel {
    if total_score >= 80 {
        GovernanceLevel::High
    } else if total_score >= 60 {
        GovernanceLevel::Medium
    } else if total_score >= 40 {
        GovernanceLevel::Developing
    } else {
        GovernanceLevel::Basic
    }
}

type SelectionPredicate = fn(&AnswerSet, &ScoreResult) -> bool;

struct SelectionRule {
    template_id: &'static str,
    applies: SelectionPredicate,
}

/// Evaluated top to bottom; the final rule always applies.
const SELECTION_RULES: &[SelectionRule] = &[
    SelectionRule {
        template_id: "high-security",
        applies: handles_regulated_data,
    },
    SelectionRule {
        template_id: "simplified",
        applies: is_small_organization,
    },
    SelectionRule {
        template_id: "advanced",
        applies: has_established_maturity,
    },
    SelectionRule {
        template_id: "basic",
        applies: |_, _| true,
    },
];

fn handles_regulated_data(answers: &AnswerSet, _score: &ScoreResult) -> bool {
    let sensitive = answers
        .get(answer_keys::SENSITIVE_DATA)
        .and_then(|a| a.as_text())
        .is_some_and(|text| text == "yes");
    let regulated = answers
        .get(answer_keys::COMPLIANCE_FRAMEWORKS)
        .and_then(|a| a.as_list())
        .is_some_and(|frameworks| !frameworks.is_empty());
    sensitive || regulated
}

fn is_small_organization(answers: &AnswerSet, _score: &ScoreResult) -> bool {
    answers
        .get(answer_keys::ORGANIZATION_SIZE)
        .and_then(|a| a.as_text())
        .is_some_and(|size| size == "small")
}

fn has_established_maturity(answers: &AnswerSet, _score: &ScoreResult) -> bool {
    answers
        .get(answer_keys::GOVERNANCE_MATURITY)
        .and_then(|a| a.as_text())
        .is_some_and(|maturity| maturity == "defined" || maturity == "managed")
}

/// Pick the recommendation template for an answer set.
pub fn select_template(
    answers: &AnswerSet,
    score: &ScoreResult,
    templates: &[Template],
) -> Template {
    for rule in SELECTION_RULES {
        if !(rule.applies)(answers, score) {
            continue;
        }
        if let Some(template) = templates.iter().find(|t| t.id == rule.template_id) {
            return template.clone();
        }
        // Matched id not loaded; fall through to the next rule.
    }
    default_template()
}

/// Built-in fallback used when the configuration resolves no template at
/// all. The engine must always produce some recommendation document.
pub fn default_template() -> Template {
    let mut sections = BTreeMap::new();
    sections.insert(
        "governance".to_string(),
        vec![
            "Assign an accountable owner for data governance".to_string(),
            "Document how data is collected, stored, and shared".to_string(),
        ],
    );
    sections.insert(
        "controls".to_string(),
        vec!["Review who can access sensitive data and why".to_string()],
    );
    sections.insert(
        "compliance".to_string(),
        vec!["Identify which regulations apply to your data".to_string()],
    );
    Template {
        id: "default".to_string(),
        name: "Baseline Recommendations".to_string(),
        summary: None,
        sections,
    }
}
