//! Recommendation document composition.
//!
//! Expands a selected template into a full document: a summary with
//! placeholder substitution and answer-derived insight sentences, plus
//! per-section recommendation lists extended by a fixed table of
//! contextual rules. The insight order and the rule table are
//! exhaustively enumerated; nothing here is generated.

use crate::types::{
    answer_keys, AnswerSet, Assessment, GovernanceLevel, RecommendationDocument, ScoreResult,
    Template,
};

/// Organization name used when the questionnaire did not capture one.
const FALLBACK_ORGANIZATION: &str = "Your organization";

/// Build the recommendation document for one assessment.
pub fn compose(
    assessment: &Assessment,
    score: &ScoreResult,
    level: GovernanceLevel,
    template: &Template,
) -> RecommendationDocument {
    let mut summary = base_summary(&assessment.answers, score, level, template);
    for insight in insights(&assessment.answers) {
        summary.push(' ');
        summary.push_str(&insight);
    }

    let mut sections = template.sections.clone();
    for (section, recommendations) in sections.iter_mut() {
        for rule in SECTION_RULES {
            if rule.section == section.as_str() && (rule.applies)(&assessment.answers) {
                recommendations.push(rule.text.to_string());
            }
        }
    }

    RecommendationDocument { summary, sections }
}

fn organization_name(answers: &AnswerSet) -> String {
    answers
        .get(answer_keys::ORGANIZATION_NAME)
        .and_then(|a| a.as_text())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_ORGANIZATION)
        .to_string()
}

fn base_summary(
    answers: &AnswerSet,
    score: &ScoreResult,
    level: GovernanceLevel,
    template: &Template,
) -> String {
    let organization = organization_name(answers);
    match &template.summary {
        Some(text) => text
            .replace("{organization}", &organization)
            .replace("{score}", &score.total_score.to_string())
            .replace("{max_score}", &score.max_score.to_string())
            .replace("{level}", level.as_str()),
        None => format!(
            "{organization} scored {} of {}, placing data governance maturity at the {} level.",
            score.total_score, score.max_score, level
        ),
    }
}

/// Insight sentences appended to the summary, in this fixed order:
/// compliance framework, organization size, declared maturity.
fn insights(answers: &AnswerSet) -> Vec<String> {
    let mut out = Vec::new();

    let frameworks = answers
        .get(answer_keys::COMPLIANCE_FRAMEWORKS)
        .and_then(|a| a.as_list())
        .unwrap_or(&[]);
    let regulated: Vec<&str> = frameworks
        .iter()
        .filter(|f| *f == "gdpr" || *f == "hipaa")
        .map(|f| f.as_str())
        .collect();
    if !regulated.is_empty() {
        out.push(format!(
            "Regulated frameworks in scope ({}) make documented controls and audit \
             evidence mandatory rather than aspirational.",
            regulated.join(", ").to_uppercase()
        ));
    }

    let size = answers
        .get(answer_keys::ORGANIZATION_SIZE)
        .and_then(|a| a.as_text());
    match size {
        Some("enterprise") => out.push(
            "At enterprise scale, federate governance responsibilities across business \
             units instead of centralizing every decision."
                .to_string(),
        ),
        Some("small") => out.push(
            "For a small team, fold governance duties into existing roles rather than \
             creating dedicated headcount."
                .to_string(),
        ),
        _ => {}
    }

    let maturity = answers
        .get(answer_keys::GOVERNANCE_MATURITY)
        .and_then(|a| a.as_text());
    match maturity {
        Some("basic") => out.push(
            "Since practices are still ad hoc, prioritize the foundational steps below \
             before investing in tooling."
                .to_string(),
        ),
        Some("managed") => out.push(
            "With managed practices in place, the next gains come from measurement and \
             continuous improvement."
                .to_string(),
        ),
        _ => {}
    }

    out
}

type SectionPredicate = fn(&AnswerSet) -> bool;

struct SectionRule {
    section: &'static str,
    applies: SectionPredicate,
    text: &'static str,
}

/// Contextual recommendations keyed by section name. Applied only to
/// sections the template actually defines.
const SECTION_RULES: &[SectionRule] = &[
    SectionRule {
        section: "controls",
        applies: has_open_access,
        text: "PRIORITY: Replace open data access with role-based permissions and \
               access reviews.",
    },
    SectionRule {
        section: "controls",
        applies: handles_sensitive_data,
        text: "Encrypt sensitive data at rest and in transit.",
    },
    SectionRule {
        section: "compliance",
        applies: subject_to_gdpr,
        text: "Maintain records of processing activities and a lawful-basis register \
               as required by GDPR.",
    },
    SectionRule {
        section: "compliance",
        applies: subject_to_hipaa,
        text: "Complete a HIPAA security risk assessment and document remediation.",
    },
    SectionRule {
        section: "governance",
        applies: declares_basic_maturity,
        text: "Convene a lightweight governance council before formalizing policy.",
    },
];

fn has_open_access(answers: &AnswerSet) -> bool {
    answers
        .get(answer_keys::DATA_ACCESS)
        .and_then(|a| a.as_text())
        .is_some_and(|access| access == "open")
}

fn handles_sensitive_data(answers: &AnswerSet) -> bool {
    answers
        .get(answer_keys::SENSITIVE_DATA)
        .and_then(|a| a.as_text())
        .is_some_and(|v| v == "yes")
}

fn subject_to_gdpr(answers: &AnswerSet) -> bool {
    framework_listed(answers, "gdpr")
}

fn subject_to_hipaa(answers: &AnswerSet) -> bool {
    framework_listed(answers, "hipaa")
}

fn framework_listed(answers: &AnswerSet, framework: &str) -> bool {
    answers
        .get(answer_keys::COMPLIANCE_FRAMEWORKS)
        .and_then(|a| a.as_list())
        .is_some_and(|list| list.iter().any(|f| f == framework))
}

fn declares_basic_maturity(answers: &AnswerSet) -> bool {
    answers
        .get(answer_keys::GOVERNANCE_MATURITY)
        .and_then(|a| a.as_text())
        .is_some_and(|m| m == "basic")
}
