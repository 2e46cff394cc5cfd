//! Weighted maturity scoring.
//!
//! Scores are computed per question via a type dispatch, accumulated per
//! category, then weighted and rounded into a total. Rounding happens at
//! the documented steps (per rating/number answer, per category
//! percentage, once per total); the steps are not algebraically
//! equivalent to a single expression and must stay separate.

use std::collections::BTreeMap;

use crate::config::DEFAULT_CATEGORY_WEIGHT;
use crate::types::{AnswerSet, AnswerValue, CategoryScore, Question, QuestionKind, ScoreResult};

/// Compute the weighted score for one answer set.
///
/// Unanswered questions (required or not) contribute 0 to the raw score
/// but their maximum still counts, so incomplete assessments read as
/// lower percentages rather than as errors.
pub fn compute_score(
    questions: &[Question],
    answers: &AnswerSet,
    weights: &BTreeMap<String, f64>,
) -> ScoreResult {
    let mut by_category: BTreeMap<&str, Vec<&Question>> = BTreeMap::new();
    for question in questions {
        by_category
            .entry(question.category.as_str())
            .or_default()
            .push(question);
    }

    let mut breakdown = BTreeMap::new();
    let mut weighted_total = 0.0;
    let mut weighted_max = 0.0;

    for (category, members) in by_category {
        let mut raw = 0.0;
        let mut max = 0.0;

        for question in members {
            if let Some(answer) = answers.get(&question.id) {
                raw += question_score(&question.kind, answer) * question.weight;
            }
            max += question_max(&question.kind) * question.weight;
        }

        let percentage = if max > 0.0 {
            (raw / max * 100.0).round() as i64
        } else {
            0
        };
        let weight = weights
            .get(category)
            .copied()
            .unwrap_or(DEFAULT_CATEGORY_WEIGHT);

        weighted_total += raw * weight;
        weighted_max += max * weight;

        breakdown.insert(
            category.to_string(),
            CategoryScore {
                raw_score: raw,
                max_score: max,
                percentage,
                weight,
            },
        );
    }

    ScoreResult {
        total_score: weighted_total.round() as i64,
        max_score: weighted_max.round() as i64,
        breakdown,
    }
}

/// Score one answered question on the 0..=10 scale (before weighting).
/// Malformed answers score 0; they are never an error.
fn question_score(kind: &QuestionKind, answer: &AnswerValue) -> f64 {
    match kind {
        QuestionKind::SingleSelect { options } => answer
            .as_text()
            .and_then(|text| options.iter().find(|o| o.value == text))
            .map(|o| o.score)
            .unwrap_or(0.0),

        QuestionKind::MultiSelect { options } => answer
            .as_list()
            .map(|selected| {
                options
                    .iter()
                    .filter(|o| selected.iter().any(|s| s == &o.value))
                    .map(|o| o.score)
                    .sum()
            })
            .unwrap_or(0.0),

        QuestionKind::RatingScale { scale } => match answer.as_number() {
            Some(value) if value >= 1.0 && value <= f64::from(*scale) => {
                (value / f64::from(*scale) * 10.0).round()
            }
            _ => 0.0,
        },

        QuestionKind::NumberInput { min, max } => match answer.as_number() {
            Some(value) => (((value - min) / (max - min)).clamp(0.0, 1.0) * 10.0).round(),
            None => 0.0,
        },

        QuestionKind::TextInput => {
            let length = answer
                .as_text()
                .map(|text| text.trim().chars().count())
                .unwrap_or(0);
            match length {
                0 => 0.0,
                1..=9 => 2.0,
                10..=49 => 5.0,
                50..=99 => 7.0,
                _ => 10.0,
            }
        }

        QuestionKind::Unknown => 0.0,
    }
}

/// Maximum possible score for a question (before weighting), counted
/// whether or not it was answered.
fn question_max(kind: &QuestionKind) -> f64 {
    match kind {
        QuestionKind::SingleSelect { options } => {
            options.iter().map(|o| o.score).fold(0.0, f64::max)
        }
        QuestionKind::MultiSelect { options } => options.iter().map(|o| o.score).sum(),
        QuestionKind::RatingScale { .. }
        | QuestionKind::NumberInput { .. }
        | QuestionKind::TextInput => 10.0,
        QuestionKind::Unknown => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuestionOption;

    fn option(value: &str, score: f64) -> QuestionOption {
        QuestionOption {
            value: value.to_string(),
            label: None,
            score,
        }
    }

    fn question(id: &str, category: &str, kind: QuestionKind, weight: f64) -> Question {
        Question {
            id: id.to_string(),
            category: category.to_string(),
            prompt: id.to_string(),
            kind,
            weight,
            required: false,
        }
    }

    #[test]
    fn rating_scale_end_to_end() {
        // Scale 5, answer "5", weight 1, category weight 0.3.
        let questions = vec![question(
            "maturity-rating",
            "governance",
            QuestionKind::RatingScale { scale: 5 },
            1.0,
        )];
        let mut answers = AnswerSet::new();
        answers.insert("maturity-rating".to_string(), AnswerValue::from("5"));
        let weights = BTreeMap::from([("governance".to_string(), 0.3)]);

        let result = compute_score(&questions, &answers, &weights);

        let governance = &result.breakdown["governance"];
        assert_eq!(governance.raw_score, 10.0);
        assert_eq!(governance.max_score, 10.0);
        assert_eq!(governance.percentage, 100);
        assert_eq!(result.total_score, 3);
        assert_eq!(result.max_score, 3);
    }

    #[test]
    fn single_select_scores_matching_option() {
        let kind = QuestionKind::SingleSelect {
            options: vec![option("yes", 10.0), option("no", 0.0)],
        };
        assert_eq!(question_score(&kind, &AnswerValue::from("yes")), 10.0);
        assert_eq!(question_score(&kind, &AnswerValue::from("maybe")), 0.0);
    }

    #[test]
    fn option_less_single_select_scores_zero() {
        let kind = QuestionKind::SingleSelect { options: vec![] };
        assert_eq!(question_score(&kind, &AnswerValue::from("anything")), 0.0);
        assert_eq!(question_max(&kind), 0.0);
    }

    #[test]
    fn multi_select_sums_selected_options() {
        let kind = QuestionKind::MultiSelect {
            options: vec![
                option("catalog", 3.0),
                option("lineage", 4.0),
                option("stewards", 3.0),
            ],
        };
        assert_eq!(
            question_score(&kind, &AnswerValue::from(vec!["catalog", "stewards"])),
            6.0
        );
        // A non-list answer to a multi-select scores 0.
        assert_eq!(question_score(&kind, &AnswerValue::from("catalog")), 0.0);
        assert_eq!(question_max(&kind), 10.0);
    }

    #[test]
    fn rating_scale_out_of_range_scores_zero() {
        let kind = QuestionKind::RatingScale { scale: 5 };
        assert_eq!(question_score(&kind, &AnswerValue::Number(0.0)), 0.0);
        assert_eq!(question_score(&kind, &AnswerValue::Number(6.0)), 0.0);
        assert_eq!(question_score(&kind, &AnswerValue::from("not a number")), 0.0);
        assert_eq!(question_score(&kind, &AnswerValue::Number(3.0)), 6.0);
    }

    #[test]
    fn number_input_clamps_to_range() {
        let kind = QuestionKind::NumberInput {
            min: 0.0,
            max: 100.0,
        };
        assert_eq!(question_score(&kind, &AnswerValue::Number(-10.0)), 0.0);
        assert_eq!(question_score(&kind, &AnswerValue::Number(250.0)), 10.0);
        assert_eq!(question_score(&kind, &AnswerValue::Number(50.0)), 5.0);
    }

    #[test]
    fn text_input_length_buckets() {
        let kind = QuestionKind::TextInput;
        assert_eq!(question_score(&kind, &AnswerValue::from("   ")), 0.0);
        assert_eq!(question_score(&kind, &AnswerValue::from("short")), 2.0);
        assert_eq!(
            question_score(&kind, &AnswerValue::from("a policy exists today")),
            5.0
        );
        assert_eq!(
            question_score(
                &kind,
                &AnswerValue::from(
                    "our data office reviews retention schedules quarterly and \
                     reports to the board"
                )
            ),
            7.0
        );
        assert_eq!(
            question_score(&kind, &AnswerValue::from(&"x".repeat(120)[..])),
            10.0
        );
    }

    #[test]
    fn unanswered_question_still_counts_toward_max() {
        let questions = vec![
            question(
                "answered",
                "controls",
                QuestionKind::RatingScale { scale: 5 },
                1.0,
            ),
            question(
                "skipped",
                "controls",
                QuestionKind::RatingScale { scale: 5 },
                1.0,
            ),
        ];
        let mut answers = AnswerSet::new();
        answers.insert("answered".to_string(), AnswerValue::Number(5.0));

        let result = compute_score(&questions, &answers, &BTreeMap::new());
        let controls = &result.breakdown["controls"];
        assert_eq!(controls.raw_score, 10.0);
        assert_eq!(controls.max_score, 20.0);
        assert_eq!(controls.percentage, 50);
    }

    #[test]
    fn uncategorized_questions_default_to_general() {
        let questions = vec![Question {
            id: "free".to_string(),
            category: "general".to_string(),
            prompt: "free".to_string(),
            kind: QuestionKind::TextInput,
            weight: 1.0,
            required: false,
        }];
        let result = compute_score(&questions, &AnswerSet::new(), &BTreeMap::new());
        assert!(result.breakdown.contains_key("general"));
        // Unrecognized category falls back to the 0.1 default weight.
        assert_eq!(result.breakdown["general"].weight, DEFAULT_CATEGORY_WEIGHT);
    }

    #[test]
    fn unknown_question_type_scores_zero() {
        let questions = vec![question("odd", "general", QuestionKind::Unknown, 3.0)];
        let mut answers = AnswerSet::new();
        answers.insert("odd".to_string(), AnswerValue::from("whatever"));

        let result = compute_score(&questions, &answers, &BTreeMap::new());
        assert_eq!(result.breakdown["general"].raw_score, 0.0);
        assert_eq!(result.breakdown["general"].max_score, 0.0);
        assert_eq!(result.breakdown["general"].percentage, 0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn fixed_questions() -> Vec<Question> {
            vec![
                question(
                    "q-select",
                    "governance",
                    QuestionKind::SingleSelect {
                        options: vec![option("yes", 10.0), option("partially", 5.0)],
                    },
                    2.0,
                ),
                question(
                    "q-rating",
                    "controls",
                    QuestionKind::RatingScale { scale: 5 },
                    1.0,
                ),
                question("q-text", "controls", QuestionKind::TextInput, 1.5),
            ]
        }

        fn arb_answers() -> impl Strategy<Value = AnswerSet> {
            let select = prop_oneof![
                Just(AnswerValue::from("yes")),
                Just(AnswerValue::from("partially")),
                Just(AnswerValue::from("garbage")),
            ];
            let rating = (-2.0f64..8.0).prop_map(AnswerValue::Number);
            let text = ".{0,120}".prop_map(|s| AnswerValue::Text(s));

            (
                proptest::option::of(select),
                proptest::option::of(rating),
                proptest::option::of(text),
            )
                .prop_map(|(s, r, t)| {
                    let mut answers = AnswerSet::new();
                    if let Some(v) = s {
                        answers.insert("q-select".to_string(), v);
                    }
                    if let Some(v) = r {
                        answers.insert("q-rating".to_string(), v);
                    }
                    if let Some(v) = t {
                        answers.insert("q-text".to_string(), v);
                    }
                    answers
                })
        }

        proptest! {
            #[test]
            fn compute_score_is_deterministic(answers in arb_answers()) {
                let questions = fixed_questions();
                let weights = BTreeMap::from([
                    ("governance".to_string(), 0.3),
                    ("controls".to_string(), 0.25),
                ]);

                let first = compute_score(&questions, &answers, &weights);
                let second = compute_score(&questions, &answers, &weights);
                prop_assert_eq!(first, second);
            }

            #[test]
            fn max_score_independent_of_answers(answers in arb_answers()) {
                let questions = fixed_questions();
                let weights = BTreeMap::new();

                let answered = compute_score(&questions, &answers, &weights);
                let blank = compute_score(&questions, &AnswerSet::new(), &weights);
                prop_assert_eq!(answered.max_score, blank.max_score);
            }
        }
    }
}
