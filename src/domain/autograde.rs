//! 自动批改
//!
//! 进入 GRADING 阶段时对每条作答执行一次，结果为全分或 0 分。

use crate::models::answers::entities::{AnswerPayload, GradingStatus, StudentAnswer, StudentGrading};
use crate::models::questions::entities::QuestionKind;

/// 作答是否正确；None 表示该题型需要人工批改
pub fn is_correct(kind: &QuestionKind, payload: Option<&AnswerPayload>) -> Option<bool> {
    match kind {
        QuestionKind::Essay | QuestionKind::Web => None,
        QuestionKind::TrueFalse { is_true } => Some(matches!(
            payload,
            Some(AnswerPayload::TrueFalse { is_true: Some(answer) }) if answer == is_true
        )),
        QuestionKind::MultipleChoice { options } => {
            let Some(AnswerPayload::MultipleChoice { options: chosen }) = payload else {
                return Some(false);
            };
            let mut expected: Vec<&str> = options
                .iter()
                .filter(|option| option.is_correct)
                .map(|option| option.id.as_str())
                .collect();
            let mut actual: Vec<&str> = chosen.iter().map(String::as_str).collect();
            expected.sort_unstable();
            actual.sort_unstable();
            actual.dedup();
            Some(expected == actual)
        }
        QuestionKind::Code { .. } => Some(matches!(
            payload,
            Some(AnswerPayload::Code {
                all_test_cases_passed: Some(true)
            })
        )),
        QuestionKind::Database { queries } => {
            let Some(AnswerPayload::Database { queries: answers }) = payload else {
                return Some(false);
            };
            Some(queries.iter().filter(|query| query.test_query).all(|query| {
                answers
                    .iter()
                    .any(|answer| answer.order == query.order && answer.test_passed == Some(true))
            }))
        }
    }
}

/// 计算一条作答的初始批改
///
/// 已有的批改会保留评语；已签署的批改不应再交给这里处理。
pub fn autograde(kind: &QuestionKind, answer: &StudentAnswer, points: f64) -> StudentGrading {
    let comment = answer
        .student_grading
        .as_ref()
        .and_then(|grading| grading.comment.clone());

    if answer.is_missing() {
        return StudentGrading {
            points_obtained: 0.0,
            status: GradingStatus::Autograded,
            autograded_points: Some(0.0),
            comment,
            ..StudentGrading::default()
        };
    }

    match is_correct(kind, answer.payload.as_ref()) {
        Some(correct) => {
            let obtained = if correct { points } else { 0.0 };
            StudentGrading {
                points_obtained: obtained,
                status: GradingStatus::Autograded,
                is_correct: correct,
                autograded_points: Some(obtained),
                comment,
                signed_by: None,
            }
        }
        None => StudentGrading {
            comment,
            ..StudentGrading::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answers::entities::{DatabaseAnswerQuery, StudentAnswerStatus};
    use crate::models::questions::entities::{DatabaseQuery, QuestionOption};

    fn submitted(payload: AnswerPayload) -> StudentAnswer {
        StudentAnswer {
            status: StudentAnswerStatus::Submitted,
            payload: Some(payload),
            ..StudentAnswer::missing("a@example.com")
        }
    }

    fn option(id: &str, is_correct: bool) -> QuestionOption {
        QuestionOption {
            id: id.to_string(),
            text: id.to_uppercase(),
            is_correct,
        }
    }

    #[test]
    fn test_true_false() {
        let kind = QuestionKind::TrueFalse { is_true: false };
        let right = autograde(&kind, &submitted(AnswerPayload::TrueFalse { is_true: Some(false) }), 2.0);
        assert_eq!(right.status, GradingStatus::Autograded);
        assert_eq!(right.points_obtained, 2.0);
        assert!(right.is_correct);

        let unanswered = autograde(&kind, &submitted(AnswerPayload::TrueFalse { is_true: None }), 2.0);
        assert_eq!(unanswered.points_obtained, 0.0);
        assert!(!unanswered.is_correct);
    }

    #[test]
    fn test_multiple_choice_requires_exact_set() {
        let kind = QuestionKind::MultipleChoice {
            options: vec![option("a", true), option("b", true), option("c", false)],
        };
        let exact = submitted(AnswerPayload::MultipleChoice {
            options: vec!["b".to_string(), "a".to_string()],
        });
        let partial = submitted(AnswerPayload::MultipleChoice {
            options: vec!["a".to_string()],
        });
        let extra = submitted(AnswerPayload::MultipleChoice {
            options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        });
        assert_eq!(autograde(&kind, &exact, 4.0).points_obtained, 4.0);
        assert_eq!(autograde(&kind, &partial, 4.0).points_obtained, 0.0);
        assert_eq!(autograde(&kind, &extra, 4.0).points_obtained, 0.0);
    }

    #[test]
    fn test_code_and_database() {
        let code = QuestionKind::Code { language: None };
        let never_run = submitted(AnswerPayload::Code { all_test_cases_passed: None });
        assert_eq!(autograde(&code, &never_run, 1.0).points_obtained, 0.0);

        let db = QuestionKind::Database {
            queries: vec![
                DatabaseQuery {
                    order: 1,
                    title: None,
                    test_query: true,
                    lint_active: false,
                },
                DatabaseQuery {
                    order: 2,
                    title: None,
                    test_query: false,
                    lint_active: false,
                },
            ],
        };
        let answer = submitted(AnswerPayload::Database {
            queries: vec![DatabaseAnswerQuery {
                order: 1,
                content: Some("SELECT 1".to_string()),
                test_passed: Some(true),
                lint_result: None,
            }],
        });
        assert!(autograde(&db, &answer, 1.0).is_correct);
    }

    #[test]
    fn test_manual_kinds_stay_ungraded() {
        let answer = submitted(AnswerPayload::Essay {
            content: Some("text".to_string()),
        });
        let grading = autograde(&QuestionKind::Essay, &answer, 5.0);
        assert_eq!(grading.status, GradingStatus::Ungraded);
        assert_eq!(grading.autograded_points, None);
    }

    #[test]
    fn test_missing_answer_gets_zero() {
        let grading = autograde(&QuestionKind::Essay, &StudentAnswer::missing("b@example.com"), 5.0);
        assert_eq!(grading.status, GradingStatus::Autograded);
        assert_eq!(grading.points_obtained, 0.0);
    }
}
