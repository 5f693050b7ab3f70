//! 统计聚合
//!
//! 所有函数都是纯函数：输入为带有作答与批改的组卷列表，输出为统计视图。
//! 缺失的批改或运行结果视为“尚不可计”，不会报错；所有除法在分母为 0 时返回 0。

use crate::models::answers::entities::{
    AnswerPayload, DatabaseAnswerQuery, GradingStatus, LintStatus, StudentAnswer,
    StudentAnswerStatus,
};
use crate::models::evaluations::entities::Phase;
use crate::models::questions::entities::{EvaluationToQuestion, Question, QuestionKind};
use crate::models::stats::responses::{
    EvaluationOverview, GradingStats, OptionStat, ParticipantOverviewRow, QueryStat,
    QuestionOverviewRow, QuestionStats, StatCount, TypeSpecificStats,
};

/// 四舍五入到整数（.5 向上取整）
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// `round(numerator / denominator * 100)`，分母为 0 时返回 0
pub fn percentage(numerator: f64, denominator: f64) -> u32 {
    if denominator.abs() < f64::EPSILON {
        return 0;
    }
    // 负数与 NaN 饱和为 0
    round_half_up(numerator / denominator * 100.0) as u32
}

fn count_stat(count: u32, total: u32) -> StatCount {
    StatCount {
        count,
        percentage: percentage(f64::from(count), f64::from(total)),
    }
}

fn answers_of(links: &[EvaluationToQuestion]) -> impl Iterator<Item = (&EvaluationToQuestion, &StudentAnswer)> {
    links.iter().flat_map(|link| {
        link.question
            .student_answer
            .iter()
            .map(move |answer| (link, answer))
    })
}

fn points_of(answer: &StudentAnswer) -> f64 {
    answer
        .student_grading
        .as_ref()
        .map(|grading| grading.points_obtained)
        .unwrap_or(0.0)
}

/// 已签署批改的得分率
pub fn signed_success_rate(links: &[EvaluationToQuestion]) -> u32 {
    let (obtained, possible) = answers_of(links)
        .filter_map(|(link, answer)| {
            answer
                .student_grading
                .as_ref()
                .filter(|grading| grading.is_signed())
                .map(|grading| (grading.points_obtained, link.points))
        })
        .fold((0.0, 0.0), |(obtained, possible), (points_obtained, points)| {
            (obtained + points_obtained, possible + points)
        });
    percentage(obtained, possible)
}

/// 单题得分率（所有作答，未批改按 0 分计）
pub fn question_success_rate(link: &EvaluationToQuestion) -> u32 {
    let answers = &link.question.student_answer;
    let possible = link.points * answers.len() as f64;
    let obtained: f64 = answers.iter().map(points_of).sum();
    percentage(obtained, possible)
}

/// 参与者在整场评测中的得分
pub fn obtained_points(links: &[EvaluationToQuestion], participant: &str) -> f64 {
    answers_of(links)
        .filter(|(_, answer)| answer.user_email == participant)
        .map(|(_, answer)| points_of(answer))
        .sum()
}

/// 满分
pub fn total_points(links: &[EvaluationToQuestion]) -> f64 {
    links.iter().map(|link| link.points).sum()
}

/// 批改进度
pub fn grading_stats(links: &[EvaluationToQuestion]) -> GradingStats {
    answers_of(links).fold(GradingStats::default(), |mut stats, (_, answer)| {
        stats.total_gradings += 1;
        if let Some(grading) = &answer.student_grading {
            if grading.is_signed() {
                stats.total_signed += 1;
            } else if grading.status == GradingStatus::Autograded {
                stats.total_autograded_unsigned += 1;
            }
        }
        stats
    })
}

/// 参与者已提交题目占比
pub fn participant_submission_rate(links: &[EvaluationToQuestion], participant: &str) -> u32 {
    let submitted = answers_of(links)
        .filter(|(_, answer)| {
            answer.user_email == participant && answer.status == StudentAnswerStatus::Submitted
        })
        .count();
    percentage(submitted as f64, links.len() as f64)
}

/// 单题已提交人数
pub fn submitted_count(question: &Question) -> StatCount {
    let total = question.student_answer.len() as u32;
    let submitted = question
        .student_answer
        .iter()
        .filter(|answer| answer.status == StudentAnswerStatus::Submitted)
        .count() as u32;
    count_stat(submitted, total)
}

/// 按题型统计
pub fn type_specific_stats(question: &Question) -> QuestionStats {
    let answers = &question.student_answer;
    let total = answers.len() as u32;
    // 缺考作答不计入任何“选择/通过”信号
    let answered: Vec<&StudentAnswer> = answers.iter().filter(|a| !a.is_missing()).collect();

    let count_where =
        |predicate: fn(&AnswerPayload) -> bool| count_answered(&answered, predicate);

    let breakdown = match &question.kind {
        QuestionKind::TrueFalse { .. } => TypeSpecificStats::TrueFalse {
            true_answers: count_stat(
                count_where(|p| matches!(p, AnswerPayload::TrueFalse { is_true: Some(true) })),
                total,
            ),
            false_answers: count_stat(
                count_where(|p| matches!(p, AnswerPayload::TrueFalse { is_true: Some(false) })),
                total,
            ),
        },
        QuestionKind::MultipleChoice { options } => TypeSpecificStats::MultipleChoice {
            options: options
                .iter()
                .map(|option| {
                    let chosen = count_answered(&answered, |p| match p {
                        AnswerPayload::MultipleChoice { options } => options.contains(&option.id),
                        _ => false,
                    });
                    OptionStat {
                        option_id: option.id.clone(),
                        text: option.text.clone(),
                        chosen,
                        percentage: percentage(f64::from(chosen), f64::from(total)),
                    }
                })
                .collect(),
        },
        QuestionKind::Code { .. } => {
            let success = count_where(|p| {
                matches!(p, AnswerPayload::Code { all_test_cases_passed: Some(true) })
            });
            let failure = count_where(|p| {
                matches!(p, AnswerPayload::Code { all_test_cases_passed: Some(false) })
            });
            // 没有运行结果（包括没有作答内容）的非缺考作答
            let no_runs = answered.len() as u32 - success - failure;
            TypeSpecificStats::Code {
                success: count_stat(success, total),
                failure: count_stat(failure, total),
                no_runs: count_stat(no_runs, total),
            }
        }
        QuestionKind::Essay => {
            let (submitted, missing) = submitted_and_missing(answers);
            TypeSpecificStats::Essay {
                submitted: count_stat(submitted, total),
                missing: count_stat(missing, total),
            }
        }
        QuestionKind::Web => {
            let (submitted, missing) = submitted_and_missing(answers);
            TypeSpecificStats::Web {
                submitted: count_stat(submitted, total),
                missing: count_stat(missing, total),
            }
        }
        QuestionKind::Database { queries } => {
            let test_queries = queries
                .iter()
                .filter(|query| query.test_query)
                .map(|query| {
                    let results: Vec<Option<bool>> = answered
                        .iter()
                        .map(|answer| query_result(answer, query.order).and_then(|r| r.test_passed))
                        .collect();
                    QueryStat {
                        order: query.order,
                        title: query.title.clone(),
                        passed: count_stat(
                            results.iter().filter(|r| **r == Some(true)).count() as u32,
                            total,
                        ),
                        failed: count_stat(
                            results.iter().filter(|r| **r == Some(false)).count() as u32,
                            total,
                        ),
                    }
                })
                .collect();

            let lint_queries = queries
                .iter()
                .filter(|query| query.lint_active)
                .map(|query| {
                    let results: Vec<Option<LintStatus>> = answered
                        .iter()
                        .map(|answer| query_result(answer, query.order).and_then(|r| r.lint_result))
                        .collect();
                    QueryStat {
                        order: query.order,
                        title: query.title.clone(),
                        passed: count_stat(
                            results
                                .iter()
                                .filter(|r| **r == Some(LintStatus::Success))
                                .count() as u32,
                            total,
                        ),
                        failed: count_stat(
                            results
                                .iter()
                                .filter(|r| **r == Some(LintStatus::Failure))
                                .count() as u32,
                            total,
                        ),
                    }
                })
                .collect();

            TypeSpecificStats::Database {
                test_queries,
                lint_queries,
            }
        }
    };

    QuestionStats {
        question_id: question.id.clone(),
        total_participants: total,
        breakdown,
    }
}

fn count_answered(answered: &[&StudentAnswer], predicate: impl Fn(&AnswerPayload) -> bool) -> u32 {
    answered
        .iter()
        .filter(|answer| answer.payload.as_ref().is_some_and(&predicate))
        .count() as u32
}

fn query_result(answer: &StudentAnswer, order: u32) -> Option<&DatabaseAnswerQuery> {
    match &answer.payload {
        Some(AnswerPayload::Database { queries }) => queries.iter().find(|q| q.order == order),
        _ => None,
    }
}

fn submitted_and_missing(answers: &[StudentAnswer]) -> (u32, u32) {
    answers.iter().fold((0, 0), |(submitted, missing), answer| match answer.status {
        StudentAnswerStatus::Submitted => (submitted + 1, missing),
        StudentAnswerStatus::Missing => (submitted, missing + 1),
        StudentAnswerStatus::InProgress => (submitted, missing),
    })
}

/// 汇总整场评测的统计视图
pub fn evaluation_overview(
    evaluation_id: &str,
    phase: Phase,
    links: &[EvaluationToQuestion],
    participants: &[String],
) -> EvaluationOverview {
    let total = total_points(links);

    let mut ordered: Vec<&EvaluationToQuestion> = links.iter().collect();
    ordered.sort_by_key(|link| link.order);

    let questions = ordered
        .into_iter()
        .map(|link| QuestionOverviewRow {
            question_id: link.question_id.clone(),
            order: link.order,
            title: link.question.title.clone(),
            question_type: link.question.kind.type_name().to_string(),
            points: link.points,
            success_rate: question_success_rate(link),
            submitted: submitted_count(&link.question),
            stats: type_specific_stats(&link.question),
        })
        .collect();

    let participants = participants
        .iter()
        .map(|email| ParticipantOverviewRow {
            user_email: email.clone(),
            obtained_points: obtained_points(links, email),
            total_points: total,
            submission_rate: participant_submission_rate(links, email),
        })
        .collect();

    EvaluationOverview {
        evaluation_id: evaluation_id.to_string(),
        phase,
        total_points: total,
        signed_success_rate: signed_success_rate(links),
        grading: grading_stats(links),
        questions,
        participants,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answers::entities::StudentGrading;
    use crate::models::questions::entities::{DatabaseQuery, QuestionOption};

    fn question(kind: QuestionKind, answers: Vec<StudentAnswer>) -> Question {
        Question {
            id: "q1".to_string(),
            title: "Question".to_string(),
            content: None,
            kind,
            student_answer: answers,
        }
    }

    fn link(points: f64, question: Question) -> EvaluationToQuestion {
        EvaluationToQuestion {
            evaluation_id: "ev1".to_string(),
            question_id: question.id.clone(),
            order: 0,
            points,
            question,
        }
    }

    fn answer(email: &str, payload: Option<AnswerPayload>) -> StudentAnswer {
        StudentAnswer {
            status: StudentAnswerStatus::Submitted,
            payload,
            ..StudentAnswer::missing(email)
        }
    }

    fn graded(mut answer: StudentAnswer, points: f64, status: GradingStatus, signed: bool) -> StudentAnswer {
        answer.student_grading = Some(StudentGrading {
            points_obtained: points,
            status,
            signed_by: signed.then(|| "prof@example.com".to_string()),
            ..StudentGrading::default()
        });
        answer
    }

    #[test]
    fn test_rounding_rule() {
        assert_eq!(percentage(1.0, 3.0), 33);
        assert_eq!(percentage(2.0, 3.0), 67);
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(percentage(1.0, 8.0), 13); // 12.5 -> 13
        assert_eq!(percentage(5.0, 0.0), 0);
    }

    #[test]
    fn test_signed_success_rate_empty() {
        assert_eq!(signed_success_rate(&[]), 0);
    }

    #[test]
    fn test_signed_success_rate_ignores_unsigned() {
        let links = vec![link(
            4.0,
            question(
                QuestionKind::Essay,
                vec![
                    graded(answer("a@x.io", None), 3.0, GradingStatus::Graded, true),
                    graded(answer("b@x.io", None), 4.0, GradingStatus::Graded, false),
                    answer("c@x.io", None),
                ],
            ),
        )];
        assert_eq!(signed_success_rate(&links), 75);
    }

    #[test]
    fn test_signed_success_rate_without_signatures_is_zero() {
        let links = vec![link(
            4.0,
            question(
                QuestionKind::Essay,
                vec![graded(answer("a@x.io", None), 3.0, GradingStatus::Autograded, false)],
            ),
        )];
        assert_eq!(signed_success_rate(&links), 0);
    }

    #[test]
    fn test_question_success_rate() {
        let l = link(
            3.0,
            question(
                QuestionKind::Essay,
                vec![
                    graded(answer("a@x.io", None), 3.0, GradingStatus::Graded, true),
                    graded(answer("b@x.io", None), 1.0, GradingStatus::Graded, false),
                    StudentAnswer::missing("c@x.io"),
                ],
            ),
        );
        // 4 / 9
        assert_eq!(question_success_rate(&l), 44);
        assert_eq!(question_success_rate(&link(3.0, question(QuestionKind::Web, vec![]))), 0);
    }

    #[test]
    fn test_obtained_points() {
        let links = vec![
            link(
                2.0,
                question(
                    QuestionKind::Essay,
                    vec![graded(answer("a@x.io", None), 1.5, GradingStatus::Graded, true)],
                ),
            ),
            link(
                2.0,
                question(QuestionKind::Web, vec![answer("a@x.io", None)]),
            ),
        ];
        assert_eq!(obtained_points(&links, "a@x.io"), 1.5);
        assert_eq!(obtained_points(&links, "nobody@x.io"), 0.0);
        assert_eq!(total_points(&links), 4.0);
    }

    #[test]
    fn test_grading_stats_example() {
        let links = vec![link(
            1.0,
            question(
                QuestionKind::TrueFalse { is_true: true },
                vec![
                    graded(answer("a@x.io", None), 1.0, GradingStatus::Autograded, false),
                    graded(answer("b@x.io", None), 0.0, GradingStatus::Autograded, false),
                    graded(answer("c@x.io", None), 1.0, GradingStatus::Graded, true),
                ],
            ),
        )];
        assert_eq!(
            grading_stats(&links),
            GradingStats {
                total_gradings: 3,
                total_signed: 1,
                total_autograded_unsigned: 2,
            }
        );
    }

    #[test]
    fn test_multiple_choice_example() {
        let q = question(
            QuestionKind::MultipleChoice {
                options: vec![
                    QuestionOption {
                        id: "1".to_string(),
                        text: "A".to_string(),
                        is_correct: true,
                    },
                    QuestionOption {
                        id: "2".to_string(),
                        text: "B".to_string(),
                        is_correct: false,
                    },
                ],
            },
            vec![
                answer(
                    "a@x.io",
                    Some(AnswerPayload::MultipleChoice {
                        options: vec!["1".to_string()],
                    }),
                ),
                StudentAnswer::missing("b@x.io"),
            ],
        );
        let stats = type_specific_stats(&q);
        assert_eq!(stats.total_participants, 2);
        match stats.breakdown {
            TypeSpecificStats::MultipleChoice { options } => {
                assert_eq!(options[0].chosen, 1);
                assert_eq!(options[0].percentage, 50);
                assert_eq!(options[1].chosen, 0);
                assert_eq!(options[1].percentage, 0);
            }
            other => panic!("unexpected breakdown: {other:?}"),
        }
    }

    #[test]
    fn test_missing_answer_choice_is_not_counted() {
        // 缺考作答即使残留内容也不计数
        let mut stale = StudentAnswer::missing("b@x.io");
        stale.payload = Some(AnswerPayload::TrueFalse { is_true: Some(true) });
        let q = question(
            QuestionKind::TrueFalse { is_true: true },
            vec![
                answer("a@x.io", Some(AnswerPayload::TrueFalse { is_true: Some(false) })),
                stale,
            ],
        );
        match type_specific_stats(&q).breakdown {
            TypeSpecificStats::TrueFalse {
                true_answers,
                false_answers,
            } => {
                assert_eq!(true_answers, StatCount { count: 0, percentage: 0 });
                assert_eq!(false_answers, StatCount { count: 1, percentage: 50 });
            }
            other => panic!("unexpected breakdown: {other:?}"),
        }
    }

    #[test]
    fn test_code_stats() {
        let q = question(
            QuestionKind::Code { language: None },
            vec![
                answer("a@x.io", Some(AnswerPayload::Code { all_test_cases_passed: Some(true) })),
                answer("b@x.io", Some(AnswerPayload::Code { all_test_cases_passed: Some(false) })),
                answer("c@x.io", Some(AnswerPayload::Code { all_test_cases_passed: None })),
                StudentAnswer::missing("d@x.io"),
            ],
        );
        match type_specific_stats(&q).breakdown {
            TypeSpecificStats::Code {
                success,
                failure,
                no_runs,
            } => {
                assert_eq!(success, StatCount { count: 1, percentage: 25 });
                assert_eq!(failure, StatCount { count: 1, percentage: 25 });
                assert_eq!(no_runs, StatCount { count: 1, percentage: 25 });
            }
            other => panic!("unexpected breakdown: {other:?}"),
        }
    }

    #[test]
    fn test_essay_stats() {
        let mut in_progress = answer("c@x.io", None);
        in_progress.status = StudentAnswerStatus::InProgress;
        let q = question(
            QuestionKind::Essay,
            vec![answer("a@x.io", None), StudentAnswer::missing("b@x.io"), in_progress],
        );
        match type_specific_stats(&q).breakdown {
            TypeSpecificStats::Essay { submitted, missing } => {
                assert_eq!(submitted, StatCount { count: 1, percentage: 33 });
                assert_eq!(missing, StatCount { count: 1, percentage: 33 });
            }
            other => panic!("unexpected breakdown: {other:?}"),
        }
    }

    #[test]
    fn test_database_stats() {
        let q = question(
            QuestionKind::Database {
                queries: vec![
                    DatabaseQuery {
                        order: 1,
                        title: Some("select".to_string()),
                        test_query: true,
                        lint_active: true,
                    },
                    DatabaseQuery {
                        order: 2,
                        title: None,
                        test_query: false,
                        lint_active: false,
                    },
                ],
            },
            vec![
                answer(
                    "a@x.io",
                    Some(AnswerPayload::Database {
                        queries: vec![DatabaseAnswerQuery {
                            order: 1,
                            content: Some("SELECT 1".to_string()),
                            test_passed: Some(true),
                            lint_result: Some(LintStatus::Failure),
                        }],
                    }),
                ),
                answer(
                    "b@x.io",
                    Some(AnswerPayload::Database {
                        queries: vec![DatabaseAnswerQuery {
                            order: 1,
                            content: None,
                            test_passed: Some(false),
                            lint_result: None,
                        }],
                    }),
                ),
            ],
        );
        match type_specific_stats(&q).breakdown {
            TypeSpecificStats::Database {
                test_queries,
                lint_queries,
            } => {
                assert_eq!(test_queries.len(), 1);
                assert_eq!(test_queries[0].passed.count, 1);
                assert_eq!(test_queries[0].failed.count, 1);
                assert_eq!(lint_queries.len(), 1);
                assert_eq!(lint_queries[0].passed.count, 0);
                assert_eq!(lint_queries[0].failed, StatCount { count: 1, percentage: 50 });
            }
            other => panic!("unexpected breakdown: {other:?}"),
        }
    }

    #[test]
    fn test_stats_without_answers() {
        let q = question(QuestionKind::Web, vec![]);
        let stats = type_specific_stats(&q);
        assert_eq!(stats.total_participants, 0);
        assert_eq!(
            stats.breakdown,
            TypeSpecificStats::Web {
                submitted: StatCount::default(),
                missing: StatCount::default(),
            }
        );
    }

    #[test]
    fn test_evaluation_overview() {
        let mut second = link(
            1.0,
            question(QuestionKind::TrueFalse { is_true: false }, vec![answer("a@x.io", None)]),
        );
        second.order = 1;
        second.question_id = "q2".to_string();
        let first = link(
            3.0,
            question(
                QuestionKind::Essay,
                vec![graded(answer("a@x.io", None), 3.0, GradingStatus::Graded, true)],
            ),
        );
        let links = vec![second, first];
        let overview = evaluation_overview(
            "ev1",
            Phase::Grading,
            &links,
            &["a@x.io".to_string(), "b@x.io".to_string()],
        );

        assert_eq!(overview.total_points, 4.0);
        assert_eq!(overview.signed_success_rate, 100);
        assert_eq!(overview.questions[0].order, 0);
        assert_eq!(overview.questions[1].question_type, "trueFalse");
        assert_eq!(overview.participants[0].obtained_points, 3.0);
        assert_eq!(overview.participants[0].submission_rate, 100);
        assert_eq!(overview.participants[1].submission_rate, 0);
    }
}
