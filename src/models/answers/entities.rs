use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::answers::requests::RecordRunResultsRequest;

// 作答状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub enum StudentAnswerStatus {
    Missing,    // 未作答
    InProgress, // 作答中
    Submitted,  // 已提交
}

// 批改状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub enum GradingStatus {
    Ungraded,   // 待批改
    Graded,     // 人工批改
    Autograded, // 自动批改
}

// SQL lint 结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub enum LintStatus {
    Success,
    Failure,
}

/// 数据库题中单条查询的作答结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct DatabaseAnswerQuery {
    pub order: u32,
    pub content: Option<String>,
    // 输出与期望结果一致；None 表示尚未运行
    pub test_passed: Option<bool>,
    pub lint_result: Option<LintStatus>,
}

/// 各题型的作答内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub enum AnswerPayload {
    TrueFalse {
        is_true: Option<bool>,
    },
    MultipleChoice {
        // 已选选项 ID
        options: Vec<String>,
    },
    Essay {
        content: Option<String>,
    },
    Code {
        // 最近一次运行是否通过全部测试用例；None 表示从未运行
        all_test_cases_passed: Option<bool>,
    },
    Web {
        html: Option<String>,
        css: Option<String>,
        js: Option<String>,
    },
    Database {
        queries: Vec<DatabaseAnswerQuery>,
    },
}

impl AnswerPayload {
    /// 与 `QuestionKind::type_name` 对应的题型名
    pub fn type_name(&self) -> &'static str {
        match self {
            AnswerPayload::TrueFalse { .. } => "trueFalse",
            AnswerPayload::MultipleChoice { .. } => "multipleChoice",
            AnswerPayload::Essay { .. } => "essay",
            AnswerPayload::Code { .. } => "code",
            AnswerPayload::Web { .. } => "web",
            AnswerPayload::Database { .. } => "database",
        }
    }

    /// 替换客户端带来的运行结果
    ///
    /// 代码题沿用上一次记录的结果；数据库题只有内容未变的查询才沿用，其余清空。
    pub fn with_recorded_results(mut self, previous: Option<&AnswerPayload>) -> Self {
        match (&mut self, previous) {
            (
                AnswerPayload::Code {
                    all_test_cases_passed,
                },
                Some(AnswerPayload::Code {
                    all_test_cases_passed: recorded,
                }),
            ) => *all_test_cases_passed = *recorded,
            (
                AnswerPayload::Code {
                    all_test_cases_passed,
                },
                _,
            ) => *all_test_cases_passed = None,
            (AnswerPayload::Database { queries }, previous) => {
                let recorded: &[DatabaseAnswerQuery] = match previous {
                    Some(AnswerPayload::Database { queries: recorded }) => recorded.as_slice(),
                    _ => &[],
                };
                for query in queries.iter_mut() {
                    let kept = recorded
                        .iter()
                        .find(|r| r.order == query.order && r.content == query.content);
                    query.test_passed = kept.and_then(|r| r.test_passed);
                    query.lint_result = kept.and_then(|r| r.lint_result);
                }
            }
            _ => {}
        }
        self
    }

    /// 写入执行器的运行结果，非代码或数据库题返回 false
    pub fn apply_run_results(&mut self, results: &RecordRunResultsRequest) -> bool {
        match self {
            AnswerPayload::Code {
                all_test_cases_passed,
            } => {
                *all_test_cases_passed = results.all_test_cases_passed;
                true
            }
            AnswerPayload::Database { queries } => {
                for result in &results.queries {
                    if let Some(query) = queries.iter_mut().find(|q| q.order == result.order) {
                        query.test_passed = result.test_passed;
                        query.lint_result = result.lint_result;
                    }
                }
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct StudentGrading {
    pub points_obtained: f64,
    pub status: GradingStatus,
    pub comment: Option<String>,
    // 签署人邮箱，仅在签署时写入，撤销签署时清空
    pub signed_by: Option<String>,
    pub is_correct: bool,
    // 自动批改给出的分数，用于判断是否被人工改动
    pub autograded_points: Option<f64>,
}

impl Default for StudentGrading {
    fn default() -> Self {
        Self {
            points_obtained: 0.0,
            status: GradingStatus::Ungraded,
            comment: None,
            signed_by: None,
            is_correct: false,
            autograded_points: None,
        }
    }
}

impl StudentGrading {
    pub fn is_signed(&self) -> bool {
        self.signed_by.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct StudentAnswer {
    pub user_email: String,
    pub status: StudentAnswerStatus,
    pub payload: Option<AnswerPayload>,
    pub student_grading: Option<StudentGrading>,
    pub updated_at: DateTime<Utc>,
}

impl StudentAnswer {
    /// 构造一条缺考作答
    pub fn missing(user_email: impl Into<String>) -> Self {
        Self {
            user_email: user_email.into(),
            status: StudentAnswerStatus::Missing,
            payload: None,
            student_grading: None,
            updated_at: Utc::now(),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.status == StudentAnswerStatus::Missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_query(order: u32, content: &str, test_passed: Option<bool>) -> DatabaseAnswerQuery {
        DatabaseAnswerQuery {
            order,
            content: Some(content.to_string()),
            test_passed,
            lint_result: None,
        }
    }

    #[test]
    fn test_client_run_results_are_ignored() {
        let claimed = AnswerPayload::Code {
            all_test_cases_passed: Some(true),
        };
        assert_eq!(
            claimed.clone().with_recorded_results(None),
            AnswerPayload::Code {
                all_test_cases_passed: None
            }
        );

        let recorded = AnswerPayload::Code {
            all_test_cases_passed: Some(false),
        };
        assert_eq!(
            claimed.with_recorded_results(Some(&recorded)),
            AnswerPayload::Code {
                all_test_cases_passed: Some(false)
            }
        );
    }

    #[test]
    fn test_database_results_kept_only_for_unchanged_queries() {
        let recorded = AnswerPayload::Database {
            queries: vec![
                db_query(1, "SELECT 1", Some(true)),
                db_query(2, "SELECT 2", Some(true)),
            ],
        };
        let resubmitted = AnswerPayload::Database {
            queries: vec![
                db_query(1, "SELECT 1", Some(false)),
                db_query(2, "SELECT 22", Some(true)),
            ],
        };
        let AnswerPayload::Database { queries } =
            resubmitted.with_recorded_results(Some(&recorded))
        else {
            panic!("expected database payload");
        };
        assert_eq!(queries[0].test_passed, Some(true));
        assert_eq!(queries[1].test_passed, None);
    }

    #[test]
    fn test_apply_run_results() {
        let mut payload = AnswerPayload::Database {
            queries: vec![db_query(1, "SELECT 1", None)],
        };
        let results = RecordRunResultsRequest {
            all_test_cases_passed: None,
            queries: vec![crate::models::answers::requests::QueryRunResult {
                order: 1,
                test_passed: Some(true),
                lint_result: Some(LintStatus::Success),
            }],
        };
        assert!(payload.apply_run_results(&results));
        let AnswerPayload::Database { queries } = &payload else {
            panic!("expected database payload");
        };
        assert_eq!(queries[0].test_passed, Some(true));
        assert_eq!(queries[0].lint_result, Some(LintStatus::Success));

        let mut essay = AnswerPayload::Essay { content: None };
        assert!(!essay.apply_run_results(&results));
    }
}
