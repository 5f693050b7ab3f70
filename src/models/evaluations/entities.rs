use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 评测阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub enum Phase {
    Settings,     // 基本设置
    Composition,  // 组卷
    Registration, // 报名
    InProgress,   // 进行中
    Grading,      // 批改
    Finished,     // 已结束
}

impl Phase {
    pub const SETTINGS: &'static str = "SETTINGS";
    pub const COMPOSITION: &'static str = "COMPOSITION";
    pub const REGISTRATION: &'static str = "REGISTRATION";
    pub const IN_PROGRESS: &'static str = "IN_PROGRESS";
    pub const GRADING: &'static str = "GRADING";
    pub const FINISHED: &'static str = "FINISHED";

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Settings => Self::SETTINGS,
            Phase::Composition => Self::COMPOSITION,
            Phase::Registration => Self::REGISTRATION,
            Phase::InProgress => Self::IN_PROGRESS,
            Phase::Grading => Self::GRADING,
            Phase::Finished => Self::FINISHED,
        }
    }

    /// 解析阶段字符串，未知值返回 None 而不是报错
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            Self::SETTINGS => Some(Phase::Settings),
            Self::COMPOSITION => Some(Phase::Composition),
            Self::REGISTRATION => Some(Phase::Registration),
            Self::IN_PROGRESS => Some(Phase::InProgress),
            Self::GRADING => Some(Phase::Grading),
            Self::FINISHED => Some(Phase::Finished),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Phase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Phase::parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "无效的评测阶段: '{s}'. 支持的阶段: SETTINGS, COMPOSITION, REGISTRATION, IN_PROGRESS, GRADING, FINISHED"
            ))
        })
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::parse(s).ok_or_else(|| format!("Invalid phase: {s}"))
    }
}

// 访问模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub enum AccessMode {
    LinkOnly,          // 持有链接即可加入
    LinkAndAccessList, // 需同时在访问名单中
}

// 评测状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub enum EvaluationStatus {
    Active,
    Archived,
}

// 时间安排
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationSchedule {
    // 是否启用限时
    pub duration_active: bool,
    pub duration_hours: u32,
    pub duration_mins: u32,
    // 开始时间（进入 IN_PROGRESS 时写入）
    pub start_at: Option<DateTime<Utc>>,
    // 结束时间
    pub end_at: Option<DateTime<Utc>>,
}

impl EvaluationSchedule {
    /// 限时时长，未启用时返回 None
    pub fn duration(&self) -> Option<chrono::Duration> {
        if !self.duration_active {
            return None;
        }
        Some(
            chrono::Duration::hours(i64::from(self.duration_hours))
                + chrono::Duration::minutes(i64::from(self.duration_mins)),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct Evaluation {
    // 唯一 ID
    pub id: String,
    // 所属教师分组
    pub group_scope: String,
    // 评测标题
    pub label: String,
    // 考试须知
    pub conditions: Option<String>,
    // 当前阶段
    pub phase: Phase,
    pub access_mode: AccessMode,
    // 访问名单（邮箱）
    pub access_list: Vec<String>,
    pub schedule: EvaluationSchedule,
    pub status: EvaluationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_serde_roundtrip() {
        let json = serde_json::to_string(&Phase::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        let phase: Phase = serde_json::from_str("\"GRADING\"").unwrap();
        assert_eq!(phase, Phase::Grading);
    }

    #[test]
    fn test_unknown_phase_is_none() {
        assert_eq!(Phase::parse("DRAFT"), None);
        assert!(serde_json::from_str::<Phase>("\"DRAFT\"").is_err());
    }

    #[test]
    fn test_schedule_duration() {
        let schedule = EvaluationSchedule {
            duration_active: true,
            duration_hours: 1,
            duration_mins: 30,
            ..Default::default()
        };
        assert_eq!(schedule.duration(), Some(chrono::Duration::minutes(90)));

        let inactive = EvaluationSchedule::default();
        assert_eq!(inactive.duration(), None);
    }
}
