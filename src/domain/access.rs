//! 学生加入评测的访问控制

use std::fmt;

use super::phase::Phase;
use crate::models::evaluations::entities::{AccessMode, Evaluation, EvaluationStatus};
use crate::models::registrations::entities::UserOnEvaluation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    PhaseClosed(Phase),
    NotInAccessList(String),
    Archived,
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::PhaseClosed(phase) => {
                write!(f, "evaluation is not open for joining in phase {phase}")
            }
            AccessError::NotInAccessList(email) => {
                write!(f, "{email} is not in the access list")
            }
            AccessError::Archived => write!(f, "evaluation is archived"),
        }
    }
}

impl std::error::Error for AccessError {}

/// 邮箱比较前统一去空白并转小写
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 学生能否加入评测
pub fn can_join(evaluation: &Evaluation, email: &str) -> Result<(), AccessError> {
    if evaluation.status == EvaluationStatus::Archived {
        return Err(AccessError::Archived);
    }
    if !matches!(evaluation.phase, Phase::Registration | Phase::InProgress) {
        return Err(AccessError::PhaseClosed(evaluation.phase));
    }
    if evaluation.access_mode == AccessMode::LinkAndAccessList {
        let email = normalize_email(email);
        let listed = evaluation
            .access_list
            .iter()
            .any(|allowed| normalize_email(allowed) == email);
        if !listed {
            return Err(AccessError::NotInAccessList(email));
        }
    }
    Ok(())
}

/// 再次加入时检测会话是否变化，返回是否首次检测到变化
pub fn session_changed(registration: &UserOnEvaluation, session_id: Option<&str>) -> bool {
    match (registration.original_session_id.as_deref(), session_id) {
        (Some(original), Some(current)) => original != current,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::entities::EvaluationSchedule;
    use crate::models::registrations::entities::UserOnEvaluationStatus;
    use chrono::Utc;

    fn evaluation(phase: Phase, access_mode: AccessMode) -> Evaluation {
        Evaluation {
            id: "ev1".to_string(),
            group_scope: "algo".to_string(),
            label: "Midterm".to_string(),
            conditions: None,
            phase,
            access_mode,
            access_list: vec!["Alice@Example.com".to_string()],
            schedule: EvaluationSchedule::default(),
            status: EvaluationStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_join_only_when_open() {
        let open = evaluation(Phase::Registration, AccessMode::LinkOnly);
        assert!(can_join(&open, "bob@example.com").is_ok());

        let closed = evaluation(Phase::Grading, AccessMode::LinkOnly);
        assert_eq!(
            can_join(&closed, "bob@example.com"),
            Err(AccessError::PhaseClosed(Phase::Grading))
        );
    }

    #[test]
    fn test_access_list_is_case_insensitive() {
        let ev = evaluation(Phase::InProgress, AccessMode::LinkAndAccessList);
        assert!(can_join(&ev, " alice@example.COM ").is_ok());
        assert_eq!(
            can_join(&ev, "bob@example.com"),
            Err(AccessError::NotInAccessList("bob@example.com".to_string()))
        );
    }

    #[test]
    fn test_archived_rejected() {
        let mut ev = evaluation(Phase::Registration, AccessMode::LinkOnly);
        ev.status = EvaluationStatus::Archived;
        assert_eq!(can_join(&ev, "bob@example.com"), Err(AccessError::Archived));
    }

    #[test]
    fn test_session_changed() {
        let registration = UserOnEvaluation {
            evaluation_id: "ev1".to_string(),
            user_email: "bob@example.com".to_string(),
            status: UserOnEvaluationStatus::InProgress,
            registered_at: Utc::now(),
            original_session_id: Some("s1".to_string()),
            has_session_changed: false,
            session_change_detected_at: None,
        };
        assert!(!session_changed(&registration, Some("s1")));
        assert!(session_changed(&registration, Some("s2")));
        assert!(!session_changed(&registration, None));
    }
}
