//! 批改签署状态机
//!
//! 批改状态（UNGRADED / AUTOGRADED / GRADED）与签署状态（signed_by）相互独立。

use crate::models::answers::entities::{GradingStatus, StudentGrading};

const POINTS_EPSILON: f64 = 1e-9;

fn same_points(a: f64, b: f64) -> bool {
    (a - b).abs() < POINTS_EPSILON
}

/// 自动批改的分数是否被人工改动过
pub fn manually_changed(grading: &StudentGrading) -> bool {
    match grading.autograded_points {
        Some(points) => !same_points(points, grading.points_obtained),
        None => false,
    }
}

/// 签署批改
///
/// UNGRADED 变为 GRADED；AUTOGRADED 只有在分数被人工改动时才变为 GRADED。
/// 重复签署状态不变，签署人更新为最近一次的签署者。
pub fn sign_off(grading: &StudentGrading, signer: &str, max_points: f64) -> StudentGrading {
    let status = match grading.status {
        GradingStatus::Ungraded | GradingStatus::Graded => GradingStatus::Graded,
        GradingStatus::Autograded if manually_changed(grading) => GradingStatus::Graded,
        GradingStatus::Autograded => GradingStatus::Autograded,
    };
    StudentGrading {
        status,
        is_correct: same_points(grading.points_obtained, max_points),
        signed_by: Some(signer.to_string()),
        ..grading.clone()
    }
}

/// 撤销签署：GRADED 回到 UNGRADED，AUTOGRADED 保持不变
pub fn unsign(grading: &StudentGrading) -> StudentGrading {
    let status = match grading.status {
        GradingStatus::Graded => GradingStatus::Ungraded,
        other => other,
    };
    StudentGrading {
        status,
        signed_by: None,
        ..grading.clone()
    }
}

/// 已签署则撤销，否则签署
pub fn toggle(grading: &StudentGrading, signer: &str, max_points: f64) -> StudentGrading {
    if grading.is_signed() {
        unsign(grading)
    } else {
        sign_off(grading, signer, max_points)
    }
}

/// 选出所有未签署的自动批改并写入签署人
///
/// 返回值只包含发生变化的条目，键原样带回，由调用方逐条持久化。
pub fn sign_off_all_autograded<'a, K, I>(gradings: I, signer: &str) -> Vec<(K, StudentGrading)>
where
    I: IntoIterator<Item = (K, &'a StudentGrading)>,
{
    gradings
        .into_iter()
        .filter(|(_, grading)| grading.status == GradingStatus::Autograded && !grading.is_signed())
        .map(|(key, grading)| {
            let signed = StudentGrading {
                signed_by: Some(signer.to_string()),
                ..grading.clone()
            };
            (key, signed)
        })
        .collect()
}

/// 人工给分限制在 `[0, max_points]`
pub fn clamp_points(points: f64, max_points: f64) -> f64 {
    if points.is_nan() {
        return 0.0;
    }
    points.clamp(0.0, max_points.max(0.0))
}

/// 人工修改得分与评语，状态留给签署时判定
pub fn regrade(
    grading: &StudentGrading,
    points: Option<f64>,
    comment: Option<String>,
    max_points: f64,
) -> StudentGrading {
    let mut updated = grading.clone();
    if let Some(points) = points {
        updated.points_obtained = clamp_points(points, max_points);
    }
    if comment.is_some() {
        updated.comment = comment;
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn autograded(points: f64) -> StudentGrading {
        StudentGrading {
            points_obtained: points,
            status: GradingStatus::Autograded,
            autograded_points: Some(points),
            ..StudentGrading::default()
        }
    }

    #[test]
    fn test_sign_off_ungraded() {
        let grading = StudentGrading {
            points_obtained: 3.0,
            ..StudentGrading::default()
        };
        let signed = sign_off(&grading, "prof@example.com", 3.0);
        assert_eq!(signed.status, GradingStatus::Graded);
        assert_eq!(signed.signed_by.as_deref(), Some("prof@example.com"));
        assert!(signed.is_correct);
        assert_eq!(signed.points_obtained, 3.0);
    }

    #[test]
    fn test_sign_off_then_unsign_from_ungraded() {
        let restored = unsign(&sign_off(&StudentGrading::default(), "prof@example.com", 2.0));
        assert_eq!(restored.status, GradingStatus::Ungraded);
        assert_eq!(restored.signed_by, None);
    }

    #[test]
    fn test_sign_off_autograded_keeps_status() {
        let signed = sign_off(&autograded(2.0), "prof@example.com", 2.0);
        assert_eq!(signed.status, GradingStatus::Autograded);
        assert!(signed.is_correct);

        let restored = unsign(&signed);
        assert_eq!(restored.status, GradingStatus::Autograded);
        assert_eq!(restored.signed_by, None);
    }

    #[test]
    fn test_sign_off_autograded_after_manual_change() {
        let mut grading = autograded(0.0);
        grading.points_obtained = 1.0;
        let signed = sign_off(&grading, "prof@example.com", 2.0);
        assert_eq!(signed.status, GradingStatus::Graded);
        assert!(!signed.is_correct);
    }

    #[test]
    fn test_double_sign_off() {
        let once = sign_off(&StudentGrading::default(), "a@example.com", 1.0);
        let twice = sign_off(&once, "b@example.com", 1.0);
        assert_eq!(twice.status, GradingStatus::Graded);
        assert_eq!(twice.signed_by.as_deref(), Some("b@example.com"));
    }

    #[test]
    fn test_toggle() {
        let grading = StudentGrading::default();
        let signed = toggle(&grading, "prof@example.com", 1.0);
        assert!(signed.is_signed());
        let unsigned = toggle(&signed, "prof@example.com", 1.0);
        assert!(!unsigned.is_signed());
        assert_eq!(unsigned.status, GradingStatus::Ungraded);
    }

    #[test]
    fn test_sign_off_all_autograded() {
        let ungraded = StudentGrading::default();
        let pending = autograded(1.0);
        let already = sign_off(&autograded(1.0), "other@example.com", 1.0);
        let items = vec![("a", &ungraded), ("b", &pending), ("c", &already)];

        let signed = sign_off_all_autograded(items, "prof@example.com");
        assert_eq!(signed.len(), 1);
        assert_eq!(signed[0].0, "b");
        assert_eq!(signed[0].1.signed_by.as_deref(), Some("prof@example.com"));
        assert_eq!(signed[0].1.status, GradingStatus::Autograded);
    }

    #[test]
    fn test_clamp_points() {
        assert_eq!(clamp_points(5.0, 3.0), 3.0);
        assert_eq!(clamp_points(-1.0, 3.0), 0.0);
        assert_eq!(clamp_points(1.5, 3.0), 1.5);
        assert_eq!(clamp_points(f64::NAN, 3.0), 0.0);
    }

    #[test]
    fn test_regrade() {
        let updated = regrade(&autograded(0.0), Some(4.0), Some("ok".to_string()), 3.0);
        assert_eq!(updated.points_obtained, 3.0);
        assert_eq!(updated.status, GradingStatus::Autograded);
        assert!(manually_changed(&updated));
        assert_eq!(updated.comment.as_deref(), Some("ok"));

        let unchanged = regrade(&updated, None, None, 3.0);
        assert_eq!(unchanged, updated);
    }
}
