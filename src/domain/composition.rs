//! 组卷规则
//!
//! 组卷顺序始终是 0..N-1 的连续编号；阶段越过 COMPOSITION 后组卷锁定。

use std::collections::HashSet;
use std::fmt;

use super::phase::{Phase, composition_locked};

#[derive(Debug, Clone, PartialEq)]
pub enum CompositionError {
    Locked(Phase),
    InvalidPermutation(String),
    UnknownQuestion(String),
    NonPositivePoints(f64),
    AlreadyComposed(String),
}

impl fmt::Display for CompositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositionError::Locked(phase) => {
                write!(f, "composition is locked in phase {phase}")
            }
            CompositionError::InvalidPermutation(reason) => {
                write!(f, "invalid question order: {reason}")
            }
            CompositionError::UnknownQuestion(id) => {
                write!(f, "question {id} is not part of this composition")
            }
            CompositionError::NonPositivePoints(points) => {
                write!(f, "points must be positive, got {points}")
            }
            CompositionError::AlreadyComposed(id) => {
                write!(f, "question {id} is already composed")
            }
        }
    }
}

impl std::error::Error for CompositionError {}

pub fn ensure_unlocked(phase: Phase) -> Result<(), CompositionError> {
    if composition_locked(phase) {
        return Err(CompositionError::Locked(phase));
    }
    Ok(())
}

pub fn validate_points(points: f64) -> Result<(), CompositionError> {
    if !points.is_finite() || points <= 0.0 {
        return Err(CompositionError::NonPositivePoints(points));
    }
    Ok(())
}

/// 校验新顺序是当前题目的一个完整排列，返回 `(question_id, order)`
pub fn reorder(
    current: &[String],
    requested: &[String],
) -> Result<Vec<(String, u32)>, CompositionError> {
    if current.len() != requested.len() {
        return Err(CompositionError::InvalidPermutation(format!(
            "expected {} questions, got {}",
            current.len(),
            requested.len()
        )));
    }

    let known: HashSet<&str> = current.iter().map(String::as_str).collect();
    let mut seen = HashSet::with_capacity(requested.len());
    for id in requested {
        if !known.contains(id.as_str()) {
            return Err(CompositionError::UnknownQuestion(id.clone()));
        }
        if !seen.insert(id.as_str()) {
            return Err(CompositionError::InvalidPermutation(format!(
                "question {id} appears more than once"
            )));
        }
    }

    Ok(renumber(requested))
}

/// 把一道题移动到新位置，其余题目顺延
pub fn move_question(
    current: &[String],
    question_id: &str,
    new_index: usize,
) -> Result<Vec<(String, u32)>, CompositionError> {
    let from = current
        .iter()
        .position(|id| id == question_id)
        .ok_or_else(|| CompositionError::UnknownQuestion(question_id.to_string()))?;

    let mut ids = current.to_vec();
    let moved = ids.remove(from);
    ids.insert(new_index.min(ids.len()), moved);
    Ok(renumber(&ids))
}

/// 按给定顺序重新编号为 0..N-1
pub fn renumber(ids: &[String]) -> Vec<(String, u32)> {
    ids.iter()
        .enumerate()
        .map(|(index, id)| (id.clone(), index as u32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_locked_after_composition() {
        assert!(ensure_unlocked(Phase::Settings).is_ok());
        assert!(ensure_unlocked(Phase::Composition).is_ok());
        assert_eq!(
            ensure_unlocked(Phase::Registration),
            Err(CompositionError::Locked(Phase::Registration))
        );
    }

    #[test]
    fn test_reorder_is_contiguous() {
        let result = reorder(&ids(&["a", "b", "c"]), &ids(&["c", "a", "b"])).unwrap();
        assert_eq!(
            result,
            vec![
                ("c".to_string(), 0),
                ("a".to_string(), 1),
                ("b".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_reorder_rejects_bad_permutations() {
        let current = ids(&["a", "b"]);
        assert!(matches!(
            reorder(&current, &ids(&["a"])),
            Err(CompositionError::InvalidPermutation(_))
        ));
        assert!(matches!(
            reorder(&current, &ids(&["a", "a"])),
            Err(CompositionError::InvalidPermutation(_))
        ));
        assert_eq!(
            reorder(&current, &ids(&["a", "z"])),
            Err(CompositionError::UnknownQuestion("z".to_string()))
        );
    }

    #[test]
    fn test_move_question() {
        let result = move_question(&ids(&["a", "b", "c"]), "a", 5).unwrap();
        let order: Vec<&str> = result.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert_eq!(result[2].1, 2);
        assert!(move_question(&ids(&["a"]), "x", 0).is_err());
    }

    #[test]
    fn test_validate_points() {
        assert!(validate_points(0.5).is_ok());
        assert!(validate_points(0.0).is_err());
        assert!(validate_points(-2.0).is_err());
        assert!(validate_points(f64::INFINITY).is_err());
    }
}
