//! 评测阶段图
//!
//! 阶段按固定顺序单向推进，评测与 Jam Session 各有一条阶段序列。

use std::fmt;

pub use crate::models::evaluations::entities::Phase;
use crate::models::evaluations::requests::PhaseGraphKind;

/// 未知阶段的显示文本
pub const UNKNOWN_PHASE_LABEL: &str = "N/A";

/// 一条有序的阶段序列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseGraph {
    phases: &'static [Phase],
}

/// 评测阶段序列
pub const EVALUATION_PHASES: PhaseGraph = PhaseGraph {
    phases: &[
        Phase::Settings,
        Phase::Composition,
        Phase::Registration,
        Phase::InProgress,
        Phase::Grading,
        Phase::Finished,
    ],
};

/// Jam Session 阶段序列（没有 SETTINGS）
pub const JAM_SESSION_PHASES: PhaseGraph = PhaseGraph {
    phases: &[
        Phase::Composition,
        Phase::Registration,
        Phase::InProgress,
        Phase::Grading,
        Phase::Finished,
    ],
};

impl PhaseGraph {
    pub fn for_kind(kind: PhaseGraphKind) -> Self {
        match kind {
            PhaseGraphKind::Evaluation => EVALUATION_PHASES,
            PhaseGraphKind::JamSession => JAM_SESSION_PHASES,
        }
    }

    pub fn phases(&self) -> &'static [Phase] {
        self.phases
    }

    pub fn index_of(&self, phase: Phase) -> Option<usize> {
        self.phases.iter().position(|p| *p == phase)
    }

    pub fn first(&self) -> Phase {
        self.phases[0]
    }

    /// `a` 是否严格位于 `b` 之后；任一阶段不在序列中时返回 false
    pub fn greater_than(&self, a: Phase, b: Phase) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(ia), Some(ib)) => ia > ib,
            _ => false,
        }
    }

    /// 下一阶段；终止阶段或不在序列中时返回 None
    pub fn next(&self, current: Phase) -> Option<Phase> {
        self.index_of(current)
            .and_then(|idx| self.phases.get(idx + 1))
            .copied()
    }

    /// 只允许推进到紧邻的下一阶段
    pub fn validate_transition(
        &self,
        current: Phase,
        requested: Phase,
    ) -> Result<(), PhaseTransitionError> {
        if self.index_of(current).is_none() {
            return Err(PhaseTransitionError::UnknownPhase(current));
        }
        if self.index_of(requested).is_none() {
            return Err(PhaseTransitionError::UnknownPhase(requested));
        }
        match self.next(current) {
            None => Err(PhaseTransitionError::Terminal(current)),
            Some(next) if next == requested => Ok(()),
            Some(_) => Err(PhaseTransitionError::NotSuccessor { current, requested }),
        }
    }
}

/// 评测阶段序列上的比较
pub fn phase_greater_than(a: Phase, b: Phase) -> bool {
    EVALUATION_PHASES.greater_than(a, b)
}

/// 组卷在 COMPOSITION 之后锁定
pub fn composition_locked(phase: Phase) -> bool {
    phase_greater_than(phase, Phase::Composition)
}

/// 阶段的展示信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDetails {
    pub menu_key: &'static str,
    pub next_action_label: Option<&'static str>,
}

pub fn phase_details(phase: Phase) -> PhaseDetails {
    match phase {
        Phase::Settings => PhaseDetails {
            menu_key: "settings",
            next_action_label: Some("Proceed to composition"),
        },
        Phase::Composition => PhaseDetails {
            menu_key: "composition",
            next_action_label: Some("Open registration"),
        },
        Phase::Registration => PhaseDetails {
            menu_key: "attendance",
            next_action_label: Some("Start evaluation"),
        },
        Phase::InProgress => PhaseDetails {
            menu_key: "progress",
            next_action_label: Some("End evaluation"),
        },
        Phase::Grading => PhaseDetails {
            menu_key: "grading",
            next_action_label: Some("End grading"),
        },
        Phase::Finished => PhaseDetails {
            menu_key: "results",
            next_action_label: None,
        },
    }
}

/// 阶段在给定序列中的显示文本，无法识别或不属于该序列时为 "N/A"
pub fn phase_label(graph: &PhaseGraph, phase: Option<Phase>) -> &'static str {
    match phase {
        Some(phase) if graph.index_of(phase).is_some() => phase.as_str(),
        _ => UNKNOWN_PHASE_LABEL,
    }
}

/// 离开某一阶段前需要满足的条件
pub fn validate_leaving(
    phase: Phase,
    label: &str,
    composed_questions: usize,
) -> Result<(), PhaseTransitionError> {
    match phase {
        Phase::Settings if label.trim().is_empty() => Err(PhaseTransitionError::MissingLabel),
        Phase::Composition if label.trim().is_empty() => Err(PhaseTransitionError::MissingLabel),
        Phase::Composition if composed_questions == 0 => {
            Err(PhaseTransitionError::EmptyComposition)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseTransitionError {
    UnknownPhase(Phase),
    Terminal(Phase),
    NotSuccessor { current: Phase, requested: Phase },
    MissingLabel,
    EmptyComposition,
}

impl fmt::Display for PhaseTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseTransitionError::UnknownPhase(phase) => {
                write!(f, "phase {phase} is not part of this lifecycle")
            }
            PhaseTransitionError::Terminal(phase) => {
                write!(f, "phase {phase} is terminal")
            }
            PhaseTransitionError::NotSuccessor { current, requested } => write!(
                f,
                "cannot move from {current} to {requested}, only the next phase is allowed"
            ),
            PhaseTransitionError::MissingLabel => write!(f, "label is required"),
            PhaseTransitionError::EmptyComposition => {
                write!(f, "at least one question must be composed")
            }
        }
    }
}

impl std::error::Error for PhaseTransitionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greater_than_matches_index_order() {
        for graph in [EVALUATION_PHASES, JAM_SESSION_PHASES] {
            let phases = graph.phases();
            for (ia, a) in phases.iter().enumerate() {
                for (ib, b) in phases.iter().enumerate() {
                    assert_eq!(graph.greater_than(*a, *b), ia > ib, "{a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn test_greater_than_is_strict() {
        for phase in EVALUATION_PHASES.phases() {
            assert!(!phase_greater_than(*phase, *phase));
        }
    }

    #[test]
    fn test_next_phase() {
        assert_eq!(EVALUATION_PHASES.next(Phase::Settings), Some(Phase::Composition));
        assert_eq!(EVALUATION_PHASES.next(Phase::InProgress), Some(Phase::Grading));
        assert_eq!(EVALUATION_PHASES.next(Phase::Finished), None);
    }

    #[test]
    fn test_jam_session_has_no_settings() {
        assert_eq!(JAM_SESSION_PHASES.first(), Phase::Composition);
        assert_eq!(JAM_SESSION_PHASES.next(Phase::Settings), None);
        assert!(!JAM_SESSION_PHASES.greater_than(Phase::Composition, Phase::Settings));
    }

    #[test]
    fn test_validate_transition() {
        assert!(
            EVALUATION_PHASES
                .validate_transition(Phase::Settings, Phase::Composition)
                .is_ok()
        );
        assert_eq!(
            EVALUATION_PHASES.validate_transition(Phase::Settings, Phase::Registration),
            Err(PhaseTransitionError::NotSuccessor {
                current: Phase::Settings,
                requested: Phase::Registration,
            })
        );
        // 不允许回退
        assert!(
            EVALUATION_PHASES
                .validate_transition(Phase::Grading, Phase::InProgress)
                .is_err()
        );
        assert_eq!(
            EVALUATION_PHASES.validate_transition(Phase::Finished, Phase::Finished),
            Err(PhaseTransitionError::Terminal(Phase::Finished))
        );
        assert_eq!(
            JAM_SESSION_PHASES.validate_transition(Phase::Settings, Phase::Composition),
            Err(PhaseTransitionError::UnknownPhase(Phase::Settings))
        );
    }

    #[test]
    fn test_composition_locked() {
        assert!(!composition_locked(Phase::Settings));
        assert!(!composition_locked(Phase::Composition));
        assert!(composition_locked(Phase::Registration));
        assert!(composition_locked(Phase::Finished));
    }

    #[test]
    fn test_phase_details() {
        assert_eq!(phase_details(Phase::Registration).menu_key, "attendance");
        assert_eq!(phase_details(Phase::Finished).next_action_label, None);
        for phase in &EVALUATION_PHASES.phases()[..5] {
            assert!(phase_details(*phase).next_action_label.is_some());
        }
    }

    #[test]
    fn test_phase_label_fallback() {
        assert_eq!(
            phase_label(&EVALUATION_PHASES, Phase::parse("GRADING")),
            "GRADING"
        );
        assert_eq!(
            phase_label(&EVALUATION_PHASES, Phase::parse("ARCHIVED")),
            UNKNOWN_PHASE_LABEL
        );
        assert_eq!(phase_label(&EVALUATION_PHASES, Phase::parse("")), "N/A");
        assert_eq!(
            phase_label(&JAM_SESSION_PHASES, Some(Phase::Settings)),
            "N/A"
        );
        assert_eq!(
            PhaseGraph::for_kind(PhaseGraphKind::JamSession),
            JAM_SESSION_PHASES
        );
    }

    #[test]
    fn test_validate_leaving() {
        assert_eq!(
            validate_leaving(Phase::Settings, "  ", 0),
            Err(PhaseTransitionError::MissingLabel)
        );
        assert_eq!(
            validate_leaving(Phase::Composition, "Midterm", 0),
            Err(PhaseTransitionError::EmptyComposition)
        );
        assert!(validate_leaving(Phase::Composition, "Midterm", 3).is_ok());
        assert!(validate_leaving(Phase::InProgress, "", 0).is_ok());
    }
}
