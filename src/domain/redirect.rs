//! 阶段页面重定向
//!
//! 每个阶段对应一个规范页面模板（`[param]` 为路径参数）。当前路径与当前阶段的
//! 模板不匹配时，通过 [`Navigator`] 跳转到规范页面；没有配置页面的阶段不做跳转。

use super::phase::Phase;

/// 页面视角
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Staff,
    Student,
}

pub const STAFF_SETTINGS: &str = "/[groupScope]/evaluations/[evaluationId]/settings";
pub const STAFF_COMPOSITION: &str = "/[groupScope]/evaluations/[evaluationId]/composition";
pub const STAFF_ATTENDANCE: &str = "/[groupScope]/evaluations/[evaluationId]/attendance";
pub const STAFF_PROGRESS: &str = "/[groupScope]/evaluations/[evaluationId]/progress";
pub const STAFF_GRADING: &str =
    "/[groupScope]/evaluations/[evaluationId]/grading/[activeQuestion]";
pub const STAFF_RESULTS: &str = "/[groupScope]/evaluations/[evaluationId]/results";

pub const STUDENT_JOIN: &str = "/users/evaluations/[evaluationId]/join";
pub const STUDENT_WAIT: &str = "/users/evaluations/[evaluationId]/wait";
pub const STUDENT_TAKE: &str = "/users/evaluations/[evaluationId]/take/[pageIndex]";
pub const STUDENT_CONSULT: &str = "/users/evaluations/[evaluationId]/consult/[questionIndex]";

/// 计算规范页面所需的上下文
#[derive(Debug, Clone, Copy)]
pub struct RouteContext<'a> {
    pub evaluation_id: &'a str,
    pub group_scope: &'a str,
    // 批改页默认定位到的第一位参与者
    pub first_participant: Option<&'a str>,
    // 学生是否已报名
    pub registered: bool,
}

/// 导航副作用，由宿主路由实现
pub trait Navigator {
    fn navigate(&mut self, href: &str);
}

/// 重定向判断结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    // 当前页面即规范页面（或阶段没有对应页面），照常渲染
    Render,
    Redirected(String),
}

/// 教师视角的阶段页面模板
pub fn staff_template(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::Settings => Some(STAFF_SETTINGS),
        Phase::Composition => Some(STAFF_COMPOSITION),
        Phase::Registration => Some(STAFF_ATTENDANCE),
        Phase::InProgress => Some(STAFF_PROGRESS),
        Phase::Grading => Some(STAFF_GRADING),
        Phase::Finished => Some(STAFF_RESULTS),
    }
}

/// 学生视角的阶段页面模板
pub fn student_template(phase: Phase, registered: bool) -> Option<&'static str> {
    match phase {
        Phase::Registration | Phase::InProgress if !registered => Some(STUDENT_JOIN),
        Phase::Registration | Phase::Grading => Some(STUDENT_WAIT),
        Phase::InProgress => Some(STUDENT_TAKE),
        Phase::Finished => Some(STUDENT_CONSULT),
        Phase::Settings | Phase::Composition => None,
    }
}

pub fn template_for(audience: Audience, phase: Phase, registered: bool) -> Option<&'static str> {
    match audience {
        Audience::Staff => staff_template(phase),
        Audience::Student => student_template(phase, registered),
    }
}

/// 规范页面地址
pub fn canonical_route(audience: Audience, phase: Phase, ctx: &RouteContext<'_>) -> Option<String> {
    let template = template_for(audience, phase, ctx.registered)?;
    let path = fill_template(template, |param| match param {
        "groupScope" => ctx.group_scope.to_string(),
        "evaluationId" => ctx.evaluation_id.to_string(),
        // 批改从第 1 题开始，学生作答与查看也从第 1 页开始
        "activeQuestion" | "pageIndex" | "questionIndex" => "1".to_string(),
        other => other.to_string(),
    });

    if template == STAFF_GRADING
        && let Some(participant) = ctx.first_participant
    {
        return Some(format!(
            "{path}?participantId={}",
            urlencoding::encode(participant)
        ));
    }
    Some(path)
}

fn fill_template(template: &str, value_of: impl Fn(&str) -> String) -> String {
    template
        .split('/')
        .map(|segment| {
            match segment
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
            {
                Some(param) => value_of(param),
                None => segment.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// 当前路径（忽略查询字符串和末尾斜杠）是否符合模板
pub fn path_matches_template(template: &str, current_route: &str) -> bool {
    let path = current_route.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');

    let template_segments: Vec<&str> = template.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();
    if template_segments.len() != path_segments.len() {
        return false;
    }

    template_segments
        .iter()
        .zip(path_segments.iter())
        .all(|(expected, actual)| {
            if expected.starts_with('[') && expected.ends_with(']') {
                !actual.is_empty()
            } else {
                expected == actual
            }
        })
}

/// 判断是否需要重定向，不执行跳转
pub fn resolve(
    audience: Audience,
    phase: Option<Phase>,
    current_route: &str,
    ctx: &RouteContext<'_>,
) -> RedirectOutcome {
    let Some(phase) = phase else {
        return RedirectOutcome::Render;
    };
    let Some(template) = template_for(audience, phase, ctx.registered) else {
        return RedirectOutcome::Render;
    };
    if path_matches_template(template, current_route) {
        return RedirectOutcome::Render;
    }
    match canonical_route(audience, phase, ctx) {
        Some(href) => RedirectOutcome::Redirected(href),
        None => RedirectOutcome::Render,
    }
}

/// 判断并在需要时执行一次跳转
pub fn redirect<N: Navigator + ?Sized>(
    audience: Audience,
    phase: Option<Phase>,
    current_route: &str,
    ctx: &RouteContext<'_>,
    navigator: &mut N,
) -> RedirectOutcome {
    let outcome = resolve(audience, phase, current_route, ctx);
    if let RedirectOutcome::Redirected(href) = &outcome {
        tracing::debug!("Redirecting from {} to {}", current_route, href);
        navigator.navigate(href);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingNavigator {
        calls: Vec<String>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&mut self, href: &str) {
            self.calls.push(href.to_string());
        }
    }

    fn ctx(registered: bool) -> RouteContext<'static> {
        RouteContext {
            evaluation_id: "ev1",
            group_scope: "algo",
            first_participant: Some("alice@example.com"),
            registered,
        }
    }

    #[test]
    fn test_grading_redirects_once_to_first_question_and_participant() {
        let mut navigator = RecordingNavigator::default();
        let outcome = redirect(
            Audience::Staff,
            Some(Phase::Grading),
            "/algo/evaluations/ev1/progress",
            &ctx(true),
            &mut navigator,
        );
        let expected = "/algo/evaluations/ev1/grading/1?participantId=alice%40example.com";
        assert_eq!(outcome, RedirectOutcome::Redirected(expected.to_string()));
        assert_eq!(navigator.calls, vec![expected.to_string()]);
    }

    #[test]
    fn test_participant_id_is_percent_encoded() {
        let context = RouteContext {
            first_participant: Some("a.b+tag@example.com"),
            ..ctx(true)
        };
        assert_eq!(
            canonical_route(Audience::Staff, Phase::Grading, &context).as_deref(),
            Some("/algo/evaluations/ev1/grading/1?participantId=a.b%2Btag%40example.com")
        );
    }

    #[test]
    fn test_matching_route_renders() {
        let mut navigator = RecordingNavigator::default();
        let outcome = redirect(
            Audience::Staff,
            Some(Phase::Grading),
            "/algo/evaluations/ev1/grading/4?participantId=bob@example.com",
            &ctx(true),
            &mut navigator,
        );
        assert_eq!(outcome, RedirectOutcome::Render);
        assert!(navigator.calls.is_empty());
    }

    #[test]
    fn test_unknown_phase_never_redirects() {
        let mut navigator = RecordingNavigator::default();
        let outcome = redirect(
            Audience::Staff,
            Phase::parse("DRAFT"),
            "/anything",
            &ctx(true),
            &mut navigator,
        );
        assert_eq!(outcome, RedirectOutcome::Render);
        assert!(navigator.calls.is_empty());
    }

    #[test]
    fn test_student_map() {
        assert_eq!(student_template(Phase::Settings, true), None);
        assert_eq!(student_template(Phase::Registration, false), Some(STUDENT_JOIN));
        assert_eq!(student_template(Phase::Registration, true), Some(STUDENT_WAIT));
        assert_eq!(student_template(Phase::InProgress, true), Some(STUDENT_TAKE));
        assert_eq!(student_template(Phase::Grading, false), Some(STUDENT_WAIT));
        assert_eq!(student_template(Phase::Finished, true), Some(STUDENT_CONSULT));
    }

    #[test]
    fn test_student_take_any_page_is_accepted() {
        let outcome = resolve(
            Audience::Student,
            Some(Phase::InProgress),
            "/users/evaluations/ev1/take/3",
            &ctx(true),
        );
        assert_eq!(outcome, RedirectOutcome::Render);

        let outcome = resolve(
            Audience::Student,
            Some(Phase::InProgress),
            "/users/evaluations/ev1/wait",
            &ctx(true),
        );
        assert_eq!(
            outcome,
            RedirectOutcome::Redirected("/users/evaluations/ev1/take/1".to_string())
        );
    }

    #[test]
    fn test_student_phase_without_page_renders() {
        let outcome = resolve(
            Audience::Student,
            Some(Phase::Composition),
            "/users/evaluations/ev1/take/1",
            &ctx(true),
        );
        assert_eq!(outcome, RedirectOutcome::Render);
    }

    #[test]
    fn test_path_matching() {
        assert!(path_matches_template(
            STAFF_RESULTS,
            "/algo/evaluations/ev1/results/"
        ));
        assert!(!path_matches_template(
            STAFF_RESULTS,
            "/algo/evaluations/ev1/results/extra"
        ));
        assert!(!path_matches_template(STAFF_GRADING, "/algo/evaluations/ev1/grading/"));
    }

    #[test]
    fn test_grading_without_participants() {
        let ctx = RouteContext {
            first_participant: None,
            ..ctx(true)
        };
        assert_eq!(
            canonical_route(Audience::Staff, Phase::Grading, &ctx),
            Some("/algo/evaluations/ev1/grading/1".to_string())
        );
    }
}
