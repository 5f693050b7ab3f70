use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static GROUP_SCOPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid group scope regex"));

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email.trim()) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 分组名会出现在页面路径中，只允许字母、数字、下划线和连字符
pub fn validate_group_scope(scope: &str) -> Result<(), &'static str> {
    if scope.is_empty() || scope.len() > 64 {
        return Err("Group scope length must be between 1 and 64 characters");
    }
    if !GROUP_SCOPE_RE.is_match(scope) {
        return Err("Group scope must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_label(label: &str) -> Result<(), &'static str> {
    let length = label.trim().chars().count();
    if length == 0 {
        return Err("Label is required");
    }
    if length > 200 {
        return Err("Label must be at most 200 characters");
    }
    Ok(())
}

/// 校验访问名单中的每个邮箱，返回第一个无效项
pub fn validate_access_list(list: &[String]) -> Result<(), String> {
    match list.iter().find(|email| validate_email(email).is_err()) {
        Some(invalid) => Err(format!("Invalid email in access list: {invalid}")),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email(" alice@example.com ").is_ok());
        assert!(validate_email("alice@").is_err());
        assert!(validate_email("alice.example.com").is_err());
    }

    #[test]
    fn test_validate_group_scope() {
        assert!(validate_group_scope("algo-2024").is_ok());
        assert!(validate_group_scope("").is_err());
        assert!(validate_group_scope("a/b").is_err());
    }

    #[test]
    fn test_validate_label() {
        assert!(validate_label("Midterm").is_ok());
        assert!(validate_label("   ").is_err());
        assert!(validate_label(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_access_list() {
        assert!(validate_access_list(&["a@example.com".to_string()]).is_ok());
        assert_eq!(
            validate_access_list(&["a@example.com".to_string(), "nope".to_string()]),
            Err("Invalid email in access list: nope".to_string())
        );
    }
}
