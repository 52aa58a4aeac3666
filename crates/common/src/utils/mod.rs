/// 工具函数集合

use uuid::Uuid;

/// 生成唯一会话 ID
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// 规范化路由前缀：以 `/` 开头、不以 `/` 结尾，根路径返回空串
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// 拼接 API 前缀与路径，去掉多余的斜杠
pub fn join_path(prefix: &str, path: &str) -> String {
    format!("{}/{}", normalize_prefix(prefix), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_id() {
        let id1 = generate_session_id();
        let id2 = generate_session_id();
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36); // UUID v4 格式
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/api/v1"), "/api/v1");
        assert_eq!(normalize_prefix("api/v1"), "/api/v1");
        assert_eq!(normalize_prefix("/api/v1/"), "/api/v1");
        assert_eq!(normalize_prefix(" api/v1 "), "/api/v1");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix(""), "");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/api/v1", "session/ws"), "/api/v1/session/ws");
        assert_eq!(join_path("/api/v1/", "/session/ws"), "/api/v1/session/ws");
        assert_eq!(join_path("api/v1", "ping"), "/api/v1/ping");
        assert_eq!(join_path("", "ping"), "/ping");
    }
}
