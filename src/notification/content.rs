//! 通知内容解析
//!
//! `content` 可能是 JSON 对象，也可能是纯文本。解析结果是一个显式的标签枚举，
//! 调用方必须处理非结构化的分支，解析本身永远不会失败。

use serde_json::{Map, Value};

/// 摘要字段的优先顺序
const SUMMARY_FIELDS: [&str; 3] = ["message", "title", "text"];

/// 解析后的通知内容
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPayload<'a> {
    /// 解析为 JSON 对象
    Structured(Map<String, Value>),
    /// 纯文本、非法 JSON 或非对象的 JSON 值
    Unstructured(&'a str),
    /// 没有内容
    Absent,
}

impl<'a> ContentPayload<'a> {
    /// 解析 `content` 字段
    pub fn parse(content: Option<&'a str>) -> Self {
        let Some(raw) = content else {
            return ContentPayload::Absent;
        };

        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => ContentPayload::Structured(map),
            _ => ContentPayload::Unstructured(raw),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, ContentPayload::Structured(_))
    }

    /// 关联的活动 ID
    pub fn event_id(&self) -> Option<String> {
        self.reference_id("event_id")
    }

    /// 关联的社区 ID
    pub fn community_id(&self) -> Option<String> {
        self.reference_id("community_id")
    }

    /// 摘要文本：依次取 `message`、`title`、`text`
    pub fn summary_text(&self) -> Option<&str> {
        let ContentPayload::Structured(map) = self else {
            return None;
        };

        SUMMARY_FIELDS
            .iter()
            .filter_map(|field| map.get(*field).and_then(Value::as_str))
            .find(|s| !s.is_empty())
    }

    /// 原始字符串（结构化内容不保留原文，返回 None）
    pub fn raw(&self) -> Option<&'a str> {
        match self {
            ContentPayload::Unstructured(raw) => Some(raw),
            _ => None,
        }
    }

    /// 读取用于路由的 ID：整数（含整数值浮点数）或非空字符串
    fn reference_id(&self, key: &str) -> Option<String> {
        let ContentPayload::Structured(map) = self else {
            return None;
        };

        match map.get(key)? {
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
            // 42.0 这类整数值浮点数按整数渲染
            Value::Number(n) => n
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| (f as i64).to_string()),
            Value::String(s) => {
                let s = s.trim();
                // 包含 '/' 的 ID 会破坏路由结构
                if s.is_empty() || s.contains('/') {
                    None
                } else {
                    Some(s.to_string())
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structured() {
        let payload = ContentPayload::parse(Some(r#"{"event_id": 42}"#));
        assert!(payload.is_structured());
        assert_eq!(payload.event_id(), Some("42".to_string()));
        assert_eq!(payload.community_id(), None);
    }

    #[test]
    fn test_parse_plain_text() {
        let payload = ContentPayload::parse(Some("plain text"));
        assert_eq!(payload, ContentPayload::Unstructured("plain text"));
        assert_eq!(payload.event_id(), None);
        assert_eq!(payload.raw(), Some("plain text"));
    }

    #[test]
    fn test_parse_malformed_json() {
        let payload = ContentPayload::parse(Some(r#"{"event_id": 42"#));
        assert!(!payload.is_structured());
        assert_eq!(payload.event_id(), None);
    }

    #[test]
    fn test_parse_non_object_json() {
        // 合法 JSON 但不是对象，按纯文本处理
        for raw in ["42", "[1,2]", r#""quoted""#, "null", "true"] {
            let payload = ContentPayload::parse(Some(raw));
            assert_eq!(payload, ContentPayload::Unstructured(raw), "input: {}", raw);
        }
    }

    #[test]
    fn test_parse_absent() {
        let payload = ContentPayload::parse(None);
        assert_eq!(payload, ContentPayload::Absent);
        assert_eq!(payload.summary_text(), None);
        assert_eq!(payload.raw(), None);
    }

    #[test]
    fn test_string_ids() {
        let payload = ContentPayload::parse(Some(r#"{"community_id": " 3 ", "event_id": ""}"#));
        assert_eq!(payload.community_id(), Some("3".to_string()));
        assert_eq!(payload.event_id(), None);
    }

    #[test]
    fn test_rejected_ids() {
        let payload = ContentPayload::parse(Some(
            r#"{"event_id": null, "community_id": 1.5}"#,
        ));
        assert_eq!(payload.event_id(), None);
        assert_eq!(payload.community_id(), None);

        let payload = ContentPayload::parse(Some(r#"{"event_id": "../admin"}"#));
        assert_eq!(payload.event_id(), None);
    }

    #[test]
    fn test_whole_float_ids() {
        let payload = ContentPayload::parse(Some(r#"{"event_id": 42.0, "community_id": -3.0}"#));
        assert_eq!(payload.event_id(), Some("42".to_string()));
        assert_eq!(payload.community_id(), Some("-3".to_string()));

        let payload = ContentPayload::parse(Some(r#"{"event_id": 1e300}"#));
        assert_eq!(payload.event_id(), None);
    }

    #[test]
    fn test_summary_field_order() {
        let payload = ContentPayload::parse(Some(
            r#"{"text": "c", "title": "b", "message": "a"}"#,
        ));
        assert_eq!(payload.summary_text(), Some("a"));

        let payload = ContentPayload::parse(Some(r#"{"text": "c", "title": "b"}"#));
        assert_eq!(payload.summary_text(), Some("b"));

        let payload = ContentPayload::parse(Some(r#"{"text": "c", "message": ""}"#));
        assert_eq!(payload.summary_text(), Some("c"));

        let payload = ContentPayload::parse(Some(r#"{"message": 5}"#));
        assert_eq!(payload.summary_text(), None);
    }
}
