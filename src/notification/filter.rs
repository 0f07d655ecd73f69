//! 通知列表过滤

use regex::Regex;
use serde::Serialize;

use super::classifier::summarize;
use super::record::{Notification, NotificationKind};

/// 列表过滤条件
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationFilter {
    /// 只返回未读
    pub unread_only: bool,
    /// 按类型过滤（为空表示不过滤）
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<NotificationKind>,
    /// 匹配摘要或原始内容
    #[serde(skip)]
    pub pattern: Option<Regex>,
    /// 限制返回数量
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl NotificationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unread_only(mut self, unread_only: bool) -> Self {
        self.unread_only = unread_only;
        self
    }

    pub fn kind(mut self, kind: impl Into<NotificationKind>) -> Self {
        self.kinds.push(kind.into());
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// 单条是否匹配
    pub fn matches(&self, notification: &Notification) -> bool {
        if self.unread_only && !notification.is_unread() {
            return false;
        }
        if !self.kinds.is_empty() && !self.kinds.contains(&notification.kind) {
            return false;
        }
        if let Some(re) = &self.pattern {
            let in_summary = re.is_match(&summarize(notification));
            let in_content = notification
                .content
                .as_deref()
                .map(|c| re.is_match(c))
                .unwrap_or(false);
            if !in_summary && !in_content {
                return false;
            }
        }
        true
    }

    /// 过滤并按时间倒序排列
    pub fn apply(&self, notifications: Vec<Notification>) -> Vec<Notification> {
        let mut matched: Vec<Notification> =
            notifications.into_iter().filter(|n| self.matches(n)).collect();
        sort_newest_first(&mut matched);

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }
}

/// 按创建时间倒序，缺失时间的排在最后，同时间按 ID 倒序
pub fn sort_newest_first(notifications: &mut [Notification]) {
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

/// 未读数量
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| n.is_unread()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> Vec<Notification> {
        vec![
            Notification::new(1, "message")
                .with_content(r#"{"message":"Lunch on Friday?"}"#)
                .with_created_at(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()),
            Notification::new(2, "event")
                .with_content(r#"{"event_id": 5, "title": "Career fair"}"#)
                .with_read(true)
                .with_created_at(Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap()),
            Notification::new(3, "connection").with_content("Priya wants to connect"),
        ]
    }

    #[test]
    fn test_default_filter_sorts() {
        let ids: Vec<_> = NotificationFilter::new()
            .apply(sample())
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_unread_and_kind() {
        let result = NotificationFilter::new().unread_only(true).apply(sample());
        assert_eq!(result.len(), 2);

        let result = NotificationFilter::new()
            .kind("event")
            .kind("connection")
            .apply(sample());
        let ids: Vec<_> = result.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_pattern_matches_summary_and_raw_content() {
        let re = Regex::new("(?i)career").unwrap();
        let result = NotificationFilter::new().pattern(re).apply(sample());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);

        // event_id 只出现在原始内容中
        let re = Regex::new("event_id").unwrap();
        assert_eq!(NotificationFilter::new().pattern(re).apply(sample()).len(), 1);
    }

    #[test]
    fn test_limit() {
        let result = NotificationFilter::new().limit(1).apply(sample());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);
    }

    #[test]
    fn test_unread_count() {
        assert_eq!(unread_count(&sample()), 2);
        assert_eq!(unread_count(&[]), 0);
    }
}
