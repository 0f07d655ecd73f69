//! 通知分类器 - 决定通知的跳转目标和摘要
//!
//! 纯函数，没有副作用。角色由调用方从会话中传入，分类器本身不推断角色。
//!
//! | 类型 | 目标 |
//! |---|---|
//! | `connection` | `/{role}/connections` |
//! | `message` | `/{role}/messages` |
//! | `event`, `event_invitation`, `volunteer_event` | `/{role}/events[/{event_id}]` |
//! | `community_question`, `community_reply` | `/{role}/communities[/{community_id}]` |
//! | `insight` | `/{role}/insights` |
//! | 其他 | `/{role}/notifications/{id}` |

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::content::ContentPayload;
use super::record::{Notification, NotificationId, NotificationKind};

/// 内容为空时的默认摘要
pub const DEFAULT_SUMMARY: &str = "Notification";

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Alumni,
    Faculty,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Alumni => "alumni",
            Role::Faculty => "faculty",
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "alumni" => Ok(Role::Alumni),
            "faculty" => Ok(Role::Faculty),
            other => Err(anyhow!(
                "Unknown role '{}', expected one of: student, alumni, faculty",
                other
            )),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 角色下的页面分区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Connections,
    Messages,
    Events,
    Communities,
    Insights,
    Notifications,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Connections => "connections",
            Section::Messages => "messages",
            Section::Events => "events",
            Section::Communities => "communities",
            Section::Insights => "insights",
            Section::Notifications => "notifications",
        }
    }
}

/// 跳转目标，渲染为 `/{role}/{section}[/{id}]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    pub role: Role,
    pub section: Section,
    pub id: Option<String>,
}

impl Destination {
    /// 列表页
    pub fn listing(role: Role, section: Section) -> Self {
        Self {
            role,
            section,
            id: None,
        }
    }

    /// 详情页
    pub fn detail(role: Role, section: Section, id: impl Into<String>) -> Self {
        Self {
            role,
            section,
            id: Some(id.into()),
        }
    }

    pub fn is_detail(&self) -> bool {
        self.id.is_some()
    }

    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.role, self.section.as_str())?;
        if let Some(id) = &self.id {
            write!(f, "/{}", id)?;
        }
        Ok(())
    }
}

impl Serialize for Destination {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 分类后的通知（供列表展示和 JSON 输出）
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedNotification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    pub summary: String,
    pub destination: Destination,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// 通知分类器
#[derive(Debug, Clone, Copy)]
pub struct NotificationClassifier {
    role: Role,
}

impl NotificationClassifier {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// 计算跳转目标
    pub fn destination(&self, notification: &Notification) -> Destination {
        let role = self.role;
        let payload = || ContentPayload::parse(notification.content.as_deref());

        match &notification.kind {
            NotificationKind::Connection => Destination::listing(role, Section::Connections),
            NotificationKind::Message => Destination::listing(role, Section::Messages),
            kind if kind.is_event_related() => match payload().event_id() {
                Some(id) => Destination::detail(role, Section::Events, id),
                None => Destination::listing(role, Section::Events),
            },
            kind if kind.is_community_related() => match payload().community_id() {
                Some(id) => Destination::detail(role, Section::Communities, id),
                None => Destination::listing(role, Section::Communities),
            },
            NotificationKind::Insight => Destination::listing(role, Section::Insights),
            _ => Destination::detail(role, Section::Notifications, notification.id.to_string()),
        }
    }

    /// 计算摘要（与角色无关）
    pub fn summary(&self, notification: &Notification) -> String {
        summarize(notification)
    }

    /// 同时计算目标和摘要
    pub fn classify(&self, notification: &Notification) -> ClassifiedNotification {
        ClassifiedNotification {
            id: notification.id,
            kind: notification.kind.clone(),
            read: notification.read,
            summary: summarize(notification),
            destination: self.destination(notification),
            created_at: notification.created_at,
        }
    }
}

/// 摘要：结构化字段 > 原始内容 > 默认标签
pub fn summarize(notification: &Notification) -> String {
    let Some(raw) = notification
        .content
        .as_deref()
        .filter(|c| !c.trim().is_empty())
    else {
        return DEFAULT_SUMMARY.to_string();
    };

    ContentPayload::parse(Some(raw))
        .summary_text()
        .unwrap_or(raw)
        .to_string()
}
