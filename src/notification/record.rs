//! 通知记录 - 后端 `/notifications` 返回的数据结构
//!
//! 只有 `read` 字段会在本地发生变化，`type`/`content` 创建后不可变。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// 通知 ID（后端自增整数）
pub type NotificationId = i64;

/// 通知记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    /// 通知类型（`type` 字段）
    #[serde(rename = "type", default, deserialize_with = "deserialize_kind")]
    pub kind: NotificationKind,
    /// JSON 编码的对象或纯文本，编码方式不保证
    #[serde(default, deserialize_with = "deserialize_content")]
    pub content: Option<String>,
    /// 是否已读，null 或非布尔值视为未读
    #[serde(default, deserialize_with = "deserialize_read")]
    pub read: bool,
    /// 创建时间，仅用于展示和排序
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// 创建新的未读通知
    pub fn new(id: NotificationId, kind: impl Into<NotificationKind>) -> Self {
        Self {
            id,
            kind: kind.into(),
            content: None,
            read: false,
            created_at: None,
        }
    }

    /// 设置内容（链式调用）
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// 设置已读标记（链式调用）
    pub fn with_read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }

    /// 设置创建时间（链式调用）
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// 当前读取状态
    pub fn read_state(&self) -> ReadState {
        ReadState::from(self.read)
    }

    pub fn is_unread(&self) -> bool {
        !self.read
    }
}

/// 通知类型
///
/// 未知类型保存在 `Other`，缺失为 `Missing`，两者都由分类器走默认路由。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum NotificationKind {
    Connection,
    Message,
    Event,
    EventInvitation,
    VolunteerEvent,
    CommunityQuestion,
    CommunityReply,
    Insight,
    /// 未识别的类型
    Other(String),
    /// 缺失或为空
    #[default]
    Missing,
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationKind::Connection => "connection",
            NotificationKind::Message => "message",
            NotificationKind::Event => "event",
            NotificationKind::EventInvitation => "event_invitation",
            NotificationKind::VolunteerEvent => "volunteer_event",
            NotificationKind::CommunityQuestion => "community_question",
            NotificationKind::CommunityReply => "community_reply",
            NotificationKind::Insight => "insight",
            NotificationKind::Other(raw) => raw,
            NotificationKind::Missing => "",
        }
    }

    /// 是否属于活动相关通知
    pub fn is_event_related(&self) -> bool {
        matches!(
            self,
            NotificationKind::Event
                | NotificationKind::EventInvitation
                | NotificationKind::VolunteerEvent
        )
    }

    /// 是否属于社区问答通知
    pub fn is_community_related(&self) -> bool {
        matches!(
            self,
            NotificationKind::CommunityQuestion | NotificationKind::CommunityReply
        )
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, NotificationKind::Other(_) | NotificationKind::Missing)
    }
}

impl From<&str> for NotificationKind {
    fn from(raw: &str) -> Self {
        match raw {
            "connection" => NotificationKind::Connection,
            "message" => NotificationKind::Message,
            "event" => NotificationKind::Event,
            "event_invitation" => NotificationKind::EventInvitation,
            "volunteer_event" => NotificationKind::VolunteerEvent,
            "community_question" => NotificationKind::CommunityQuestion,
            "community_reply" => NotificationKind::CommunityReply,
            "insight" => NotificationKind::Insight,
            "" => NotificationKind::Missing,
            other => NotificationKind::Other(other.to_string()),
        }
    }
}

impl From<String> for NotificationKind {
    fn from(raw: String) -> Self {
        NotificationKind::from(raw.as_str())
    }
}

impl From<Option<String>> for NotificationKind {
    fn from(raw: Option<String>) -> Self {
        raw.map(NotificationKind::from).unwrap_or_default()
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Missing => write!(f, "(none)"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// 单条通知的读取状态
///
/// `Unread -> Read` 是唯一的迁移，`Read -> Read` 为空操作。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadState {
    Unread,
    Read,
}

impl ReadState {
    /// 迁移到已读，返回状态是否发生变化
    pub fn mark_read(&mut self) -> bool {
        match self {
            ReadState::Unread => {
                *self = ReadState::Read;
                true
            }
            ReadState::Read => false,
        }
    }

    pub fn is_read(self) -> bool {
        self == ReadState::Read
    }
}

impl From<bool> for ReadState {
    fn from(read: bool) -> Self {
        if read {
            ReadState::Read
        } else {
            ReadState::Unread
        }
    }
}

/// `content` 可能是字符串、null，也可能是后端已解码的 JSON 对象
fn deserialize_content<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// `type` 为非字符串标量时保留其文本，走默认路由
fn deserialize_kind<'de, D>(deserializer: D) -> Result<NotificationKind, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => NotificationKind::Missing,
        Some(Value::String(s)) => NotificationKind::from(s),
        Some(other) => NotificationKind::Other(other.to_string()),
    })
}

/// 只有 `true` 表示已读
fn deserialize_read<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(Value::Bool(true))))
}

/// 时间戳解析失败时视为缺失，不让整个列表解析失败
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(|s| {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }))
}
