//! `route` 命令 - 离线计算通知的跳转目标，不访问后端

use anyhow::{Context, Result};
use clap::Args;

use super::output::format_output;
use crate::notification::{Notification, NotificationClassifier};

/// Route 命令参数
#[derive(Args, Debug)]
pub struct RouteArgs {
    /// 通知类型，例如 event、community_reply
    #[arg(long = "type", value_name = "TYPE", default_value = "")]
    pub kind: String,

    /// 通知内容（JSON 或纯文本）
    #[arg(long)]
    pub content: Option<String>,

    /// 通知 ID（未知类型时用于详情页路由）
    #[arg(long, default_value = "0")]
    pub id: i64,

    /// 直接传入完整的通知 JSON，忽略其他参数
    #[arg(long, value_name = "JSON", conflicts_with_all = ["content"])]
    pub record: Option<String>,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

impl RouteArgs {
    pub fn to_notification(&self) -> Result<Notification> {
        if let Some(record) = &self.record {
            return serde_json::from_str(record).context("无效的通知 JSON");
        }

        let mut notification = Notification::new(self.id, self.kind.as_str());
        notification.content = self.content.clone();
        Ok(notification)
    }
}

/// 处理 route 命令
pub fn handle_route(classifier: &NotificationClassifier, args: RouteArgs) -> Result<()> {
    let notification = args.to_notification()?;
    let classified = classifier.classify(&notification);

    if args.json {
        println!("{}", format_output(&classified));
    } else {
        println!("{}", classified.destination);
        println!("{}", classified.summary);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::Role;

    fn args(kind: &str, content: Option<&str>, id: i64) -> RouteArgs {
        RouteArgs {
            kind: kind.to_string(),
            content: content.map(str::to_string),
            id,
            record: None,
            json: false,
        }
    }

    #[test]
    fn test_route_from_flags() {
        let classifier = NotificationClassifier::new(Role::Student);

        let n = args("volunteer_event", Some(r#"{"event_id": 42}"#), 1)
            .to_notification()
            .unwrap();
        assert_eq!(classifier.destination(&n).path(), "/student/events/42");

        let n = args("", None, 15).to_notification().unwrap();
        assert_eq!(classifier.destination(&n).path(), "/student/notifications/15");
    }

    #[test]
    fn test_route_from_record() {
        let mut a = args("ignored", None, 0);
        a.record = Some(r#"{"id": 8, "type": "message", "content": null, "read": true}"#.to_string());
        let n = a.to_notification().unwrap();

        assert_eq!(n.id, 8);
        assert!(n.read);
        let classifier = NotificationClassifier::new(Role::Faculty);
        assert_eq!(classifier.destination(&n).path(), "/faculty/messages");
    }

    #[test]
    fn test_route_bad_record() {
        let mut a = args("", None, 0);
        a.record = Some("{not json".to_string());
        assert!(a.to_notification().is_err());
    }
}
