//! `list` / `unread` 命令

use anyhow::{Context, Result};
use clap::Args;
use regex::RegexBuilder;
use serde::Serialize;

use super::output::{format_output, render_line};
use crate::notification::{
    unread_count, ClassifiedNotification, NotificationFilter, NotificationStore,
    ReadStateController,
};

/// List 命令参数
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// 只显示未读
    #[arg(long)]
    pub unread: bool,

    /// 按类型过滤（可重复）
    #[arg(long = "kind", value_name = "TYPE")]
    pub kinds: Vec<String>,

    /// 按正则匹配摘要或内容（不区分大小写）
    #[arg(long, value_name = "REGEX")]
    pub grep: Option<String>,

    /// 最多显示 N 条
    #[arg(long, short)]
    pub limit: Option<usize>,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// 转换为过滤条件
    pub fn to_filter(&self) -> Result<NotificationFilter> {
        let mut filter = NotificationFilter::new().unread_only(self.unread);
        for kind in &self.kinds {
            filter = filter.kind(kind.as_str());
        }
        if let Some(pattern) = &self.grep {
            let re = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("无效的正则表达式: {}", pattern))?;
            filter = filter.pattern(re);
        }
        if let Some(limit) = self.limit {
            filter = filter.limit(limit);
        }
        Ok(filter)
    }
}

/// List 命令输出
#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub total: usize,
    pub unread: usize,
    pub notifications: Vec<ClassifiedNotification>,
}

/// 处理 list 命令
pub async fn handle_list<S: NotificationStore>(
    controller: &ReadStateController<S>,
    args: ListArgs,
) -> Result<()> {
    let filter = args.to_filter()?;
    let all = controller.refresh().await?;

    let total = all.len();
    let unread = unread_count(&all);
    let notifications: Vec<ClassifiedNotification> = filter
        .apply(all)
        .iter()
        .map(|n| controller.classifier().classify(n))
        .collect();

    if args.json {
        let output = ListOutput {
            total,
            unread,
            notifications,
        };
        println!("{}", format_output(&output));
        return Ok(());
    }

    println!("共 {} 条通知，{} 条未读:\n", total, unread);
    if notifications.is_empty() {
        println!("  (没有匹配的通知)");
    }
    for item in &notifications {
        println!("{}", render_line(item));
    }
    Ok(())
}

/// 处理 unread 命令
pub async fn handle_unread<S: NotificationStore>(
    controller: &ReadStateController<S>,
    json: bool,
) -> Result<()> {
    let all = controller.refresh().await?;
    let count = unread_count(&all);

    if json {
        println!("{}", format_output(&serde_json::json!({ "unread": count })));
    } else {
        println!("{}", count);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{Notification, NotificationKind};

    #[test]
    fn test_to_filter() {
        let args = ListArgs {
            unread: true,
            kinds: vec!["event".to_string(), "mystery".to_string()],
            grep: Some("FAIR".to_string()),
            limit: Some(3),
            json: false,
        };
        let filter = args.to_filter().unwrap();

        assert!(filter.unread_only);
        assert_eq!(
            filter.kinds,
            vec![
                NotificationKind::Event,
                NotificationKind::Other("mystery".to_string())
            ]
        );
        assert_eq!(filter.limit, Some(3));

        let n = Notification::new(1, "event").with_content(r#"{"title":"Career fair"}"#);
        assert!(filter.matches(&n));
    }

    #[test]
    fn test_invalid_regex() {
        let args = ListArgs {
            grep: Some("(unclosed".to_string()),
            ..Default::default()
        };
        assert!(args.to_filter().is_err());
    }
}
