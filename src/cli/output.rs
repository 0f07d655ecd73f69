//! Output formatting for CLI commands

use serde::Serialize;

use crate::notification::{ClassifiedNotification, Destination, Navigator, NotificationClassifier};
use crate::notification::{Notification, OpenOutcome, MarkReadOutcome};

/// 摘要在列表中的最大显示宽度（字符）
const SUMMARY_WIDTH: usize = 60;

/// Format output as pretty JSON
pub fn format_output<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

/// 按字符截断，超出部分用 `...` 表示
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// 列表中的一行
pub fn render_line(item: &ClassifiedNotification) -> String {
    let marker = if item.read { " " } else { "●" };
    let summary = truncate_chars(&item.summary.replace('\n', " "), SUMMARY_WIDTH);
    format!(
        "{} #{:<5} {:<18} {:<width$}  -> {}",
        marker,
        item.id,
        item.kind.to_string(),
        summary,
        item.destination,
        width = SUMMARY_WIDTH
    )
}

/// 详情
pub fn render_detail(notification: &Notification, classifier: &NotificationClassifier) -> String {
    let item = classifier.classify(notification);
    let created = notification
        .created_at
        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut out = format!("通知 #{}\n", item.id);
    out.push_str(&format!("  类型: {}\n", item.kind));
    out.push_str(&format!("  状态: {}\n", if item.read { "已读" } else { "未读" }));
    out.push_str(&format!("  时间: {}\n", created));
    out.push_str(&format!("  摘要: {}\n", item.summary));
    out.push_str(&format!("  跳转: {}", item.destination));
    out
}

/// 打开通知的结果
pub fn render_open(outcome: &OpenOutcome) -> String {
    match &outcome.mark_read {
        MarkReadOutcome::AlreadyRead | MarkReadOutcome::Marked => outcome.destination.to_string(),
        MarkReadOutcome::Failed(reason) => {
            format!("{}\n(标记已读失败: {})", outcome.destination, reason)
        }
    }
}

/// CLI 导航：跳转目标只记录日志，由调用方负责输出
#[derive(Debug, Default)]
pub struct CliNavigator;

impl Navigator for CliNavigator {
    fn navigate(&self, destination: &Destination) {
        tracing::debug!(destination = %destination, "Navigate");
    }
}
