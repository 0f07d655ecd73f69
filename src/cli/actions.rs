//! 单条通知操作：show / open / read / read-all / delete

use anyhow::Result;
use tracing::warn;

use super::output::{format_output, render_detail, render_open, CliNavigator};
use crate::notification::{
    Destination, NotificationId, NotificationStore, ReadStateController, Section,
};

/// 通知不存在时的提示，附带返回列表的路由
pub fn not_found_message<S: NotificationStore>(
    controller: &ReadStateController<S>,
    id: NotificationId,
) -> String {
    let listing = Destination::listing(controller.classifier().role(), Section::Notifications);
    format!("未找到通知 #{}，返回列表: {}", id, listing)
}

/// 处理 show 命令，返回是否找到
pub async fn handle_show<S: NotificationStore>(
    controller: &ReadStateController<S>,
    id: NotificationId,
    json: bool,
) -> Result<bool> {
    let Some(notification) = controller.store().find(id).await? else {
        eprintln!("{}", not_found_message(controller, id));
        return Ok(false);
    };

    if json {
        println!("{}", format_output(&controller.classifier().classify(&notification)));
    } else {
        println!("{}", render_detail(&notification, controller.classifier()));
    }
    Ok(true)
}

/// 处理 open 命令，返回是否找到
pub async fn handle_open<S: NotificationStore>(
    controller: &ReadStateController<S>,
    id: NotificationId,
    json: bool,
) -> Result<bool> {
    let Some(outcome) = controller.open_by_id(id, &CliNavigator).await? else {
        eprintln!("{}", not_found_message(controller, id));
        return Ok(false);
    };

    if json {
        println!("{}", format_output(&outcome));
    } else {
        println!("{}", render_open(&outcome));
    }
    Ok(true)
}

/// 处理 read 命令
pub async fn handle_read<S: NotificationStore>(
    controller: &ReadStateController<S>,
    id: NotificationId,
) -> Result<()> {
    controller.mark_as_read(id).await?;
    println!("已标记通知 #{} 为已读", id);
    Ok(())
}

/// 处理 read-all 命令
pub async fn handle_read_all<S: NotificationStore>(
    controller: &ReadStateController<S>,
) -> Result<()> {
    if let Err(e) = controller.mark_all_as_read().await {
        warn!(error = %e, "Mark all read failed");
        return Err(e.context("标记全部已读失败"));
    }

    // 以后端为准重新确认
    let remaining = crate::notification::unread_count(&controller.refresh().await?);
    if remaining == 0 {
        println!("已全部标记为已读");
    } else {
        println!("已请求全部标记为已读，仍有 {} 条未读", remaining);
    }
    Ok(())
}

/// 处理 delete 命令
pub async fn handle_delete<S: NotificationStore>(
    controller: &ReadStateController<S>,
    id: NotificationId,
) -> Result<()> {
    controller.delete(id).await?;
    println!("已删除通知 #{}", id);
    Ok(())
}
