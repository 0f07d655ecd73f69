//! 已读状态控制器
//!
//! 协调通知 `read` 标记与后端存储：单条标记、全部标记、打开通知（隐式标记后跳转）。
//! 控制器不缓存任何状态，列表以重新拉取的结果为准。

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::classifier::{Destination, NotificationClassifier, Role};
use super::record::{Notification, NotificationId};
use super::store::NotificationStore;

/// 导航接口（由 UI 或 CLI 实现）
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &Destination);
}

/// 打开通知时隐式标记已读的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum MarkReadOutcome {
    /// 已经是已读，未发出请求
    AlreadyRead,
    /// 标记成功
    Marked,
    /// 标记失败（已记录日志，不影响跳转）
    Failed(String),
}

/// 打开通知的结果
#[derive(Debug, Clone, Serialize)]
pub struct OpenOutcome {
    pub destination: Destination,
    pub mark_read: MarkReadOutcome,
}

/// 已读状态控制器
pub struct ReadStateController<S> {
    store: S,
    classifier: NotificationClassifier,
}

impl<S: NotificationStore> ReadStateController<S> {
    pub fn new(store: S, role: Role) -> Self {
        Self {
            store,
            classifier: NotificationClassifier::new(role),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn classifier(&self) -> &NotificationClassifier {
        &self.classifier
    }

    /// 重新拉取通知列表（唯一可信来源）
    pub async fn refresh(&self) -> Result<Vec<Notification>> {
        self.store.list().await
    }

    /// 标记单条通知已读，重复调用为空操作
    pub async fn mark_as_read(&self, id: NotificationId) -> Result<()> {
        self.store.mark_read(id).await?;
        info!(id, "Notification marked read");
        Ok(())
    }

    /// 标记全部未读通知为已读
    ///
    /// 任一失败即整体失败，本地不假设任何部分变更。
    pub async fn mark_all_as_read(&self) -> Result<()> {
        self.store.mark_all_read().await?;
        info!("All notifications marked read");
        Ok(())
    }

    /// 打开通知：未读时先标记已读，然后无论成功与否都跳转
    pub async fn open_notification(
        &self,
        notification: &Notification,
        navigator: &dyn Navigator,
    ) -> OpenOutcome {
        let mark_read = if notification.is_unread() {
            match self.mark_as_read(notification.id).await {
                Ok(()) => MarkReadOutcome::Marked,
                Err(e) => {
                    warn!(id = notification.id, error = %e, "Failed to mark notification read, navigating anyway");
                    MarkReadOutcome::Failed(e.to_string())
                }
            }
        } else {
            MarkReadOutcome::AlreadyRead
        };

        let destination = self.classifier.destination(notification);
        debug!(id = notification.id, destination = %destination, "Navigating");
        navigator.navigate(&destination);

        OpenOutcome {
            destination,
            mark_read,
        }
    }

    /// 按 ID 打开通知，不存在返回 `Ok(None)`
    pub async fn open_by_id(
        &self,
        id: NotificationId,
        navigator: &dyn Navigator,
    ) -> Result<Option<OpenOutcome>> {
        let Some(notification) = self.store.find(id).await? else {
            return Ok(None);
        };
        Ok(Some(self.open_notification(&notification, navigator).await))
    }

    /// 删除通知（不属于状态迁移）
    pub async fn delete(&self, id: NotificationId) -> Result<()> {
        self.store.delete(id).await?;
        info!(id, "Notification deleted");
        Ok(())
    }
}
