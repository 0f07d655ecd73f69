//! 通知路由与已读状态
//!
//! # 组成
//! 1. `record`: 后端通知记录及类型标签
//! 2. `content`: `content` 字段的容错解析
//! 3. `classifier`: 通知 -> 跳转目标 + 摘要（纯函数）
//! 4. `store`: 后端通知接口（HTTP / 内存）
//! 5. `read_state`: 已读状态控制器
//! 6. `filter`: 列表过滤和排序
//!
//! # 使用示例
//! ```ignore
//! use alumni_notify::notification::{HttpNotificationStore, ReadStateController, Role};
//!
//! let session = config.session()?;
//! let store = HttpNotificationStore::new(&config, &session)?;
//! let controller = ReadStateController::new(store, session.role);
//! let outcome = controller.open_notification(&notification, &navigator).await;
//! ```

pub mod classifier;
pub mod content;
pub mod filter;
pub mod read_state;
pub mod record;
pub mod store;

pub use classifier::{
    summarize, ClassifiedNotification, Destination, NotificationClassifier, Role, Section,
    DEFAULT_SUMMARY,
};
pub use content::ContentPayload;
pub use filter::{sort_newest_first, unread_count, NotificationFilter};
pub use read_state::{MarkReadOutcome, Navigator, OpenOutcome, ReadStateController};
pub use record::{Notification, NotificationId, NotificationKind, ReadState};
pub use store::{HttpNotificationStore, MemoryNotificationStore, NotificationStore, StoreCall};
