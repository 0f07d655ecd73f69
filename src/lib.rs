//! Alumni Notify - 校友平台通知路由与已读状态客户端

pub mod cli;
pub mod config;
pub mod notification;
pub mod session;

pub use config::ClientConfig;
pub use session::Session;
pub use notification::{
    ClassifiedNotification, ContentPayload, Destination, HttpNotificationStore, MarkReadOutcome,
    MemoryNotificationStore, Navigator, Notification, NotificationClassifier, NotificationFilter,
    NotificationId, NotificationKind, NotificationStore, OpenOutcome, ReadState,
    ReadStateController, Role, Section,
};
