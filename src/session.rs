//! 会话上下文
//!
//! 当前用户的角色和凭据显式传入分类器和控制器，不从全局状态或 URL 推断。

use serde::{Deserialize, Serialize};

use crate::notification::classifier::{NotificationClassifier, Role};

/// 已认证用户的会话
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Session {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            email: None,
            token: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// 该会话对应的分类器
    pub fn classifier(&self) -> NotificationClassifier {
        NotificationClassifier::new(self.role)
    }
}
