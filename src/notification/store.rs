//! 通知存储 - 后端通知接口的抽象
//!
//! - `HttpNotificationStore`: 调用后端 REST 接口
//! - `MemoryNotificationStore`: 进程内实现，语义与后端一致，用于测试和离线演示

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

use super::filter::sort_newest_first;
use super::record::{Notification, NotificationId};
use crate::config::ClientConfig;
use crate::session::Session;

/// 通知存储接口
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// `GET /notifications`
    async fn list(&self) -> Result<Vec<Notification>>;

    /// `POST /notifications/{id}/read`，幂等
    async fn mark_read(&self, id: NotificationId) -> Result<()>;

    /// `POST /notifications/read-all`
    async fn mark_all_read(&self) -> Result<()>;

    /// `DELETE /notifications/{id}`
    async fn delete(&self, id: NotificationId) -> Result<()>;

    /// 按 ID 查找，不存在返回 `Ok(None)`
    async fn find(&self, id: NotificationId) -> Result<Option<Notification>> {
        Ok(self.list().await?.into_iter().find(|n| n.id == id))
    }
}

/// 后端错误响应（`{"error": "..."}` 或 `{"message": "..."}`）
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// 基于 HTTP 的通知存储
#[derive(Debug, Clone)]
pub struct HttpNotificationStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpNotificationStore {
    /// 创建新客户端，认证信息取自会话
    pub fn new(config: &ClientConfig, session: &Session) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow!("Cannot create HTTP client: {}", e))?;

        debug!(
            role = %session.role,
            user = session.email.as_deref().unwrap_or("-"),
            authenticated = session.token.is_some(),
            "Creating notification client"
        );

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: session.token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// 发送请求，非 2xx 转换为错误
    async fn send(&self, method: Method, path: &str) -> Result<Response> {
        debug!(method = %method, path = %path, "Sending notification request");

        let start = Instant::now();
        let response = self
            .request(method.clone(), path)
            .send()
            .await
            .map_err(|e| {
                anyhow!(
                    "{} {} failed after {}ms: {}",
                    method,
                    path,
                    start.elapsed().as_millis(),
                    e
                )
            })?;

        let status = response.status();
        debug!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Notification request completed"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(&method, path, status, &body))
    }

    /// 单条操作的 404 转换为 "not found"
    async fn send_for_id(&self, method: Method, path: &str, id: NotificationId) -> Result<()> {
        match self.send(method, path).await {
            Ok(_) => Ok(()),
            Err(e) if is_not_found(&e) => Err(anyhow!("notification {} not found", id)),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl NotificationStore for HttpNotificationStore {
    async fn list(&self) -> Result<Vec<Notification>> {
        let response = self.send(Method::GET, "/notifications").await?;
        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response: {}", e))?;

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse notification list: {}", body))
    }

    async fn mark_read(&self, id: NotificationId) -> Result<()> {
        let path = format!("/notifications/{}/read", id);
        self.send_for_id(Method::POST, &path, id).await
    }

    async fn mark_all_read(&self) -> Result<()> {
        self.send(Method::POST, "/notifications/read-all").await?;
        Ok(())
    }

    async fn delete(&self, id: NotificationId) -> Result<()> {
        let path = format!("/notifications/{}", id);
        self.send_for_id(Method::DELETE, &path, id).await
    }
}

/// 带状态码的 HTTP 错误
#[derive(Debug)]
struct StatusError {
    status: StatusCode,
    message: String,
}

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StatusError {}

fn status_error(method: &Method, path: &str, status: StatusCode, body: &str) -> anyhow::Error {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| body.to_string());

    anyhow::Error::new(StatusError {
        status,
        message: format!("{} {} returned {}: {}", method, path, status, detail),
    })
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<StatusError>()
        .map(|e| e.status == StatusCode::NOT_FOUND)
        .unwrap_or(false)
}

/// 存储调用记录（用于验证调用顺序）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List,
    MarkRead(NotificationId),
    MarkAllRead,
    Delete(NotificationId),
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<Notification>,
    calls: Vec<StoreCall>,
    fail_next: Option<String>,
}

impl MemoryState {
    fn record(&mut self, call: StoreCall) -> Result<()> {
        self.calls.push(call);
        match self.fail_next.take() {
            Some(reason) => Err(anyhow!(reason)),
            None => Ok(()),
        }
    }
}

/// 进程内通知存储
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    state: Mutex<MemoryState>,
}

impl MemoryNotificationStore {
    pub fn new(records: Vec<Notification>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                records,
                ..Default::default()
            }),
        }
    }

    /// 下一次调用返回指定错误
    pub fn fail_next(&self, reason: impl Into<String>) {
        self.lock().fail_next = Some(reason.into());
    }

    /// 已发生的调用
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// 当前记录（不经过调用记录）
    pub fn snapshot(&self) -> Vec<Notification> {
        self.lock().records.clone()
    }

    pub fn insert(&self, notification: Notification) {
        self.lock().records.push(notification);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // 锁中毒只可能来自测试 panic，继续使用内部数据
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn list(&self) -> Result<Vec<Notification>> {
        let mut state = self.lock();
        state.record(StoreCall::List)?;

        let mut records = state.records.clone();
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn mark_read(&self, id: NotificationId) -> Result<()> {
        let mut state = self.lock();
        state.record(StoreCall::MarkRead(id))?;

        let record = state
            .records
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| anyhow!("notification {} not found", id))?;

        let mut read_state = record.read_state();
        if read_state.mark_read() {
            record.read = read_state.is_read();
            debug!(id, "Memory store: notification marked read");
        }
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<()> {
        let mut state = self.lock();
        state.record(StoreCall::MarkAllRead)?;

        let mut changed = 0usize;
        for record in state.records.iter_mut().filter(|n| n.is_unread()) {
            record.read = true;
            changed += 1;
        }
        debug!(changed, "Memory store: all notifications marked read");
        Ok(())
    }

    async fn delete(&self, id: NotificationId) -> Result<()> {
        let mut state = self.lock();
        state.record(StoreCall::Delete(id))?;

        let before = state.records.len();
        state.records.retain(|n| n.id != id);
        if state.records.len() == before {
            return Err(anyhow!("notification {} not found", id));
        }
        Ok(())
    }
}
