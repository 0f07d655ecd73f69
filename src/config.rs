//! 客户端配置
//!
//! 读取优先级（后者覆盖前者）：
//! 1. 配置文件 `~/.config/alumni-notify/config.json`（或 `--config` 指定的路径）
//! 2. 环境变量 `ALUMNI_API_URL`、`ALUMNI_API_TOKEN`、`ALUMNI_ROLE`、`ALUMNI_EMAIL`
//! 3. 命令行参数 `--api-url`、`--role`

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::notification::classifier::Role;
use crate::session::Session;

/// 默认后端地址
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// 默认超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 配置文件内容，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    api_url: Option<String>,
    token: Option<String>,
    role: Option<String>,
    email: Option<String>,
    timeout_secs: Option<u64>,
}

/// 客户端配置
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// 后端 API 基础地址（不带结尾 `/`）
    pub api_url: String,
    /// Bearer token
    pub token: Option<String>,
    /// 当前用户角色
    pub role: Option<Role>,
    pub email: Option<String>,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            role: None,
            email: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// 默认配置文件路径
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("alumni-notify")
            .join("config.json")
    }

    /// 从配置文件和进程环境变量加载
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path);
        Self::load_with_env(&path, |key| std::env::var(key).ok())
    }

    /// 从配置文件和给定的环境变量来源加载
    pub fn load_with_env<F>(path: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let file: FileConfig = serde_json::from_str(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            debug!("Loaded config from {}", path.display());
            config.apply_file(file)?;
        }

        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = env("ALUMNI_API_URL") {
            config.api_url = url;
        }
        if let Some(token) = env("ALUMNI_API_TOKEN") {
            config.token = Some(token);
        }
        if let Some(role) = env("ALUMNI_ROLE") {
            config.role = Some(role.parse::<Role>().context("Invalid ALUMNI_ROLE")?);
        }
        if let Some(email) = env("ALUMNI_EMAIL") {
            config.email = Some(email);
        }

        config.api_url = config.api_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) -> Result<()> {
        if let Some(url) = file.api_url.filter(|u| !u.is_empty()) {
            self.api_url = url;
        }
        self.token = file.token.filter(|t| !t.is_empty());
        if let Some(role) = file.role.filter(|r| !r.is_empty()) {
            self.role = Some(role.parse::<Role>().context("Invalid role in config file")?);
        }
        self.email = file.email.filter(|e| !e.is_empty());
        if let Some(timeout) = file.timeout_secs {
            self.timeout_secs = timeout;
        }
        Ok(())
    }

    /// 命令行参数覆盖
    pub fn with_overrides(mut self, api_url: Option<String>, role: Option<Role>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url.trim_end_matches('/').to_string();
        }
        if role.is_some() {
            self.role = role;
        }
        self
    }

    /// 构建会话，缺少角色时报错
    pub fn session(&self) -> Result<Session> {
        let role = self.role.ok_or_else(|| {
            anyhow!("No role configured. Pass --role, set ALUMNI_ROLE, or add \"role\" to the config file")
        })?;

        Ok(Session {
            role,
            email: self.email.clone(),
            token: self.token.clone(),
        })
    }
}
