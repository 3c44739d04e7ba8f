//! 通知配置 - 项目级覆盖与全局设置
//!
//! 配置文件为 JSON 格式，默认位置 `~/.config/hipchat-hooks/settings.json`：
//!
//! ```json
//! {
//!   "host": { "protocol": "https", "host_name": "redmine.example.com" },
//!   "hipchat": { "auth_token": "...", "room_id": "ops", "projects": ["1"] }
//! }
//! ```
//!
//! 本库只读取配置，从不修改；每次调用由宿主重新加载后作为参数传入。

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 默认 API 主机
pub const DEFAULT_ENDPOINT: &str = "api.hipchat.com";

/// 默认发送者名称（宿主应用名）
pub const DEFAULT_FROM: &str = "Redmine";

/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// 项目级通知配置（均为可选覆盖）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectNotificationConfig {
    #[serde(rename = "hipchat_auth_token")]
    pub auth_token: Option<String>,
    #[serde(rename = "hipchat_room_name")]
    pub room_name: Option<String>,
    #[serde(rename = "hipchat_notify")]
    pub notify: Option<bool>,
    #[serde(rename = "hipchat_from")]
    pub from: Option<String>,
}

impl ProjectNotificationConfig {
    pub fn auth_token(&self) -> &str {
        self.auth_token.as_deref().unwrap_or("")
    }

    pub fn room_name(&self) -> &str {
        self.room_name.as_deref().unwrap_or("")
    }

    pub fn from(&self) -> &str {
        self.from.as_deref().unwrap_or("")
    }
}

/// 全局通知设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalNotificationSettings {
    pub auth_token: String,
    pub room_id: String,
    pub notify: bool,
    pub from: String,
    /// API 主机覆盖（可带端口，如 `hipchat.internal:8443`）
    pub endpoint: String,
    /// 启用通知的项目 ID 列表
    pub projects: BTreeSet<String>,
    pub timeout_secs: u64,
}

impl Default for GlobalNotificationSettings {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            room_id: String::new(),
            notify: false,
            from: String::new(),
            endpoint: String::new(),
            projects: BTreeSet::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GlobalNotificationSettings {
    /// 实际使用的 API 主机
    pub fn endpoint_host(&self) -> &str {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            endpoint
        }
    }

    pub fn is_project_enabled(&self, project_id: &str) -> bool {
        self.projects.contains(project_id)
    }
}

/// 宿主应用的访问地址（用于拼接链接）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    pub protocol: String,
    pub host_name: String,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host_name: "localhost".to_string(),
        }
    }
}

/// 完整配置文档
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: HostSettings,
    pub hipchat: GlobalNotificationSettings,
}

impl Settings {
    /// 默认配置文件路径
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| anyhow!("Cannot find config directory"))?;
        Ok(dir.join("hipchat-hooks").join("settings.json"))
    }

    /// 从默认位置加载，文件不存在时返回默认配置
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// 从指定文件加载
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        debug!(path = %path.display(), projects = settings.hipchat.projects.len(), "Settings loaded");
        Ok(settings)
    }
}
