//! 通知渠道 trait 定义

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

use super::resolver::ResolvedTarget;

/// 通知消息
#[derive(Debug, Clone, Serialize)]
pub struct NotificationMessage {
    /// 消息内容（已格式化、已转义）
    pub content: String,
    /// 发送目标
    pub target: ResolvedTarget,
    /// 消息元数据
    pub metadata: MessageMetadata,
}

impl NotificationMessage {
    pub fn new(content: impl Into<String>, target: ResolvedTarget) -> Self {
        Self {
            content: content.into(),
            target,
            metadata: MessageMetadata::default(),
        }
    }

    /// 设置元数据
    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// 消息元数据
#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageMetadata {
    /// 事件类型
    pub event_type: String,
    /// 项目名
    pub project: Option<String>,
    /// 时间戳
    pub timestamp: Option<String>,
}

impl MessageMetadata {
    pub fn for_event(event_type: &str, project: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            project: Some(project.to_string()),
            timestamp: Some(Utc::now().to_rfc3339()),
        }
    }
}

/// 发送结果
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    /// 发送成功
    Sent,
    /// 跳过（未配置、dry-run）
    Skipped(String),
    /// 发送失败
    Failed(String),
}

impl SendResult {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendResult::Sent)
    }
}

/// 通知渠道 trait
pub trait NotificationChannel: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 同步发送消息
    fn send(&self, message: &NotificationMessage) -> Result<SendResult>;
}
