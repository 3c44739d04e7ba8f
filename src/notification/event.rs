//! 通知事件结构
//!
//! 由 Hook 适配层从宿主对象构造，交给 formatter 使用一次，不做持久化。

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::settings::HostSettings;

/// 通知事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// 新建问题
    IssueCreated {
        actor: String,
        project: String,
        category: String,
        issue_id: u64,
        subject: String,
        url: Option<String>,
    },
    /// 更新问题（可带评论）
    IssueUpdated {
        actor: String,
        project: String,
        category: String,
        issue_id: u64,
        subject: String,
        comment: Option<String>,
        url: Option<String>,
    },
    /// 编辑 Wiki 页面
    WikiPageEdited {
        actor: String,
        project: String,
        page_title: String,
        url: Option<String>,
    },
}

impl NotificationEvent {
    /// 事件类型名（用于日志和消息元数据）
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::IssueCreated { .. } => "issue_created",
            NotificationEvent::IssueUpdated { .. } => "issue_updated",
            NotificationEvent::WikiPageEdited { .. } => "wiki_page_edited",
        }
    }

    pub fn project(&self) -> &str {
        match self {
            NotificationEvent::IssueCreated { project, .. }
            | NotificationEvent::IssueUpdated { project, .. }
            | NotificationEvent::WikiPageEdited { project, .. } => project,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            NotificationEvent::IssueCreated { url, .. }
            | NotificationEvent::IssueUpdated { url, .. }
            | NotificationEvent::WikiPageEdited { url, .. } => url.as_deref(),
        }
    }
}

/// 链接目标
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationTarget {
    Issue { id: u64 },
    WikiPage { project_identifier: String, title: String },
    /// 宿主传入的其他对象类型
    Unsupported { description: String },
}

/// 构造目标对象的访问地址；不支持的类型记录错误并返回 None
pub fn target_url(target: &NotificationTarget, host: &HostSettings) -> Option<String> {
    match target {
        NotificationTarget::Issue { id } => Some(format!(
            "{}://{}/issues/{}",
            host.protocol, host.host_name, id
        )),
        NotificationTarget::WikiPage {
            project_identifier,
            title,
        } => Some(format!(
            "{}://{}/projects/{}/wiki/{}",
            host.protocol, host.host_name, project_identifier, title
        )),
        NotificationTarget::Unsupported { description } => {
            error!(object = %description, "Asked for the url of an unsupported object");
            None
        }
    }
}
