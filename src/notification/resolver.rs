//! 配置解析 - 项目级覆盖优先，回退到全局设置

use serde::Serialize;
use tracing::info;

use crate::hooks::Project;
use crate::settings::{GlobalNotificationSettings, DEFAULT_FROM};

/// 单次发送的有效参数（每个事件重新计算，不持久化）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    #[serde(skip_serializing)]
    pub auth_token: String,
    pub room_id: String,
    pub notify: bool,
    pub from: String,
}

impl ResolvedTarget {
    /// 用于日志/展示的 token（只保留末 4 位）
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.auth_token.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), tail)
    }
}

/// 项目是否已配置通知
///
/// 满足任一条件即视为已配置：
/// - 项目设置了房间名，且项目或全局有 token
/// - 项目在全局启用列表中，且全局 token 与房间均非空
pub fn is_configured(project: &Project, global: &GlobalNotificationSettings) -> bool {
    let config = &project.notification;
    let token_configured = !config.auth_token().is_empty() || !global.auth_token.is_empty();

    if !config.room_name().is_empty() && token_configured {
        return true;
    }

    global.is_project_enabled(&project.id)
        && !global.auth_token.is_empty()
        && !global.room_id.is_empty()
}

pub fn resolve_auth_token(project: &Project, global: &GlobalNotificationSettings) -> String {
    let token = project.notification.auth_token();
    if token.is_empty() {
        global.auth_token.clone()
    } else {
        token.to_string()
    }
}

pub fn resolve_room_id(project: &Project, global: &GlobalNotificationSettings) -> String {
    let room = project.notification.room_name();
    if room.is_empty() {
        global.room_id.clone()
    } else {
        room.to_string()
    }
}

/// 提醒标志
///
/// 以项目房间名是否存在作为分支条件（而非 token），未设置的项目标志视为 false。
pub fn resolve_notify(project: &Project, global: &GlobalNotificationSettings) -> bool {
    if project.notification.room_name().is_empty() {
        global.notify
    } else {
        project.notification.notify.unwrap_or(false)
    }
}

pub fn resolve_from(project: &Project, global: &GlobalNotificationSettings) -> String {
    let from = project.notification.from();
    if !from.is_empty() {
        from.to_string()
    } else if !global.from.is_empty() {
        global.from.clone()
    } else {
        DEFAULT_FROM.to_string()
    }
}

/// 解析发送目标；未配置时返回 None 并记录 info 日志
pub fn resolve(project: &Project, global: &GlobalNotificationSettings) -> Option<ResolvedTarget> {
    if !is_configured(project, global) {
        info!(project_id = %project.id, "Not sending message, missing config");
        return None;
    }

    Some(ResolvedTarget {
        auth_token: resolve_auth_token(project, global),
        room_id: resolve_room_id(project, global),
        notify: resolve_notify(project, global),
        from: resolve_from(project, global),
    })
}
