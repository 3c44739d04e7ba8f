//! HipChat Hooks - 将问题跟踪系统的事件转发到 HipChat 房间

pub mod cli;
pub mod hooks;
pub mod notification;
pub mod settings;

pub use hooks::{HookRegistry, Issue, IssueContext, NotificationHooks, Project, WikiContext, WikiPage};
pub use notification::{
    NotificationDispatcher, NotificationEvent, NotificationTarget, ResolvedTarget, SendResult,
};
pub use settings::{GlobalNotificationSettings, HostSettings, ProjectNotificationConfig, Settings};
