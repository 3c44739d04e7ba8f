//! 通知分发器 - 配置检查 → 格式化 → 发送
//!
//! 所有失败路径都以一条日志结束，不向调用方返回错误。

use std::sync::Arc;
use tracing::{info, warn};

use super::channel::{MessageMetadata, NotificationChannel, NotificationMessage, SendResult};
use super::channels::HipchatChannel;
use super::event::NotificationEvent;
use super::formatter::MessageFormatter;
use super::resolver;
use crate::hooks::Project;
use crate::settings::GlobalNotificationSettings;

/// 通知分发器
pub struct NotificationDispatcher {
    /// 固定渠道；为空时按每次传入的全局设置构建 HipChat 渠道
    channel: Option<Arc<dyn NotificationChannel>>,
    formatter: MessageFormatter,
    /// 是否为 dry-run 模式
    dry_run: bool,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self {
            channel: None,
            formatter: MessageFormatter::new(),
            dry_run: false,
        }
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 指定发送渠道
    pub fn with_channel(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn with_formatter(mut self, formatter: MessageFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// 处理一个事件
    pub fn dispatch(
        &self,
        event: &NotificationEvent,
        project: &Project,
        global: &GlobalNotificationSettings,
    ) -> SendResult {
        let Some(target) = resolver::resolve(project, global) else {
            return SendResult::Skipped("missing config".to_string());
        };

        let text = self.formatter.format(event);
        let message = NotificationMessage::new(text, target)
            .with_metadata(MessageMetadata::for_event(event.kind(), event.project()));

        if self.dry_run {
            info!(
                event = %message.metadata.event_type,
                project = message.metadata.project.as_deref().unwrap_or(""),
                sent_at = message.metadata.timestamp.as_deref().unwrap_or(""),
                room_id = %message.target.room_id,
                message = %message.content,
                "[DRY-RUN] Would send message"
            );
            return SendResult::Skipped("dry-run".to_string());
        }

        let channel: Arc<dyn NotificationChannel> = match &self.channel {
            Some(channel) => channel.clone(),
            None => Arc::new(HipchatChannel::from_settings(global)),
        };

        match channel.send(&message) {
            Ok(result) => result,
            Err(e) => {
                warn!(channel = channel.name(), error = %e, "Channel send failed");
                SendResult::Failed(e.to_string())
            }
        }
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ProjectNotificationConfig;
    use anyhow::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 测试用的 mock 渠道
    struct MockChannel {
        send_count: AtomicUsize,
        fail: bool,
    }

    impl MockChannel {
        fn new(fail: bool) -> Self {
            Self {
                send_count: AtomicUsize::new(0),
                fail,
            }
        }

        fn get_send_count(&self) -> usize {
            self.send_count.load(Ordering::SeqCst)
        }
    }

    impl NotificationChannel for MockChannel {
        fn name(&self) -> &str {
            "mock"
        }

        fn send(&self, _message: &NotificationMessage) -> Result<SendResult> {
            self.send_count.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("channel exploded");
            }
            Ok(SendResult::Sent)
        }
    }

    fn project(room: &str) -> Project {
        Project {
            id: "1".to_string(),
            identifier: "demo".to_string(),
            name: "Demo".to_string(),
            notification: ProjectNotificationConfig {
                room_name: Some(room.to_string()),
                ..Default::default()
            },
        }
    }

    fn global() -> GlobalNotificationSettings {
        GlobalNotificationSettings {
            auth_token: "g-tok".to_string(),
            ..Default::default()
        }
    }

    fn event() -> NotificationEvent {
        NotificationEvent::WikiPageEdited {
            actor: "Bob".to_string(),
            project: "Demo".to_string(),
            page_title: "Home".to_string(),
            url: None,
        }
    }

    #[test]
    fn test_unconfigured_project_never_sends() {
        let channel = Arc::new(MockChannel::new(false));
        let dispatcher = NotificationDispatcher::new().with_channel(channel.clone());

        let result = dispatcher.dispatch(&event(), &project(""), &global());
        assert_eq!(result, SendResult::Skipped("missing config".to_string()));
        assert_eq!(channel.get_send_count(), 0);
    }

    #[test]
    fn test_configured_project_sends_once() {
        let channel = Arc::new(MockChannel::new(false));
        let dispatcher = NotificationDispatcher::new().with_channel(channel.clone());

        let result = dispatcher.dispatch(&event(), &project("dev"), &global());
        assert_eq!(result, SendResult::Sent);
        assert_eq!(channel.get_send_count(), 1);
    }

    #[test]
    fn test_dry_run() {
        let channel = Arc::new(MockChannel::new(false));
        let dispatcher = NotificationDispatcher::new()
            .with_channel(channel.clone())
            .with_dry_run(true);

        let result = dispatcher.dispatch(&event(), &project("dev"), &global());
        assert_eq!(result, SendResult::Skipped("dry-run".to_string()));
        assert_eq!(channel.get_send_count(), 0); // 不应该实际发送
    }

    #[test]
    fn test_channel_error_becomes_failed_result() {
        let channel = Arc::new(MockChannel::new(true));
        let dispatcher = NotificationDispatcher::new().with_channel(channel.clone());

        let result = dispatcher.dispatch(&event(), &project("dev"), &global());
        assert_eq!(result, SendResult::Failed("channel exploded".to_string()));
    }
}
