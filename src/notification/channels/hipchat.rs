//! HipChat 房间消息渠道
//!
//! `POST https://{endpoint}/v1/rooms/message`，表单字段：
//! `auth_token`, `room_id`, `notify` (1/0), `from`, `message`

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::notification::channel::{NotificationChannel, NotificationMessage, SendResult};
use crate::notification::transport::{FormTransport, HttpTransport};
use crate::settings::GlobalNotificationSettings;

/// 消息接口路径
pub const MESSAGE_PATH: &str = "/v1/rooms/message";

/// HipChat 渠道
pub struct HipchatChannel {
    endpoint: String,
    transport: Arc<dyn FormTransport>,
}

impl HipchatChannel {
    /// 使用自定义传输创建（测试时注入 mock）
    pub fn new(endpoint: impl Into<String>, transport: Arc<dyn FormTransport>) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
        }
    }

    /// 按全局设置创建（endpoint 覆盖、超时）
    pub fn from_settings(global: &GlobalNotificationSettings) -> Self {
        Self::new(
            global.endpoint_host(),
            Arc::new(HttpTransport::new(global.timeout_secs)),
        )
    }

    /// 完整请求地址，始终使用 https
    pub fn url(&self) -> String {
        format!("https://{}{}", self.endpoint, MESSAGE_PATH)
    }

    /// 构造表单字段
    pub fn form_fields(message: &NotificationMessage) -> Vec<(&'static str, String)> {
        let target = &message.target;
        vec![
            ("auth_token", target.auth_token.clone()),
            ("room_id", target.room_id.clone()),
            ("notify", if target.notify { "1" } else { "0" }.to_string()),
            ("from", target.from.clone()),
            ("message", message.content.clone()),
        ]
    }
}

impl NotificationChannel for HipchatChannel {
    fn name(&self) -> &str {
        "hipchat"
    }

    fn send(&self, message: &NotificationMessage) -> Result<SendResult> {
        let target = &message.target;
        let metadata = &message.metadata;
        info!(
            event = %metadata.event_type,
            project = metadata.project.as_deref().unwrap_or(""),
            sent_at = metadata.timestamp.as_deref().unwrap_or(""),
            room_id = %target.room_id,
            from = %target.from,
            notify = target.notify,
            message = %message.content,
            "Sending message"
        );

        let fields = Self::form_fields(message);
        match self.transport.post_form(&self.url(), &fields) {
            Ok(response) if response.is_success() => {
                debug!(status = response.status, room_id = %target.room_id, "Message delivered");
                Ok(SendResult::Sent)
            }
            Ok(response) => {
                warn!(
                    status = response.status,
                    reason = %response.reason,
                    room_id = %target.room_id,
                    "Unexpected response from messaging API"
                );
                Ok(SendResult::Failed(format!(
                    "{} {}",
                    response.status, response.reason
                )))
            }
            Err(e) => {
                error!(endpoint = %self.endpoint, error = %e, "Error hitting messaging API");
                Ok(SendResult::Failed(e.to_string()))
            }
        }
    }
}
