//! 通知管线 - 配置解析、消息格式化、投递
//!
//! # 使用示例
//! ```ignore
//! use hipchat_hooks::notification::{NotificationDispatcher, NotificationEvent};
//!
//! let dispatcher = NotificationDispatcher::new();
//! let result = dispatcher.dispatch(&event, &project, &settings.hipchat);
//! ```

pub mod channel;
pub mod channels;
pub mod dispatcher;
pub mod event;
pub mod formatter;
pub mod resolver;
pub mod transport;

pub use channel::{MessageMetadata, NotificationChannel, NotificationMessage, SendResult};
pub use channels::HipchatChannel;
pub use dispatcher::NotificationDispatcher;
pub use event::{target_url, NotificationEvent, NotificationTarget};
pub use formatter::{escape_html, truncate_words, MessageFormatter};
pub use resolver::{is_configured, resolve, ResolvedTarget};
pub use transport::{FormResponse, FormTransport, HttpTransport};
