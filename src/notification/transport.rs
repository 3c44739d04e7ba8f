//! HTTPS 表单传输层
//!
//! 每次发送新建连接，用完即关闭，不做连接复用。

use anyhow::{anyhow, Result};
use std::time::Duration;
use tracing::debug;

/// HTTP 响应摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormResponse {
    pub status: u16,
    /// 状态描述（如 "Internal Server Error"）
    pub reason: String,
}

impl FormResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 表单 POST 传输
pub trait FormTransport: Send + Sync {
    /// 以 `application/x-www-form-urlencoded` 发送表单
    fn post_form(&self, url: &str, fields: &[(&str, String)]) -> Result<FormResponse>;
}

/// 基于 reqwest blocking 的传输实现
#[derive(Debug, Clone)]
pub struct HttpTransport {
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs.max(1)),
        }
    }
}

impl FormTransport for HttpTransport {
    fn post_form(&self, url: &str, fields: &[(&str, String)]) -> Result<FormResponse> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(0)
            .danger_accept_invalid_certs(false)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        let start = std::time::Instant::now();
        let response = client
            .post(url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .form(fields)
            .send()
            .map_err(|e| anyhow!("HTTP request failed after {}ms: {}", start.elapsed().as_millis(), e))?;

        let status = response.status();
        debug!(status = status.as_u16(), elapsed_ms = start.elapsed().as_millis(), "HTTP request completed");

        Ok(FormResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
        })
    }
}
