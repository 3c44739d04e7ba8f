//! 集成测试共用的 mock 传输与日志捕获

#![allow(dead_code)]

use anyhow::Result;
use hipchat_hooks::notification::{FormResponse, FormTransport};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// 记录所有请求并返回固定状态码
pub struct RecordingTransport {
    status: u16,
    pub requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl RecordingTransport {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// 第 n 个请求中指定字段的值
    pub fn field(&self, index: usize, key: &str) -> Option<String> {
        let requests = self.requests.lock().unwrap();
        requests
            .get(index)?
            .1
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

impl FormTransport for RecordingTransport {
    fn post_form(&self, url: &str, fields: &[(&str, String)]) -> Result<FormResponse> {
        let fields = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        self.requests.lock().unwrap().push((url.to_string(), fields));
        let reason = match self.status {
            200 => "OK",
            500 => "Internal Server Error",
            _ => "",
        };
        Ok(FormResponse {
            status: self.status,
            reason: reason.to_string(),
        })
    }
}

/// 捕获 tracing 输出的缓冲区
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.to_string())
            .collect()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
