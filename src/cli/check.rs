//! Check 命令 - 查看项目的通知配置解析结果

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::hook::load_settings;
use super::output::format_output;
use crate::hooks::Project;
use crate::notification::resolver;
use crate::settings::Settings;

/// Check 命令参数
#[derive(Args)]
pub struct CheckArgs {
    /// 项目 JSON（含 id、identifier、name 及 hipchat_* 字段）
    #[arg(long)]
    pub project: String,

    /// 配置文件路径
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// Check 命令输出
#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub project_id: String,
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    pub endpoint: String,
}

/// 解析项目配置（不发送）
pub fn check_project(project: &Project, settings: &Settings) -> CheckOutput {
    let global = &settings.hipchat;
    let target = resolver::resolve(project, global);

    CheckOutput {
        project_id: project.id.clone(),
        configured: target.is_some(),
        room_id: target.as_ref().map(|t| t.room_id.clone()),
        notify: target.as_ref().map(|t| t.notify),
        from: target.as_ref().map(|t| t.from.clone()),
        auth_token: target.as_ref().map(|t| t.masked_token()),
        endpoint: global.endpoint_host().to_string(),
    }
}

/// 处理 check 命令
pub fn handle_check(args: CheckArgs) -> Result<()> {
    let settings = load_settings(args.settings.as_deref())?;
    let project: Project = serde_json::from_str(&args.project).context("Invalid project JSON")?;

    let output = check_project(&project, &settings);
    println!("{}", format_output(&output, args.json));
    Ok(())
}
