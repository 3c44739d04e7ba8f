//! Hook 命令 - 宿主通过 stdin 传入回调上下文
//!
//! 投递失败只记录日志，命令仍然正常退出。

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::hooks::{HookRegistry, NotificationHooks};
use crate::notification::NotificationDispatcher;
use crate::settings::Settings;

/// Hook 命令参数
#[derive(Args)]
pub struct HookArgs {
    /// Hook 名称，如 controller_issues_new_after_save
    pub name: String,

    /// JSON 上下文（默认从 stdin 读取）
    #[arg(long)]
    pub payload: Option<String>,

    /// 配置文件路径（默认 ~/.config/hipchat-hooks/settings.json）
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Dry-run 模式（只格式化并打印，不发送）
    #[arg(long)]
    pub dry_run: bool,
}

/// 加载配置：指定路径优先，否则使用默认位置
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
}

/// 处理 hook 命令
pub fn handle_hook(args: HookArgs) -> Result<()> {
    let settings = load_settings(args.settings.as_deref())?;

    let payload = match args.payload {
        Some(payload) => payload,
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read hook payload from stdin")?,
    };

    let hooks = NotificationHooks::new(settings)
        .with_dispatcher(NotificationDispatcher::new().with_dry_run(args.dry_run));
    let registry = HookRegistry::new();

    let chained = registry.call(&hooks, &args.name, &payload)?;
    info!(hook = %args.name, chained, "Hook handled");
    Ok(())
}

/// 列出已注册的 hook
pub fn handle_list_hooks() {
    for name in HookRegistry::new().names() {
        println!("{}", name);
    }
}
