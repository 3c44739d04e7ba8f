//! HipChat Hooks CLI
//!
//! 宿主应用的 hook 脚本调用此命令，将事件转发到 HipChat

use anyhow::Result;
use clap::{Parser, Subcommand};
use hipchat_hooks::cli::{handle_check, handle_hook, handle_list_hooks, CheckArgs, HookArgs};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "hipchat-hooks")]
#[command(about = "HipChat Hooks - 将问题和 Wiki 变更通知到 HipChat 房间")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 处理一个宿主 hook 回调（上下文 JSON 从 stdin 读取）
    Hook(HookArgs),
    /// 查看项目配置的解析结果
    Check(CheckArgs),
    /// 列出支持的 hook 名称
    Hooks,
}

fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hipchat_hooks=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Hook(args) => handle_hook(args)?,
        Commands::Check(args) => handle_check(args)?,
        Commands::Hooks => handle_list_hooks(),
    }

    Ok(())
}
