//! Alumni Notify CLI
//!
//! 查看、打开和标记校友平台的通知

use alumni_notify::{
    cli::{
        handle_delete, handle_list, handle_open, handle_read, handle_read_all, handle_route,
        handle_show, handle_unread, ListArgs, RouteArgs,
    },
    ClientConfig, HttpNotificationStore, ReadStateController, Role,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "alumni-notify")]
#[command(about = "Alumni Notify - 校友平台通知客户端")]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 ~/.config/alumni-notify/config.json）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 后端 API 地址
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// 当前用户角色: student, alumni, faculty
    #[arg(long, global = true)]
    role: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出通知
    List(ListArgs),
    /// 显示未读数量
    Unread {
        /// 输出 JSON 格式
        #[arg(long)]
        json: bool,
    },
    /// 显示通知详情
    Show {
        /// 通知 ID
        id: i64,
        /// 输出 JSON 格式
        #[arg(long)]
        json: bool,
    },
    /// 打开通知（未读时先标记已读），输出跳转目标
    Open {
        /// 通知 ID
        id: i64,
        /// 输出 JSON 格式
        #[arg(long)]
        json: bool,
    },
    /// 标记通知为已读
    Read {
        /// 通知 ID
        id: i64,
    },
    /// 标记全部通知为已读
    ReadAll,
    /// 删除通知
    Delete {
        /// 通知 ID
        id: i64,
    },
    /// 离线计算通知的跳转目标
    Route(RouteArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug alumni-notify list
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("alumni_notify=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    let role = cli.role.as_deref().map(str::parse::<Role>).transpose()?;
    let config = ClientConfig::load(cli.config.as_deref())?.with_overrides(cli.api_url, role);
    let session = config.session()?;
    debug!(
        role = %session.role,
        user = session.email.as_deref().unwrap_or("-"),
        api_url = %config.api_url,
        "Loaded configuration"
    );

    // 创建客户端不会发起网络请求，route 命令不访问后端
    let store = HttpNotificationStore::new(&config, &session)?;
    let controller = ReadStateController::new(store, session.role);

    let found = match cli.command {
        Commands::List(args) => {
            handle_list(&controller, args).await?;
            true
        }
        Commands::Unread { json } => {
            handle_unread(&controller, json).await?;
            true
        }
        Commands::Show { id, json } => handle_show(&controller, id, json).await?,
        Commands::Open { id, json } => handle_open(&controller, id, json).await?,
        Commands::Read { id } => {
            handle_read(&controller, id).await?;
            true
        }
        Commands::ReadAll => {
            handle_read_all(&controller).await?;
            true
        }
        Commands::Delete { id } => {
            handle_delete(&controller, id).await?;
            true
        }
        Commands::Route(args) => {
            handle_route(controller.classifier(), args)?;
            true
        }
    };

    if !found {
        std::process::exit(1);
    }
    Ok(())
}
