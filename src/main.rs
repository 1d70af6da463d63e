//! # Droid-Pilot 命令行入口
//!
//! 依次执行内置的 ApiDemos 端到端场景，每个场景使用独立的 Appium 会话。
//!
//! ## 主要功能
//! - 加载配置（默认值 → TOML 文件 → `DROID_*` 环境变量）
//! - 初始化控制台和文件日志
//! - 按顺序执行指定场景（默认全部），失败时自动截图
//! - 输出汇总结果，有失败场景时以非零状态码退出
//!
//! ## 环境变量
//! - `DROID_CONFIG`: 配置文件路径
//! - `DROID_REMOTE_URL`: Appium 服务器地址（默认: http://127.0.0.1:4723）
//! - `DROID_PROFILE`: 运行环境 `local` 或 `cloud`（默认: local）
//! - `DROID_UDID`: 覆盖 `appium:udid` 设备序列号
//! - `DROID_SCROLL__MAX_SWIPES` 等: 嵌套配置项以双下划线分隔
//! - `RUST_LOG`: 覆盖配置中的日志级别

use anyhow::Context;
use clap::Parser;
use droid_pilot::{
    config::Config,
    harness::{MockSessionFactory, RemoteSessionFactory, Scenario, ScenarioRunner, SessionFactory},
    telemetry,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "droid-pilot", version, about = "Run ApiDemos UI scenarios over Appium")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, env = "DROID_CONFIG")]
    config: Option<String>,

    /// Scenarios to run; all of them when omitted
    scenarios: Vec<String>,

    /// Run against the built-in scripted device instead of an Appium server
    #[arg(long)]
    offline: bool,

    /// List available scenarios and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.list {
        for scenario in Scenario::ALL {
            println!("{}", scenario);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let log_file = telemetry::init_tracing(&config).context("initializing logging")?;

    info!("Droid-Pilot v{}", droid_pilot::VERSION);
    info!(
        "Configuration loaded: remote_url={}, profile={:?}, log_file={}",
        config.remote_url,
        config.profile,
        log_file.display()
    );

    let scenarios = if cli.scenarios.is_empty() {
        Scenario::ALL.to_vec()
    } else {
        cli.scenarios
            .iter()
            .map(|name| name.parse::<Scenario>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let factory: Arc<dyn SessionFactory> = if cli.offline {
        info!("Offline mode: using scripted ApiDemos device");
        Arc::new(MockSessionFactory::api_demos())
    } else {
        Arc::new(RemoteSessionFactory)
    };

    let runner = ScenarioRunner::new(config, factory);
    let outcomes = runner.run_all(&scenarios).await;

    println!();
    for outcome in &outcomes {
        let status = if outcome.passed { "PASS" } else { "FAIL" };
        println!("{:<4} {:<22} {:.2?}", status, outcome.name, outcome.duration);
        if let Some(error) = &outcome.error {
            println!("     {}", error);
        }
        if let Some(shot) = &outcome.screenshot {
            println!("     screenshot: {}", shot.display());
        }
    }

    let failed = outcomes.iter().filter(|o| !o.passed).count();
    println!("\n{} passed, {} failed", outcomes.len() - failed, failed);

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
