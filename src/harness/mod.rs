//! # 场景执行层
//!
//! 为每个场景创建独立会话，执行页面对象流程并汇总结果。
//!
//! ## 主要功能
//! - **会话隔离**: 每个场景使用全新会话，强制 `noReset=false`
//! - **失败截图**: 场景失败时保存 `fail_<name>_<timestamp>.png`
//! - **资源清理**: 无论成功或失败都会退出会话
//! - **离线运行**: `MockSessionFactory` 提供脚本化设备，无需 Appium
//!
//! ## 模块结构
//! - `session`: 会话工厂和会话守卫
//! - `scenario`: 场景目录和执行结果
//! - `runner`: 场景执行器

pub mod session;
pub mod scenario;
pub mod runner;


pub use session::{MockSessionFactory, RemoteSessionFactory, SessionFactory, SessionFixture};
pub use scenario::{Scenario, ScenarioOutcome};
pub use runner::{run_scenario, ScenarioRunner};
