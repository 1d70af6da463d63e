//! # WebDriver 层
//!
//! 通过 Appium / W3C WebDriver 协议与远程会话通信，驱动被测 Android 设备。
//!
//! ## 主要功能
//! - **HTTP 传输**: 发送 JSON 命令并解包 W3C 响应信封
//! - **会话协商**: 按配置的 capabilities 创建和销毁会话
//! - **元素操作**: 查找、点击、输入、可见性查询
//! - **手势**: 基于 W3C pointer actions 的单指滑动
//! - **元素引用兼容**: 将字典形式的元素引用统一解析为 `ElementHandle`
//!
//! ## 模块结构
//! - `traits`: 传输和客户端的核心 trait 定义
//! - `types`: 定位器、几何类型和元素引用
//! - `connection`: 基于 reqwest 的 HTTP 传输实现
//! - `client`: 绑定单个会话的类型化客户端
//! - `mock`: 用于测试的 Mock 实现
//!
//! ## 使用示例
//! ```rust,no_run
//! use droid_pilot::webdriver::{HttpTransport, RemoteSession, WebDriverClient, Locator};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(HttpTransport::new("http://127.0.0.1:4723", Duration::from_secs(60))?);
//! let session = RemoteSession::create(transport, serde_json::Map::new()).await?;
//!
//! let views = session.find_element(&Locator::accessibility_id("Views")).await?;
//! session.click(&views).await?;
//! session.quit().await?;
//! # Ok(())
//! # }
//! ```

pub mod traits;
pub mod types;
pub mod connection;
pub mod client;
pub mod mock;

pub use traits::{HttpMethod, WebDriverClient, WebDriverTransport};
pub use types::{
    By, ElementHandle, Locator, Point, Rect, WindowSize, WireElement,
    LEGACY_ELEMENT_KEY, W3C_ELEMENT_KEY,
};

// Re-export implementation structs
pub use connection::HttpTransport;
pub use client::RemoteSession;

// Re-export mock for development/testing
pub use mock::{MockDevice, MockElement, MockTransport};
