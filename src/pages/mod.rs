//! # 页面对象层
//!
//! 以页面对象模式封装 ApiDemos 各页面的定位器和操作流程。
//!
//! ## 主要功能
//! - **通用操作**: 显式等待、点击、输入，失败时自动截图
//! - **滚动查找**: 使用配置中的默认参数定向滑动查找元素
//! - **返回首页**: 连续按返回键直到首页标识出现
//!
//! ## 模块结构
//! - `base`: 所有页面共享的 `BasePage`
//! - `views`: Views 页面
//! - `text_fields`: TextFields 页面
//! - `alert_dialogs`: Alert Dialogs 页面
//! - `photos`: Photos 画廊页面

pub mod base;
pub mod views;
pub mod text_fields;
pub mod alert_dialogs;
pub mod photos;


pub use base::BasePage;
pub use views::ViewsPage;
pub use text_fields::TextFieldsPage;
pub use alert_dialogs::AlertDialogsPage;
pub use photos::PhotosPage;
