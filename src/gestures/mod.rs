//! # 手势模块
//!
//! 基于视口或容器尺寸计算滑动坐标，并提供定向滚动查找。
//!
//! ## 主要功能
//! - **滑动几何**: 按比例计算上/下/左/右滑动的起止坐标，自适应任意分辨率
//! - **滚动查找**: 交替执行"检查可见性"和"滑动一次"，直到元素出现或次数用尽
//! - **固定滑动**: 按次数滑动、在容器内滑动
//! - **滑动到底**: 在容器内持续滑动，直到页面结构不再变化
//!
//! ## 模块结构
//! - `swipe`: 方向、坐标计算和固定滑动
//! - `search`: 定向滚动查找

pub mod swipe;
pub mod search;

#[cfg(test)]
pub mod tests;

pub use swipe::{
    swipe_times, swipe_until_exhausted, swipe_within, Direction, SwipeOptions, SwipeRatios,
};
pub use search::{swipe_until_element_appears, ScrollSearch};
