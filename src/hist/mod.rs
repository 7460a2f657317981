//! # 直方图模块
//!
//! 提供能谱直方图的构建、绘图与数据导出功能。
//!
//! ## 子模块
//! - `histogram`: 一维计数直方图与坐标轴换算
//! - `plot`: 图表生成
//! - `export`: 数据导出
//!
//! ## 依赖关系
//! - 被 `commands/spectrum.rs` 使用
//! - 使用 `models/spectrum.rs`

pub mod export;
pub mod histogram;
pub mod plot;

pub use histogram::Histogram1d;
