//! # 数据模型模块
//!
//! 定义能谱与能量刻度的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`hist/` 和 `commands/` 使用
//! - 子模块: spectrum, calibration

pub mod calibration;
pub mod spectrum;

pub use calibration::{Calibration, CalibrationPoint};
pub use spectrum::Spectrum;
