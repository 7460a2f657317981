//! # 解析器模块
//!
//! 提供 MCA 导出文件和能量刻度文件的解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: mca, calibration

pub mod calibration;
pub mod mca;
