//! # 峰拟合模块
//!
//! 提供对直方图窗口的高斯峰拟合。
//!
//! ## 依赖关系
//! - 被 `commands/spectrum.rs` 使用
//! - 使用 `varpro` + `nalgebra` 做可分离非线性最小二乘

pub mod gaussian;

pub use gaussian::{GaussianComponent, GaussianFit, Value};
