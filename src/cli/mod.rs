//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `spectrum`: 能谱直方图生成与高斯拟合
//! - `calibration`: 能量刻度文件检查
//! - `info`: MCA 导出文件信息
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: spectrum, calibration, info

pub mod calibration;
pub mod info;
pub mod spectrum;

use clap::{Parser, Subcommand};

/// Mcakit - MCA 能谱分析工具箱
#[derive(Parser)]
#[command(name = "mcakit")]
#[command(version)]
#[command(about = "A multichannel analyzer spectrum analysis toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Build a histogram from an MCA export, optionally calibrate and fit Gaussians
    Spectrum(spectrum::SpectrumArgs),

    /// Inspect an energy calibration file and its conversion factors
    Calibration(calibration::CalibrationArgs),

    /// Show header records and counting summary of an MCA export
    Info(info::InfoArgs),
}
