//! # calibration 子命令 CLI 定义
//!
//! 检查能量刻度文件，列出刻度点及各自的转换系数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/calibration.rs`

use clap::Args;
use std::path::PathBuf;

/// calibration 子命令参数
#[derive(Args, Debug)]
pub struct CalibrationArgs {
    /// Calibration file with 'channel = energy' lines
    pub file: PathBuf,

    /// Validate and print the conversion factor for this point index
    #[arg(short, long)]
    pub index: Option<usize>,
}
