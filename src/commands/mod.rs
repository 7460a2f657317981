//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `hist/`, `fit/`, `utils/`
//! - 子模块: spectrum, calibration, info

pub mod calibration;
pub mod info;
pub mod spectrum;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Spectrum(args) => spectrum::execute(args),
        Commands::Calibration(args) => calibration::execute(args),
        Commands::Info(args) => info::execute(args),
    }
}
