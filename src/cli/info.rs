//! # info 子命令 CLI 定义
//!
//! 查看 MCA 导出文件的头部记录与计数摘要。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/info.rs`

use clap::Args;
use std::path::PathBuf;

/// info 子命令参数
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// MCA export file
    pub input: PathBuf,

    /// Also print every header record, not only the summary
    #[arg(long, default_value_t = false)]
    pub full: bool,
}
