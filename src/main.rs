//! # Mcakit - MCA 能谱分析工具箱
//!
//! 将实验室里零散的 ROOT 能谱分析宏用 Rust 重构，统一成单一可执行文件。
//!
//! ## 子命令
//! - `spectrum` - 解析 MCA 导出文件，生成直方图并可选高斯拟合
//! - `calibration` - 检查能量刻度文件，计算转换系数
//! - `info` - 查看 MCA 导出文件的头部信息与统计摘要
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (MCA / 刻度文件解析器)
//!   │     ├── models/    (数据模型)
//!   │     ├── hist/      (直方图、绘图、导出)
//!   │     └── fit/       (高斯拟合)
//!   ├── batch/      (批量处理)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod fit;
mod hist;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
