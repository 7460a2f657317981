//! # info 子命令实现
//!
//! 打印 MCA 导出文件的头部记录与计数摘要，不做任何分析。
//!
//! ## 依赖关系
//! - 使用 `cli/info.rs` 定义的 InfoArgs
//! - 使用 `parsers/mca.rs`

use crate::cli::info::InfoArgs;
use crate::error::Result;
use crate::parsers;
use crate::utils::output;

/// 执行文件信息查看
pub fn execute(args: InfoArgs) -> Result<()> {
    output::print_header("MCA Export Info");

    let spectrum = parsers::mca::parse_mca_file(&args.input)?;

    output::print_info(&format!("File: {}", args.input.display()));
    output::print_info(&format!("Channels: {}", spectrum.channel_count()));
    output::print_info(&format!("Total counts: {}", spectrum.total_counts()));

    if let Some((channel, count)) = spectrum.peak_channel() {
        output::print_info(&format!(
            "Highest bin: channel {} ({} counts)",
            channel, count
        ));
    }

    if spectrum.header.is_empty() {
        output::print_warning("No header records before the <<DATA>> section");
        return Ok(());
    }

    if args.full {
        output::print_separator();
        for (key, value) in &spectrum.header {
            println!("  {:20} {}", key, value);
        }
    } else {
        output::print_info(&format!(
            "Header records: {} (use --full to list them)",
            spectrum.header.len()
        ));
    }

    Ok(())
}
