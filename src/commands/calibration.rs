//! # calibration 子命令实现
//!
//! 检查能量刻度文件：列出全部刻度点与各自的转换系数，
//! 并可校验指定序号的点是否可用。
//!
//! ## 依赖关系
//! - 使用 `cli/calibration.rs` 定义的 CalibrationArgs
//! - 使用 `parsers/calibration.rs` 与 `models/calibration.rs`

use crate::cli::calibration::CalibrationArgs;
use crate::error::Result;
use crate::parsers;
use crate::utils::output;

/// 执行刻度文件检查
pub fn execute(args: CalibrationArgs) -> Result<()> {
    output::print_header("Energy Calibration Inspection");

    let (calibration, skipped) = parsers::calibration::parse_calibration_file(&args.file)?;

    for line in &skipped {
        output::print_warning(&format!("Skipping malformed calibration line: {}", line));
    }

    output::print_info(&format!(
        "Loaded {} calibration points from '{}'",
        calibration.len(),
        args.file.display()
    ));

    print_calibration_table(&calibration);

    if let Some(index) = args.index {
        // 越界或非正系数在这里直接报错退出
        let factor = calibration.conversion_factor(index)?;
        output::print_success(&format!(
            "Point {} is valid: conversion factor {:.6} keV/channel",
            index, factor
        ));
    }

    Ok(())
}

/// 打印刻度点表格
fn print_calibration_table(calibration: &crate::models::Calibration) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct CalibrationRow {
        #[tabled(rename = "Index")]
        index: usize,
        #[tabled(rename = "Channel")]
        channel: String,
        #[tabled(rename = "Energy (keV)")]
        energy: String,
        #[tabled(rename = "keV/channel")]
        factor: String,
    }

    let rows: Vec<CalibrationRow> = calibration
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| CalibrationRow {
            index: i,
            channel: format!("{:.2}", p.channel),
            energy: format!("{:.4}", p.energy),
            factor: format!("{:.6}", p.conversion_factor()),
        })
        .collect();

    let table = Table::new(&rows);
    println!("{}", table);
}
