//! # 能谱数据导出
//!
//! 导出直方图（及可选拟合曲线）到 CSV 和 XY 格式。
//!
//! ## 支持格式
//! - CSV: 坐标、计数，有拟合时附拟合值列
//! - XY: 两列文本数据交换格式（坐标, 计数）
//!
//! ## 依赖关系
//! - 被 `commands/spectrum.rs` 调用
//! - 使用 `hist/histogram.rs` 的 Histogram1d
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{McakitError, Result};
use crate::fit::GaussianFit;
use crate::hist::Histogram1d;

use std::fs::File;
use std::io::Write;
use std::path::Path;

/// 导出直方图为 CSV 格式
pub fn to_csv(hist: &Histogram1d, fit: Option<&GaussianFit>, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    let axis_column = if hist.bin_width == 1.0 {
        "channel"
    } else {
        "energy_kev"
    };

    if fit.is_some() {
        wtr.write_record([axis_column, "counts", "fit"])?;
    } else {
        wtr.write_record([axis_column, "counts"])?;
    }

    for (x, y) in hist.points() {
        match fit {
            Some(fit) => wtr.write_record([
                format!("{:.4}", x),
                format!("{}", y as u64),
                format!("{:.4}", fit.evaluate(x)),
            ])?,
            None => wtr.write_record([format!("{:.4}", x), format!("{}", y as u64)])?,
        }
    }

    wtr.flush().map_err(|e| McakitError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出直方图为 XY 格式
pub fn to_xy(hist: &Histogram1d, output_path: &Path) -> Result<()> {
    let write_err = |e: std::io::Error| McakitError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    };

    let mut file = File::create(output_path).map_err(write_err)?;

    writeln!(file, "# MCA Spectrum: {}", hist.name).map_err(write_err)?;
    writeln!(file, "# Bin width: {:.6}", hist.bin_width).map_err(write_err)?;
    writeln!(file, "# Columns: {}, Counts", hist.axis_label).map_err(write_err)?;
    writeln!(file, "#").map_err(write_err)?;

    for (x, y) in hist.points() {
        writeln!(file, "{:.4}\t{}", x, y as u64).map_err(write_err)?;
    }

    Ok(())
}
