//! # spectrum 子命令 CLI 定义
//!
//! 能谱分析主命令：直方图生成、能量刻度、高斯拟合、绘图与数据导出。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/spectrum.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::error::{McakitError, Result};

// ─────────────────────────────────────────────────────────────
// 值枚举
// ─────────────────────────────────────────────────────────────

/// 峰拟合类型
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum FitKind {
    /// No fit, histogram only
    #[default]
    None,
    /// Single Gaussian peak
    Gaussian,
    /// Two Gaussian peaks with independent widths
    DoubleGaussian,
}

impl FitKind {
    /// 拟合的峰数量
    pub fn peak_count(&self) -> usize {
        match self {
            FitKind::None => 0,
            FitKind::Gaussian => 1,
            FitKind::DoubleGaussian => 2,
        }
    }
}

impl std::fmt::Display for FitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitKind::None => write!(f, "none"),
            FitKind::Gaussian => write!(f, "gaussian"),
            FitKind::DoubleGaussian => write!(f, "double-gaussian"),
        }
    }
}

/// 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
    /// CSV data file (axis value, counts, fit)
    Csv,
    /// XY data file (axis value, counts)
    Xy,
}

// ─────────────────────────────────────────────────────────────
// 参数解析辅助函数
// ─────────────────────────────────────────────────────────────

/// 解析 "min-max" 形式的拟合范围
///
/// 负数范围没有物理意义（道址和能量都非负），因此 '-' 只作分隔符。
pub fn parse_fit_range(range: &str) -> Result<(f64, f64)> {
    let parts: Vec<&str> = range.split('-').collect();
    if parts.len() != 2 {
        return Err(McakitError::InvalidRange(range.to_string()));
    }

    let min: f64 = parts[0]
        .trim()
        .parse()
        .map_err(|_| McakitError::InvalidRange(range.to_string()))?;
    let max: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|_| McakitError::InvalidRange(range.to_string()))?;

    if min < 0.0 || max <= min {
        return Err(McakitError::InvalidRange(format!(
            "{} (must be 0 <= min < max)",
            range
        )));
    }

    Ok((min, max))
}

/// 解析逗号分隔的峰位初值列表（如 "3.2,5.9"）
pub fn parse_peak_guesses(input: &str) -> Result<Vec<f64>> {
    let mut guesses = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let value: f64 = part.parse().map_err(|_| {
            McakitError::InvalidArgument(format!("Invalid peak guess '{}'", part))
        })?;
        guesses.push(value);
    }
    if guesses.is_empty() {
        return Err(McakitError::InvalidArgument(format!(
            "No peak guesses in '{}'",
            input
        )));
    }
    Ok(guesses)
}

// ─────────────────────────────────────────────────────────────
// spectrum 子命令参数
// ─────────────────────────────────────────────────────────────

/// spectrum 子命令参数
#[derive(Args, Debug)]
pub struct SpectrumArgs {
    /// Input: MCA export file or directory containing exports
    pub input: PathBuf,

    /// Output: file path (single mode) or directory (batch mode)
    #[arg(short, long, default_value = "spectrum.png")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Energy calibration file ('channel = energy' lines); omit for a channel axis
    #[arg(short, long)]
    pub calibration: Option<PathBuf>,

    /// Index of the calibration point used for the conversion factor
    #[arg(long, default_value_t = 0)]
    pub calibration_index: usize,

    /// Peak fit applied to the histogram
    #[arg(long, value_enum, default_value = "none")]
    pub fit: FitKind,

    /// Fit window on the x axis (e.g., "3-5.3"); defaults to the full axis
    #[arg(long)]
    pub fit_range: Option<String>,

    /// Comma-separated initial peak centers (e.g., "5.9" or "5.9,6.5")
    #[arg(long)]
    pub guess: Option<String>,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Title for the plot (default: spectrum file stem)
    #[arg(long)]
    pub title: Option<String>,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode, e.g., "*.txt,*.mca")
    #[arg(long, default_value = "*.txt,*.mca")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fit_range() {
        assert_eq!(parse_fit_range("3-5.3").unwrap(), (3.0, 5.3));
        assert_eq!(parse_fit_range("0-1024").unwrap(), (0.0, 1024.0));
        assert_eq!(parse_fit_range(" 300 - 900 ").unwrap(), (300.0, 900.0));
    }

    #[test]
    fn test_parse_fit_range_rejects_bad_input() {
        assert!(parse_fit_range("5.3").is_err());
        assert!(parse_fit_range("a-b").is_err());
        assert!(parse_fit_range("5-3").is_err());
        assert!(parse_fit_range("4-4").is_err());
    }

    #[test]
    fn test_parse_peak_guesses() {
        assert_eq!(parse_peak_guesses("5.9").unwrap(), vec![5.9]);
        assert_eq!(parse_peak_guesses("5.9, 6.5").unwrap(), vec![5.9, 6.5]);
        assert!(parse_peak_guesses("5.9,x").is_err());
        assert!(parse_peak_guesses(",").is_err());
    }

    #[test]
    fn test_fit_kind_peak_count() {
        assert_eq!(FitKind::None.peak_count(), 0);
        assert_eq!(FitKind::Gaussian.peak_count(), 1);
        assert_eq!(FitKind::DoubleGaussian.peak_count(), 2);
    }
}
