//! # 统一错误处理模块
//!
//! 定义 Mcakit 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// Mcakit 统一错误类型
#[derive(Error, Debug)]
pub enum McakitError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("No <<DATA>> section found in: {path}")]
    MissingDataSection { path: String },

    #[error("<<DATA>> section contains no numeric counts in: {path}")]
    EmptyDataSection { path: String },

    // ─────────────────────────────────────────────────────────────
    // 刻度错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid calibration index {index} (file has {available} points)")]
    InvalidCalibrationIndex { index: usize, available: usize },

    #[error("Invalid conversion factor {factor} from point {channel} = {energy} (must be positive and finite)")]
    InvalidConversionFactor {
        factor: f64,
        channel: f64,
        energy: f64,
    },

    #[error("Calibration file contains no usable points: {path}")]
    EmptyCalibration { path: String },

    // ─────────────────────────────────────────────────────────────
    // 拟合错误
    // ─────────────────────────────────────────────────────────────
    #[error("Gaussian fit failed: {0}")]
    FitError(String),

    #[error("Fit range {0}-{1} selects no histogram bins")]
    EmptyFitRange(f64, f64),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range format: {0}")]
    InvalidRange(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, McakitError>;
