//! # 能量刻度文件解析器
//!
//! 解析 `channel = energy` 行式刻度文件。
//!
//! ## 格式说明
//! ```text
//! # Fe55 Ka escape / Ka / Kb
//! 340 = 2.957
//! 590 = 5.899
//! 650 = 6.490
//! ```
//!
//! 空行和 `#` 注释行跳过；无法匹配 `数值 = 数值` 的行跳过并计入警告。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/calibration.rs`
//! - 使用 `regex` 匹配行格式

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::{McakitError, Result};
use crate::models::{Calibration, CalibrationPoint};

/// 解析刻度文件，返回刻度与被跳过的格式错误行
pub fn parse_calibration_file(path: &Path) -> Result<(Calibration, Vec<String>)> {
    let content = fs::read_to_string(path).map_err(|e| McakitError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let (calibration, skipped) = parse_calibration_content(&content);

    if calibration.is_empty() {
        return Err(McakitError::EmptyCalibration {
            path: path.display().to_string(),
        });
    }

    Ok((calibration, skipped))
}

/// 从字符串内容解析刻度行
///
/// 返回 (刻度, 被跳过的行)。空刻度不在此处报错，由文件入口统一处理。
pub fn parse_calibration_content(content: &str) -> (Calibration, Vec<String>) {
    let line_re = Regex::new(
        r"^\s*([+-]?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)\s*=\s*([+-]?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)\s*$",
    )
    .expect("calibration line regex is valid");

    let mut points = Vec::new();
    let mut skipped = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match line_re.captures(trimmed) {
            Some(caps) => {
                // 正则保证两个捕获组都是合法浮点字面量
                let channel: f64 = caps[1].parse().expect("regex-matched float");
                let energy: f64 = caps[2].parse().expect("regex-matched float");
                points.push(CalibrationPoint { channel, energy });
            }
            None => skipped.push(trimmed.to_string()),
        }
    }

    (Calibration::new(points), skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calibration_lines() {
        let content = "340 = 2.957\n590 = 5.899\n650 = 6.490\n";
        let (cal, skipped) = parse_calibration_content(content);
        assert_eq!(cal.len(), 3);
        assert!(skipped.is_empty());
        assert!((cal.points[1].channel - 590.0).abs() < 1e-12);
        assert!((cal.points[1].energy - 5.899).abs() < 1e-12);
    }

    #[test]
    fn test_comments_and_blanks_skipped_silently() {
        let content = "# Fe55 calibration\n\n590 = 5.899\n\n# trailing comment\n";
        let (cal, skipped) = parse_calibration_content(content);
        assert_eq!(cal.len(), 1);
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_malformed_lines_reported() {
        let content = "590 = 5.899\n600 5.9\nchannel = energy\n610 =\n620 = 6.2\n";
        let (cal, skipped) = parse_calibration_content(content);
        assert_eq!(cal.len(), 2);
        assert_eq!(skipped, vec!["600 5.9", "channel = energy", "610 ="]);
    }

    #[test]
    fn test_scientific_notation() {
        let content = "5.9e2 = 5.899\n";
        let (cal, skipped) = parse_calibration_content(content);
        assert!(skipped.is_empty());
        assert!((cal.points[0].channel - 590.0).abs() < 1e-9);
    }
}
