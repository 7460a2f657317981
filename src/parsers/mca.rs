//! # MCA 导出文件解析器
//!
//! 解析多道分析器的文本导出格式。
//!
//! ## 格式说明
//! ```text
//! <<PMCA SPECTRUM>>
//! TAG - live_data
//! DESCRIPTION - Fe55 2601V
//! GAIN - 2
//! <<DATA>>
//! 0
//! 12
//! 347
//! ...
//! <<END>>
//! ```
//!
//! `<<DATA>>` 行开始数据段；之后任何同时含 `<<` 和 `>>` 的行结束数据段。
//! 数据段内无法解析为非负整数的行直接跳过。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/spectrum.rs`

use std::fs;
use std::path::Path;

use crate::error::{McakitError, Result};
use crate::models::Spectrum;

/// 数据段开始标记
const DATA_MARKER: &str = "<<DATA>>";

/// 解析 MCA 导出文件
pub fn parse_mca_file(path: &Path) -> Result<Spectrum> {
    let content = fs::read_to_string(path).map_err(|e| McakitError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_mca_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("spectrum"),
    )
}

/// 从字符串内容解析 MCA 导出格式
pub fn parse_mca_content(content: &str, name: &str) -> Result<Spectrum> {
    let mut header: Vec<(String, String)> = Vec::new();
    let mut counts: Vec<u32> = Vec::new();
    let mut reading_data = false;
    let mut found_data = false;

    for line in content.lines() {
        if !reading_data {
            if line.contains(DATA_MARKER) {
                reading_data = true;
                found_data = true;
                continue;
            }
            if let Some(record) = parse_header_record(line) {
                header.push(record);
            }
            continue;
        }

        // 数据段内出现下一个 <<...>> 段标记即结束
        if line.contains("<<") && line.contains(">>") {
            break;
        }

        if let Ok(count) = line.trim().parse::<u32>() {
            counts.push(count);
        }
        // 其余行（空行、非数值内容）跳过
    }

    if !found_data {
        return Err(McakitError::MissingDataSection {
            path: name.to_string(),
        });
    }
    if counts.is_empty() {
        return Err(McakitError::EmptyDataSection {
            path: name.to_string(),
        });
    }

    Ok(Spectrum::new(name, header, counts))
}

/// 解析数据段之前的 `KEY - VALUE` 头部记录
fn parse_header_record(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with("<<") {
        return None;
    }

    let (key, value) = line.split_once(" - ")?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_spectrum() {
        let content = "<<PMCA SPECTRUM>>\nTAG - live_data\n<<DATA>>\n0\n12\n347\n5\n<<END>>\n";
        let spec = parse_mca_content(content, "run1").unwrap();
        assert_eq!(spec.counts, vec![0, 12, 347, 5]);
        assert_eq!(spec.name, "run1");
        assert_eq!(spec.header_value("TAG"), Some("live_data"));
    }

    #[test]
    fn test_junk_lines_in_data_are_skipped() {
        let content = "<<DATA>>\n10\n\nnot a number\n-3\n3.5\n20\n<<END>>\n";
        let spec = parse_mca_content(content, "run1").unwrap();
        // 空行、文本、负数、小数都不是合法计数
        assert_eq!(spec.counts, vec![10, 20]);
    }

    #[test]
    fn test_data_ends_at_next_section_marker() {
        let content = "<<DATA>>\n1\n2\n<<DP5 CONFIGURATION>>\n99\n<<END>>\n";
        let spec = parse_mca_content(content, "run1").unwrap();
        assert_eq!(spec.counts, vec![1, 2]);
    }

    #[test]
    fn test_missing_data_section() {
        let content = "<<PMCA SPECTRUM>>\nTAG - live_data\n<<END>>\n";
        let err = parse_mca_content(content, "run1").unwrap_err();
        assert!(matches!(err, McakitError::MissingDataSection { .. }));
    }

    #[test]
    fn test_empty_data_section() {
        let content = "<<DATA>>\nno numbers here\n<<END>>\n";
        let err = parse_mca_content(content, "run1").unwrap_err();
        assert!(matches!(err, McakitError::EmptyDataSection { .. }));
    }

    #[test]
    fn test_unterminated_data_section_reads_to_eof() {
        let content = "<<DATA>>\n1\n2\n3\n";
        let spec = parse_mca_content(content, "run1").unwrap();
        assert_eq!(spec.counts, vec![1, 2, 3]);
    }

    #[test]
    fn test_header_records() {
        let content =
            "<<PMCA SPECTRUM>>\nTAG - live_data\nDESCRIPTION - Fe55 2601V\nGAIN - 2\nodd line\n<<DATA>>\n7\n<<END>>\n";
        let spec = parse_mca_content(content, "run1").unwrap();
        assert_eq!(spec.header.len(), 3);
        assert_eq!(spec.header_value("DESCRIPTION"), Some("Fe55 2601V"));
        assert_eq!(spec.header_value("GAIN"), Some("2"));
    }
}
