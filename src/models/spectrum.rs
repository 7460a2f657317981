//! # 能谱数据模型
//!
//! MCA 导出文件解析后的统一表示：逐道计数加头部记录。
//!
//! ## 依赖关系
//! - 由 `parsers/mca.rs` 构造
//! - 被 `hist/` 和 `commands/` 使用

use serde::{Deserialize, Serialize};

/// 一条能谱：每个道址一个非负计数，下标即道址顺序
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spectrum {
    /// 谱名（通常取自文件名）
    pub name: String,
    /// 数据段之前的 `KEY - VALUE` 头部记录
    pub header: Vec<(String, String)>,
    /// 逐道计数
    pub counts: Vec<u32>,
}

impl Spectrum {
    /// 创建新能谱
    pub fn new(name: impl Into<String>, header: Vec<(String, String)>, counts: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            header,
            counts,
        }
    }

    /// 道数
    pub fn channel_count(&self) -> usize {
        self.counts.len()
    }

    /// 总计数
    pub fn total_counts(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// 计数最高的道址及其计数
    pub fn peak_channel(&self) -> Option<(usize, u32)> {
        self.counts
            .iter()
            .enumerate()
            .max_by_key(|(_, &c)| c)
            .map(|(i, &c)| (i, c))
    }

    /// 按键查找头部记录
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.header
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectrum_summary() {
        let spec = Spectrum::new("run1", vec![], vec![1, 5, 3, 5, 0]);
        assert_eq!(spec.channel_count(), 5);
        assert_eq!(spec.total_counts(), 14);
        // 相同最大值时取最后出现的道址 (max_by_key 语义)
        assert_eq!(spec.peak_channel(), Some((3, 5)));
    }

    #[test]
    fn test_header_lookup() {
        let spec = Spectrum::new(
            "run1",
            vec![("TAG".to_string(), "live_data".to_string())],
            vec![0],
        );
        assert_eq!(spec.header_value("tag"), Some("live_data"));
        assert_eq!(spec.header_value("GAIN"), None);
    }

    #[test]
    fn test_empty_spectrum() {
        let spec = Spectrum::new("empty", vec![], vec![]);
        assert_eq!(spec.peak_channel(), None);
        assert_eq!(spec.total_counts(), 0);
    }
}
