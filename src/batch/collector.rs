//! # 文件收集器
//!
//! 根据输入路径和模式收集待处理的 MCA 导出文件列表。
//!
//! ## 功能
//! - 支持单文件和目录输入
//! - 逗号分隔的多 glob 模式
//! - 递归目录搜索
//!
//! ## 依赖关系
//! - 被 `commands/spectrum.rs` 调用
//! - 使用 `walkdir` 遍历目录
//! - 使用 `glob` 做文件名匹配

use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    input: PathBuf,
    /// 匹配模式列表
    patterns: Vec<Pattern>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            patterns: vec![Pattern::new("*").expect("literal pattern is valid")],
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式；非法模式忽略）
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        let patterns: Vec<Pattern> = pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| Pattern::new(s).ok())
            .collect();

        if !patterns.is_empty() {
            self.patterns = patterns;
        }
        self
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的文件
    pub fn collect(&self) -> Vec<PathBuf> {
        if self.input.is_file() {
            return vec![self.input.clone()];
        }

        if !self.input.is_dir() {
            return vec![];
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.matches(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }

    /// 检查文件名是否匹配任一模式
    fn matches(&self, path: &Path) -> bool {
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        self.patterns.iter().any(|p| p.matches(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector_with(pattern: &str) -> FileCollector {
        FileCollector::new(PathBuf::from(".")).with_pattern(pattern)
    }

    #[test]
    fn test_pattern_matching() {
        let c = collector_with("*.txt,*.mca");
        assert!(c.matches(Path::new("data/2601V.txt")));
        assert!(c.matches(Path::new("run.mca")));
        assert!(!c.matches(Path::new("fitting.csv")));
    }

    #[test]
    fn test_empty_pattern_falls_back_to_match_all() {
        let c = collector_with(" , ");
        assert!(c.matches(Path::new("anything.dat")));
    }

    #[test]
    fn test_question_mark_wildcard() {
        let c = collector_with("26?1V.txt");
        assert!(c.matches(Path::new("2601V.txt")));
        assert!(c.matches(Path::new("2621V.txt")));
        assert!(!c.matches(Path::new("26011V.txt")));
    }
}
