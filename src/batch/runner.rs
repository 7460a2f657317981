//! # 批量执行器
//!
//! 并行执行批量处理任务。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代
//! - 进度条显示
//! - 错误收集与汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/spectrum.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::utils::progress;

use rayon::prelude::*;
use std::path::PathBuf;

/// 单个文件处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult {
    /// 处理成功
    Success(String),
    /// 跳过（如输出已存在）
    Skipped(String),
    /// 处理失败
    Failed(String, String), // (文件路径, 错误信息)
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Skipped(_) => self.skipped += 1,
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path, err));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器，0 表示按 CPU 数自动选择
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    /// 并行处理文件列表并汇总结果
    pub fn run<F>(&self, files: Vec<PathBuf>, processor: F) -> BatchResult
    where
        F: Fn(&PathBuf) -> ProcessResult + Sync + Send,
    {
        let pb = progress::create_progress_bar(files.len() as u64, "Processing");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .expect("rayon pool construction");

        let results: Vec<ProcessResult> = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let result = processor(file);
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();

        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }

        batch_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_result_merge() {
        let mut result = BatchResult::default();
        result.merge(ProcessResult::Success("a".to_string()));
        result.merge(ProcessResult::Skipped("b".to_string()));
        result.merge(ProcessResult::Failed("c".to_string(), "broken".to_string()));

        assert_eq!(result.success, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.total(), 3);
        assert_eq!(result.failures[0].0, "c");
    }
}
