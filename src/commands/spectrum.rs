//! # spectrum 子命令实现
//!
//! 从 MCA 导出文件生成能谱直方图，按需做能量刻度与高斯拟合。
//!
//! ## 功能
//! - 支持单文件和批量目录处理
//! - 并行计算（rayon）
//! - 可选能量刻度（道址 → keV 线性换算）
//! - 单高斯 / 双高斯峰拟合
//! - 输出图像 (PNG/SVG) 或数据文件 (CSV/XY)
//!
//! ## 依赖关系
//! - 使用 `cli/spectrum.rs` 定义的 SpectrumArgs
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `parsers/`、`hist/`、`fit/` 完成流水线

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::spectrum::{
    parse_fit_range, parse_peak_guesses, FitKind, OutputFormat, SpectrumArgs,
};
use crate::error::{McakitError, Result};
use crate::fit::{self, GaussianFit};
use crate::hist::{self, Histogram1d};
use crate::parsers;
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 执行能谱分析
pub fn execute(args: SpectrumArgs) -> Result<()> {
    output::print_header("MCA Spectrum Analysis");

    // 检测输入类型
    if args.input.is_file() {
        execute_single_file(&args)
    } else if args.input.is_dir() {
        execute_batch(&args)
    } else {
        Err(McakitError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 单文件与批量模式共享的分析配置
struct AnalysisConfig {
    /// 能量转换系数；None 表示保持道址轴
    conversion: Option<f64>,
    fit: FitKind,
    fit_range: Option<(f64, f64)>,
    guesses: Option<Vec<f64>>,
    width: u32,
    height: u32,
}

/// 从命令行参数构建分析配置（刻度文件只读一次）
fn build_config(args: &SpectrumArgs) -> Result<AnalysisConfig> {
    let conversion = match &args.calibration {
        Some(path) => {
            let (calibration, skipped) = parsers::calibration::parse_calibration_file(path)?;
            for line in &skipped {
                output::print_warning(&format!("Skipping malformed calibration line: {}", line));
            }
            output::print_info(&format!(
                "Loaded {} calibration points from '{}'",
                calibration.len(),
                path.display()
            ));

            let factor = calibration.conversion_factor(args.calibration_index)?;
            output::print_info(&format!(
                "Conversion factor (point {}): {:.6} keV/channel",
                args.calibration_index, factor
            ));
            Some(factor)
        }
        None => None,
    };

    let fit_range = match &args.fit_range {
        Some(range) => Some(parse_fit_range(range)?),
        None => None,
    };

    let guesses = match &args.guess {
        Some(input) => {
            let guesses = parse_peak_guesses(input)?;
            let expected = args.fit.peak_count();
            if expected > 0 && guesses.len() != expected {
                return Err(McakitError::InvalidArgument(format!(
                    "--fit {} expects {} peak guess(es), got {}",
                    args.fit,
                    expected,
                    guesses.len()
                )));
            }
            Some(guesses)
        }
        None => None,
    };

    Ok(AnalysisConfig {
        conversion,
        fit: args.fit,
        fit_range,
        guesses,
        width: args.width,
        height: args.height,
    })
}

/// 单文件模式
fn execute_single_file(args: &SpectrumArgs) -> Result<()> {
    output::print_info(&format!("Single file mode: '{}'", args.input.display()));

    let config = build_config(args)?;

    let spectrum = parsers::mca::parse_mca_file(&args.input)?;
    output::print_success(&format!(
        "Loaded spectrum: {} ({} channels, {} total counts)",
        spectrum.name,
        spectrum.channel_count(),
        spectrum.total_counts()
    ));

    let hist = Histogram1d::from_spectrum(&spectrum, config.conversion);

    let fit = run_fit(&hist, &config)?;
    if let Some(ref fit) = fit {
        print_fit_table(fit);
    }

    let format = args
        .format
        .unwrap_or_else(|| guess_format_from_extension(&args.output));
    let title = args.title.clone().unwrap_or_else(|| spectrum.name.clone());

    render_output(&hist, fit.as_ref(), &args.output, format, &title, &config)?;

    output::print_success(&format!("Spectrum saved to '{}'", args.output.display()));
    Ok(())
}

/// 批量处理模式
fn execute_batch(args: &SpectrumArgs) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));

    let collector = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)
        .recursive(args.recursive);

    let files = collector.collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} MCA export files", files.len()));

    // 确保输出目录存在
    fs::create_dir_all(&args.output).map_err(|e| McakitError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let format = args.format.unwrap_or(OutputFormat::Png);
    output::print_info(&format!("Output format: {:?}", format));

    let config = Arc::new(BatchSpectrumConfig {
        analysis: build_config(args)?,
        output_dir: args.output.clone(),
        format,
        overwrite: args.overwrite,
    });

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(files, |file| process_batch_file(file, &config));

    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} success, {} skipped, {} failed",
        result.success, result.skipped, result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 批量处理配置
struct BatchSpectrumConfig {
    analysis: AnalysisConfig,
    output_dir: PathBuf,
    format: OutputFormat,
    overwrite: bool,
}

/// 处理批量模式中的单个文件
fn process_batch_file(input: &PathBuf, config: &Arc<BatchSpectrumConfig>) -> ProcessResult {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let ext = match config.format {
        OutputFormat::Png => "png",
        OutputFormat::Svg => "svg",
        OutputFormat::Csv => "csv",
        OutputFormat::Xy => "xy",
    };

    let output_file = config.output_dir.join(format!("{}_spectrum.{}", stem, ext));

    if output_file.exists() && !config.overwrite {
        return ProcessResult::Skipped(format!(
            "Output exists, skipping: {}",
            output_file.display()
        ));
    }

    match process_quiet(input, &output_file, config) {
        Ok(_) => {
            ProcessResult::Success(format!("{} -> {}", input.display(), output_file.display()))
        }
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

/// 批量模式下的静默流水线（不打印中间信息）
fn process_quiet(input: &Path, output: &Path, config: &BatchSpectrumConfig) -> Result<()> {
    let spectrum = parsers::mca::parse_mca_file(input)?;
    let hist = Histogram1d::from_spectrum(&spectrum, config.analysis.conversion);
    let fit = run_fit(&hist, &config.analysis)?;

    render_output(
        &hist,
        fit.as_ref(),
        output,
        config.format,
        &spectrum.name,
        &config.analysis,
    )
}

/// 按配置执行峰拟合
fn run_fit(hist: &Histogram1d, config: &AnalysisConfig) -> Result<Option<GaussianFit>> {
    let n_peaks = config.fit.peak_count();
    if n_peaks == 0 {
        return Ok(None);
    }

    let (min, max) = config
        .fit_range
        .unwrap_or_else(|| (hist.x_low(), hist.x_high()));
    let (xs, ys) = hist.window(min, max)?;

    let guesses = match &config.guesses {
        Some(guesses) => guesses.clone(),
        None => fit::gaussian::default_peak_guesses(&xs, &ys, n_peaks),
    };

    let fit = fit::gaussian::fit_gaussians(&xs, &ys, &guesses, hist.bin_width)?;
    Ok(Some(fit))
}

/// 按输出格式渲染或导出
fn render_output(
    hist: &Histogram1d,
    fit: Option<&GaussianFit>,
    output: &Path,
    format: OutputFormat,
    title: &str,
    config: &AnalysisConfig,
) -> Result<()> {
    match format {
        OutputFormat::Png | OutputFormat::Svg => hist::plot::generate_spectrum_plot(
            hist,
            fit,
            output,
            title,
            config.width,
            config.height,
            format == OutputFormat::Svg,
        ),
        OutputFormat::Csv => hist::export::to_csv(hist, fit, output),
        OutputFormat::Xy => hist::export::to_xy(hist, output),
    }
}

/// 从文件扩展名推断输出格式
fn guess_format_from_extension(path: &Path) -> OutputFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("svg") => OutputFormat::Svg,
        Some("csv") => OutputFormat::Csv,
        Some("xy") | Some("dat") | Some("txt") => OutputFormat::Xy,
        _ => OutputFormat::Png,
    }
}

/// 打印拟合结果表格
fn print_fit_table(fit: &GaussianFit) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct FitRow {
        #[tabled(rename = "Peak")]
        peak: usize,
        #[tabled(rename = "Centroid")]
        centroid: String,
        #[tabled(rename = "Amplitude")]
        amplitude: String,
        #[tabled(rename = "Sigma")]
        sigma: String,
        #[tabled(rename = "FWHM")]
        fwhm: String,
        #[tabled(rename = "Area (counts)")]
        area: String,
    }

    let rows: Vec<FitRow> = fit
        .components
        .iter()
        .enumerate()
        .map(|(i, c)| FitRow {
            peak: i + 1,
            centroid: format!("{:.4} ± {:.4}", c.mean.value, c.mean.uncertainty),
            amplitude: format!("{:.2} ± {:.2}", c.amplitude.value, c.amplitude.uncertainty),
            sigma: format!("{:.4} ± {:.4}", c.sigma.value, c.sigma.uncertainty),
            fwhm: format!("{:.4} ± {:.4}", c.fwhm.value, c.fwhm.uncertainty),
            area: format!("{:.1} ± {:.1}", c.area.value, c.area.uncertainty),
        })
        .collect();

    output::print_header(&format!(
        "Gaussian Fit ({:.2} - {:.2})",
        fit.range.0, fit.range.1
    ));
    let table = Table::new(&rows);
    println!("{}", table);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_format_from_extension() {
        assert_eq!(
            guess_format_from_extension(Path::new("spectrum.png")),
            OutputFormat::Png
        );
        assert_eq!(
            guess_format_from_extension(Path::new("spectrum.SVG")),
            OutputFormat::Svg
        );
        assert_eq!(
            guess_format_from_extension(Path::new("spectrum.csv")),
            OutputFormat::Csv
        );
        assert_eq!(
            guess_format_from_extension(Path::new("spectrum.dat")),
            OutputFormat::Xy
        );
        assert_eq!(
            guess_format_from_extension(Path::new("spectrum")),
            OutputFormat::Png
        );
    }
}
