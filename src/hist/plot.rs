//! # 能谱图表生成
//!
//! 使用 `plotters` 库绘制能谱直方图与拟合曲线。
//!
//! ## 功能
//! - 直方图阶梯轮廓 + 半透明填充
//! - 高斯拟合曲线叠加与峰参数标注
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/spectrum.rs` 调用
//! - 使用 `hist/histogram.rs` 的 Histogram1d
//! - 使用 `fit/gaussian.rs` 的 GaussianFit
//! - 使用 `plotters` 渲染图表

use crate::error::{McakitError, Result};
use crate::fit::GaussianFit;
use crate::hist::Histogram1d;

use plotters::prelude::*;
use std::path::Path;

/// 生成能谱图表
pub fn generate_spectrum_plot(
    hist: &Histogram1d,
    fit: Option<&GaussianFit>,
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_spectrum_chart(&root, hist, fit, title)?;
        root.present()
            .map_err(|e| McakitError::Other(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_spectrum_chart(&root, hist, fit, title)?;
        root.present()
            .map_err(|e| McakitError::Other(e.to_string()))?;
    }
    Ok(())
}

/// 绘制能谱图表的核心逻辑
fn draw_spectrum_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    hist: &Histogram1d,
    fit: Option<&GaussianFit>,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| McakitError::Other(format!("{:?}", e)))?;

    let x_min = hist.x_low();
    let x_max = hist.x_high();
    let y_max = (hist.max_count() as f64 * 1.1).max(1.0);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(|e| McakitError::Other(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc(hist.axis_label)
        .y_desc("Counts")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| McakitError::Other(format!("{:?}", e)))?;

    // 直方图：半透明填充 + 阶梯轮廓
    let hist_color = RGBColor(0, 102, 204);
    let steps = hist.step_points();

    chart
        .draw_series(AreaSeries::new(
            steps.iter().copied(),
            0.0,
            hist_color.mix(0.2),
        ))
        .map_err(|e| McakitError::Other(format!("{:?}", e)))?;

    chart
        .draw_series(LineSeries::new(
            steps.iter().copied(),
            hist_color.stroke_width(1),
        ))
        .map_err(|e| McakitError::Other(format!("{:?}", e)))?;

    // 拟合曲线与峰参数标注
    if let Some(fit) = fit {
        let fit_color = RGBColor(204, 0, 0);

        chart
            .draw_series(LineSeries::new(
                fit.curve_points(500),
                fit_color.stroke_width(2),
            ))
            .map_err(|e| McakitError::Other(format!("{:?}", e)))?;

        for component in &fit.components {
            let label = format!(
                "μ = {:.3} ± {:.3}  FWHM = {:.3}",
                component.mean.value, component.mean.uncertainty, component.fwhm.value
            );
            let y_pos = (component.amplitude.value * 1.02).min(y_max * 0.98);

            chart
                .draw_series(std::iter::once(Text::new(
                    label,
                    (component.mean.value, y_pos),
                    ("sans-serif", 14).into_font().color(&BLACK),
                )))
                .map_err(|e| McakitError::Other(format!("{:?}", e)))?;
        }
    }

    Ok(())
}
