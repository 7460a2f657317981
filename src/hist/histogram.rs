//! # 一维计数直方图
//!
//! 把能谱逐道计数映射到等宽直方图。不加刻度时横轴是道址，
//! 加刻度时第 i 道覆盖 `[i*f, (i+1)*f)`，f 为转换系数。
//!
//! ## 依赖关系
//! - 被 `hist/plot.rs`、`hist/export.rs`、`commands/spectrum.rs` 使用
//! - 使用 `models/spectrum.rs`

use crate::error::{McakitError, Result};
use crate::models::Spectrum;

/// 横轴标签：道址轴
pub const CHANNEL_AXIS: &str = "Channel";
/// 横轴标签：能量轴
pub const ENERGY_AXIS: &str = "Energy (keV)";

/// 一维等宽计数直方图
#[derive(Debug, Clone)]
pub struct Histogram1d {
    /// 谱名
    pub name: String,
    /// 逐格计数（下标即道址）
    pub counts: Vec<u32>,
    /// 格宽（道址轴为 1.0，能量轴为转换系数）
    pub bin_width: f64,
    /// 横轴标签
    pub axis_label: &'static str,
}

impl Histogram1d {
    /// 从能谱构建直方图，`conversion_factor` 给出时横轴换算为能量
    pub fn from_spectrum(spectrum: &Spectrum, conversion_factor: Option<f64>) -> Self {
        let (bin_width, axis_label) = match conversion_factor {
            Some(factor) => (factor, ENERGY_AXIS),
            None => (1.0, CHANNEL_AXIS),
        };

        Self {
            name: spectrum.name.clone(),
            counts: spectrum.counts.clone(),
            bin_width,
            axis_label,
        }
    }

    /// 格数
    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    /// 横轴下界
    pub fn x_low(&self) -> f64 {
        0.0
    }

    /// 横轴上界
    pub fn x_high(&self) -> f64 {
        self.counts.len() as f64 * self.bin_width
    }

    /// 第 i 格中心
    pub fn bin_center(&self, i: usize) -> f64 {
        (i as f64 + 0.5) * self.bin_width
    }

    /// 最大计数
    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// (格中心, 计数) 序列
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (self.bin_center(i), c as f64))
    }

    /// 截取横轴窗口 `[min, max]` 内的 (中心, 计数) 数据，用于拟合
    pub fn window(&self, min: f64, max: f64) -> Result<(Vec<f64>, Vec<f64>)> {
        let mut xs = Vec::new();
        let mut ys = Vec::new();

        for (x, y) in self.points() {
            if x >= min && x <= max {
                xs.push(x);
                ys.push(y);
            }
        }

        if xs.is_empty() {
            return Err(McakitError::EmptyFitRange(min, max));
        }

        Ok((xs, ys))
    }

    /// 阶梯折线点序列，用于绘制直方图轮廓
    pub fn step_points(&self) -> Vec<(f64, f64)> {
        let mut points = Vec::with_capacity(self.counts.len() * 2 + 2);
        points.push((0.0, 0.0));

        for (i, &c) in self.counts.iter().enumerate() {
            let left = i as f64 * self.bin_width;
            let right = (i + 1) as f64 * self.bin_width;
            points.push((left, c as f64));
            points.push((right, c as f64));
        }

        points.push((self.x_high(), 0.0));
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Spectrum;

    fn spectrum() -> Spectrum {
        Spectrum::new("run1", vec![], vec![1, 4, 9, 4, 1])
    }

    #[test]
    fn test_channel_axis() {
        let hist = Histogram1d::from_spectrum(&spectrum(), None);
        assert_eq!(hist.n_bins(), 5);
        assert_eq!(hist.axis_label, CHANNEL_AXIS);
        assert!((hist.x_high() - 5.0).abs() < 1e-12);
        assert!((hist.bin_center(0) - 0.5).abs() < 1e-12);
        assert_eq!(hist.max_count(), 9);
    }

    #[test]
    fn test_energy_axis() {
        let hist = Histogram1d::from_spectrum(&spectrum(), Some(0.01));
        assert_eq!(hist.axis_label, ENERGY_AXIS);
        assert!((hist.x_high() - 0.05).abs() < 1e-12);
        assert!((hist.bin_center(2) - 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_window_selects_bin_centers() {
        let hist = Histogram1d::from_spectrum(&spectrum(), None);
        let (xs, ys) = hist.window(1.0, 3.0).unwrap();
        // 中心 1.5 和 2.5 落在窗口内
        assert_eq!(xs, vec![1.5, 2.5]);
        assert_eq!(ys, vec![4.0, 9.0]);
    }

    #[test]
    fn test_empty_window_is_an_error() {
        let hist = Histogram1d::from_spectrum(&spectrum(), None);
        assert!(matches!(
            hist.window(100.0, 200.0),
            Err(McakitError::EmptyFitRange(_, _))
        ));
    }

    #[test]
    fn test_step_points_close_the_outline() {
        let hist = Histogram1d::from_spectrum(&spectrum(), None);
        let steps = hist.step_points();
        assert_eq!(steps.first(), Some(&(0.0, 0.0)));
        assert_eq!(steps.last(), Some(&(5.0, 0.0)));
        assert_eq!(steps.len(), 12);
    }
}
