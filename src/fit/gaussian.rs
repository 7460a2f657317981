//! # 高斯峰拟合
//!
//! 用变量投影法 (varpro) 做单高斯 / 双高斯拟合：
//! 振幅是线性系数，峰位和各峰独立的 sigma 是非线性参数。
//! 参数不确定度取自拟合统计量的方差对角元。
//!
//! ## 依赖关系
//! - 被 `commands/spectrum.rs` 调用
//! - 使用 `varpro` 的 SeparableModelBuilder / LevMarSolver
//! - 使用 `nalgebra` 的 DVector

use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use varpro::model::builder::SeparableModelBuilder;
use varpro::solvers::levmar::{LevMarProblemBuilder, LevMarSolver};

use crate::error::{McakitError, Result};

/// 带不确定度的量
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Value {
    pub value: f64,
    pub uncertainty: f64,
}

impl Value {
    pub fn new(value: f64, uncertainty: f64) -> Self {
        Self { value, uncertainty }
    }
}

/// 单个高斯分量的拟合结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaussianComponent {
    /// 峰高
    pub amplitude: Value,
    /// 峰位
    pub mean: Value,
    /// 标准差
    pub sigma: Value,
    /// 半高全宽
    pub fwhm: Value,
    /// 峰面积（按格宽归一，即计数）
    pub area: Value,
}

impl GaussianComponent {
    /// 由拟合参数计算派生量 (FWHM、面积)
    pub fn new(amplitude: Value, mean: Value, sigma: Value, bin_width: f64) -> Self {
        let fwhm_per_sigma = 2.0 * (2.0 * f64::ln(2.0)).sqrt();
        let fwhm = Value::new(
            fwhm_per_sigma * sigma.value,
            fwhm_per_sigma * sigma.uncertainty,
        );

        let two_pi_sqrt = (2.0 * std::f64::consts::PI).sqrt();
        let area = amplitude.value * sigma.value * two_pi_sqrt / bin_width;
        let area_uncertainty = ((sigma.value * two_pi_sqrt * amplitude.uncertainty).powi(2)
            + (amplitude.value * two_pi_sqrt * sigma.uncertainty).powi(2))
        .sqrt()
            / bin_width;

        Self {
            amplitude,
            mean,
            sigma,
            fwhm,
            area: Value::new(area, area_uncertainty),
        }
    }

    /// 该分量在 x 处的值
    pub fn evaluate(&self, x: f64) -> f64 {
        self.amplitude.value
            * (-((x - self.mean.value).powi(2)) / (2.0 * self.sigma.value.powi(2))).exp()
    }
}

/// 完整拟合结果：若干高斯分量与拟合窗口
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaussianFit {
    pub components: Vec<GaussianComponent>,
    /// 拟合窗口 (x 轴)
    pub range: (f64, f64),
}

impl GaussianFit {
    /// 所有分量之和在 x 处的值
    pub fn evaluate(&self, x: f64) -> f64 {
        self.components.iter().map(|c| c.evaluate(x)).sum()
    }

    /// 在拟合窗口上采样拟合曲线，用于绘图
    pub fn curve_points(&self, n_points: usize) -> Vec<(f64, f64)> {
        let (start, end) = self.range;
        let step = (end - start) / n_points as f64;
        (0..=n_points)
            .map(|i| {
                let x = start + step * i as f64;
                (x, self.evaluate(x))
            })
            .collect()
    }
}

/// 高斯基函数
fn gaussian(x: &DVector<f64>, mean: f64, sigma: f64) -> DVector<f64> {
    x.map(|x_val| (-((x_val - mean).powi(2)) / (2.0 * sigma.powi(2))).exp())
}

/// 对峰位的偏导
fn gaussian_pd_mean(x: &DVector<f64>, mean: f64, sigma: f64) -> DVector<f64> {
    x.map(|x_val| {
        (x_val - mean) / sigma.powi(2) * (-((x_val - mean).powi(2)) / (2.0 * sigma.powi(2))).exp()
    })
}

/// 对 sigma 的偏导
fn gaussian_pd_sigma(x: &DVector<f64>, mean: f64, sigma: f64) -> DVector<f64> {
    x.map(|x_val| {
        let exponent = -((x_val - mean).powi(2)) / (2.0 * sigma.powi(2));
        (x_val - mean).powi(2) / sigma.powi(3) * exponent.exp()
    })
}

/// 没有用户给峰位初值时，从数据里找 n 个峰位
///
/// 第一个取全局最大值处；后续峰在屏蔽掉已选峰 ±range/10 之后取余下最大值处。
pub fn default_peak_guesses(xs: &[f64], ys: &[f64], n_peaks: usize) -> Vec<f64> {
    let mut guesses = Vec::with_capacity(n_peaks);
    if xs.is_empty() {
        return guesses;
    }

    let range = xs[xs.len() - 1] - xs[0];
    let exclusion = range / 10.0;
    let mut masked = vec![false; xs.len()];

    for _ in 0..n_peaks {
        let best = ys
            .iter()
            .enumerate()
            .filter(|(i, _)| !masked[*i])
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i);

        let Some(idx) = best else {
            // 全部被屏蔽：退回到在上一个峰旁边放初值
            let last = *guesses.last().unwrap_or(&xs[0]);
            guesses.push(last + exclusion);
            continue;
        };

        guesses.push(xs[idx]);
        for (i, m) in masked.iter_mut().enumerate() {
            if (xs[i] - xs[idx]).abs() <= exclusion {
                *m = true;
            }
        }
    }

    guesses
}

/// 对 (xs, ys) 数据拟合 `peak_guesses.len()` 个高斯峰
///
/// 每个峰都有独立的 sigma。`bin_width` 用于把峰面积换算成计数。
pub fn fit_gaussians(
    xs: &[f64],
    ys: &[f64],
    peak_guesses: &[f64],
    bin_width: f64,
) -> Result<GaussianFit> {
    if xs.len() != ys.len() {
        return Err(McakitError::FitError(
            "x and y data lengths differ".to_string(),
        ));
    }
    if peak_guesses.is_empty() {
        return Err(McakitError::FitError("no peak positions given".to_string()));
    }
    // 每个峰 3 个参数，数据点必须更多
    if xs.len() < peak_guesses.len() * 3 + 1 {
        return Err(McakitError::FitError(format!(
            "{} data points are too few for {} peak(s)",
            xs.len(),
            peak_guesses.len()
        )));
    }

    let range = xs[xs.len() - 1] - xs[0];
    let initial_sigma = range / (5.0 * peak_guesses.len() as f64);

    let mut parameter_names: Vec<String> = Vec::new();
    let mut initial_guesses: Vec<f64> = Vec::new();
    for (index, &mean) in peak_guesses.iter().enumerate() {
        parameter_names.push(format!("mean{}", index));
        initial_guesses.push(mean);
        parameter_names.push(format!("sigma{}", index));
        initial_guesses.push(initial_sigma);
    }

    let x_data = DVector::from_vec(xs.to_vec());
    let y_data = DVector::from_vec(ys.to_vec());

    let mut builder_proxy = SeparableModelBuilder::<f64>::new(parameter_names)
        .initial_parameters(initial_guesses)
        .independent_variable(x_data)
        .function(&["mean0", "sigma0"], gaussian)
        .partial_deriv("mean0", gaussian_pd_mean)
        .partial_deriv("sigma0", gaussian_pd_sigma);

    for i in 1..peak_guesses.len() {
        builder_proxy = builder_proxy
            .function(&[format!("mean{}", i), format!("sigma{}", i)], gaussian)
            .partial_deriv(format!("mean{}", i), gaussian_pd_mean)
            .partial_deriv(format!("sigma{}", i), gaussian_pd_sigma);
    }

    let model = builder_proxy
        .build()
        .map_err(|e| McakitError::FitError(format!("model build failed: {:?}", e)))?;

    let problem = LevMarProblemBuilder::new(model)
        .observations(y_data)
        .build()
        .map_err(|e| McakitError::FitError(format!("problem build failed: {:?}", e)))?;

    let (fit_result, fit_statistics) = LevMarSolver::default()
        .fit_with_statistics(problem)
        .map_err(|e| McakitError::FitError(format!("solver failed: {:?}", e)))?;

    let nonlinear_parameters = fit_result.nonlinear_parameters();
    let nonlinear_variances = fit_statistics.nonlinear_parameters_variance();
    let linear_coefficients = fit_result
        .linear_coefficients()
        .ok_or_else(|| McakitError::FitError("no linear coefficients".to_string()))?;
    let linear_variances = fit_statistics.linear_coefficients_variance();

    let mut components: Vec<GaussianComponent> = Vec::new();
    for (i, &amplitude) in linear_coefficients.iter().enumerate() {
        let mean = nonlinear_parameters[i * 2];
        let mean_variance = nonlinear_variances[i * 2];
        // 高斯对 sigma 符号对称，取绝对值规范化
        let sigma = nonlinear_parameters[i * 2 + 1].abs();
        let sigma_variance = nonlinear_variances[i * 2 + 1];
        let amplitude_variance = linear_variances[i];

        if sigma == 0.0 || !sigma.is_finite() {
            return Err(McakitError::FitError(format!(
                "degenerate sigma for peak {}",
                i
            )));
        }

        components.push(GaussianComponent::new(
            Value::new(amplitude, amplitude_variance.sqrt()),
            Value::new(mean, mean_variance.sqrt()),
            Value::new(sigma, sigma_variance.sqrt()),
            bin_width,
        ));
    }

    // 峰位升序输出，与初值顺序无关
    components.sort_by(|a, b| a.mean.value.total_cmp(&b.mean.value));

    Ok(GaussianFit {
        components,
        range: (xs[0], xs[xs.len() - 1]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synth(centers: &[(f64, f64, f64)], xs: &[f64]) -> Vec<f64> {
        xs.iter()
            .map(|&x| {
                centers
                    .iter()
                    .map(|&(a, m, s)| a * (-((x - m).powi(2)) / (2.0 * s * s)).exp())
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_component_derived_quantities() {
        let c = GaussianComponent::new(
            Value::new(100.0, 2.0),
            Value::new(50.0, 0.1),
            Value::new(2.0, 0.05),
            1.0,
        );
        // FWHM = 2 sqrt(2 ln 2) * sigma
        assert!((c.fwhm.value - 4.709_64).abs() < 1e-4);
        // 面积 = A * sigma * sqrt(2π)
        assert!((c.area.value - 501.326).abs() < 1e-2);
        assert!(c.area.uncertainty > 0.0);
    }

    #[test]
    fn test_default_guesses_find_two_peaks() {
        let xs: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let ys = synth(&[(80.0, 60.0, 5.0), (50.0, 140.0, 8.0)], &xs);
        let guesses = default_peak_guesses(&xs, &ys, 2);
        assert_eq!(guesses.len(), 2);
        assert!((guesses[0] - 60.0).abs() < 1.0);
        assert!((guesses[1] - 140.0).abs() < 1.0);
    }

    #[test]
    fn test_fit_single_gaussian() {
        let xs: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let ys = synth(&[(100.0, 50.0, 5.0)], &xs);

        let fit = fit_gaussians(&xs, &ys, &[47.0], 1.0).unwrap();
        assert_eq!(fit.components.len(), 1);
        let c = &fit.components[0];
        assert!((c.mean.value - 50.0).abs() < 0.1);
        assert!((c.sigma.value - 5.0).abs() < 0.1);
        assert!((c.amplitude.value - 100.0).abs() < 1.0);
    }

    #[test]
    fn test_fit_double_gaussian_independent_sigmas() {
        let xs: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let ys = synth(&[(80.0, 60.0, 4.0), (50.0, 140.0, 9.0)], &xs);

        let fit = fit_gaussians(&xs, &ys, &[140.0, 62.0], 1.0).unwrap();
        assert_eq!(fit.components.len(), 2);
        // 输出按峰位升序
        assert!((fit.components[0].mean.value - 60.0).abs() < 0.5);
        assert!((fit.components[1].mean.value - 140.0).abs() < 0.5);
        assert!((fit.components[0].sigma.value - 4.0).abs() < 0.5);
        assert!((fit.components[1].sigma.value - 9.0).abs() < 0.5);
    }

    #[test]
    fn test_fit_rejects_too_few_points() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![1.0, 2.0, 1.0];
        assert!(fit_gaussians(&xs, &ys, &[2.0], 1.0).is_err());
    }

    #[test]
    fn test_fit_evaluate_sums_components() {
        let xs: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let ys = synth(&[(100.0, 50.0, 5.0)], &xs);
        let fit = fit_gaussians(&xs, &ys, &[50.0], 1.0).unwrap();
        assert!((fit.evaluate(50.0) - 100.0).abs() < 1.0);
        let curve = fit.curve_points(10);
        assert_eq!(curve.len(), 11);
    }
}
