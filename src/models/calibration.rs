//! # 能量刻度数据模型
//!
//! 刻度点集合与道址→能量线性转换系数的计算。
//!
//! ## 依赖关系
//! - 由 `parsers/calibration.rs` 构造
//! - 被 `commands/` 使用

use serde::{Deserialize, Serialize};

use crate::error::{McakitError, Result};

/// 单个刻度采样点：`channel = energy` 一行对应一个
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    /// 道址
    pub channel: f64,
    /// 对应能量 (keV)
    pub energy: f64,
}

impl CalibrationPoint {
    /// 该点的能量/道址比，即过原点的线性转换系数
    pub fn conversion_factor(&self) -> f64 {
        self.energy / self.channel
    }
}

/// 能量刻度：按文件行序排列的刻度点
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Calibration {
    pub points: Vec<CalibrationPoint>,
}

impl Calibration {
    /// 创建新刻度
    pub fn new(points: Vec<CalibrationPoint>) -> Self {
        Self { points }
    }

    /// 刻度点数量
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 取第 `index` 个刻度点的转换系数
    ///
    /// 越界或系数非正/非有限都视为致命错误，由调用方中止运行。
    pub fn conversion_factor(&self, index: usize) -> Result<f64> {
        let point = self
            .points
            .get(index)
            .ok_or(McakitError::InvalidCalibrationIndex {
                index,
                available: self.points.len(),
            })?;

        let factor = point.conversion_factor();
        if !factor.is_finite() || factor <= 0.0 {
            return Err(McakitError::InvalidConversionFactor {
                factor,
                channel: point.channel,
                energy: point.energy,
            });
        }

        Ok(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_factor() {
        let cal = Calibration::new(vec![
            CalibrationPoint {
                channel: 590.0,
                energy: 5.9,
            },
            CalibrationPoint {
                channel: 650.0,
                energy: 6.5,
            },
        ]);
        assert!((cal.conversion_factor(0).unwrap() - 0.01).abs() < 1e-12);
        assert!((cal.conversion_factor(1).unwrap() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_index() {
        let cal = Calibration::new(vec![CalibrationPoint {
            channel: 590.0,
            energy: 5.9,
        }]);
        let err = cal.conversion_factor(3).unwrap_err();
        assert!(matches!(
            err,
            crate::error::McakitError::InvalidCalibrationIndex {
                index: 3,
                available: 1
            }
        ));
    }

    #[test]
    fn test_nonpositive_factor_rejected() {
        let cal = Calibration::new(vec![
            CalibrationPoint {
                channel: 590.0,
                energy: -5.9,
            },
            CalibrationPoint {
                channel: 0.0,
                energy: 5.9,
            },
        ]);
        // 负能量 → 负系数
        assert!(cal.conversion_factor(0).is_err());
        // 零道址 → 无限系数
        assert!(cal.conversion_factor(1).is_err());
    }
}
