// ==========================================
// 项目组合挣值引擎 - 组合健康度评分引擎
// ==========================================
// 职责: 由组合 SPI / CPI / 完成度 推导 0-100 健康分与三个红黄绿灯
// 输入: PortfolioTotals（工时求和口径）
// 输出: PortfolioHealth
// 红线: 纯函数；健康分对 SPI、CPI 分别单调不减
// ==========================================

use crate::config::thresholds::{HealthThresholds, PenaltyBand, StatusCutoffs};
use crate::domain::metrics::{PortfolioHealth, PortfolioTotals};
use crate::domain::types::TrafficLight;
use crate::engine::numeric::finite_or;

// ==========================================
// HealthScorer - 健康度评分引擎
// ==========================================
pub struct HealthScorer {
    thresholds: HealthThresholds,
}

impl HealthScorer {
    /// 构造函数
    ///
    /// 阈值表应已通过 `HealthThresholds::validate`，否则单调性不作保证
    pub fn new(thresholds: HealthThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &HealthThresholds {
        &self.thresholds
    }

    /// 评估组合健康度
    pub fn score(&self, totals: &PortfolioTotals) -> PortfolioHealth {
        PortfolioHealth {
            total_hours: finite_or(totals.actual_hours, 0.0),
            baseline_hours: finite_or(totals.baseline_hours, 0.0),
            ..self.evaluate(totals.spi, totals.cpi, totals.percent_complete)
        }
    }

    /// 直接由指数评估（工时合计为 0）
    pub fn evaluate(&self, spi: f64, cpi: f64, percent_complete: f64) -> PortfolioHealth {
        let spi = finite_or(spi, 1.0);
        let cpi = finite_or(cpi, 1.0);
        let percent_complete = finite_or(percent_complete, 0.0);

        PortfolioHealth {
            health_score: self.health_score(spi, cpi),
            spi,
            cpi,
            percent_complete,
            schedule_status: Self::classify(spi, &self.thresholds.schedule_status),
            budget_status: Self::classify(cpi, &self.thresholds.budget_status),
            quality_status: Self::classify(percent_complete, &self.thresholds.quality_status),
            total_hours: 0.0,
            baseline_hours: 0.0,
        }
    }

    /// 健康分: 100 - SPI 扣分 - CPI 扣分，截断到 [0, 100]
    ///
    /// 非有限指数按中性值 1.0 处理
    pub fn health_score(&self, spi: f64, cpi: f64) -> u8 {
        let spi = finite_or(spi, 1.0);
        let cpi = finite_or(cpi, 1.0);
        let penalty = u32::from(Self::penalty_for(spi, &self.thresholds.spi_penalties))
            + u32::from(Self::penalty_for(cpi, &self.thresholds.cpi_penalties));
        100u32.saturating_sub(penalty).min(100) as u8
    }

    /// 命中第一档（阈值最小者）的扣分，未命中为 0
    fn penalty_for(value: f64, bands: &[PenaltyBand]) -> u8 {
        bands
            .iter()
            .find(|band| value < band.below)
            .map(|band| band.penalty)
            .unwrap_or(0)
    }

    fn classify(value: f64, cutoffs: &StatusCutoffs) -> TrafficLight {
        if value >= cutoffs.green_at {
            TrafficLight::Green
        } else if value >= cutoffs.yellow_at {
            TrafficLight::Yellow
        } else {
            TrafficLight::Red
        }
    }
}

impl Default for HealthScorer {
    fn default() -> Self {
        Self::new(HealthThresholds::standard())
    }
}
