// ==========================================
// 项目组合挣值引擎 - 健康度阈值表
// ==========================================
// 职责: 健康分扣分表 + 红黄绿灯分界，支持预设方案与自定义覆写
// 存储: config_kv (health_threshold_scheme / health_thresholds)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// PenaltyBand - 扣分档
// ==========================================
// 指标 < below 时扣 penalty 分；多档时命中第一档（below 最小者优先）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyBand {
    pub below: f64,
    pub penalty: u8,
}

impl PenaltyBand {
    pub const fn new(below: f64, penalty: u8) -> Self {
        Self { below, penalty }
    }
}

// ==========================================
// StatusCutoffs - 红黄绿灯分界
// ==========================================
// value >= green_at → 绿；value >= yellow_at → 黄；否则红
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCutoffs {
    pub green_at: f64,
    pub yellow_at: f64,
}

impl StatusCutoffs {
    pub const fn new(green_at: f64, yellow_at: f64) -> Self {
        Self { green_at, yellow_at }
    }
}

// ==========================================
// HealthThresholds - 健康度阈值表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthThresholds {
    pub spi_penalties: Vec<PenaltyBand>,
    pub cpi_penalties: Vec<PenaltyBand>,
    pub schedule_status: StatusCutoffs, // 作用于 SPI
    pub budget_status: StatusCutoffs,   // 作用于 CPI
    pub quality_status: StatusCutoffs,  // 作用于完成度 (0-100)
}

impl HealthThresholds {
    /// 标准方案（默认）: <0.9 扣 25，<1.0 扣 10
    pub fn standard() -> Self {
        let bands = vec![PenaltyBand::new(0.9, 25), PenaltyBand::new(1.0, 10)];
        Self {
            spi_penalties: bands.clone(),
            cpi_penalties: bands,
            schedule_status: StatusCutoffs::new(1.0, 0.9),
            budget_status: StatusCutoffs::new(1.0, 0.9),
            quality_status: StatusCutoffs::new(80.0, 50.0),
        }
    }

    /// 严格方案: <0.85 扣 30，<0.95 扣 15，<1.0 扣 5
    pub fn strict() -> Self {
        let bands = vec![
            PenaltyBand::new(0.85, 30),
            PenaltyBand::new(0.95, 15),
            PenaltyBand::new(1.0, 5),
        ];
        Self {
            spi_penalties: bands.clone(),
            cpi_penalties: bands,
            ..Self::standard()
        }
    }

    /// 校验阈值表
    ///
    /// # 规则
    /// - 所有阈值为有限数，扣分 <= 100
    /// - 扣分档按 below 严格递增，扣分随之不增（保证健康分对 SPI/CPI 单调不减）
    /// - 红黄绿分界: green_at >= yellow_at
    pub fn validate(&self) -> Result<(), String> {
        Self::validate_bands("spiPenalties", &self.spi_penalties)?;
        Self::validate_bands("cpiPenalties", &self.cpi_penalties)?;
        Self::validate_cutoffs("scheduleStatus", &self.schedule_status)?;
        Self::validate_cutoffs("budgetStatus", &self.budget_status)?;
        Self::validate_cutoffs("qualityStatus", &self.quality_status)?;
        Ok(())
    }

    fn validate_bands(field: &str, bands: &[PenaltyBand]) -> Result<(), String> {
        for band in bands {
            if !band.below.is_finite() {
                return Err(format!("{}: 阈值必须为有限数", field));
            }
            if band.penalty > 100 {
                return Err(format!("{}: 扣分不能超过 100 (实际 {})", field, band.penalty));
            }
        }
        for pair in bands.windows(2) {
            if pair[1].below <= pair[0].below {
                return Err(format!("{}: 阈值必须严格递增", field));
            }
            if pair[1].penalty > pair[0].penalty {
                return Err(format!("{}: 扣分必须随阈值升高而不增", field));
            }
        }
        Ok(())
    }

    fn validate_cutoffs(field: &str, cutoffs: &StatusCutoffs) -> Result<(), String> {
        if !cutoffs.green_at.is_finite() || !cutoffs.yellow_at.is_finite() {
            return Err(format!("{}: 分界必须为有限数", field));
        }
        if cutoffs.green_at < cutoffs.yellow_at {
            return Err(format!("{}: greenAt 不能小于 yellowAt", field));
        }
        Ok(())
    }
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self::standard()
    }
}

// ==========================================
// ThresholdScheme - 预设方案
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdScheme {
    Standard, // 0.9 / 1.0 → 25 / 10
    Strict,   // 0.85 / 0.95 / 1.0 → 30 / 15 / 5
}

impl ThresholdScheme {
    /// 从字符串解析方案，未知值回退为 STANDARD
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "STRICT" => ThresholdScheme::Strict,
            _ => ThresholdScheme::Standard,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            ThresholdScheme::Standard => "STANDARD",
            ThresholdScheme::Strict => "STRICT",
        }
    }

    pub fn thresholds(&self) -> HealthThresholds {
        match self {
            ThresholdScheme::Standard => HealthThresholds::standard(),
            ThresholdScheme::Strict => HealthThresholds::strict(),
        }
    }
}

impl Default for ThresholdScheme {
    fn default() -> Self {
        ThresholdScheme::Standard
    }
}

impl fmt::Display for ThresholdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// RiskLimits - 风险列表截断参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskLimits {
    pub budget_cap: usize, // 预算风险在合并前的上限
    pub total_cap: usize,  // 合并后的总上限
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            budget_cap: 15,
            total_cap: 30,
        }
    }
}
