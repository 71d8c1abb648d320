// ==========================================
// 项目组合挣值引擎 - 驾驶舱配置读取 Trait
// ==========================================
// 职责: 定义引擎装配所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigResult;
use crate::config::thresholds::{HealthThresholds, RiskLimits, ThresholdScheme};
use crate::domain::types::VariancePeriod;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ==========================================
// DashboardConfig - 已解析的驾驶舱配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub scheme: ThresholdScheme,
    pub health_thresholds: HealthThresholds, // 已校验
    pub risk_limits: RiskLimits,
    pub summary_top_n: usize,
    pub default_variance_period: VariancePeriod,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            scheme: ThresholdScheme::default(),
            health_thresholds: HealthThresholds::default(),
            risk_limits: RiskLimits::default(),
            summary_top_n: crate::config::config_manager::DEFAULT_SUMMARY_TOP_N,
            default_variance_period: VariancePeriod::default(),
        }
    }
}

// ==========================================
// DashboardConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait DashboardConfigReader: Send + Sync {
    /// 健康度阈值预设方案
    ///
    /// # 默认值
    /// - STANDARD
    async fn get_threshold_scheme(&self) -> ConfigResult<ThresholdScheme>;

    /// 生效的健康度阈值表
    ///
    /// 自定义表存在且通过校验时使用自定义表，否则使用预设方案
    async fn get_health_thresholds(&self) -> ConfigResult<HealthThresholds>;

    /// 风险列表截断参数
    ///
    /// # 默认值
    /// - budget_cap = 15, total_cap = 30
    async fn get_risk_limits(&self) -> ConfigResult<RiskLimits>;

    /// 概览 Top-N 项目数
    ///
    /// # 默认值
    /// - 5
    async fn get_summary_top_n(&self) -> ConfigResult<usize>;

    /// 默认对比周期
    ///
    /// # 默认值
    /// - week
    async fn get_default_variance_period(&self) -> ConfigResult<VariancePeriod>;
}
