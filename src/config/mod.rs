// ==========================================
// 项目组合挣值引擎 - 配置层
// ==========================================
// 职责: 健康度阈值表、风险截断参数、驾驶舱默认值
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod dashboard_config;
pub mod error;
pub mod thresholds;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager, DEFAULT_SUMMARY_TOP_N};
pub use dashboard_config::{DashboardConfig, DashboardConfigReader};
pub use error::{ConfigError, ConfigResult};
pub use thresholds::{HealthThresholds, PenaltyBand, RiskLimits, StatusCutoffs, ThresholdScheme};
