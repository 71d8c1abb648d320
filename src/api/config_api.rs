// ==========================================
// 项目组合挣值引擎 - 配置管理 API
// ==========================================
// 职责: 配置查询、校验后更新、快照导出/恢复
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{config_keys, ConfigManager};
use crate::config::dashboard_config::DashboardConfig;
use crate::config::thresholds::{HealthThresholds, ThresholdScheme};
use crate::domain::types::VariancePeriod;

/// 允许通过 API 写入的配置键
const KNOWN_KEYS: [&str; 6] = [
    config_keys::HEALTH_THRESHOLD_SCHEME,
    config_keys::HEALTH_THRESHOLDS,
    config_keys::RISK_BUDGET_CAP,
    config_keys::RISK_TOTAL_CAP,
    config_keys::SUMMARY_TOP_N,
    config_keys::DEFAULT_VARIANCE_PERIOD,
];

/// 快照中的元信息键前缀（导入时跳过）
const META_KEY_PREFIX: &str = "__meta_";

// ==========================================
// ConfigApi - 配置管理 API
// ==========================================
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 查询所有 global 配置（按键排序）
    pub fn list_configs(&self) -> ApiResult<BTreeMap<String, String>> {
        let snapshot = self.config_manager.get_config_snapshot()?;
        serde_json::from_str(&snapshot).map_err(|e| ApiError::SerializationError(e.to_string()))
    }

    /// 查询单个配置
    pub fn get_config(&self, key: &str) -> ApiResult<Option<String>> {
        if key.trim().is_empty() {
            return Err(ApiError::InvalidInput("配置键不能为空".to_string()));
        }
        Ok(self.config_manager.get_global_config_value(key.trim())?)
    }

    /// 更新配置（按键校验取值）
    pub fn update_config(&self, key: &str, value: &str) -> ApiResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ApiError::InvalidInput("配置键不能为空".to_string()));
        }
        if !KNOWN_KEYS.contains(&key) {
            return Err(ApiError::InvalidInput(format!("未知配置键: {}", key)));
        }
        Self::validate_value(key, value)?;

        self.config_manager.set_global_config_value(key, value.trim())?;
        info!(config_key = key, "配置更新成功");
        Ok(())
    }

    /// 写入自定义阈值表
    pub fn set_custom_thresholds(&self, thresholds: &HealthThresholds) -> ApiResult<()> {
        Ok(self.config_manager.set_custom_thresholds(thresholds)?)
    }

    /// 删除自定义阈值表，恢复预设方案
    pub fn reset_custom_thresholds(&self) -> ApiResult<bool> {
        Ok(self.config_manager.clear_custom_thresholds()?)
    }

    /// 导出配置快照
    pub fn export_snapshot(&self) -> ApiResult<String> {
        Ok(self.config_manager.get_config_snapshot()?)
    }

    /// 从快照恢复配置
    ///
    /// 逐键按 update_config 的规则校验，任一键非法则整体拒绝
    pub fn import_snapshot(&self, snapshot_json: &str) -> ApiResult<usize> {
        if snapshot_json.trim().is_empty() {
            return Err(ApiError::InvalidInput("配置快照不能为空".to_string()));
        }
        let entries: BTreeMap<String, String> = serde_json::from_str(snapshot_json)
            .map_err(|e| ApiError::InvalidInput(format!("配置快照格式错误: {}", e)))?;

        for (key, value) in &entries {
            if key.starts_with(META_KEY_PREFIX) {
                continue;
            }
            if !KNOWN_KEYS.contains(&key.as_str()) {
                return Err(ApiError::InvalidInput(format!("未知配置键: {}", key)));
            }
            Self::validate_value(key, value)?;
        }

        Ok(self.config_manager.restore_config_from_snapshot(snapshot_json)?)
    }

    /// 读取已解析的驾驶舱配置
    pub async fn get_dashboard_config(&self) -> ApiResult<DashboardConfig> {
        Ok(self.config_manager.load_dashboard_config().await?)
    }

    fn validate_value(key: &str, value: &str) -> ApiResult<()> {
        let trimmed = value.trim();
        let invalid = |reason: &str| Err(ApiError::InvalidInput(format!("配置{}无效: {}", key, reason)));

        match key {
            config_keys::HEALTH_THRESHOLD_SCHEME => {
                let upper = trimmed.to_uppercase();
                if upper != ThresholdScheme::Standard.to_db_str()
                    && upper != ThresholdScheme::Strict.to_db_str()
                {
                    return invalid("只能为 STANDARD 或 STRICT");
                }
            }
            config_keys::HEALTH_THRESHOLDS => {
                let thresholds: HealthThresholds = serde_json::from_str(trimmed)
                    .map_err(|e| ApiError::InvalidInput(format!("配置{}无效: {}", key, e)))?;
                if let Err(reason) = thresholds.validate() {
                    return invalid(&reason);
                }
            }
            config_keys::RISK_BUDGET_CAP | config_keys::SUMMARY_TOP_N => {
                if trimmed.parse::<usize>().is_err() {
                    return invalid("必须为非负整数");
                }
            }
            config_keys::RISK_TOTAL_CAP => match trimmed.parse::<usize>() {
                Ok(v) if v > 0 => {}
                _ => return invalid("必须为正整数"),
            },
            config_keys::DEFAULT_VARIANCE_PERIOD => {
                if VariancePeriod::parse(trimmed).is_none() {
                    return invalid("只能为 day / week / month / quarter");
                }
            }
            _ => {}
        }
        Ok(())
    }
}
