// ==========================================
// 项目组合挣值引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入、快照导出/恢复
// 存储: config_kv 表 (key-value + scope)，只使用 global scope
// ==========================================

use crate::config::dashboard_config::{DashboardConfig, DashboardConfigReader};
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::thresholds::{HealthThresholds, RiskLimits, ThresholdScheme};
use crate::db::{
    configure_sqlite_connection, init_config_schema, open_sqlite_connection, read_schema_version,
    CURRENT_SCHEMA_VERSION,
};
use crate::domain::types::VariancePeriod;
use crate::perf::PerfGuard;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

/// 默认 Top-N 项目数
pub const DEFAULT_SUMMARY_TOP_N: usize = 5;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 打开数据库并确保配置表存在
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_config_schema(&conn)?;

        let version = read_schema_version(&conn)?;
        if version != Some(CURRENT_SCHEMA_VERSION) {
            warn!(
                db_path = db_path,
                found = ?version,
                expected = CURRENT_SCHEMA_VERSION,
                "配置库 schema_version 与当前代码不一致"
            );
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA 并建表（均幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_config_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    // ==========================================
    // 基础读写
    // ==========================================

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 读取配置值，缺失时返回默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        info!(config_key = key, "配置已更新");
        Ok(())
    }

    /// 删除 global scope 的配置值，返回是否存在
    pub fn delete_global_config_value(&self, key: &str) -> ConfigResult<bool> {
        let conn = self.lock()?;
        let affected = conn.execute(
            "DELETE FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
        )?;
        Ok(affected > 0)
    }

    // ==========================================
    // 类型化写入
    // ==========================================

    pub fn set_threshold_scheme(&self, scheme: ThresholdScheme) -> ConfigResult<()> {
        self.set_global_config_value(config_keys::HEALTH_THRESHOLD_SCHEME, scheme.to_db_str())
    }

    /// 写入自定义阈值表（先校验，非法表拒绝写入）
    pub fn set_custom_thresholds(&self, thresholds: &HealthThresholds) -> ConfigResult<()> {
        thresholds
            .validate()
            .map_err(|reason| ConfigError::invalid_value(config_keys::HEALTH_THRESHOLDS, reason))?;
        let raw = serde_json::to_string(thresholds)?;
        self.set_global_config_value(config_keys::HEALTH_THRESHOLDS, &raw)
    }

    pub fn clear_custom_thresholds(&self) -> ConfigResult<bool> {
        self.delete_global_config_value(config_keys::HEALTH_THRESHOLDS)
    }

    pub fn set_risk_limits(&self, limits: RiskLimits) -> ConfigResult<()> {
        self.set_global_config_value(config_keys::RISK_BUDGET_CAP, &limits.budget_cap.to_string())?;
        self.set_global_config_value(config_keys::RISK_TOTAL_CAP, &limits.total_cap.to_string())
    }

    pub fn set_default_variance_period(&self, period: VariancePeriod) -> ConfigResult<()> {
        self.set_global_config_value(config_keys::DEFAULT_VARIANCE_PERIOD, &period.to_string())
    }

    // ==========================================
    // 快照导出 / 恢复
    // ==========================================

    /// 获取所有 global 配置的快照（JSON 对象，按键排序）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let _perf = PerfGuard::new("config_snapshot_export");
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }

    /// 从配置快照恢复配置（覆盖同名键，单事务）
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let _perf = PerfGuard::new("config_snapshot_restore");
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in &config_map {
            // 元信息键不回写
            if key.starts_with("__meta_") {
                continue;
            }
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit()?;
        info!(restored = count, "配置快照已恢复");
        Ok(count)
    }

    fn parse_usize_or(&self, key: &str, default: usize) -> ConfigResult<usize> {
        let value = self.get_config_or_default(key, &default.to_string())?;
        match value.trim().parse::<usize>() {
            Ok(v) => Ok(v),
            Err(_) => {
                warn!(config_key = key, raw_value = %value, "配置格式错误，使用默认值");
                Ok(default)
            }
        }
    }
}

// ==========================================
// DashboardConfigReader Trait 实现
// ==========================================
#[async_trait]
impl DashboardConfigReader for ConfigManager {
    async fn get_threshold_scheme(&self) -> ConfigResult<ThresholdScheme> {
        let value = self.get_config_or_default(
            config_keys::HEALTH_THRESHOLD_SCHEME,
            ThresholdScheme::default().to_db_str(),
        )?;
        Ok(ThresholdScheme::from_str(&value))
    }

    async fn get_health_thresholds(&self) -> ConfigResult<HealthThresholds> {
        let scheme = self.get_threshold_scheme().await?;
        let raw = match self.get_global_config_value(config_keys::HEALTH_THRESHOLDS)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(scheme.thresholds()),
        };

        let parsed = serde_json::from_str::<HealthThresholds>(&raw)
            .map_err(|e| e.to_string())
            .and_then(|t| t.validate().map(|_| t));

        match parsed {
            Ok(thresholds) => Ok(thresholds),
            Err(reason) => {
                warn!(
                    config_key = config_keys::HEALTH_THRESHOLDS,
                    scheme = %scheme,
                    reason = %reason,
                    "自定义阈值表无效，回退为预设方案"
                );
                Ok(scheme.thresholds())
            }
        }
    }

    async fn get_risk_limits(&self) -> ConfigResult<RiskLimits> {
        let defaults = RiskLimits::default();
        Ok(RiskLimits {
            budget_cap: self.parse_usize_or(config_keys::RISK_BUDGET_CAP, defaults.budget_cap)?,
            total_cap: self.parse_usize_or(config_keys::RISK_TOTAL_CAP, defaults.total_cap)?,
        })
    }

    async fn get_summary_top_n(&self) -> ConfigResult<usize> {
        self.parse_usize_or(config_keys::SUMMARY_TOP_N, DEFAULT_SUMMARY_TOP_N)
    }

    async fn get_default_variance_period(&self) -> ConfigResult<VariancePeriod> {
        let default = VariancePeriod::default();
        let value =
            self.get_config_or_default(config_keys::DEFAULT_VARIANCE_PERIOD, &default.to_string())?;
        Ok(VariancePeriod::parse(&value).unwrap_or_else(|| {
            warn!(
                config_key = config_keys::DEFAULT_VARIANCE_PERIOD,
                raw_value = %value,
                "对比周期配置无效，使用默认值"
            );
            default
        }))
    }
}

impl ConfigManager {
    /// 一次性加载驾驶舱配置
    pub async fn load_dashboard_config(&self) -> ConfigResult<DashboardConfig> {
        Ok(DashboardConfig {
            scheme: self.get_threshold_scheme().await?,
            health_thresholds: self.get_health_thresholds().await?,
            risk_limits: self.get_risk_limits().await?,
            summary_top_n: self.get_summary_top_n().await?,
            default_variance_period: self.get_default_variance_period().await?,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 健康度
    pub const HEALTH_THRESHOLD_SCHEME: &str = "health_threshold_scheme"; // STANDARD / STRICT
    pub const HEALTH_THRESHOLDS: &str = "health_thresholds"; // 自定义阈值表 (JSON)

    // 风险列表截断
    pub const RISK_BUDGET_CAP: &str = "risk_budget_cap";
    pub const RISK_TOTAL_CAP: &str = "risk_total_cap";

    // 概览
    pub const SUMMARY_TOP_N: &str = "summary_top_n";

    // 趋势对比
    pub const DEFAULT_VARIANCE_PERIOD: &str = "default_variance_period"; // day/week/month/quarter
}
