// ==========================================
// 项目组合挣值引擎 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和 API 实例
// 会话: 每个驾驶舱视图一个 CrossFilterSession，显式 打开/读取/更新/关闭
// ==========================================

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::{ApiError, ApiResult, ConfigApi, DashboardApi, DashboardInput, DashboardView};
use crate::config::config_manager::ConfigManager;
use crate::config::dashboard_config::DashboardConfig;
use crate::domain::filter::CrossFilterState;
use crate::domain::snapshot::MetricSnapshot;
use crate::domain::types::VariancePeriod;
use crate::engine::cross_filter::{CrossFilterSession, FilterAction};
use crate::i18n;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "PORTFOLIO_EVM_DB_PATH";

/// 应用状态
///
/// 持有配置、API 实例与各视图的筛选会话
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 配置管理 API
    pub config_api: Arc<ConfigApi>,

    /// 当前生效配置（reload_config 后整体替换）
    config: RwLock<DashboardConfig>,

    /// 驾驶舱 API（随配置重建）
    dashboard_api: RwLock<Arc<DashboardApi>>,

    /// 视图ID -> 筛选会话
    sessions: Mutex<HashMap<String, CrossFilterSession>>,
}

impl AppState {
    /// 创建新的 AppState 实例
    ///
    /// 打开（必要时创建）配置库，加载驾驶舱配置并装配引擎
    pub async fn new(db_path: String) -> ApiResult<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let config_manager = Arc::new(ConfigManager::new(&db_path)?);
        let config = config_manager.load_dashboard_config().await?;
        let dashboard_api = Arc::new(DashboardApi::new(&config));
        let config_api = Arc::new(ConfigApi::new(config_manager.clone()));

        tracing::info!(
            scheme = %config.scheme,
            budget_cap = config.risk_limits.budget_cap,
            total_cap = config.risk_limits.total_cap,
            "AppState初始化完成"
        );

        Ok(Self {
            db_path,
            config_manager,
            config_api,
            config: RwLock::new(config),
            dashboard_api: RwLock::new(dashboard_api),
            sessions: Mutex::new(HashMap::new()),
        })
    }

    /// 重新加载配置并重建驾驶舱 API
    pub async fn reload_config(&self) -> ApiResult<DashboardConfig> {
        let config = self.config_manager.load_dashboard_config().await?;
        let api = Arc::new(DashboardApi::new(&config));

        *self
            .dashboard_api
            .write()
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))? = api;
        *self
            .config
            .write()
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))? = config.clone();

        tracing::info!(scheme = %config.scheme, "配置已重新加载");
        Ok(config)
    }

    pub fn config(&self) -> ApiResult<DashboardConfig> {
        self.config
            .read()
            .map(|c| c.clone())
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))
    }

    pub fn dashboard_api(&self) -> ApiResult<Arc<DashboardApi>> {
        self.dashboard_api
            .read()
            .map(|api| Arc::clone(&api))
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))
    }

    // ==========================================
    // 筛选会话生命周期
    // ==========================================

    fn sessions(&self) -> ApiResult<MutexGuard<'_, HashMap<String, CrossFilterSession>>> {
        self.sessions
            .lock()
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))
    }

    fn session_not_found(view_id: &str) -> ApiError {
        ApiError::NotFound(i18n::t_with_args(
            "error.session_not_found",
            &[("view_id", view_id)],
        ))
    }

    /// 打开视图会话（已存在时返回现有会话ID）
    pub fn open_session(&self, view_id: &str) -> ApiResult<Uuid> {
        let view_id = view_id.trim();
        if view_id.is_empty() {
            return Err(ApiError::InvalidInput("视图ID不能为空".to_string()));
        }
        let mut sessions = self.sessions()?;
        let session = sessions
            .entry(view_id.to_string())
            .or_insert_with(CrossFilterSession::new);
        Ok(session.session_id())
    }

    /// 读取视图会话快照
    pub fn session_snapshot(&self, view_id: &str) -> ApiResult<Arc<CrossFilterState>> {
        self.sessions()?
            .get(view_id.trim())
            .map(CrossFilterSession::snapshot)
            .ok_or_else(|| Self::session_not_found(view_id))
    }

    /// 对视图会话应用动作，返回更新后的快照
    pub fn update_session(
        &self,
        view_id: &str,
        action: FilterAction,
    ) -> ApiResult<Arc<CrossFilterState>> {
        let mut sessions = self.sessions()?;
        let session = sessions
            .get_mut(view_id.trim())
            .ok_or_else(|| Self::session_not_found(view_id))?;
        session.apply(action);
        Ok(session.snapshot())
    }

    /// 关闭视图会话，返回是否存在
    pub fn close_session(&self, view_id: &str) -> ApiResult<bool> {
        Ok(self.sessions()?.remove(view_id.trim()).is_some())
    }

    /// 按视图会话生成驾驶舱视图（period 缺省时使用配置的默认周期）
    pub fn build_view(
        &self,
        view_id: &str,
        input: &DashboardInput,
        history: &[MetricSnapshot],
        period: Option<VariancePeriod>,
        now: DateTime<Utc>,
    ) -> ApiResult<DashboardView> {
        let filters = self.session_snapshot(view_id)?;
        let period = match period {
            Some(p) => p,
            None => self.config()?.default_variance_period,
        };
        self.dashboard_api()?
            .build_view(input, &filters, history, period, now)
    }
}

/// 获取默认数据库路径
///
/// 优先使用环境变量 PORTFOLIO_EVM_DB_PATH，其次用户数据目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./portfolio_evm.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("portfolio-evm-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("portfolio-evm");

        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("portfolio_evm.db");
        }
    }

    path.to_string_lossy().to_string()
}
