// ==========================================
// 项目组合挣值引擎 - API 层
// ==========================================
// 职责: 提供驾驶舱查询与配置管理接口，供应用层 / CLI 调用
// ==========================================

pub mod config_api;
pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use config_api::ConfigApi;
pub use dashboard_api::{DashboardApi, DashboardInput, DashboardView, RiskEntry, StatusLabels};
pub use error::{ApiError, ApiResult};
