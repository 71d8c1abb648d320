// ==========================================
// 项目组合挣值引擎 - 核心库
// ==========================================
// 技术栈: Rust + SQLite（配置存储）
// 系统定位: 驾驶舱决策支持（只读聚合，不修改输入数据）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 公共工具 - 宽松 JSON 解析
pub mod common;

// 领域层 - 输入快照与派生指标
pub mod domain;

// 引擎层 - 聚合 / 评分 / 风险 / 趋势 / 交叉筛选
pub mod engine;

// 配置层 - 阈值表与驾驶舱默认值
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// SQL 与耗时观测
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 驾驶舱接口
pub mod api;

// 应用层 - 共享状态与视图会话
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{RiskType, TrafficLight, VariancePeriod};

// 领域实体
pub use domain::{
    CrossFilter, CrossFilterState, DrillPathEntry, HourEntry, MetricSnapshot, Milestone,
    PortfolioHealth, Project, ProjectMetrics, RiskItem, ScheduleStructureSummary, Task,
    VarianceTrend,
};

// 引擎
pub use engine::{
    CrossFilterSession, FilterAction, HealthScorer, MetricsAggregator, MetricsCache,
    RiskClassifier, VarianceTrendEngine,
};

// 配置
pub use config::{DashboardConfig, HealthThresholds, RiskLimits, ThresholdScheme};

// API
pub use api::{ApiError, ApiResult, ConfigApi, DashboardApi, DashboardInput, DashboardView};

// 应用
pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "项目组合挣值驾驶舱";
