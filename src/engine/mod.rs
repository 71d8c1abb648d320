// ==========================================
// 项目组合挣值引擎 - 引擎层
// ==========================================
// 职责: 聚合 / 评分 / 风险分类 / 趋势对比 / 交叉筛选
// 红线: 引擎不访问存储，不返回错误；输出不含 NaN / Infinity
// ==========================================

pub mod cross_filter;
pub mod dependency_coverage;
pub mod health_scorer;
pub mod metrics_aggregator;
pub mod numeric;
pub mod portfolio_summary;
pub mod recalc;
pub mod risk;
pub mod variance_trend;

// 重导出核心引擎
pub use cross_filter::{reduce, CrossFilterSession, FilterAction};
pub use dependency_coverage::DependencyCoverage;
pub use health_scorer::HealthScorer;
pub use metrics_aggregator::MetricsAggregator;
pub use portfolio_summary::{PortfolioSummary, TopProject};
pub use recalc::{CacheStats, InputFingerprint, MetricsCache};
pub use risk::RiskClassifier;
pub use variance_trend::VarianceTrendEngine;
