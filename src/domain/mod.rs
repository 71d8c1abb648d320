// ==========================================
// 项目组合挣值引擎 - 领域模型层
// ==========================================
// 职责: 定义输入快照、派生指标、筛选会话状态
// 红线: 不含计算逻辑,不含存储逻辑
// ==========================================

pub mod filter;
pub mod labor;
pub mod metrics;
pub mod risk;
pub mod snapshot;
pub mod structure;
pub mod task;
pub mod types;

// 重导出核心类型
pub use filter::{CrossFilter, CrossFilterState, DrillPathEntry};
pub use labor::HourEntry;
pub use metrics::{PortfolioHealth, PortfolioTotals, ProjectMetrics};
pub use risk::RiskItem;
pub use snapshot::{MetricSnapshot, VarianceTrend};
pub use structure::{DependencyStats, ScheduleStructureSummary};
pub use task::{Milestone, Project, Task, TaskRelation, UNKNOWN_PROJECT};
pub use types::{HierarchyType, RelationType, RiskType, TrafficLight, VariancePeriod};
