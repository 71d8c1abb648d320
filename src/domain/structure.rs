// ==========================================
// 项目组合挣值引擎 - 排程结构摘要
// ==========================================
// 职责: 大纲层级计数 + 依赖链接覆盖率
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// DependencyStats - 依赖链接统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyStats {
    pub total_predecessor_links: usize,
    pub total_successor_links: usize,
    pub tasks_with_predecessors: usize,
    pub tasks_with_successors: usize,
    pub total_leaf_tasks: usize,    // 非摘要任务
    pub linked_leaf_tasks: usize,   // 至少一条前置或后续
    pub isolated_leaf_tasks: usize, // 无任何链接
    pub coverage_percent: f64,      // linked / leaf * 100，保留 2 位
}

// ==========================================
// ScheduleStructureSummary - 排程结构摘要
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStructureSummary {
    pub total_rows: usize,
    pub projects: usize, // 大纲级别 <= 1
    pub units: usize,    // 大纲级别 2
    pub phases: usize,   // 大纲级别 3
    pub tasks: usize,    // 大纲级别 >= 4
    pub critical_tasks: usize,
    pub dependencies: DependencyStats,
}
