// ==========================================
// 项目组合挣值引擎 - 依赖覆盖率分析
// ==========================================
// 职责: 统计排程大纲层级与依赖链接覆盖情况
// 输入: 任务列表（含前置/后续关系、大纲级别、摘要标记）
// 输出: ScheduleStructureSummary
// ==========================================

use crate::domain::structure::{DependencyStats, ScheduleStructureSummary};
use crate::domain::task::Task;
use crate::domain::types::HierarchyType;
use crate::engine::numeric::{ratio_or, round_ratio};
use tracing::debug;

// ==========================================
// DependencyCoverage - 依赖覆盖率分析器
// ==========================================
pub struct DependencyCoverage {
    // 无状态引擎
}

impl DependencyCoverage {
    pub fn new() -> Self {
        Self {}
    }

    /// 分析排程结构
    pub fn analyze(&self, tasks: &[Task]) -> ScheduleStructureSummary {
        let mut summary = ScheduleStructureSummary {
            total_rows: tasks.len(),
            ..Default::default()
        };

        for task in tasks {
            match task.hierarchy_type() {
                HierarchyType::Project => summary.projects += 1,
                HierarchyType::Unit => summary.units += 1,
                HierarchyType::Phase => summary.phases += 1,
                HierarchyType::Task => summary.tasks += 1,
            }
            if task.is_critical {
                summary.critical_tasks += 1;
            }
        }

        summary.dependencies = Self::dependency_stats(tasks);

        debug!(
            total_rows = summary.total_rows,
            leaf_tasks = summary.dependencies.total_leaf_tasks,
            coverage_percent = summary.dependencies.coverage_percent,
            "排程结构分析完成"
        );

        summary
    }

    fn dependency_stats(tasks: &[Task]) -> DependencyStats {
        let mut stats = DependencyStats::default();

        for task in tasks {
            stats.total_predecessor_links += task.predecessors.len();
            stats.total_successor_links += task.successors.len();
            if !task.predecessors.is_empty() {
                stats.tasks_with_predecessors += 1;
            }
            if !task.successors.is_empty() {
                stats.tasks_with_successors += 1;
            }
            if !task.is_summary {
                stats.total_leaf_tasks += 1;
                if task.has_links() {
                    stats.linked_leaf_tasks += 1;
                }
            }
        }

        stats.isolated_leaf_tasks = stats.total_leaf_tasks - stats.linked_leaf_tasks;
        stats.coverage_percent = round_ratio(
            ratio_or(
                stats.linked_leaf_tasks as f64,
                stats.total_leaf_tasks as f64,
                0.0,
            ) * 100.0,
        );
        stats
    }
}

impl Default for DependencyCoverage {
    fn default() -> Self {
        Self::new()
    }
}
