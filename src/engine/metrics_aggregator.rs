// ==========================================
// 项目组合挣值引擎 - 项目指标聚合引擎
// ==========================================
// 职责: 按项目分组任务 / 工时台账，计算项目级挣值指标
// 输入: 任务列表 + 可选项目名称表 + 可选工时台账
// 输出: ProjectMetrics 列表（按项目ID排序）
// 红线: 不抛错；缺失数值按 0；输出不含 NaN / Infinity
// ==========================================

use crate::domain::labor::HourEntry;
use crate::domain::metrics::{PortfolioTotals, ProjectMetrics};
use crate::domain::task::{Project, Task, UNKNOWN_PROJECT};
use crate::engine::numeric::{finite_or, ratio_or, round_ratio, round_whole};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// 分组累加器
#[derive(Debug, Default)]
struct ProjectAccumulator<'a> {
    task_name_hint: Option<&'a str>,
    task_count: usize,
    completed_count: usize,
    baseline_hours: f64,
    actual_hours: f64,
    percent_complete_sum: f64,
    actual_cost: f64,
    charge_type_breakdown: BTreeMap<String, f64>,
}

// ==========================================
// MetricsAggregator - 项目指标聚合引擎
// ==========================================
#[derive(Debug)]
pub struct MetricsAggregator {
    // 无状态引擎
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 聚合项目指标
    ///
    /// # 参数
    /// - `tasks`: 任务快照
    /// - `projects`: 项目名称表（可选）
    /// - `hour_entries`: 工时台账（可选，只归集到已有任务的项目）
    ///
    /// # 返回
    /// 每个至少含 1 个任务的项目一条记录；"Unknown" 项目被排除
    pub fn aggregate(
        &self,
        tasks: &[Task],
        projects: Option<&[Project]>,
        hour_entries: Option<&[HourEntry]>,
    ) -> Vec<ProjectMetrics> {
        // 1. 按项目ID分组（BTreeMap 保证输出顺序与输入顺序无关）
        let mut groups: BTreeMap<&str, ProjectAccumulator> = BTreeMap::new();
        for task in tasks {
            let acc = groups.entry(task.project_key()).or_default();
            if acc.task_name_hint.is_none() {
                acc.task_name_hint = task
                    .project_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty());
            }
            acc.task_count += 1;
            if task.is_completed() {
                acc.completed_count += 1;
            }
            acc.baseline_hours += finite_or(task.baseline_hours, 0.0);
            acc.actual_hours += finite_or(task.actual_hours, 0.0);
            acc.percent_complete_sum += finite_or(task.percent_complete, 0.0);
        }

        // 2. 工时台账归集（仅限任务派生的项目集合）
        let mut dropped_entries = 0usize;
        if let Some(entries) = hour_entries {
            for entry in entries {
                match groups.get_mut(entry.project_key()) {
                    Some(acc) => {
                        *acc
                            .charge_type_breakdown
                            .entry(entry.charge_type_key().to_string())
                            .or_insert(0.0) += finite_or(entry.hours, 0.0);
                        acc.actual_cost += finite_or(entry.actual_cost, 0.0);
                    }
                    None => dropped_entries += 1,
                }
            }
        }

        // 3. 名称解析 + 指标计算
        let name_lookup = Self::build_name_lookup(projects);
        let metrics: Vec<ProjectMetrics> = groups
            .into_iter()
            .filter(|(project_id, acc)| *project_id != UNKNOWN_PROJECT && acc.task_count > 0)
            .map(|(project_id, acc)| {
                let name = Self::resolve_name(project_id, &name_lookup, acc.task_name_hint);
                (project_id, name, acc)
            })
            .filter(|(_, name, _)| name != UNKNOWN_PROJECT)
            .map(|(project_id, name, acc)| Self::build_metrics(project_id, name, acc))
            .collect();

        debug!(
            task_count = tasks.len(),
            project_count = metrics.len(),
            dropped_hour_entries = dropped_entries,
            "项目指标聚合完成"
        );

        metrics
    }

    /// 组合汇总
    ///
    /// 对所有项目的 基线/实际/挣值 工时求和后计算组合指数；
    /// 组合完成度为按任务数加权的项目平均完成度（即逐任务平均）。
    pub fn rollup(&self, metrics: &[ProjectMetrics]) -> PortfolioTotals {
        let baseline_hours: f64 = metrics.iter().map(|m| m.baseline_hours).sum();
        let actual_hours: f64 = metrics.iter().map(|m| m.actual_hours).sum();
        let earned_hours: f64 = metrics.iter().map(|m| m.earned_hours).sum();
        let task_count: usize = metrics.iter().map(|m| m.task_count).sum();
        let weighted_pc: f64 = metrics
            .iter()
            .map(|m| m.percent_complete * m.task_count as f64)
            .sum();

        PortfolioTotals {
            baseline_hours: round_whole(baseline_hours),
            actual_hours: round_whole(actual_hours),
            earned_hours: round_whole(earned_hours),
            spi: round_ratio(ratio_or(earned_hours, baseline_hours, 1.0)),
            cpi: round_ratio(ratio_or(earned_hours, actual_hours, 1.0)),
            percent_complete: round_whole(ratio_or(weighted_pc, task_count as f64, 0.0)),
        }
    }

    // ==========================================
    // 内部计算
    // ==========================================

    fn build_name_lookup(projects: Option<&[Project]>) -> HashMap<&str, &str> {
        let mut lookup = HashMap::new();
        for project in projects.unwrap_or_default() {
            let name = project.name.trim();
            if name.is_empty() {
                continue;
            }
            lookup.entry(project.id.trim()).or_insert(name);
        }
        lookup
    }

    /// 显示名称: 项目表 > 任务携带的项目名 > 项目ID
    fn resolve_name(
        project_id: &str,
        lookup: &HashMap<&str, &str>,
        task_name_hint: Option<&str>,
    ) -> String {
        lookup
            .get(project_id)
            .copied()
            .or(task_name_hint)
            .unwrap_or(project_id)
            .to_string()
    }

    fn build_metrics(project_id: &str, name: String, acc: ProjectAccumulator) -> ProjectMetrics {
        let avg_pc = ratio_or(acc.percent_complete_sum, acc.task_count as f64, 0.0);
        let earned_hours = acc.baseline_hours * avg_pc / 100.0;

        let spi = ratio_or(earned_hours, acc.baseline_hours, 1.0);
        let cpi = ratio_or(earned_hours, acc.actual_hours, 1.0);
        let variance_pct = if acc.baseline_hours > 0.0 {
            (acc.actual_hours - acc.baseline_hours) / acc.baseline_hours * 100.0
        } else {
            0.0
        };
        let remaining_hours = (acc.baseline_hours - acc.actual_hours).max(0.0);

        ProjectMetrics {
            project_id: project_id.to_string(),
            name,
            task_count: acc.task_count,
            completed_count: acc.completed_count,
            baseline_hours: round_whole(acc.baseline_hours),
            actual_hours: round_whole(acc.actual_hours),
            earned_hours: round_whole(earned_hours),
            remaining_hours: round_whole(remaining_hours),
            spi: round_ratio(spi),
            cpi: round_ratio(cpi),
            percent_complete: round_whole(avg_pc),
            variance_pct: round_whole(variance_pct),
            actual_cost: round_whole(acc.actual_cost),
            charge_type_breakdown: acc
                .charge_type_breakdown
                .into_iter()
                .map(|(k, v)| (k, round_whole(v)))
                .collect(),
        }
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}
