// ==========================================
// 项目组合挣值引擎 - 组合概览摘要
// ==========================================
// 职责: 生成只读 JSON 摘要（项目数、工时合计、工时 Top-N 项目）
// 输入: ProjectMetrics 列表
// ==========================================

use crate::domain::metrics::ProjectMetrics;
use crate::engine::numeric::{finite_or, round_whole};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Top-N 列表中的项目条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProject {
    pub project_id: String,
    pub name: String,
    pub actual_hours: f64,
    pub baseline_hours: f64,
    pub spi: f64,
    pub cpi: f64,
}

// ==========================================
// PortfolioSummary - 组合概览
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub project_count: usize,
    pub task_count: usize,
    pub completed_count: usize,
    pub baseline_hours: f64,
    pub actual_hours: f64,
    pub earned_hours: f64,
    pub top_projects: Vec<TopProject>, // 按实际工时降序，同值按项目ID升序
}

impl PortfolioSummary {
    pub fn build(metrics: &[ProjectMetrics], top_n: usize) -> Self {
        let mut ranked: Vec<&ProjectMetrics> = metrics.iter().collect();
        ranked.sort_by(|a, b| {
            let a_hours = finite_or(a.actual_hours, 0.0);
            let b_hours = finite_or(b.actual_hours, 0.0);
            b_hours
                .partial_cmp(&a_hours)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.project_id.cmp(&b.project_id))
        });

        let top_projects = ranked
            .into_iter()
            .take(top_n)
            .map(|m| TopProject {
                project_id: m.project_id.clone(),
                name: m.name.clone(),
                actual_hours: m.actual_hours,
                baseline_hours: m.baseline_hours,
                spi: m.spi,
                cpi: m.cpi,
            })
            .collect();

        Self {
            project_count: metrics.len(),
            task_count: metrics.iter().map(|m| m.task_count).sum(),
            completed_count: metrics.iter().map(|m| m.completed_count).sum(),
            baseline_hours: round_whole(metrics.iter().map(|m| m.baseline_hours).sum()),
            actual_hours: round_whole(metrics.iter().map(|m| m.actual_hours).sum()),
            earned_hours: round_whole(metrics.iter().map(|m| m.earned_hours).sum()),
            top_projects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(id: &str, actual: f64) -> ProjectMetrics {
        ProjectMetrics {
            project_id: id.to_string(),
            name: id.to_string(),
            task_count: 2,
            completed_count: 1,
            baseline_hours: 100.0,
            actual_hours: actual,
            earned_hours: 50.0,
            spi: 0.5,
            cpi: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_top_n_by_actual_hours_with_id_tiebreak() {
        let input = vec![metrics("C", 80.0), metrics("A", 120.0), metrics("B", 120.0)];
        let summary = PortfolioSummary::build(&input, 2);

        let ids: Vec<&str> = summary.top_projects.iter().map(|p| p.project_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(summary.project_count, 3);
        assert_eq!(summary.task_count, 6);
        assert_eq!(summary.completed_count, 3);
        assert_eq!(summary.actual_hours, 320.0);
        assert_eq!(summary.earned_hours, 150.0);
    }

    #[test]
    fn test_empty_metrics() {
        let summary = PortfolioSummary::build(&[], 5);
        assert_eq!(summary, PortfolioSummary::default());
    }
}
