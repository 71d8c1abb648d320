// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{DateTime, TimeZone, Utc};
use portfolio_evm::domain::{HourEntry, MetricSnapshot, Milestone, Task, TaskRelation};
use portfolio_evm::domain::types::RelationType;

// ==========================================
// Task 构建器
// ==========================================

pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(id: &str, project_id: &str) -> Self {
        Self {
            task: Task {
                id: id.to_string(),
                project_id: Some(project_id.to_string()),
                name: format!("Task {}", id),
                status: "In Progress".to_string(),
                outline_level: 4,
                ..Default::default()
            },
        }
    }

    pub fn hours(mut self, baseline: f64, actual: f64) -> Self {
        self.task.baseline_hours = baseline;
        self.task.actual_hours = actual;
        self
    }

    pub fn percent_complete(mut self, pc: f64) -> Self {
        self.task.percent_complete = pc;
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.task.status = status.to_string();
        self
    }

    pub fn project_name(mut self, name: &str) -> Self {
        self.task.project_name = Some(name.to_string());
        self
    }

    pub fn outline_level(mut self, level: u32) -> Self {
        self.task.outline_level = level;
        self
    }

    pub fn critical(mut self) -> Self {
        self.task.is_critical = true;
        self
    }

    pub fn predecessor(mut self, task_id: &str) -> Self {
        self.task.predecessors.push(TaskRelation {
            task_id: task_id.to_string(),
            name: String::new(),
            relationship: RelationType::FinishStart,
            lag_days: 0.0,
            is_external: false,
        });
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

// ==========================================
// Milestone 构建器
// ==========================================

pub fn milestone(id: &str, project_id: &str, variance_days: f64, status: &str) -> Milestone {
    Milestone {
        id: id.to_string(),
        name: format!("Milestone {}", id),
        project_id: Some(project_id.to_string()),
        variance_days: Some(variance_days),
        status: status.to_string(),
        ..Default::default()
    }
}

// ==========================================
// HourEntry 构建器
// ==========================================

pub fn hour_entry(project_id: &str, charge_type: &str, hours: f64) -> HourEntry {
    HourEntry {
        project_id: Some(project_id.to_string()),
        charge_type: charge_type.to_string(),
        hours,
        ..Default::default()
    }
}

// ==========================================
// 时间与快照
// ==========================================

/// 固定的"当前时刻"
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap()
}

pub fn snapshot_days_ago(days: i64, metric_name: &str, value: f64) -> MetricSnapshot {
    MetricSnapshot::new(fixed_now() - chrono::Duration::days(days), metric_name, value)
}
