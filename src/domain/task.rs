// ==========================================
// 项目组合挣值引擎 - 排程领域模型
// ==========================================
// 职责: 任务 / 项目 / 里程碑 的不可变快照
// 来源: 外部排程导入协作方（本库不负责导入）
// 约定: JSON 字段为 camelCase，数值缺失或格式错误时按 0 处理
// ==========================================

use crate::common::json_utils::{
    lenient_f64, lenient_naive_date, lenient_opt_f64, lenient_opt_string, lenient_string, lenient_u32,
};
use crate::domain::types::{HierarchyType, RelationType};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// 缺失项目标识时使用的哨兵值
pub const UNKNOWN_PROJECT: &str = "Unknown";

fn relation_type_lenient<'de, D>(deserializer: D) -> Result<RelationType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => RelationType::normalize(&s),
        _ => RelationType::default(),
    })
}

// ==========================================
// TaskRelation - 任务依赖关系
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRelation {
    #[serde(
        default,
        alias = "predecessorTaskId",
        alias = "successorTaskId",
        deserialize_with = "lenient_string"
    )]
    pub task_id: String, // 关联任务ID

    #[serde(
        default,
        alias = "predecessorName",
        alias = "successorName",
        deserialize_with = "lenient_string"
    )]
    pub name: String, // 关联任务名称

    #[serde(default, deserialize_with = "relation_type_lenient")]
    pub relationship: RelationType, // FS/SS/FF/SF

    #[serde(default, deserialize_with = "lenient_f64")]
    pub lag_days: f64, // 滞后天数

    #[serde(default)]
    pub is_external: bool, // 外部项目任务
}

// ==========================================
// Task - 排程任务
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String, // 任务ID

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub project_id: Option<String>, // 所属项目ID

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub project_name: Option<String>, // 所属项目名称（无项目清单时的回退）

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String, // 任务名称

    // ===== 工时指标 =====
    #[serde(default, deserialize_with = "lenient_f64")]
    pub baseline_hours: f64, // 基线工时 (PV)

    #[serde(default, deserialize_with = "lenient_f64")]
    pub actual_hours: f64, // 实际工时 (AC)

    #[serde(default, deserialize_with = "lenient_f64")]
    pub percent_complete: f64, // 完成百分比 0-100

    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String, // 状态文本

    // ===== 成本指标 =====
    #[serde(default, deserialize_with = "lenient_f64")]
    pub baseline_cost: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub actual_cost: f64,

    // ===== 结构信息 =====
    #[serde(default, deserialize_with = "lenient_u32")]
    pub outline_level: u32, // 大纲级别

    #[serde(default)]
    pub is_summary: bool, // 摘要任务

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub is_critical: bool, // 关键路径

    #[serde(default)]
    pub predecessors: Vec<TaskRelation>,

    #[serde(default)]
    pub successors: Vec<TaskRelation>,
}

impl Task {
    /// 分组键: 项目ID（去空白），缺失时为 "Unknown"
    pub fn project_key(&self) -> &str {
        self.project_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_PROJECT)
    }

    /// 是否已完成: 状态包含 "complete"（不区分大小写）或完成度 >= 100
    pub fn is_completed(&self) -> bool {
        self.status.to_lowercase().contains("complete") || self.percent_complete >= 100.0
    }

    /// 大纲层级类型
    pub fn hierarchy_type(&self) -> HierarchyType {
        HierarchyType::from_outline_level(self.outline_level)
    }

    /// 是否存在任意依赖链接
    pub fn has_links(&self) -> bool {
        !self.predecessors.is_empty() || !self.successors.is_empty()
    }
}

// ==========================================
// Project - 项目名称查找表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

// ==========================================
// Milestone - 里程碑
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub project_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_naive_date")]
    pub planned_completion: Option<NaiveDate>, // 计划完成日

    #[serde(default, deserialize_with = "lenient_naive_date")]
    pub forecast_completion: Option<NaiveDate>, // 预测完成日

    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub variance_days: Option<f64>, // 延期天数（正数 = 延后），缺失为 None

    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub percent_complete: f64,
}

impl Milestone {
    /// 生效延期天数
    ///
    /// 提供了 varianceDays（包括 0）时直接使用；
    /// 仅在缺失时由 预测完成日 - 计划完成日 推导，两者缺一时为 0。
    pub fn effective_variance_days(&self) -> f64 {
        if let Some(days) = self.variance_days {
            return days;
        }
        match (self.planned_completion, self.forecast_completion) {
            (Some(planned), Some(forecast)) => (forecast - planned).num_days() as f64,
            _ => 0.0,
        }
    }

    /// 是否已完成（状态为 "Complete"，不区分大小写）
    pub fn is_complete(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("complete")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_deserialize_lenient() {
        let json = r#"{
            "id": 17,
            "projectId": "P-1",
            "name": "Design",
            "baselineHours": "40",
            "actualHours": null,
            "percentComplete": 50,
            "status": "In Progress",
            "predecessors": [
                {"predecessorTaskId": "16", "relationship": "START_START", "lagDays": 2}
            ]
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.id, "17");
        assert_eq!(task.project_key(), "P-1");
        assert_eq!(task.baseline_hours, 40.0);
        assert_eq!(task.actual_hours, 0.0);
        assert_eq!(task.predecessors.len(), 1);
        assert_eq!(task.predecessors[0].task_id, "16");
        assert_eq!(task.predecessors[0].relationship, RelationType::StartStart);
        assert!(task.successors.is_empty());
    }

    #[test]
    fn test_project_key_falls_back_to_unknown() {
        let mut task = Task::default();
        assert_eq!(task.project_key(), UNKNOWN_PROJECT);

        task.project_id = Some("   ".to_string());
        assert_eq!(task.project_key(), UNKNOWN_PROJECT);
    }

    #[test]
    fn test_task_is_completed() {
        let mut task = Task {
            status: "Completed".to_string(),
            ..Default::default()
        };
        assert!(task.is_completed());

        task.status = "In Progress".to_string();
        task.percent_complete = 100.0;
        assert!(task.is_completed());

        task.percent_complete = 99.0;
        assert!(!task.is_completed());
    }

    #[test]
    fn test_milestone_effective_variance_days() {
        let mut m = Milestone {
            planned_completion: NaiveDate::from_ymd_opt(2025, 3, 1),
            forecast_completion: NaiveDate::from_ymd_opt(2025, 3, 11),
            ..Default::default()
        };
        assert_eq!(m.effective_variance_days(), 10.0);

        m.variance_days = Some(4.0);
        assert_eq!(m.effective_variance_days(), 4.0);

        // 显式 0 不回退到日期推导
        m.variance_days = Some(0.0);
        assert_eq!(m.effective_variance_days(), 0.0);

        m.variance_days = None;
        m.forecast_completion = None;
        assert_eq!(m.effective_variance_days(), 0.0);
    }

    #[test]
    fn test_milestone_variance_days_zero_vs_missing() {
        let explicit: Milestone = serde_json::from_str(
            r#"{"id": "M1", "varianceDays": 0,
                "plannedCompletion": "2025-03-01", "forecastCompletion": "2025-03-21"}"#,
        )
        .unwrap();
        assert_eq!(explicit.variance_days, Some(0.0));
        assert_eq!(explicit.effective_variance_days(), 0.0);

        let missing: Milestone = serde_json::from_str(
            r#"{"id": "M2", "plannedCompletion": "2025-03-01", "forecastCompletion": "2025-03-21"}"#,
        )
        .unwrap();
        assert_eq!(missing.variance_days, None);
        assert_eq!(missing.effective_variance_days(), 20.0);
    }
}
