// ==========================================
// 项目组合挣值引擎 - 派生指标模型
// ==========================================
// 职责: 项目级挣值指标、组合级汇总、组合健康度
// 生命周期: 每次输入变化时重算，无独立标识、不持久化
// ==========================================

use crate::domain::types::TrafficLight;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ProjectMetrics - 项目挣值指标
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetrics {
    pub project_id: String,       // 项目ID
    pub name: String,             // 显示名称
    pub task_count: usize,        // 任务数
    pub completed_count: usize,   // 已完成任务数

    // ===== 工时 (取整) =====
    pub baseline_hours: f64,      // 基线工时 (PV)
    pub actual_hours: f64,        // 实际工时 (AC)
    pub earned_hours: f64,        // 挣值工时 (EV)
    pub remaining_hours: f64,     // 剩余工时 max(0, PV-AC)

    // ===== 指数 (2 位小数) =====
    pub spi: f64,                 // 进度绩效指数
    pub cpi: f64,                 // 成本绩效指数

    // ===== 百分比 (取整) =====
    pub percent_complete: f64,    // 平均完成度
    pub variance_pct: f64,        // 工时偏差百分比

    // ===== 工时台账 =====
    pub actual_cost: f64,                              // 台账成本合计
    pub charge_type_breakdown: BTreeMap<String, f64>,  // 计费类型 -> 工时
}

// ==========================================
// PortfolioTotals - 组合汇总（HealthScorer 输入）
// ==========================================
// 对所有项目工时求和后再计算指数，而非对项目指数取平均
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    pub baseline_hours: f64,
    pub actual_hours: f64,
    pub earned_hours: f64,
    pub spi: f64,
    pub cpi: f64,
    pub percent_complete: f64,
}

// ==========================================
// PortfolioHealth - 组合健康度
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHealth {
    pub health_score: u8,              // 健康分 0-100
    pub spi: f64,
    pub cpi: f64,
    pub percent_complete: f64,
    pub schedule_status: TrafficLight, // 由 SPI 判定
    pub budget_status: TrafficLight,   // 由 CPI 判定
    pub quality_status: TrafficLight,  // 由完成度判定
    pub total_hours: f64,              // 实际工时合计
    pub baseline_hours: f64,           // 基线工时合计
}
