// ==========================================
// 项目组合挣值引擎 - 风险分类引擎
// ==========================================
// 职责: 将里程碑延期 / 任务工时超支转换为 影响×概率 风险条目
// 输入: 里程碑列表 + 任务列表
// 输出: RiskItem 列表（进度风险在前，预算风险在后）
// 截断: 预算风险先截断到 budget_cap，合并后再截断到 total_cap；
//       进度风险过多时预算风险可能被完全挤出
// ==========================================

use crate::config::thresholds::RiskLimits;
use crate::domain::risk::RiskItem;
use crate::domain::task::{Milestone, Task};
use crate::domain::types::RiskType;
use crate::engine::numeric::{clamp_or_min, finite_or, round_whole};
use std::cmp::Ordering;
use tracing::debug;

// ==========================================
// RiskClassifier - 风险分类引擎
// ==========================================
pub struct RiskClassifier {
    limits: RiskLimits,
}

impl RiskClassifier {
    pub fn new(limits: RiskLimits) -> Self {
        Self { limits }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成风险列表
    pub fn classify(&self, milestones: &[Milestone], tasks: &[Task]) -> Vec<RiskItem> {
        let schedule_risks = self.schedule_risks(milestones);
        let mut budget_risks = self.budget_risks(tasks);
        budget_risks.truncate(self.limits.budget_cap);

        let schedule_count = schedule_risks.len();
        let budget_count = budget_risks.len();

        let mut combined = schedule_risks;
        combined.extend(budget_risks);
        combined.truncate(self.limits.total_cap);

        debug!(
            schedule_candidates = schedule_count,
            budget_candidates = budget_count,
            emitted = combined.len(),
            "风险分类完成"
        );

        combined
    }

    /// 进度风险: 延期天数 > 0 且未完成的里程碑，按延期天数降序（稳定排序）
    pub fn schedule_risks(&self, milestones: &[Milestone]) -> Vec<RiskItem> {
        let mut risks: Vec<RiskItem> = milestones
            .iter()
            .filter_map(|m| {
                let variance_days = finite_or(m.effective_variance_days(), 0.0);
                if variance_days > 0.0 && !m.is_complete() {
                    Some(Self::schedule_item(m, variance_days))
                } else {
                    None
                }
            })
            .collect();

        risks.sort_by(|a, b| desc(a.variance_days, b.variance_days));
        risks
    }

    /// 预算风险: 实际工时 > 基线工时 > 0 的任务，按超支百分比降序（稳定排序，未截断）
    pub fn budget_risks(&self, tasks: &[Task]) -> Vec<RiskItem> {
        let mut risks: Vec<RiskItem> = tasks
            .iter()
            .filter(|t| {
                let baseline = finite_or(t.baseline_hours, 0.0);
                let actual = finite_or(t.actual_hours, 0.0);
                baseline > 0.0 && actual > baseline
            })
            .map(Self::budget_item)
            .collect();

        risks.sort_by(|a, b| desc(a.variance_pct, b.variance_pct));
        risks
    }

    // ==========================================
    // 映射规则
    // ==========================================

    /// 进度影响: >14 天 90，>7 天 60，否则 30
    pub fn schedule_impact(variance_days: f64) -> u8 {
        if variance_days > 14.0 {
            90
        } else if variance_days > 7.0 {
            60
        } else {
            30
        }
    }

    /// 进度概率: clamp(50 + 延期天数 × 2, 50, 95)
    pub fn schedule_probability(variance_days: f64) -> u8 {
        clamp_or_min(50.0 + variance_days * 2.0, 50.0, 95.0).round() as u8
    }

    /// 预算影响: >50% 85，>20% 55，否则 25
    pub fn budget_impact(variance_pct: f64) -> u8 {
        if variance_pct > 50.0 {
            85
        } else if variance_pct > 20.0 {
            55
        } else {
            25
        }
    }

    /// 预算概率: clamp(40 + 超支百分比, 40, 90)
    pub fn budget_probability(variance_pct: f64) -> u8 {
        clamp_or_min(40.0 + variance_pct, 40.0, 90.0).round() as u8
    }

    fn schedule_item(milestone: &Milestone, variance_days: f64) -> RiskItem {
        let impact = Self::schedule_impact(variance_days);
        let probability = Self::schedule_probability(variance_days);
        RiskItem {
            source_id: milestone.id.clone(),
            name: milestone.name.clone(),
            project_id: milestone.project_id.clone(),
            status: milestone.status.clone(),
            risk_type: RiskType::Schedule,
            variance_days: Some(variance_days),
            variance_pct: None,
            baseline_hours: None,
            actual_hours: None,
            impact,
            probability,
            risk_score: RiskItem::compute_score(impact, probability),
        }
    }

    fn budget_item(task: &Task) -> RiskItem {
        let baseline = task.baseline_hours;
        let actual = task.actual_hours;
        let variance_pct = round_whole((actual - baseline) / baseline * 100.0);
        let impact = Self::budget_impact(variance_pct);
        let probability = Self::budget_probability(variance_pct);
        RiskItem {
            source_id: task.id.clone(),
            name: task.name.clone(),
            project_id: task.project_id.clone(),
            status: task.status.clone(),
            risk_type: RiskType::Budget,
            variance_days: None,
            variance_pct: Some(variance_pct),
            baseline_hours: Some(baseline),
            actual_hours: Some(actual),
            impact,
            probability,
            risk_score: RiskItem::compute_score(impact, probability),
        }
    }
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new(RiskLimits::default())
    }
}

/// 降序比较（None 视为最小）
fn desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    let a = a.unwrap_or(f64::MIN);
    let b = b.unwrap_or(f64::MIN);
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
