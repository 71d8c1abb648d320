// ==========================================
// 项目组合挣值引擎 - 风险条目领域模型
// ==========================================
// 用途: 驾驶舱风险矩阵（影响 × 概率），只读派生数据
// ==========================================

use crate::domain::types::RiskType;
use serde::{Deserialize, Serialize};

// ==========================================
// RiskItem - 风险条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskItem {
    // ===== 来源字段 =====
    pub source_id: String,           // 里程碑ID / 任务ID
    pub name: String,                // 来源名称
    pub project_id: Option<String>,  // 所属项目
    pub status: String,              // 来源状态

    // ===== 分类 =====
    pub risk_type: RiskType,
    pub variance_days: Option<f64>,  // 进度风险: 延期天数
    pub variance_pct: Option<f64>,   // 预算风险: 超支百分比
    pub baseline_hours: Option<f64>, // 预算风险: 基线工时
    pub actual_hours: Option<f64>,   // 预算风险: 实际工时

    // ===== 评分 =====
    pub impact: u8,                  // 影响 0-100
    pub probability: u8,             // 概率 0-100
    pub risk_score: f64,             // impact * probability / 100
}

impl RiskItem {
    /// 风险分（用于可视化尺寸）
    pub fn compute_score(impact: u8, probability: u8) -> f64 {
        f64::from(impact) * f64::from(probability) / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_score() {
        assert_eq!(RiskItem::compute_score(90, 90), 81.0);
        assert_eq!(RiskItem::compute_score(25, 40), 10.0);
        assert_eq!(RiskItem::compute_score(0, 95), 0.0);
    }
}
