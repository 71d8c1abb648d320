// ==========================================
// 项目组合挣值引擎 - 驾驶舱 API
// ==========================================
// 职责: 装配各引擎，提供驾驶舱聚合查询
// 架构: API 层 → Engine 层（聚合 / 评分 / 风险 / 趋势 / 结构）
// 约定: 趋势引擎无可比快照时，由本层以当前值兜底
// ==========================================

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::dashboard_config::DashboardConfig;
use crate::domain::filter::{filter_types, CrossFilterState};
use crate::domain::labor::HourEntry;
use crate::domain::metrics::{PortfolioHealth, ProjectMetrics};
use crate::domain::risk::RiskItem;
use crate::domain::snapshot::{metric_names, MetricSnapshot, VarianceTrend};
use crate::domain::structure::ScheduleStructureSummary;
use crate::domain::task::{Milestone, Project, Task};
use crate::domain::types::{TrafficLight, VariancePeriod};
use crate::engine::{
    DependencyCoverage, HealthScorer, MetricsAggregator, MetricsCache, PortfolioSummary,
    RiskClassifier, VarianceTrendEngine,
};
use crate::i18n;
use crate::perf::PerfGuard;

// ==========================================
// DashboardInput - 驾驶舱输入数据集
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInput {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub projects: Option<Vec<Project>>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub hour_entries: Option<Vec<HourEntry>>,
}

/// 带本地化描述的风险条目
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskEntry {
    #[serde(flatten)]
    pub item: RiskItem,
    pub description: String,
}

/// 红黄绿灯显示名
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusLabels {
    pub schedule: String,
    pub budget: String,
    pub quality: String,
}

// ==========================================
// DashboardView - 驾驶舱视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub metrics: Vec<ProjectMetrics>,
    pub health: PortfolioHealth,
    pub status_labels: StatusLabels,
    pub risks: Vec<RiskEntry>,
    pub trends: BTreeMap<String, VarianceTrend>, // 指标名 -> 趋势
    pub summary: PortfolioSummary,
    pub structure: ScheduleStructureSummary,
    pub filters: CrossFilterState,
    pub period: VariancePeriod,
    pub generated_at: DateTime<Utc>,
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    cache: MetricsCache,
    aggregator: MetricsAggregator,
    health_scorer: HealthScorer,
    risk_classifier: RiskClassifier,
    trend_engine: VarianceTrendEngine,
    coverage: DependencyCoverage,
    summary_top_n: usize,
}

impl DashboardApi {
    /// 按已解析的配置装配引擎
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            cache: MetricsCache::new(),
            aggregator: MetricsAggregator::new(),
            health_scorer: HealthScorer::new(config.health_thresholds.clone()),
            risk_classifier: RiskClassifier::new(config.risk_limits),
            trend_engine: VarianceTrendEngine::new(),
            coverage: DependencyCoverage::new(),
            summary_top_n: config.summary_top_n,
        }
    }

    pub fn cache(&self) -> &MetricsCache {
        &self.cache
    }

    // ==========================================
    // 指标查询
    // ==========================================

    /// 项目指标（受 project / chargeType 筛选约束）
    pub fn project_metrics(
        &self,
        input: &DashboardInput,
        filters: &CrossFilterState,
    ) -> Vec<ProjectMetrics> {
        let hour_entries: Option<Vec<HourEntry>> = input.hour_entries.as_ref().map(|entries| {
            entries
                .iter()
                .filter(|e| filters.allows(filter_types::CHARGE_TYPE, e.charge_type_key()))
                .cloned()
                .collect()
        });

        let all = self.cache.get_or_compute(
            &input.tasks,
            input.projects.as_deref(),
            hour_entries.as_deref(),
        );

        all.iter()
            .filter(|m| filters.allows(filter_types::PROJECT, &m.project_id))
            .cloned()
            .collect()
    }

    /// 组合健康度（基于工时求和的组合汇总）
    pub fn portfolio_health(&self, metrics: &[ProjectMetrics]) -> PortfolioHealth {
        let totals = self.aggregator.rollup(metrics);
        self.health_scorer.score(&totals)
    }

    /// 风险列表（受 project / riskType / status 筛选约束，截断之后再筛选）
    pub fn risk_items(&self, input: &DashboardInput, filters: &CrossFilterState) -> Vec<RiskItem> {
        self.risk_classifier
            .classify(&input.milestones, &input.tasks)
            .into_iter()
            .filter(|r| {
                let project_ok = match r.project_id.as_deref() {
                    Some(pid) => filters.allows(filter_types::PROJECT, pid.trim()),
                    None => filters.values_of(filter_types::PROJECT).is_empty(),
                };
                project_ok
                    && filters.allows(filter_types::RISK_TYPE, &r.risk_type.to_string())
                    && filters.allows(filter_types::STATUS, &r.status)
            })
            .collect()
    }

    /// 单指标趋势
    ///
    /// 无可比历史快照时以当前值兜底（previous = current，变化为 0）
    pub fn variance(
        &self,
        history: &[MetricSnapshot],
        metric_name: &str,
        current_value: f64,
        period: VariancePeriod,
        now: DateTime<Utc>,
    ) -> ApiResult<VarianceTrend> {
        if metric_name.trim().is_empty() {
            return Err(ApiError::InvalidInput(i18n::t("error.blank_metric_name")));
        }

        Ok(self
            .trend_engine
            .compare(history, metric_name, current_value, period, now)
            .unwrap_or_else(|| VarianceTrend::unchanged(current_value)))
    }

    /// 组合概览摘要
    pub fn summary(&self, metrics: &[ProjectMetrics]) -> PortfolioSummary {
        PortfolioSummary::build(metrics, self.summary_top_n)
    }

    /// 排程结构与依赖覆盖率
    pub fn schedule_structure(&self, tasks: &[Task]) -> ScheduleStructureSummary {
        self.coverage.analyze(tasks)
    }

    // ==========================================
    // 视图装配
    // ==========================================

    /// 生成完整驾驶舱视图
    #[instrument(skip_all, fields(tasks = input.tasks.len(), period = %period))]
    pub fn build_view(
        &self,
        input: &DashboardInput,
        filters: &CrossFilterState,
        history: &[MetricSnapshot],
        period: VariancePeriod,
        now: DateTime<Utc>,
    ) -> ApiResult<DashboardView> {
        let _perf = PerfGuard::new("build_view");

        let metrics = self.project_metrics(input, filters);
        let health = self.portfolio_health(&metrics);

        let mut trends = BTreeMap::new();
        for (name, current) in Self::tracked_metrics(&health) {
            let trend = self.variance(history, name, current, period, now)?;
            trends.insert(name.to_string(), trend);
        }

        let risks = self
            .risk_items(input, filters)
            .into_iter()
            .map(|item| RiskEntry {
                description: i18n::risk_description(&item),
                item,
            })
            .collect::<Vec<_>>();

        let summary = self.summary(&metrics);
        let structure = self.schedule_structure(&input.tasks);

        info!(
            projects = metrics.len(),
            risks = risks.len(),
            health_score = health.health_score,
            "驾驶舱视图已生成"
        );

        Ok(DashboardView {
            status_labels: Self::status_labels(&health),
            metrics,
            health,
            risks,
            trends,
            summary,
            structure,
            filters: filters.clone(),
            period,
            generated_at: now,
        })
    }

    fn tracked_metrics(health: &PortfolioHealth) -> [(&'static str, f64); 5] {
        [
            (metric_names::SPI, health.spi),
            (metric_names::CPI, health.cpi),
            (metric_names::HEALTH_SCORE, f64::from(health.health_score)),
            (metric_names::PERCENT_COMPLETE, health.percent_complete),
            (metric_names::TOTAL_HOURS, health.total_hours),
        ]
    }

    fn status_labels(health: &PortfolioHealth) -> StatusLabels {
        let label = |light: TrafficLight| i18n::traffic_light_label(light);
        StatusLabels {
            schedule: label(health.schedule_status),
            budget: label(health.budget_status),
            quality: label(health.quality_status),
        }
    }
}

impl Default for DashboardApi {
    fn default() -> Self {
        Self::new(&DashboardConfig::default())
    }
}
