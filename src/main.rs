// ==========================================
// 项目组合挣值引擎 - 命令行入口
// ==========================================
// 用法:
//   portfolio-evm <dataset.json> [day|week|month|quarter]
//
// dataset.json 为驾驶舱输入（tasks / projects / milestones / hourEntries），
// 可附带 history（历史快照）与 actions（依次应用的筛选动作）。
// 输出: 驾驶舱视图 JSON（stdout）
// ==========================================

use anyhow::{bail, Context};
use chrono::Utc;
use serde::Deserialize;

use portfolio_evm::api::DashboardInput;
use portfolio_evm::app::{get_default_db_path, AppState};
use portfolio_evm::{FilterAction, MetricSnapshot, VariancePeriod};

/// 命令行视图ID
const CLI_VIEW_ID: &str = "cli";

/// 日志格式环境变量（json 时输出 JSON 行）
const LOG_FORMAT_ENV: &str = "PORTFOLIO_EVM_LOG_FORMAT";

/// 输出语言环境变量（zh-CN / en）
const LOCALE_ENV: &str = "PORTFOLIO_EVM_LOCALE";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Dataset {
    #[serde(flatten)]
    input: DashboardInput,
    #[serde(default)]
    history: Vec<MetricSnapshot>,
    #[serde(default)]
    actions: Vec<FilterAction>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match std::env::var(LOG_FORMAT_ENV) {
        Ok(format) if format.trim().eq_ignore_ascii_case("json") => portfolio_evm::logging::init_json(),
        _ => portfolio_evm::logging::init(),
    }
    if let Ok(locale) = std::env::var(LOCALE_ENV) {
        portfolio_evm::i18n::set_locale(locale.trim());
    }

    let mut args = std::env::args().skip(1);
    let dataset_path = match args.next() {
        Some(p) => p,
        None => bail!("用法: portfolio-evm <dataset.json> [day|week|month|quarter]"),
    };
    let period = match args.next() {
        Some(raw) => match VariancePeriod::parse(&raw) {
            Some(p) => Some(p),
            None => bail!("无效的对比周期: {}", raw),
        },
        None => None,
    };

    tracing::info!(
        locale = %portfolio_evm::i18n::current_locale(),
        "{} v{}",
        portfolio_evm::APP_NAME,
        portfolio_evm::VERSION
    );

    let raw = std::fs::read_to_string(&dataset_path)
        .with_context(|| format!("读取数据集失败: {}", dataset_path))?;
    let dataset: Dataset =
        serde_json::from_str(&raw).with_context(|| format!("解析数据集失败: {}", dataset_path))?;

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);
    let state = AppState::new(db_path).await?;

    state.open_session(CLI_VIEW_ID)?;
    for action in dataset.actions {
        state.update_session(CLI_VIEW_ID, action)?;
    }

    let view = state.build_view(
        CLI_VIEW_ID,
        &dataset.input,
        &dataset.history,
        period,
        Utc::now(),
    )?;
    state.close_session(CLI_VIEW_ID)?;

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
