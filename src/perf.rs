// ==========================================
// 项目组合挣值引擎 - 性能观测
// ==========================================
// 职责: 视图装配 / 配置读写的耗时日志，配置库语句计数与慢语句告警
// 日志 target: perf / slow_sql
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 配置库语句观测开关（1/true/on）
pub const PERF_SQL_ENV: &str = "PORTFOLIO_EVM_PERF_SQL";
/// 慢语句阈值（毫秒，0 表示不告警）
pub const SLOW_SQL_MS_ENV: &str = "PORTFOLIO_EVM_SLOW_SQL_MS";

const DEFAULT_SLOW_SQL_MS: u64 = 50;

// 0 = 不告警
static SLOW_SQL_MS: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static OPEN_GUARDS: Cell<u32> = Cell::new(0);
    static STATEMENTS: Cell<u64> = Cell::new(0);
    static SLOW_STATEMENTS: Cell<u64> = Cell::new(0);
}

// ==========================================
// SqlProfileSettings - 语句观测设置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlProfileSettings {
    pub enabled: bool,
    pub slow_ms: u64,
}

impl SqlProfileSettings {
    /// 从环境变量读取；未设置开关时 debug 构建开启
    pub fn from_env() -> Self {
        let enabled = std::env::var(PERF_SQL_ENV).ok();
        let slow_ms = std::env::var(SLOW_SQL_MS_ENV).ok();
        Self::parse(enabled.as_deref(), slow_ms.as_deref())
    }

    fn parse(enabled: Option<&str>, slow_ms: Option<&str>) -> Self {
        let enabled = match enabled.map(|v| v.trim().to_lowercase()) {
            Some(v) => matches!(v.as_str(), "1" | "true" | "on"),
            None => cfg!(debug_assertions),
        };
        let slow_ms = slow_ms
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_SLOW_SQL_MS);
        Self { enabled, slow_ms }
    }
}

/// 按环境变量为配置库连接安装语句观测
pub fn install_sqlite_profiling(conn: &mut Connection) -> SqlProfileSettings {
    let settings = SqlProfileSettings::from_env();
    apply_sqlite_profiling(conn, settings);
    settings
}

/// 按给定设置安装（或卸载）语句观测
pub fn apply_sqlite_profiling(conn: &mut Connection, settings: SqlProfileSettings) {
    if !settings.enabled {
        conn.profile(None);
        return;
    }
    SLOW_SQL_MS.store(settings.slow_ms, Ordering::Relaxed);
    conn.profile(Some(on_statement_finished));
}

fn on_statement_finished(sql: &str, duration: Duration) {
    let guarded = OPEN_GUARDS.with(|g| g.get() > 0);
    if guarded {
        STATEMENTS.with(|c| c.set(c.get().saturating_add(1)));
    }

    let threshold = SLOW_SQL_MS.load(Ordering::Relaxed);
    let ms = duration.as_millis() as u64;
    if threshold == 0 || ms < threshold {
        return;
    }
    if guarded {
        SLOW_STATEMENTS.with(|c| c.set(c.get().saturating_add(1)));
    }
    tracing::warn!(
        target: "slow_sql",
        duration_ms = ms,
        sql = %sql.split_whitespace().collect::<Vec<_>>().join(" "),
        "配置库慢语句"
    );
}

// ==========================================
// PerfGuard - 操作耗时守卫
// ==========================================
/// drop 时记录 elapsed_ms 与期间本线程执行的配置库语句数
///
/// ```ignore
/// let _perf = portfolio_evm::perf::PerfGuard::new("build_view");
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    statements_at_start: u64,
    slow_at_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        OPEN_GUARDS.with(|g| g.set(g.get().saturating_add(1)));
        Self {
            op,
            start: Instant::now(),
            statements_at_start: STATEMENTS.with(|c| c.get()),
            slow_at_start: SLOW_STATEMENTS.with(|c| c.get()),
        }
    }

    /// 守卫创建以来的语句数
    pub fn sql_count(&self) -> u64 {
        STATEMENTS
            .with(|c| c.get())
            .saturating_sub(self.statements_at_start)
    }

    pub fn slow_sql_count(&self) -> u64 {
        SLOW_STATEMENTS
            .with(|c| c.get())
            .saturating_sub(self.slow_at_start)
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms = self.start.elapsed().as_millis() as u64,
            sql_count = self.sql_count(),
            slow_sql_count = self.slow_sql_count(),
            "done"
        );
        OPEN_GUARDS.with(|g| g.set(g.get().saturating_sub(1)));
    }
}
