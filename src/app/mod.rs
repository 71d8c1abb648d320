// ==========================================
// 项目组合挣值引擎 - 应用层
// ==========================================
// 职责: 持有共享状态，管理视图会话生命周期
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
