// ==========================================
// 项目组合挣值引擎 - 公共工具模块
// ==========================================
// 职责: 宽松的 JSON 字段解析，供领域模型与配置层复用
// ==========================================

/// JSON 序列化/反序列化工具
pub mod json_utils;

// 重新导出常用函数
pub use json_utils::{
    lenient_f64, lenient_naive_date, lenient_opt_f64, lenient_opt_string, lenient_string, lenient_u32,
};
