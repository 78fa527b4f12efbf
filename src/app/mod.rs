// ==========================================
// 可持续性评估 - 应用层
// ==========================================
// 职责: 装配仓储、估算策略与API
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppOptions, AppState};
