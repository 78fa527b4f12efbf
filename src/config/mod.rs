// ==========================================
// 可持续性评估 - 配置层
// ==========================================
// 职责: 配置存取与运行配置解析
// 存储: config_kv 表
// ==========================================

pub mod app_config;
pub mod config_manager;

// 重导出核心配置管理器
pub use app_config::{ApiSettings, AppConfig};
pub use config_manager::{config_keys, ConfigManager};
