// ==========================================
// 金属生产可持续性评估 (EcoLCA Pro) - 核心库
// ==========================================
// 技术栈: Rust + SQLite + HTTP 预测服务
// 系统定位: 生命周期评估辅助工具（远程模型优先，本地公式回退）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 输入记录、步骤、结果
pub mod domain;

// 数据仓储层 - 结果缓存
pub mod repository;

// 引擎层 - 录入状态机、校验、估算
pub mod engine;

// 客户端层 - 远程预测服务
pub mod client;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    EfficiencyRating, EndOfLifeScenario, EnergySource, MetalType, ProcessRoute, RecoveryRate,
    TransportDistance, TransportMode, WasteStream,
};

// 领域实体
pub use domain::{AssessmentInput, AssessmentPatch, AssessmentResults, AssessmentStep, ResultRecord};

// 引擎
pub use engine::{EstimationStrategy, Estimator, IntakeStateMachine, LocalEstimator};

// API
pub use api::{ApiError, ApiResult, AssessmentApi, DashboardApi, ExportFormat, SubmitOutcome};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "EcoLCA Pro";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
