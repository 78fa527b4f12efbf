// ==========================================
// 可持续性评估 - API层
// ==========================================
// 职责: 录入提交、结果看板、报告导出
// 红线: API 不直接访问数据库，经由仓储接口
// ==========================================

pub mod assessment_api;
pub mod dashboard_api;
pub mod error;
pub mod report;

pub use assessment_api::{AssessmentApi, SubmitOutcome, TEMPLATE_RECOMMENDATIONS};
pub use dashboard_api::{DashboardApi, DashboardView};
pub use error::{ApiError, ApiResult};
pub use report::ExportFormat;
