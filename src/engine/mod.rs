// ==========================================
// 可持续性评估 - 引擎层
// ==========================================
// 职责: 分步录入、校验、派生、估算与路径对比
// 红线: 引擎不做 I/O；远程估算通过 Estimator trait 注入
// ==========================================

pub mod derivation;
pub mod estimator;
pub mod intake;
pub mod pathway;
pub mod step_validator;

// 重导出核心引擎
pub use derivation::apply_derivations;
pub use estimator::{
    EstimationStrategy, Estimator, EstimatorError, EstimatorResult, LocalEstimator,
    FALLBACK_RECOMMENDATIONS,
};
pub use intake::{IntakeSnapshot, IntakeStateMachine};
pub use pathway::{compare_pathways, PathwayComparison};
pub use step_validator::{can_proceed, first_invalid_step, validate_step, FieldErrors};
