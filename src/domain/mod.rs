// ==========================================
// 可持续性评估 - 领域模型层
// ==========================================
// 职责: 选项目录、评估输入、步骤与结果记录
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assessment;
pub mod result;
pub mod step;
pub mod types;

// 重导出核心类型
pub use assessment::{AssessmentInput, AssessmentPatch};
pub use result::{AssessmentResults, Evaluation, ResultRecord, ResultSource, SubmissionKind};
pub use step::AssessmentStep;
pub use types::{
    EfficiencyRating, EndOfLifeScenario, EnergySource, MetalType, OptionEntry, ProcessRoute,
    RecoveryRate, TransportDistance, TransportMode, UnknownOption, WasteStream,
};
