// ==========================================
// 可持续性评估 - 评估录入与提交 API
// ==========================================
// 职责: 驱动分步录入状态机；冻结输入 → 估算 → 组装 → 写缓存
// 红线: 同一时刻只允许一次提交（进行中的重复提交为空操作）
// 红线: 远程失败静默回退，不向调用方暴露
// ==========================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::assessment::{AssessmentInput, AssessmentPatch};
use crate::domain::result::{AssessmentResults, SubmissionKind};
use crate::domain::step::AssessmentStep;
use crate::engine::estimator::EstimationStrategy;
use crate::engine::intake::{IntakeSnapshot, IntakeStateMachine};
use crate::i18n::t;
use crate::repository::result_store::ResultStore;

/// 模板提交且回退到本地公式时使用的建议
pub const TEMPLATE_RECOMMENDATIONS: [&str; 5] = [
    "✅ Excellent aluminum recycling setup with high circularity",
    "🌱 Renewable energy optimizes environmental footprint",
    "🚢 Maritime transport provides efficient logistics",
    "♻️ 85% recycled content maximizes resource efficiency",
    "🎯 Consider increasing to 90% recycled content for peak performance",
];

/// 提交结果
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "results", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Submitted(Box<AssessmentResults>),
    /// 已有提交在进行中，本次调用未做任何事
    AlreadySubmitting,
}

impl SubmitOutcome {
    pub fn results(&self) -> Option<&AssessmentResults> {
        match self {
            SubmitOutcome::Submitted(results) => Some(results),
            SubmitOutcome::AlreadySubmitting => None,
        }
    }
}

/// 提交标志的作用域守卫（任何退出路径都会复位）
struct SubmittingGuard<'a>(&'a AtomicBool);

impl<'a> SubmittingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ==========================================
// AssessmentApi
// ==========================================

pub struct AssessmentApi {
    intake: Mutex<IntakeStateMachine>,
    submitting: AtomicBool,
    strategy: EstimationStrategy,
    store: Arc<dyn ResultStore>,
}

impl AssessmentApi {
    /// 创建新的 AssessmentApi（表单挂载：第1步 + 初始记录）
    pub fn new(strategy: EstimationStrategy, store: Arc<dyn ResultStore>) -> Self {
        Self {
            intake: Mutex::new(IntakeStateMachine::new()),
            submitting: AtomicBool::new(false),
            strategy,
            store,
        }
    }

    fn lock_intake(&self) -> ApiResult<MutexGuard<'_, IntakeStateMachine>> {
        self.intake
            .lock()
            .map_err(|e| ApiError::Other(anyhow::anyhow!("录入状态锁获取失败: {}", e)))
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> ApiResult<IntakeSnapshot> {
        Ok(self.lock_intake()?.snapshot())
    }

    /// 部分更新当前记录
    pub fn update(&self, patch: AssessmentPatch) -> ApiResult<IntakeSnapshot> {
        let mut machine = self.lock_intake()?;
        machine.update(patch);
        Ok(machine.snapshot())
    }

    /// 前进一步
    ///
    /// # 返回
    /// - Ok(snapshot): 已前进，或已在最后一步
    /// - Err(ApiError::Validation): 当前步骤未通过校验，位置不变
    pub fn next(&self) -> ApiResult<IntakeSnapshot> {
        let mut machine = self.lock_intake()?;
        if !machine.next() && !machine.errors().is_empty() {
            return Err(ApiError::Validation {
                step: machine.current_step(),
                errors: machine.errors().clone(),
            });
        }
        Ok(machine.snapshot())
    }

    /// 后退一步（不校验）
    pub fn previous(&self) -> ApiResult<IntakeSnapshot> {
        let mut machine = self.lock_intake()?;
        machine.previous();
        Ok(machine.snapshot())
    }

    /// 跳转到指定步骤
    pub fn jump_to(&self, step_number: u8) -> ApiResult<IntakeSnapshot> {
        let target = AssessmentStep::from_number(step_number).ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "步骤编号必须在 1..={} 之间: {}",
                AssessmentStep::TOTAL,
                step_number
            ))
        })?;

        let mut machine = self.lock_intake()?;
        if !machine.jump_to(target) {
            return Err(ApiError::Validation {
                step: machine.current_step(),
                errors: machine.errors().clone(),
            });
        }
        Ok(machine.snapshot())
    }

    /// 提交表单
    ///
    /// 只允许在最后一步提交，且只校验最后一步
    pub async fn submit(&self) -> ApiResult<SubmitOutcome> {
        let Some(_guard) = SubmittingGuard::acquire(&self.submitting) else {
            tracing::info!("{}", t("submission.already_submitting"));
            return Ok(SubmitOutcome::AlreadySubmitting);
        };

        let input = {
            let mut machine = self.lock_intake()?;
            if !machine.current_step().is_last() {
                return Err(ApiError::NotAtFinalStep {
                    current: machine.current_step(),
                });
            }
            machine.finalize().map_err(|errors| ApiError::Validation {
                step: AssessmentStep::LAST,
                errors,
            })?
        };

        let record = self.strategy.estimate(&input).await;
        let results = AssessmentResults::assemble(input, record, SubmissionKind::Form);
        self.persist(results)
    }

    /// 模板快捷提交：整体替换记录并立即提交，不经过分步校验
    pub async fn apply_template_and_submit(&self) -> ApiResult<SubmitOutcome> {
        let Some(_guard) = SubmittingGuard::acquire(&self.submitting) else {
            tracing::info!("{}", t("submission.already_submitting"));
            return Ok(SubmitOutcome::AlreadySubmitting);
        };

        let template = AssessmentInput::demo_template();
        {
            let mut machine = self.lock_intake()?;
            machine.apply_template(template.clone());
        }

        let mut record = self.strategy.estimate(&template).await;
        if record.mock_data {
            record.recommendations = TEMPLATE_RECOMMENDATIONS
                .iter()
                .map(|s| s.to_string())
                .collect();
        }
        let results = AssessmentResults::assemble(template, record, SubmissionKind::Template);
        self.persist(results)
    }

    /// 写入缓存；失败时表单保持原状，返回通用失败消息
    fn persist(&self, results: AssessmentResults) -> ApiResult<SubmitOutcome> {
        if let Err(e) = self.store.save(&results) {
            tracing::error!(error = %e, assessment_id = %results.assessment_id, "评估结果缓存失败");
            return Err(ApiError::SubmissionFailed(t("submission.failed")));
        }

        tracing::info!(
            assessment_id = %results.assessment_id,
            source = results.source().label(),
            carbon = results.carbon_footprint,
            circularity = results.circularity_index,
            "评估已提交"
        );
        Ok(SubmitOutcome::Submitted(Box::new(results)))
    }
}
