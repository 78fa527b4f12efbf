// ==========================================
// 可持续性评估 - 分步录入状态机
// ==========================================
// 状态: 当前步骤 1..9 + 表单记录 + 当前字段错误
// 迁移:
//   next      - 当前步骤校验通过才前进
//   previous  - 无校验，始终允许（第1步时不动）
//   jump_to   - 向后跳无条件；向前跳只校验当前步骤（不校验途经步骤）
// ==========================================

use serde::Serialize;

use crate::domain::assessment::{AssessmentInput, AssessmentPatch};
use crate::domain::step::AssessmentStep;
use crate::engine::derivation::apply_derivations;
use crate::engine::step_validator::{can_proceed, validate_step, FieldErrors};

/// 状态机快照（供界面渲染）
#[derive(Debug, Clone, Serialize)]
pub struct IntakeSnapshot {
    pub current_step: AssessmentStep,
    pub step_number: u8,
    pub total_steps: u8,
    pub progress_percent: u8,
    pub can_proceed: bool,
    pub errors: FieldErrors,
    pub data: AssessmentInput,
}

#[derive(Debug, Clone)]
pub struct IntakeStateMachine {
    current: AssessmentStep,
    data: AssessmentInput,
    errors: FieldErrors,
}

impl Default for IntakeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeStateMachine {
    /// 表单挂载：第1步 + 初始记录
    pub fn new() -> Self {
        Self {
            current: AssessmentStep::FIRST,
            data: AssessmentInput::form_defaults(),
            errors: FieldErrors::new(),
        }
    }

    pub fn current_step(&self) -> AssessmentStep {
        self.current
    }

    pub fn data(&self) -> &AssessmentInput {
        &self.data
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// 进度百分比 round(step / 9 × 100)
    pub fn progress_percent(&self) -> u8 {
        let pct = self.current.number() as f64 / AssessmentStep::TOTAL as f64 * 100.0;
        pct.round() as u8
    }

    /// 当前步骤能否前进（不改写错误集合）
    pub fn can_proceed(&self) -> bool {
        can_proceed(self.current, &self.data)
    }

    /// 部分更新：钳制 → 派生 → 清除被编辑及被派生字段的错误
    pub fn update(&mut self, patch: AssessmentPatch) {
        self.data.merge(&patch);
        let derived = apply_derivations(&mut self.data, &patch);
        for field in patch.touched_fields().into_iter().chain(derived) {
            self.errors.remove(field);
        }
    }

    /// 校验当前步骤并以结果替换错误集合
    pub fn validate_current(&mut self) -> bool {
        match validate_step(self.current, &self.data) {
            Ok(()) => {
                self.errors.clear();
                true
            }
            Err(errors) => {
                tracing::debug!(step = self.current.number(), %errors, "步骤校验未通过");
                self.errors = errors;
                false
            }
        }
    }

    /// 前进一步
    ///
    /// # 返回
    /// 是否发生了迁移（最后一步校验通过也不会越界）
    pub fn next(&mut self) -> bool {
        if !self.validate_current() {
            return false;
        }
        match self.current.next() {
            Some(step) => {
                tracing::debug!(from = self.current.number(), to = step.number(), "前进");
                self.current = step;
                true
            }
            None => false,
        }
    }

    /// 后退一步，不校验
    pub fn previous(&mut self) -> bool {
        match self.current.previous() {
            Some(step) => {
                tracing::debug!(from = self.current.number(), to = step.number(), "后退");
                self.current = step;
                true
            }
            None => false,
        }
    }

    /// 跳转到指定步骤
    ///
    /// 向后无条件允许；向前（含原地）只要求当前步骤校验通过
    pub fn jump_to(&mut self, target: AssessmentStep) -> bool {
        if target < self.current || self.validate_current() {
            tracing::debug!(from = self.current.number(), to = target.number(), "跳转");
            self.current = target;
            true
        } else {
            false
        }
    }

    /// 冻结最终输入
    ///
    /// 仅校验当前（最后）步骤，与提交按钮的行为一致
    pub fn finalize(&mut self) -> Result<AssessmentInput, FieldErrors> {
        if self.validate_current() {
            Ok(self.data.clone())
        } else {
            Err(self.errors.clone())
        }
    }

    /// 模板快捷方式：整体替换记录，回到第1步，清空错误
    pub fn apply_template(&mut self, template: AssessmentInput) {
        self.data = template.clamped();
        self.current = AssessmentStep::FIRST;
        self.errors.clear();
    }

    pub fn snapshot(&self) -> IntakeSnapshot {
        IntakeSnapshot {
            current_step: self.current,
            step_number: self.current.number(),
            total_steps: AssessmentStep::TOTAL,
            progress_percent: self.progress_percent(),
            can_proceed: self.can_proceed(),
            errors: self.errors.clone(),
            data: self.data.clone(),
        }
    }
}
