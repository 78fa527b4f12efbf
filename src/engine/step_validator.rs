// ==========================================
// 可持续性评估 - 分步校验器
// ==========================================
// 职责: 每个步骤的必填字段校验，输出字段级错误消息
// 约束: 纯函数，相同输入必得相同结果（可重复调用）
// ==========================================

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::assessment::{fields, AssessmentInput};
use crate::domain::step::AssessmentStep;
use crate::i18n::t;

/// 字段级错误集合（字段名 → 本地化消息）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: String) {
        self.0.insert(field.to_string(), message);
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

fn is_positive(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v.is_finite() && v > 0.0)
}

/// 校验指定步骤
///
/// # 返回
/// - Ok(()): 该步骤必填项齐全
/// - Err(FieldErrors): 每个缺失/无效字段一条消息
pub fn validate_step(step: AssessmentStep, input: &AssessmentInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    match step {
        AssessmentStep::MetalType => {
            if input.metal_type.is_none() {
                errors.insert(fields::METAL_TYPE, t("validation.metal_type_required"));
            }
        }
        AssessmentStep::ProcessRoute => {
            if input.process_route.is_none() {
                errors.insert(fields::PROCESS_ROUTE, t("validation.process_route_required"));
            }
        }
        AssessmentStep::ProductionScale => {
            // 严格 > 0
            if !is_positive(input.production_scale) {
                errors.insert(fields::PRODUCTION_SCALE, t("validation.production_scale_invalid"));
            }
        }
        AssessmentStep::ProductionDetails => {
            if !is_positive(input.total_inputs) {
                errors.insert(fields::TOTAL_INPUTS, t("validation.total_inputs_invalid"));
            }
            if !is_positive(input.total_outputs) {
                errors.insert(fields::TOTAL_OUTPUTS, t("validation.total_outputs_invalid"));
            }
        }
        AssessmentStep::WasteManagement => {
            // 可选步骤
        }
        AssessmentStep::RecycledContent => {
            // 0 视为已填写
            if input.recycled_content.is_none() {
                errors.insert(fields::RECYCLED_CONTENT, t("validation.recycled_content_required"));
            }
        }
        AssessmentStep::EnergySource => {
            if input.energy_source.is_none() {
                errors.insert(fields::ENERGY_SOURCE, t("validation.energy_source_required"));
            }
        }
        AssessmentStep::Transport => {
            if input.transport_mode.is_none() {
                errors.insert(fields::TRANSPORT_MODE, t("validation.transport_mode_required"));
            }
            if input.transport_distance.is_none() {
                errors.insert(
                    fields::TRANSPORT_DISTANCE,
                    t("validation.transport_distance_required"),
                );
            }
        }
        AssessmentStep::EndOfLife => match input.end_of_life_scenario {
            None => {
                errors.insert(
                    fields::END_OF_LIFE_SCENARIO,
                    t("validation.end_of_life_required"),
                );
            }
            Some(scenario) => {
                if scenario.requires_recovery_rate() && input.recovery_rate.is_none() {
                    errors.insert(fields::RECOVERY_RATE, t("validation.recovery_rate_required"));
                }
            }
        },
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// 只判断能否前进，不产生消息副作用
pub fn can_proceed(step: AssessmentStep, input: &AssessmentInput) -> bool {
    validate_step(step, input).is_ok()
}

/// 找出第一个未通过校验的步骤（全部通过返回 None）
pub fn first_invalid_step(input: &AssessmentInput) -> Option<(AssessmentStep, FieldErrors)> {
    AssessmentStep::ALL
        .iter()
        .find_map(|step| validate_step(*step, input).err().map(|e| (*step, e)))
}
