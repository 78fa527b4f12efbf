// ==========================================
// 可持续性评估 - 派生字段规则
// ==========================================
// 投入 / 产出 / 材料效率三者互相可推导，规则单向固定:
//   编辑 totalInputs         → 重算 totalOutputs（需已有材料效率）
//   编辑 totalOutputs        → 重算 materialEfficiency（需已有投入）
//   编辑 materialEfficiency  → 重算 totalOutputs（需已有投入）
// 同一次更新中显式写入的字段不会被派生值覆盖；
// 规则按上述顺序依次应用，后写者生效。
// ==========================================

use crate::domain::assessment::{clamp_pct, AssessmentInput, AssessmentPatch};

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// 在 merge 之后应用派生规则
///
/// # 返回
/// 被派生改写的字段名
pub fn apply_derivations(input: &mut AssessmentInput, patch: &AssessmentPatch) -> Vec<&'static str> {
    use crate::domain::assessment::fields;

    let mut derived = Vec::new();

    if patch.total_inputs.is_some() && patch.total_outputs.is_none() {
        if let (Some(inputs), Some(efficiency)) =
            (input.total_inputs, present(input.material_efficiency))
        {
            input.total_outputs = Some(inputs * efficiency / 100.0);
            derived.push(fields::TOTAL_OUTPUTS);
        }
    }

    if patch.total_outputs.is_some() && patch.material_efficiency.is_none() {
        if let (Some(outputs), Some(inputs)) = (input.total_outputs, present(input.total_inputs)) {
            input.material_efficiency = Some(clamp_pct(outputs / inputs * 100.0));
            derived.push(fields::MATERIAL_EFFICIENCY);
        }
    }

    if patch.material_efficiency.is_some() && patch.total_outputs.is_none() {
        if let (Some(efficiency), Some(inputs)) =
            (input.material_efficiency, present(input.total_inputs))
        {
            input.total_outputs = Some(inputs * efficiency / 100.0);
            derived.push(fields::TOTAL_OUTPUTS);
        }
    }

    if !derived.is_empty() {
        tracing::debug!(?derived, "派生字段已重算");
    }
    derived
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(input: &mut AssessmentInput, patch: AssessmentPatch) -> Vec<&'static str> {
        input.merge(&patch);
        apply_derivations(input, &patch)
    }

    #[test]
    fn test_inputs_edit_recomputes_outputs_from_efficiency() {
        let mut input = AssessmentInput::form_defaults();
        input.material_efficiency = Some(80.0);
        apply(
            &mut input,
            AssessmentPatch { total_inputs: Some(200.0), ..Default::default() },
        );
        assert_eq!(input.total_outputs, Some(160.0));
        assert_eq!(input.material_efficiency, Some(80.0));
    }

    #[test]
    fn test_inputs_edit_without_efficiency_leaves_outputs() {
        let mut input = AssessmentInput::form_defaults();
        let derived = apply(
            &mut input,
            AssessmentPatch { total_inputs: Some(200.0), ..Default::default() },
        );
        assert!(derived.is_empty());
        assert_eq!(input.total_outputs, None);
    }

    #[test]
    fn test_outputs_edit_recomputes_efficiency() {
        let mut input = AssessmentInput::form_defaults();
        input.total_inputs = Some(120.0);
        apply(
            &mut input,
            AssessmentPatch { total_outputs: Some(100.0), ..Default::default() },
        );
        let efficiency = input.material_efficiency.unwrap();
        assert!((efficiency - 83.333_333).abs() < 1e-4);
        assert_eq!(input.total_inputs, Some(120.0));
    }

    #[test]
    fn test_outputs_above_inputs_clamp_efficiency() {
        let mut input = AssessmentInput::form_defaults();
        input.total_inputs = Some(50.0);
        apply(
            &mut input,
            AssessmentPatch { total_outputs: Some(80.0), ..Default::default() },
        );
        assert_eq!(input.material_efficiency, Some(100.0));
    }

    #[test]
    fn test_efficiency_edit_recomputes_outputs() {
        let mut input = AssessmentInput::form_defaults();
        input.total_inputs = Some(120.0);
        input.total_outputs = Some(10.0);
        apply(
            &mut input,
            AssessmentPatch { material_efficiency: Some(75.0), ..Default::default() },
        );
        let outputs = input.total_outputs.unwrap();
        let inputs = input.total_inputs.unwrap();
        assert!((outputs - inputs * 75.0 / 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_fields_in_same_patch_win() {
        let mut input = AssessmentInput::form_defaults();
        input.material_efficiency = Some(50.0);
        let derived = apply(
            &mut input,
            AssessmentPatch {
                total_inputs: Some(120.0),
                total_outputs: Some(100.0),
                material_efficiency: Some(83.3),
                ..Default::default()
            },
        );
        assert!(derived.is_empty());
        assert_eq!(input.total_outputs, Some(100.0));
        assert_eq!(input.material_efficiency, Some(83.3));
    }

    #[test]
    fn test_inputs_and_outputs_together_derive_efficiency() {
        let mut input = AssessmentInput::form_defaults();
        input.material_efficiency = Some(10.0);
        apply(
            &mut input,
            AssessmentPatch {
                total_inputs: Some(200.0),
                total_outputs: Some(150.0),
                ..Default::default()
            },
        );
        assert_eq!(input.total_outputs, Some(150.0));
        assert_eq!(input.material_efficiency, Some(75.0));
    }
}
