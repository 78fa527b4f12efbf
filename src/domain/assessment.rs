// ==========================================
// 可持续性评估 - 评估输入记录
// ==========================================
// 职责: 表单答案的累积记录 + 部分合并（patch）
// 红线: 所有百分比字段在写入时钳制到 [0,100]
// 序列化格式: camelCase（与远程服务 assessment_data 一致）
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::types::{
    EndOfLifeScenario, EnergySource, MetalType, ProcessRoute, RecoveryRate, TransportDistance,
    TransportMode, WasteStream,
};

/// 字段名（camelCase，作为校验错误的键）
pub mod fields {
    pub const METAL_TYPE: &str = "metalType";
    pub const PROCESS_ROUTE: &str = "processRoute";
    pub const PROCESS_CLASS: &str = "processClass";
    pub const IS_METALLURGY: &str = "isMetallurgy";
    pub const HAS_CIRCULARITY: &str = "hasCircularity";
    pub const PRODUCTION_SCALE: &str = "productionScale";
    pub const TOTAL_INPUTS: &str = "totalInputs";
    pub const TOTAL_OUTPUTS: &str = "totalOutputs";
    pub const MATERIAL_EFFICIENCY: &str = "materialEfficiency";
    pub const SECONDARY_MATERIAL_FRACTION: &str = "secondaryMaterialFraction";
    pub const SCRAP_RATIO: &str = "scrapRatio";
    pub const RECYCLING_RATE: &str = "recyclingRate";
    pub const WASTE_RATIO: &str = "wasteRatio";
    pub const ENERGY_RECOVERY_RATE: &str = "energyRecoveryRate";
    pub const WASTE_STREAMS: &str = "wasteStreams";
    pub const RECYCLED_CONTENT: &str = "recycledContent";
    pub const ENERGY_SOURCE: &str = "energySource";
    pub const TRANSPORT_MODE: &str = "transportMode";
    pub const TRANSPORT_DISTANCE: &str = "transportDistance";
    pub const CUSTOM_DISTANCE: &str = "customDistance";
    pub const END_OF_LIFE_SCENARIO: &str = "endOfLifeScenario";
    pub const RECOVERY_RATE: &str = "recoveryRate";
    pub const CUSTOM_RECOVERY_RATE: &str = "customRecoveryRate";
}

/// 钳制百分比到 [0,100]，NaN 视为 0
pub fn clamp_pct(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// 钳制非负数，NaN 与无穷视为 0
pub fn clamp_non_negative(value: f64) -> f64 {
    if !value.is_finite() {
        0.0
    } else {
        value.max(0.0)
    }
}

// ==========================================
// AssessmentInput - 评估输入记录
// ==========================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentInput {
    // 步骤1
    #[serde(deserialize_with = "lenient::option")]
    pub metal_type: Option<MetalType>,

    // 步骤2
    #[serde(deserialize_with = "lenient::option")]
    pub process_route: Option<ProcessRoute>,
    pub process_class: Option<String>,
    pub is_metallurgy: bool,
    pub has_circularity: bool,

    // 步骤3（吨/年）
    #[serde(deserialize_with = "lenient::number")]
    pub production_scale: Option<f64>,

    // 步骤4
    #[serde(deserialize_with = "lenient::number")]
    pub total_inputs: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub total_outputs: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub material_efficiency: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub secondary_material_fraction: Option<f64>,

    // 步骤5（四个滑块互相独立，不约束总和）
    #[serde(deserialize_with = "lenient::number")]
    pub scrap_ratio: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub recycling_rate: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub waste_ratio: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub energy_recovery_rate: Option<f64>,
    pub waste_streams: BTreeMap<WasteStream, bool>,

    // 步骤6
    #[serde(deserialize_with = "lenient::number")]
    pub recycled_content: Option<f64>,

    // 步骤7
    #[serde(deserialize_with = "lenient::option")]
    pub energy_source: Option<EnergySource>,

    // 步骤8
    #[serde(deserialize_with = "lenient::option")]
    pub transport_mode: Option<TransportMode>,
    #[serde(deserialize_with = "lenient::option")]
    pub transport_distance: Option<TransportDistance>,
    #[serde(deserialize_with = "lenient::number")]
    pub custom_distance: Option<f64>,

    // 步骤9
    #[serde(deserialize_with = "lenient::option")]
    pub end_of_life_scenario: Option<EndOfLifeScenario>,
    #[serde(deserialize_with = "lenient::option")]
    pub recovery_rate: Option<RecoveryRate>,
    #[serde(deserialize_with = "lenient::number")]
    pub custom_recovery_rate: Option<f64>,
}

impl AssessmentInput {
    /// 表单挂载时的初始记录
    ///
    /// 滑块类字段天然有值（0），选择/文本类字段为空
    pub fn form_defaults() -> Self {
        Self {
            secondary_material_fraction: Some(0.0),
            scrap_ratio: Some(0.0),
            recycling_rate: Some(0.0),
            waste_ratio: Some(0.0),
            energy_recovery_rate: Some(0.0),
            recycled_content: Some(0.0),
            ..Self::default()
        }
    }

    /// 演示模板：铝二次回收场景（各步骤均可通过校验）
    pub fn demo_template() -> Self {
        let waste_streams = [
            (WasteStream::Slag, true),
            (WasteStream::Dust, true),
            (WasteStream::Water, false),
            (WasteStream::Offgas, true),
            (WasteStream::Tailings, false),
        ]
        .into_iter()
        .collect();

        Self {
            metal_type: Some(MetalType::Aluminum),
            process_route: Some(ProcessRoute::Recycling),
            process_class: Some("secondary".to_string()),
            is_metallurgy: false,
            has_circularity: true,
            production_scale: Some(500.0),
            total_inputs: Some(120.0),
            total_outputs: Some(100.0),
            material_efficiency: Some(83.3),
            secondary_material_fraction: Some(75.0),
            scrap_ratio: Some(15.0),
            recycling_rate: Some(85.0),
            waste_ratio: Some(8.0),
            energy_recovery_rate: Some(45.0),
            waste_streams,
            recycled_content: Some(85.0),
            energy_source: Some(EnergySource::Renewable),
            transport_mode: Some(TransportMode::Ship),
            transport_distance: Some(TransportDistance::Regional),
            custom_distance: Some(250.0),
            end_of_life_scenario: Some(EndOfLifeScenario::Recycling),
            recovery_rate: Some(RecoveryRate::High),
            custom_recovery_rate: Some(90.0),
        }
    }

    /// 返回钳制后的副本（百分比 [0,100]，数量非负）
    pub fn clamped(mut self) -> Self {
        for pct in [
            &mut self.material_efficiency,
            &mut self.secondary_material_fraction,
            &mut self.scrap_ratio,
            &mut self.recycling_rate,
            &mut self.waste_ratio,
            &mut self.energy_recovery_rate,
            &mut self.recycled_content,
            &mut self.custom_recovery_rate,
        ] {
            *pct = pct.map(clamp_pct);
        }
        for qty in [
            &mut self.total_inputs,
            &mut self.total_outputs,
            &mut self.custom_distance,
        ] {
            *qty = qty.map(clamp_non_negative);
        }
        self
    }

    /// 合并部分更新，写入时钳制
    ///
    /// 不做派生字段计算（见 engine::derivation）
    pub fn merge(&mut self, patch: &AssessmentPatch) {
        if let Some(v) = patch.metal_type {
            self.metal_type = Some(v);
        }
        if let Some(v) = patch.process_route {
            self.process_route = Some(v);
        }
        if let Some(v) = &patch.process_class {
            self.process_class = Some(v.clone());
        }
        if let Some(v) = patch.is_metallurgy {
            self.is_metallurgy = v;
        }
        if let Some(v) = patch.has_circularity {
            self.has_circularity = v;
        }
        if let Some(v) = patch.production_scale {
            // 非有限值视为未填写，由第3步校验拦截
            self.production_scale = Some(v).filter(|v| v.is_finite());
        }
        if let Some(v) = patch.total_inputs {
            self.total_inputs = Some(clamp_non_negative(v));
        }
        if let Some(v) = patch.total_outputs {
            self.total_outputs = Some(clamp_non_negative(v));
        }
        if let Some(v) = patch.material_efficiency {
            self.material_efficiency = Some(clamp_pct(v));
        }
        if let Some(v) = patch.secondary_material_fraction {
            self.secondary_material_fraction = Some(clamp_pct(v));
        }
        if let Some(v) = patch.scrap_ratio {
            self.scrap_ratio = Some(clamp_pct(v));
        }
        if let Some(v) = patch.recycling_rate {
            self.recycling_rate = Some(clamp_pct(v));
        }
        if let Some(v) = patch.waste_ratio {
            self.waste_ratio = Some(clamp_pct(v));
        }
        if let Some(v) = patch.energy_recovery_rate {
            self.energy_recovery_rate = Some(clamp_pct(v));
        }
        if let Some(streams) = &patch.waste_streams {
            for (stream, enabled) in streams {
                self.waste_streams.insert(*stream, *enabled);
            }
        }
        if let Some(v) = patch.recycled_content {
            self.recycled_content = Some(clamp_pct(v));
        }
        if let Some(v) = patch.energy_source {
            self.energy_source = Some(v);
        }
        if let Some(v) = patch.transport_mode {
            self.transport_mode = Some(v);
        }
        if let Some(v) = patch.transport_distance {
            self.transport_distance = Some(v);
        }
        if let Some(v) = patch.custom_distance {
            self.custom_distance = Some(clamp_non_negative(v));
        }
        if let Some(v) = patch.end_of_life_scenario {
            self.end_of_life_scenario = Some(v);
        }
        if let Some(v) = patch.recovery_rate {
            self.recovery_rate = Some(v);
        }
        if let Some(v) = patch.custom_recovery_rate {
            self.custom_recovery_rate = Some(clamp_pct(v));
        }
    }

    /// 已启用的废物流
    pub fn enabled_waste_streams(&self) -> Vec<WasteStream> {
        self.waste_streams
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(stream, _)| *stream)
            .collect()
    }

    /// 有效运输距离（km）：自定义值优先，否则取区间代表值
    pub fn effective_transport_distance_km(&self) -> f64 {
        match self.custom_distance {
            Some(km) if km > 0.0 => km,
            _ => self
                .transport_distance
                .map(|d| d.representative_km())
                .unwrap_or_else(|| TransportDistance::Regional.representative_km()),
        }
    }

    /// 有效回收率（%）：自定义值优先，否则取区间代表值
    pub fn effective_recovery_rate(&self) -> f64 {
        match self.custom_recovery_rate {
            Some(pct) if pct > 0.0 => pct,
            _ => self
                .recovery_rate
                .map(|r| r.representative_pct())
                .unwrap_or_else(|| RecoveryRate::Medium.representative_pct()),
        }
    }

    /// 有效材料效率（%）：录入值 → 产出/投入 → 工艺默认值 → 85
    pub fn effective_material_efficiency(&self) -> f64 {
        if let Some(eff) = self.material_efficiency.filter(|v| *v > 0.0) {
            return eff;
        }
        if let (Some(inputs), Some(outputs)) = (self.total_inputs, self.total_outputs) {
            if inputs > 0.0 && outputs > 0.0 {
                return outputs / inputs * 100.0;
            }
        }
        self.process_route
            .map(|r| r.default_efficiency())
            .unwrap_or(85.0)
    }
}

// ==========================================
// AssessmentPatch - 部分更新
// ==========================================

/// 表单的一次部分更新；Some 表示该字段被编辑
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentPatch {
    #[serde(deserialize_with = "lenient::option")]
    pub metal_type: Option<MetalType>,
    #[serde(deserialize_with = "lenient::option")]
    pub process_route: Option<ProcessRoute>,
    pub process_class: Option<String>,
    pub is_metallurgy: Option<bool>,
    pub has_circularity: Option<bool>,
    #[serde(deserialize_with = "lenient::number")]
    pub production_scale: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub total_inputs: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub total_outputs: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub material_efficiency: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub secondary_material_fraction: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub scrap_ratio: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub recycling_rate: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub waste_ratio: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub energy_recovery_rate: Option<f64>,
    pub waste_streams: Option<BTreeMap<WasteStream, bool>>,
    #[serde(deserialize_with = "lenient::number")]
    pub recycled_content: Option<f64>,
    #[serde(deserialize_with = "lenient::option")]
    pub energy_source: Option<EnergySource>,
    #[serde(deserialize_with = "lenient::option")]
    pub transport_mode: Option<TransportMode>,
    #[serde(deserialize_with = "lenient::option")]
    pub transport_distance: Option<TransportDistance>,
    #[serde(deserialize_with = "lenient::number")]
    pub custom_distance: Option<f64>,
    #[serde(deserialize_with = "lenient::option")]
    pub end_of_life_scenario: Option<EndOfLifeScenario>,
    #[serde(deserialize_with = "lenient::option")]
    pub recovery_rate: Option<RecoveryRate>,
    #[serde(deserialize_with = "lenient::number")]
    pub custom_recovery_rate: Option<f64>,
}

impl AssessmentPatch {
    /// 本次更新涉及的字段名
    pub fn touched_fields(&self) -> Vec<&'static str> {
        let mut touched = Vec::new();
        let mut mark = |present: bool, name: &'static str| {
            if present {
                touched.push(name);
            }
        };
        mark(self.metal_type.is_some(), fields::METAL_TYPE);
        mark(self.process_route.is_some(), fields::PROCESS_ROUTE);
        mark(self.process_class.is_some(), fields::PROCESS_CLASS);
        mark(self.is_metallurgy.is_some(), fields::IS_METALLURGY);
        mark(self.has_circularity.is_some(), fields::HAS_CIRCULARITY);
        mark(self.production_scale.is_some(), fields::PRODUCTION_SCALE);
        mark(self.total_inputs.is_some(), fields::TOTAL_INPUTS);
        mark(self.total_outputs.is_some(), fields::TOTAL_OUTPUTS);
        mark(self.material_efficiency.is_some(), fields::MATERIAL_EFFICIENCY);
        mark(
            self.secondary_material_fraction.is_some(),
            fields::SECONDARY_MATERIAL_FRACTION,
        );
        mark(self.scrap_ratio.is_some(), fields::SCRAP_RATIO);
        mark(self.recycling_rate.is_some(), fields::RECYCLING_RATE);
        mark(self.waste_ratio.is_some(), fields::WASTE_RATIO);
        mark(self.energy_recovery_rate.is_some(), fields::ENERGY_RECOVERY_RATE);
        mark(self.waste_streams.is_some(), fields::WASTE_STREAMS);
        mark(self.recycled_content.is_some(), fields::RECYCLED_CONTENT);
        mark(self.energy_source.is_some(), fields::ENERGY_SOURCE);
        mark(self.transport_mode.is_some(), fields::TRANSPORT_MODE);
        mark(self.transport_distance.is_some(), fields::TRANSPORT_DISTANCE);
        mark(self.custom_distance.is_some(), fields::CUSTOM_DISTANCE);
        mark(self.end_of_life_scenario.is_some(), fields::END_OF_LIFE_SCENARIO);
        mark(self.recovery_rate.is_some(), fields::RECOVERY_RATE);
        mark(self.custom_recovery_rate.is_some(), fields::CUSTOM_RECOVERY_RATE);
        touched
    }

    pub fn is_empty(&self) -> bool {
        self.touched_fields().is_empty()
    }
}

impl From<AssessmentInput> for AssessmentPatch {
    fn from(input: AssessmentInput) -> Self {
        Self {
            metal_type: input.metal_type,
            process_route: input.process_route,
            process_class: input.process_class,
            is_metallurgy: Some(input.is_metallurgy),
            has_circularity: Some(input.has_circularity),
            production_scale: input.production_scale,
            total_inputs: input.total_inputs,
            total_outputs: input.total_outputs,
            material_efficiency: input.material_efficiency,
            secondary_material_fraction: input.secondary_material_fraction,
            scrap_ratio: input.scrap_ratio,
            recycling_rate: input.recycling_rate,
            waste_ratio: input.waste_ratio,
            energy_recovery_rate: input.energy_recovery_rate,
            waste_streams: if input.waste_streams.is_empty() {
                None
            } else {
                Some(input.waste_streams)
            },
            recycled_content: input.recycled_content,
            energy_source: input.energy_source,
            transport_mode: input.transport_mode,
            transport_distance: input.transport_distance,
            custom_distance: input.custom_distance,
            end_of_life_scenario: input.end_of_life_scenario,
            recovery_rate: input.recovery_rate,
            custom_recovery_rate: input.custom_recovery_rate,
        }
    }
}

// ==========================================
// 宽松反序列化
// ==========================================
// 表单原始 JSON 中数字可能是字符串（"500"），未选择的选项是空字符串
mod lenient {
    use serde::de::{self, Deserialize, Deserializer};
    use serde_json::Value;
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Some(v)),
                Ok(_) => Err(de::Error::custom(format!("无效数字 '{}': 非有限值", s))),
                Err(e) => Err(de::Error::custom(format!("无效数字 '{}': {}", s, e))),
            },
            Some(other) => Err(de::Error::custom(format!("期望数字，实际为 {}", other))),
        }
    }

    pub fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => s.parse::<T>().map(Some).map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_clamps_percentages() {
        let mut input = AssessmentInput::form_defaults();
        let patch = AssessmentPatch {
            recycled_content: Some(140.0),
            scrap_ratio: Some(-5.0),
            material_efficiency: Some(101.0),
            custom_recovery_rate: Some(250.0),
            total_inputs: Some(-3.0),
            ..Default::default()
        };
        input.merge(&patch);

        assert_eq!(input.recycled_content, Some(100.0));
        assert_eq!(input.scrap_ratio, Some(0.0));
        assert_eq!(input.material_efficiency, Some(100.0));
        assert_eq!(input.custom_recovery_rate, Some(100.0));
        assert_eq!(input.total_inputs, Some(0.0));
    }

    #[test]
    fn test_merge_keeps_untouched_fields() {
        let mut input = AssessmentInput::demo_template();
        input.merge(&AssessmentPatch {
            energy_source: Some(EnergySource::Coal),
            ..Default::default()
        });
        assert_eq!(input.energy_source, Some(EnergySource::Coal));
        assert_eq!(input.metal_type, Some(MetalType::Aluminum));
        assert_eq!(input.production_scale, Some(500.0));
    }

    #[test]
    fn test_merge_waste_streams_is_additive() {
        let mut input = AssessmentInput::form_defaults();
        input.merge(&AssessmentPatch {
            waste_streams: Some([(WasteStream::Slag, true)].into_iter().collect()),
            ..Default::default()
        });
        input.merge(&AssessmentPatch {
            waste_streams: Some([(WasteStream::Dust, true)].into_iter().collect()),
            ..Default::default()
        });
        assert_eq!(
            input.enabled_waste_streams(),
            vec![WasteStream::Slag, WasteStream::Dust]
        );
    }

    #[test]
    fn test_lenient_deserialization_of_form_json() {
        let raw = r#"{
            "metalType": "copper",
            "processRoute": "",
            "productionScale": "500",
            "totalInputs": 120,
            "recycledContent": "85",
            "energySource": "grid",
            "wasteStreams": {"slag": true, "water": false}
        }"#;
        let input: AssessmentInput = serde_json::from_str(raw).unwrap();
        assert_eq!(input.metal_type, Some(MetalType::Copper));
        assert_eq!(input.process_route, None);
        assert_eq!(input.production_scale, Some(500.0));
        assert_eq!(input.total_inputs, Some(120.0));
        assert_eq!(input.recycled_content, Some(85.0));
        assert_eq!(input.energy_source, Some(EnergySource::Grid));
        assert_eq!(input.enabled_waste_streams(), vec![WasteStream::Slag]);
    }

    #[test]
    fn test_lenient_deserialization_rejects_garbage() {
        let bad_number = serde_json::from_str::<AssessmentInput>(r#"{"productionScale": "abc"}"#);
        assert!(bad_number.is_err());
        let bad_option = serde_json::from_str::<AssessmentInput>(r#"{"metalType": "gold"}"#);
        assert!(bad_option.is_err());
        for raw in ["inf", "-infinity", "NaN"] {
            let json = format!(r#"{{"productionScale": "{}"}}"#, raw);
            assert!(serde_json::from_str::<AssessmentInput>(&json).is_err(), "{}", raw);
        }
    }

    #[test]
    fn test_merge_drops_non_finite_amounts() {
        let mut input = AssessmentInput::demo_template();
        input.merge(&AssessmentPatch {
            production_scale: Some(f64::INFINITY),
            total_inputs: Some(f64::INFINITY),
            total_outputs: Some(f64::NAN),
            ..Default::default()
        });
        assert_eq!(input.production_scale, None);
        assert_eq!(input.total_inputs, Some(0.0));
        assert_eq!(input.total_outputs, Some(0.0));
        let blob = serde_json::to_string(&input).unwrap();
        assert!(serde_json::from_str::<AssessmentInput>(&blob).is_ok());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(AssessmentInput::demo_template()).unwrap();
        assert_eq!(json["metalType"], "aluminum");
        assert_eq!(json["endOfLifeScenario"], "recycling");
        assert_eq!(json["productionScale"], 500.0);
        assert_eq!(json["wasteStreams"]["slag"], true);
    }

    #[test]
    fn test_effective_values() {
        let mut input = AssessmentInput::demo_template();
        assert_eq!(input.effective_transport_distance_km(), 250.0);
        assert_eq!(input.effective_recovery_rate(), 90.0);
        assert_eq!(input.effective_material_efficiency(), 83.3);

        input.custom_distance = Some(0.0);
        input.transport_distance = Some(TransportDistance::Intercontinental);
        assert_eq!(input.effective_transport_distance_km(), 5000.0);

        input.custom_recovery_rate = None;
        input.recovery_rate = Some(RecoveryRate::Low);
        assert_eq!(input.effective_recovery_rate(), 40.0);

        input.material_efficiency = None;
        assert!((input.effective_material_efficiency() - 100.0 / 120.0 * 100.0).abs() < 1e-9);

        input.total_inputs = None;
        assert_eq!(input.effective_material_efficiency(), 92.0);
    }

    #[test]
    fn test_patch_touched_fields() {
        let patch = AssessmentPatch {
            total_inputs: Some(10.0),
            energy_source: Some(EnergySource::Grid),
            ..Default::default()
        };
        assert_eq!(
            patch.touched_fields(),
            vec![fields::TOTAL_INPUTS, fields::ENERGY_SOURCE]
        );
        assert!(AssessmentPatch::default().is_empty());
    }

    #[test]
    fn test_template_survives_patch_conversion() {
        let template = AssessmentInput::demo_template();
        let mut rebuilt = AssessmentInput::default();
        rebuilt.merge(&AssessmentPatch::from(template.clone()));
        assert_eq!(rebuilt, template);
    }
}
