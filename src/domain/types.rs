// ==========================================
// 可持续性评估 - 领域类型定义
// ==========================================
// 职责: 表单中的分类选项（金属/工艺/能源/运输/报废场景）
// 序列化格式: snake_case（与远程预测服务一致）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 无法识别的选项值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "未知的{}选项: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownOption {}

/// 选项目录条目（供界面/CLI 展示）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionEntry {
    pub value: &'static str,
    pub label: &'static str,
}

// 为分类枚举生成 as_str / label / ALL / Display / FromStr
macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => ($value:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn catalog() -> Vec<OptionEntry> {
                Self::ALL
                    .iter()
                    .map(|v| OptionEntry { value: v.as_str(), label: v.label() })
                    .collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($value => Ok($name::$variant),)+
                    other => Err(UnknownOption { kind: $kind, value: other.to_string() }),
                }
            }
        }
    };
}

// ==========================================
// 金属类型 (步骤1)
// ==========================================
option_enum! {
    MetalType, "金属类型" {
        Aluminum => ("aluminum", "Aluminum"),
        Copper => ("copper", "Copper"),
        Steel => ("steel", "Steel"),
        Lithium => ("lithium", "Lithium"),
        Cobalt => ("cobalt", "Cobalt"),
        Nickel => ("nickel", "Nickel"),
        RareEarth => ("rare_earth", "Rare Earth Elements"),
        Zinc => ("zinc", "Zinc"),
        Titanium => ("titanium", "Titanium"),
    }
}

// ==========================================
// 工艺路线 (步骤2)
// ==========================================
// 后三项不在表单中展示，仅用于默认材料效率查表
option_enum! {
    ProcessRoute, "工艺路线" {
        Smelting => ("smelting", "Smelting & Pyrometallurgy"),
        Recycling => ("recycling", "Secondary Recycling"),
        Alloying => ("alloying", "Alloying & Blending"),
        Hydrometallurgy => ("hydrometallurgy", "Hydrometallurgy"),
        Electrometallurgy => ("electrometallurgy", "Electrometallurgy"),
        Manufacturing => ("manufacturing", "Manufacturing"),
    }
}

impl ProcessRoute {
    /// 工艺路线的默认材料效率（%）
    pub fn default_efficiency(&self) -> f64 {
        match self {
            ProcessRoute::Smelting => 85.0,
            ProcessRoute::Recycling => 92.0,
            ProcessRoute::Alloying => 88.0,
            ProcessRoute::Hydrometallurgy => 80.0,
            ProcessRoute::Electrometallurgy => 87.0,
            ProcessRoute::Manufacturing => 90.0,
        }
    }
}

// ==========================================
// 能源类型 (步骤7)
// ==========================================
option_enum! {
    EnergySource, "能源类型" {
        Coal => ("coal", "Coal"),
        Grid => ("grid", "Grid Mix"),
        Renewable => ("renewable", "Renewable Mix"),
    }
}

// ==========================================
// 运输方式与距离 (步骤8)
// ==========================================
option_enum! {
    TransportMode, "运输方式" {
        Truck => ("truck", "Truck Transport"),
        Rail => ("rail", "Rail Transport"),
        Ship => ("ship", "Maritime Shipping"),
        Air => ("air", "Air Freight"),
        Multimodal => ("multimodal", "Multimodal"),
    }
}

option_enum! {
    TransportDistance, "运输距离" {
        Local => ("local", "Local (<50 km)"),
        Regional => ("regional", "Regional (50-500 km)"),
        Continental => ("continental", "Continental (500-2000 km)"),
        Intercontinental => ("intercontinental", "Intercontinental (>2000 km)"),
    }
}

impl TransportDistance {
    /// 距离区间的代表值（km）
    pub fn representative_km(&self) -> f64 {
        match self {
            TransportDistance::Local => 50.0,
            TransportDistance::Regional => 250.0,
            TransportDistance::Continental => 1250.0,
            TransportDistance::Intercontinental => 5000.0,
        }
    }
}

// ==========================================
// 报废场景与回收率 (步骤9)
// ==========================================
option_enum! {
    EndOfLifeScenario, "报废场景" {
        Recycling => ("recycling", "Material Recycling"),
        Reuse => ("reuse", "Direct Reuse"),
        Remanufacturing => ("remanufacturing", "Remanufacturing"),
        EnergyRecovery => ("energy_recovery", "Energy Recovery"),
        Downcycling => ("downcycling", "Downcycling"),
        Landfill => ("landfill", "Landfill Disposal"),
    }
}

impl EndOfLifeScenario {
    /// 填埋以外的场景必须给出回收率
    pub fn requires_recovery_rate(&self) -> bool {
        !matches!(self, EndOfLifeScenario::Landfill)
    }
}

option_enum! {
    RecoveryRate, "回收率" {
        High => ("high", "High Recovery (80-95%)"),
        Medium => ("medium", "Medium Recovery (50-80%)"),
        Low => ("low", "Low Recovery (20-50%)"),
        Minimal => ("minimal", "Minimal Recovery (<20%)"),
    }
}

impl RecoveryRate {
    /// 回收率区间的代表值（%）
    pub fn representative_pct(&self) -> f64 {
        match self {
            RecoveryRate::High => 90.0,
            RecoveryRate::Medium => 70.0,
            RecoveryRate::Low => 40.0,
            RecoveryRate::Minimal => 10.0,
        }
    }
}

// ==========================================
// 废物流 (步骤5)
// ==========================================
option_enum! {
    WasteStream, "废物流" {
        Slag => ("slag", "Metallurgical Slag"),
        Dust => ("dust", "Filter Dust"),
        Water => ("water", "Process Water"),
        Offgas => ("offgas", "Off-gas Treatment"),
        Tailings => ("tailings", "Mine Tailings"),
    }
}

// ==========================================
// 材料效率评级
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EfficiencyRating {
    Poor,
    Fair,
    Good,
    VeryGood,
    Excellent,
}

impl EfficiencyRating {
    pub fn from_efficiency(efficiency_pct: f64) -> Self {
        if efficiency_pct >= 90.0 {
            EfficiencyRating::Excellent
        } else if efficiency_pct >= 80.0 {
            EfficiencyRating::VeryGood
        } else if efficiency_pct >= 70.0 {
            EfficiencyRating::Good
        } else if efficiency_pct >= 60.0 {
            EfficiencyRating::Fair
        } else {
            EfficiencyRating::Poor
        }
    }
}

impl fmt::Display for EfficiencyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EfficiencyRating::Poor => write!(f, "Poor"),
            EfficiencyRating::Fair => write!(f, "Fair"),
            EfficiencyRating::Good => write!(f, "Good"),
            EfficiencyRating::VeryGood => write!(f, "Very Good"),
            EfficiencyRating::Excellent => write!(f, "Excellent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_round_trip_through_str() {
        for metal in MetalType::ALL {
            assert_eq!(metal.as_str().parse::<MetalType>().unwrap(), *metal);
        }
        assert_eq!("rare_earth".parse::<MetalType>().unwrap(), MetalType::RareEarth);
        assert_eq!(
            "energy_recovery".parse::<EndOfLifeScenario>().unwrap(),
            EndOfLifeScenario::EnergyRecovery
        );
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = "plutonium".parse::<MetalType>().unwrap_err();
        assert_eq!(err.value, "plutonium");
        assert!(err.to_string().contains("plutonium"));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&EndOfLifeScenario::EnergyRecovery).unwrap();
        assert_eq!(json, "\"energy_recovery\"");
        let parsed: TransportMode = serde_json::from_str("\"ship\"").unwrap();
        assert_eq!(parsed, TransportMode::Ship);
    }

    #[test]
    fn test_landfill_needs_no_recovery_rate() {
        assert!(!EndOfLifeScenario::Landfill.requires_recovery_rate());
        assert!(EndOfLifeScenario::Recycling.requires_recovery_rate());
        assert!(EndOfLifeScenario::Downcycling.requires_recovery_rate());
    }

    #[test]
    fn test_efficiency_rating_thresholds() {
        assert_eq!(EfficiencyRating::from_efficiency(95.0), EfficiencyRating::Excellent);
        assert_eq!(EfficiencyRating::from_efficiency(90.0), EfficiencyRating::Excellent);
        assert_eq!(EfficiencyRating::from_efficiency(83.3), EfficiencyRating::VeryGood);
        assert_eq!(EfficiencyRating::from_efficiency(70.0), EfficiencyRating::Good);
        assert_eq!(EfficiencyRating::from_efficiency(60.0), EfficiencyRating::Fair);
        assert_eq!(EfficiencyRating::from_efficiency(59.9), EfficiencyRating::Poor);
        assert_eq!(EfficiencyRating::VeryGood.to_string(), "Very Good");
    }

    #[test]
    fn test_catalog_lists_every_variant() {
        let catalog = WasteStream::catalog();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog[0].value, "slag");
        assert_eq!(catalog[0].label, "Metallurgical Slag");
    }
}
