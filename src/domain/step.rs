// ==========================================
// 可持续性评估 - 录入步骤
// ==========================================
// 九个有序步骤，编号 1..=9
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStep {
    MetalType,
    ProcessRoute,
    ProductionScale,
    ProductionDetails,
    WasteManagement,
    RecycledContent,
    EnergySource,
    Transport,
    EndOfLife,
}

impl AssessmentStep {
    pub const TOTAL: u8 = 9;
    pub const FIRST: AssessmentStep = AssessmentStep::MetalType;
    pub const LAST: AssessmentStep = AssessmentStep::EndOfLife;

    pub const ALL: [AssessmentStep; 9] = [
        AssessmentStep::MetalType,
        AssessmentStep::ProcessRoute,
        AssessmentStep::ProductionScale,
        AssessmentStep::ProductionDetails,
        AssessmentStep::WasteManagement,
        AssessmentStep::RecycledContent,
        AssessmentStep::EnergySource,
        AssessmentStep::Transport,
        AssessmentStep::EndOfLife,
    ];

    /// 步骤编号（1 起）
    pub fn number(&self) -> u8 {
        match self {
            AssessmentStep::MetalType => 1,
            AssessmentStep::ProcessRoute => 2,
            AssessmentStep::ProductionScale => 3,
            AssessmentStep::ProductionDetails => 4,
            AssessmentStep::WasteManagement => 5,
            AssessmentStep::RecycledContent => 6,
            AssessmentStep::EnergySource => 7,
            AssessmentStep::Transport => 8,
            AssessmentStep::EndOfLife => 9,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        if (1..=Self::TOTAL).contains(&number) {
            Some(Self::ALL[(number - 1) as usize])
        } else {
            None
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    pub fn is_last(&self) -> bool {
        *self == Self::LAST
    }

    pub fn title(&self) -> &'static str {
        match self {
            AssessmentStep::MetalType => "Metal Type",
            AssessmentStep::ProcessRoute => "Process Route",
            AssessmentStep::ProductionScale => "Production Scale",
            AssessmentStep::ProductionDetails => "Production Details",
            AssessmentStep::WasteManagement => "Waste Management",
            AssessmentStep::RecycledContent => "Recycled Content",
            AssessmentStep::EnergySource => "Energy Source",
            AssessmentStep::Transport => "Transport",
            AssessmentStep::EndOfLife => "End of Life",
        }
    }
}

impl fmt::Display for AssessmentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.number(), Self::TOTAL, self.title())
    }
}
