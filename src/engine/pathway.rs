// ==========================================
// 可持续性评估 - 传统 / 循环路径对比
// ==========================================
// 以同一份输入派生两种变体，并发估算后比较:
//   传统: 再生料 10%、煤电、填埋
//   循环: 再生料 85%、可再生能源、回收
// ==========================================

use serde::Serialize;

use crate::domain::assessment::AssessmentInput;
use crate::domain::result::ResultRecord;
use crate::domain::types::{EndOfLifeScenario, EnergySource};
use crate::engine::estimator::{round2, EstimationStrategy};

#[derive(Debug, Clone, Serialize)]
pub struct PathwayComparison {
    pub conventional: ResultRecord,
    pub circular: ResultRecord,
    /// 碳足迹降低（%）
    pub carbon_reduction_pct: f64,
    /// 能耗降低（%）
    pub energy_reduction_pct: f64,
    /// 用水降低（%）
    pub water_reduction_pct: f64,
    /// 循环指数提升（百分点）
    pub circularity_improvement_pts: f64,
}

pub fn conventional_variant(base: &AssessmentInput) -> AssessmentInput {
    AssessmentInput {
        recycled_content: Some(10.0),
        energy_source: Some(EnergySource::Coal),
        end_of_life_scenario: Some(EndOfLifeScenario::Landfill),
        ..base.clone()
    }
}

pub fn circular_variant(base: &AssessmentInput) -> AssessmentInput {
    AssessmentInput {
        recycled_content: Some(85.0),
        energy_source: Some(EnergySource::Renewable),
        end_of_life_scenario: Some(EndOfLifeScenario::Recycling),
        ..base.clone()
    }
}

/// 相对降幅；基线为 0 时返回 0
fn reduction_pct(conventional: f64, circular: f64) -> f64 {
    if conventional == 0.0 {
        return 0.0;
    }
    round2((conventional - circular) / conventional * 100.0)
}

impl PathwayComparison {
    pub fn from_records(conventional: ResultRecord, circular: ResultRecord) -> Self {
        Self {
            carbon_reduction_pct: reduction_pct(
                conventional.carbon_footprint,
                circular.carbon_footprint,
            ),
            energy_reduction_pct: reduction_pct(
                conventional.energy_consumption,
                circular.energy_consumption,
            ),
            water_reduction_pct: reduction_pct(conventional.water_usage, circular.water_usage),
            circularity_improvement_pts: round2(
                (circular.circularity_index - conventional.circularity_index) * 100.0,
            ),
            conventional,
            circular,
        }
    }
}

/// 并发估算两种路径
pub async fn compare_pathways(
    strategy: &EstimationStrategy,
    base: &AssessmentInput,
) -> PathwayComparison {
    let conventional_input = conventional_variant(base);
    let circular_input = circular_variant(base);

    let (conventional, circular) = futures::join!(
        strategy.estimate(&conventional_input),
        strategy.estimate(&circular_input)
    );

    let comparison = PathwayComparison::from_records(conventional, circular);
    tracing::info!(
        carbon = comparison.carbon_reduction_pct,
        energy = comparison.energy_reduction_pct,
        water = comparison.water_reduction_pct,
        "路径对比完成"
    );
    comparison
}
