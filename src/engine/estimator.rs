// ==========================================
// 可持续性评估 - 估算器
// ==========================================
// Estimator trait: 引擎层定义，远程实现位于 client 层（依赖倒置）
// LocalEstimator: 本地公式回退，纯函数、无 I/O、必定成功
// EstimationStrategy: 远程（失败即放弃，不重试）+ 本地回退
// ==========================================

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::assessment::AssessmentInput;
use crate::domain::result::ResultRecord;
use crate::domain::types::{EndOfLifeScenario, EnergySource, ProcessRoute, TransportMode};

/// 回退结果的固定模型置信度
pub const FALLBACK_MODEL_CONFIDENCE: f64 = 0.87;

/// 材料效率缺省值（%）
pub const DEFAULT_MATERIAL_EFFICIENCY: f64 = 85.0;

/// 回退结果的固定建议（与输入无关）
pub const FALLBACK_RECOMMENDATIONS: [&str; 5] = [
    "Consider increasing recycled content to 90% for optimal sustainability",
    "Transition to renewable energy sources to reduce carbon footprint by 70%",
    "Implement closed-loop water recycling systems to minimize water usage",
    "Optimize transport routes to reduce logistics emissions by 25%",
    "Explore remanufacturing options to extend product lifecycle",
];

/// 单次估算失败
#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error("远程预测服务不可用: {0}")]
    Unavailable(String),

    #[error("远程预测服务拒绝请求: {0}")]
    Rejected(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EstimatorResult<T> = Result<T, EstimatorError>;

#[async_trait]
pub trait Estimator: Send + Sync {
    /// 估算器名称（日志用）
    fn name(&self) -> &'static str;

    async fn estimate(&self, input: &AssessmentInput) -> EstimatorResult<ResultRecord>;
}

// ==========================================
// 公式
// ==========================================

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn pct(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0) / 100.0
}

pub fn energy_multiplier(source: Option<EnergySource>) -> f64 {
    match source {
        Some(EnergySource::Renewable) => 0.3,
        Some(EnergySource::Grid) => 0.6,
        _ => 1.0,
    }
}

pub fn transport_multiplier(mode: Option<TransportMode>) -> f64 {
    match mode {
        Some(TransportMode::Ship) => 1.1,
        Some(TransportMode::Rail) => 1.2,
        Some(TransportMode::Truck) => 1.4,
        _ => 1.6,
    }
}

pub fn end_of_life_multiplier(scenario: Option<EndOfLifeScenario>) -> f64 {
    match scenario {
        Some(EndOfLifeScenario::Recycling) => 0.8,
        Some(EndOfLifeScenario::Reuse) => 0.7,
        _ => 1.0,
    }
}

/// 再生料带来的削减比例
fn recycling_reduction(input: &AssessmentInput) -> f64 {
    pct(input.recycled_content) * 0.6
}

/// 碳足迹使用的废物管理系数
pub fn carbon_waste_multiplier(input: &AssessmentInput) -> f64 {
    1.0 - (pct(input.scrap_ratio) * 0.2
        + pct(input.recycling_rate) * 0.15
        + pct(input.energy_recovery_rate) * 0.1)
}

/// 用水量使用的废物管理系数（权重与碳足迹不同）
pub fn water_waste_multiplier(input: &AssessmentInput) -> f64 {
    1.0 - (pct(input.scrap_ratio) * 0.1 + pct(input.recycling_rate) * 0.15)
}

pub fn carbon_footprint(input: &AssessmentInput) -> f64 {
    let base_carbon = input.production_scale.unwrap_or(0.0) * 2.5;
    round2(
        base_carbon
            * (1.0 - recycling_reduction(input))
            * energy_multiplier(input.energy_source)
            * transport_multiplier(input.transport_mode)
            * end_of_life_multiplier(input.end_of_life_scenario)
            * carbon_waste_multiplier(input),
    )
}

pub fn energy_consumption(input: &AssessmentInput) -> f64 {
    // 0 与缺失等价
    let efficiency = input
        .material_efficiency
        .filter(|v| *v != 0.0)
        .unwrap_or(DEFAULT_MATERIAL_EFFICIENCY)
        / 100.0;
    round2(
        input.production_scale.unwrap_or(0.0)
            * 15.0
            * energy_multiplier(input.energy_source)
            * (2.0 - efficiency),
    )
}

pub fn water_usage(input: &AssessmentInput) -> f64 {
    round2(
        input.production_scale.unwrap_or(0.0)
            * 8.2
            * (1.0 - recycling_reduction(input))
            * water_waste_multiplier(input),
    )
}

/// 循环指数，上限 1.0
pub fn circularity_index(input: &AssessmentInput) -> f64 {
    let mut score = pct(input.recycled_content) * 0.4;
    if input.process_route == Some(ProcessRoute::Recycling) {
        score += 0.2;
    }
    if input.energy_source == Some(EnergySource::Renewable) {
        score += 0.1;
    }
    if input.end_of_life_scenario == Some(EndOfLifeScenario::Recycling) {
        score += 0.25;
    }
    score += pct(input.scrap_ratio) * 0.15;
    score += pct(input.recycling_rate) * 0.15;
    round2(score).min(1.0)
}

// ==========================================
// LocalEstimator - 本地公式回退
// ==========================================

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalEstimator;

impl LocalEstimator {
    pub fn new() -> Self {
        Self
    }

    /// 用指定随机源估算（environmental_efficiency 在 [0.6, 0.9) 内均匀分布）
    pub fn estimate_with_rng<R: Rng + ?Sized>(
        &self,
        input: &AssessmentInput,
        rng: &mut R,
    ) -> ResultRecord {
        ResultRecord {
            carbon_footprint: carbon_footprint(input),
            energy_consumption: energy_consumption(input),
            water_usage: water_usage(input),
            circularity_index: circularity_index(input),
            environmental_efficiency: rng.random_range(0.6..0.9),
            model_confidence: FALLBACK_MODEL_CONFIDENCE,
            recommendations: FALLBACK_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
            mock_data: true,
            using_ml_models: false,
            evaluation: None,
            timestamp: Utc::now(),
        }
    }

    pub fn estimate_now(&self, input: &AssessmentInput) -> ResultRecord {
        self.estimate_with_rng(input, &mut rand::rng())
    }
}

#[async_trait]
impl Estimator for LocalEstimator {
    fn name(&self) -> &'static str {
        "local-fallback"
    }

    async fn estimate(&self, input: &AssessmentInput) -> EstimatorResult<ResultRecord> {
        Ok(self.estimate_now(input))
    }
}

// ==========================================
// EstimationStrategy - 远程优先，失败立即回退
// ==========================================

#[derive(Clone)]
pub struct EstimationStrategy {
    remote: Option<Arc<dyn Estimator>>,
    local: LocalEstimator,
}

impl EstimationStrategy {
    pub fn new(remote: Option<Arc<dyn Estimator>>) -> Self {
        Self {
            remote,
            local: LocalEstimator::new(),
        }
    }

    /// 仅本地估算
    pub fn local_only() -> Self {
        Self::new(None)
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// 估算；任何远程失败都静默回退到本地公式
    pub async fn estimate(&self, input: &AssessmentInput) -> ResultRecord {
        if let Some(remote) = &self.remote {
            match remote.estimate(input).await {
                Ok(record) => {
                    tracing::info!(estimator = remote.name(), "使用远程模型结果");
                    return record;
                }
                Err(e) => {
                    tracing::warn!(estimator = remote.name(), error = %e, "远程估算失败，使用本地公式回退");
                }
            }
        }
        self.local.estimate_now(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RecoveryRate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// 文档中的场景 A/B 输入
    fn scenario_input() -> AssessmentInput {
        AssessmentInput {
            production_scale: Some(500.0),
            recycled_content: Some(85.0),
            energy_source: Some(EnergySource::Renewable),
            transport_mode: Some(TransportMode::Ship),
            end_of_life_scenario: Some(EndOfLifeScenario::Recycling),
            recovery_rate: Some(RecoveryRate::High),
            scrap_ratio: Some(15.0),
            recycling_rate: Some(85.0),
            energy_recovery_rate: Some(45.0),
            process_route: Some(ProcessRoute::Recycling),
            ..AssessmentInput::default()
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_round2() {
        assert_close(round2(128.95575), 128.96);
        assert_close(round2(1.004), 1.0);
        assert_close(round2(2.675_1), 2.68);
    }

    #[test]
    fn test_waste_multipliers_use_distinct_weights() {
        let input = scenario_input();
        assert_close(carbon_waste_multiplier(&input), 0.7975);
        assert_close(water_waste_multiplier(&input), 0.8575);
    }

    #[test]
    fn test_carbon_footprint_scenario() {
        assert_close(carbon_footprint(&scenario_input()), 128.96);
    }

    #[test]
    fn test_circularity_is_capped_at_one() {
        // 0.34 + 0.2 + 0.1 + 0.25 + 0.0225 + 0.1275 = 1.04
        assert_close(circularity_index(&scenario_input()), 1.0);
    }

    #[test]
    fn test_circularity_without_bonuses() {
        let input = AssessmentInput {
            recycled_content: Some(50.0),
            process_route: Some(ProcessRoute::Smelting),
            energy_source: Some(EnergySource::Coal),
            end_of_life_scenario: Some(EndOfLifeScenario::Landfill),
            scrap_ratio: Some(20.0),
            recycling_rate: Some(40.0),
            ..AssessmentInput::default()
        };
        // 0.2 + 0.03 + 0.06
        assert_close(circularity_index(&input), 0.29);
    }

    #[test]
    fn test_energy_consumption_defaults_efficiency() {
        let mut input = scenario_input();
        // 500 × 15 × 0.3 × (2 − 0.85)
        assert_close(energy_consumption(&input), 2587.5);

        input.material_efficiency = Some(0.0);
        assert_close(energy_consumption(&input), 2587.5);

        input.material_efficiency = Some(100.0);
        assert_close(energy_consumption(&input), 2250.0);
    }

    #[test]
    fn test_water_usage_scenario() {
        // 500 × 8.2 × 0.49 × 0.8575 = 1722.7175
        assert_close(water_usage(&scenario_input()), 1722.72);
    }

    #[test]
    fn test_multipliers_for_other_categories() {
        assert_close(energy_multiplier(Some(EnergySource::Coal)), 1.0);
        assert_close(energy_multiplier(None), 1.0);
        assert_close(transport_multiplier(Some(TransportMode::Air)), 1.6);
        assert_close(transport_multiplier(Some(TransportMode::Multimodal)), 1.6);
        assert_close(end_of_life_multiplier(Some(EndOfLifeScenario::Landfill)), 1.0);
        assert_close(end_of_life_multiplier(Some(EndOfLifeScenario::Reuse)), 0.7);
    }

    #[test]
    fn test_local_estimate_is_deterministic_except_efficiency() {
        let estimator = LocalEstimator::new();
        let input = scenario_input();
        let mut rng_a = StdRng::seed_from_u64(1);
        let mut rng_b = StdRng::seed_from_u64(99);
        let a = estimator.estimate_with_rng(&input, &mut rng_a);
        let b = estimator.estimate_with_rng(&input, &mut rng_b);

        assert_eq!(a.carbon_footprint, b.carbon_footprint);
        assert_eq!(a.energy_consumption, b.energy_consumption);
        assert_eq!(a.water_usage, b.water_usage);
        assert_eq!(a.circularity_index, b.circularity_index);
        assert_eq!(a.recommendations, b.recommendations);
        assert_eq!(a.model_confidence, 0.87);
        assert!(a.mock_data && b.mock_data);
    }

    #[test]
    fn test_environmental_efficiency_range() {
        let estimator = LocalEstimator::new();
        let input = scenario_input();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let record = estimator.estimate_with_rng(&input, &mut rng);
            assert!(record.environmental_efficiency >= 0.6);
            assert!(record.environmental_efficiency < 0.9);
        }
    }

    #[test]
    fn test_fallback_recommendations_are_static() {
        let record = LocalEstimator::new().estimate_now(&AssessmentInput::demo_template());
        assert_eq!(record.recommendations.len(), 5);
        assert_eq!(record.recommendations[0], FALLBACK_RECOMMENDATIONS[0]);
    }

    struct FailingEstimator;

    #[async_trait]
    impl Estimator for FailingEstimator {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn estimate(&self, _input: &AssessmentInput) -> EstimatorResult<ResultRecord> {
            Err(EstimatorError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_strategy_falls_back_on_remote_failure() {
        let strategy = EstimationStrategy::new(Some(Arc::new(FailingEstimator)));
        let record = strategy.estimate(&scenario_input()).await;
        assert!(record.mock_data);
        assert_close(record.carbon_footprint, 128.96);
    }

    #[tokio::test]
    async fn test_local_only_strategy() {
        let strategy = EstimationStrategy::local_only();
        assert!(!strategy.has_remote());
        let record = strategy.estimate(&scenario_input()).await;
        assert!(record.mock_data);
    }
}
