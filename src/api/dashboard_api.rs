// ==========================================
// 可持续性评估 - 结果看板 API
// ==========================================
// 职责: 构造时读取一次缓存结果，生成只读视图
//   - 指标卡片（单位 + 趋势/颜色阈值）
//   - 建议标注（优先级 / 影响 / 类别）
//   - 传统基线 vs 循环路径的图表数据
// 红线: 只读，不触发估算
// ==========================================

use serde::Serialize;

use crate::api::error::ApiResult;
use crate::domain::result::{AssessmentResults, Evaluation, ResultSource};
use crate::domain::types::EfficiencyRating;
use crate::repository::error::RepositoryError;
use crate::repository::result_store::ResultStore;

// ==========================================
// 视图模型
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub key: &'static str,
    pub title: &'static str,
    pub value: f64,
    pub unit: &'static str,
    pub trend: Trend,
    pub color: CardColor,
    /// 数据来源标签
    pub trend_value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedRecommendation {
    pub recommendation: String,
    pub priority: Priority,
    pub impact: &'static str,
    pub category: &'static str,
}

/// 图表中一条路径的数据（前六项为 0-100 归一化分值）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayProfile {
    pub carbon: f64,
    pub energy: f64,
    pub water: f64,
    pub waste: f64,
    pub resources: f64,
    pub toxicity: f64,
    pub co2: f64,
    pub energy_value: f64,
    pub water_value: f64,
}

impl PathwayProfile {
    /// 传统铝生产基线（固定值）
    pub fn conventional_baseline() -> Self {
        Self {
            carbon: 85.0,
            energy: 90.0,
            water: 75.0,
            waste: 80.0,
            resources: 95.0,
            toxicity: 70.0,
            co2: 250.0,
            energy_value: 2500.0,
            water_value: 3000.0,
        }
    }

    /// 由实际结果归一化得到的循环路径
    pub fn circular_from(results: &AssessmentResults) -> Self {
        let cf = results.carbon_footprint;
        let ec = results.energy_consumption;
        let wu = results.water_usage;
        let ci = results.circularity_index;
        let ee = results.environmental_efficiency;

        Self {
            carbon: (cf / 250.0 * 100.0).clamp(10.0, 100.0),
            energy: (ec / 2_500_000.0 * 100.0).clamp(10.0, 100.0),
            water: (wu / 3000.0 * 100.0).clamp(10.0, 100.0),
            waste: (100.0 - ci * 80.0).max(10.0),
            resources: (ci * 100.0).max(20.0),
            toxicity: (50.0 - ee * 30.0).max(10.0),
            co2: cf,
            energy_value: ec,
            water_value: wu,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub conventional: PathwayProfile,
    pub circular: PathwayProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub assessment_id: String,
    pub timestamp: String,
    pub provenance: &'static str,
    pub template_used: bool,
    pub model_confidence: f64,
    pub environmental_efficiency: f64,
    pub material_efficiency_pct: f64,
    pub material_efficiency_rating: EfficiencyRating,
    /// 有效运输距离（km）
    pub transport_distance_km: f64,
    /// 有效回收率（%）
    pub recovery_rate_pct: f64,
    pub metrics: Vec<MetricCard>,
    pub recommendations: Vec<AnnotatedRecommendation>,
    pub evaluation: Option<Evaluation>,
    pub chart: ChartData,
}

// ==========================================
// 规则
// ==========================================

fn lower_is_better(value: f64, threshold: f64) -> (Trend, CardColor) {
    if value < threshold {
        (Trend::Down, CardColor::Success)
    } else {
        (Trend::Up, CardColor::Warning)
    }
}

pub fn metric_cards(results: &AssessmentResults) -> Vec<MetricCard> {
    let trend_value = results.source().label();
    let card = |key, title, value, unit, (trend, color): (Trend, CardColor)| MetricCard {
        key,
        title,
        value,
        unit,
        trend,
        color,
        trend_value,
    };

    let circularity = if results.circularity_index > 0.7 {
        (Trend::Up, CardColor::Success)
    } else {
        (Trend::Down, CardColor::Warning)
    };

    vec![
        card(
            "carbonFootprint",
            "Carbon Footprint",
            results.carbon_footprint,
            "tons CO₂",
            lower_is_better(results.carbon_footprint, 100.0),
        ),
        card(
            "energyConsumption",
            "Energy Consumption",
            results.energy_consumption,
            "MJ",
            lower_is_better(results.energy_consumption, 1000.0),
        ),
        card(
            "waterUsage",
            "Water Usage",
            results.water_usage,
            "m³",
            lower_is_better(results.water_usage, 50.0),
        ),
        card(
            "circularityIndex",
            "Circularity Index",
            results.circularity_index,
            "(0-1 scale)",
            circularity,
        ),
    ]
}

/// 关键字匹配区分大小写
pub fn recommendation_category(text: &str) -> &'static str {
    if text.contains("energy") {
        "Energy"
    } else if text.contains("water") {
        "Water"
    } else if text.contains("carbon") {
        "Carbon"
    } else {
        "Material"
    }
}

pub fn annotate_recommendations(recommendations: &[String]) -> Vec<AnnotatedRecommendation> {
    recommendations
        .iter()
        .enumerate()
        .map(|(index, text)| AnnotatedRecommendation {
            recommendation: text.clone(),
            priority: match index {
                0 => Priority::High,
                1 => Priority::Medium,
                _ => Priority::Low,
            },
            impact: if index < 2 { "High Impact" } else { "Medium Impact" },
            category: recommendation_category(text),
        })
        .collect()
}

impl DashboardView {
    pub fn build(results: &AssessmentResults) -> Self {
        let material_efficiency = results.input_data.effective_material_efficiency();
        Self {
            assessment_id: results.assessment_id.clone(),
            timestamp: results.timestamp.to_rfc3339(),
            provenance: results.source().label(),
            template_used: results.template_used,
            model_confidence: results.model_confidence,
            environmental_efficiency: results.environmental_efficiency,
            material_efficiency_pct: material_efficiency,
            material_efficiency_rating: EfficiencyRating::from_efficiency(material_efficiency),
            transport_distance_km: results.input_data.effective_transport_distance_km(),
            recovery_rate_pct: results.input_data.effective_recovery_rate(),
            metrics: metric_cards(results),
            recommendations: annotate_recommendations(&results.recommendations),
            evaluation: results.evaluation.clone(),
            chart: ChartData {
                conventional: PathwayProfile::conventional_baseline(),
                circular: PathwayProfile::circular_from(results),
            },
        }
    }
}

// ==========================================
// DashboardApi
// ==========================================

pub struct DashboardApi {
    results: Option<AssessmentResults>,
}

impl DashboardApi {
    /// 挂载：读取一次缓存（之后的提交不会刷新本实例）
    ///
    /// 缓存记录无法解析时按“无结果”处理
    pub fn load(store: &dyn ResultStore) -> ApiResult<Self> {
        let results = match store.load() {
            Ok(results) => results,
            Err(RepositoryError::CorruptRecord { key, message }) => {
                tracing::warn!(%key, %message, "缓存结果无法解析，按无结果处理");
                None
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { results })
    }

    pub fn has_results(&self) -> bool {
        self.results.is_some()
    }

    pub fn results(&self) -> Option<&AssessmentResults> {
        self.results.as_ref()
    }

    pub fn view(&self) -> Option<DashboardView> {
        self.results.as_ref().map(DashboardView::build)
    }

    pub fn source(&self) -> Option<ResultSource> {
        self.results.as_ref().map(AssessmentResults::source)
    }
}
