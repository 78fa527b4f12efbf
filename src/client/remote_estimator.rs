// ==========================================
// 可持续性评估 - 远程估算器
// ==========================================
// 流程: 健康检查 → 提交 → 映射（单次尝试，任何失败交由调用方回退）
// 映射: 远程缺失或为 0 的指标以本地公式补齐
// ==========================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::client::lca_client::{LcaApiClient, SubmitSolutionResponse};
use crate::domain::assessment::AssessmentInput;
use crate::domain::result::{Evaluation, ResultRecord};
use crate::engine::estimator::{self, Estimator, EstimatorResult};

/// 远程使用机器学习模型时的置信度
pub const ML_MODEL_CONFIDENCE: f64 = 0.92;
/// 远程未使用机器学习模型时的置信度
pub const RULE_MODEL_CONFIDENCE: f64 = 0.87;

pub const DEFAULT_ENVIRONMENTAL_EFFICIENCY: f64 = 0.75;
pub const DEFAULT_FEEDBACK: &str = "Assessment processed successfully";
pub const DEFAULT_OVERALL_SCORE: f64 = 0.75;
pub const DEFAULT_ENVIRONMENTAL_SCORE: f64 = 0.75;
pub const DEFAULT_CIRCULARITY_SCORE: f64 = 0.65;

/// 远程未给出建议时的默认建议
pub const REMOTE_DEFAULT_RECOMMENDATIONS: [&str; 3] = [
    "Consider optimizing process efficiency",
    "Explore renewable energy options",
    "Implement circular economy practices",
];

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && v.is_finite())
}

/// 远程时间戳可能不带时区（按 UTC 处理）；无法解析时取当前时间
fn parse_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = raw else {
        return Utc::now();
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Utc);
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => naive.and_utc(),
        Err(_) => {
            tracing::debug!(raw, "远程时间戳无法解析，使用当前时间");
            Utc::now()
        }
    }
}

/// 将远程响应映射为结果记录
pub fn map_response(input: &AssessmentInput, response: SubmitSolutionResponse) -> ResultRecord {
    let metrics = response.lca_metrics.unwrap_or_default();
    let predictions = response.model_predictions.unwrap_or_default();
    let remote_circularity = predictions
        .circularity_metrics
        .as_ref()
        .and_then(|m| non_zero(m.circularity_index));
    let evaluation = response.evaluation.unwrap_or_default();
    let using_ml_models = response.using_ml_models.unwrap_or(false);

    let carbon_footprint = non_zero(metrics.carbon_footprint)
        .unwrap_or_else(|| estimator::carbon_footprint(input));
    let energy_consumption = non_zero(metrics.energy_consumption)
        .unwrap_or_else(|| estimator::energy_consumption(input));
    let water_usage =
        non_zero(metrics.water_usage).unwrap_or_else(|| estimator::water_usage(input));
    let circularity_index = remote_circularity
        .unwrap_or_else(|| estimator::circularity_index(input))
        .min(1.0);

    ResultRecord {
        carbon_footprint,
        energy_consumption,
        water_usage,
        circularity_index,
        environmental_efficiency: non_zero(predictions.environmental_efficiency)
            .unwrap_or(DEFAULT_ENVIRONMENTAL_EFFICIENCY),
        model_confidence: if using_ml_models {
            ML_MODEL_CONFIDENCE
        } else {
            RULE_MODEL_CONFIDENCE
        },
        recommendations: response.recommendations.unwrap_or_else(|| {
            REMOTE_DEFAULT_RECOMMENDATIONS
                .iter()
                .map(|s| s.to_string())
                .collect()
        }),
        mock_data: false,
        using_ml_models,
        evaluation: Some(Evaluation {
            feedback: evaluation
                .feedback
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| DEFAULT_FEEDBACK.to_string()),
            overall_score: non_zero(evaluation.overall_score).unwrap_or(DEFAULT_OVERALL_SCORE),
            environmental_score: non_zero(evaluation.environmental_score)
                .unwrap_or(DEFAULT_ENVIRONMENTAL_SCORE),
            circularity_score: non_zero(evaluation.circularity_score)
                .unwrap_or(DEFAULT_CIRCULARITY_SCORE),
        }),
        timestamp: parse_timestamp(response.timestamp.as_deref()),
    }
}

/// 通过 HTTP 预测服务估算
#[derive(Debug, Clone)]
pub struct RemoteEstimator {
    client: LcaApiClient,
}

impl RemoteEstimator {
    pub fn new(client: LcaApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &LcaApiClient {
        &self.client
    }
}

#[async_trait]
impl Estimator for RemoteEstimator {
    fn name(&self) -> &'static str {
        "remote-model"
    }

    async fn estimate(&self, input: &AssessmentInput) -> EstimatorResult<ResultRecord> {
        self.client.check_health().await?;
        let response = self.client.submit_solution(input).await?;
        let record = map_response(input, response);
        tracing::info!(
            using_ml_models = record.using_ml_models,
            carbon = record.carbon_footprint,
            "远程估算完成"
        );
        Ok(record)
    }
}
