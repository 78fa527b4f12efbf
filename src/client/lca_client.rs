// ==========================================
// 可持续性评估 - 预测服务 HTTP 客户端
// ==========================================
// 端点:
//   GET  {base}/health
//   POST {base}/submit-solution   body: { "assessment_data": <AssessmentInput> }
// 认证: 配置了 token 时附加 `Authorization: Bearer <token>`
// 约束: 单次请求，不重试；超时由 ApiSettings 决定
// ==========================================

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::error::{ClientError, ClientResult};
use crate::config::app_config::ApiSettings;
use crate::domain::assessment::AssessmentInput;

pub const HEALTH_PATH: &str = "health";
pub const SUBMIT_PATH: &str = "submit-solution";

// ==========================================
// 请求 / 响应结构
// ==========================================

#[derive(Debug, Serialize)]
struct SubmitSolutionRequest<'a> {
    assessment_data: &'a AssessmentInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub models_loaded: Option<bool>,
    #[serde(default)]
    pub ml_ready: Option<bool>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LcaMetrics {
    pub carbon_footprint: Option<f64>,
    pub energy_consumption: Option<f64>,
    pub water_usage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CircularityMetrics {
    pub circularity_index: Option<f64>,
    pub recycling_rate: Option<f64>,
    pub waste_ratio: Option<f64>,
    pub material_efficiency: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModelPredictions {
    pub environmental_efficiency: Option<f64>,
    pub circularity_metrics: Option<CircularityMetrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteEvaluation {
    pub feedback: Option<String>,
    pub overall_score: Option<f64>,
    pub environmental_score: Option<f64>,
    pub circularity_score: Option<f64>,
    pub evaluation_method: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubmitSolutionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub using_ml_models: Option<bool>,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub lca_metrics: Option<LcaMetrics>,
    #[serde(default)]
    pub model_predictions: Option<ModelPredictions>,
    #[serde(default)]
    pub evaluation: Option<RemoteEvaluation>,
    #[serde(default)]
    pub recommendations: Option<Vec<String>>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

// ==========================================
// LcaApiClient
// ==========================================

#[derive(Debug, Clone)]
pub struct LcaApiClient {
    client: Client,
    settings: ApiSettings,
}

impl LcaApiClient {
    pub fn new(settings: ApiSettings) -> ClientResult<Self> {
        if !settings.base_url.starts_with("http://") && !settings.base_url.starts_with("https://") {
            return Err(ClientError::InvalidConfig(format!(
                "base_url 必须以 http:// 或 https:// 开头: {}",
                settings.base_url
            )));
        }

        let client = Client::builder()
            .timeout(settings.timeout())
            .build()?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.settings.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// 健康检查；`success=false` 视为失败
    pub async fn check_health(&self) -> ClientResult<HealthResponse> {
        let url = self.settings.endpoint(HEALTH_PATH);
        tracing::debug!(%url, "健康检查");

        let response = self.authorize(self.client.get(&url)).send().await?;
        let health: HealthResponse = decode(response).await?;

        if !health.success {
            return Err(ClientError::Unhealthy(
                health.message.unwrap_or_else(|| "success=false".to_string()),
            ));
        }
        Ok(health)
    }

    /// 提交评估；`success=false` 视为失败
    pub async fn submit_solution(
        &self,
        input: &AssessmentInput,
    ) -> ClientResult<SubmitSolutionResponse> {
        let url = self.settings.endpoint(SUBMIT_PATH);
        tracing::debug!(%url, "提交评估");

        let body = SubmitSolutionRequest {
            assessment_data: input,
        };
        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await?;
        let submitted: SubmitSolutionResponse = decode(response).await?;

        if !submitted.success {
            return Err(ClientError::Rejected(
                submitted
                    .error
                    .unwrap_or_else(|| "success=false".to_string()),
            ));
        }
        Ok(submitted)
    }
}

/// 非 2xx 状态或非法 JSON 均为失败
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_base_url() {
        let settings = ApiSettings {
            base_url: "localhost:5000".to_string(),
            ..ApiSettings::default()
        };
        assert!(matches!(
            LcaApiClient::new(settings),
            Err(ClientError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_request_body_wraps_input() {
        let input = AssessmentInput::demo_template();
        let body = serde_json::to_value(SubmitSolutionRequest {
            assessment_data: &input,
        })
        .unwrap();
        assert_eq!(body["assessment_data"]["metalType"], "aluminum");
        assert_eq!(body["assessment_data"]["productionScale"], 500.0);
    }

    #[test]
    fn test_response_tolerates_missing_sections() {
        let response: SubmitSolutionResponse =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(response.success);
        assert!(response.lca_metrics.is_none());
        assert!(response.recommendations.is_none());
    }

    #[test]
    fn test_response_parses_nested_predictions() {
        let raw = r#"{
            "success": true,
            "using_ml_models": true,
            "model_predictions": {
                "environmental_efficiency": 0.81,
                "circularity_metrics": {"circularity_index": 0.9, "recycling_rate": 0.9}
            },
            "lca_metrics": {"carbon_footprint": 120.5},
            "evaluation": {"overall_score": 0.85, "feedback": "good"},
            "timestamp": "2025-01-01T10:00:00.123456"
        }"#;
        let response: SubmitSolutionResponse = serde_json::from_str(raw).unwrap();
        let predictions = response.model_predictions.unwrap();
        assert_eq!(predictions.environmental_efficiency, Some(0.81));
        assert_eq!(
            predictions.circularity_metrics.unwrap().circularity_index,
            Some(0.9)
        );
        assert_eq!(response.lca_metrics.unwrap().energy_consumption, None);
    }
}
