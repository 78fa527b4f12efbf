// ==========================================
// 可持续性评估 - 评估结果
// ==========================================
// ResultRecord: 一次估算（远程或本地回退）的输出
// AssessmentResults: 写入会话缓存、供结果看板读取的完整记录
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::assessment::AssessmentInput;

/// 远程服务的综合评价（本地回退时为 None）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub feedback: String,
    pub overall_score: f64,
    pub environmental_score: f64,
    pub circularity_score: f64,
}

/// 一次估算的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// 碳足迹（t CO₂）
    pub carbon_footprint: f64,
    /// 能耗（MJ）
    pub energy_consumption: f64,
    /// 用水量（m³）
    pub water_usage: f64,
    /// 循环指数 [0,1]
    pub circularity_index: f64,
    pub environmental_efficiency: f64,
    pub model_confidence: f64,
    pub recommendations: Vec<String>,
    /// true = 本地公式回退; false = 远程服务
    pub mock_data: bool,
    #[serde(default)]
    pub using_ml_models: bool,
    #[serde(default)]
    pub evaluation: Option<Evaluation>,
    pub timestamp: DateTime<Utc>,
}

/// 结果来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultSource {
    RemoteModel,
    LocalFallback,
}

impl ResultSource {
    pub fn label(&self) -> &'static str {
        match self {
            ResultSource::RemoteModel => "ML Prediction",
            ResultSource::LocalFallback => "Fallback Estimate",
        }
    }
}

/// 提交方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionKind {
    /// 逐步填写后提交
    Form,
    /// 模板快捷提交
    Template,
}

// ==========================================
// AssessmentResults - 缓存记录
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResults {
    pub assessment_id: String,
    pub carbon_footprint: f64,
    pub energy_consumption: f64,
    pub water_usage: f64,
    pub circularity_index: f64,
    pub environmental_efficiency: f64,
    pub model_confidence: f64,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub evaluation: Option<Evaluation>,
    pub timestamp: DateTime<Utc>,
    pub input_data: AssessmentInput,
    pub using_mock_data: bool,
    #[serde(default)]
    pub template_used: bool,
}

impl AssessmentResults {
    /// 由冻结的输入与估算结果组装缓存记录
    pub fn assemble(input: AssessmentInput, record: ResultRecord, kind: SubmissionKind) -> Self {
        let prefix = match kind {
            SubmissionKind::Form => "LCA",
            SubmissionKind::Template => "LCA-TEMPLATE",
        };
        let assessment_id = format!("{}-{}", prefix, Uuid::new_v4().simple());

        Self {
            assessment_id,
            carbon_footprint: record.carbon_footprint,
            energy_consumption: record.energy_consumption,
            water_usage: record.water_usage,
            circularity_index: record.circularity_index,
            environmental_efficiency: record.environmental_efficiency,
            model_confidence: record.model_confidence,
            recommendations: record.recommendations,
            evaluation: record.evaluation,
            timestamp: Utc::now(),
            input_data: input,
            using_mock_data: record.mock_data,
            template_used: kind == SubmissionKind::Template,
        }
    }

    pub fn source(&self) -> ResultSource {
        if self.using_mock_data {
            ResultSource::LocalFallback
        } else {
            ResultSource::RemoteModel
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(mock: bool) -> ResultRecord {
        ResultRecord {
            carbon_footprint: 128.96,
            energy_consumption: 2625.75,
            water_usage: 1722.72,
            circularity_index: 1.0,
            environmental_efficiency: 0.8,
            model_confidence: 0.87,
            recommendations: vec!["a".to_string()],
            mock_data: mock,
            using_ml_models: false,
            evaluation: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_assemble_form_submission() {
        let results = AssessmentResults::assemble(
            AssessmentInput::demo_template(),
            sample_record(true),
            SubmissionKind::Form,
        );
        assert!(results.assessment_id.starts_with("LCA-"));
        assert!(!results.assessment_id.starts_with("LCA-TEMPLATE-"));
        assert!(!results.template_used);
        assert_eq!(results.source(), ResultSource::LocalFallback);
        assert_eq!(results.carbon_footprint, 128.96);
    }

    #[test]
    fn test_assemble_template_submission() {
        let results = AssessmentResults::assemble(
            AssessmentInput::demo_template(),
            sample_record(false),
            SubmissionKind::Template,
        );
        assert!(results.assessment_id.starts_with("LCA-TEMPLATE-"));
        assert!(results.template_used);
        assert_eq!(results.source(), ResultSource::RemoteModel);
        assert_eq!(results.source().label(), "ML Prediction");
    }

    #[test]
    fn test_cached_blob_layout() {
        let results = AssessmentResults::assemble(
            AssessmentInput::demo_template(),
            sample_record(true),
            SubmissionKind::Form,
        );
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["carbonFootprint"], 128.96);
        assert_eq!(json["usingMockData"], true);
        assert_eq!(json["inputData"]["metalType"], "aluminum");

        let restored: AssessmentResults = serde_json::from_value(json).unwrap();
        assert_eq!(restored.assessment_id, results.assessment_id);
        assert_eq!(restored.timestamp, results.timestamp);
        assert_eq!(restored.input_data.metal_type, results.input_data.metal_type);
    }
}
