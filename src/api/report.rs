// ==========================================
// 可持续性评估 - 报告导出
// ==========================================
// 格式:
//   json - 完整缓存记录（pretty）
//   csv  - section,key,value,unit 四列；每个指标一行，每条建议一行
// 默认文件名: lca-assessment-report-YYYY-MM-DD.{ext}
// ==========================================

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::dashboard_api::{annotate_recommendations, metric_cards};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::result::AssessmentResults;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("不支持的导出格式: {} (可选: json, csv)", other)),
        }
    }
}

pub fn default_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "lca-assessment-report-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

pub fn to_json(results: &AssessmentResults) -> ApiResult<String> {
    serde_json::to_string_pretty(results).map_err(|e| ApiError::ExportError(e.to_string()))
}

pub fn to_csv(results: &AssessmentResults) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let map_err = |e: csv::Error| ApiError::ExportError(e.to_string());

    writer
        .write_record(["section", "key", "value", "unit"])
        .map_err(map_err)?;

    let meta = [
        ("assessmentId", results.assessment_id.clone()),
        ("timestamp", results.timestamp.to_rfc3339()),
        ("source", results.source().label().to_string()),
        ("templateUsed", results.template_used.to_string()),
        ("modelConfidence", results.model_confidence.to_string()),
        (
            "environmentalEfficiency",
            results.environmental_efficiency.to_string(),
        ),
    ];
    for (key, value) in &meta {
        writer
            .write_record(["meta", *key, value.as_str(), ""])
            .map_err(map_err)?;
    }

    for card in metric_cards(results) {
        let value = card.value.to_string();
        writer
            .write_record(["metric", card.key, value.as_str(), card.unit])
            .map_err(map_err)?;
    }

    for (index, rec) in annotate_recommendations(&results.recommendations)
        .iter()
        .enumerate()
    {
        let position = (index + 1).to_string();
        writer
            .write_record([
                "recommendation",
                position.as_str(),
                rec.recommendation.as_str(),
                rec.category,
            ])
            .map_err(map_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::ExportError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ApiError::ExportError(e.to_string()))
}

pub fn render(results: &AssessmentResults, format: ExportFormat) -> ApiResult<String> {
    match format {
        ExportFormat::Json => to_json(results),
        ExportFormat::Csv => to_csv(results),
    }
}

/// 写出报告文件
///
/// # 参数
/// - output: 目标路径；为目录时使用默认文件名
///
/// # 返回
/// 实际写入的文件路径
pub fn write_report(
    results: &AssessmentResults,
    format: ExportFormat,
    output: &Path,
) -> ApiResult<PathBuf> {
    let path = if output.is_dir() {
        output.join(default_file_name(format, results.timestamp.date_naive()))
    } else {
        output.to_path_buf()
    };

    let content = render(results, format)?;
    std::fs::write(&path, content)
        .map_err(|e| ApiError::ExportError(format!("{}: {}", path.display(), e)))?;

    tracing::info!(path = %path.display(), %format, "报告已导出");
    Ok(path)
}
