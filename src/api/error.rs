// ==========================================
// 可持续性评估 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误为用户友好的错误消息
// 红线: 远程预测失败不属于 API 错误（由估算策略静默回退）
// ==========================================

use crate::domain::step::AssessmentStep;
use crate::engine::step_validator::FieldErrors;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 录入流程错误
    // ==========================================
    /// 某一步骤必填项缺失（字段级消息）
    #[error("步骤 {step} 校验失败: {errors}")]
    Validation {
        step: AssessmentStep,
        errors: FieldErrors,
    },

    /// 未到最后一步就提交
    #[error("尚未到达最后一步: 当前 {current}")]
    NotAtFinalStep { current: AssessmentStep },

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 估算之后的流程失败（缓存写入等）；表单保持原状，可重试
    #[error("{0}")]
    SubmissionFailed(String),

    // ==========================================
    // 配置与数据访问错误
    // ==========================================
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 导出错误
    // ==========================================
    #[error("报告导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, key } => {
                ApiError::NotFound(format!("{}(key={})不存在", entity, key))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::DatabaseError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::CorruptRecord { key, message } => {
                ApiError::InvalidInput(format!("缓存记录 {} 无法解析: {}", key, message))
            }
            RepositoryError::SerializationError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "AssessmentResults".to_string(),
            key: "lcaResults".to_string(),
        };
        match ApiError::from(repo_err) {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("AssessmentResults"));
                assert!(msg.contains("lcaResults"));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }

        let repo_err = RepositoryError::LockError("poisoned".to_string());
        assert!(matches!(
            ApiError::from(repo_err),
            ApiError::DatabaseConnectionError(_)
        ));
    }

    #[test]
    fn test_validation_error_display_names_step() {
        let mut errors = FieldErrors::new();
        errors.insert("metalType", "required".to_string());
        let err = ApiError::Validation {
            step: AssessmentStep::MetalType,
            errors,
        };
        let text = err.to_string();
        assert!(text.contains("1/9"));
        assert!(text.contains("metalType: required"));
    }
}
