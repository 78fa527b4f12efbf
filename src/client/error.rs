// ==========================================
// 可持续性评估 - 预测服务客户端错误
// ==========================================

use thiserror::Error;

use crate::engine::estimator::EstimatorError;

#[derive(Error, Debug)]
pub enum ClientError {
    /// 连接失败、超时等传输层错误
    #[error("请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("预测服务返回非成功状态 {status}: {body}")]
    Status { status: u16, body: String },

    #[error("响应解析失败: {0}")]
    Decode(String),

    /// 健康检查返回 success=false
    #[error("预测服务未就绪: {0}")]
    Unhealthy(String),

    /// 提交返回 success=false
    #[error("预测服务拒绝处理: {0}")]
    Rejected(String),

    #[error("客户端配置错误: {0}")]
    InvalidConfig(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for EstimatorError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Rejected(msg) => EstimatorError::Rejected(msg),
            other => EstimatorError::Unavailable(other.to_string()),
        }
    }
}
