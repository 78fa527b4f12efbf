// ==========================================
// 可持续性评估 - 预测服务客户端层
// ==========================================
// 职责: HTTP 访问远程预测服务，并实现引擎层的 Estimator trait
// ==========================================

pub mod error;
pub mod lca_client;
pub mod remote_estimator;

pub use error::{ClientError, ClientResult};
pub use lca_client::{HealthResponse, LcaApiClient, SubmitSolutionResponse};
pub use remote_estimator::{map_response, RemoteEstimator};
