// ==========================================
// 可持续性评估 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 装配顺序: 连接 → 配置 → 客户端/估算策略 → 仓储 → API
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{AssessmentApi, DashboardApi};
use crate::api::error::ApiResult;
use crate::client::{LcaApiClient, RemoteEstimator};
use crate::config::app_config::{AppConfig, ENV_DB_PATH};
use crate::config::config_manager::ConfigManager;
use crate::db::open_and_prepare;
use crate::domain::assessment::AssessmentInput;
use crate::engine::estimator::{EstimationStrategy, Estimator};
use crate::engine::pathway::{compare_pathways, PathwayComparison};
use crate::repository::result_store::{ResultStore, SqliteResultStore};

/// 命令行等外部覆写（优先级最高）
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub api_url: Option<String>,
    /// 只使用本地公式
    pub offline: bool,
    pub locale: Option<String>,
}

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 解析后的运行配置
    pub config: AppConfig,

    pub config_manager: Arc<ConfigManager>,

    /// 结果缓存（提交写入，看板读取）
    pub result_store: Arc<dyn ResultStore>,

    /// 远程客户端（离线或配置无效时为 None）
    pub lca_client: Option<LcaApiClient>,

    pub strategy: EstimationStrategy,

    /// 录入与提交API
    pub assessment_api: Arc<AssessmentApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::with_options(db_path, AppOptions::default())
    }

    /// 创建AppState并应用外部覆写
    ///
    /// # 返回
    /// - Ok(AppState): 初始化成功
    /// - Err(String): 初始化错误
    pub fn with_options(db_path: String, options: AppOptions) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = open_and_prepare(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let mut config = config_manager
            .load_app_config()
            .map_err(|e| format!("无法读取配置: {}", e))?
            .with_process_env();
        if let Some(url) = options.api_url {
            config.api.base_url = url;
        }
        if options.offline {
            config.remote_enabled = false;
        }
        if let Some(locale) = options.locale {
            config.locale = locale;
        }

        // ==========================================
        // 估算策略
        // ==========================================
        let lca_client = if config.remote_enabled {
            match LcaApiClient::new(config.api.clone()) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!(error = %e, "预测服务客户端初始化失败，仅使用本地公式");
                    None
                }
            }
        } else {
            tracing::info!("远程估算已关闭，仅使用本地公式");
            None
        };

        let remote: Option<Arc<dyn Estimator>> = lca_client
            .clone()
            .map(|client| Arc::new(RemoteEstimator::new(client)) as Arc<dyn Estimator>);
        let strategy = EstimationStrategy::new(remote);

        // ==========================================
        // 仓储与API
        // ==========================================
        let result_store: Arc<dyn ResultStore> = Arc::new(SqliteResultStore::new(conn));
        let assessment_api = Arc::new(AssessmentApi::new(strategy.clone(), result_store.clone()));

        tracing::info!(
            base_url = %config.api.base_url,
            remote_enabled = strategy.has_remote(),
            locale = %config.locale,
            "AppState初始化完成"
        );

        Ok(Self {
            db_path,
            config,
            config_manager,
            result_store,
            lca_client,
            strategy,
            assessment_api,
        })
    }

    /// 挂载结果看板（每次调用读取一次缓存）
    pub fn dashboard_api(&self) -> ApiResult<DashboardApi> {
        DashboardApi::load(self.result_store.as_ref())
    }

    /// 传统 / 循环路径对比
    pub async fn compare_pathways(&self, input: &AssessmentInput) -> PathwayComparison {
        compare_pathways(&self.strategy, input).await
    }

    /// 应用配置中的界面语言（全局状态，由入口调用）
    pub fn apply_locale(&self) -> bool {
        crate::i18n::set_locale(&self.config.locale)
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

/// 默认数据库路径
///
/// `ECO_LCA_DB_PATH` 优先，其次为用户数据目录，最后回退到当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(ENV_DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./eco_lca_pro.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("eco-lca-pro");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("eco_lca_pro.db");
        }
    }

    path.to_string_lossy().to_string()
}
