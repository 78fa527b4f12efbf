// ==========================================
// 可持续性评估 - 运行配置
// ==========================================
// 职责: 解析完成后的不可变配置（config_kv + 环境变量覆写）
// 优先级: 命令行 > 环境变量 > config_kv > 内置默认值
// ==========================================

use serde::Serialize;
use std::time::Duration;

/// 预测服务默认地址
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// 预测服务默认超时（秒）
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

// 环境变量
pub const ENV_API_BASE_URL: &str = "ECO_LCA_API_BASE_URL";
pub const ENV_AUTH_TOKEN: &str = "ECO_LCA_AUTH_TOKEN";
pub const ENV_DB_PATH: &str = "ECO_LCA_DB_PATH";

/// 预测服务连接参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Bearer token；不参与序列化输出
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            auth_token: None,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 拼接端点地址（容忍 base_url 末尾的 `/`）
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    pub api: ApiSettings,
    /// false 时只使用本地公式
    pub remote_enabled: bool,
    pub locale: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            remote_enabled: true,
            locale: crate::i18n::DEFAULT_LOCALE.to_string(),
        }
    }
}

impl AppConfig {
    /// 应用环境变量覆写
    ///
    /// # 参数
    /// - lookup: 环境变量读取函数（测试中可注入）
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(base_url = %url, "预测服务地址由环境变量覆写");
            self.api.base_url = url.trim().to_string();
        }
        if let Some(token) = lookup(ENV_AUTH_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.api.auth_token = Some(token.trim().to_string());
        }
        self
    }

    pub fn with_process_env(self) -> Self {
        self.with_env_overrides(|key| std::env::var(key).ok())
    }
}
