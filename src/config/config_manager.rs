// ==========================================
// 可持续性评估 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 红线: 配置值格式错误不中断流程，告警后回退默认值
// ==========================================

use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::app_config::{
    AppConfig, ApiSettings, DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS,
};
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&conn_guard)?;
            ensure_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(config_key = key, "配置已更新");
        Ok(())
    }

    /// 删除 global scope 的配置值
    pub fn remove_global_config_value(&self, key: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
        )?;
        Ok(affected > 0)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有 global 配置的快照（键有序）
    pub fn get_config_snapshot(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    // ===== 预测服务配置 =====

    pub fn get_api_base_url(&self) -> RepositoryResult<String> {
        let value = self.get_config_or_default(config_keys::API_BASE_URL, DEFAULT_API_BASE_URL)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            tracing::warn!(config_key = config_keys::API_BASE_URL, "配置为空，使用默认值");
            return Ok(DEFAULT_API_BASE_URL.to_string());
        }
        Ok(trimmed.to_string())
    }

    pub fn get_api_timeout_secs(&self) -> RepositoryResult<u64> {
        let default = DEFAULT_API_TIMEOUT_SECS.to_string();
        let value = self.get_config_or_default(config_keys::API_TIMEOUT_SECS, &default)?;
        match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(secs),
            _ => {
                tracing::warn!(
                    config_key = config_keys::API_TIMEOUT_SECS,
                    raw_value = %value,
                    "超时配置格式错误，使用默认值"
                );
                Ok(DEFAULT_API_TIMEOUT_SECS)
            }
        }
    }

    pub fn get_api_auth_token(&self) -> RepositoryResult<Option<String>> {
        Ok(self
            .get_global_config_value(config_keys::API_AUTH_TOKEN)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    pub fn is_remote_enabled(&self) -> RepositoryResult<bool> {
        let value = self.get_config_or_default(config_keys::REMOTE_ENABLED, "true")?;
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => {
                tracing::warn!(
                    config_key = config_keys::REMOTE_ENABLED,
                    raw_value = %value,
                    "开关配置格式错误，使用默认值 true"
                );
                Ok(true)
            }
        }
    }

    pub fn get_ui_locale(&self) -> RepositoryResult<String> {
        let value = self.get_config_or_default(config_keys::UI_LOCALE, crate::i18n::DEFAULT_LOCALE)?;
        if crate::i18n::SUPPORTED_LOCALES.contains(&value.trim()) {
            Ok(value.trim().to_string())
        } else {
            tracing::warn!(config_key = config_keys::UI_LOCALE, raw_value = %value, "不支持的语言配置");
            Ok(crate::i18n::DEFAULT_LOCALE.to_string())
        }
    }

    /// 汇总为运行配置（不含环境变量覆写）
    pub fn load_app_config(&self) -> RepositoryResult<AppConfig> {
        Ok(AppConfig {
            api: ApiSettings {
                base_url: self.get_api_base_url()?,
                timeout_secs: self.get_api_timeout_secs()?,
                auth_token: self.get_api_auth_token()?,
            },
            remote_enabled: self.is_remote_enabled()?,
            locale: self.get_ui_locale()?,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 预测服务
    pub const API_BASE_URL: &str = "api.base_url";
    pub const API_TIMEOUT_SECS: &str = "api.timeout_secs";
    pub const API_AUTH_TOKEN: &str = "api.auth_token";

    // 估算策略
    pub const REMOTE_ENABLED: &str = "estimator.remote_enabled";

    // 界面
    pub const UI_LOCALE: &str = "ui.locale";

    /// 全部已知键（`config` 子命令校验用）
    pub const ALL: [&str; 5] = [
        API_BASE_URL,
        API_TIMEOUT_SECS,
        API_AUTH_TOKEN,
        REMOTE_ENABLED,
        UI_LOCALE,
    ];
}
