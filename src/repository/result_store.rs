// ==========================================
// 可持续性评估 - 结果缓存仓储
// ==========================================
// 职责: 单槽位保存最近一次评估结果（固定键，每次提交覆盖）
// 存储: session_kv 表，值为 JSON 序列化的 AssessmentResults
// 红线: 不做格式迁移/版本管理；无法解析的记录按 CorruptRecord 报告
// ==========================================

use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::result::AssessmentResults;
use crate::repository::error::{RepositoryError, RepositoryResult};

/// 缓存键
pub const RESULTS_CACHE_KEY: &str = "lcaResults";

/// 结果缓存接口（提交流程写入，结果看板读取）
pub trait ResultStore: Send + Sync {
    /// 覆盖写入
    fn save(&self, results: &AssessmentResults) -> RepositoryResult<()>;

    /// 读取；从未写入时返回 None
    fn load(&self) -> RepositoryResult<Option<AssessmentResults>>;

    fn clear(&self) -> RepositoryResult<()>;
}

// ==========================================
// InMemoryResultStore - 进程内缓存
// ==========================================

#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    slot: Mutex<Option<String>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_slot(&self) -> RepositoryResult<MutexGuard<'_, Option<String>>> {
        self.slot
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl ResultStore for InMemoryResultStore {
    fn save(&self, results: &AssessmentResults) -> RepositoryResult<()> {
        let blob = serde_json::to_string(results)?;
        *self.get_slot()? = Some(blob);
        Ok(())
    }

    fn load(&self) -> RepositoryResult<Option<AssessmentResults>> {
        let slot = self.get_slot()?;
        slot.as_deref().map(decode_blob).transpose()
    }

    fn clear(&self) -> RepositoryResult<()> {
        *self.get_slot()? = None;
        Ok(())
    }
}

// ==========================================
// SqliteResultStore - session_kv 表
// ==========================================

pub struct SqliteResultStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteResultStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        let repo = Self { conn };
        // best-effort: 建表失败不阻断启动，使用时再暴露错误
        if let Err(e) = repo.ensure_table() {
            tracing::warn!("session_kv ensure failed: {}", e);
        }
        repo
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS session_kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    /// 写入原始值（不做序列化校验）
    pub fn put_raw(&self, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO session_kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![RESULTS_CACHE_KEY, value],
        )?;
        Ok(())
    }
}

impl ResultStore for SqliteResultStore {
    fn save(&self, results: &AssessmentResults) -> RepositoryResult<()> {
        let blob = serde_json::to_string(results)?;
        self.put_raw(&blob)?;
        tracing::debug!(assessment_id = %results.assessment_id, "评估结果已缓存");
        Ok(())
    }

    fn load(&self) -> RepositoryResult<Option<AssessmentResults>> {
        let conn = self.get_conn()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM session_kv WHERE key = ?1",
                params![RESULTS_CACHE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        raw.as_deref().map(decode_blob).transpose()
    }

    fn clear(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "DELETE FROM session_kv WHERE key = ?1",
            params![RESULTS_CACHE_KEY],
        )?;
        Ok(())
    }
}

fn decode_blob(raw: &str) -> RepositoryResult<AssessmentResults> {
    serde_json::from_str(raw).map_err(|e| RepositoryError::CorruptRecord {
        key: RESULTS_CACHE_KEY.to_string(),
        message: e.to_string(),
    })
}
