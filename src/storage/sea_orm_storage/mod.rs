//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 同一个结构体实现 GradeStore 与三个 Provider 契约。

mod grade_records;
mod students;
mod subjects;
mod tests;

use crate::config::AppConfig;
use crate::errors::{GradeSystemError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

// 连接类失败归为瞬态的存储不可用，其余归为数据库操作错误
pub(crate) fn map_db_err(context: &str, err: sea_orm::DbErr) -> GradeSystemError {
    match &err {
        sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_) => {
            GradeSystemError::storage_unavailable(format!("{context}: {err}"))
        }
        _ => GradeSystemError::database_operation(format!("{context}: {err}")),
    }
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect_with(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 按显式参数创建存储实例
    ///
    /// 测试用 `sqlite::memory:` 时应将 pool_size 设为 1，
    /// 内存库的生命周期跟随唯一连接。
    pub async fn connect_with(url: &str, pool_size: u32, timeout_secs: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout_secs).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout_secs).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 底层连接，供嵌入方复用连接池或测试播种数据
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| GradeSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| GradeSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(timeout_secs))
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| GradeSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(GradeSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// GradeStore 与 Provider 契约实现
use crate::models::{
    grades::{
        entities::{GradeOrder, GradeRecord},
        requests::{GradeListQuery, NewGradeRecord},
        responses::GradeListResponse,
    },
    students::entities::Student,
    subjects::entities::Subject,
    tests::entities::TestSnapshot,
};
use crate::providers::{StudentProvider, SubjectProvider, TestProvider};
use crate::storage::GradeStore;
use async_trait::async_trait;

#[async_trait]
impl GradeStore for SeaOrmStorage {
    // 成绩写路径
    async fn upsert_grade(&self, record: NewGradeRecord) -> Result<GradeRecord> {
        self.upsert_grade_impl(record).await
    }

    async fn deactivate_grade(&self, test_id: i64, student_id: i64) -> Result<bool> {
        self.deactivate_grade_impl(test_id, student_id).await
    }

    // 成绩读路径
    async fn get_grade(&self, test_id: i64, student_id: i64) -> Result<Option<GradeRecord>> {
        self.get_grade_impl(test_id, student_id).await
    }

    async fn find_by_test(&self, test_id: i64, order: GradeOrder) -> Result<Vec<GradeRecord>> {
        self.find_by_test_impl(test_id, order).await
    }

    async fn find_by_student(
        &self,
        student_id: i64,
        order: GradeOrder,
    ) -> Result<Vec<GradeRecord>> {
        self.find_by_student_impl(student_id, order).await
    }

    async fn list_grades(&self, query: GradeListQuery) -> Result<GradeListResponse> {
        self.list_grades_impl(query).await
    }

    async fn count_active_for_test(&self, test_id: i64) -> Result<i64> {
        self.count_active_for_test_impl(test_id).await
    }

    async fn has_active_records_for_test(&self, test_id: i64) -> Result<bool> {
        self.has_active_records_for_test_impl(test_id).await
    }
}

#[async_trait]
impl TestProvider for SeaOrmStorage {
    async fn get_active_test(&self, test_id: i64) -> Result<Option<TestSnapshot>> {
        self.get_active_test_impl(test_id).await
    }

    async fn get_test_snapshot(&self, test_id: i64) -> Result<Option<TestSnapshot>> {
        self.get_test_snapshot_impl(test_id).await
    }

    async fn record_marks_update(&self, test_id: i64, result_count: i64) -> Result<()> {
        self.record_marks_update_impl(test_id, result_count).await
    }
}

#[async_trait]
impl StudentProvider for SeaOrmStorage {
    async fn get_active_student(&self, student_id: i64) -> Result<Option<Student>> {
        self.get_active_student_impl(student_id).await
    }
}

#[async_trait]
impl SubjectProvider for SeaOrmStorage {
    async fn resolve_subject(&self, subject_id: i64) -> Result<Option<Subject>> {
        self.resolve_subject_impl(subject_id).await
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("sqlite://grades.db").unwrap(),
            "sqlite://grades.db"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("grades.db").unwrap(),
            "sqlite://grades.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@host/db").unwrap(),
            "postgres://u:p@host/db"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }
}
