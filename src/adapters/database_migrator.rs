// データベースマイグレーターサービス
//
// マイグレーション履歴テーブルの管理とトランザクション制御を担当するサービス。
// 1つのマイグレーションの適用（または取り消し）と履歴の更新は同じトランザクションで行う。

use crate::core::config::Dialect;
use crate::core::error::{DatabaseError, MigrationError};
use crate::core::migration::{split_sql_statements, AppliedMigration, Migration, MigrationRecord};
use crate::core::naming::MIGRATION_TABLE;
use chrono::{DateTime, Utc};
use sqlx::{AnyPool, Row};
use tracing::{debug, warn};

/// データベースマイグレーターサービス
#[derive(Debug, Clone, Default)]
pub struct DatabaseMigratorService;

impl DatabaseMigratorService {
    /// 新しいDatabaseMigratorServiceを作成
    pub fn new() -> Self {
        Self
    }

    /// マイグレーション履歴テーブル作成SQLを生成
    ///
    /// applied_at はどの方言でもRFC3339文字列で保存する。
    pub fn generate_create_migration_table_sql(&self, dialect: Dialect) -> String {
        let text_key = match dialect {
            Dialect::SQLite => "TEXT",
            Dialect::PostgreSQL | Dialect::MySQL => "VARCHAR(255)",
        };
        format!(
            r#"CREATE TABLE IF NOT EXISTS {MIGRATION_TABLE} (
    version {text_key} PRIMARY KEY,
    description TEXT NOT NULL,
    applied_at VARCHAR(64) NOT NULL,
    checksum VARCHAR(64) NOT NULL
)"#
        )
    }

    /// マイグレーション履歴テーブルを作成（存在すれば何もしない）
    pub async fn create_migration_table(
        &self,
        pool: &AnyPool,
        dialect: Dialect,
    ) -> Result<(), DatabaseError> {
        let sql = self.generate_create_migration_table_sql(dialect);

        sqlx::query(&sql)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::Query {
                message: format!("failed to create migration history table: {}", e),
                sql: Some(sql),
            })?;

        Ok(())
    }

    /// マイグレーション記録のINSERTクエリを生成
    ///
    /// # Returns
    ///
    /// (SQL, バインドするパラメータ) のタプル
    pub fn generate_record_migration_query(
        &self,
        migration: &Migration,
        applied_at: DateTime<Utc>,
        dialect: Dialect,
    ) -> (String, Vec<String>) {
        let sql = format!(
            "INSERT INTO {} (version, description, applied_at, checksum) VALUES ({}, {}, {}, {})",
            MIGRATION_TABLE,
            dialect.placeholder(1),
            dialect.placeholder(2),
            dialect.placeholder(3),
            dialect.placeholder(4)
        );
        let params = vec![
            migration.version.clone(),
            migration.description.clone(),
            applied_at.to_rfc3339(),
            migration.checksum.clone(),
        ];
        (sql, params)
    }

    /// マイグレーション記録のDELETEクエリを生成
    pub fn generate_remove_migration_query(
        &self,
        version: &str,
        dialect: Dialect,
    ) -> (String, Vec<String>) {
        let sql = format!(
            "DELETE FROM {} WHERE version = {}",
            MIGRATION_TABLE,
            dialect.placeholder(1)
        );
        (sql, vec![version.to_string()])
    }

    /// マイグレーション履歴取得のSELECT SQLを生成
    pub fn generate_get_migrations_sql(&self) -> String {
        format!(
            "SELECT version, description, applied_at, checksum FROM {} ORDER BY version",
            MIGRATION_TABLE
        )
    }

    /// データベースからすべてのマイグレーション記録をバージョン順に取得
    pub async fn get_migrations(
        &self,
        pool: &AnyPool,
    ) -> Result<Vec<MigrationRecord>, DatabaseError> {
        let sql = self.generate_get_migrations_sql();

        let rows = sqlx::query(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| DatabaseError::Query {
                message: format!("failed to read migration history: {}", e),
                sql: Some(sql.clone()),
            })?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let read = |index: usize| -> Result<String, DatabaseError> {
                row.try_get::<String, _>(index)
                    .map_err(|e| DatabaseError::Query {
                        message: format!("unexpected migration history row: {}", e),
                        sql: Some(sql.clone()),
                    })
            };

            let version = read(0)?;
            let applied_at_str = read(2)?;
            let applied_at = match DateTime::parse_from_rfc3339(&applied_at_str) {
                Ok(dt) => dt.with_timezone(&Utc),
                Err(_) => {
                    warn!(version = %version, value = %applied_at_str, "Unparseable applied_at in migration history");
                    DateTime::<Utc>::UNIX_EPOCH
                }
            };

            records.push(MigrationRecord {
                version,
                description: read(1)?,
                applied_at,
                checksum: read(3)?,
            });
        }

        Ok(records)
    }

    /// マイグレーションを1件適用する
    ///
    /// Up SQLの実行と履歴の記録を1トランザクションで行う。途中で失敗した場合は
    /// トランザクションを破棄し、履歴は変更されない。
    pub async fn apply(
        &self,
        pool: &AnyPool,
        dialect: Dialect,
        migration: &Migration,
    ) -> Result<AppliedMigration, DatabaseError> {
        let started_at = Utc::now();
        let mut tx = pool.begin().await.map_err(|e| DatabaseError::Transaction {
            message: format!("failed to start transaction: {}", e),
        })?;

        for statement in split_sql_statements(&migration.up_sql) {
            debug!(version = %migration.version, sql = %statement, "Executing migration statement");
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::Migration {
                    error: MigrationError::with_sql(
                        migration.version.clone(),
                        e.to_string(),
                        statement.clone(),
                    ),
                })?;
        }

        let finished_at = Utc::now();
        let (record_sql, params) =
            self.generate_record_migration_query(migration, finished_at, dialect);
        let mut query = sqlx::query(&record_sql);
        for param in &params {
            query = query.bind(param);
        }
        query
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::Query {
                message: format!("failed to record migration history: {}", e),
                sql: Some(record_sql.clone()),
            })?;

        tx.commit().await.map_err(|e| DatabaseError::Transaction {
            message: format!("failed to commit transaction: {}", e),
        })?;

        Ok(AppliedMigration::new(
            migration.version.clone(),
            migration.description.clone(),
            finished_at - started_at,
        ))
    }

    /// マイグレーションを1件取り消す
    ///
    /// Down SQLの実行と履歴の削除を1トランザクションで行う。
    pub async fn revert(
        &self,
        pool: &AnyPool,
        dialect: Dialect,
        migration: &Migration,
    ) -> Result<AppliedMigration, DatabaseError> {
        let started_at = Utc::now();
        let mut tx = pool.begin().await.map_err(|e| DatabaseError::Transaction {
            message: format!("failed to start transaction: {}", e),
        })?;

        for statement in split_sql_statements(&migration.down_sql) {
            debug!(version = %migration.version, sql = %statement, "Executing rollback statement");
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::Migration {
                    error: MigrationError::with_sql(
                        migration.version.clone(),
                        e.to_string(),
                        statement.clone(),
                    ),
                })?;
        }

        let (remove_sql, params) = self.generate_remove_migration_query(&migration.version, dialect);
        let mut query = sqlx::query(&remove_sql);
        for param in &params {
            query = query.bind(param);
        }
        query
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::Query {
                message: format!("failed to remove migration history: {}", e),
                sql: Some(remove_sql.clone()),
            })?;

        tx.commit().await.map_err(|e| DatabaseError::Transaction {
            message: format!("failed to commit transaction: {}", e),
        })?;

        Ok(AppliedMigration::new(
            migration.version.clone(),
            migration.description.clone(),
            Utc::now() - started_at,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::any::AnyPoolOptions;
    use std::path::PathBuf;

    fn migration(version: &str, up_sql: &str, down_sql: &str) -> Migration {
        Migration {
            version: version.to_string(),
            description: "create_posts_table".to_string(),
            up_sql: up_sql.to_string(),
            down_sql: down_sql.to_string(),
            checksum: "abc123".to_string(),
            path: PathBuf::from(format!("{}_create_posts_table.sql", version)),
        }
    }

    async fn memory_pool() -> AnyPool {
        sqlx::any::install_default_drivers();
        // インメモリDBは接続ごとに別物になるため1接続に固定する
        AnyPoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    async fn table_exists(pool: &AnyPool, name: &str) -> bool {
        sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await
            .unwrap()
            .is_some()
    }

    #[test]
    fn test_generate_create_migration_table_sql() {
        let service = DatabaseMigratorService::new();
        for dialect in [Dialect::PostgreSQL, Dialect::MySQL, Dialect::SQLite] {
            let sql = service.generate_create_migration_table_sql(dialect);
            assert!(sql.contains("CREATE TABLE IF NOT EXISTS schema_migrations"));
            assert!(sql.contains("checksum"));
        }
    }

    #[test]
    fn test_generate_record_migration_query_placeholders() {
        let service = DatabaseMigratorService::new();
        let migration = migration("20260101120000", "", "");
        let applied_at = Utc::now();

        let (sql, params) =
            service.generate_record_migration_query(&migration, applied_at, Dialect::PostgreSQL);
        assert!(sql.contains("VALUES ($1, $2, $3, $4)"));
        assert_eq!(params[0], "20260101120000");
        assert_eq!(params[2], applied_at.to_rfc3339());

        let (sql, _) =
            service.generate_record_migration_query(&migration, applied_at, Dialect::MySQL);
        assert!(sql.contains("VALUES (?, ?, ?, ?)"));
    }

    #[test]
    fn test_generate_remove_migration_query() {
        let service = DatabaseMigratorService::new();
        let (sql, params) = service.generate_remove_migration_query("20260101120000", Dialect::SQLite);
        assert_eq!(sql, "DELETE FROM schema_migrations WHERE version = ?");
        assert_eq!(params, vec!["20260101120000".to_string()]);
    }

    #[tokio::test]
    async fn test_apply_and_revert() {
        let pool = memory_pool().await;
        let service = DatabaseMigratorService::new();
        service
            .create_migration_table(&pool, Dialect::SQLite)
            .await
            .unwrap();

        let migration = migration(
            "20260101120000",
            "CREATE TABLE posts (id INTEGER PRIMARY KEY);",
            "DROP TABLE posts;",
        );

        let applied = service.apply(&pool, Dialect::SQLite, &migration).await.unwrap();
        assert_eq!(applied.version, "20260101120000");
        assert!(table_exists(&pool, "posts").await);

        let records = service.get_migrations(&pool).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].checksum, "abc123");

        service.revert(&pool, Dialect::SQLite, &migration).await.unwrap();
        assert!(!table_exists(&pool, "posts").await);
        assert!(service.get_migrations(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_apply_leaves_no_history() {
        let pool = memory_pool().await;
        let service = DatabaseMigratorService::new();
        service
            .create_migration_table(&pool, Dialect::SQLite)
            .await
            .unwrap();

        let migration = migration(
            "20260101120000",
            "CREATE TABLE posts (id INTEGER PRIMARY KEY); INSERT INTO missing_table VALUES (1);",
            "",
        );

        let error = service
            .apply(&pool, Dialect::SQLite, &migration)
            .await
            .unwrap_err();
        assert!(error.is_migration());
        assert!(!table_exists(&pool, "posts").await);
        assert!(service.get_migrations(&pool).await.unwrap().is_empty());
    }
}
