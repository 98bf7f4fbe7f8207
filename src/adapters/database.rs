// データベース接続アダプター
//
// SQLxのAnyドライバーで PostgreSQL、MySQL、SQLite への接続プールを作成します。

use crate::adapters::connection_string::build_connection_string;
use crate::core::config::DatabaseConfig;
use crate::core::error::DatabaseError;
use sqlx::pool::PoolOptions;
use sqlx::{Any, AnyPool};
use std::time::Duration;
use tracing::debug;

/// 接続取得の既定タイムアウト（秒）
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// 接続プールの作成
#[derive(Debug, Clone, Default)]
pub struct DatabaseConnectionService;

impl DatabaseConnectionService {
    pub fn new() -> Self {
        Self
    }

    /// データベース接続プールを作成
    ///
    /// # Arguments
    ///
    /// * `config` - データベース設定
    ///
    /// # Returns
    ///
    /// 接続プールまたはエラー
    pub async fn create_pool(&self, config: &DatabaseConfig) -> Result<AnyPool, DatabaseError> {
        let connection_string = build_connection_string(config);
        debug!(dialect = %config.dialect, host = %config.host, "Connecting to database");

        self.create_pool_options(config.timeout)
            .connect(&connection_string)
            .await
            .map_err(|e| DatabaseError::Connection {
                message: format!("failed to open {} connection pool", config.dialect),
                cause: e.to_string(),
            })
    }

    /// プールオプションを作成
    ///
    /// # Arguments
    ///
    /// * `timeout_secs` - 接続取得のタイムアウト秒数（Noneなら既定値）
    pub fn create_pool_options(&self, timeout_secs: Option<u64>) -> PoolOptions<Any> {
        let timeout = timeout_secs.unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECS);
        PoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(timeout))
    }
}
