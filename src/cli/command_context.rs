// コマンド共通コンテキスト
//
// .env の読み込み、データベース接続、パス解決の重複をCLI層で集約する。

use crate::adapters::database::DatabaseConnectionService;
use crate::core::config::{DatabaseConfig, Dialect};
use crate::core::env_file::Environment;
use crate::core::naming::{ENV_FILE, MIGRATIONS_DIR};
use crate::services::env_loader;
use anyhow::{anyhow, Context, Result};
use sqlx::AnyPool;
use std::path::{Path, PathBuf};

/// .env を必要とするコマンドの実行コンテキスト
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub project_path: PathBuf,
    pub env: Environment,
}

impl CommandContext {
    /// プロジェクトルートの .env を読み込んでコンテキストを作成
    ///
    /// ファイルが読めない場合はエラー。ファイルにないキーはプロセス環境から参照する。
    pub fn load(project_path: PathBuf) -> Result<Self> {
        let env_path = project_path.join(ENV_FILE);
        let env = env_loader::load(&env_path)
            .with_context(|| format!("Error loading {} file", ENV_FILE))?
            .with_process_fallback();

        Ok(Self { project_path, env })
    }

    /// 環境設定からデータベース接続設定を解決
    ///
    /// SQLiteの相対パスはプロジェクトルートからの相対として扱う。
    pub fn database_config(&self) -> Result<DatabaseConfig> {
        let mut config = DatabaseConfig::from_environment(&self.env)?;
        config.validate()?;

        if config.dialect == Dialect::SQLite && Path::new(&config.database).is_relative() {
            config.database = self
                .project_path
                .join(&config.database)
                .display()
                .to_string();
        }

        Ok(config)
    }

    /// データベースに接続
    pub async fn connect(&self) -> Result<(DatabaseConfig, AnyPool)> {
        let config = self.database_config()?;
        let pool = DatabaseConnectionService::new()
            .create_pool(&config)
            .await
            .with_context(|| "Failed to connect to the database")?;
        Ok((config, pool))
    }

    /// マイグレーションディレクトリの絶対パス
    pub fn migrations_dir(&self) -> PathBuf {
        self.project_path.join(MIGRATIONS_DIR)
    }

    /// マイグレーションディレクトリが存在することを確認して返す
    pub fn require_migrations_dir(&self) -> Result<PathBuf> {
        let path = self.migrations_dir();
        if !path.is_dir() {
            return Err(anyhow!("Migrations directory not found: {:?}", path));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_env_file() {
        let temp_dir = TempDir::new().unwrap();

        let error = CommandContext::load(temp_dir.path().to_path_buf()).unwrap_err();
        assert!(format!("{:#}", error).contains("Error loading .env file"));
    }

    #[test]
    fn test_load_and_resolve_database_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".env"),
            "DB_CONNECTION=sqlite\nDB_DATABASE=app.db\n",
        )
        .unwrap();

        let context = CommandContext::load(temp_dir.path().to_path_buf()).unwrap();
        let config = context.database_config().unwrap();

        assert_eq!(
            config.database,
            temp_dir.path().join("app.db").display().to_string()
        );
        assert_eq!(
            context.migrations_dir(),
            temp_dir.path().join("backend/migrations")
        );
        assert!(context.require_migrations_dir().is_err());
    }
}
