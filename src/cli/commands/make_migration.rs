// make:migrateコマンドハンドラー
//
// backend/migrations/<YYYYMMDDHHMMSS>_create_<table>_table.sql を生成します。
// テーブル名はGORMがモデルに対応付ける複数形の名前、カラム型は .env の
// DB_CONNECTION に合わせます（.env が無ければMySQL）。

use crate::cli::commands::Outcome;
use crate::core::config::Dialect;
use crate::core::naming::{ENV_FILE, MIGRATIONS_DIR};
use crate::core::naming_case::to_table_name;
use crate::core::templates;
use crate::services::env_loader;
use crate::services::file_writer::write_new_file;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use std::path::{Path, PathBuf};
use tracing::debug;

/// ファイル名のタイムスタンプ形式
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// make:migrateコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct MakeMigrationCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// モデル（テーブル）名
    pub name: Option<String>,
}

impl MakeMigrationCommand {
    pub fn from_args(project_path: PathBuf, args: &[String]) -> Self {
        Self {
            project_path,
            name: args.first().cloned(),
        }
    }
}

/// make:migrateコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct MakeMigrationCommandHandler;

impl MakeMigrationCommandHandler {
    pub fn new() -> Self {
        Self
    }

    /// make:migrateコマンドを実行（ローカル時刻でバージョンを付ける）
    pub fn execute(&self, command: &MakeMigrationCommand) -> Result<Outcome> {
        self.execute_at(command, Local::now())
    }

    /// 指定時刻でバージョンを付けて実行
    pub fn execute_at<Tz>(&self, command: &MakeMigrationCommand, now: DateTime<Tz>) -> Result<Outcome>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let Some(name) = command.name.as_deref().filter(|name| !name.is_empty()) else {
            return Ok(Outcome::Reported(
                "Please provide a migration name.".to_string(),
            ));
        };

        let dialect = match resolve_dialect(&command.project_path) {
            Ok(dialect) => dialect,
            Err(e) => {
                return Ok(Outcome::Reported(format!(
                    "Failed to create migration file: {:#}",
                    e
                )))
            }
        };

        let table = to_table_name(name);
        let file_name = format!(
            "{}_create_{}_table.sql",
            now.format(TIMESTAMP_FORMAT),
            table
        );
        let path = command.project_path.join(MIGRATIONS_DIR).join(file_name);

        match write_new_file(&path, &templates::migration(&table, dialect)) {
            Ok(()) => Ok(Outcome::Completed(format!(
                "Migration file created: {}",
                path.display()
            ))),
            Err(e) => Ok(Outcome::Reported(format!(
                "Failed to create migration file: {}",
                e
            ))),
        }
    }
}

/// プロジェクトの .env から方言を解決
fn resolve_dialect(project_path: &Path) -> Result<Dialect> {
    let env_path = project_path.join(ENV_FILE);
    if !env_path.is_file() {
        debug!(path = ?env_path, "No .env file, generating MySQL migration");
        return Ok(Dialect::MySQL);
    }

    let env = env_loader::load(&env_path)
        .with_context(|| format!("Error loading {} file", ENV_FILE))?;
    Dialect::from_environment(&env)
}
