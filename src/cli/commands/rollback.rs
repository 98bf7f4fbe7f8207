// migrate:rollbackコマンドハンドラー
//
// マイグレーションのロールバック機能を実装します。
// - 最新の適用済みマイグレーションの特定
// - Downセクションの実行（トランザクション内）
// - マイグレーション履歴からの削除

use crate::adapters::database_migrator::DatabaseMigratorService;
use crate::cli::command_context::CommandContext;
use crate::cli::commands::Outcome;
use crate::services::migration_loader::load_available_migrations;
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// migrate:rollbackコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct RollbackCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// ロールバックするマイグレーションの数（引数の文字列のまま）
    pub steps: Option<String>,
}

impl RollbackCommand {
    pub fn from_args(project_path: PathBuf, args: &[String]) -> Self {
        Self {
            project_path,
            steps: args.first().cloned(),
        }
    }
}

/// migrate:rollbackコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct RollbackCommandHandler;

impl RollbackCommandHandler {
    /// 新しいRollbackCommandHandlerを作成
    pub fn new() -> Self {
        Self
    }

    /// migrate:rollbackコマンドを実行
    ///
    /// # Returns
    ///
    /// 成功時はロールバックされたマイグレーションの概要。
    /// 件数の指定が不正な場合は Outcome::Reported。
    pub async fn execute(&self, command: &RollbackCommand) -> Result<Outcome> {
        let steps = match command.steps.as_deref() {
            None => 1,
            Some(value) => match value.parse::<usize>() {
                Ok(steps) if steps > 0 => steps,
                _ => {
                    return Ok(Outcome::Reported(format!(
                        "Invalid number of steps '{}'. Please provide a positive integer.",
                        value
                    )))
                }
            },
        };

        let context = CommandContext::load(command.project_path.clone())?;
        let migrations_dir = context.require_migrations_dir()?;
        let available = load_available_migrations(&migrations_dir)
            .with_context(|| "Failed to load migrations")?;

        let (config, pool) = context.connect().await?;
        let migrator = DatabaseMigratorService::new();
        migrator
            .create_migration_table(&pool, config.dialect)
            .await
            .with_context(|| "Failed to prepare migration history table")?;

        let applied_records = migrator
            .get_migrations(&pool)
            .await
            .with_context(|| "Failed to read migration history")?;

        if applied_records.is_empty() {
            pool.close().await;
            return Ok(Outcome::Reported(
                "There are no applied migrations to roll back.".to_string(),
            ));
        }

        let mut rolled_back = Vec::new();
        for record in applied_records.iter().rev().take(steps) {
            let migration = available
                .iter()
                .find(|migration| migration.version == record.version)
                .ok_or_else(|| anyhow!("Migration file not found: {}", record.version))?;

            println!(
                "{} Reverting migration: {}_{}",
                "->".blue(),
                migration.version,
                migration.description
            );
            let result = migrator
                .revert(&pool, config.dialect, migration)
                .await
                .with_context(|| format!("Failed to roll back migration {}", migration.version))?;
            rolled_back.push(result);
        }

        pool.close().await;

        let mut summary = String::from("Rollback completed successfully!\n");
        summary.push_str(&format!("{} migration(s) rolled back:\n", rolled_back.len()));
        for migration in &rolled_back {
            summary.push_str(&format!(
                "\n✓ {} - {} ({}ms)",
                migration.version,
                migration.description,
                migration.duration.num_milliseconds()
            ));
        }

        Ok(Outcome::Completed(summary))
    }
}
