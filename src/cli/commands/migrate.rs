// migrateコマンドハンドラー
//
// マイグレーション適用機能を実装します。
// - .env からのデータベース接続設定の解決
// - 未適用マイグレーションの検出
// - Upセクションの実行（トランザクション内）と履歴記録
// - 適用結果の表示

use crate::adapters::database_migrator::DatabaseMigratorService;
use crate::cli::command_context::CommandContext;
use crate::cli::commands::Outcome;
use crate::core::migration::{AppliedMigration, Migration, MigrationRecord};
use crate::services::migration_loader::load_available_migrations;
use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

/// migrateコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct MigrateCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
}

/// migrateコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct MigrateCommandHandler;

impl MigrateCommandHandler {
    /// 新しいMigrateCommandHandlerを作成
    pub fn new() -> Self {
        Self
    }

    /// migrateコマンドを実行
    ///
    /// # Returns
    ///
    /// 成功時は適用結果のサマリー。.env の読み込み、接続、読み込み、適用の
    /// いずれかに失敗した場合はエラー（以降のマイグレーションは適用しない）。
    pub async fn execute(&self, command: &MigrateCommand) -> Result<Outcome> {
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
        warn_on_checksum_mismatch(&available, &applied_records);

        let pending = pending_migrations(&available, &applied_records);
        if pending.is_empty() {
            pool.close().await;
            return Ok(Outcome::Completed("No pending migrations.".to_string()));
        }

        let mut applied = Vec::with_capacity(pending.len());
        for migration in pending {
            println!(
                "{} Applying migration: {}_{}",
                "->".blue(),
                migration.version,
                migration.description
            );
            let result = migrator
                .apply(&pool, config.dialect, migration)
                .await
                .with_context(|| {
                    format!("Failed to apply migration {}", migration.version)
                })?;
            applied.push(result);
        }

        pool.close().await;
        Ok(Outcome::Completed(generate_summary(&applied)))
    }
}

/// 未適用のマイグレーション（バージョン順）
pub fn pending_migrations<'a>(
    available: &'a [Migration],
    applied: &[MigrationRecord],
) -> Vec<&'a Migration> {
    available
        .iter()
        .filter(|migration| !applied.iter().any(|record| record.version == migration.version))
        .collect()
}

/// 適用済みマイグレーションのファイルが変更されていれば警告する
fn warn_on_checksum_mismatch(available: &[Migration], applied: &[MigrationRecord]) {
    let by_version: HashMap<&str, &Migration> = available
        .iter()
        .map(|migration| (migration.version.as_str(), migration))
        .collect();

    for record in applied {
        if let Some(migration) = by_version.get(record.version.as_str()) {
            if migration.checksum != record.checksum {
                warn!(
                    version = %record.version,
                    "Applied migration file has changed since it was applied"
                );
                eprintln!(
                    "Warning: migration {} has been modified after it was applied",
                    record.version
                );
            }
        }
    }
}

/// 適用結果のサマリーを生成
fn generate_summary(applied: &[AppliedMigration]) -> String {
    let mut summary = String::from("Migrations completed successfully!\n");
    summary.push_str(&format!("{} migration(s) applied:\n", applied.len()));

    for migration in applied {
        summary.push_str(&format!(
            "\n✓ {} - {} ({}ms)",
            migration.version,
            migration.description,
            migration.duration.num_milliseconds()
        ));
    }

    summary
}
