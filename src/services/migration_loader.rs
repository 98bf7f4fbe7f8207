// マイグレーションディレクトリ読み込み
//
// migrate / migrate:rollback コマンドで共通して使用する、
// `backend/migrations` 配下のSQLファイルのスキャン・パース処理。

use crate::core::error::MigrationFileError;
use crate::core::migration::{parse_sections, split_file_stem, Migration};
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::warn;

/// マイグレーションファイルの拡張子
const MIGRATION_EXTENSION: &str = "sql";

/// マイグレーションディレクトリをスキャンし、バージョン順のマイグレーション一覧を返す
///
/// ファイル名の形式: `{timestamp}_{description}.sql`
/// - `.sql` 以外のファイルとディレクトリは無視
/// - 形式に合わない `.sql` ファイルは警告を出力してスキップ
/// - 重複バージョンが検出された場合はエラーを返す
pub fn load_available_migrations(migrations_dir: &Path) -> Result<Vec<Migration>> {
    let mut migrations = Vec::new();

    let entries = fs::read_dir(migrations_dir)
        .with_context(|| format!("Failed to read migrations directory: {:?}", migrations_dir))?;

    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read migrations directory: {:?}", migrations_dir))?
            .path();

        if !path.is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some(MIGRATION_EXTENSION)
        {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            warn!(file = %file_name, "Skipping migration file with non UTF-8 name");
            continue;
        };
        let Some((version, description)) = split_file_stem(stem) else {
            eprintln!(
                "Warning: Skipping file '{}': does not match expected format '{{timestamp}}_{{description}}.sql'",
                file_name
            );
            continue;
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read migration file: {:?}", path))?;
        let (up_sql, down_sql) = parse_sections(&file_name, &content)?;

        migrations.push(Migration {
            version,
            description,
            up_sql,
            down_sql,
            checksum: calculate_checksum(&content),
            path,
        });
    }

    migrations.sort_by(|a, b| a.version.cmp(&b.version));

    for window in migrations.windows(2) {
        if window[0].version == window[1].version {
            return Err(MigrationFileError::DuplicateVersion {
                version: window[0].version.clone(),
                first: file_label(&window[0]),
                second: file_label(&window[1]),
            }
            .into());
        }
    }

    Ok(migrations)
}

/// ファイル内容のSHA-256チェックサム（16進小文字）
pub fn calculate_checksum(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}

fn file_label(migration: &Migration) -> String {
    migration
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| migration.version.clone())
}
