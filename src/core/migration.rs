// マイグレーションドメインモデル
//
// SQLマイグレーションファイルの構文と、適用履歴を表現する型。
// 1ファイルに `-- +migrate Up` と `-- +migrate Down` の2セクションを持つ。

use crate::core::error::MigrationFileError;
use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;

/// Upセクションの開始マーカー
pub const UP_MARKER: &str = "-- +migrate Up";

/// Downセクションの開始マーカー
pub const DOWN_MARKER: &str = "-- +migrate Down";

/// マイグレーション
///
/// バージョン（YYYYMMDDHHmmss）をキーとし、適用（up）と取り消し（down）の
/// SQLを対で持つ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// マイグレーションバージョン（タイムスタンプ: YYYYMMDDHHmmss）
    pub version: String,

    /// マイグレーションの説明（ファイル名のバージョン以降）
    pub description: String,

    /// 適用SQL
    pub up_sql: String,

    /// 取り消しSQL
    pub down_sql: String,

    /// ファイル内容のチェックサム（SHA-256）
    pub checksum: String,

    /// ファイルパス
    pub path: PathBuf,
}

/// マイグレーション履歴レコード
///
/// schema_migrations テーブルの1行を表現します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    pub version: String,
    pub description: String,
    pub applied_at: DateTime<Utc>,
    pub checksum: String,
}

/// 適用（または取り消し）済みマイグレーションの実行結果
#[derive(Debug, Clone)]
pub struct AppliedMigration {
    pub version: String,
    pub description: String,
    pub duration: Duration,
}

impl AppliedMigration {
    pub fn new(version: String, description: String, duration: Duration) -> Self {
        Self {
            version,
            description,
            duration,
        }
    }
}

/// タイムスタンプ形式が有効かどうかを検証する
///
/// 有効な形式: 数字のみで構成された14桁の文字列 (YYYYMMDDHHmmss)
pub fn is_valid_timestamp(s: &str) -> bool {
    s.len() == 14 && s.chars().all(|c| c.is_ascii_digit())
}

/// ファイル名（拡張子なし）を (version, description) に分解する
///
/// 形式: `{timestamp}_{description}`。形式に合わない場合は None。
pub fn split_file_stem(stem: &str) -> Option<(String, String)> {
    let (version, description) = stem.split_once('_')?;
    if !is_valid_timestamp(version) || description.is_empty() {
        return None;
    }
    Some((version.to_string(), description.to_string()))
}

/// ファイル内容をUp/Downセクションに分割する
///
/// Upマーカーより前の内容は無視する。Downマーカーがなければdownは空。
pub fn parse_sections(file: &str, content: &str) -> Result<(String, String), MigrationFileError> {
    let mut up = String::new();
    let mut down = String::new();
    let mut section: Option<&mut String> = None;
    let mut seen_up = false;

    for line in content.lines() {
        let marker = line.trim();
        if marker.eq_ignore_ascii_case(UP_MARKER) {
            seen_up = true;
            section = Some(&mut up);
            continue;
        }
        if marker.eq_ignore_ascii_case(DOWN_MARKER) {
            section = Some(&mut down);
            continue;
        }
        if let Some(buffer) = section.as_mut() {
            buffer.push_str(line);
            buffer.push('\n');
        }
    }

    if !seen_up {
        return Err(MigrationFileError::MissingUpSection {
            file: file.to_string(),
        });
    }

    Ok((up.trim().to_string(), down.trim().to_string()))
}

/// SQLを文単位に分割する
///
/// 引用符（'...' / "..." / `...`）の内側の `;` では分割しない。
/// `--` から行末までのコメントは取り除き、空の文は返さない。
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            if c == q {
                // 二重化した引用符はエスケープ
                if chars.peek() == Some(&q) {
                    current.push(q);
                    chars.next();
                } else {
                    quote = None;
                }
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                current.push(c);
            }
            '-' if chars.peek() == Some(&'-') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            ';' => {
                push_statement(&mut statements, &current);
                current.clear();
            }
            _ => current.push(c),
        }
    }
    push_statement(&mut statements, &current);

    statements
}

fn push_statement(statements: &mut Vec<String>, raw: &str) {
    let statement = raw.trim();
    if !statement.is_empty() {
        statements.push(statement.to_string());
    }
}
