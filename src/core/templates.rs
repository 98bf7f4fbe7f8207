// 生成ファイルのテンプレート
//
// 新規プロジェクトの環境ファイルと、make:* コマンドが書き出すソースファイルの
// 固定テキスト。パラメータは変換済みのプロジェクト名・モデル名と方言のみ。

use crate::core::config::Dialect;

/// バックエンド用 .env
pub fn backend_env(project_name: &str) -> String {
    format!(
        r#"# Environment Configuration
APP_NAME={project_name}
APP_ENV=development
APP_HOST=localhost
APP_PORT=8000
API_PORT=8001
APP_KEY=
APP_DEBUG=true
APP_URL=http://localhost
APP_VERSION=1.3.0
APP_TIMEZONE="UTC"

LOG_CHANNEL=stack
LOG_DEPRECATIONS_CHANNEL=null
LOG_LEVEL=debug

DB_CONNECTION=mysql
DB_HOST=localhost
DB_PORT=3306
DB_DATABASE=
DB_USERNAME=
DB_PASSWORD=

REDIS_HOST=127.0.0.1
REDIS_PASSWORD=null
REDIS_PORT=6379
"#
    )
}

/// フロントエンド（React）用 .env
pub fn frontend_env(project_name: &str) -> String {
    format!(
        r#"# React Environment Configuration
REACT_APP_NAME={project_name}
REACT_APP_ENV=development
REACT_APP_API_URL=http://localhost:8001
REACT_APP_VERSION=1.3.0
REACT_APP_DEBUG=true
"#
    )
}

/// GORMモデル
pub fn model(type_name: &str) -> String {
    format!(
        r#"package models

import (
    "gorm.io/gorm"
)

type {type_name} struct {{
    gorm.Model
}}
"#
    )
}

/// SQLマイグレーション（Up/Downの2セクション）
///
/// カラムは gorm.Model の基本カラムに合わせ、型は方言ごとに選ぶ。
pub fn migration(table_name: &str, dialect: Dialect) -> String {
    let (id, timestamp) = match dialect {
        Dialect::MySQL => ("BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY", "DATETIME(3)"),
        Dialect::PostgreSQL => ("BIGSERIAL PRIMARY KEY", "TIMESTAMPTZ"),
        Dialect::SQLite => ("INTEGER PRIMARY KEY AUTOINCREMENT", "DATETIME"),
    };

    format!(
        r#"-- Migration: create {table_name} table ({dialect})
-- +migrate Up
CREATE TABLE IF NOT EXISTS {table_name} (
    id {id},
    created_at {timestamp} NULL,
    updated_at {timestamp} NULL,
    deleted_at {timestamp} NULL
);
CREATE INDEX idx_{table_name}_deleted_at ON {table_name} (deleted_at);

-- +migrate Down
DROP TABLE IF EXISTS {table_name};
"#
    )
}

/// データベース接続の初期化コード
///
/// migrate コマンドと同じ DB_* キーを読む。
pub fn schema() -> String {
    r#"package configs

import (
    "fmt"
    "os"

    "gorm.io/driver/mysql"
    "gorm.io/gorm"
)

// ConnectDatabase opens the application database described by the DB_* variables.
func ConnectDatabase() (*gorm.DB, error) {
    dsn := fmt.Sprintf("%s:%s@tcp(%s:%s)/%s?charset=utf8mb4&parseTime=True&loc=Local",
        os.Getenv("DB_USERNAME"),
        os.Getenv("DB_PASSWORD"),
        os.Getenv("DB_HOST"),
        os.Getenv("DB_PORT"),
        os.Getenv("DB_DATABASE"),
    )
    return gorm.Open(mysql.Open(dsn), &gorm.Config{})
}

// AutoMigrate creates or updates the tables for the given models.
func AutoMigrate(db *gorm.DB, models ...interface{}) error {
    return db.AutoMigrate(models...)
}
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::env_file::{parse_line, EnvLine};
    use crate::core::migration::parse_sections;

    #[test]
    fn test_backend_env_contains_project_name() {
        let content = backend_env("shop");
        assert!(content.contains("APP_NAME=shop\n"));
        assert!(content.contains("API_PORT=8001\n"));
        assert!(content.contains("DB_CONNECTION=mysql\n"));
    }

    #[test]
    fn test_backend_env_lines_parse() {
        let content = backend_env("shop");
        let timezone = content
            .lines()
            .map(parse_line)
            .find(|line| matches!(line, EnvLine::Pair(key, _) if key == "APP_TIMEZONE"));
        assert_eq!(
            timezone,
            Some(EnvLine::Pair("APP_TIMEZONE".to_string(), "UTC".to_string()))
        );
    }

    #[test]
    fn test_frontend_env_contains_project_name() {
        assert!(frontend_env("shop").contains("REACT_APP_NAME=shop\n"));
    }

    #[test]
    fn test_model_declares_type() {
        let content = model("BlogPost");
        assert!(content.starts_with("package models"));
        assert!(content.contains("type BlogPost struct {\n    gorm.Model\n}"));
    }

    #[test]
    fn test_migration_has_both_sections() {
        let content = migration("blog_posts", Dialect::MySQL);
        let (up, down) = parse_sections("m.sql", &content).unwrap();
        assert!(up.contains("CREATE TABLE IF NOT EXISTS blog_posts"));
        assert!(up.contains("id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY"));
        assert_eq!(down, "DROP TABLE IF EXISTS blog_posts;");
    }

    #[test]
    fn test_migration_column_types_follow_dialect() {
        let postgres = migration("posts", Dialect::PostgreSQL);
        assert!(postgres.contains("id BIGSERIAL PRIMARY KEY"));
        assert!(postgres.contains("deleted_at TIMESTAMPTZ NULL"));
        assert!(!postgres.contains("UNSIGNED"));
        assert!(!postgres.contains("DATETIME"));

        let sqlite = migration("posts", Dialect::SQLite);
        assert!(sqlite.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sqlite.contains("created_at DATETIME NULL"));
    }

    #[test]
    fn test_schema_reads_db_variables() {
        let content = schema();
        for key in ["DB_USERNAME", "DB_PASSWORD", "DB_HOST", "DB_PORT", "DB_DATABASE"] {
            assert!(content.contains(key), "{key}");
        }
    }
}
