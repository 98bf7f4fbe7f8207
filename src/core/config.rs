// データベース接続設定
//
// 環境設定（.env）の DB_* キーから、方言と接続パラメータを解決します。

use crate::core::env_file::Environment;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// データベース方言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    PostgreSQL,
    MySQL,
    SQLite,
}

impl Dialect {
    /// 方言ごとの既定ポート
    pub fn default_port(&self) -> u16 {
        match self {
            Dialect::PostgreSQL => 5432,
            Dialect::MySQL => 3306,
            Dialect::SQLite => 0,
        }
    }

    /// n番目（1始まり）のバインドパラメータのプレースホルダー
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::PostgreSQL => format!("${}", index),
            Dialect::MySQL | Dialect::SQLite => "?".to_string(),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::PostgreSQL => write!(f, "postgresql"),
            Dialect::MySQL => write!(f, "mysql"),
            Dialect::SQLite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for Dialect {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Dialect::MySQL),
            "pgsql" | "postgres" | "postgresql" => Ok(Dialect::PostgreSQL),
            "sqlite" | "sqlite3" => Ok(Dialect::SQLite),
            other => Err(anyhow!(
                "Unsupported DB_CONNECTION: {}. Please specify one of: mysql, pgsql, sqlite.",
                other
            )),
        }
    }
}

/// データベース接続設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// データベース方言
    pub dialect: Dialect,

    /// ホスト名（SQLiteの場合は不要）
    pub host: String,

    /// ポート番号
    pub port: u16,

    /// データベース名（SQLiteの場合はファイルパス）
    pub database: String,

    /// ユーザー名
    pub user: Option<String>,

    /// パスワード
    pub password: Option<String>,

    /// 接続タイムアウト（秒）
    pub timeout: Option<u64>,
}

impl Dialect {
    /// DB_CONNECTION から方言を解決（未設定・空ならMySQL）
    pub fn from_environment(env: &Environment) -> Result<Self> {
        match env.get("DB_CONNECTION").filter(|v| !v.is_empty()) {
            Some(value) => value.parse(),
            None => Ok(Dialect::MySQL),
        }
    }
}

impl DatabaseConfig {
    /// 環境設定から接続設定を解決
    ///
    /// DB_CONNECTION が未設定ならMySQLとみなす。空のユーザー名・パスワードは未設定扱い。
    pub fn from_environment(env: &Environment) -> Result<Self> {
        let dialect = Dialect::from_environment(env)?;

        Ok(Self {
            dialect,
            host: env.get_or("DB_HOST", "localhost"),
            port: env.port_or("DB_PORT", dialect.default_port()),
            database: env.get("DB_DATABASE").unwrap_or_default(),
            user: env.get("DB_USERNAME").filter(|v| !v.is_empty()),
            password: env.get("DB_PASSWORD").filter(|v| !v.is_empty()),
            timeout: Some(30),
        })
    }

    /// Validate database configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.is_empty() {
            return Err(anyhow!("Database name is not specified (DB_DATABASE)"));
        }

        Ok(())
    }
}
