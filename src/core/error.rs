// エラー型定義
//
// アプリケーション全体で使用されるカスタムエラー型を提供します。
// thiserrorを使用して、EnvFileError, ProcessError, IoError, ProvisionError,
// MigrationFileError, MigrationError, DatabaseError を定義します。

use std::path::PathBuf;
use thiserror::Error;

/// 環境ファイル読み込みエラー
///
/// `.env` 形式のファイルを読み込む際に発生するエラーを表現します。
/// 不正な行（`=` を含まない行）はエラーではなく読み飛ばされます。
#[derive(Debug, Error)]
pub enum EnvFileError {
    /// File could not be opened
    #[error("failed to open .env file {path:?}: {source}")]
    Open {
        /// ファイルパス
        path: PathBuf,
        /// 原因となったI/Oエラー
        #[source]
        source: std::io::Error,
    },

    /// Read error while scanning
    #[error("error reading .env file {path:?} at line {line}: {source}")]
    Read {
        /// ファイルパス
        path: PathBuf,
        /// 読み込みに失敗した行番号（1始まり）
        line: usize,
        /// 原因となったI/Oエラー
        #[source]
        source: std::io::Error,
    },

    /// Declaration with an empty key
    #[error("empty variable name in .env file {path:?} at line {line}")]
    EmptyKey {
        /// ファイルパス
        path: PathBuf,
        /// 行番号（1始まり）
        line: usize,
    },
}

impl EnvFileError {
    /// ファイルが開けなかったエラーかどうか
    pub fn is_open(&self) -> bool {
        matches!(self, EnvFileError::Open { .. })
    }

    /// 空のキーによるエラーかどうか
    pub fn is_empty_key(&self) -> bool {
        matches!(self, EnvFileError::EmptyKey { .. })
    }
}

/// 外部プロセス実行エラー
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The executable could not be started
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        /// 実行しようとしたコマンドライン
        command: String,
        /// 原因となったI/Oエラー
        #[source]
        source: std::io::Error,
    },

    /// The process exited unsuccessfully
    #[error("`{command}` exited with {}", format_exit_code(.code))]
    ExitStatus {
        /// 実行したコマンドライン
        command: String,
        /// 終了コード（シグナルで終了した場合はNone）
        code: Option<i32>,
    },
}

impl ProcessError {
    /// 起動失敗かどうか
    pub fn is_spawn(&self) -> bool {
        matches!(self, ProcessError::Spawn { .. })
    }

    /// 終了コードを取得
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ProcessError::ExitStatus { code, .. } => *code,
            ProcessError::Spawn { .. } => None,
        }
    }
}

fn format_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "a signal".to_string(),
    }
}

/// I/Oエラー
///
/// ファイル操作時に発生するエラーを表現します。
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// File or directory already exists
    #[error("Already exists: {path}")]
    AlreadyExists {
        /// パス
        path: String,
    },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound {
        /// ファイルパス
        path: String,
    },

    /// File write error
    #[error("Failed to write file: {path} (cause: {cause})")]
    FileWrite {
        /// ファイルパス
        path: String,
        /// エラー原因
        cause: String,
    },

    /// Directory creation error
    #[error("Failed to create directory: {path} (cause: {cause})")]
    DirectoryCreate {
        /// ディレクトリパス
        path: String,
        /// エラー原因
        cause: String,
    },

    /// Removal error
    #[error("Failed to remove: {path} (cause: {cause})")]
    Remove {
        /// パス
        path: String,
        /// エラー原因
        cause: String,
    },
}

impl IoError {
    /// 既存パスとの衝突かどうか
    pub fn is_already_exists(&self) -> bool {
        matches!(self, IoError::AlreadyExists { .. })
    }

    /// ファイルが見つからないエラーかどうか
    pub fn is_file_not_found(&self) -> bool {
        matches!(self, IoError::FileNotFound { .. })
    }
}

/// プロビジョニングステップのエラー
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Filesystem step failed
    #[error(transparent)]
    Io(#[from] IoError),

    /// External process step failed
    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// マイグレーションファイルのエラー
#[derive(Debug, Clone, Error)]
pub enum MigrationFileError {
    /// Missing `-- +migrate Up` marker
    #[error("Migration file {file} has no '-- +migrate Up' section")]
    MissingUpSection {
        /// ファイル名
        file: String,
    },

    /// Two files share one version
    #[error("Duplicate migration version detected: '{version}' (files: '{first}' and '{second}')")]
    DuplicateVersion {
        /// 重複したバージョン
        version: String,
        /// 1つ目のファイル名
        first: String,
        /// 2つ目のファイル名
        second: String,
    },
}

/// SQL文の実行エラー
///
/// どのマイグレーションのどの文で失敗したかを保持する。
#[derive(Debug, Clone, Error)]
#[error("migration {version} failed at `{statement}`: {error}")]
pub struct MigrationError {
    /// マイグレーションバージョン
    pub version: String,
    /// ドライバーのエラーメッセージ
    pub error: String,
    /// 失敗したSQL文
    pub statement: String,
}

impl MigrationError {
    pub fn with_sql(version: String, error: String, statement: String) -> Self {
        Self {
            version,
            error,
            statement,
        }
    }
}

/// データベースエラー
///
/// データベース操作時に発生するエラーを表現します。
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Connection error
    #[error("Database connection error: {message} (cause: {cause})")]
    Connection {
        /// エラーメッセージ
        message: String,
        /// エラー原因
        cause: String,
    },

    /// Query execution error
    #[error("Query execution error: {message}")]
    Query {
        /// エラーメッセージ
        message: String,
        /// 失敗したSQL
        sql: Option<String>,
    },

    /// Transaction error
    #[error("Transaction error: {message}")]
    Transaction {
        /// エラーメッセージ
        message: String,
    },

    /// A statement inside a migration failed
    #[error(transparent)]
    Migration {
        #[from]
        error: MigrationError,
    },
}

impl DatabaseError {
    /// 接続エラーかどうか
    pub fn is_connection(&self) -> bool {
        matches!(self, DatabaseError::Connection { .. })
    }

    /// マイグレーションエラーかどうか
    pub fn is_migration(&self) -> bool {
        matches!(self, DatabaseError::Migration { .. })
    }
}
