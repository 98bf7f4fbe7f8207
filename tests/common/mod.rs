// 統合テスト共通のヘルパー
#![allow(dead_code)]

use podium::adapters::process_runner::{Invocation, ProcessRunner};
use podium::core::error::ProcessError;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// 外部コマンドを起動せずに呼び出しを記録するランナー
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<Invocation>>>,
    failing: Option<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 表示が `command_line` と一致する呼び出しだけ失敗させる
    pub fn failing_on(command_line: &str) -> Self {
        Self {
            calls: Arc::default(),
            failing: Some(command_line.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), ProcessError> {
        self.calls.lock().unwrap().push(invocation.clone());
        match &self.failing {
            Some(line) if *line == invocation.to_string() => Err(ProcessError::ExitStatus {
                command: invocation.to_string(),
                code: Some(1),
            }),
            _ => Ok(()),
        }
    }
}

/// `podium <args...>` 形式の引数列
pub fn argv(args: &[&str]) -> Vec<String> {
    std::iter::once("podium")
        .chain(args.iter().copied())
        .map(str::to_string)
        .collect()
}

/// backend/ 以下の標準ディレクトリだけを持つプロジェクトを用意
pub fn scaffold_backend(root: &Path) {
    for dir in ["backend/models", "backend/migrations", "backend/configs"] {
        fs::create_dir_all(root.join(dir)).unwrap();
    }
}

/// SQLiteファイルを使う .env を書き込む
pub fn write_sqlite_env(root: &Path, database: &str) {
    fs::write(
        root.join(".env"),
        format!(
            "APP_NAME=\"demo\"\nDB_CONNECTION=sqlite\nDB_DATABASE={}\n",
            database
        ),
    )
    .unwrap();
}

/// マイグレーションファイルを書き込む
pub fn write_migration(root: &Path, file_name: &str, up: &str, down: &str) {
    fs::write(
        root.join("backend/migrations").join(file_name),
        format!("-- +migrate Up\n{}\n\n-- +migrate Down\n{}\n", up, down),
    )
    .unwrap();
}
