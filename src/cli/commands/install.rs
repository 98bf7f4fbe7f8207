// installコマンドハンドラー
//
// バックエンド（go mod tidy）とフロントエンド（npm install）の依存関係をインストールします。
// 失敗しても取り消しは行いません。

use crate::adapters::process_runner::{Invocation, ProcessRunner, SystemProcessRunner};
use crate::cli::commands::Outcome;
use crate::core::naming::FRONTEND_DIR;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

/// installコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct InstallCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
}

/// installコマンドハンドラー
#[derive(Debug, Clone)]
pub struct InstallCommandHandler<R = SystemProcessRunner> {
    runner: R,
}

impl InstallCommandHandler {
    pub fn new() -> Self {
        Self::with_runner(SystemProcessRunner)
    }
}

impl Default for InstallCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ProcessRunner> InstallCommandHandler<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// installコマンドを実行
    pub fn execute(&self, command: &InstallCommand) -> Result<Outcome> {
        let steps = [
            (
                "backend",
                Invocation::new("go", ["mod", "tidy"]),
            ),
            (
                "frontend",
                Invocation::new("npm", ["install", "--prefix", FRONTEND_DIR]),
            ),
        ];

        for (side, invocation) in steps {
            println!("{} Installing {} dependencies...", "->".blue(), side);
            let invocation = invocation.current_dir(&command.project_path);
            if let Err(e) = self.runner.run(&invocation) {
                return Ok(Outcome::Reported(format!(
                    "Failed to install {} dependencies: {}",
                    side, e
                )));
            }
        }

        Ok(Outcome::Completed(
            "Dependencies installed successfully!".to_string(),
        ))
    }
}
