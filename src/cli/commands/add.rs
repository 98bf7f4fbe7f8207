// addコマンドハンドラー
//
// バックエンド（go get）またはフロントエンド（npm install）にパッケージを追加します。

use crate::adapters::process_runner::{Invocation, ProcessRunner, SystemProcessRunner};
use crate::cli::commands::Outcome;
use crate::core::naming::FRONTEND_DIR;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

/// 追加先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyTarget {
    Go,
    Npm,
}

impl DependencyTarget {
    /// 引数の文字列を解釈（"go" / "npm" 以外はNone）
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "go" => Some(DependencyTarget::Go),
            "npm" => Some(DependencyTarget::Npm),
            _ => None,
        }
    }

    /// パッケージを追加する外部コマンド
    pub fn invocation(&self, package: &str) -> Invocation {
        match self {
            DependencyTarget::Go => Invocation::new("go", ["get", package]),
            DependencyTarget::Npm => {
                Invocation::new("npm", ["install", package, "--prefix", FRONTEND_DIR])
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DependencyTarget::Go => "Go",
            DependencyTarget::Npm => "npm",
        }
    }
}

/// addコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct AddCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// コマンド引数（追加先とパッケージ名）
    pub args: Vec<String>,
}

/// addコマンドハンドラー
#[derive(Debug, Clone)]
pub struct AddCommandHandler<R = SystemProcessRunner> {
    runner: R,
}

impl AddCommandHandler {
    pub fn new() -> Self {
        Self::with_runner(SystemProcessRunner)
    }
}

impl Default for AddCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ProcessRunner> AddCommandHandler<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// addコマンドを実行
    ///
    /// 引数はちょうど2つ（追加先、パッケージ名）。追加先が go / npm 以外の場合は
    /// 外部コマンドを実行せずに報告する。
    pub fn execute(&self, command: &AddCommand) -> Result<Outcome> {
        let [target, package] = command.args.as_slice() else {
            return Ok(Outcome::Reported(
                "Please specify the environment (go/npm) and the package name.".to_string(),
            ));
        };

        let Some(target) = DependencyTarget::parse(target) else {
            return Ok(Outcome::Reported(
                "Unknown environment. Use 'go' or 'npm'.".to_string(),
            ));
        };

        println!(
            "{} Adding {} package: {}",
            "->".blue(),
            target.label(),
            package.green()
        );

        let invocation = target
            .invocation(package)
            .current_dir(&command.project_path);
        match self.runner.run(&invocation) {
            Ok(()) => Ok(Outcome::Completed("Dependency added successfully!".to_string())),
            Err(e) => Ok(Outcome::Reported(format!(
                "Failed to add {} package: {}",
                target.label(),
                e
            ))),
        }
    }
}
