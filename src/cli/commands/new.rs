// newコマンドハンドラー
//
// 新規プロジェクトを作成します。
// - プロジェクトディレクトリとGoモジュールの初期化
// - バックエンド依存関係の整理、Reactフロントエンドの生成と依存関係のインストール
// - .env ファイル（バックエンド・フロントエンド）の生成
// いずれかのステップが失敗した場合はプロジェクトディレクトリ全体を削除します。

use crate::adapters::process_runner::{Invocation, ProcessRunner, SystemProcessRunner};
use crate::cli::commands::Outcome;
use crate::core::naming::{ENV_FILE, FRONTEND_DIR, FRONTEND_ENV_FILE};
use crate::core::templates;
use crate::services::project_initializer::{frontend_layout_step, InitError, ProjectInitializer};
use crate::services::provisioner::{ProvisionFailure, ProvisionStep, StepAction};
use anyhow::Result;
use std::path::PathBuf;

/// newコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct NewCommand {
    /// 作成先の親ディレクトリ
    pub project_path: PathBuf,
    /// プロジェクト名
    pub name: Option<String>,
}

impl NewCommand {
    pub fn from_args(project_path: PathBuf, args: &[String]) -> Self {
        Self {
            project_path,
            name: args.first().cloned(),
        }
    }
}

/// newコマンドハンドラー
#[derive(Debug, Clone)]
pub struct NewCommandHandler<R = SystemProcessRunner> {
    runner: R,
}

impl NewCommandHandler {
    /// 新しいNewCommandHandlerを作成
    pub fn new() -> Self {
        Self::with_runner(SystemProcessRunner)
    }
}

impl Default for NewCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ProcessRunner> NewCommandHandler<R> {
    /// 外部コマンドの実行方法を指定して作成
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// newコマンドを実行
    ///
    /// # Returns
    ///
    /// 成功時は完了メッセージ。名前の欠落・衝突やステップの失敗は Outcome::Reported。
    pub fn execute(&self, command: &NewCommand) -> Result<Outcome> {
        let Some(name) = command.name.as_deref().filter(|name| !name.is_empty()) else {
            return Ok(Outcome::Reported("Please provide a project name.".to_string()));
        };

        let result = ProjectInitializer::new(&self.runner).initialize_with(
            &command.project_path,
            name,
            provisioning_steps(name),
        );

        match result {
            Ok(_) => Ok(Outcome::Completed(
                "Project setup completed successfully!".to_string(),
            )),
            Err(InitError::AlreadyExists { .. }) => Ok(Outcome::Reported(format!(
                "A project named '{}' already exists. Aborting.",
                name
            ))),
            Err(InitError::Provision(failure)) => {
                Ok(Outcome::Reported(failure_message(name, &failure)))
            }
            Err(e) => Ok(Outcome::Reported(e.to_string())),
        }
    }
}

/// 初期化ステップの後に続くステップ
///
/// 依存関係の整理、フロントエンド生成、.env 生成。
fn provisioning_steps(name: &str) -> Vec<ProvisionStep> {
    let step = |label: &str, action| ProvisionStep {
        label: label.to_string(),
        action,
    };

    vec![
        step(
            "Installing backend dependencies...",
            StepAction::Run(Invocation::new("go", ["mod", "tidy"])),
        ),
        step(
            "Initializing frontend...",
            StepAction::Run(Invocation::new("npx", ["create-react-app", FRONTEND_DIR])),
        ),
        step(
            "Installing frontend dependencies...",
            StepAction::Run(Invocation::new(
                "npm",
                ["install", "--prefix", FRONTEND_DIR],
            )),
        ),
        frontend_layout_step(),
        step(
            "Creating backend .env file...",
            StepAction::WriteFile {
                path: PathBuf::from(ENV_FILE),
                contents: templates::backend_env(name),
            },
        ),
        step(
            "Creating frontend .env file...",
            StepAction::WriteFile {
                path: PathBuf::from(FRONTEND_ENV_FILE),
                contents: templates::frontend_env(name),
            },
        ),
    ]
}

fn failure_message(name: &str, failure: &ProvisionFailure) -> String {
    let mut message = format!(
        "Failed at step '{}': {}\nCleaning up incomplete project '{}'...",
        failure.step.trim_end_matches("..."),
        failure.source,
        name
    );

    if failure.rollback.is_clean() {
        message.push_str("\nProject cleanup completed.");
    } else {
        for error in &failure.rollback.failures {
            message.push_str(&format!("\nFailed to clean up project directory: {}", error));
        }
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::process_runner::testing::RecordingRunner;
    use std::fs;
    use tempfile::TempDir;

    fn command(dir: &TempDir, name: &str) -> NewCommand {
        NewCommand::from_args(dir.path().to_path_buf(), &[name.to_string()])
    }

    #[test]
    fn test_new_runs_every_step() {
        let temp_dir = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let handler = NewCommandHandler::with_runner(&runner);

        let outcome = handler.execute(&command(&temp_dir, "shop")).unwrap();

        assert_eq!(
            outcome,
            Outcome::Completed("Project setup completed successfully!".to_string())
        );
        assert_eq!(
            runner.command_lines(),
            vec![
                "go mod init shop",
                "go mod tidy",
                "npx create-react-app frontend",
                "npm install --prefix frontend",
            ]
        );

        let root = temp_dir.path().join("shop");
        assert!(root.join("backend/models").is_dir());
        assert!(root.join("frontend/src/components").is_dir());
        assert!(fs::read_to_string(root.join(".env"))
            .unwrap()
            .contains("APP_NAME=shop"));
        assert!(fs::read_to_string(root.join("frontend/.env"))
            .unwrap()
            .contains("REACT_APP_NAME=shop"));
    }

    #[test]
    fn test_missing_name_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let runner = RecordingRunner::new();

        let outcome = NewCommandHandler::with_runner(&runner)
            .execute(&NewCommand::from_args(temp_dir.path().to_path_buf(), &[]))
            .unwrap();

        assert!(outcome.is_reported());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_failed_frontend_scaffold_removes_project() {
        let temp_dir = TempDir::new().unwrap();
        let runner = RecordingRunner::failing_on("npx create-react-app frontend");

        let outcome = NewCommandHandler::with_runner(&runner)
            .execute(&command(&temp_dir, "shop"))
            .unwrap();

        assert!(outcome.is_reported());
        assert!(outcome.message().contains("Initializing frontend"));
        assert!(outcome.message().contains("Project cleanup completed."));
        assert!(!temp_dir.path().join("shop").exists());
    }
}
