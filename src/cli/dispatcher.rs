// コマンドディスパッチャー
//
// 引数列の先頭要素（コマンド名）をレジストリで引き、対応するハンドラーを呼び出す。
// 引数の形の検証は各ハンドラーが行う。

use crate::adapters::process_runner::{ProcessRunner, SystemProcessRunner};
use crate::cli::commands::add::{AddCommand, AddCommandHandler};
use crate::cli::commands::install::{InstallCommand, InstallCommandHandler};
use crate::cli::commands::make_migration::{MakeMigrationCommand, MakeMigrationCommandHandler};
use crate::cli::commands::make_model::{MakeModelCommand, MakeModelCommandHandler};
use crate::cli::commands::make_schema::{MakeSchemaCommand, MakeSchemaCommandHandler};
use crate::cli::commands::migrate::{MigrateCommand, MigrateCommandHandler};
use crate::cli::commands::new::{NewCommand, NewCommandHandler};
use crate::cli::commands::rollback::{RollbackCommand, RollbackCommandHandler};
use crate::cli::commands::serve::{ServeCommand, ServeCommandHandler};
use crate::cli::commands::Outcome;
use crate::cli::registry::{CommandKind, CommandRegistry};
use anyhow::Result;
use std::future::Future;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::debug;

/// コマンドが指定されなかった場合のメッセージ
pub const USAGE_MESSAGE: &str = "Please provide a command (use 'help' to see available commands).";

/// ヘルプを表示するコマンド名
pub const HELP_COMMAND: &str = "help";

/// コマンドディスパッチャー
#[derive(Debug, Clone)]
pub struct Dispatcher<R = SystemProcessRunner> {
    registry: CommandRegistry,
    project_path: PathBuf,
    runner: R,
}

impl Dispatcher {
    /// 実際に外部コマンドを起動するディスパッチャーを作成
    pub fn new(project_path: PathBuf) -> Self {
        Self::with_runner(project_path, SystemProcessRunner)
    }
}

impl<R> Dispatcher<R>
where
    R: ProcessRunner + Clone + Send + 'static,
{
    pub fn with_runner(project_path: PathBuf, runner: R) -> Self {
        Self {
            registry: CommandRegistry::with_defaults(),
            project_path,
            runner,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// 引数列を解釈して実行する
    ///
    /// # Arguments
    ///
    /// * `argv` - 0番目がプログラム名、1番目がコマンド名、以降がコマンド引数
    pub async fn dispatch(&self, argv: &[String]) -> Result<Outcome> {
        let Some(name) = argv.get(1) else {
            return Ok(Outcome::Completed(USAGE_MESSAGE.to_string()));
        };

        if name == HELP_COMMAND {
            return Ok(Outcome::Completed(self.registry.help_text()));
        }

        let Some(kind) = self.registry.get(name) else {
            return Ok(Outcome::Reported(format!(
                "Unknown command '{}'. Use 'help' to see available commands.",
                name
            )));
        };

        let args = &argv[2..];
        debug!(command = %name, ?args, "Dispatching command");
        self.run(kind, args).await
    }

    async fn run(&self, kind: CommandKind, args: &[String]) -> Result<Outcome> {
        let project_path = self.project_path.clone();
        let runner = self.runner.clone();

        match kind {
            CommandKind::New => NewCommandHandler::with_runner(runner)
                .execute(&NewCommand::from_args(project_path, args)),
            CommandKind::Install => {
                InstallCommandHandler::with_runner(runner).execute(&InstallCommand { project_path })
            }
            CommandKind::Add => AddCommandHandler::with_runner(runner).execute(&AddCommand {
                project_path,
                args: args.to_vec(),
            }),
            CommandKind::Migrate => {
                MigrateCommandHandler::new()
                    .execute(&MigrateCommand { project_path })
                    .await
            }
            CommandKind::MigrateRollback => {
                RollbackCommandHandler::new()
                    .execute(&RollbackCommand::from_args(project_path, args))
                    .await
            }
            CommandKind::Serve => {
                ServeCommandHandler::with_runner(runner)
                    .execute(&ServeCommand::from_args(project_path, args))
                    .await
            }
            CommandKind::MakeModel => MakeModelCommandHandler::new()
                .execute(&MakeModelCommand::from_args(project_path, args)),
            CommandKind::MakeMigration => MakeMigrationCommandHandler::new()
                .execute(&MakeMigrationCommand::from_args(project_path, args)),
            CommandKind::MakeSchema => {
                MakeSchemaCommandHandler::new().execute(&MakeSchemaCommand { project_path })
            }
        }
    }
}

/// ランタイム上でコマンドを最後まで実行する
///
/// エラーで終わった場合は、実行中のブロッキングタスク（フロントエンド開発サーバーなど）
/// の終了を待たずにランタイムを破棄する。
pub fn block_on<F>(runtime: Runtime, command: F) -> Result<Outcome>
where
    F: Future<Output = Result<Outcome>>,
{
    let result = runtime.block_on(command);
    if result.is_err() {
        runtime.shutdown_background();
    }
    result
}
