/// CLI エントリーポイントとディスパッチャーのテスト
///
/// 引数のパース結果がディスパッチャーに渡り、レジストリに登録された
/// コマンドだけが実行されることを確認します。
mod common;

use clap::Parser;
use common::{argv, RecordingRunner};
use podium::cli::commands::Outcome;
use podium::cli::dispatcher::{Dispatcher, USAGE_MESSAGE};
use podium::cli::registry::{CommandKind, CommandRegistry};
use podium::cli::Cli;
use tempfile::TempDir;

fn dispatcher(temp_dir: &TempDir, runner: &RecordingRunner) -> Dispatcher<RecordingRunner> {
    Dispatcher::with_runner(temp_dir.path().to_path_buf(), runner.clone())
}

/// CLIメイン構造体がパース可能であることを確認
#[test]
fn test_cli_can_parse() {
    // ヘルプとバージョンは clap がエラーとして返す
    assert!(Cli::try_parse_from(["podium", "--help"]).is_err());
    assert!(Cli::try_parse_from(["podium", "--version"]).is_err());

    let cli = Cli::try_parse_from(["podium", "make:migrate", "Product"]).unwrap();
    assert_eq!(cli.argv(), argv(&["make:migrate", "Product"]));
}

#[tokio::test]
async fn test_parsed_arguments_reach_handler() {
    let temp_dir = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    let cli = Cli::try_parse_from(["podium", "add", "npm", "axios"]).unwrap();

    let outcome = dispatcher(&temp_dir, &runner)
        .dispatch(&cli.argv())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Completed("Dependency added successfully!".to_string())
    );
    assert_eq!(runner.command_lines(), vec!["npm install axios --prefix frontend"]);
}

#[tokio::test]
async fn test_no_arguments_prints_usage() {
    let temp_dir = TempDir::new().unwrap();
    let runner = RecordingRunner::new();

    let outcome = dispatcher(&temp_dir, &runner)
        .dispatch(&argv(&[]))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Completed(USAGE_MESSAGE.to_string()));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_help_lists_every_registered_command() {
    let temp_dir = TempDir::new().unwrap();
    let runner = RecordingRunner::new();

    let outcome = dispatcher(&temp_dir, &runner)
        .dispatch(&argv(&["help"]))
        .await
        .unwrap();

    let registry = CommandRegistry::with_defaults();
    assert_eq!(outcome, Outcome::Completed(registry.help_text()));
    for kind in CommandKind::ALL {
        assert!(
            outcome.message().contains(kind.name()),
            "help should mention {}",
            kind.name()
        );
        assert!(outcome.message().contains(kind.description()));
    }
}

#[tokio::test]
async fn test_unknown_command_runs_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let runner = RecordingRunner::new();

    let outcome = dispatcher(&temp_dir, &runner)
        .dispatch(&argv(&["build", "--release"]))
        .await
        .unwrap();

    assert!(outcome.is_reported());
    assert!(outcome.message().contains("'build'"));
    assert!(runner.calls().is_empty());
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_add_with_unknown_environment_runs_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let runner = RecordingRunner::new();

    let outcome = dispatcher(&temp_dir, &runner)
        .dispatch(&argv(&["add", "yarn", "lodash"]))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Reported("Unknown environment. Use 'go' or 'npm'.".to_string())
    );
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_add_requires_two_arguments() {
    let temp_dir = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    let dispatcher = dispatcher(&temp_dir, &runner);

    for args in [&["add"][..], &["add", "go"][..], &["add", "go", "a", "b"][..]] {
        let outcome = dispatcher.dispatch(&argv(args)).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Reported(
                "Please specify the environment (go/npm) and the package name.".to_string()
            ),
            "{args:?}"
        );
    }
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_install_runs_backend_then_frontend() {
    let temp_dir = TempDir::new().unwrap();
    let runner = RecordingRunner::new();

    let outcome = dispatcher(&temp_dir, &runner)
        .dispatch(&argv(&["install"]))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Completed("Dependencies installed successfully!".to_string())
    );
    assert_eq!(
        runner.command_lines(),
        vec!["go mod tidy", "npm install --prefix frontend"]
    );
}

#[tokio::test]
async fn test_install_stops_after_backend_failure() {
    let temp_dir = TempDir::new().unwrap();
    let runner = RecordingRunner::failing_on("go mod tidy");

    let outcome = dispatcher(&temp_dir, &runner)
        .dispatch(&argv(&["install"]))
        .await
        .unwrap();

    assert!(outcome.is_reported());
    assert_eq!(runner.command_lines(), vec!["go mod tidy"]);
}
