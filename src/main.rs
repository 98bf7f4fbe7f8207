use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use podium::cli::commands::Outcome;
use podium::cli::dispatcher::{self, Dispatcher};
use podium::cli::Cli;
use podium::logging;
use std::env;
use std::process;

fn main() {
    // CLIをパースして実行
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    logging::init(cli.verbose, !cli.no_color);
    sqlx::any::install_default_drivers();

    let result = run(cli);

    match result {
        Ok(Outcome::Completed(output)) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Ok(Outcome::Reported(message)) => {
            println!("{}", message.yellow());
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            process::exit(1);
        }
    }
}

/// 非同期ランタイムを作成してコマンドを実行する
fn run(cli: Cli) -> Result<Outcome> {
    // プロジェクトのルートパスを取得
    let project_path = env::current_dir().with_context(|| "Failed to resolve current directory")?;

    let runtime = tokio::runtime::Runtime::new().with_context(|| "Failed to create Tokio runtime")?;

    let dispatcher = Dispatcher::new(project_path);
    dispatcher::block_on(runtime, dispatcher.dispatch(&cli.argv()))
}
