// CLI Layer
// ユーザー入力の受付とコマンドルーティング

pub mod command_context;
pub mod commands;
pub mod dispatcher;
pub mod registry;

use clap::Parser;

/// Podium - Go + React project scaffolding and task runner
///
/// Creates project skeletons, installs dependencies, applies SQL migrations,
/// generates boilerplate files and runs the development servers.
#[derive(Parser, Debug)]
#[command(name = "podium")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Project scaffolding and task runner for Go + React web applications")]
#[command(after_help = "GETTING STARTED:
  1. Create a project:          podium new shop
  2. Create a migration:        podium make:migrate Product
  3. Apply migrations:          podium migrate
  4. Start the dev servers:     podium serve

Run `podium help` to list every command.")]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Command to execute (use `help` to list commands)
    #[arg(value_name = "COMMAND")]
    pub command: Option<String>,

    /// Arguments passed to the command
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

impl Cli {
    /// ディスパッチャーに渡す引数列（0番目はプログラム名、1番目はコマンド名）
    pub fn argv(&self) -> Vec<String> {
        let mut argv = vec![crate::core::naming::BINARY_NAME.to_string()];
        if let Some(command) = &self.command {
            argv.push(command.clone());
            argv.extend(self.args.iter().cloned());
        }
        argv
    }
}
