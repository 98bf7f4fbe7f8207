// serveコマンドハンドラー
//
// 開発サーバーを起動します。
// - APIポートにプレースホルダーHTTPサーバーをバックグラウンドで起動
// - frontend/package.json があれば `npm start` をフォアグラウンドで実行
// フロントエンドが無い場合は報告し、Ctrl-C までプレースホルダーだけを提供します。

use crate::adapters::placeholder_server::PlaceholderServer;
use crate::adapters::process_runner::{Invocation, ProcessRunner, SystemProcessRunner};
use crate::cli::command_context::CommandContext;
use crate::cli::commands::Outcome;
use crate::core::env_file::{parse_port_or, Environment};
use crate::core::naming::{FRONTEND_DIR, FRONTEND_MARKER};
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info};

/// 既定のホスト
pub const DEFAULT_HOST: &str = "localhost";
/// フロントエンド開発サーバーの既定ポート
pub const DEFAULT_APP_PORT: u16 = 8080;
/// バックエンド（プレースホルダー）の既定ポート
pub const DEFAULT_API_PORT: u16 = 8001;
/// APP_ENV の既定値
pub const DEFAULT_APP_ENV: &str = "production";

/// serveコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct ServeCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// ホスト（未指定なら APP_HOST）
    pub host: Option<String>,
    /// APIポート（未指定なら API_PORT）
    pub port: Option<String>,
}

impl ServeCommand {
    pub fn from_args(project_path: PathBuf, args: &[String]) -> Self {
        Self {
            project_path,
            host: args.first().cloned(),
            port: args.get(1).cloned(),
        }
    }
}

/// 解決済みの起動設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeSettings {
    pub host: String,
    pub api_port: u16,
    pub app_port: u16,
    pub app_env: String,
}

impl ServeSettings {
    /// 引数、環境設定、既定値の順に解決する
    pub fn resolve(command: &ServeCommand, env: &Environment) -> Self {
        let host = command
            .host
            .clone()
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| env.get_or("APP_HOST", DEFAULT_HOST));
        let api_port = match command.port.as_deref().filter(|port| !port.is_empty()) {
            Some(port) => parse_port_or(port, DEFAULT_API_PORT),
            None => env.port_or("API_PORT", DEFAULT_API_PORT),
        };

        Self {
            host,
            api_port,
            app_port: env.port_or("APP_PORT", DEFAULT_APP_PORT),
            app_env: env.get_or("APP_ENV", DEFAULT_APP_ENV),
        }
    }

    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

/// フロントエンドプロジェクトの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontendStatus {
    /// frontend/ が無い
    MissingDirectory,
    /// frontend/package.json が無い
    MissingPackageJson,
    /// 開発サーバーを起動できる
    Present,
}

impl FrontendStatus {
    /// プロジェクトルートから状態を判定
    pub fn detect(project_path: &Path) -> Self {
        if !project_path.join(FRONTEND_DIR).is_dir() {
            FrontendStatus::MissingDirectory
        } else if !project_path.join(FRONTEND_MARKER).is_file() {
            FrontendStatus::MissingPackageJson
        } else {
            FrontendStatus::Present
        }
    }

    /// 起動できない場合の報告メッセージ
    pub fn message(&self) -> Option<&'static str> {
        match self {
            FrontendStatus::MissingDirectory => Some(
                "Frontend directory not found. Please ensure the frontend project is set up correctly.",
            ),
            FrontendStatus::MissingPackageJson => Some(
                "package.json not found in the frontend directory. Please initialize a React project in the 'frontend' folder.",
            ),
            FrontendStatus::Present => None,
        }
    }
}

/// serveコマンドハンドラー
#[derive(Debug, Clone)]
pub struct ServeCommandHandler<R = SystemProcessRunner> {
    runner: R,
}

impl ServeCommandHandler {
    pub fn new() -> Self {
        Self::with_runner(SystemProcessRunner)
    }
}

impl Default for ServeCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ServeCommandHandler<R>
where
    R: ProcessRunner + Clone + Send + 'static,
{
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// serveコマンドを実行（フロントエンドが無い場合は Ctrl-C まで待機）
    pub async fn execute(&self, command: &ServeCommand) -> Result<Outcome> {
        let session = self.start(command).await?;
        session
            .run_until(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    debug!(error = %e, "Failed to listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            })
            .await
    }

    /// .env を読み込み、プレースホルダーサーバーを起動する
    ///
    /// バインドに失敗した場合はエラー。
    pub async fn start(&self, command: &ServeCommand) -> Result<ServeSession<R>> {
        let context = CommandContext::load(command.project_path.clone())?;
        let settings = ServeSettings::resolve(command, &context.env);

        if settings.is_development() {
            println!(
                "Starting the development server on {}:{} (frontend) and {}:{} (backend)...",
                settings.host, settings.app_port, settings.host, settings.api_port
            );
        }

        let server = PlaceholderServer::bind(&settings.host, settings.api_port)
            .await
            .with_context(|| {
                format!(
                    "Failed to start backend server on {}:{}",
                    settings.host, settings.api_port
                )
            })?;
        let address = server.local_addr();
        println!("Backend server is running at http://{}", address);

        Ok(ServeSession {
            frontend: FrontendStatus::detect(&context.project_path),
            settings,
            address,
            listener: server.spawn(),
            runner: self.runner.clone(),
            context,
        })
    }
}

/// 起動済みのserveセッション
#[derive(Debug)]
pub struct ServeSession<R> {
    settings: ServeSettings,
    address: SocketAddr,
    frontend: FrontendStatus,
    listener: JoinHandle<io::Result<()>>,
    runner: R,
    context: CommandContext,
}

impl<R> ServeSession<R>
where
    R: ProcessRunner + Clone + Send + 'static,
{
    /// プレースホルダーサーバーのアドレス
    pub fn local_addr(&self) -> SocketAddr {
        self.address
    }

    pub fn settings(&self) -> &ServeSettings {
        &self.settings
    }

    pub fn frontend(&self) -> FrontendStatus {
        self.frontend
    }

    /// フロントエンド開発サーバーの起動コマンド
    ///
    /// 読み込んだ環境設定を子プロセスに渡す。
    pub fn frontend_invocation(&self) -> Invocation {
        Invocation::new(
            "npm",
            [
                "start".to_string(),
                "--prefix".to_string(),
                FRONTEND_DIR.to_string(),
                "--".to_string(),
                "--port".to_string(),
                self.settings.app_port.to_string(),
            ],
        )
        .current_dir(&self.context.project_path)
        .envs(self.context.env.iter())
    }

    /// セッションを実行する
    ///
    /// フロントエンドがあれば開発サーバーの終了まで、無ければ `shutdown` が
    /// 完了するまでプレースホルダーサーバーを提供する。
    /// プレースホルダーサーバーが停止した場合はエラー。
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<Outcome>
    where
        F: Future<Output = ()>,
    {
        if let Some(message) = self.frontend.message() {
            println!("{}", message.yellow());
            println!("Serving the backend placeholder only. Press Ctrl+C to stop.");

            return tokio::select! {
                result = &mut self.listener => Err(listener_stopped(result)),
                _ = shutdown => {
                    self.listener.abort();
                    info!("Shutting down placeholder backend");
                    Ok(Outcome::Completed("Server stopped.".to_string()))
                }
            };
        }

        println!("{} Starting frontend server...", "->".blue());
        let invocation = self.frontend_invocation();
        let runner = self.runner.clone();
        let frontend = tokio::task::spawn_blocking(move || runner.run(&invocation));

        tokio::select! {
            result = &mut self.listener => Err(listener_stopped(result)),
            result = frontend => {
                self.listener.abort();
                match result {
                    Ok(Ok(())) => Ok(Outcome::Completed("Frontend server stopped.".to_string())),
                    Ok(Err(e)) => Ok(Outcome::Reported(format!(
                        "Failed to start frontend development server: {}",
                        e
                    ))),
                    Err(e) => Err(anyhow!("Frontend server task failed: {}", e)),
                }
            }
        }
    }
}

fn listener_stopped(result: Result<io::Result<()>, JoinError>) -> anyhow::Error {
    match result {
        Ok(Ok(())) => anyhow!("Backend server stopped unexpectedly"),
        Ok(Err(e)) => anyhow::Error::new(e).context("Backend server failed"),
        Err(e) => anyhow!("Backend server task failed: {}", e),
    }
}
