// ログ出力の初期化
//
// tracing のイベントを標準エラーへ出力する。ユーザー向けの進捗表示は標準出力の println! で行う。

use crate::core::naming::LOG_ENV_VAR;
use tracing_subscriber::EnvFilter;

/// 既定のログレベル
const DEFAULT_DIRECTIVE: &str = "warn";

/// --verbose 指定時のログレベル
const VERBOSE_DIRECTIVE: &str = "debug";

/// ログフィルターを作成
///
/// PODIUM_LOG が設定されていればそれを優先し、無ければ verbose に応じて決める。
pub fn build_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        VERBOSE_DIRECTIVE
    } else {
        DEFAULT_DIRECTIVE
    };

    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// グローバルサブスクライバーを登録（2回目以降の呼び出しは無視）
pub fn init(verbose: bool, ansi: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .try_init();
}
