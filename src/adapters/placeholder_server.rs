// バックエンドのプレースホルダーHTTPサーバー
//
// 生成したプロジェクトのバックエンドがまだ無い段階で、APIポートに
// 固定メッセージを返すリスナーを立てる。

use axum::Router;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

/// すべてのリクエストに返す本文
pub const PLACEHOLDER_BODY: &str = "Backend server is running!";

/// 任意のパス・メソッドに固定メッセージを返すルーター
pub fn router() -> Router {
    Router::new().fallback(|| async { PLACEHOLDER_BODY })
}

/// バインド済みのプレースホルダーサーバー
///
/// バインドとリクエスト処理を分けることで、ポート使用中などの失敗を
/// 処理開始前に呼び出し元へ返す。
#[derive(Debug)]
pub struct PlaceholderServer {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl PlaceholderServer {
    /// 指定アドレスにバインドする
    pub async fn bind(host: &str, port: u16) -> io::Result<Self> {
        let listener = TcpListener::bind((host, port)).await?;
        let local_addr = listener.local_addr()?;
        info!(%local_addr, "Placeholder backend listening");
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// 実際にバインドされたアドレス（ポート0指定時の解決結果を含む）
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// バックグラウンドタスクとしてリクエスト処理を開始
    ///
    /// タスクはリスナーが失敗するか、ハンドルがabortされるまで終了しない。
    pub fn spawn(self) -> JoinHandle<io::Result<()>> {
        tokio::spawn(async move { axum::serve(self.listener, router()).await })
    }
}
