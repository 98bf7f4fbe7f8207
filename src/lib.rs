// Podiumライブラリのエントリーポイント
//
// モジュール構造:
// - cli: CLIレイヤー（引数の受付、コマンドレジストリとディスパッチ、各コマンドハンドラー）
// - core: ドメインモデル（環境ファイル構文、名前変換、マイグレーション、テンプレート、エラー）
// - adapters: 外部プロセス、データベース、HTTPリスナーへのアクセス
// - services: 環境ファイル読み込み、プロビジョニング、マイグレーション読み込み

pub mod adapters;
pub mod cli;
pub mod core;
pub mod logging;
pub mod services;
