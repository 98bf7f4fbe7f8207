// Services Layer
// 環境ファイル読み込み、プロジェクトのプロビジョニング、マイグレーション読み込みを担うサービス層

pub mod env_loader;
pub mod file_writer;
pub mod migration_loader;
pub mod project_initializer;
pub mod provisioner;
