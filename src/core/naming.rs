// 命名ポリシー
//
// アプリケーション名と、生成・参照するプロジェクト内パスの単一ソースを提供します。

/// 現行アプリケーション名
pub const APP_NAME: &str = "podium";

/// バイナリ名
pub const BINARY_NAME: &str = "podium";

/// ログフィルタを上書きする環境変数
pub const LOG_ENV_VAR: &str = "PODIUM_LOG";

/// 既定の環境ファイル名（プロジェクトルート直下）
pub const ENV_FILE: &str = ".env";

/// バックエンドディレクトリ
pub const BACKEND_DIR: &str = "backend";

/// フロントエンドディレクトリ
pub const FRONTEND_DIR: &str = "frontend";

/// フロントエンドプロジェクトのマーカーファイル
pub const FRONTEND_MARKER: &str = "frontend/package.json";

/// フロントエンド用の環境ファイル
pub const FRONTEND_ENV_FILE: &str = "frontend/.env";

/// マイグレーションディレクトリ
pub const MIGRATIONS_DIR: &str = "backend/migrations";

/// モデルディレクトリ
pub const MODELS_DIR: &str = "backend/models";

/// 設定ディレクトリ
pub const CONFIGS_DIR: &str = "backend/configs";

/// マイグレーション履歴テーブル
pub const MIGRATION_TABLE: &str = "schema_migrations";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_names() {
        assert_eq!(APP_NAME, "podium");
        assert_eq!(BINARY_NAME, APP_NAME);
        assert_eq!(ENV_FILE, ".env");
    }

    #[test]
    fn test_frontend_paths_are_under_frontend_dir() {
        assert!(FRONTEND_MARKER.starts_with(FRONTEND_DIR));
        assert!(FRONTEND_ENV_FILE.starts_with(FRONTEND_DIR));
        assert!(MIGRATIONS_DIR.starts_with(BACKEND_DIR));
    }
}
