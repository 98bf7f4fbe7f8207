// Core Domain
// 環境ファイルの構文、名前変換、マイグレーションモデル、テンプレートの純粋なロジック

pub mod config;
pub mod env_file;
pub mod error;
pub mod migration;
pub mod naming;
pub mod naming_case;
pub mod templates;
