// make:schemaコマンドハンドラー
//
// backend/configs/database.go にデータベース接続の初期化コードを生成します。

use crate::cli::commands::Outcome;
use crate::core::naming::CONFIGS_DIR;
use crate::core::templates;
use crate::services::file_writer::write_new_file;
use anyhow::Result;
use std::path::PathBuf;

/// 生成するファイル名
const SCHEMA_FILE: &str = "database.go";

/// make:schemaコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct MakeSchemaCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
}

/// make:schemaコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct MakeSchemaCommandHandler;

impl MakeSchemaCommandHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, command: &MakeSchemaCommand) -> Result<Outcome> {
        let path = command.project_path.join(CONFIGS_DIR).join(SCHEMA_FILE);

        match write_new_file(&path, &templates::schema()) {
            Ok(()) => Ok(Outcome::Completed(format!(
                "Schema file created: {}",
                path.display()
            ))),
            Err(e) => Ok(Outcome::Reported(format!(
                "Failed to create schema file: {}",
                e
            ))),
        }
    }
}
