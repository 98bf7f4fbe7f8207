// make:modelコマンドハンドラー
//
// backend/models/<snake_case>.go にGORMモデルを生成します。

use crate::cli::commands::Outcome;
use crate::core::naming::MODELS_DIR;
use crate::core::naming_case::{to_snake_case, to_type_name};
use crate::core::templates;
use crate::services::file_writer::write_new_file;
use anyhow::Result;
use std::path::PathBuf;

/// make:modelコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct MakeModelCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// モデル名
    pub name: Option<String>,
}

impl MakeModelCommand {
    pub fn from_args(project_path: PathBuf, args: &[String]) -> Self {
        Self {
            project_path,
            name: args.first().cloned(),
        }
    }
}

/// make:modelコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct MakeModelCommandHandler;

impl MakeModelCommandHandler {
    pub fn new() -> Self {
        Self
    }

    /// make:modelコマンドを実行
    pub fn execute(&self, command: &MakeModelCommand) -> Result<Outcome> {
        let Some(name) = command.name.as_deref().filter(|name| !name.is_empty()) else {
            return Ok(Outcome::Reported("Please provide a model name.".to_string()));
        };

        let snake = to_snake_case(name);
        let type_name = to_type_name(name);
        let path = command
            .project_path
            .join(MODELS_DIR)
            .join(format!("{}.go", snake));

        match write_new_file(&path, &templates::model(&type_name)) {
            Ok(()) => Ok(Outcome::Completed(format!(
                "Model file created: {}",
                path.display()
            ))),
            Err(e) => Ok(Outcome::Reported(format!(
                "Failed to create model file: {}",
                e
            ))),
        }
    }
}
