// 環境ファイルローダー
//
// `.env` ファイルを1行ずつ読み込み、Environment を構築する。

use crate::core::env_file::{parse_line, EnvLine, Environment};
use crate::core::error::EnvFileError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// 環境ファイルを読み込む
///
/// # Arguments
///
/// * `path` - `.env` ファイルのパス
///
/// # Returns
///
/// 読み込んだ宣言を保持する Environment。同じキーが複数回現れた場合は後勝ち。
/// `=` を含まない行は読み飛ばす。
pub fn load(path: &Path) -> Result<Environment, EnvFileError> {
    let file = File::open(path).map_err(|source| EnvFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut env = Environment::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|source| EnvFileError::Read {
            path: path.to_path_buf(),
            line: line_number,
            source,
        })?;

        match parse_line(&line) {
            EnvLine::Pair(key, value) => env.set(key, value),
            EnvLine::EmptyKey => {
                return Err(EnvFileError::EmptyKey {
                    path: path.to_path_buf(),
                    line: line_number,
                })
            }
            EnvLine::Malformed => {
                debug!(line = line_number, "Skipping .env line without '='");
            }
            EnvLine::Skip => {}
        }
    }

    debug!(path = ?path, variables = env.len(), "Loaded environment file");
    Ok(env)
}
