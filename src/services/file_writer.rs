// 生成ファイルの書き込み
//
// 既存ファイルは上書きせず、親ディレクトリも作成しない。

use crate::core::error::IoError;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

/// 新しいファイルを作成して内容を書き込む
///
/// # Errors
///
/// * `IoError::AlreadyExists` - 同じパスにファイルが既に存在する
/// * `IoError::FileNotFound` - 親ディレクトリが存在しない
/// * `IoError::FileWrite` - その他の書き込み失敗
pub fn write_new_file(path: &Path, contents: &str) -> Result<(), IoError> {
    let display = path.display().to_string();

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => IoError::AlreadyExists {
                path: display.clone(),
            },
            ErrorKind::NotFound => IoError::FileNotFound {
                path: path
                    .parent()
                    .map(|parent| parent.display().to_string())
                    .unwrap_or_else(|| display.clone()),
            },
            _ => IoError::FileWrite {
                path: display.clone(),
                cause: e.to_string(),
            },
        })?;

    file.write_all(contents.as_bytes())
        .map_err(|e| IoError::FileWrite {
            path: display,
            cause: e.to_string(),
        })
}
