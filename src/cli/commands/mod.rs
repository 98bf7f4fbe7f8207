// コマンドハンドラー層
// 各CLIコマンドの実装

pub mod add;
pub mod install;
pub mod make_migration;
pub mod make_model;
pub mod make_schema;
pub mod migrate;
pub mod new;
pub mod rollback;
pub mod serve;

/// コマンドの実行結果
///
/// 致命的なエラーは `Err` で返し、終了コード1で終了する。
/// ここに含まれる結果はいずれも終了コード0。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 正常終了（通常色で表示）
    Completed(String),
    /// ユーザーに報告して終了した失敗（警告色で表示）
    Reported(String),
}

impl Outcome {
    pub fn message(&self) -> &str {
        match self {
            Outcome::Completed(message) | Outcome::Reported(message) => message,
        }
    }

    pub fn is_reported(&self) -> bool {
        matches!(self, Outcome::Reported(_))
    }
}
