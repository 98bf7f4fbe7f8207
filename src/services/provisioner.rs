// プロビジョニング実行とロールバック
//
// プロジェクト作成を「ステップの列」として表現し、順番に実行する。
// 完了したステップは取り消し操作とともにジャーナルへ記録し、途中で失敗した場合は
// 記録と逆順に取り消す。取り消しの失敗は報告するだけでエラーにはしない。

use crate::adapters::process_runner::{Invocation, ProcessRunner};
use crate::core::error::{IoError, ProvisionError};
use crate::services::file_writer::write_new_file;
use colored::Colorize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// ステップの操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// ルートディレクトリを作成（非再帰、既存ならエラー）
    CreateRoot,
    /// ルートからの相対パスのディレクトリを再帰的に作成
    CreateDirs(Vec<PathBuf>),
    /// 外部コマンドを実行（作業ディレクトリ未指定ならルート）
    Run(Invocation),
    /// ルートからの相対パスに新規ファイルを書き込む
    WriteFile { path: PathBuf, contents: String },
}

/// 名前付きのステップ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionStep {
    pub label: String,
    pub action: StepAction,
}

/// プロビジョニング計画
///
/// ルートディレクトリと、そこを起点に実行するステップの列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningPlan {
    root: PathBuf,
    steps: Vec<ProvisionStep>,
}

impl ProvisioningPlan {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            steps: Vec::new(),
        }
    }

    /// ステップを末尾に追加
    pub fn step(mut self, label: impl Into<String>, action: StepAction) -> Self {
        self.steps.push(ProvisionStep {
            label: label.into(),
            action,
        });
        self
    }

    /// 別の計画のステップを末尾に連結
    pub fn extend(mut self, steps: impl IntoIterator<Item = ProvisionStep>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn steps(&self) -> &[ProvisionStep] {
        &self.steps
    }
}

/// 完了したステップの取り消し操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoAction {
    /// ディレクトリツリーを削除
    RemoveTree(PathBuf),
    /// ファイルを削除
    RemoveFile(PathBuf),
}

impl UndoAction {
    /// 取り消しを実行
    ///
    /// 対象が既に存在しない場合は成功とみなす。
    pub fn apply(&self) -> Result<(), IoError> {
        let (path, result) = match self {
            UndoAction::RemoveTree(path) => (path, fs::remove_dir_all(path)),
            UndoAction::RemoveFile(path) => (path, fs::remove_file(path)),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(IoError::Remove {
                path: path.display().to_string(),
                cause: e.to_string(),
            }),
        }
    }
}

/// 完了したステップとその取り消し操作の記録
#[derive(Debug, Default)]
pub struct Journal {
    entries: Vec<(String, Option<UndoAction>)>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// 完了したステップを記録（外部コマンドなど取り消し操作がない場合はNone）
    pub fn record(&mut self, label: impl Into<String>, undo: Option<UndoAction>) {
        self.entries.push((label.into(), undo));
    }

    /// 完了したステップのラベル（実行順）
    pub fn completed(&self) -> Vec<String> {
        self.entries.iter().map(|(label, _)| label.clone()).collect()
    }

    /// 記録と逆順に取り消しを実行
    pub fn rollback(self) -> RollbackReport {
        let mut report = RollbackReport::default();

        for (label, undo) in self.entries.into_iter().rev() {
            let Some(undo) = undo else {
                continue;
            };
            debug!(step = %label, undo = ?undo, "Rolling back step");
            match undo.apply() {
                Ok(()) => report.undone.push(label),
                Err(e) => {
                    warn!(step = %label, error = %e, "Rollback action failed");
                    report.failures.push(e);
                }
            }
        }

        report
    }
}

/// ロールバック結果
#[derive(Debug, Default)]
pub struct RollbackReport {
    /// 取り消しに成功したステップ（取り消し順）
    pub undone: Vec<String>,
    /// 取り消しに失敗した操作
    pub failures: Vec<IoError>,
}

impl RollbackReport {
    /// すべての取り消しに成功したかどうか
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 成功時の実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub completed: Vec<String>,
}

/// 失敗時の実行結果
///
/// 失敗したステップ、原因、それまでに完了していたステップ、ロールバック結果を持つ。
#[derive(Debug, Error)]
#[error("step '{step}' failed: {source}")]
pub struct ProvisionFailure {
    pub step: String,
    #[source]
    pub source: ProvisionError,
    pub completed: Vec<String>,
    pub rollback: RollbackReport,
}

/// プロビジョニング実行器
#[derive(Debug, Clone)]
pub struct Provisioner<R> {
    runner: R,
}

impl<R: ProcessRunner> Provisioner<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// 計画を順番に実行する
    ///
    /// 最初に失敗したステップで停止し、それまでに完了したステップを取り消す。
    pub fn execute(&self, plan: &ProvisioningPlan) -> Result<ProvisionReport, ProvisionFailure> {
        let mut journal = Journal::new();

        for step in plan.steps() {
            println!("{} {}", "->".blue(), step.label);
            debug!(step = %step.label, root = ?plan.root(), "Running provisioning step");

            match self.run_step(plan.root(), &step.action) {
                Ok(undo) => journal.record(&step.label, undo),
                Err(source) => {
                    let completed = journal.completed();
                    let rollback = journal.rollback();
                    return Err(ProvisionFailure {
                        step: step.label.clone(),
                        source,
                        completed,
                        rollback,
                    });
                }
            }
        }

        Ok(ProvisionReport {
            completed: journal.completed(),
        })
    }

    fn run_step(
        &self,
        root: &Path,
        action: &StepAction,
    ) -> Result<Option<UndoAction>, ProvisionError> {
        match action {
            StepAction::CreateRoot => {
                fs::create_dir(root).map_err(|e| match e.kind() {
                    ErrorKind::AlreadyExists => IoError::AlreadyExists {
                        path: root.display().to_string(),
                    },
                    _ => IoError::DirectoryCreate {
                        path: root.display().to_string(),
                        cause: e.to_string(),
                    },
                })?;
                Ok(Some(UndoAction::RemoveTree(root.to_path_buf())))
            }
            StepAction::CreateDirs(dirs) => {
                for dir in dirs {
                    let path = root.join(dir);
                    fs::create_dir_all(&path).map_err(|e| IoError::DirectoryCreate {
                        path: path.display().to_string(),
                        cause: e.to_string(),
                    })?;
                }
                // ルートの削除で取り消される
                Ok(None)
            }
            StepAction::Run(invocation) => {
                self.runner
                    .run(&invocation.clone().with_default_dir(root))?;
                Ok(None)
            }
            StepAction::WriteFile { path, contents } => {
                let path = root.join(path);
                write_new_file(&path, contents)?;
                Ok(Some(UndoAction::RemoveFile(path)))
            }
        }
    }
}
