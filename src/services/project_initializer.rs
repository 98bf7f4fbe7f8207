// プロジェクト初期化サービス
//
// プロジェクトのルートディレクトリ作成、Goモジュール初期化、
// バックエンドのディレクトリ構成作成を行う。

use crate::adapters::process_runner::{Invocation, ProcessRunner};
use crate::core::naming::{BACKEND_DIR, FRONTEND_DIR};
use crate::services::provisioner::{
    ProvisionFailure, ProvisionReport, ProvisionStep, Provisioner, ProvisioningPlan, StepAction,
};
use colored::Colorize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// バックエンドのディレクトリ構成（backend/ からの相対）
pub const BACKEND_LAYOUT: &[&str] = &[
    "cmd",
    "pkg",
    "internal",
    "configs",
    "migrations",
    "routes",
    "controllers",
    "models",
    "middleware",
];

/// フロントエンドの追加ディレクトリ構成（frontend/ からの相対）
pub const FRONTEND_LAYOUT: &[&str] = &[
    "public",
    "src/components",
    "src/pages",
    "src/services",
    "src/styles",
    "src/utils",
    "src/assets",
];

/// 初期化エラー
#[derive(Debug, Error)]
pub enum InitError {
    /// Project name is empty
    #[error("Project name must not be empty")]
    EmptyName,

    /// A filesystem entry with the project name exists
    #[error("A file or directory named '{}' already exists", .path.display())]
    AlreadyExists {
        /// 衝突したパス
        path: PathBuf,
    },

    /// A provisioning step failed
    #[error(transparent)]
    Provision(#[from] ProvisionFailure),
}

/// プロジェクト初期化サービス
#[derive(Debug, Clone)]
pub struct ProjectInitializer<R> {
    runner: R,
}

impl<R: ProcessRunner> ProjectInitializer<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// プロジェクトを初期化する
    ///
    /// ルートディレクトリ作成後のステップが失敗した場合、プロジェクトツリー全体を削除する。
    pub fn initialize(
        &self,
        base_dir: &Path,
        project_name: &str,
    ) -> Result<ProvisionReport, InitError> {
        self.initialize_with(base_dir, project_name, Vec::new())
    }

    /// 初期化ステップに続けて追加のステップを実行する
    ///
    /// 追加のステップが失敗した場合も同じくプロジェクトツリー全体を削除する。
    pub fn initialize_with(
        &self,
        base_dir: &Path,
        project_name: &str,
        extra_steps: impl IntoIterator<Item = ProvisionStep>,
    ) -> Result<ProvisionReport, InitError> {
        let plan = plan(base_dir, project_name)?.extend(extra_steps);

        println!(
            "{} Creating new project: {}",
            "->".blue(),
            project_name.green()
        );
        Ok(Provisioner::new(&self.runner).execute(&plan)?)
    }
}

/// 事前条件を検証し、プロジェクトのルートパスを返す
///
/// どちらの検査もファイルシステムを変更しない。シンボリックリンクも
/// 既存エントリとして扱う。
pub fn validate(base_dir: &Path, project_name: &str) -> Result<PathBuf, InitError> {
    if project_name.is_empty() {
        return Err(InitError::EmptyName);
    }

    let root = base_dir.join(project_name);
    if root.symlink_metadata().is_ok() {
        return Err(InitError::AlreadyExists { path: root });
    }

    Ok(root)
}

/// 初期化ステップの計画を作成
fn plan(base_dir: &Path, project_name: &str) -> Result<ProvisioningPlan, InitError> {
    let root = validate(base_dir, project_name)?;

    Ok(ProvisioningPlan::new(root)
        .step(
            format!("Creating project directory '{}'", project_name),
            StepAction::CreateRoot,
        )
        .step(
            "Initializing Go module",
            StepAction::Run(Invocation::new("go", ["mod", "init", project_name])),
        )
        .step(
            "Creating backend folders",
            StepAction::CreateDirs(layout(BACKEND_DIR, BACKEND_LAYOUT)),
        ))
}

/// フロントエンドの追加ディレクトリを作成するステップ
pub fn frontend_layout_step() -> ProvisionStep {
    ProvisionStep {
        label: "Creating frontend folders".to_string(),
        action: StepAction::CreateDirs(layout(FRONTEND_DIR, FRONTEND_LAYOUT)),
    }
}

fn layout(base: &str, entries: &[&str]) -> Vec<PathBuf> {
    entries
        .iter()
        .map(|entry| Path::new(base).join(entry))
        .collect()
}
