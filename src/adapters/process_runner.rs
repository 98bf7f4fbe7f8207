// 外部プロセス実行アダプター
//
// モジュールマネージャー（go）、パッケージマネージャー（npm/npx）、開発サーバーなど
// 外部ツールとの唯一の接点。標準出力・標準エラーは継承し、バッファリングしない。

use crate::core::error::ProcessError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// 1回分の外部コマンド呼び出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// 実行ファイル名
    pub program: String,
    /// 引数
    pub args: Vec<String>,
    /// 作業ディレクトリ（Noneなら呼び出し元と同じ）
    pub current_dir: Option<PathBuf>,
    /// 追加で渡す環境変数
    pub envs: Vec<(String, String)>,
}

impl Invocation {
    /// 新しい呼び出しを作成
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            current_dir: None,
            envs: Vec::new(),
        }
    }

    /// 作業ディレクトリを指定
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// 環境変数を追加
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.envs
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// 作業ディレクトリが未指定なら指定する
    pub fn with_default_dir(mut self, dir: &Path) -> Self {
        if self.current_dir.is_none() {
            self.current_dir = Some(dir.to_path_buf());
        }
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// 外部プロセス実行
///
/// 起動できない場合、または非ゼロで終了した場合は失敗を返す。リトライはしない。
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), ProcessError>;
}

impl<T: ProcessRunner + ?Sized> ProcessRunner for &T {
    fn run(&self, invocation: &Invocation) -> Result<(), ProcessError> {
        (**self).run(invocation)
    }
}

/// 実際に子プロセスを起動するランナー
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), ProcessError> {
        debug!(
            command = %invocation,
            dir = ?invocation.current_dir,
            "Running external command"
        );

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }
        for (key, value) in &invocation.envs {
            command.env(key, value);
        }

        let status = command.status().map_err(|source| ProcessError::Spawn {
            command: invocation.to_string(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(ProcessError::ExitStatus {
                command: invocation.to_string(),
                code: status.code(),
            })
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display() {
        let invocation = Invocation::new("npm", ["install", "--prefix", "frontend"]);
        assert_eq!(invocation.to_string(), "npm install --prefix frontend");
    }

    #[test]
    fn test_with_default_dir_keeps_explicit_dir() {
        let explicit = Invocation::new("go", ["mod", "tidy"])
            .current_dir("/explicit")
            .with_default_dir(Path::new("/default"));
        assert_eq!(explicit.current_dir, Some(PathBuf::from("/explicit")));

        let defaulted = Invocation::new("go", ["mod", "tidy"]).with_default_dir(Path::new("/default"));
        assert_eq!(defaulted.current_dir, Some(PathBuf::from("/default")));
    }

    #[test]
    fn test_missing_executable_is_spawn_error() {
        let runner = SystemProcessRunner;
        let error = runner
            .run(&Invocation::new(
                "podium-test-definitely-not-installed",
                Vec::<String>::new(),
            ))
            .unwrap_err();
        assert!(error.is_spawn());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status() {
        let runner = SystemProcessRunner;
        assert!(runner.run(&Invocation::new("true", Vec::<String>::new())).is_ok());

        let error = runner
            .run(&Invocation::new("sh", ["-c", "exit 3"]))
            .unwrap_err();
        assert_eq!(error.exit_code(), Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_current_dir_and_envs_are_applied() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let runner = SystemProcessRunner;
        let invocation = Invocation::new("sh", ["-c", "printf '%s' \"$PODIUM_TEST_VALUE\" > out.txt"])
            .current_dir(temp_dir.path())
            .envs([("PODIUM_TEST_VALUE", "hello")]);

        runner.run(&invocation).unwrap();

        let written = std::fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
        assert_eq!(written, "hello");
    }
}
