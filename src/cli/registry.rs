// コマンドレジストリ
//
// コマンド名から CommandKind への対応表。起動時に一度だけ構築し、以降は読み取り専用。

use std::collections::BTreeMap;
use std::fmt::Write;

/// 登録されているコマンドの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandKind {
    New,
    Install,
    Add,
    Migrate,
    MigrateRollback,
    Serve,
    MakeModel,
    MakeMigration,
    MakeSchema,
}

impl CommandKind {
    /// 表示順のすべてのコマンド
    pub const ALL: [CommandKind; 9] = [
        CommandKind::New,
        CommandKind::Install,
        CommandKind::Add,
        CommandKind::Migrate,
        CommandKind::MigrateRollback,
        CommandKind::Serve,
        CommandKind::MakeModel,
        CommandKind::MakeMigration,
        CommandKind::MakeSchema,
    ];

    /// コマンドラインで使う名前
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::New => "new",
            CommandKind::Install => "install",
            CommandKind::Add => "add",
            CommandKind::Migrate => "migrate",
            CommandKind::MigrateRollback => "migrate:rollback",
            CommandKind::Serve => "serve",
            CommandKind::MakeModel => "make:model",
            CommandKind::MakeMigration => "make:migrate",
            CommandKind::MakeSchema => "make:schema",
        }
    }

    /// help に表示する1行説明
    pub fn description(&self) -> &'static str {
        match self {
            CommandKind::New => "Creates a new project with a default structure.",
            CommandKind::Install => "Installs backend and frontend dependencies.",
            CommandKind::Add => "Adds a new dependency to backend or frontend.",
            CommandKind::Migrate => "Runs the database migrations.",
            CommandKind::MigrateRollback => "Reverts the most recent database migrations.",
            CommandKind::Serve => "Starts the development server for both backend and frontend.",
            CommandKind::MakeModel => "Creates a new model file with GORM support.",
            CommandKind::MakeMigration => "Creates a new migration file.",
            CommandKind::MakeSchema => "Initializes the database schema using GORM.",
        }
    }
}

/// コマンドレジストリ
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, CommandKind>,
}

impl CommandRegistry {
    /// すべての組み込みコマンドを登録したレジストリを作成
    pub fn with_defaults() -> Self {
        Self {
            commands: CommandKind::ALL
                .iter()
                .map(|kind| (kind.name(), *kind))
                .collect(),
        }
    }

    /// 名前からコマンドを引く
    pub fn get(&self, name: &str) -> Option<CommandKind> {
        self.commands.get(name).copied()
    }

    /// 登録されているコマンド名
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    /// 登録されているコマンド（CommandKind::ALL の順）
    pub fn iter(&self) -> impl Iterator<Item = CommandKind> + '_ {
        let mut kinds: Vec<CommandKind> = self.commands.values().copied().collect();
        kinds.sort();
        kinds.into_iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// help の出力
    pub fn help_text(&self) -> String {
        let width = self.names().map(str::len).max().unwrap_or(0);

        let mut text = String::from("Available commands:");
        for kind in self.iter() {
            let _ = write!(
                text,
                "\n- {:<width$}  {}",
                kind.name(),
                kind.description(),
                width = width
            );
        }
        text
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_is_registered() {
        let registry = CommandRegistry::with_defaults();

        assert_eq!(registry.len(), CommandKind::ALL.len());
        for kind in CommandKind::ALL {
            assert_eq!(registry.get(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_name() {
        let registry = CommandRegistry::with_defaults();

        assert_eq!(registry.get("deploy"), None);
        assert_eq!(registry.get("help"), None);
    }

    #[test]
    fn test_help_text_lists_every_command() {
        let registry = CommandRegistry::with_defaults();
        let help = registry.help_text();
        let mut lines = help.lines();

        assert_eq!(lines.next(), Some("Available commands:"));
        let listed: Vec<&str> = lines
            .map(|line| {
                line.trim_start_matches("- ")
                    .split_whitespace()
                    .next()
                    .unwrap()
            })
            .collect();
        let mut registered: Vec<&str> = registry.names().collect();
        let mut listed_sorted = listed.clone();
        listed_sorted.sort_unstable();
        registered.sort_unstable();

        assert_eq!(listed_sorted, registered);
        assert_eq!(listed[0], "new");
    }

    #[test]
    fn test_help_text_includes_descriptions() {
        let help = CommandRegistry::with_defaults().help_text();

        assert!(help.contains("- make:migrate      Creates a new migration file."));
    }
}
