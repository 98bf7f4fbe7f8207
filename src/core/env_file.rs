// 環境ファイルの構文と環境設定オブジェクト
//
// `.env` 形式（1行1宣言の KEY=VALUE）の行解釈と、読み込み結果を保持する
// Environment を提供します。ファイルI/Oは services::env_loader に集約する。

use std::collections::BTreeMap;

/// 1行の解釈結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvLine {
    /// 空行またはコメント行
    Skip,
    /// `=` を含まない行（黙って読み飛ばす）
    Malformed,
    /// `=` の前が空の宣言
    EmptyKey,
    /// KEY=VALUE 宣言
    Pair(String, String),
}

/// 1行を解釈する
///
/// - 空行（空白のみを含む）と先頭文字が `#` の行はスキップ
/// - 最初の `=` でのみ分割し、キーと値の前後の空白を除去
/// - 値が `"` で始まり `"` で終わる場合、値に含まれる `"` をすべて取り除く
pub fn parse_line(line: &str) -> EnvLine {
    if line.starts_with('#') || line.trim().is_empty() {
        return EnvLine::Skip;
    }

    let Some((raw_key, raw_value)) = line.split_once('=') else {
        return EnvLine::Malformed;
    };

    let key = raw_key.trim();
    if key.is_empty() {
        return EnvLine::EmptyKey;
    }

    EnvLine::Pair(key.to_string(), unquote(raw_value.trim()))
}

// 文字単位の除去なので値の途中の引用符も消える
fn unquote(value: &str) -> String {
    if value.starts_with('"') && value.ends_with('"') {
        value.replace('"', "")
    } else {
        value.to_string()
    }
}

/// 環境設定
///
/// 読み込んだ宣言を保持する設定オブジェクト。プロセス全体の環境変数は変更せず、
/// 必要なハンドラーへ明示的に渡す。
/// プロセス環境へのフォールバックを有効にした場合、ファイルにないキーは
/// 継承した環境変数から参照する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
    process_fallback: bool,
}

impl Environment {
    /// 空の環境設定を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// キーと値の組から作成（後勝ち）
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut env = Self::new();
        for (key, value) in pairs {
            env.set(key, value);
        }
        env
    }

    /// 継承したプロセス環境へのフォールバックを有効にする
    pub fn with_process_fallback(mut self) -> Self {
        self.process_fallback = true;
        self
    }

    /// 値を設定（既存の値は上書き）
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// 値を取得
    pub fn get(&self, key: &str) -> Option<String> {
        match self.vars.get(key) {
            Some(value) => Some(value.clone()),
            None if self.process_fallback => std::env::var(key).ok(),
            None => None,
        }
    }

    /// 値を取得し、未設定または空文字の場合は既定値を返す
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// ポート番号を取得
    ///
    /// 未設定なら既定値、数値として解釈できない場合は警告を出して既定値を返す。
    pub fn port_or(&self, key: &str, default: u16) -> u16 {
        match self.get(key).filter(|value| !value.is_empty()) {
            Some(value) => parse_port_or(&value, default),
            None => default,
        }
    }

    /// ファイルから読み込んだ宣言の数
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// 宣言が空かどうか
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// ファイルから読み込んだ宣言を列挙（子プロセスへ渡す用途）
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// ポート文字列を解釈し、失敗時は警告を出して既定値を返す
pub fn parse_port_or(value: &str, default: u16) -> u16 {
    match value.trim().parse::<u16>() {
        Ok(port) => port,
        Err(_) => {
            tracing::warn!(value, default, "Invalid port number, using default");
            println!("Invalid port number '{}', using default: {}", value, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_pair() {
        assert_eq!(
            parse_line("A=1"),
            EnvLine::Pair("A".to_string(), "1".to_string())
        );
    }

    #[test]
    fn test_skip_comments_and_blank_lines() {
        assert_eq!(parse_line("# comment"), EnvLine::Skip);
        assert_eq!(parse_line(""), EnvLine::Skip);
        assert_eq!(parse_line("   "), EnvLine::Skip);
    }

    #[test]
    fn test_indented_hash_is_not_a_comment() {
        assert_eq!(
            parse_line("  #KEY=value"),
            EnvLine::Pair("#KEY".to_string(), "value".to_string())
        );
        assert_eq!(parse_line("  # just text"), EnvLine::Malformed);
    }

    #[test]
    fn test_split_on_first_equals_only() {
        assert_eq!(
            parse_line("DSN=user:pass@tcp(db)/app?x=1"),
            EnvLine::Pair("DSN".to_string(), "user:pass@tcp(db)/app?x=1".to_string())
        );
    }

    #[test]
    fn test_trim_and_unquote() {
        assert_eq!(
            parse_line("B = \"two\" "),
            EnvLine::Pair("B".to_string(), "two".to_string())
        );
        assert_eq!(
            parse_line("TZ=\"America/Sao_Paulo\""),
            EnvLine::Pair("TZ".to_string(), "America/Sao_Paulo".to_string())
        );
    }

    #[test]
    fn test_unquote_strips_inner_quotes_too() {
        assert_eq!(
            parse_line("GREETING=\"say \"hi\" now\""),
            EnvLine::Pair("GREETING".to_string(), "say hi now".to_string())
        );
    }

    #[test]
    fn test_half_quoted_value_is_kept() {
        assert_eq!(
            parse_line("A=\"open"),
            EnvLine::Pair("A".to_string(), "\"open".to_string())
        );
        // 1文字の `"` は先頭かつ末尾なので空になる
        assert_eq!(
            parse_line("A=\""),
            EnvLine::Pair("A".to_string(), String::new())
        );
    }

    #[test]
    fn test_line_without_equals_is_malformed() {
        assert_eq!(parse_line("JUST_A_WORD"), EnvLine::Malformed);
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(parse_line(" =value"), EnvLine::EmptyKey);
    }

    #[test]
    fn test_environment_later_value_wins() {
        let env = Environment::from_pairs([("A", "1"), ("A", "2")]);
        assert_eq!(env.get("A").as_deref(), Some("2"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_get_or_treats_empty_as_unset() {
        let env = Environment::from_pairs([("APP_ENV", ""), ("APP_HOST", "0.0.0.0")]);
        assert_eq!(env.get_or("APP_ENV", "production"), "production");
        assert_eq!(env.get_or("APP_HOST", "localhost"), "0.0.0.0");
        assert_eq!(env.get_or("MISSING", "fallback"), "fallback");
    }

    #[test]
    fn test_port_or() {
        let env = Environment::from_pairs([("API_PORT", "9001"), ("APP_PORT", "abc")]);
        assert_eq!(env.port_or("API_PORT", 8001), 9001);
        assert_eq!(env.port_or("APP_PORT", 8080), 8080);
        assert_eq!(env.port_or("MISSING", 3000), 3000);
    }

    #[test]
    fn test_without_fallback_ignores_process_env() {
        let env = Environment::new();
        assert_eq!(env.get("PATH"), None);
    }
}
