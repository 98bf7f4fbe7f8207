// 名前の大文字小文字変換
//
// ユーザー入力からファイル名（snake_case）と型名（PascalCase）を導出する。

use regex::Regex;
use std::sync::LazyLock;

static CASE_BOUNDARY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([a-z0-9])([A-Z])").expect("valid case boundary regex"));

/// snake_caseに変換する
///
/// 小文字または数字の直後に大文字が続く位置に `_` を挿入し、全体を小文字にする。
///
/// ```
/// use podium::core::naming_case::to_snake_case;
///
/// assert_eq!(to_snake_case("UserProfile"), "user_profile");
/// ```
pub fn to_snake_case(input: &str) -> String {
    CASE_BOUNDARY_REGEX
        .replace_all(input, "${1}_${2}")
        .to_lowercase()
}

/// PascalCaseに変換する
///
/// `_` で分割し、各セグメントの先頭を大文字・残りを小文字にして連結する。
/// 連続した `_` から生じる空セグメントは何も寄与しない。
///
/// ```
/// use podium::core::naming_case::to_pascal_case;
///
/// assert_eq!(to_pascal_case("user_profile"), "UserProfile");
/// ```
pub fn to_pascal_case(input: &str) -> String {
    input.split('_').map(title_case).collect()
}

/// 任意の識別子を型名として使える形に正規化する
pub fn to_type_name(input: &str) -> String {
    to_pascal_case(&to_snake_case(input))
}

/// GORMの既定の命名規則に合わせたテーブル名に変換する
///
/// snake_caseにした上で最後の単語を複数形にする。不規則変化は扱わない。
///
/// ```
/// use podium::core::naming_case::to_table_name;
///
/// assert_eq!(to_table_name("BlogPost"), "blog_posts");
/// ```
pub fn to_table_name(input: &str) -> String {
    pluralize(&to_snake_case(input))
}

fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    if let Some(stem) = word.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{}ies", stem);
        }
    }

    if word.ends_with(['s', 'x', 'z']) || word.ends_with("ch") || word.ends_with("sh") {
        format!("{}es", word)
    } else {
        format!("{}s", word)
    }
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
