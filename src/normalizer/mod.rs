//! 品目説明の正規化モジュール
//!
//! 単価表・照会シートの説明文を比較しやすい形に揃える。
//!
//! ## 処理フロー
//! 1. 小文字化・前後の空白除去
//! 2. 連続する空白を1つにまとめる
//! 3. 単位・略語の表記揺れを統一（変化がなくなるまで繰り返す）

use regex::Regex;

/// 表記揺れの置換（この順序で適用）
const REWRITES: &[(&str, &str)] = &[
    ("mm.", "mm"),
    ("cm.", "cm"),
    ("r.c.c.", "rcc"),
    ("reinforced cement concrete", "rcc"),
];

/// 説明文を正規化する
///
/// 空文字列には空文字列を返す。結果に再度適用しても変化しない。
pub fn normalize_description(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    lazy_static::lazy_static! {
        static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    }

    let lowered = raw.to_lowercase();
    let mut text = WHITESPACE_RE.replace_all(lowered.trim(), " ").into_owned();

    // 置換で新たに "mm." などが現れることがあるため収束するまで適用
    loop {
        let rewritten = apply_rewrites(&text);
        if rewritten == text {
            return text;
        }
        text = rewritten;
    }
}

fn apply_rewrites(text: &str) -> String {
    REWRITES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}
