//! 名前照合モジュール
//!
//! 名前ベースの照合は必ず候補1件に解決する。
//! 0件・複数件はどちらもエラーとし、先頭を黙って採用しない。

use crate::error::{Error, Result};

/// 候補が1件であることを検証して返す
///
/// # Arguments
/// * `candidates` - 照合で残った候補
/// * `subject` - 検索対象の説明（エラーメッセージ用）
/// * `pattern` - 検索パターン（エラーメッセージ用）
pub fn exactly_one<T>(candidates: Vec<T>, subject: &str, pattern: &str) -> Result<T> {
    let count = candidates.len();
    let mut iter = candidates.into_iter();

    match (iter.next(), count) {
        (Some(found), 1) => Ok(found),
        (None, _) => Err(Error::NoMatch {
            subject: subject.to_string(),
            pattern: pattern.to_string(),
        }),
        (Some(_), _) => Err(Error::AmbiguousMatch {
            subject: subject.to_string(),
            pattern: pattern.to_string(),
            count,
        }),
    }
}
