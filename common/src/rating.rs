//! 耐火等級トークン
//!
//! 数値の耐火等級（時間）を線種名検索用の文字列に変換し、
//! 等級トークンと区分（Code/Client）の両方を含む線種を1件選択する。

use crate::error::{Error, Result};
use crate::matcher::exactly_one;
use crate::types::Named;
use std::fmt;

/// 耐火等級の区分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingCategory {
    /// 法規要求
    Code,
    /// 施主要望
    Client,
}

impl RatingCategory {
    /// 線種名に含まれる区分フレーズを返す
    pub fn phrase<'a>(&self, code_phrase: &'a str, client_phrase: &'a str) -> &'a str {
        match self {
            RatingCategory::Code => code_phrase,
            RatingCategory::Client => client_phrase,
        }
    }
}

impl fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingCategory::Code => write!(f, "Code"),
            RatingCategory::Client => write!(f, "Client"),
        }
    }
}

/// 数値を最短の往復可能な10進表記にする（末尾のゼロと小数点は付かない）
///
/// # Examples
/// ```
/// use snha_tools_common::rating::format_rating;
///
/// assert_eq!(format_rating(2.0), "2");
/// assert_eq!(format_rating(1.5), "1.5");
/// assert_eq!(format_rating(0.0000001), "0.0000001");
/// ```
pub fn format_rating(value: f64) -> String {
    value.to_string()
}

/// 等級トークン（例: "2HR" + Client）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingToken {
    pub token: String,
    pub category: RatingCategory,
}

impl RatingToken {
    /// 等級値からトークンを作る
    ///
    /// 値 0 は未設定の番兵値として `UnsetValue` を返す。
    pub fn from_value(value: f64, suffix: &str, category: RatingCategory, field: &str) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::Validation(format!("{} is not a finite number: {}", field, value)));
        }
        if value == 0.0 {
            return Err(Error::UnsetValue {
                field: field.to_string(),
            });
        }

        Ok(Self {
            token: format!("{}{}", format_rating(value), suffix),
            category,
        })
    }
}

impl fmt::Display for RatingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.token, self.category)
    }
}

/// トークンと区分フレーズの両方を名前に含む線種を1件選ぶ
pub fn select_style<'a, S: Named>(
    styles: &'a [S],
    token: &RatingToken,
    category_phrase: &str,
) -> Result<&'a S> {
    let candidates: Vec<&S> = styles
        .iter()
        .filter(|s| s.name().contains(token.token.as_str()) && s.name().contains(category_phrase))
        .collect();

    exactly_one(
        candidates,
        "line styles",
        &format!("{} + {}", token.token, category_phrase),
    )
}
