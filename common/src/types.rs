//! 共通の型定義
//!
//! ホストモデルから読み出した要素・パラメータを表す値型。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 要素ID（ホストモデル内で一意）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ElementId {
    fn from(value: u64) -> Self {
        ElementId(value)
    }
}

/// 名前を持つ要素（線種など）
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

impl Named for &str {
    fn name(&self) -> &str {
        self
    }
}

/// パラメータ値（型付き、未設定は None）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum ParameterValue {
    Text(Option<String>),
    Integer(Option<i64>),
    Number(Option<f64>),
    YesNo(Option<bool>),
    ElementId(Option<ElementId>),
}

impl ParameterValue {
    /// 値が設定されているか（テキストは空文字も未設定扱い）
    pub fn has_value(&self) -> bool {
        match self {
            ParameterValue::Text(v) => v.as_deref().is_some_and(|s| !s.is_empty()),
            ParameterValue::Integer(v) => v.is_some(),
            ParameterValue::Number(v) => v.is_some(),
            ParameterValue::YesNo(v) => v.is_some(),
            ParameterValue::ElementId(v) => v.is_some(),
        }
    }

    /// 数値として取得（未設定は 0.0）
    pub fn as_double(&self) -> f64 {
        match self {
            ParameterValue::Number(v) => v.unwrap_or(0.0),
            ParameterValue::Integer(v) => v.unwrap_or(0) as f64,
            _ => 0.0,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            ParameterValue::Text(v) => v.as_deref(),
            _ => None,
        }
    }

    /// 表示用文字列（Yes/No パラメータは "Yes"/"No"）
    pub fn as_value_string(&self) -> Option<String> {
        match self {
            ParameterValue::Text(v) => v.clone(),
            ParameterValue::Integer(v) => v.map(|i| i.to_string()),
            ParameterValue::Number(v) => v.map(|n| n.to_string()),
            ParameterValue::YesNo(v) => v.map(|b| if b { "Yes".to_string() } else { "No".to_string() }),
            ParameterValue::ElementId(v) => v.map(|id| id.to_string()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ParameterValue::Text(_) => "text",
            ParameterValue::Integer(_) => "integer",
            ParameterValue::Number(_) => "number",
            ParameterValue::YesNo(_) => "yesNo",
            ParameterValue::ElementId(_) => "elementId",
        }
    }

    pub fn same_kind(&self, other: &ParameterValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// 名前付きパラメータ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: ParameterValue,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: ParameterValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn text(name: impl Into<String>, value: &str) -> Self {
        Self::new(name, ParameterValue::Text(Some(value.to_string())))
    }

    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, ParameterValue::Number(Some(value)))
    }

    pub fn yes_no(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, ParameterValue::YesNo(Some(value)))
    }

    pub fn has_value(&self) -> bool {
        self.value.has_value()
    }
}

/// パラメータ一覧から名前で検索（完全一致）
pub fn lookup_parameter<'a>(parameters: &'a [Parameter], name: &str) -> Option<&'a Parameter> {
    parameters.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_value_text() {
        assert!(ParameterValue::Text(Some("A".into())).has_value());
        assert!(!ParameterValue::Text(Some(String::new())).has_value());
        assert!(!ParameterValue::Text(None).has_value());
    }

    #[test]
    fn test_value_string_yes_no() {
        assert_eq!(ParameterValue::YesNo(Some(true)).as_value_string().as_deref(), Some("Yes"));
        assert_eq!(ParameterValue::YesNo(Some(false)).as_value_string().as_deref(), Some("No"));
        assert_eq!(ParameterValue::YesNo(None).as_value_string(), None);
    }

    #[test]
    fn test_as_double_unset_is_zero() {
        assert_eq!(ParameterValue::Number(None).as_double(), 0.0);
        assert_eq!(ParameterValue::Integer(Some(3)).as_double(), 3.0);
    }

    #[test]
    fn test_same_kind() {
        let a = ParameterValue::Text(Some("x".into()));
        let b = ParameterValue::Text(None);
        let c = ParameterValue::Integer(Some(1));
        assert!(a.same_kind(&b));
        assert!(!a.same_kind(&c));
    }

    #[test]
    fn test_parameter_json_shape() {
        let param = Parameter::number("Fire Rating (Hours)", 2.0);
        let json = serde_json::to_string(&param).unwrap();
        assert!(json.contains(r#""kind":"number""#));

        let parsed: Parameter = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, param);
    }

    #[test]
    fn test_lookup_parameter() {
        let params = vec![Parameter::text("Type Name", "W1"), Parameter::number("Fire Rating (Hours)", 1.0)];
        assert!(lookup_parameter(&params, "Type Name").is_some());
        assert!(lookup_parameter(&params, "type name").is_none());
    }
}
