//! リビジョンとシートパラメータの対応付け
//!
//! リビジョン名（例: "03 - IFC"）の2番目の区切りを表示名とし、
//! 表示名を大文字小文字無視の正規表現としてシートのパラメータ名を照合する。

use crate::error::{Error, Result};
use crate::types::{ElementId, Parameter};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// リビジョン名の区切りのデフォルト
pub const DEFAULT_DELIMITER: &str = " - ";

/// リビジョン要素
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionRecord {
    pub id: ElementId,
    #[serde(default)]
    pub sequence: u32,
    pub name: String,
}

/// リビジョン名から表示名（2番目の区切り）を取り出す
pub fn display_name<'a>(label: &'a str, delimiter: &str) -> Result<&'a str> {
    label
        .split(delimiter)
        .nth(1)
        .ok_or_else(|| Error::Validation(format!("revision name '{}' has no '{}' segment", label, delimiter)))
}

/// パラメータ照合の結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterMatch<'a> {
    None,
    One(&'a Parameter),
    Many(usize),
}

/// シート上のリビジョン関連付けに対する操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionAction {
    Add,
    Remove,
    Keep,
}

/// パラメータの値有無と現在の関連付けから操作を決める
pub fn reconcile(has_value: bool, present: bool) -> RevisionAction {
    match (has_value, present) {
        (true, false) => RevisionAction::Add,
        (false, true) => RevisionAction::Remove,
        _ => RevisionAction::Keep,
    }
}

/// 1リビジョン分の照合器
#[derive(Debug, Clone)]
pub struct RevisionMatcher {
    pub id: ElementId,
    pub display_name: String,
    regex: Regex,
}

impl RevisionMatcher {
    pub fn new(record: &RevisionRecord, delimiter: &str) -> Result<Self> {
        let display = display_name(&record.name, delimiter)?;
        let regex = RegexBuilder::new(display).case_insensitive(true).build()?;

        Ok(Self {
            id: record.id,
            display_name: display.to_string(),
            regex,
        })
    }

    pub fn matches(&self, parameter_name: &str) -> bool {
        self.regex.is_match(parameter_name)
    }

    /// パラメータ一覧から表示名に一致するものを探す
    pub fn find<'a>(&self, parameters: &[&'a Parameter]) -> ParameterMatch<'a> {
        let matched: Vec<&'a Parameter> = parameters
            .iter()
            .copied()
            .filter(|p| self.matches(&p.name))
            .collect();

        match matched.as_slice() {
            [] => ParameterMatch::None,
            [single] => ParameterMatch::One(*single),
            many => ParameterMatch::Many(many.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revision(name: &str) -> RevisionRecord {
        RevisionRecord {
            id: ElementId(500),
            sequence: 1,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_display_name_second_segment() {
        assert_eq!(display_name("03 - IFC", " - ").unwrap(), "IFC");
        assert_eq!(display_name("03 - IFC - Rev A", " - ").unwrap(), "IFC");
    }

    #[test]
    fn test_display_name_missing_segment() {
        assert!(matches!(display_name("IFC", " - "), Err(Error::Validation(_))));
    }

    #[test]
    fn test_matcher_case_insensitive() {
        let matcher = RevisionMatcher::new(&revision("03 - IFC"), " - ").unwrap();
        assert!(matcher.matches("Issued for Construction (ifc)"));
        assert!(matcher.matches("IFC"));
        assert!(!matcher.matches("Permit"));
    }

    #[test]
    fn test_matcher_invalid_pattern() {
        let result = RevisionMatcher::new(&revision("01 - Permit (Set"), " - ");
        assert!(matches!(result, Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_find_counts() {
        let matcher = RevisionMatcher::new(&revision("02 - Permit"), " - ").unwrap();
        let a = Parameter::text("PERMIT", "x");
        let b = Parameter::text("Permit Resubmittal", "x");
        let c = Parameter::text("Drawn By", "x");

        assert_eq!(matcher.find(&[&c]), ParameterMatch::None);
        assert_eq!(matcher.find(&[&a, &c]), ParameterMatch::One(&a));
        assert_eq!(matcher.find(&[&a, &b, &c]), ParameterMatch::Many(2));
    }

    #[test]
    fn test_reconcile() {
        assert_eq!(reconcile(true, false), RevisionAction::Add);
        assert_eq!(reconcile(false, true), RevisionAction::Remove);
        assert_eq!(reconcile(true, true), RevisionAction::Keep);
        assert_eq!(reconcile(false, false), RevisionAction::Keep);
    }
}
