//! シートノート（汎用注釈ファミリ）の属性定義
//!
//! SERIES / NUMBER / TEXT の3属性を正規名で対応付ける。
//! 読み込み時に各属性がちょうど1つ見つかることを検証し、
//! 見つからない要素は型付きエラーで弾く。

use crate::error::{Error, Result};
use crate::matcher::exactly_one;
use crate::types::{ElementId, Parameter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 注釈ファミリのタイプ（バリアント）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyTypeRecord {
    pub id: ElementId,
    pub family_id: ElementId,
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// 正規化された属性名
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetNoteField {
    Series,
    Number,
    Text,
}

impl SheetNoteField {
    pub const ALL: [SheetNoteField; 3] = [SheetNoteField::Series, SheetNoteField::Number, SheetNoteField::Text];
}

impl fmt::Display for SheetNoteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetNoteField::Series => write!(f, "SERIES"),
            SheetNoteField::Number => write!(f, "NUMBER"),
            SheetNoteField::Text => write!(f, "TEXT"),
        }
    }
}

/// 属性名の検索キー（大文字小文字を区別する部分一致）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetNoteSchema {
    pub series_key: String,
    pub number_key: String,
    pub text_key: String,
}

impl Default for SheetNoteSchema {
    fn default() -> Self {
        Self {
            series_key: "SERIES".into(),
            number_key: "NUMBER".into(),
            text_key: "TEXT".into(),
        }
    }
}

/// 解決済みの3属性
#[derive(Debug, Clone, Copy)]
pub struct SheetNoteFields<'a> {
    pub series: &'a Parameter,
    pub number: &'a Parameter,
    pub text: &'a Parameter,
}

impl<'a> SheetNoteFields<'a> {
    pub fn get(&self, field: SheetNoteField) -> &'a Parameter {
        match field {
            SheetNoteField::Series => self.series,
            SheetNoteField::Number => self.number,
            SheetNoteField::Text => self.text,
        }
    }
}

impl SheetNoteSchema {
    pub fn key(&self, field: SheetNoteField) -> &str {
        match field {
            SheetNoteField::Series => &self.series_key,
            SheetNoteField::Number => &self.number_key,
            SheetNoteField::Text => &self.text_key,
        }
    }

    /// SERIES 属性を持つタイプか
    pub fn is_sheet_note(&self, record: &FamilyTypeRecord) -> bool {
        record.parameters.iter().any(|p| p.name.contains(self.series_key.as_str()))
    }

    /// 3属性を解決する
    pub fn resolve<'a>(&self, record: &'a FamilyTypeRecord) -> Result<SheetNoteFields<'a>> {
        Ok(SheetNoteFields {
            series: self.resolve_field(record, SheetNoteField::Series)?,
            number: self.resolve_field(record, SheetNoteField::Number)?,
            text: self.resolve_field(record, SheetNoteField::Text)?,
        })
    }

    fn resolve_field<'a>(&self, record: &'a FamilyTypeRecord, field: SheetNoteField) -> Result<&'a Parameter> {
        let key = self.key(field);
        let candidates: Vec<&Parameter> = record
            .parameters
            .iter()
            .filter(|p| p.name.contains(key))
            .collect();

        exactly_one(candidates, &format!("parameters of type '{}'", record.name), key).map_err(|e| match e {
            Error::NoMatch { .. } => Error::MissingField {
                entity: format!("type '{}'", record.name),
                field: key.to_string(),
            },
            other => other,
        })
    }
}
