//! ビュー選択ダイアログ
//!
//! 置き換え先ビューを選ぶモーダル操作。対話式（dialoguer）と、
//! コマンドライン引数で名前/IDを指定する非対話式の2種類。

use crate::error::{Result, ToolError};
use crate::host::View;
use dialoguer::Select;
use regex::Regex;
use snha_tools_common::ElementId;

/// ビュー選択
pub trait ViewPicker {
    /// 候補からビューを1つ選ぶ（キャンセル時は None）
    fn choose_view(&mut self, title: &str, candidates: &[&View]) -> Result<Option<ElementId>>;
}

/// 対話式でビューを選択
#[derive(Debug, Default)]
pub struct InteractivePicker;

impl ViewPicker for InteractivePicker {
    fn choose_view(&mut self, title: &str, candidates: &[&View]) -> Result<Option<ElementId>> {
        if candidates.is_empty() {
            println!("⚠ 選択できるビューがありません");
            return Ok(None);
        }

        let labels: Vec<String> = candidates
            .iter()
            .map(|v| format!("{} [{}]", v.name, v.view_type))
            .collect();

        let choice = Select::new()
            .with_prompt(title)
            .items(&labels)
            .default(0)
            .interact_opt()
            .map_err(|e| ToolError::Selection(format!("ビュー選択に失敗しました: {}", e)))?;

        Ok(choice.map(|i| candidates[i].id))
    }
}

/// 名前またはID（"123" / "#123"）でビューを選択
#[derive(Debug, Clone)]
pub struct NamedViewPicker {
    query: String,
}

impl NamedViewPicker {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into() }
    }

    fn parse_id(&self) -> Option<ElementId> {
        lazy_static::lazy_static! {
            static ref ID_RE: Regex = Regex::new(r"^#?(\d+)$").unwrap();
        }

        ID_RE
            .captures(self.query.trim())
            .and_then(|caps| caps[1].parse::<u64>().ok())
            .map(ElementId)
    }
}

impl ViewPicker for NamedViewPicker {
    fn choose_view(&mut self, _title: &str, candidates: &[&View]) -> Result<Option<ElementId>> {
        let query = self.query.trim();

        // 完全一致 → ID → 大文字小文字無視の順
        let found = candidates
            .iter()
            .find(|v| v.name == query)
            .or_else(|| {
                self.parse_id()
                    .and_then(|id| candidates.iter().find(|v| v.id == id))
            })
            .or_else(|| candidates.iter().find(|v| v.name.eq_ignore_ascii_case(query)));

        match found {
            Some(view) => Ok(Some(view.id)),
            None => Err(ToolError::Selection(format!(
                "ビュー '{}' は候補にありません（製図ビュー・詳細図・元ビューと同じ種類のみ選択可）",
                query
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ViewType;

    fn views() -> Vec<View> {
        vec![
            View {
                id: ElementId(10),
                name: "Wall Section 1".into(),
                view_type: ViewType::Section,
            },
            View {
                id: ElementId(11),
                name: "Typ. Head Detail".into(),
                view_type: ViewType::DraftingView,
            },
        ]
    }

    #[test]
    fn test_named_picker_by_name() {
        let views = views();
        let candidates: Vec<&View> = views.iter().collect();
        let mut picker = NamedViewPicker::new("Typ. Head Detail");
        assert_eq!(picker.choose_view("t", &candidates).unwrap(), Some(ElementId(11)));
    }

    #[test]
    fn test_named_picker_by_id() {
        let views = views();
        let candidates: Vec<&View> = views.iter().collect();
        let mut picker = NamedViewPicker::new("#10");
        assert_eq!(picker.choose_view("t", &candidates).unwrap(), Some(ElementId(10)));
    }

    #[test]
    fn test_named_picker_case_insensitive() {
        let views = views();
        let candidates: Vec<&View> = views.iter().collect();
        let mut picker = NamedViewPicker::new("wall section 1");
        assert_eq!(picker.choose_view("t", &candidates).unwrap(), Some(ElementId(10)));
    }

    #[test]
    fn test_named_picker_not_a_candidate() {
        let views = views();
        let candidates: Vec<&View> = views.iter().collect();
        let mut picker = NamedViewPicker::new("Level 1");
        assert!(matches!(picker.choose_view("t", &candidates), Err(ToolError::Selection(_))));
    }
}
