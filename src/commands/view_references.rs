//! 参照ビューの付け替え
//!
//! 選択したビュー（ビュー・ビューポート・参照マーカー）を参照している
//! 参照マーカーをすべて探し、ユーザーが選んだ別のビューへ付け替える。
//! 個々の付け替えが失敗しても残りは続行し、付け替え済みのものは戻さない。

use super::Diagnostics;
use crate::error::{Result, ToolError};
use crate::host::{Change, ElementRef, HostModel, View, ViewType};
use crate::picker::ViewPicker;
use crate::session::Session;
use snha_tools_common::ElementId;

pub const TRANSACTION_LABEL: &str = "Swap View References";

/// 親ビュー名が無い場合にホストが返す値
pub const NO_PARENT_VIEW: &str = "<none>";

pub const PICKER_TITLE: &str = "参照するビューを選択";

/// 参照マーカーと、それが配置されているビュー名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSite {
    pub viewer: ElementId,
    pub parent_view_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepointFailure {
    pub viewer: ElementId,
    pub message: String,
}

/// 実行結果
#[derive(Debug, Clone)]
pub struct RepointReport {
    pub old_view: ElementId,
    pub references: Vec<ReferenceSite>,
    /// 選択された置き換え先（キャンセル時は None）
    pub new_view: Option<ElementId>,
    pub repointed: Vec<ElementId>,
    pub failures: Vec<RepointFailure>,
    pub diagnostics: Diagnostics,
}

fn selection_error(description: &str) -> ToolError {
    ToolError::Selection(format!(
        "選択: {}\nビュー・ビューポート・参照のいずれかを1つ選択してください",
        description
    ))
}

/// 選択要素から元ビューのIDを求める
pub fn resolve_selected_view<H: HostModel + ?Sized>(host: &H, selection: &[ElementId]) -> Result<ElementId> {
    let id = match selection {
        [single] => *single,
        [] => return Err(selection_error("なし")),
        many => {
            let ids: Vec<String> = many.iter().map(|id| id.to_string()).collect();
            return Err(selection_error(&ids.join(", ")));
        }
    };

    match host.element(id) {
        Some(ElementRef::View(view)) => Ok(view.id),
        Some(ElementRef::Viewport(viewport)) => Ok(viewport.view_id),
        Some(ElementRef::Viewer(viewer)) => viewer
            .referenced_view
            .ok_or_else(|| selection_error(&format!("Viewer {}（参照先なし）", viewer.id))),
        Some(other) => Err(selection_error(&other.to_string())),
        None => Err(selection_error(&format!("{}（存在しない要素）", id))),
    }
}

/// 元ビューを参照している参照マーカーを探す
pub fn find_references<H: HostModel + ?Sized>(host: &H, old_view: ElementId) -> Vec<ReferenceSite> {
    host.viewers()
        .into_iter()
        .filter(|v| v.is_reference && v.referenced_view == Some(old_view))
        .map(|v| {
            let parent_view_name = v
                .parent_view_name
                .as_deref()
                .filter(|name| !name.is_empty() && *name != NO_PARENT_VIEW)
                .map(str::to_string)
                .or_else(|| host.view(v.owner_view_id).map(|owner| owner.name.clone()))
                .unwrap_or_else(|| v.owner_view_id.to_string());

            ReferenceSite {
                viewer: v.id,
                parent_view_name,
            }
        })
        .collect()
}

/// 置き換え先として選べるビューか（製図ビュー・詳細図・元ビューと同じ種類）
pub fn is_replacement_candidate(view: &View, old_view_type: ViewType) -> bool {
    matches!(view.view_type, ViewType::DraftingView | ViewType::Detail) || view.view_type == old_view_type
}

/// 参照ビューを付け替える
///
/// # Arguments
/// * `picker` - 置き換え先ビューの選択
/// * `selected` - 選択要素（省略時はモデルの選択）
pub fn change_referenced_view<H, P>(
    session: &mut Session<H>,
    picker: &mut P,
    selected: Option<ElementId>,
) -> Result<RepointReport>
where
    H: HostModel,
    P: ViewPicker + ?Sized,
{
    let selection = match selected {
        Some(id) => vec![id],
        None => session.host().selection(),
    };

    let old_id = resolve_selected_view(session.host(), &selection)?;
    let old_view = session
        .host()
        .view(old_id)
        .cloned()
        .ok_or(ToolError::ElementNotFound(old_id))?;

    let mut report = RepointReport {
        old_view: old_id,
        references: find_references(session.host(), old_id),
        new_view: None,
        repointed: Vec::new(),
        failures: Vec::new(),
        diagnostics: Diagnostics::default(),
    };

    report.diagnostics.info(format!("選択したビュー: {}", old_view.name));

    if report.references.is_empty() {
        report.diagnostics.info("このビューへの参照は見つかりませんでした");
        return Ok(report);
    }

    report.diagnostics.info("このビューへの参照があるビュー:");
    for site in &report.references {
        report.diagnostics.info(format!("    {}", site.parent_view_name));
    }

    let new_id = {
        let candidates: Vec<&View> = session
            .host()
            .views()
            .into_iter()
            .filter(|v| is_replacement_candidate(v, old_view.view_type))
            .collect();

        let chosen = picker.choose_view(PICKER_TITLE, &candidates)?;
        if let Some(id) = chosen {
            if !candidates.iter().any(|v| v.id == id) {
                return Err(ToolError::Selection(format!("ビュー {} は置き換え先の候補ではありません", id)));
            }
        }
        chosen
    };

    let Some(new_id) = new_id else {
        report.diagnostics.info("キャンセルされました");
        return Ok(report);
    };

    let new_name = session
        .host()
        .view(new_id)
        .map(|v| v.name.clone())
        .unwrap_or_else(|| new_id.to_string());
    report.new_view = Some(new_id);
    report
        .diagnostics
        .info(format!("参照を置き換えます: {} → {}", old_view.name, new_name));

    let sites = report.references.clone();
    let (repointed, failures) = session.transaction(TRANSACTION_LABEL, |host| {
        let mut repointed = Vec::new();
        let mut failures = Vec::new();

        for site in &sites {
            match host.apply(&Change::ChangeReferencedView {
                viewer: site.viewer,
                view: new_id,
            }) {
                Ok(_) => repointed.push(site.viewer),
                Err(e) => {
                    tracing::warn!(viewer = %site.viewer, "参照の付け替えに失敗: {}", e);
                    failures.push(RepointFailure {
                        viewer: site.viewer,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok((repointed, failures))
    })?;

    for failure in &failures {
        report.diagnostics.error(format!(
            "参照 {} を付け替えできませんでした: {}",
            failure.viewer, failure.message
        ));
    }
    report.repointed = repointed;
    report.failures = failures;
    report.diagnostics.info("Done.");

    Ok(report)
}
