//! ホストモデル抽象
//!
//! CADホストのオブジェクトモデルのうち、コマンドが使う操作だけを
//! `HostModel` トレイトとして切り出す。変更はすべて `Change` で表し、
//! トランザクション内でのみ受け付ける。

pub mod document;
pub mod types;

pub use document::{ModelData, ModelDocument};
pub use types::*;

use crate::error::Result;
use snha_tools_common::{ElementId, Parameter, ParameterValue};
use std::fmt;

/// モデルへの変更
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// ビューに詳細線を作成
    CreateDetailLine {
        view: ElementId,
        geometry: LineGeometry,
        style: ElementId,
    },
    /// 要素を削除
    DeleteElement(ElementId),
    /// 注釈タイプを複製（同一ファミリ内で名前が重複すると失敗）
    DuplicateType { source: ElementId, name: String },
    /// タイプパラメータを設定
    SetTypeParameter {
        type_id: ElementId,
        name: String,
        value: ParameterValue,
    },
    /// インスタンスのタイプを変更
    ChangeInstanceType {
        instance: ElementId,
        new_type: ElementId,
    },
    /// シートの追加リビジョンを置き換え
    SetAdditionalRevisions {
        sheet: ElementId,
        revisions: Vec<ElementId>,
    },
    /// 参照マーカーの参照先ビューを変更
    ChangeReferencedView { viewer: ElementId, view: ElementId },
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::CreateDetailLine { view, style, .. } => {
                write!(f, "詳細線作成 (ビュー {}, 線種 {})", view, style)
            }
            Change::DeleteElement(id) => write!(f, "削除 {}", id),
            Change::DuplicateType { source, name } => write!(f, "タイプ複製 {} → '{}'", source, name),
            Change::SetTypeParameter { type_id, name, .. } => {
                write!(f, "パラメータ設定 {} '{}'", type_id, name)
            }
            Change::ChangeInstanceType { instance, new_type } => {
                write!(f, "タイプ変更 {} → {}", instance, new_type)
            }
            Change::SetAdditionalRevisions { sheet, revisions } => {
                write!(f, "追加リビジョン設定 {} ({}件)", sheet, revisions.len())
            }
            Change::ChangeReferencedView { viewer, view } => {
                write!(f, "参照ビュー変更 {} → {}", viewer, view)
            }
        }
    }
}

/// CADホストのモデル操作
pub trait HostModel {
    /// 未保存の変更があるか
    fn is_modified(&self) -> bool;

    fn active_view(&self) -> Option<ElementId>;

    /// IDで要素を取得
    fn element(&self, id: ElementId) -> Option<ElementRef<'_>>;

    /// 現在の選択
    fn selection(&self) -> Vec<ElementId>;

    fn views(&self) -> Vec<&View>;

    /// ビューに表示されている壁
    fn walls_visible_in(&self, view: ElementId) -> Vec<&Wall>;

    fn line_styles(&self) -> Vec<&LineStyle>;

    /// ビューに表示されている詳細線
    fn detail_lines_in(&self, view: ElementId) -> Vec<&DetailLine>;

    fn annotation_types(&self) -> Vec<&AnnotationType>;

    fn annotation_instances(&self) -> Vec<&AnnotationInstance>;

    fn revisions(&self) -> Vec<&Revision>;

    fn sheets(&self) -> Vec<&Sheet>;

    /// シートのパラメータ一覧
    fn sheet_parameters(&self, sheet: ElementId) -> Vec<&Parameter>;

    fn viewers(&self) -> Vec<&Viewer>;

    /// 変更を適用する。要素を作成した場合はそのIDを返す
    fn apply(&mut self, change: &Change) -> Result<Option<ElementId>>;

    fn begin_transaction(&mut self, label: &str) -> Result<()>;

    fn commit_transaction(&mut self) -> Result<()>;

    fn rollback_transaction(&mut self) -> Result<()>;

    fn view(&self, id: ElementId) -> Option<&View> {
        match self.element(id) {
            Some(ElementRef::View(view)) => Some(view),
            _ => None,
        }
    }

    fn wall_type(&self, id: ElementId) -> Option<&WallType> {
        match self.element(id) {
            Some(ElementRef::WallType(wall_type)) => Some(wall_type),
            _ => None,
        }
    }

    fn annotation_type(&self, id: ElementId) -> Option<&AnnotationType> {
        match self.element(id) {
            Some(ElementRef::AnnotationType(annotation_type)) => Some(annotation_type),
            _ => None,
        }
    }
}
