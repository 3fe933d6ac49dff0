//! JSONモデルドキュメント
//!
//! CADホストの代わりに、モデルのスナップショット（JSON）をメモリ上で扱う。
//! 要素データは `ModelData`、トランザクションは `ModelDocument` が持つ。
//! トランザクションは開始時点のデータを積み、ロールバックで丸ごと復元する
//! （外側 + サブトランザクションの2段まで）。

use super::{
    AnnotationFamily, AnnotationInstance, AnnotationType, Change, DetailLine, ElementRef, HostModel, LineStyle,
    Revision, Sheet, View, Viewer, Viewport, Wall, WallType,
};
use crate::error::{Result, ToolError};
use serde::{Deserialize, Serialize};
use snha_tools_common::{ElementId, Parameter};
use std::collections::HashSet;
use std::ops::Deref;
use std::path::Path;

/// トランザクションの最大ネスト数（外側 + サブトランザクション）
pub const MAX_TRANSACTION_DEPTH: usize = 2;

/// モデルの要素データ（ファイルに保存される内容）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub is_modified: bool,
    #[serde(default)]
    pub active_view: Option<ElementId>,
    #[serde(default)]
    pub selection: Vec<ElementId>,
    #[serde(default)]
    pub views: Vec<View>,
    #[serde(default)]
    pub walls: Vec<Wall>,
    #[serde(default)]
    pub wall_types: Vec<WallType>,
    #[serde(default)]
    pub line_styles: Vec<LineStyle>,
    #[serde(default)]
    pub detail_lines: Vec<DetailLine>,
    #[serde(default)]
    pub annotation_families: Vec<AnnotationFamily>,
    #[serde(default)]
    pub annotation_types: Vec<AnnotationType>,
    #[serde(default)]
    pub annotation_instances: Vec<AnnotationInstance>,
    #[serde(default)]
    pub revisions: Vec<Revision>,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
    #[serde(default)]
    pub viewports: Vec<Viewport>,
    #[serde(default)]
    pub viewers: Vec<Viewer>,
}

#[derive(Debug, Clone)]
struct Checkpoint {
    label: String,
    snapshot: Box<ModelData>,
}

/// モデルドキュメント
///
/// 要素データへの読み取りは `Deref` で、変更は `HostModel::apply` のみで行う。
#[derive(Debug, Clone, Default)]
pub struct ModelDocument {
    data: ModelData,
    transactions: Vec<Checkpoint>,
}

macro_rules! ids_of {
    ($doc:expr, $($field:ident),+) => {
        std::iter::empty()
            $(.chain($doc.$field.iter().map(|e| e.id)))+
    };
}

macro_rules! all_ids {
    ($doc:expr) => {
        ids_of!(
            $doc,
            views,
            walls,
            wall_types,
            line_styles,
            detail_lines,
            annotation_families,
            annotation_types,
            annotation_instances,
            revisions,
            sheets,
            viewports,
            viewers
        )
    };
}

macro_rules! remove_from {
    ($doc:expr, $id:expr, $($field:ident),+) => {{
        let mut removed = false;
        $(
            if !removed {
                let before = $doc.$field.len();
                $doc.$field.retain(|e| e.id != $id);
                removed = $doc.$field.len() != before;
            }
        )+
        removed
    }};
}

impl ModelData {
    /// 要素IDがすべてのコレクションを通して一意か検証
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for id in all_ids!(self) {
            if !seen.insert(id) {
                return Err(ToolError::DuplicateElementId(id));
            }
        }
        Ok(())
    }

    /// 新しい要素ID（既存の最大ID + 1）
    pub fn next_element_id(&self) -> ElementId {
        let max = all_ids!(self).map(|id| id.0).max().unwrap_or(0);
        ElementId(max + 1)
    }

    fn require_view(&self, id: ElementId) -> Result<()> {
        self.views
            .iter()
            .any(|v| v.id == id)
            .then_some(())
            .ok_or(ToolError::ElementNotFound(id))
    }

    fn apply_change(&mut self, change: &Change) -> Result<Option<ElementId>> {
        match change {
            Change::CreateDetailLine { view, geometry, style } => {
                self.require_view(*view)?;
                if !self.line_styles.iter().any(|s| s.id == *style) {
                    return Err(ToolError::ElementNotFound(*style));
                }

                let id = self.next_element_id();
                self.detail_lines.push(DetailLine {
                    id,
                    view_id: *view,
                    geometry: *geometry,
                    style_id: *style,
                });
                Ok(Some(id))
            }

            Change::DeleteElement(id) => {
                let removed = remove_from!(
                    self,
                    *id,
                    detail_lines,
                    annotation_instances,
                    viewers,
                    viewports,
                    annotation_types,
                    annotation_families,
                    walls,
                    wall_types,
                    line_styles,
                    revisions,
                    sheets,
                    views
                );
                if !removed {
                    return Err(ToolError::ElementNotFound(*id));
                }
                self.selection.retain(|s| s != id);
                Ok(None)
            }

            Change::DuplicateType { source, name } => {
                let template = self
                    .annotation_types
                    .iter()
                    .find(|t| t.id == *source)
                    .ok_or(ToolError::ElementNotFound(*source))?;

                let taken = self
                    .annotation_types
                    .iter()
                    .any(|t| t.family_id == template.family_id && t.name == *name);
                if taken {
                    return Err(ToolError::HostWrite(format!("タイプ名 '{}' は既に使われています", name)));
                }

                let mut duplicate = template.clone();
                duplicate.id = self.next_element_id();
                duplicate.name = name.clone();
                let id = duplicate.id;
                self.annotation_types.push(duplicate);
                Ok(Some(id))
            }

            Change::SetTypeParameter { type_id, name, value } => {
                let annotation_type = self
                    .annotation_types
                    .iter_mut()
                    .find(|t| t.id == *type_id)
                    .ok_or(ToolError::ElementNotFound(*type_id))?;

                let parameter = annotation_type
                    .parameters
                    .iter_mut()
                    .find(|p| p.name == *name)
                    .ok_or_else(|| {
                        ToolError::HostWrite(format!("タイプ {} にパラメータ '{}' がありません", type_id, name))
                    })?;

                if !parameter.value.same_kind(value) {
                    return Err(ToolError::HostWrite(format!(
                        "パラメータ '{}' の型が一致しません ({} ← {})",
                        name,
                        parameter.value.kind_name(),
                        value.kind_name()
                    )));
                }
                parameter.value = value.clone();
                Ok(None)
            }

            Change::ChangeInstanceType { instance, new_type } => {
                if !self.annotation_types.iter().any(|t| t.id == *new_type) {
                    return Err(ToolError::ElementNotFound(*new_type));
                }
                let target = self
                    .annotation_instances
                    .iter_mut()
                    .find(|i| i.id == *instance)
                    .ok_or(ToolError::ElementNotFound(*instance))?;
                target.type_id = *new_type;
                Ok(None)
            }

            Change::SetAdditionalRevisions { sheet, revisions } => {
                if let Some(missing) = revisions.iter().find(|r| !self.revisions.iter().any(|rev| rev.id == **r)) {
                    return Err(ToolError::ElementNotFound(*missing));
                }
                let target = self
                    .sheets
                    .iter_mut()
                    .find(|s| s.id == *sheet)
                    .ok_or(ToolError::ElementNotFound(*sheet))?;
                target.additional_revision_ids = revisions.clone();
                Ok(None)
            }

            Change::ChangeReferencedView { viewer, view } => {
                self.require_view(*view)?;
                let target = self
                    .viewers
                    .iter_mut()
                    .find(|v| v.id == *viewer)
                    .ok_or(ToolError::ElementNotFound(*viewer))?;
                if !target.is_reference {
                    return Err(ToolError::HostWrite(format!("ビューア {} は参照マーカーではありません", viewer)));
                }
                target.referenced_view = Some(*view);
                Ok(None)
            }
        }
    }
}


impl ModelDocument {
    pub fn new(data: ModelData) -> Self {
        Self {
            data,
            transactions: Vec::new(),
        }
    }

    /// モデルファイルを読み込み
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::ModelNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSONから読み込み（要素IDの重複はエラー）
    pub fn from_json(json: &str) -> Result<Self> {
        let data: ModelData = serde_json::from_str(json)?;
        data.validate()?;
        Ok(Self::new(data))
    }

    /// モデルファイルを保存（未保存フラグを解除）
    pub fn save(&mut self, path: &Path) -> Result<()> {
        if let Some(open) = self.transactions.last() {
            return Err(ToolError::Transaction(format!(
                "トランザクション '{}' が開いたまま保存しようとしました",
                open.label
            )));
        }

        self.data.is_modified = false;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn transaction_depth(&self) -> usize {
        self.transactions.len()
    }

    pub fn into_data(self) -> ModelData {
        self.data
    }
}

impl Deref for ModelDocument {
    type Target = ModelData;

    fn deref(&self) -> &ModelData {
        &self.data
    }
}

impl HostModel for ModelDocument {
    fn is_modified(&self) -> bool {
        self.data.is_modified
    }

    fn active_view(&self) -> Option<ElementId> {
        self.data.active_view
    }

    fn element(&self, id: ElementId) -> Option<ElementRef<'_>> {
        if let Some(e) = self.data.views.iter().find(|e| e.id == id) {
            return Some(ElementRef::View(e));
        }
        if let Some(e) = self.data.walls.iter().find(|e| e.id == id) {
            return Some(ElementRef::Wall(e));
        }
        if let Some(e) = self.data.wall_types.iter().find(|e| e.id == id) {
            return Some(ElementRef::WallType(e));
        }
        if let Some(e) = self.data.line_styles.iter().find(|e| e.id == id) {
            return Some(ElementRef::LineStyle(e));
        }
        if let Some(e) = self.data.detail_lines.iter().find(|e| e.id == id) {
            return Some(ElementRef::DetailLine(e));
        }
        if let Some(e) = self.data.annotation_families.iter().find(|e| e.id == id) {
            return Some(ElementRef::AnnotationFamily(e));
        }
        if let Some(e) = self.data.annotation_types.iter().find(|e| e.id == id) {
            return Some(ElementRef::AnnotationType(e));
        }
        if let Some(e) = self.data.annotation_instances.iter().find(|e| e.id == id) {
            return Some(ElementRef::AnnotationInstance(e));
        }
        if let Some(e) = self.data.revisions.iter().find(|e| e.id == id) {
            return Some(ElementRef::Revision(e));
        }
        if let Some(e) = self.data.sheets.iter().find(|e| e.id == id) {
            return Some(ElementRef::Sheet(e));
        }
        if let Some(e) = self.data.viewports.iter().find(|e| e.id == id) {
            return Some(ElementRef::Viewport(e));
        }
        self.data.viewers.iter().find(|e| e.id == id).map(ElementRef::Viewer)
    }

    fn selection(&self) -> Vec<ElementId> {
        self.data.selection.clone()
    }

    fn views(&self) -> Vec<&View> {
        self.data.views.iter().collect()
    }

    fn walls_visible_in(&self, view: ElementId) -> Vec<&Wall> {
        self.data.walls.iter().filter(|w| w.visible_in.contains(&view)).collect()
    }

    fn line_styles(&self) -> Vec<&LineStyle> {
        self.data.line_styles.iter().collect()
    }

    fn detail_lines_in(&self, view: ElementId) -> Vec<&DetailLine> {
        self.data.detail_lines.iter().filter(|l| l.view_id == view).collect()
    }

    fn annotation_types(&self) -> Vec<&AnnotationType> {
        self.data.annotation_types.iter().collect()
    }

    fn annotation_instances(&self) -> Vec<&AnnotationInstance> {
        self.data.annotation_instances.iter().collect()
    }

    fn revisions(&self) -> Vec<&Revision> {
        self.data.revisions.iter().collect()
    }

    fn sheets(&self) -> Vec<&Sheet> {
        self.data.sheets.iter().collect()
    }

    fn sheet_parameters(&self, sheet: ElementId) -> Vec<&Parameter> {
        self.data.sheets
            .iter()
            .find(|s| s.id == sheet)
            .map(|s| s.parameters.iter().collect())
            .unwrap_or_default()
    }

    fn viewers(&self) -> Vec<&Viewer> {
        self.data.viewers.iter().collect()
    }

    fn apply(&mut self, change: &Change) -> Result<Option<ElementId>> {
        if self.transactions.is_empty() {
            return Err(ToolError::Transaction(format!("トランザクション外の変更: {}", change)));
        }

        let created = self.data.apply_change(change)?;
        self.data.is_modified = true;
        tracing::trace!(%change, ?created, "変更を適用");
        Ok(created)
    }

    fn begin_transaction(&mut self, label: &str) -> Result<()> {
        if self.transactions.len() >= MAX_TRANSACTION_DEPTH {
            return Err(ToolError::Transaction(format!(
                "'{}' を開始できません（ネストは{}段まで）",
                label, MAX_TRANSACTION_DEPTH
            )));
        }

        self.transactions.push(Checkpoint {
            label: label.to_string(),
            snapshot: Box::new(self.data.clone()),
        });
        tracing::debug!(label, depth = self.transactions.len(), "トランザクション開始");
        Ok(())
    }

    fn commit_transaction(&mut self) -> Result<()> {
        let checkpoint = self
            .transactions
            .pop()
            .ok_or_else(|| ToolError::Transaction("コミットするトランザクションがありません".into()))?;
        tracing::debug!(label = %checkpoint.label, "トランザクション確定");
        Ok(())
    }

    fn rollback_transaction(&mut self) -> Result<()> {
        let checkpoint = self
            .transactions
            .pop()
            .ok_or_else(|| ToolError::Transaction("ロールバックするトランザクションがありません".into()))?;

        self.data = *checkpoint.snapshot;
        tracing::debug!(label = %checkpoint.label, "トランザクション取り消し");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{LineGeometry, Point3, ViewType};

    fn document() -> ModelDocument {
        ModelDocument::new(ModelData {
            views: vec![View {
                id: ElementId(1),
                name: "Level 1".into(),
                view_type: ViewType::FloorPlan,
            }],
            line_styles: vec![LineStyle {
                id: ElementId(2),
                name: "FireRating_Code_1HR".into(),
            }],
            ..Default::default()
        })
    }

    fn line_change() -> Change {
        Change::CreateDetailLine {
            view: ElementId(1),
            geometry: LineGeometry::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)),
            style: ElementId(2),
        }
    }

    #[test]
    fn test_apply_requires_transaction() {
        let mut doc = document();
        let result = doc.apply(&line_change());
        assert!(matches!(result, Err(ToolError::Transaction(_))));
        assert!(doc.detail_lines.is_empty());
    }

    #[test]
    fn test_create_allocates_next_id() {
        let mut doc = document();
        doc.begin_transaction("t").unwrap();
        let id = doc.apply(&line_change()).unwrap();
        doc.commit_transaction().unwrap();

        assert_eq!(id, Some(ElementId(3)));
        assert_eq!(doc.detail_lines.len(), 1);
        assert!(doc.is_modified);
    }

    #[test]
    fn test_rollback_restores_snapshot() {
        let mut doc = document();
        doc.begin_transaction("outer").unwrap();
        doc.apply(&line_change()).unwrap();

        doc.begin_transaction("sub").unwrap();
        doc.apply(&line_change()).unwrap();
        assert_eq!(doc.detail_lines.len(), 2);
        doc.rollback_transaction().unwrap();

        assert_eq!(doc.detail_lines.len(), 1);
        assert_eq!(doc.transaction_depth(), 1);

        doc.rollback_transaction().unwrap();
        assert!(doc.detail_lines.is_empty());
        assert!(!doc.is_modified);
        assert_eq!(doc.transaction_depth(), 0);
    }

    #[test]
    fn test_nesting_limited() {
        let mut doc = document();
        doc.begin_transaction("a").unwrap();
        doc.begin_transaction("b").unwrap();
        assert!(matches!(doc.begin_transaction("c"), Err(ToolError::Transaction(_))));
    }

    #[test]
    fn test_commit_without_transaction() {
        let mut doc = document();
        assert!(doc.commit_transaction().is_err());
        assert!(doc.rollback_transaction().is_err());
    }

    #[test]
    fn test_delete_unknown_element() {
        let mut doc = document();
        doc.begin_transaction("t").unwrap();
        let result = doc.apply(&Change::DeleteElement(ElementId(99)));
        assert!(matches!(result, Err(ToolError::ElementNotFound(ElementId(99)))));
    }

    #[test]
    fn test_element_lookup() {
        let doc = document();
        assert!(matches!(doc.element(ElementId(1)), Some(ElementRef::View(_))));
        assert!(doc.view(ElementId(2)).is_none());
        assert!(doc.element(ElementId(42)).is_none());
    }

    #[test]
    fn test_save_with_open_transaction() {
        let mut doc = document();
        doc.begin_transaction("t").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let result = doc.save(&dir.path().join("model.json"));
        assert!(matches!(result, Err(ToolError::Transaction(_))));
    }

    #[test]
    fn test_duplicate_ids_rejected_on_load() {
        let json = r#"{
            "views": [{ "id": 5, "name": "Level 1", "viewType": "floorPlan" }],
            "lineStyles": [{ "id": 5, "name": "FireRating 1HR Code" }]
        }"#;
        let result = ModelDocument::from_json(json);
        assert!(matches!(result, Err(ToolError::DuplicateElementId(ElementId(5)))));
    }

    #[test]
    fn test_unique_ids_accepted() {
        let data = document().into_data();
        assert!(data.validate().is_ok());
        assert_eq!(data.next_element_id(), ElementId(3));
    }
}
