//! ホストモデルの要素型
//!
//! CADホストの要素（壁・線種・シート・ビュー等）のうち、
//! 各コマンドが読み書きする項目だけを持つ。

use serde::{Deserialize, Serialize};
use snha_tools_common::{ElementId, FamilyTypeRecord, Named, Parameter, RevisionRecord};
use std::fmt;

/// 3次元座標
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// 有限の線分（壁の位置線・詳細線）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineGeometry {
    pub start: Point3,
    pub end: Point3,
}

impl LineGeometry {
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }
}

/// ビューの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewType {
    FloorPlan,
    CeilingPlan,
    Elevation,
    Section,
    Detail,
    DraftingView,
    ThreeD,
    Legend,
    Schedule,
    Other,
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewType::FloorPlan => "平面図",
            ViewType::CeilingPlan => "天井伏図",
            ViewType::Elevation => "立面図",
            ViewType::Section => "断面図",
            ViewType::Detail => "詳細図",
            ViewType::DraftingView => "製図ビュー",
            ViewType::ThreeD => "3D",
            ViewType::Legend => "凡例",
            ViewType::Schedule => "集計表",
            ViewType::Other => "その他",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: ElementId,
    pub name: String,
    pub view_type: ViewType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wall {
    pub id: ElementId,
    pub type_id: ElementId,
    /// 表示されているビュー
    #[serde(default)]
    pub visible_in: Vec<ElementId>,
    /// 位置線（曲線壁などは None）
    #[serde(default)]
    pub location: Option<LineGeometry>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallType {
    pub id: ElementId,
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub id: ElementId,
    pub name: String,
}

impl Named for LineStyle {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for &LineStyle {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailLine {
    pub id: ElementId,
    pub view_id: ElementId,
    pub geometry: LineGeometry,
    pub style_id: ElementId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationFamily {
    pub id: ElementId,
    pub name: String,
}

/// 注釈ファミリのタイプ
pub type AnnotationType = FamilyTypeRecord;

/// 配置された注釈インスタンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationInstance {
    pub id: ElementId,
    pub type_id: ElementId,
}

pub type Revision = RevisionRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub id: ElementId,
    pub number: String,
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// 追加リビジョン（シート上で手動で関連付けたリビジョン）
    #[serde(default)]
    pub additional_revision_ids: Vec<ElementId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub id: ElementId,
    pub sheet_id: ElementId,
    pub view_id: ElementId,
}

/// 断面・詳細マーカー等のビューア要素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub id: ElementId,
    /// 配置されているビュー
    pub owner_view_id: ElementId,
    /// 参照マーカーか（既存ビューを参照するだけのもの）
    #[serde(default)]
    pub is_reference: bool,
    #[serde(default)]
    pub referenced_view: Option<ElementId>,
    /// ホストが報告する親ビュー名（"<none>" の場合あり）
    #[serde(default)]
    pub parent_view_name: Option<String>,
}

/// IDで引いた要素
#[derive(Debug, Clone, Copy)]
pub enum ElementRef<'a> {
    View(&'a View),
    Wall(&'a Wall),
    WallType(&'a WallType),
    LineStyle(&'a LineStyle),
    DetailLine(&'a DetailLine),
    AnnotationFamily(&'a AnnotationFamily),
    AnnotationType(&'a AnnotationType),
    AnnotationInstance(&'a AnnotationInstance),
    Revision(&'a Revision),
    Sheet(&'a Sheet),
    Viewport(&'a Viewport),
    Viewer(&'a Viewer),
}

impl fmt::Display for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::View(v) => write!(f, "View {} '{}'", v.id, v.name),
            ElementRef::Wall(w) => write!(f, "Wall {}", w.id),
            ElementRef::WallType(t) => write!(f, "WallType {} '{}'", t.id, t.name),
            ElementRef::LineStyle(s) => write!(f, "LineStyle {} '{}'", s.id, s.name),
            ElementRef::DetailLine(l) => write!(f, "DetailLine {}", l.id),
            ElementRef::AnnotationFamily(fam) => write!(f, "AnnotationFamily {} '{}'", fam.id, fam.name),
            ElementRef::AnnotationType(t) => write!(f, "AnnotationSymbolType {} '{}'", t.id, t.name),
            ElementRef::AnnotationInstance(i) => write!(f, "AnnotationSymbol {}", i.id),
            ElementRef::Revision(r) => write!(f, "Revision {} '{}'", r.id, r.name),
            ElementRef::Sheet(s) => write!(f, "Sheet {} '{}: {}'", s.id, s.number, s.name),
            ElementRef::Viewport(vp) => write!(f, "Viewport {}", vp.id),
            ElementRef::Viewer(v) => write!(f, "Viewer {}", v.id),
        }
    }
}
