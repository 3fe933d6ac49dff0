//! シートノートファミリの統合
//!
//! SERIES 属性を持つ汎用注釈ファミリ（シートノート）のタイプを、
//! 選択したタイプが属するファミリへすべて複製し、配置済みの注釈を
//! 新しいタイプへ付け替える。統合元のファミリ・タイプは削除しない。

use super::Diagnostics;
use crate::error::{Result, ToolError};
use crate::host::{AnnotationType, Change, ElementRef, HostModel};
use crate::session::Session;
use snha_tools_common::{ElementId, Error as CommonError, SheetNoteField, SheetNoteSchema, UniqueNameResolver};
use std::collections::BTreeSet;

pub const TRANSACTION_LABEL: &str = "Merge Sheet Note Families";

/// 複製したタイプ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedType {
    pub source_type: ElementId,
    pub source_name: String,
    pub new_type: ElementId,
    pub new_name: String,
    /// 付け替えた注釈インスタンス数
    pub repointed_instances: usize,
}

/// 統合に失敗したファミリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyMergeFailure {
    pub family: ElementId,
    pub message: String,
}

/// 実行結果
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub target_family: ElementId,
    /// 統合が完了したファミリ
    pub merged_families: Vec<ElementId>,
    pub merged_types: Vec<MergedType>,
    pub failures: Vec<FamilyMergeFailure>,
    pub diagnostics: Diagnostics,
}

/// SERIES 属性を持つタイプが属するファミリ（ID昇順）
pub fn sheet_note_families<H: HostModel + ?Sized>(host: &H, schema: &SheetNoteSchema) -> Vec<ElementId> {
    host.annotation_types()
        .into_iter()
        .filter(|t| schema.is_sheet_note(t))
        .map(|t| t.family_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn family_name<H: HostModel + ?Sized>(host: &H, id: ElementId) -> String {
    match host.element(id) {
        Some(ElementRef::AnnotationFamily(family)) => family.name.clone(),
        _ => id.to_string(),
    }
}

/// 統合先のタイプを検証し、そのファミリIDを返す
fn resolve_target<H: HostModel + ?Sized>(
    host: &H,
    schema: &SheetNoteSchema,
    target: Option<ElementId>,
) -> Result<ElementId> {
    let selected = target.or_else(|| host.selection().first().copied()).ok_or_else(|| {
        CommonError::Validation(
            "汎用注釈タイプが選択されていません。統合先ファミリのタイプをプロジェクトブラウザで選択してから再実行してください"
                .into(),
        )
    })?;

    let annotation_type = host.annotation_type(selected).ok_or_else(|| {
        CommonError::Validation(format!(
            "選択した要素 {} は汎用注釈タイプではありません。統合先ファミリのタイプを選択してください",
            selected
        ))
    })?;

    if !schema.is_sheet_note(annotation_type) {
        return Err(CommonError::Validation(format!(
            "選択したタイプ '{}' に '{}' を含むパラメータがありません",
            annotation_type.name, schema.series_key
        ))
        .into());
    }

    Ok(annotation_type.family_id)
}

/// シートノートファミリを統合する
///
/// # Arguments
/// * `schema` - SERIES/NUMBER/TEXT の検索キー
/// * `resolver` - 重複したタイプ名の解決
/// * `target` - 統合先タイプ（省略時はモデルの選択の先頭）
pub fn merge_sheet_note_families<H: HostModel>(
    session: &mut Session<H>,
    schema: &SheetNoteSchema,
    resolver: &UniqueNameResolver,
    target: Option<ElementId>,
) -> Result<MergeReport> {
    let target_family = resolve_target(session.host(), schema, target)?;

    session.transaction(TRANSACTION_LABEL, |host| {
        let mut report = MergeReport {
            target_family,
            merged_families: Vec::new(),
            merged_types: Vec::new(),
            failures: Vec::new(),
            diagnostics: Diagnostics::default(),
        };

        let target_name = family_name(host, target_family);
        report.diagnostics.info(format!("統合先ファミリ: {}", target_name));

        let source_families: Vec<ElementId> = sheet_note_families(host, schema)
            .into_iter()
            .filter(|f| *f != target_family)
            .collect();
        tracing::info!(target = %target_family, sources = source_families.len(), "シートノート統合を開始");

        for from_family in source_families {
            let from_name = family_name(host, from_family);
            let mut merged = Vec::new();

            match merge_family(host, from_family, target_family, schema, resolver, &mut merged) {
                Ok(()) => {
                    report.merged_families.push(from_family);
                }
                Err(e) => {
                    report
                        .diagnostics
                        .error(format!("ファミリ '{}' の統合を中断しました: {}", from_name, e));
                    report.failures.push(FamilyMergeFailure {
                        family: from_family,
                        message: e.to_string(),
                    });
                }
            }

            for m in &merged {
                report.diagnostics.info(format!(
                    "{}: '{}' → {}: '{}' （注釈 {} 件を付け替え）",
                    from_name, m.source_name, target_name, m.new_name, m.repointed_instances
                ));
            }
            report.merged_types.extend(merged);
        }

        if !report.merged_families.is_empty() {
            report
                .diagnostics
                .info("統合元のファミリは削除していません。確認後に手動で削除してください");
        }

        Ok(report)
    })
}

/// 1ファミリ分のタイプを統合先へ複製する
///
/// 途中で失敗した場合、それまでに複製したタイプは `merged` に残る。
fn merge_family<H: HostModel>(
    host: &mut H,
    from_family: ElementId,
    to_family: ElementId,
    schema: &SheetNoteSchema,
    resolver: &UniqueNameResolver,
    merged: &mut Vec<MergedType>,
) -> Result<()> {
    let template = host
        .annotation_types()
        .into_iter()
        .filter(|t| t.family_id == to_family)
        .map(|t| t.id)
        .min()
        .ok_or_else(|| CommonError::Validation(format!("統合先ファミリ {} にタイプがありません", to_family)))?;

    let mut source_types: Vec<AnnotationType> = host
        .annotation_types()
        .into_iter()
        .filter(|t| t.family_id == from_family)
        .cloned()
        .collect();
    source_types.sort_by_key(|t| t.id);

    for source in &source_types {
        let source_fields = schema.resolve(source)?;

        let new_name = resolver.resolve(&source.name, |name| {
            host.annotation_types()
                .iter()
                .any(|t| t.family_id == to_family && t.name == name)
        })?;

        let new_type = host
            .apply(&Change::DuplicateType {
                source: template,
                name: new_name.clone(),
            })?
            .ok_or_else(|| ToolError::HostWrite("複製したタイプのIDが返されませんでした".into()))?;

        let duplicated = host
            .annotation_type(new_type)
            .cloned()
            .ok_or(ToolError::ElementNotFound(new_type))?;
        let target_fields = schema.resolve(&duplicated)?;

        for field in SheetNoteField::ALL {
            host.apply(&Change::SetTypeParameter {
                type_id: new_type,
                name: target_fields.get(field).name.clone(),
                value: source_fields.get(field).value.clone(),
            })?;
        }

        let instances: Vec<ElementId> = host
            .annotation_instances()
            .into_iter()
            .filter(|i| i.type_id == source.id)
            .map(|i| i.id)
            .collect();
        for instance in &instances {
            host.apply(&Change::ChangeInstanceType {
                instance: *instance,
                new_type,
            })?;
        }

        tracing::debug!(source = %source.id, new = %new_type, instances = instances.len(), "タイプを統合");
        merged.push(MergedType {
            source_type: source.id,
            source_name: source.name.clone(),
            new_type,
            new_name,
            repointed_instances: instances.len(),
        });
    }

    Ok(())
}
