//! 耐火区画線の作成
//!
//! アクティブビューに表示されている壁ごとに、壁タイプの耐火等級と
//! 施主要望フラグから線種を選び、壁の位置線上に詳細線を作成する。
//!
//! ## 処理フロー
//! 1. 未保存の変更があれば中止（`force` で無視）
//! 2. 壁ごとにサブトランザクションを張る
//! 3. 最初に処理する壁で、既存の耐火区画線をビューから削除
//! 4. 等級トークン + 区分フレーズで線種を1件選び、詳細線を作成
//! 5. 等級未設定の壁タイプは最後にまとめて警告

use super::Diagnostics;
use crate::config::FireRatingSettings;
use crate::error::{Result, ToolError};
use crate::host::{Change, HostModel, LineStyle, Wall};
use crate::session::Session;
use crate::unit_of_work::MutationBatch;
use snha_tools_common::{lookup_parameter, select_style, ElementId, Error as CommonError, RatingCategory, RatingToken};
use std::collections::HashSet;

pub const TRANSACTION_LABEL: &str = "Draw Fire Rating Lines";

/// 実行オプション
#[derive(Debug, Clone, Copy, Default)]
pub struct FireRatingOptions {
    /// 未保存の変更があっても実行する
    pub force: bool,
}

/// 壁をスキップした理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingType,
    MissingParameter,
    UnsetRating,
    NoLocation,
    NoMatch,
    AmbiguousMatch,
    HostWrite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedWall {
    pub wall: ElementId,
    pub reason: SkipReason,
}

/// 実行結果
#[derive(Debug, Clone, Default)]
pub struct FireRatingReport {
    /// 作成した詳細線
    pub created_lines: Vec<ElementId>,
    /// 削除した既存の耐火区画線の数
    pub purged_lines: usize,
    pub skipped: Vec<SkippedWall>,
    /// 耐火等級が未設定の壁タイプ（初出順・重複なし）
    pub unset_wall_types: Vec<String>,
    pub diagnostics: Diagnostics,
}

impl FireRatingReport {
    fn skip(&mut self, wall: ElementId, reason: SkipReason) {
        self.skipped.push(SkippedWall { wall, reason });
    }
}

/// 壁インスタンスの施主要望フラグから区分を決める
pub fn rating_category(wall: &Wall, settings: &FireRatingSettings) -> RatingCategory {
    let requested = lookup_parameter(&wall.parameters, &settings.client_request_parameter)
        .and_then(|p| p.value.as_value_string())
        .is_some_and(|v| v == settings.client_request_value);

    if requested {
        RatingCategory::Client
    } else {
        RatingCategory::Code
    }
}

/// 耐火区画線を作成する
pub fn draw_fire_rating_lines<H: HostModel>(
    session: &mut Session<H>,
    settings: &FireRatingSettings,
    options: FireRatingOptions,
) -> Result<FireRatingReport> {
    if session.host().is_modified() && !options.force {
        return Err(ToolError::UnsavedModel);
    }

    let view = session
        .host()
        .active_view()
        .ok_or_else(|| CommonError::Validation("アクティブビューがありません".into()))?;
    if session.host().view(view).is_none() {
        return Err(ToolError::ElementNotFound(view));
    }

    session.transaction(TRANSACTION_LABEL, |host| {
        let mut report = FireRatingReport::default();
        let walls: Vec<Wall> = host.walls_visible_in(view).into_iter().cloned().collect();
        tracing::info!(view = %view, walls = walls.len(), "耐火区画線の作成を開始");

        let mut fire_rating_styles: Option<Vec<LineStyle>> = None;

        for wall in &walls {
            let mut batch = MutationBatch::new(format!("{} ({})", TRANSACTION_LABEL, wall.id));

            let Some(wall_type) = host.wall_type(wall.type_id).cloned() else {
                report
                    .diagnostics
                    .error(format!("壁 {} のタイプ {} が見つかりません", wall.id, wall.type_id));
                report.skip(wall.id, SkipReason::MissingType);
                batch.discard();
                continue;
            };

            let Some(rating) = lookup_parameter(&wall_type.parameters, &settings.rating_parameter) else {
                report.diagnostics.error(format!(
                    "壁タイプ '{}' にパラメータ '{}' がありません",
                    wall_type.name, settings.rating_parameter
                ));
                report.skip(wall.id, SkipReason::MissingParameter);
                batch.discard();
                continue;
            };

            let category = rating_category(wall, settings);
            let token = match RatingToken::from_value(
                rating.value.as_double(),
                &settings.value_suffix,
                category,
                &settings.rating_parameter,
            ) {
                Ok(token) => token,
                Err(CommonError::UnsetValue { .. }) => {
                    if !report.unset_wall_types.contains(&wall_type.name) {
                        report.unset_wall_types.push(wall_type.name.clone());
                    }
                    report.skip(wall.id, SkipReason::UnsetRating);
                    batch.discard();
                    continue;
                }
                Err(e) => {
                    report.diagnostics.error(format!("壁タイプ '{}': {}", wall_type.name, e));
                    report.skip(wall.id, SkipReason::MissingParameter);
                    batch.discard();
                    continue;
                }
            };

            let Some(geometry) = wall.location else {
                report.diagnostics.error(format!("壁 {} に位置線がありません", wall.id));
                report.skip(wall.id, SkipReason::NoLocation);
                batch.discard();
                continue;
            };

            // 最初に処理する壁でのみ実行
            if fire_rating_styles.is_none() {
                let (styles, purged) = purge_existing_lines(host, view, settings)?;
                report.purged_lines = purged;
                fire_rating_styles = Some(styles);
            }
            let styles = fire_rating_styles.as_deref().unwrap_or(&[]);

            let phrase = category.phrase(&settings.code_phrase, &settings.client_phrase);
            let style = match select_style(styles, &token, phrase) {
                Ok(style) => style,
                Err(CommonError::AmbiguousMatch { .. }) => {
                    report.diagnostics.error(format!(
                        "複数の線種が見つかりました: '{}' + '{}'。線種を確認してから再実行してください",
                        settings.linestyle_phrase, token.token
                    ));
                    report.skip(wall.id, SkipReason::AmbiguousMatch);
                    batch.discard();
                    continue;
                }
                Err(_) => {
                    report.diagnostics.error(format!(
                        "線種が見つかりません: '{}' + '{}'。線種を確認してから再実行してください",
                        settings.linestyle_phrase, token.token
                    ));
                    report.skip(wall.id, SkipReason::NoMatch);
                    batch.discard();
                    continue;
                }
            };

            tracing::debug!(wall = %wall.id, token = %token, style = %style.name, "線種を選択");
            batch.stage(Change::CreateDetailLine {
                view,
                geometry,
                style: style.id,
            });

            match batch.commit_all(host) {
                Ok(created) => report.created_lines.extend(created.into_iter().flatten()),
                Err(e) => {
                    report.diagnostics.error(format!("壁 {} の詳細線を作成できません: {}", wall.id, e));
                    report.skip(wall.id, SkipReason::HostWrite);
                }
            }
        }

        for type_name in &report.unset_wall_types {
            report.diagnostics.warn(format!(
                "壁タイプ '{}' の '{}' が未設定です。この壁タイプには詳細線を作成しません",
                type_name, settings.rating_parameter
            ));
        }

        tracing::info!(
            created = report.created_lines.len(),
            purged = report.purged_lines,
            skipped = report.skipped.len(),
            "耐火区画線の作成を完了"
        );
        Ok(report)
    })
}

/// 耐火区画線の線種を集め、ビュー内の既存の耐火区画線を削除する
fn purge_existing_lines<H: HostModel>(
    host: &mut H,
    view: ElementId,
    settings: &FireRatingSettings,
) -> Result<(Vec<LineStyle>, usize)> {
    let styles: Vec<LineStyle> = host
        .line_styles()
        .into_iter()
        .filter(|s| s.name.contains(settings.linestyle_phrase.as_str()))
        .cloned()
        .collect();

    let style_ids: HashSet<ElementId> = styles.iter().map(|s| s.id).collect();

    let mut purge = MutationBatch::new("Purge Fire Rating Lines");
    for line in host.detail_lines_in(view) {
        if style_ids.contains(&line.style_id) {
            purge.stage(Change::DeleteElement(line.id));
        }
    }

    let purged = purge.len();
    purge.commit_all(host)?;
    tracing::debug!(styles = styles.len(), purged, "既存の耐火区画線を削除");

    Ok((styles, purged))
}
