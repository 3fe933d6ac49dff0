//! シートのリビジョン同期
//!
//! リビジョンごとに、表示名に一致するシートパラメータ（発行欄）を探し、
//! 値があればシートの追加リビジョンに加え、なければ外す。
//!
//! - 一致するパラメータが0件のシートがあれば、そのリビジョンは以降のシートを見ない
//! - 複数件一致した場合はパラメータ名の付け方が曖昧なので全体を中止する

use super::Diagnostics;
use crate::config::RevisionSettings;
use crate::error::Result;
use crate::host::{Change, ElementRef, HostModel, Revision};
use crate::session::Session;
use crate::unit_of_work::MutationBatch;
use snha_tools_common::{reconcile, ElementId, Error as CommonError, ParameterMatch, RevisionAction, RevisionMatcher};

pub const TRANSACTION_LABEL: &str = "Sync Revisions on Sheet with Sheet Issuance Parameters";

/// シートに対して行った変更
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRevisionChange {
    pub sheet: ElementId,
    pub revision: ElementId,
    pub action: RevisionAction,
}

/// 実行結果
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub changes: Vec<SheetRevisionChange>,
    /// 名前を解釈できずスキップしたリビジョン
    pub skipped_revisions: Vec<ElementId>,
    pub diagnostics: Diagnostics,
}

struct SheetInfo {
    id: ElementId,
    number: String,
    name: String,
}

/// リビジョンとシート発行パラメータを同期する
pub fn sync_revisions<H: HostModel>(session: &mut Session<H>, settings: &RevisionSettings) -> Result<SyncReport> {
    session.transaction(TRANSACTION_LABEL, |host| {
        let mut report = SyncReport::default();

        let mut revisions: Vec<Revision> = host.revisions().into_iter().cloned().collect();
        revisions.sort_by_key(|r| (r.sequence, r.id));

        let sheets: Vec<SheetInfo> = host
            .sheets()
            .into_iter()
            .map(|s| SheetInfo {
                id: s.id,
                number: s.number.clone(),
                name: s.name.clone(),
            })
            .collect();

        tracing::info!(revisions = revisions.len(), sheets = sheets.len(), "リビジョン同期を開始");

        for revision in &revisions {
            let matcher = match RevisionMatcher::new(revision, &settings.name_delimiter) {
                Ok(matcher) => matcher,
                Err(e) => {
                    report
                        .diagnostics
                        .warn(format!("リビジョン '{}' をスキップしました: {}", revision.name, e));
                    report.skipped_revisions.push(revision.id);
                    continue;
                }
            };

            for sheet in &sheets {
                let has_value = {
                    let parameters = host.sheet_parameters(sheet.id);
                    match matcher.find(&parameters) {
                        ParameterMatch::None => None,
                        ParameterMatch::One(parameter) => Some(parameter.has_value()),
                        ParameterMatch::Many(count) => {
                            return Err(CommonError::AmbiguousMatch {
                                subject: format!("parameters of sheet '{}'", sheet.number),
                                pattern: matcher.display_name.clone(),
                                count,
                            }
                            .into());
                        }
                    }
                };

                // 1枚目に無ければ他のシートにも無い
                let Some(has_value) = has_value else {
                    tracing::debug!(revision = %matcher.display_name, sheet = %sheet.number, "一致するパラメータなし");
                    break;
                };

                let mut current = match host.element(sheet.id) {
                    Some(ElementRef::Sheet(s)) => s.additional_revision_ids.clone(),
                    _ => Vec::new(),
                };

                let action = reconcile(has_value, current.contains(&revision.id));
                let symbol = match action {
                    RevisionAction::Add => {
                        current.push(revision.id);
                        "+="
                    }
                    RevisionAction::Remove => {
                        current.retain(|id| *id != revision.id);
                        "-="
                    }
                    RevisionAction::Keep => continue,
                };

                let mut batch = MutationBatch::new(format!("Sync {} on {}", matcher.display_name, sheet.number));
                batch.stage(Change::SetAdditionalRevisions {
                    sheet: sheet.id,
                    revisions: current,
                });

                match batch.commit_all(host) {
                    Ok(_) => {
                        report.diagnostics.info(format!(
                            "{}: {} {} {}",
                            sheet.number, sheet.name, symbol, matcher.display_name
                        ));
                        report.changes.push(SheetRevisionChange {
                            sheet: sheet.id,
                            revision: revision.id,
                            action,
                        });
                    }
                    Err(e) => {
                        report
                            .diagnostics
                            .error(format!("{}: {} を更新できません: {}", sheet.number, sheet.name, e));
                    }
                }
            }
        }

        report.diagnostics.info("Done.");
        Ok(report)
    })
}
