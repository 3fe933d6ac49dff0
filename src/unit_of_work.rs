//! 変更バッチ（作業単位）
//!
//! 変更を `stage` で溜め、`commit_all` でサブトランザクション内に
//! まとめて適用する。途中で失敗したらそのバッチだけ取り消す。

use crate::error::Result;
use crate::host::{Change, HostModel};
use snha_tools_common::ElementId;

/// 変更バッチ
#[derive(Debug, Clone)]
pub struct MutationBatch {
    label: String,
    staged: Vec<Change>,
}

impl MutationBatch {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            staged: Vec::new(),
        }
    }

    /// 変更を追加
    pub fn stage(&mut self, change: Change) -> &mut Self {
        self.staged.push(change);
        self
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// すべての変更を適用する
    ///
    /// # Returns
    /// 各変更で作成された要素ID（作成しない変更は None）
    pub fn commit_all<H: HostModel + ?Sized>(self, host: &mut H) -> Result<Vec<Option<ElementId>>> {
        if self.staged.is_empty() {
            return Ok(Vec::new());
        }

        host.begin_transaction(&self.label)?;

        let mut created = Vec::with_capacity(self.staged.len());
        for change in &self.staged {
            match host.apply(change) {
                Ok(id) => created.push(id),
                Err(e) => {
                    if let Err(rollback_err) = host.rollback_transaction() {
                        tracing::warn!("'{}' のロールバックに失敗: {}", self.label, rollback_err);
                    }
                    return Err(e);
                }
            }
        }

        host.commit_transaction()?;
        Ok(created)
    }

    /// 変更を破棄（破棄した件数を返す）
    pub fn discard(self) -> usize {
        tracing::debug!(label = %self.label, count = self.staged.len(), "バッチ破棄");
        self.staged.len()
    }
}
