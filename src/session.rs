//! セッション（作業中のモデルドキュメント）
//!
//! open → 操作 → close の順で使う。各コマンドはセッションを受け取り、
//! `transaction` で外側のトランザクションを張る。クロージャがエラーを返すと
//! ホスト側でロールバックし、エラーをそのまま返す。

use crate::error::Result;
use crate::host::{HostModel, ModelDocument};
use std::path::{Path, PathBuf};

/// クローズ結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseSummary {
    /// 保存先（保存しなかった場合は None）
    pub saved_to: Option<PathBuf>,
    /// 変更があったか
    pub modified: bool,
}

pub struct Session<H: HostModel> {
    host: H,
    source: Option<PathBuf>,
}

impl Session<ModelDocument> {
    /// モデルファイルを開く
    pub fn open(path: &Path) -> Result<Self> {
        let document = ModelDocument::load(path)?;
        tracing::info!(path = %path.display(), "モデルを開きました");
        Ok(Self {
            host: document,
            source: Some(path.to_path_buf()),
        })
    }

    /// セッションを閉じる
    ///
    /// # Arguments
    /// * `output` - 保存先（省略時は開いたファイルを上書き）
    /// * `dry_run` - true なら保存しない
    pub fn close(mut self, output: Option<&Path>, dry_run: bool) -> Result<CloseSummary> {
        let modified = self.host.is_modified();

        if dry_run || !modified {
            return Ok(CloseSummary {
                saved_to: None,
                modified,
            });
        }

        let target = output.map(Path::to_path_buf).or(self.source.take());
        match target {
            Some(path) => {
                self.host.save(&path)?;
                tracing::info!(path = %path.display(), "モデルを保存しました");
                Ok(CloseSummary {
                    saved_to: Some(path),
                    modified,
                })
            }
            None => Ok(CloseSummary {
                saved_to: None,
                modified,
            }),
        }
    }
}

impl<H: HostModel> Session<H> {
    /// 既存のホストからセッションを作る（保存先なし）
    pub fn new(host: H) -> Self {
        Self { host, source: None }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// 外側のトランザクション内で処理を実行
    pub fn transaction<T, F>(&mut self, label: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut H) -> Result<T>,
    {
        self.host.begin_transaction(label)?;

        match f(&mut self.host) {
            Ok(value) => {
                self.host.commit_transaction()?;
                Ok(value)
            }
            Err(e) => {
                tracing::warn!("'{}' を中断しロールバックします: {}", label, e);
                if let Err(rollback_err) = self.host.rollback_transaction() {
                    tracing::warn!("ロールバックに失敗: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}
