//! 重複名の解決
//!
//! 既に使われている名前に目印文字を1つずつ足して空き名を探す。
//! 試行回数は上限付きで、超えた場合は `CollisionExhausted` を返す。

use crate::error::{Error, Result};

/// 目印文字のデフォルト
pub const DEFAULT_MARKER: &str = "_";

/// 試行回数上限のデフォルト
pub const DEFAULT_MAX_ATTEMPTS: usize = 32;

/// 空き名リゾルバ
#[derive(Debug, Clone)]
pub struct UniqueNameResolver {
    marker: String,
    max_attempts: usize,
}

impl Default for UniqueNameResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER, DEFAULT_MAX_ATTEMPTS)
    }
}

impl UniqueNameResolver {
    pub fn new(marker: impl Into<String>, max_attempts: usize) -> Self {
        Self {
            marker: marker.into(),
            max_attempts: max_attempts.max(1),
        }
    }

    /// `base`, `base_`, `base__` ... の順に試し、最初の空き名を返す
    ///
    /// # Arguments
    /// * `base` - 希望する名前
    /// * `is_taken` - 名前が既に使われているか判定する関数
    pub fn resolve<F>(&self, base: &str, is_taken: F) -> Result<String>
    where
        F: Fn(&str) -> bool,
    {
        let mut candidate = base.to_string();

        for _ in 0..self.max_attempts {
            if !is_taken(&candidate) {
                return Ok(candidate);
            }
            candidate.push_str(&self.marker);
        }

        Err(Error::CollisionExhausted {
            name: base.to_string(),
            attempts: self.max_attempts,
        })
    }
}
