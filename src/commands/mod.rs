//! モデル編集コマンド
//!
//! - 耐火区画線の作成
//! - シートノートファミリの統合
//! - シートのリビジョン同期
//! - 参照ビューの付け替え

pub mod fire_rating;
pub mod merge_sheet_notes;
pub mod sync_revisions;
pub mod view_references;

use std::fmt;

/// 診断メッセージのレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// 診断メッセージ（コンソール表示用の1行）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Level::Info => write!(f, "{}", self.message),
            Level::Warning => write!(f, "⚠ 警告: {}", self.message),
            Level::Error => write!(f, "✖ エラー: {}", self.message),
        }
    }
}

/// 実行中に集めた診断メッセージ
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Level::Info, message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Level::Warning, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Level::Error, message.into());
    }

    fn push(&mut self, level: Level, message: String) {
        self.entries.push(Diagnostic { level, message });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn count(&self, level: Level) -> usize {
        self.entries.iter().filter(|d| d.level == level).count()
    }

    /// メッセージに文字列を含む診断があるか
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|d| d.message.contains(needle))
    }

    /// コンソールに出力
    pub fn print(&self) {
        for entry in &self.entries {
            println!("{}", entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_count() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.info("A101: Floor Plan += IFC");
        diagnostics.warn("未設定");
        diagnostics.error("線種なし");
        diagnostics.error("線種重複");

        assert_eq!(diagnostics.count(Level::Info), 1);
        assert_eq!(diagnostics.count(Level::Error), 2);
        assert!(diagnostics.contains("IFC"));
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            level: Level::Warning,
            message: "テスト".into(),
        };
        assert!(format!("{}", diagnostic).contains("警告"));
    }
}
