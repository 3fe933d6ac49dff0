use crate::error::{Result, ToolError};
use serde::{Deserialize, Serialize};
use snha_tools_common::naming::{DEFAULT_MARKER, DEFAULT_MAX_ATTEMPTS};
use snha_tools_common::revision::DEFAULT_DELIMITER;
use snha_tools_common::{SheetNoteSchema, UniqueNameResolver};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub fire_rating: FireRatingSettings,
    pub sheet_notes: SheetNoteSchema,
    pub revisions: RevisionSettings,
    pub naming: NamingSettings,
}

/// 耐火区画線の設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FireRatingSettings {
    /// 耐火区画線の線種名に含まれるフレーズ
    pub linestyle_phrase: String,
    /// 法規要求の線種フレーズ
    pub code_phrase: String,
    /// 施主要望の線種フレーズ
    pub client_phrase: String,
    /// 壁タイプの耐火等級パラメータ（数値型）
    pub rating_parameter: String,
    /// 等級値に付ける接尾辞
    pub value_suffix: String,
    /// 壁インスタンスの施主要望フラグ
    pub client_request_parameter: String,
    /// 施主要望フラグが立っているときの表示値
    pub client_request_value: String,
}

impl Default for FireRatingSettings {
    fn default() -> Self {
        Self {
            linestyle_phrase: "FireRating".into(),
            code_phrase: "Code".into(),
            client_phrase: "Client".into(),
            rating_parameter: "Fire Rating (Hours)".into(),
            value_suffix: "HR".into(),
            client_request_parameter: "Fire Rating by Client Request".into(),
            client_request_value: "Yes".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevisionSettings {
    /// リビジョン名の区切り（2番目の要素を表示名とする）
    pub name_delimiter: String,
}

impl Default for RevisionSettings {
    fn default() -> Self {
        Self {
            name_delimiter: DEFAULT_DELIMITER.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamingSettings {
    /// 重複名に付ける目印
    pub collision_marker: String,
    /// 空き名を探す最大試行回数
    pub max_attempts: usize,
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            collision_marker: DEFAULT_MARKER.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl NamingSettings {
    pub fn resolver(&self) -> UniqueNameResolver {
        UniqueNameResolver::new(self.collision_marker.clone(), self.max_attempts)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// 指定パスから読み込み（存在しなければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ToolError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("snha-tools").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        if self.fire_rating.linestyle_phrase.is_empty() {
            return Err(ToolError::Config("fireRating.linestylePhrase が空です".into()));
        }
        if self.sheet_notes.series_key.is_empty() {
            return Err(ToolError::Config("sheetNotes.seriesKey が空です".into()));
        }
        if self.revisions.name_delimiter.is_empty() {
            return Err(ToolError::Config("revisions.nameDelimiter が空です".into()));
        }
        if self.naming.collision_marker.is_empty() || self.naming.max_attempts == 0 {
            return Err(ToolError::Config("naming.collisionMarker / maxAttempts が不正です".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.fire_rating.linestyle_phrase, "FireRating");
        assert_eq!(config.sheet_notes.series_key, "SERIES");
        assert_eq!(config.naming.max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"fireRating": {"valueSuffix": "H"}, "naming": {"maxAttempts": 4}}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.fire_rating.value_suffix, "H");
        assert_eq!(config.fire_rating.code_phrase, "Code");
        assert_eq!(config.naming.max_attempts, 4);
        assert_eq!(config.naming.collision_marker, "_");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"revisions": {"nameDelimiter": ""}}"#).unwrap();

        assert!(matches!(Config::load_from(&path), Err(ToolError::Config(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.fire_rating.client_phrase = "Owner".into();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.fire_rating.client_phrase, "Owner");
    }
}
