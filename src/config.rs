use crate::cli::LogFormat;
use crate::error::{Result, SplitterError};
use order_splitter_common::{AnchorPattern, AnchorSet, ConflictPolicy, IndexOptions, NormalizeOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 追加アンカー（既定の Model/Item/Internet/SKU の後ろに並ぶ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraAnchor {
    pub label: String,
    /// 品番の直前に現れる語句（正規表現ではなくそのままの文字列）
    pub phrase: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub strip_leading_zeros: bool,
    pub conflict_policy: ConflictPolicy,
    pub output_dir: PathBuf,
    pub log_format: LogFormat,
    pub archive: bool,
    pub extra_anchors: Vec<ExtraAnchor>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SplitterError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("order-splitter").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            strip_leading_zeros: false,
            conflict_policy: ConflictPolicy::LastWins,
            output_dir: PathBuf::from("outputs"),
            log_format: LogFormat::Csv,
            archive: true,
            extra_anchors: Vec::new(),
        }
    }

    /// 既定アンカー＋追加アンカー
    pub fn anchor_set(&self) -> Result<AnchorSet> {
        let mut anchors = AnchorSet::default();
        for extra in &self.extra_anchors {
            anchors.push(AnchorPattern::from_phrase(&extra.label, &extra.phrase)?);
        }
        Ok(anchors)
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions::new(self.strip_leading_zeros)
    }

    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            normalize: self.normalize_options(),
            conflict_policy: self.conflict_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();

        assert!(!config.strip_leading_zeros);
        assert_eq!(config.conflict_policy, ConflictPolicy::LastWins);
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
        assert!(config.archive);
        assert!(config.extra_anchors.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.strip_leading_zeros = true;
        config.conflict_policy = ConflictPolicy::Reject;
        config.log_format = LogFormat::Both;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.strip_leading_zeros);
        assert_eq!(loaded.conflict_policy, ConflictPolicy::Reject);
        assert_eq!(loaded.log_format, LogFormat::Both);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"conflict_policy": "first-wins"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.conflict_policy, ConflictPolicy::FirstWins);
        assert!(config.archive);
        assert_eq!(config.log_format, LogFormat::Csv);
    }

    #[test]
    fn test_extra_anchors_appended() {
        let mut config = Config::default();
        config.extra_anchors.push(ExtraAnchor {
            label: "Vendor Part".into(),
            phrase: "Vendor Part #".into(),
        });

        let anchors = config.anchor_set().unwrap();
        assert_eq!(anchors.patterns().len(), 5);
        assert_eq!(anchors.patterns()[4].label(), "Vendor Part");
    }

    #[test]
    fn test_invalid_extra_anchor() {
        let mut config = Config::default();
        config.extra_anchors.push(ExtraAnchor {
            label: "".into(),
            phrase: "Part".into(),
        });

        assert!(matches!(
            config.anchor_set(),
            Err(SplitterError::Classification(_))
        ));
    }
}
