//! 取引先（店舗）キー
//!
//! 出力ディレクトリ名と監査ログの store 列に使う。

use order_splitter_common::safe_name;

/// 取引先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKey {
    /// 出力・ログ用のキー
    pub key: String,
    /// 表示名
    pub label: String,
}

impl StoreKey {
    fn preset(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

impl std::str::FromStr for StoreKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "depot" | "home-depot" | "homedepot" | "hd" => Ok(Self::preset("Depot", "Home Depot")),
            "lowes" | "lowe's" => Ok(Self::preset("Lowes", "Lowe's")),
            "tsc" | "tractor-supply" | "tractorsupply" => Ok(Self::preset("TSC", "Tractor Supply")),
            _ => {
                let key = safe_name(s);
                if key.is_empty() {
                    Err(format!("Invalid store: {:?}", s))
                } else {
                    Ok(Self {
                        key,
                        label: s.trim().to_string(),
                    })
                }
            }
        }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_presets() {
        let depot: StoreKey = "Home-Depot".parse().unwrap();
        assert_eq!(depot.key, "Depot");
        assert_eq!(depot.label, "Home Depot");

        let lowes: StoreKey = "lowes".parse().unwrap();
        assert_eq!(lowes.key, "Lowes");
        assert_eq!(lowes.to_string(), "Lowe's");

        let tsc: StoreKey = "TSC".parse().unwrap();
        assert_eq!(tsc.key, "TSC");
    }

    #[test]
    fn test_store_custom() {
        let store: StoreKey = "Ace Hardware".parse().unwrap();
        assert_eq!(store.key, "Ace_Hardware");
        assert_eq!(store.label, "Ace Hardware");
    }

    #[test]
    fn test_store_invalid() {
        assert!("///".parse::<StoreKey>().is_err());
    }
}
