//! Configuration for the CPT engine module.

use cpt_engine_sdk::DEFAULT_ICON;
use serde::{Deserialize, Serialize};

/// Configuration for the CPT engine module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CptEngineConfig {
    /// Path prefix all REST routes are mounted under.
    /// Default: `/cpt`
    pub base_path: String,

    /// Page size used when a listing request does not name one.
    pub default_page_size: u64,

    /// Upper bound for any requested page size.
    pub max_page_size: u64,

    /// Re-run field validation when a post update replaces its fields.
    pub revalidate_on_update: bool,

    /// Icon stored for post types created without one.
    pub default_icon: String,
}

impl Default for CptEngineConfig {
    fn default() -> Self {
        Self {
            base_path: "/cpt".to_owned(),
            default_page_size: 10,
            max_page_size: 100,
            revalidate_on_update: true,
            default_icon: DEFAULT_ICON.to_owned(),
        }
    }
}

impl CptEngineConfig {
    /// `base_path` with exactly one leading slash and no trailing slash.
    #[must_use]
    pub fn normalized_base_path(&self) -> String {
        let trimmed = self.base_path.trim().trim_matches('/');
        format!("/{trimmed}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = CptEngineConfig::default();
        assert_eq!(cfg.base_path, "/cpt");
        assert_eq!(cfg.default_page_size, 10);
        assert_eq!(cfg.max_page_size, 100);
        assert!(cfg.revalidate_on_update);
        assert_eq!(cfg.default_icon, "dashicons-admin-post");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: CptEngineConfig =
            serde_json::from_str(r#"{"max_page_size": 50, "revalidate_on_update": false}"#)
                .unwrap();
        assert_eq!(cfg.max_page_size, 50);
        assert!(!cfg.revalidate_on_update);
        assert_eq!(cfg.default_page_size, 10);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let res = serde_json::from_str::<CptEngineConfig>(r#"{"page_size": 5}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_normalized_base_path() {
        let mut cfg = CptEngineConfig::default();
        for (raw, expected) in [("/cpt", "/cpt"), ("cpt/", "/cpt"), ("/api/cpt/", "/api/cpt")] {
            cfg.base_path = raw.to_owned();
            assert_eq!(cfg.normalized_base_path(), expected);
        }
    }
}
