use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::render::Layout;
use crate::render::flat::FlatOptions;
use crate::render::pivot::PivotOptions;

/// Table settings read from an optional TOML file.
///
/// ```toml
/// layout = "pivot"
///
/// [pivot]
/// caption = "Long-term forecasting results"
/// resize_to_column = true
/// model_order = ["PatchTST", "DLinear", "Informer"]
///
/// [flat]
/// label = "tab:raw"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub layout: Layout,
    pub pivot: PivotOptions,
    pub flat: FlatOptions,
}

pub fn load_config(config_path: &Path) -> Result<TableConfig> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    let config: TableConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tables.toml");
        fs::write(
            &path,
            r#"
layout = "pivot-plain"

[pivot]
caption = "Results"
model_order = ["B", "A"]
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.layout, Layout::PivotPlain);
        assert_eq!(config.pivot.caption.as_deref(), Some("Results"));
        assert_eq!(config.pivot.model_order, Some(vec!["B".to_string(), "A".to_string()]));
        assert_eq!(config.pivot.label, "tab:results-pivot");
        assert!(config.pivot.highlight);
        assert_eq!(config.flat, FlatOptions::default());
    }

    #[test]
    fn empty_file_is_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tables.toml");
        fs::write(&path, "").unwrap();
        assert_eq!(load_config(&path).unwrap(), TableConfig::default());
    }

    #[test]
    fn bad_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tables.toml");
        fs::write(&path, "layout = [").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_config(&dir.path().join("nope.toml")).is_err());
    }
}
